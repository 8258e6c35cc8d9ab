use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decode a post page into UTF-8: BOM, then Content-Type charset, then detection.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<String, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(enc) = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode bytes with {encoding}")]
pub struct DecodeError {
    pub encoding: String,
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<String, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError {
            encoding: enc.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::{charset_label, decode_html};

    #[test]
    fn charset_label_is_case_insensitive() {
        assert_eq!(
            charset_label("text/html; Charset=\"UTF-8\"").as_deref(),
            Some("UTF-8")
        );
        assert_eq!(charset_label("text/html"), None);
    }

    #[test]
    fn header_charset_is_respected() {
        let decoded = decode_html(b"caf\xe9", Some("text/html; charset=ISO-8859-1")).unwrap();
        assert_eq!(decoded, "caf\u{e9}");
    }

    #[test]
    fn utf8_bom_wins() {
        let decoded = decode_html(b"\xEF\xBB\xBFhello", Some("text/html; charset=latin1")).unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert!(decode_html(b"ab\xc3\x28", Some("text/html; charset=utf-8")).is_err());
    }
}
