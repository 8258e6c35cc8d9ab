use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::types::{ExtractedMetadata, RawDocument};

/// Characters that corrupt the front matter when left in a title.
const RESERVED_TITLE_CHARS: &[char] = &[':', '.'];

/// Expected upstream date shape, e.g. `May 16, 2018` or `Sep 3, 2019`.
const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("title")]
    Title,
    #[error("date")]
    Date,
    #[error("date-format: {text}")]
    DateFormat { text: String },
}

/// Pull title, publish date and subtitle out of a converted document.
///
/// `current_year` fills in the year when the embedded date omits it.
pub fn extract_metadata(
    doc: &RawDocument,
    current_year: i32,
) -> Result<ExtractedMetadata, ExtractionError> {
    let text = doc.as_str();
    let title = extract_title(text)?;
    let subtitle = extract_subtitle(text);
    let raw_date = extract_raw_date(text)?;
    let date = canonicalize_date(&raw_date, current_year)?;
    Ok(ExtractedMetadata {
        title,
        date,
        subtitle,
    })
}

/// Calendar year of the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Parse `Month Day[, Year]` text. A missing comma means a missing year.
pub fn canonicalize_date(text: &str, current_year: i32) -> Result<NaiveDate, ExtractionError> {
    let with_year = if text.contains(',') {
        text.to_string()
    } else {
        format!("{text}, {current_year}")
    };
    NaiveDate::parse_from_str(&with_year, DISPLAY_DATE_FORMAT)
        .map_err(|_| ExtractionError::DateFormat { text: with_year })
}

fn extract_title(text: &str) -> Result<String, ExtractionError> {
    let raw = first_capture(title_re(), text).ok_or(ExtractionError::Title)?;
    let title = sanitize_title(raw);
    if title.is_empty() {
        return Err(ExtractionError::Title);
    }
    Ok(title)
}

fn extract_subtitle(text: &str) -> String {
    first_capture(subtitle_re(), text)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn extract_raw_date(text: &str) -> Result<String, ExtractionError> {
    let raw = first_capture(time_re(), text).ok_or(ExtractionError::Date)?;
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return Err(ExtractionError::Date);
    }
    Ok(collapsed)
}

fn first_capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn sanitize_title(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| !RESERVED_TITLE_CHARS.contains(c))
        .collect();
    collapse_whitespace(&stripped)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^# (.+)$").expect("valid title pattern"))
}

fn subtitle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^## (.+)$").expect("valid subtitle pattern"))
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<time\b[^>]*>(.*?)</time>").expect("valid time pattern"))
}
