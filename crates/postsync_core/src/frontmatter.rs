use chrono::NaiveDate;

use crate::metadata::{extract_metadata, ExtractionError};
use crate::types::{ExtractedMetadata, NormalizedDocument, RawDocument};

const FENCE: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontMatterError {
    #[error("document does not start with `---`")]
    MissingOpeningFence,
    #[error("missing closing `---`")]
    MissingClosingFence,
    #[error("front matter missing field `{0}`")]
    MissingField(&'static str),
    #[error("front matter date is not YYYY-MM-DD: {0}")]
    InvalidDate(String),
}

/// Prefix the whole original document with a `title`/`date`/`subtitle` block.
pub fn normalize(
    doc: &RawDocument,
    current_year: i32,
) -> Result<NormalizedDocument, ExtractionError> {
    let metadata = extract_metadata(doc, current_year)?;
    let mut content = render_front_matter(&metadata);
    content.push_str(doc.as_str());
    Ok(NormalizedDocument { metadata, content })
}

fn render_front_matter(meta: &ExtractedMetadata) -> String {
    format!(
        "{FENCE}\ntitle: {title}\ndate: {date}\nsubtitle: {subtitle}\n{FENCE}\n\n",
        title = quote(&meta.title),
        date = meta.canonical_date(),
        subtitle = quote(&meta.subtitle),
    )
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => value.to_string(),
    }
}

/// Read back a block written by [`normalize`], returning the metadata and the body.
pub fn parse_front_matter(text: &str) -> Result<(ExtractedMetadata, &str), FrontMatterError> {
    let rest = text
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix('\n'))
        .ok_or(FrontMatterError::MissingOpeningFence)?;
    let closing = format!("\n{FENCE}\n");
    let end = rest
        .find(&closing)
        .ok_or(FrontMatterError::MissingClosingFence)?;

    let mut title = None;
    let mut date = None;
    let mut subtitle = None;
    for line in rest[..end].lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "title" => title = Some(unquote(value)),
            "subtitle" => subtitle = Some(unquote(value)),
            "date" => date = Some(unquote(value)),
            _ => {}
        }
    }

    let title = title.ok_or(FrontMatterError::MissingField("title"))?;
    let subtitle = subtitle.ok_or(FrontMatterError::MissingField("subtitle"))?;
    let date = date.ok_or(FrontMatterError::MissingField("date"))?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| FrontMatterError::InvalidDate(date.clone()))?;

    let after = &rest[end + closing.len()..];
    let body = after.strip_prefix('\n').unwrap_or(after);
    Ok((
        ExtractedMetadata {
            title,
            date,
            subtitle,
        },
        body,
    ))
}
