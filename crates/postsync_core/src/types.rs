use chrono::NaiveDate;

/// One entry of the remote post index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub canonical_slug: String,
    pub resolved_url: String,
}

/// Unstructured text produced by a document converter for a single post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawDocument(String);

impl RawDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawDocument {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawDocument {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub title: String,
    pub date: NaiveDate,
    pub subtitle: String,
}

impl ExtractedMetadata {
    /// Date in the `YYYY-MM-DD` form the site build expects.
    pub fn canonical_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Front matter followed by the original document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub metadata: ExtractedMetadata,
    pub content: String,
}

impl NormalizedDocument {
    pub fn as_str(&self) -> &str {
        &self.content
    }
}
