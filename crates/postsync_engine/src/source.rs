//! Remote post index.
//!
//! The listing endpoint answers with a JSON document guarded by a fixed
//! anti-hijacking prefix. The prefix is mandatory: its absence means the
//! endpoint changed and the whole index is rejected.
use postsync_core::PostSummary;
use serde::Deserialize;
use sync_logging::{sync_debug, sync_info};

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::FetchError;

pub const SECURITY_PREFIX: &str = "])}while(1);</x>";

const INDEX_CONTENT_TYPES: [&str; 2] = ["application/json", "text/plain"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("index fetch failed: {0}")]
    Network(#[from] FetchError),
    #[error("index response changed shape: {0}")]
    Schema(String),
}

#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_all_posts(&self) -> Result<Vec<PostSummary>, SourceError>;
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Author profile, e.g. `https://medium.com/@someone`.
    pub profile_url: String,
    pub index_limit: u32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            profile_url: "https://medium.com/@yazeedb".to_string(),
            index_limit: 200,
        }
    }
}

impl SourceSettings {
    pub fn index_url(&self) -> String {
        format!(
            "{}/latest?format=json&limit={}",
            self.profile_url.trim_end_matches('/'),
            self.index_limit
        )
    }
}

pub struct MediumContentSource<F = ReqwestFetcher> {
    settings: SourceSettings,
    fetcher: F,
}

impl MediumContentSource<ReqwestFetcher> {
    pub fn new(settings: SourceSettings, fetch: FetchSettings) -> Self {
        let fetcher = ReqwestFetcher::new(fetch.with_content_types(INDEX_CONTENT_TYPES));
        Self::with_fetcher(settings, fetcher)
    }
}

impl<F: Fetcher> MediumContentSource<F> {
    pub fn with_fetcher(settings: SourceSettings, fetcher: F) -> Self {
        Self { settings, fetcher }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> ContentSource for MediumContentSource<F> {
    async fn fetch_all_posts(&self) -> Result<Vec<PostSummary>, SourceError> {
        let url = self.settings.index_url();
        sync_info!("Fetching post index from {}", url);
        let output = self.fetcher.fetch(&url).await?;
        let body = String::from_utf8(output.bytes)
            .map_err(|err| SourceError::Schema(format!("index body is not utf-8: {err}")))?;
        let posts = parse_index(&body, &self.settings.profile_url)?;
        sync_info!("Index lists {} posts", posts.len());
        Ok(posts)
    }
}

#[derive(Deserialize)]
struct IndexEnvelope {
    payload: IndexPayload,
}

#[derive(Deserialize)]
struct IndexPayload {
    references: IndexReferences,
}

#[derive(Deserialize)]
struct IndexReferences {
    #[serde(rename = "Post")]
    posts: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    #[serde(default)]
    id: Option<String>,
    title: String,
    unique_slug: String,
}

/// Strip the security prefix and flatten `payload.references.Post` in API order.
pub fn parse_index(body: &str, profile_url: &str) -> Result<Vec<PostSummary>, SourceError> {
    let json = body
        .strip_prefix(SECURITY_PREFIX)
        .ok_or_else(|| SourceError::Schema("missing security prefix".to_string()))?;
    let envelope: IndexEnvelope =
        serde_json::from_str(json).map_err(|err| SourceError::Schema(err.to_string()))?;

    let base = profile_url.trim_end_matches('/');
    envelope
        .payload
        .references
        .posts
        .into_iter()
        .map(|(key, value)| {
            let record: PostRecord = serde_json::from_value(value)
                .map_err(|err| SourceError::Schema(format!("post {key}: {err}")))?;
            sync_debug!("index entry {} -> {}", key, record.unique_slug);
            Ok(PostSummary {
                id: record.id.unwrap_or(key),
                title: record.title,
                resolved_url: format!("{base}/{}", record.unique_slug),
                canonical_slug: record.unique_slug,
            })
        })
        .collect()
}
