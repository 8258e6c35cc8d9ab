use postsync_core::{PostSummary, RawDocument};
use sync_logging::sync_debug;

use crate::decode::{decode_html, DecodeError};
use crate::extract::{ArticleExtractor, Extractor};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::markdown::MarkdownRenderer;
use crate::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Decode(#[from] DecodeError),
}

/// Turns one post into its raw markdown-flavoured text.
#[async_trait::async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, post: &PostSummary) -> Result<RawDocument, ConvertError>;
}

/// Downloads the post page and renders it locally.
pub struct HttpDocumentConverter<F = ReqwestFetcher, E = ArticleExtractor> {
    fetcher: F,
    extractor: E,
    renderer: MarkdownRenderer,
}

impl HttpDocumentConverter {
    pub fn new(settings: FetchSettings) -> Self {
        Self::with_parts(ReqwestFetcher::new(settings), ArticleExtractor)
    }
}

impl<F: Fetcher, E: Extractor> HttpDocumentConverter<F, E> {
    pub fn with_parts(fetcher: F, extractor: E) -> Self {
        Self {
            fetcher,
            extractor,
            renderer: MarkdownRenderer,
        }
    }
}

#[async_trait::async_trait]
impl<F: Fetcher, E: Extractor> DocumentConverter for HttpDocumentConverter<F, E> {
    async fn convert(&self, post: &PostSummary) -> Result<RawDocument, ConvertError> {
        let output = self.fetcher.fetch(&post.resolved_url).await?;
        let html = decode_html(&output.bytes, output.metadata.content_type.as_deref())?;
        let content = self.extractor.extract(&html);
        let markdown = self
            .renderer
            .render(&content, Some(&output.metadata.final_url));
        sync_debug!(
            "converted {} ({} bytes html -> {} bytes text)",
            post.id,
            output.metadata.byte_len,
            markdown.len()
        );
        Ok(RawDocument::new(markdown))
    }
}
