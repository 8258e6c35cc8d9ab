use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use postsync_core::{ExtractionError, Slug};

use crate::convert::ConvertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Converting,
    Normalizing,
    Writing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Progress {
        post_id: String,
        stage: Stage,
    },
    PostCompleted {
        post_id: String,
        slug: Slug,
        result: Result<PathBuf, PostFailure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

/// What the converter needs to know about a response besides its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// URL after redirects; relative links resolve against it.
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why a single post did not end up on disk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostFailure {
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("write failed: {0}")]
    Persist(String),
    #[error("conversion timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("slug `{slug}` already taken by post {first_post_id}")]
    SlugCollision { slug: Slug, first_post_id: String },
    #[error("worker panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPost {
    pub post_id: String,
    pub slug: Slug,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPost {
    pub post_id: String,
    pub slug: Slug,
    pub failure: PostFailure,
}

/// Outcome of one sync run, in index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub removed_stale: usize,
    pub written: Vec<WrittenPost>,
    pub failed: Vec<FailedPost>,
}

impl SyncReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
