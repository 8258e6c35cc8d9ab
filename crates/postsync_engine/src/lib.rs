//! Postsync engine: network, conversion and filesystem side of the pipeline.
mod convert;
mod decode;
mod extract;
mod fetch;
mod markdown;
mod orchestrator;
mod persist;
mod progress;
mod source;
mod types;

pub use convert::{ConvertError, DocumentConverter, HttpDocumentConverter};
pub use decode::{decode_html, DecodeError};
pub use extract::{ArticleExtractor, Extractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use markdown::MarkdownRenderer;
pub use orchestrator::{SyncConfig, SyncError, SyncOrchestrator};
pub use persist::{clear_managed_files, ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{LoggingProgressSink, NoopProgressSink, ProgressSink};
pub use source::{
    parse_index, ContentSource, MediumContentSource, SourceError, SourceSettings, SECURITY_PREFIX,
};
pub use types::{
    FailedPost, FailureKind, FetchError, FetchMetadata, FetchOutput, PostFailure, Stage,
    SyncEvent, SyncReport, WrittenPost,
};
