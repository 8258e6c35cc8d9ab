//! Postsync core: pure text processing for synchronized posts.
//!
//! Nothing in this crate performs IO. Every function takes immutable text and
//! returns either a value or a named failure.
mod frontmatter;
mod metadata;
mod slug;
mod types;

pub use frontmatter::{normalize, parse_front_matter, FrontMatterError};
pub use metadata::{canonicalize_date, current_year, extract_metadata, ExtractionError};
pub use slug::{slugify, Slug, MARKDOWN_EXTENSION};
pub use types::{ExtractedMetadata, NormalizedDocument, PostSummary, RawDocument};
