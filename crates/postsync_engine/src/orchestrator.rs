use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use postsync_core::{current_year, normalize, slugify, PostSummary, Slug};
use sync_logging::{sync_info, sync_warn};
use tokio::sync::{oneshot, Semaphore};

use crate::convert::DocumentConverter;
use crate::persist::{clear_managed_files, ensure_output_dir, AtomicFileWriter, PersistError};
use crate::progress::{NoopProgressSink, ProgressSink};
use crate::source::{ContentSource, SourceError};
use crate::{FailedPost, PostFailure, Stage, SyncEvent, SyncReport, WrittenPost};

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub output_dir: PathBuf,
    /// Posts converted at the same time; values below 1 count as 1.
    pub concurrency: usize,
    pub post_timeout: Duration,
    /// Year assumed for dates without one. `None` reads the local clock.
    pub current_year: Option<i32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("content/posts"),
            concurrency: 4,
            post_timeout: Duration::from_secs(60),
            current_year: None,
        }
    }
}

/// Failures that stop a run before any post is processed.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("output directory unusable: {0}")]
    OutputDir(#[source] PersistError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to clear stale output: {0}")]
    Clear(#[source] PersistError),
}

pub struct SyncOrchestrator {
    source: Arc<dyn ContentSource>,
    converter: Arc<dyn DocumentConverter>,
    sink: Arc<dyn ProgressSink>,
    config: SyncConfig,
}

enum Slot {
    Pending {
        post_id: String,
        slug: Slug,
        result_rx: oneshot::Receiver<Result<PathBuf, PostFailure>>,
    },
    Rejected(FailedPost),
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn ContentSource>,
        converter: Arc<dyn DocumentConverter>,
        config: SyncConfig,
    ) -> Self {
        Self {
            source,
            converter,
            sink: Arc::new(NoopProgressSink),
            config,
        }
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Full rebuild of the output directory.
    ///
    /// The index is fetched before anything is removed, so a failed fetch
    /// leaves the previous output in place. Per-post failures are collected in
    /// the report and never stop sibling posts.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let dir = &self.config.output_dir;
        ensure_output_dir(dir).map_err(SyncError::OutputDir)?;

        let posts = self.source.fetch_all_posts().await?;

        let removed = clear_managed_files(dir).map_err(SyncError::Clear)?;
        sync_info!("Removed {} stale files from {:?}", removed.len(), dir);

        let year = self.config.current_year.unwrap_or_else(current_year);
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let writer = AtomicFileWriter::new(dir.clone());

        let mut taken: HashMap<Slug, String> = HashMap::new();
        let mut slots = Vec::with_capacity(posts.len());
        for post in posts {
            let slug = slugify(&post.title);
            if let Some(first_post_id) = taken.get(&slug) {
                sync_warn!(
                    "post {} maps to slug `{}` already used by post {}; skipping",
                    post.id,
                    slug,
                    first_post_id
                );
                slots.push(Slot::Rejected(FailedPost {
                    post_id: post.id,
                    failure: PostFailure::SlugCollision {
                        slug: slug.clone(),
                        first_post_id: first_post_id.clone(),
                    },
                    slug,
                }));
                continue;
            }
            taken.insert(slug.clone(), post.id.clone());

            self.sink.emit(SyncEvent::Progress {
                post_id: post.id.clone(),
                stage: Stage::Queued,
            });
            let (result_tx, result_rx) = oneshot::channel();
            slots.push(Slot::Pending {
                post_id: post.id.clone(),
                slug: slug.clone(),
                result_rx,
            });

            let unit = PostUnit {
                post,
                slug,
                converter: self.converter.clone(),
                sink: self.sink.clone(),
                writer: writer.clone(),
                post_timeout: self.config.post_timeout,
                current_year: year,
            };
            let semaphore = semaphore.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let _ = result_tx.send(unit.run().await);
            });
        }

        let mut report = SyncReport {
            removed_stale: removed.len(),
            ..SyncReport::default()
        };
        for slot in slots {
            let (post_id, slug, result) = match slot {
                Slot::Rejected(failed) => {
                    self.sink.emit(SyncEvent::PostCompleted {
                        post_id: failed.post_id.clone(),
                        slug: failed.slug.clone(),
                        result: Err(failed.failure.clone()),
                    });
                    report.failed.push(failed);
                    continue;
                }
                Slot::Pending {
                    post_id,
                    slug,
                    result_rx,
                } => {
                    let result = result_rx.await.unwrap_or_else(|_| {
                        Err(PostFailure::Panicked(
                            "post unit exited without a result".to_string(),
                        ))
                    });
                    (post_id, slug, result)
                }
            };

            self.sink.emit(SyncEvent::PostCompleted {
                post_id: post_id.clone(),
                slug: slug.clone(),
                result: result.clone(),
            });
            match result {
                Ok(path) => {
                    sync_info!("wrote {}", slug.file_name());
                    report.written.push(WrittenPost {
                        post_id,
                        slug,
                        path,
                    });
                }
                Err(failure) => {
                    sync_warn!("post {} ({}) failed: {}", post_id, slug, failure);
                    report.failed.push(FailedPost {
                        post_id,
                        slug,
                        failure,
                    });
                }
            }
        }

        sync_info!(
            "Sync finished: {} written, {} failed",
            report.written.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

/// Everything one post needs, owned so it can move onto its own task.
struct PostUnit {
    post: PostSummary,
    slug: Slug,
    converter: Arc<dyn DocumentConverter>,
    sink: Arc<dyn ProgressSink>,
    writer: AtomicFileWriter,
    post_timeout: Duration,
    current_year: i32,
}

impl PostUnit {
    async fn run(self) -> Result<PathBuf, PostFailure> {
        self.stage(Stage::Converting);
        let raw = tokio::time::timeout(self.post_timeout, self.converter.convert(&self.post))
            .await
            .map_err(|_| PostFailure::Timeout {
                after: self.post_timeout,
            })??;

        self.stage(Stage::Normalizing);
        let normalized = normalize(&raw, self.current_year)?;

        self.stage(Stage::Writing);
        let writer = self.writer;
        let file_name = self.slug.file_name();
        tokio::task::spawn_blocking(move || writer.write(&file_name, &normalized.content))
            .await
            .map_err(|err| PostFailure::Panicked(err.to_string()))?
            .map_err(|err| PostFailure::Persist(err.to_string()))
    }

    fn stage(&self, stage: Stage) {
        self.sink.emit(SyncEvent::Progress {
            post_id: self.post.id.clone(),
            stage,
        });
    }
}
