use sync_logging::sync_debug;

use crate::SyncEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: SyncEvent) {}
}

/// Forwards stage transitions to the debug log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgressSink;

impl ProgressSink for LoggingProgressSink {
    fn emit(&self, event: SyncEvent) {
        match event {
            SyncEvent::Progress { post_id, stage } => {
                sync_debug!("post {} -> {:?}", post_id, stage);
            }
            SyncEvent::PostCompleted {
                post_id,
                slug,
                result,
            } => {
                sync_debug!("post {} ({}) completed ok={}", post_id, slug, result.is_ok());
            }
        }
    }
}
