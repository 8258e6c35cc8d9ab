mod config;
mod logging;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use postsync_engine::{
    HttpDocumentConverter, LoggingProgressSink, MediumContentSource, SyncOrchestrator, SyncReport,
};
use sync_logging::{sync_error, sync_info};

use crate::config::AppConfig;

const EXIT_POST_FAILURES: u8 = 1;
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let config = match config::load(Path::new(config::CONFIG_FILENAME)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("postsync: {err:#}");
            return ExitCode::from(EXIT_FATAL);
        }
    };
    logging::initialize(config.log_destination, config.log_level.into());

    match run(&config) {
        Ok(report) if report.is_success() => {
            sync_info!(
                "All {} posts written to {}",
                report.written_count(),
                config.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            for failed in &report.failed {
                sync_error!("{} ({}): {}", failed.post_id, failed.slug, failed.failure);
            }
            sync_error!(
                "{} of {} posts failed",
                report.failed.len(),
                report.failed.len() + report.written_count()
            );
            ExitCode::from(EXIT_POST_FAILURES)
        }
        Err(err) => {
            sync_error!("Sync aborted: {:#}", err);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(config: &AppConfig) -> anyhow::Result<SyncReport> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let fetch = config.fetch_settings();
    let source = MediumContentSource::new(config.source_settings(), fetch.clone());
    let converter = HttpDocumentConverter::new(fetch);
    let orchestrator =
        SyncOrchestrator::new(Arc::new(source), Arc::new(converter), config.sync_config())
            .with_progress_sink(Arc::new(LoggingProgressSink));

    let report = runtime
        .block_on(orchestrator.run())
        .context("sync failed")?;
    Ok(report)
}
