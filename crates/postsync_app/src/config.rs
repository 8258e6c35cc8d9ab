//! Optional `postsync.ron` in the working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use postsync_engine::{FetchSettings, SourceSettings, SyncConfig};
use serde::{Deserialize, Serialize};

use crate::logging::{LogDestination, LogLevel};

pub const CONFIG_FILENAME: &str = "postsync.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub profile_url: String,
    pub index_limit: u32,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub post_timeout_secs: u64,
    pub max_bytes: u64,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        let source = SourceSettings::default();
        let fetch = FetchSettings::default();
        let sync = SyncConfig::default();
        Self {
            profile_url: source.profile_url,
            index_limit: source.index_limit,
            output_dir: sync.output_dir,
            concurrency: sync.concurrency,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            post_timeout_secs: sync.post_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
            log_destination: LogDestination::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            profile_url: self.profile_url.clone(),
            index_limit: self.index_limit,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            output_dir: self.output_dir.clone(),
            concurrency: self.concurrency,
            post_timeout: Duration::from_secs(self.post_timeout_secs),
            current_year: None,
        }
    }
}

/// Missing file means defaults; an unreadable or malformed file is an error.
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    ron::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
