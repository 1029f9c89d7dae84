//! Latest outcome kept in a file
//!
//! The file is replaced atomically: the outcome is written to a sibling
//! temporary file which is then renamed over the target, so readers never
//! see a half-written document.

use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::ResultSinkPort;
use application::services::PollOutcome;
use async_trait::async_trait;
use tracing::debug;

/// Keeps the most recent outcome at a fixed path
#[derive(Debug, Clone)]
pub struct SnapshotFileSink {
    path: PathBuf,
}

impl SnapshotFileSink {
    /// Sink writing to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ResultSinkPort for SnapshotFileSink {
    async fn publish(&self, outcome: &PollOutcome) -> Result<(), ApplicationError> {
        let body = serde_json::to_vec_pretty(outcome)
            .map_err(|e| ApplicationError::Publish(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApplicationError::Publish(format!("{}: {e}", parent.display())))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, body)
            .await
            .map_err(|e| ApplicationError::Publish(format!("{}: {e}", temp.display())))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| ApplicationError::Publish(format!("{}: {e}", self.path.display())))?;

        debug!(path = %self.path.display(), "Snapshot written");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "snapshot-file"
    }
}
