//! On-disk copies of raw departure monitor responses
//!
//! Only used in debug mode. Files are named `<epoch-ms>_<label>.json` and
//! hold the pretty-printed payload.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::error::TransitError;

/// Directory that raw responses are written to
#[derive(Debug, Clone)]
pub struct ResponseDump {
    dir: PathBuf,
}

impl ResponseDump {
    /// Open the dump directory, creating it if needed
    ///
    /// Creating an existing directory is not an error.
    ///
    /// # Errors
    ///
    /// [`TransitError::ConfigurationError`] when the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, TransitError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            TransitError::ConfigurationError(format!(
                "cannot create response directory {}: {e}",
                dir.display()
            ))
        })?;
        debug!(dir = %dir.display(), "Response dump directory ready");
        Ok(Self { dir })
    }

    /// Directory files are written to
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a response captured at `epoch_ms`
    #[must_use]
    pub fn file_name(epoch_ms: i64, label: &str) -> String {
        format!("{epoch_ms}_{label}.json")
    }

    /// Write `body` pretty-printed and return the file's path
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails. Callers treat
    /// this as non-fatal.
    pub async fn persist(&self, label: &str, body: &Value) -> Result<PathBuf, TransitError> {
        let path = self
            .dir
            .join(Self::file_name(Utc::now().timestamp_millis(), label));
        let pretty =
            serde_json::to_vec_pretty(body).map_err(|e| TransitError::ParseError(e.to_string()))?;

        tokio::fs::write(&path, pretty).await.map_err(|e| {
            TransitError::ConfigurationError(format!("cannot write {}: {e}", path.display()))
        })?;

        Ok(path)
    }
}
