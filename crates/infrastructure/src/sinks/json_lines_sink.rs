//! One JSON document per line

use application::error::ApplicationError;
use application::ports::ResultSinkPort;
use application::services::PollOutcome;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

/// Writes each outcome as a single JSON line
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
    pretty: bool,
}

impl JsonLinesSink<Stdout> {
    /// Sink writing to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Sink writing to `writer`
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty: false,
        }
    }

    /// Pretty-print documents (they then span several lines)
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> ResultSinkPort for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn publish(&self, outcome: &PollOutcome) -> Result<(), ApplicationError> {
        let mut line = if self.pretty {
            serde_json::to_vec_pretty(outcome)
        } else {
            serde_json::to_vec(outcome)
        }
        .map_err(|e| ApplicationError::Publish(e.to_string()))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .await
            .map_err(|e| ApplicationError::Publish(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| ApplicationError::Publish(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "json-lines"
    }
}
