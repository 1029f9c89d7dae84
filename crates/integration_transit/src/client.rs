//! TfNSW departure monitor client
//!
//! Issues `departure_mon` requests against the Open Data trip planner API
//! and hands back the raw JSON payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::TransitConfig;
use crate::dump::ResponseDump;
use crate::error::TransitError;
use crate::query::{DepartureMode, departure_monitor_params};

/// Path of the departure monitor endpoint below the base URL
pub const DEPARTURE_MONITOR_PATH: &str = "/v1/tp/departure_mon";

/// Trait for departure monitor clients
#[async_trait]
pub trait TransitClient: Send + Sync {
    /// Query upcoming departures for a station (trains) or stop (buses)
    ///
    /// `itd_date` is `YYYYMMDD` and `itd_time` is `HHmm`, transit-local.
    async fn fetch_departure_monitor(
        &self,
        mode: DepartureMode,
        identifier: &str,
        api_key: &str,
        itd_date: &str,
        itd_time: &str,
    ) -> Result<Value, TransitError>;
}

/// Departure monitor client for the TfNSW Open Data API
#[derive(Debug)]
pub struct TfnswTransitClient {
    client: Client,
    config: TransitConfig,
    dump: Option<ResponseDump>,
}

impl TfnswTransitClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        config.validate().map_err(TransitError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("nsw-departures/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransitError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            dump: None,
        })
    }

    /// Keep a copy of every successful response in `dump`
    #[must_use]
    pub fn with_response_dump(mut self, dump: ResponseDump) -> Self {
        self.dump = Some(dump);
        self
    }

    /// Whether responses are being dumped to disk
    #[must_use]
    pub const fn dumps_responses(&self) -> bool {
        self.dump.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{DEPARTURE_MONITOR_PATH}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn map_send_error(&self, e: &reqwest::Error) -> TransitError {
        if e.is_timeout() {
            TransitError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            TransitError::ConnectionFailed(e.to_string())
        }
    }

    /// Parse a response body into JSON
    fn parse_body(body: &str) -> Result<Value, TransitError> {
        serde_json::from_str(body).map_err(|e| TransitError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TransitClient for TfnswTransitClient {
    #[instrument(skip(self, mode, api_key), fields(mode = %mode))]
    async fn fetch_departure_monitor(
        &self,
        mode: DepartureMode,
        identifier: &str,
        api_key: &str,
        itd_date: &str,
        itd_time: &str,
    ) -> Result<Value, TransitError> {
        let url = self.endpoint();
        let params = departure_monitor_params(mode, identifier, itd_date, itd_time);

        debug!(?url, "Querying departure monitor");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(AUTHORIZATION, format!("apikey {api_key}"))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransitError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(TransitError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let json = Self::parse_body(&body)?;

        if let Some(dump) = &self.dump {
            match dump.persist(mode.label(), &json).await {
                Ok(path) => debug!(path = %path.display(), "Saved raw response"),
                Err(e) => warn!(error = %e, "Failed to save raw response"),
            }
        }

        Ok(json)
    }
}
