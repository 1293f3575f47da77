//! Sensor value reporting client
//!
//! Submits one traffic reading to the remote API as a pair of sensor
//! values (daily and monthly) and returns the identifiers the API
//! assigned to them.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ReportResult, TrafficCounter};

/// Endpoint accepting traffic sensor values
const SENSOR_VALUES_PATH: &str = "/api/sensor_values/traffic";

/// Client for the remote sensor API
#[derive(Clone)]
pub struct ReportClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl ReportClient {
    /// Create a client for the sensor API at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("hl12n/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    /// Submit one traffic reading as sensor values
    ///
    /// Byte counts and the timestamp are forwarded exactly as polled.
    pub async fn submit(&self, counter: &TrafficCounter) -> Result<ReportResult> {
        let url = self.build_url(SENSOR_VALUES_PATH);
        let body = serde_json::json!({
            "daily": counter.daily,
            "monthly": counter.monthly,
            "timestamp": counter.timestamp_iso8601(),
        });
        debug!("Submitting sensor values to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let result: ReportResult = response.json().await?;
        debug!(
            "Created sensor values: daily={} monthly={}",
            result.daily.id, result.monthly.id
        );
        Ok(result)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"***")
            .finish_non_exhaustive()
    }
}
