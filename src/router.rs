//! Router traffic-meter client
//!
//! Reads the daily and monthly byte counters from the router's local HTTP
//! interface and stamps the reading with the configured output timezone.

use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::TrafficCounter;

/// Endpoint serving the router's traffic counters
const TRAFFIC_METER_PATH: &str = "/api/traffic_meter";

/// Raw counters as served by the router
#[derive(Debug, Deserialize)]
struct TrafficMeterResponse {
    daily: u64,
    monthly: u64,
}

/// Client for the router's local HTTP interface
#[derive(Debug, Clone)]
pub struct RouterClient {
    client: Client,
    base_url: String,
    timezone: Tz,
}

impl RouterClient {
    /// Create a client for the router at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration, timezone: Tz) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("hl12n/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            timezone,
        }
    }

    /// Fetch the current traffic counters
    ///
    /// The snapshot carries the poll time converted to the configured
    /// timezone; byte counts are taken from the router unchanged.
    pub async fn fetch_traffic(&self) -> Result<TrafficCounter> {
        let url = self.build_url(TRAFFIC_METER_PATH);
        debug!("Polling router traffic meter: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let meter: TrafficMeterResponse = response.json().await?;
        let timestamp = Utc::now().with_timezone(&self.timezone);
        debug!(
            "Router responded: daily={} monthly={}",
            meter.daily, meter.monthly
        );

        Ok(TrafficCounter::new(meter.daily, meter.monthly, timestamp))
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
