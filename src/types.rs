//! Common types used throughout hl12n
//!
//! This module contains the domain types shared by the router poller,
//! the reporting client and the execution cycle.

use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Decimal bytes-per-gigabyte divisor used for human-readable output
pub const BYTES_PER_GIGABYTE: f64 = 1_000_000_000.0;

// ============================================================================
// Traffic Counter
// ============================================================================

/// A snapshot of the router's traffic counters
///
/// Byte counts come from the router unchanged; the timestamp records when
/// the snapshot was taken, localized to the configured output timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficCounter {
    /// Bytes transferred since the start of the current day
    pub daily: u64,
    /// Bytes transferred since the start of the current month
    pub monthly: u64,
    /// When the snapshot was taken
    pub timestamp: DateTime<Tz>,
}

impl TrafficCounter {
    /// Create a new traffic counter snapshot
    pub fn new(daily: u64, monthly: u64, timestamp: DateTime<Tz>) -> Self {
        Self {
            daily,
            monthly,
            timestamp,
        }
    }

    /// Daily counter in decimal gigabytes
    pub fn daily_gigabytes(&self) -> f64 {
        self.daily as f64 / BYTES_PER_GIGABYTE
    }

    /// Monthly counter in decimal gigabytes
    pub fn monthly_gigabytes(&self) -> f64 {
        self.monthly as f64 / BYTES_PER_GIGABYTE
    }

    /// Timestamp as an ISO 8601 string with second precision
    ///
    /// Keeps the numeric UTC offset (`+00:00`, never `Z`) so the output
    /// width is stable across timezones.
    pub fn timestamp_iso8601(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// One-line summary printed after each successful poll
    pub fn summary(&self) -> String {
        format!(
            "{} Daily: {:.2}, Monthly: {:.2}",
            self.timestamp_iso8601(),
            self.daily_gigabytes(),
            self.monthly_gigabytes()
        )
    }
}

// ============================================================================
// Report Result
// ============================================================================

/// A record created on the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    /// Identifier assigned by the remote API
    pub id: i64,
}

/// Identifiers of the sensor values created by one report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    /// The created daily sensor value
    pub daily: CreatedRecord,
    /// The created monthly sensor value
    pub monthly: CreatedRecord,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
