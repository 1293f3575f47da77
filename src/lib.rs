//! # hl12n
//!
//! Harmonica L12 node traffic reporter. Polls a home router's traffic
//! counters and forwards them to a remote sensor API, either once or on
//! a fixed interval.
//!
//! ## Features
//!
//! - **Layered configuration**: CLI flags over environment variables over
//!   an optional dotenv file, validated before any request is made
//! - **Zoned timestamps**: counters are stamped in a configurable IANA
//!   timezone at poll time and forwarded unchanged
//! - **Fixed-interval reporting**: one router poll and one API submission
//!   per cycle, rescheduled from cycle completion
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hl12n::config::{EnvSource, Overrides, RunOnceConfig};
//! use hl12n::cycle::Cycle;
//! use hl12n::report::ReportClient;
//! use hl12n::router::RouterClient;
//!
//! #[tokio::main]
//! async fn main() -> hl12n::Result<()> {
//!     let env = EnvSource::from_process();
//!     let config = RunOnceConfig::resolve(&Overrides::default(), &env)?;
//!
//!     let router = RouterClient::new(config.router_url, config.timeout, config.output_timezone);
//!     let report = ReportClient::new(config.api_url, config.api_token, config.timeout);
//!     let result = Cycle::new(router, report).execute().await?;
//!     println!("daily sensor value id: {}", result.daily.id);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and unit conversions
pub mod types;

/// Layered configuration resolution
pub mod config;

/// Fixed-interval scheduling
pub mod schedule;

/// Router HTTP client
pub mod router;

/// Sensor API client
pub mod report;

/// The poll-and-report cycle
pub mod cycle;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
