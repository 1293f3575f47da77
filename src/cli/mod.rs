//! CLI module
//!
//! Command-line interface for the traffic reporter.
//!
//! # Commands
//!
//! - `run` - Report traffic continuously on a fixed interval
//! - `run_once` - Report traffic once and exit

mod commands;
mod runner;

pub use commands::{Cli, Commands, RunArgs, RunOnceArgs};
pub use runner::Runner;
