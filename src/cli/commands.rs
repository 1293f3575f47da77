//! CLI commands and argument parsing
//!
//! Flag spellings keep underscores (`--router_url`, `--env_file`) for
//! drop-in compatibility with existing deployments, so every multi-word
//! flag carries an explicit `long` name.

use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;

/// Harmonica L12 node traffic reporter CLI
#[derive(Parser, Debug)]
#[command(name = "hl12n")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dotenv file to overlay onto the process environment
    #[arg(long = "env_file", global = true)]
    pub env_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report traffic continuously on a fixed interval
    Run(RunArgs),

    /// Report traffic once and exit
    #[command(name = "run_once")]
    RunOnce(RunOnceArgs),
}

/// Arguments for continuous mode
///
/// Every flag is optional here; the config layer falls back to the
/// environment and reports what is still missing.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Router base URL
    #[arg(long = "router_url")]
    pub router_url: Option<String>,

    /// IANA timezone for reported timestamps
    #[arg(long = "output_timezone")]
    pub output_timezone: Option<String>,

    /// Seconds between reporting cycles
    #[arg(long = "output_interval")]
    pub output_interval: Option<String>,

    /// Sensor API base URL
    #[arg(long = "api_url")]
    pub api_url: Option<String>,

    /// Sensor API bearer token
    #[arg(long = "api_token")]
    pub api_token: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<String>,
}

impl RunArgs {
    /// Flag values in config-resolution form
    pub fn overrides(&self) -> Overrides {
        Overrides {
            router_url: self.router_url.clone(),
            output_timezone: self.output_timezone.clone(),
            output_interval: self.output_interval.clone(),
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
            timeout: self.timeout.clone(),
        }
    }
}

/// Arguments for one-shot mode
#[derive(Args, Debug)]
pub struct RunOnceArgs {
    /// Router base URL
    #[arg(long = "router_url")]
    pub router_url: Option<String>,

    /// IANA timezone for reported timestamps
    #[arg(long = "output_timezone")]
    pub output_timezone: Option<String>,

    /// Sensor API base URL
    #[arg(long = "api_url")]
    pub api_url: Option<String>,

    /// Sensor API bearer token
    #[arg(long = "api_token")]
    pub api_token: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<String>,
}

impl RunOnceArgs {
    /// Flag values in config-resolution form
    pub fn overrides(&self) -> Overrides {
        Overrides {
            router_url: self.router_url.clone(),
            output_timezone: self.output_timezone.clone(),
            api_url: self.api_url.clone(),
            api_token: self.api_token.clone(),
            timeout: self.timeout.clone(),
            ..Overrides::default()
        }
    }
}
