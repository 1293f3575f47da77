//! Configuration resolution for hl12n
//!
//! Settings are resolved per field from layered sources, highest priority
//! first:
//!
//! 1. explicit CLI flag
//! 2. process environment variable
//! 3. dotenv file value (path from `--env_file` or `ENV_FILE`)
//! 4. built-in default (timeout only)
//!
//! An empty string at any layer counts as unset at that layer. All
//! validation happens here, before any HTTP client is built.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::OptionStringExt;

// ============================================================================
// Environment Variables
// ============================================================================

/// Base URL of the router's local HTTP interface
pub const ENV_ROUTER_URL: &str = "HL12N_ROUTER_URL";

/// IANA timezone for reported timestamps
pub const ENV_OUTPUT_TIMEZONE: &str = "HL12N_OUTPUT_TIMEZONE";

/// Seconds between reporting cycles (continuous mode only)
pub const ENV_OUTPUT_INTERVAL: &str = "HL12N_OUTPUT_INTERVAL";

/// Base URL of the remote sensor API
pub const ENV_API_URL: &str = "HL12N_API_URL";

/// Bearer token for the remote sensor API
pub const ENV_API_TOKEN: &str = "HL12N_API_TOKEN";

/// HTTP timeout in fractional seconds
pub const ENV_TIMEOUT: &str = "HL12N_TIMEOUT";

/// Dotenv file path, read from the live process environment only
pub const ENV_FILE: &str = "ENV_FILE";

/// Timeout applied when no layer provides `HL12N_TIMEOUT`, in seconds
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 10.0;

// ============================================================================
// Environment Source
// ============================================================================

/// Merged view of the process environment and an optional dotenv file
///
/// Lookups treat the empty string as unset, so an empty variable at one
/// layer never shadows a value from a lower one.
#[derive(Clone, Default)]
pub struct EnvSource {
    values: HashMap<String, String>,
}

impl EnvSource {
    /// Snapshot the live process environment
    pub fn from_process() -> Self {
        Self {
            values: std::env::vars().collect(),
        }
    }

    /// Overlay variables from a dotenv file at `path`
    ///
    /// Live variables keep priority: a file value is taken only for keys
    /// the live environment leaves unset or empty. A missing file is
    /// tolerated; any other read or parse failure is an error.
    pub fn load_env_file(&mut self, path: &str) -> Result<()> {
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Env file not found, skipping: {}", path);
                return Ok(());
            }
            Err(err) => return Err(Error::env_file(path, err)),
        };

        let mut added = 0usize;
        for entry in entries {
            let (key, value) = entry.map_err(|err| Error::env_file(path, err))?;
            match self.values.get(&key) {
                Some(existing) if !existing.is_empty() => {}
                _ => {
                    self.values.insert(key, value);
                    added += 1;
                }
            }
        }
        debug!("Loaded {} values from env file {}", added, path);
        Ok(())
    }

    /// Look up a variable, treating the empty string as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned().none_if_empty()
    }
}

// The snapshot holds whatever the process environment held, secrets included
impl fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSource")
            .field("entries", &self.values.len())
            .finish_non_exhaustive()
    }
}

impl FromIterator<(String, String)> for EnvSource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for EnvSource {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

// ============================================================================
// Flag Overrides
// ============================================================================

/// Explicit per-field values that outrank every environment layer
///
/// Carried over from the CLI; `None` or an empty string falls through to
/// the environment. Numeric fields stay strings here so that a bad flag
/// value reports the same `InvalidConfigValue` as a bad variable.
#[derive(Clone, Default)]
pub struct Overrides {
    pub router_url: Option<String>,
    pub output_timezone: Option<String>,
    pub output_interval: Option<String>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout: Option<String>,
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("router_url", &self.router_url)
            .field("output_timezone", &self.output_timezone)
            .field("output_interval", &self.output_interval)
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Resolved Configs
// ============================================================================

/// Settings for continuous mode
#[derive(Clone)]
pub struct RunConfig {
    /// Base URL of the router's local HTTP interface
    pub router_url: String,
    /// Timezone applied to reported timestamps
    pub output_timezone: Tz,
    /// Seconds between reporting cycles
    pub output_interval: u64,
    /// Base URL of the remote sensor API
    pub api_url: String,
    /// Bearer token for the remote sensor API
    pub api_token: String,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl RunConfig {
    /// Resolve continuous-mode settings from flags and the merged environment
    pub fn resolve(overrides: &Overrides, env: &EnvSource) -> Result<Self> {
        Ok(Self {
            router_url: required(ENV_ROUTER_URL, overrides.router_url.as_ref(), env)?,
            output_timezone: resolve_timezone(overrides.output_timezone.as_ref(), env)?,
            output_interval: resolve_interval(overrides.output_interval.as_ref(), env)?,
            api_url: required(ENV_API_URL, overrides.api_url.as_ref(), env)?,
            api_token: required(ENV_API_TOKEN, overrides.api_token.as_ref(), env)?,
            timeout: resolve_timeout(overrides.timeout.as_ref(), env)?,
        })
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("router_url", &self.router_url)
            .field("output_timezone", &self.output_timezone)
            .field("output_interval", &self.output_interval)
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for one-shot mode
#[derive(Clone)]
pub struct RunOnceConfig {
    /// Base URL of the router's local HTTP interface
    pub router_url: String,
    /// Timezone applied to reported timestamps
    pub output_timezone: Tz,
    /// Base URL of the remote sensor API
    pub api_url: String,
    /// Bearer token for the remote sensor API
    pub api_token: String,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
}

impl RunOnceConfig {
    /// Resolve one-shot settings from flags and the merged environment
    pub fn resolve(overrides: &Overrides, env: &EnvSource) -> Result<Self> {
        Ok(Self {
            router_url: required(ENV_ROUTER_URL, overrides.router_url.as_ref(), env)?,
            output_timezone: resolve_timezone(overrides.output_timezone.as_ref(), env)?,
            api_url: required(ENV_API_URL, overrides.api_url.as_ref(), env)?,
            api_token: required(ENV_API_TOKEN, overrides.api_token.as_ref(), env)?,
            timeout: resolve_timeout(overrides.timeout.as_ref(), env)?,
        })
    }
}

impl fmt::Debug for RunOnceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOnceConfig")
            .field("router_url", &self.router_url)
            .field("output_timezone", &self.output_timezone)
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Field Resolution
// ============================================================================

fn layered(env_name: &str, flag: Option<&String>, env: &EnvSource) -> Option<String> {
    flag.cloned().none_if_empty().or_else(|| env.get(env_name))
}

fn required(env_name: &str, flag: Option<&String>, env: &EnvSource) -> Result<String> {
    layered(env_name, flag, env).ok_or_else(|| Error::missing_field(env_name))
}

fn resolve_timezone(flag: Option<&String>, env: &EnvSource) -> Result<Tz> {
    let name = required(ENV_OUTPUT_TIMEZONE, flag, env)?;
    match name.parse::<Tz>() {
        Ok(tz) => Ok(tz),
        Err(_) => Err(Error::unknown_timezone(name)),
    }
}

fn resolve_interval(flag: Option<&String>, env: &EnvSource) -> Result<u64> {
    let raw = required(ENV_OUTPUT_INTERVAL, flag, env)?;
    raw.parse::<u64>().map_err(|_| {
        Error::invalid_value(
            ENV_OUTPUT_INTERVAL,
            format!("not a whole number of seconds: '{raw}'"),
        )
    })
}

fn resolve_timeout(flag: Option<&String>, env: &EnvSource) -> Result<Duration> {
    let seconds = match layered(ENV_TIMEOUT, flag, env) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| Error::invalid_value(ENV_TIMEOUT, format!("not a number: '{raw}'")))?,
        None => DEFAULT_TIMEOUT_SECONDS,
    };
    // from_secs_f64 panics on non-finite or negative input
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(Error::invalid_value(
            ENV_TIMEOUT,
            format!("must be a positive number of seconds, got {seconds}"),
        ));
    }
    Ok(Duration::from_secs_f64(seconds))
}
