//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, RunArgs, RunOnceArgs};
use crate::config::{self, EnvSource, RunConfig, RunOnceConfig};
use crate::cycle::Cycle;
use crate::error::Result;
use crate::report::ReportClient;
use crate::router::RouterClient;
use crate::schedule::{RecurringTask, TICK};
use crate::types::OptionStringExt;
use clap::CommandFactory;
use std::time::{Duration, Instant};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Some(Commands::Run(args)) => self.execute_run(args).await,
            Some(Commands::RunOnce(args)) => self.execute_run_once(args).await,
            None => self.print_help(),
        }
    }

    /// Snapshot the environment, overlaying the dotenv file when one is named
    ///
    /// The `--env_file` flag outranks the `ENV_FILE` variable; with neither
    /// set, no file is read at all.
    fn env_source(&self) -> Result<EnvSource> {
        let mut env = EnvSource::from_process();
        let path = self
            .cli
            .env_file
            .clone()
            .none_if_empty()
            .or_else(|| env.get(config::ENV_FILE));
        if let Some(path) = path {
            env.load_env_file(&path)?;
        }
        Ok(env)
    }

    /// Report traffic on a fixed interval until a cycle fails
    async fn execute_run(&self, args: &RunArgs) -> Result<()> {
        let env = self.env_source()?;
        let config = RunConfig::resolve(&args.overrides(), &env)?;
        let cycle = build_cycle(
            &config.router_url,
            &config.api_url,
            &config.api_token,
            config.output_timezone,
            config.timeout,
        );

        info!("Reporting traffic every {} seconds", config.output_interval);
        let mut task = RecurringTask::starting_now(Duration::from_secs(config.output_interval));
        loop {
            if task.is_due(Instant::now()) {
                cycle.execute().await?;
                task.advance(Instant::now());
            }
            tokio::time::sleep(TICK).await;
        }
    }

    /// Report traffic once
    async fn execute_run_once(&self, args: &RunOnceArgs) -> Result<()> {
        let env = self.env_source()?;
        let config = RunOnceConfig::resolve(&args.overrides(), &env)?;
        let cycle = build_cycle(
            &config.router_url,
            &config.api_url,
            &config.api_token,
            config.output_timezone,
            config.timeout,
        );

        cycle.execute().await?;
        Ok(())
    }

    /// Print top-level help
    fn print_help(&self) -> Result<()> {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        Ok(())
    }
}

/// Wire both HTTP clients into a reporting cycle
fn build_cycle(
    router_url: &str,
    api_url: &str,
    api_token: &str,
    timezone: chrono_tz::Tz,
    timeout: Duration,
) -> Cycle {
    let router = RouterClient::new(router_url, timeout, timezone);
    let report = ReportClient::new(api_url, api_token, timeout);
    Cycle::new(router, report)
}
