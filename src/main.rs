//! hl12n CLI
//!
//! Command-line interface for the Harmonica L12 node traffic reporter

use clap::Parser;
use hl12n::cli::{Cli, Runner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging to stderr (stdout is reserved for report output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
