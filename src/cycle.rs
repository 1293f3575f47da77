//! One reporting cycle
//!
//! Polls the router, prints the human-readable summary, submits the
//! reading to the remote API and prints the created identifiers. Both
//! modes (one-shot and continuous) run this same sequence.

use crate::error::Result;
use crate::report::ReportClient;
use crate::router::RouterClient;
use crate::types::ReportResult;

/// One poll-and-report execution over the two clients
#[derive(Debug, Clone)]
pub struct Cycle {
    router: RouterClient,
    report: ReportClient,
}

impl Cycle {
    /// Create a cycle over the two clients
    pub fn new(router: RouterClient, report: ReportClient) -> Self {
        Self { router, report }
    }

    /// Poll the router and forward the reading to the remote API
    ///
    /// The summary line and the two created-record lines go to stdout.
    /// The first failure aborts the cycle, so a router error means the
    /// report endpoint is never called.
    pub async fn execute(&self) -> Result<ReportResult> {
        let counter = self.router.fetch_traffic().await?;
        println!("{}", counter.summary());

        let result = self.report.submit(&counter).await?;
        println!("Created a daily sensor value ({}).", result.daily.id);
        println!("Created a monthly sensor value ({}).", result.monthly.id);

        Ok(result)
    }
}
