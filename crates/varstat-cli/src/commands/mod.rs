pub mod deliver;
pub mod graphs;
pub mod version;

use std::path::PathBuf;

use clap::Args;
use varstat_graphs::{FieldOutcome, RunOpts, RunReport};

/// Flags shared by every generating subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Discard recorded progress and regenerate every field.
    #[arg(long, visible_alias = "no-resume")]
    pub clean: bool,
    /// Read at most this many rows from each subject file.
    #[arg(long)]
    pub rows: Option<usize>,
    /// Number of fields computed in parallel.
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
    /// Dataset root holding `.varstat.yml`, `variables/`, `domains/` and `csvs/`.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Restrict the run to these field ids.
    #[arg(value_name = "FIELD")]
    pub fields: Vec<String>,
}

impl RunArgs {
    pub fn opts(&self) -> RunOpts {
        RunOpts {
            clean: self.clean,
            only: self.fields.clone(),
            concurrency: self.concurrency.max(1),
            ..RunOpts::default()
        }
    }
}

pub fn print_summary(report: &RunReport) {
    for failure in report.failures() {
        if let FieldOutcome::DeliveryFailed { error, .. } | FieldOutcome::Failed { error } =
            &failure.outcome
        {
            eprintln!("{error}");
        }
    }
    println!(
        "{} generated, {} delivered, {} already done, {} skipped, {} failed",
        report.generated(),
        report.delivered(),
        report.already_done(),
        report.skipped(),
        report.failures().count()
    );
}
