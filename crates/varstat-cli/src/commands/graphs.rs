use std::error::Error;

use clap::Args;
use tracing::info;

use super::{print_summary, RunArgs};
use crate::project::Project;

#[derive(Args, Debug)]
pub struct GraphsArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub fn run(args: &GraphsArgs) -> Result<(), Box<dyn Error>> {
    let project = Project::load(&args.run.root, args.run.rows)?;
    let pipeline = project.pipeline()?;
    let report = pipeline.run(&args.run.opts(), None)?;
    info!(
        out = %project.graphs_dir().display(),
        generated = report.generated(),
        "graphs written"
    );
    print_summary(&report);
    Ok(())
}
