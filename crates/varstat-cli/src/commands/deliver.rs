use std::error::Error;

use clap::Args;
use tracing::info;
use varstat_core::Destination;
use varstat_graphs::Delivery;

use super::{print_summary, RunArgs};
use crate::project::Project;
use crate::uploader::DirectoryUploader;

#[derive(Args, Debug)]
pub struct DeliverArgs {
    /// Webserver name, or a unique case-insensitive prefix of one.
    pub environment: String,
    #[command(flatten)]
    pub run: RunArgs,
}

pub fn run(args: &DeliverArgs) -> Result<(), Box<dyn Error>> {
    let project = Project::load(&args.run.root, args.run.rows)?;
    let webserver = project.config.webserver(&args.environment)?;
    let uploader = DirectoryUploader::from_url(&webserver.url)?;
    let destination = Destination {
        name: webserver.name.to_lowercase(),
        url: webserver.url.clone(),
        slug: project.config.slug.clone(),
        version: project.version.clone(),
    };
    let pipeline = project.pipeline()?;
    info!(
        destination = %destination.name,
        target = %uploader.target_dir(&destination).display(),
        "delivering"
    );
    let report = pipeline.run(
        &args.run.opts(),
        Some(Delivery {
            destination: &destination,
            uploader: &uploader,
        }),
    )?;
    print_summary(&report);
    Ok(())
}
