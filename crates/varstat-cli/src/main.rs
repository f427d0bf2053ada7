use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    deliver::{self, DeliverArgs},
    graphs::{self, GraphsArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;
mod project;
mod uploader;

#[derive(Parser, Debug)]
#[command(name = "varstat", about = "Chart and table generator for data dictionaries")]
struct Cli {
    /// Only log warnings and errors.
    #[arg(long, short, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate chart and table documents for every chartable field.
    Graphs(GraphsArgs),
    /// Generate documents and deliver them to a configured webserver.
    Deliver(DeliverArgs),
    /// Print the tool version.
    Version(VersionArgs),
}

fn init_tracing(quiet: bool) {
    let fallback = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    match cli.command {
        Command::Graphs(args) => graphs::run(&args),
        Command::Deliver(args) => deliver::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
