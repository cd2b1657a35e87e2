use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    name = "smarta",
    version,
    about = "Local notes, communities and study search"
)]
pub struct Cli {
    /// Directory holding the application data (defaults to the platform data dir)
    #[clap(short = 'd', long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the smarta application
    #[clap(subcommand)]
    pub command: Commands,
}
