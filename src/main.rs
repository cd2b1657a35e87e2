use clap::Parser;
use log::{error, info};

use smarta::{default_data_dir, App, AppContext, Cli, Config};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    let outcome = cli
        .data_dir
        .map(Ok)
        .unwrap_or_else(default_data_dir)
        .map(|data_dir| Config::load(&data_dir))
        .and_then(AppContext::open)
        .and_then(|context| App::new(context, cli.verbose).run(cli.command));

    if let Err(e) = outcome {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
