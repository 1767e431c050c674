//! Micseg CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use micseg::application::ports::ConfigStore;
use micseg::cli::{
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    daemon_app::{run_daemon, DaemonOptions},
    daemon_cmd::handle_mic_command,
    presenter::Presenter,
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use micseg::domain::config::AppConfig;
use micseg::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Mic { action }) => {
            if let Err(e) = handle_mic_command(action, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    if !cli.daemon {
        presenter.error("Nothing to do. Run with --daemon or see --help");
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    // Resolve output directory: flag, then config file, then default
    let store = XdgConfigStore::new();
    let config = store.load().await.unwrap_or_else(|_| AppConfig::empty());
    let output_dir = cli
        .output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.output_dir_or_default());

    run_daemon(DaemonOptions { output_dir }).await
}
