//! `folio` binary.

use clap::Parser;

use folio_cli::cli::{Cli, Command};
use folio_cli::{commands, config_handlers, init_logging};
use folio_core::FolioConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let load = || -> anyhow::Result<FolioConfig> {
        let config = FolioConfig::load(config_path)?;
        tracing::debug!(remote = ?config.remote.kind, "Configuration loaded");
        Ok(config)
    };

    match cli.command {
        Command::Serve => commands::serve(load()?).await,
        Command::Sync => commands::sync(load()?).await,
        Command::Project { id, fetch } => commands::project(load()?, &id, fetch).await,
        Command::Comments { action } => commands::comments(load()?, action).await,
        Command::Typewriter { ticks, live } => commands::typewriter(load()?, ticks, live).await,
        Command::Config { action } => {
            config_handlers::handle_config_command(config_path, action)?;
            Ok(())
        }
    }
}
