//! Entry point for the `kubedeck` offline admin tool.
//!
//! Loads configuration, initializes logging, opens the local cluster store and
//! runs one subcommand against it.

use std::sync::Arc;

use clap::Parser;
use kubedeck_cli::{cli::Cli, command, config::Configuration, logging};
use kubedeck_persistence::{ClusterRepository, EmbeddedStore, FileBasedClusterRepository};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let configuration = Configuration::load(cli.config.as_deref())?;
    let _logging_guard = logging::init_logging(&configuration.logging_config())?;

    let store = match EmbeddedStore::open_default(configuration.store_options()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open cluster store: {}", e);
            return Err(e.into());
        }
    };
    info!(path = %store.path().display(), "Cluster store ready");

    let repository: Arc<dyn ClusterRepository> =
        Arc::new(FileBasedClusterRepository::new(Arc::new(store)));

    let mut stdout = std::io::stdout().lock();
    command::execute(repository.as_ref(), cli.command, &mut stdout).await
}
