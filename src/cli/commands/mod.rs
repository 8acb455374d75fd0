//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `resolve`: Resolve a link, group id or external id
//! - `services`: Inspect the service directory
//! - `settings`: Show or save the effective configuration

mod resolve;
mod services;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::catalogue::{CatalogueApi, CatalogueClient};
use crate::config::{self, Config};
use crate::directory::{DirectoryConfig, ServiceDirectory};
use crate::resolver::Resolver;

pub use resolve::cmd_resolve;
pub use services::{cmd_service, cmd_services};
pub use settings::cmd_config;

/// Maestro CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalogue API base URL (overrides the config file)
    #[arg(long, env = "API_URL", global = true)]
    pub api_url: Option<String>,

    /// Public API base URL used for service logos (overrides the config file)
    #[arg(long, env = "PUBLIC_API_URL", global = true)]
    pub public_api_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Find a link's equivalents on every streaming service
    Resolve {
        /// Streaming link, group id, or `<artist|album|track>/<id>`
        input: String,
    },
    /// List every known streaming service
    Services,
    /// Look up one streaming service by key
    Service {
        /// Service key (e.g. spotify)
        key: String,
    },
    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

impl Cli {
    /// Config file values with command-line overrides applied
    pub fn effective_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(),
        };

        if let Some(api_url) = &self.api_url {
            config.catalogue.api_url = api_url.clone();
        }
        if let Some(public_api_url) = &self.public_api_url {
            config.catalogue.public_api_url = Some(public_api_url.clone());
        }
        config
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = cli.effective_config();

    rt.block_on(async {
        let resolver = build_resolver(&config)?;

        match &cli.command {
            Commands::Resolve { input } => cmd_resolve(&resolver, input).await,
            Commands::Services => cmd_services(&resolver).await,
            Commands::Service { key } => cmd_service(&resolver, key).await,
            Commands::Config { save } => Ok(cmd_config(&config, *save, cli.config.as_deref())?),
        }
    })
}

/// Wire the catalogue client, directory cache and resolver together
pub(crate) fn build_resolver(config: &Config) -> anyhow::Result<Resolver> {
    let client = CatalogueClient::with_timeout(
        config.catalogue.api_url.clone(),
        config.catalogue.public_api_url.clone(),
        config.catalogue.request_timeout(),
    )?;
    tracing::debug!(
        "Catalogue API at {} (public {})",
        client.base_url(),
        client.public_base_url()
    );

    let api: Arc<dyn CatalogueApi> = Arc::new(client);
    let directory = ServiceDirectory::new(api.clone(), DirectoryConfig::from(&config.directory));
    Ok(Resolver::new(api, directory))
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Message shown when the catalogue has nothing for the input
pub(crate) const NOTHING_FOUND: &str = "Sorry, we couldn't find anything...";
