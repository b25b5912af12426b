//! CLI command implementations.

pub(crate) mod resolve;
pub(crate) mod serve;
pub(crate) mod structure;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use docnav_config::{CliSettings, Config};
use docnav_site::{Docs, DocsConfig};
use docnav_storage::FsStore;

pub(crate) use resolve::ResolveArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use structure::StructureArgs;

use crate::error::CliError;

/// Arguments locating the content store, shared by offline commands.
#[derive(Args)]
pub(crate) struct StoreArgs {
    /// Path to configuration file (default: auto-discover docnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl StoreArgs {
    /// Load configuration and open the content store it points at.
    fn open(self) -> Result<(Config, Docs), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            source_dir = %config.docs_resolved.source_dir.display(),
            config = ?config.config_path,
            "Opening content store"
        );
        let docs = open_docs(&config);
        Ok((config, docs))
    }
}

/// Build a navigator over the configured source directory.
pub(crate) fn open_docs(config: &Config) -> Docs {
    let docs_config = &config.docs_resolved;
    let store = FsStore::with_meta_filename(docs_config.source_dir.clone(), &config.metadata.name);
    Docs::new(
        Arc::new(store),
        DocsConfig {
            route_prefix: docs_config.route_prefix.clone(),
            cache_ttl: docs_config.cache_ttl(),
        },
    )
}
