//! `docnav serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use docnav_config::{CliSettings, Config};
use docnav_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover docnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Watch the source directory for changes (default: enabled).
    #[arg(long)]
    watch: Option<bool>,

    /// Disable file watching.
    #[arg(long, conflicts_with = "watch")]
    no_watch: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let watch = self.resolve_watch();
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            watch,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        ensure_project_dir(&config.docs_resolved.project_dir)?;

        let docs = &config.docs_resolved;
        output.highlight(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!("Source directory: {}", docs.source_dir.display()));
        output.info(&format!("Route prefix: {}", docs.route_prefix));
        output.info(&format!("Structure cache TTL: {}s", docs.cache_ttl_secs));
        if docs.watch {
            output.info("File watching: enabled");
        } else {
            output.info("File watching: disabled");
        }
        if !docs.source_dir.is_dir() {
            output.warning("Source directory does not exist yet; serving an empty corpus");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `watch` from --watch/--no-watch flags.
    fn resolve_watch(&self) -> Option<bool> {
        self.no_watch.then_some(false).or(self.watch)
    }
}

/// Ensure the `.docnav/` project directory exists with a `.gitignore`.
fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)
        .map_err(|e| CliError::Server(format!("Failed to create project directory: {e}")))?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by docnav\n*\n");
    }

    Ok(())
}
