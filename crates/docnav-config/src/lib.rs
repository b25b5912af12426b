//! Configuration management for docnav.
//!
//! Parses `docnav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `docs.source_dir`
//! - `docs.route_prefix`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override file watching.
    pub watch: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docnav.toml";

const DEFAULT_ROUTE_PREFIX: &str = "/docs";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Metadata configuration.
    pub metadata: MetadataConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    route_prefix: Option<String>,
    cache_ttl_secs: Option<u64>,
    watch: Option<bool>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug)]
pub struct DocsConfig {
    /// Root directory of the content store.
    pub source_dir: PathBuf,
    /// Project directory for docnav data (`.docnav/`).
    pub project_dir: PathBuf,
    /// Route prefix of document hrefs.
    pub route_prefix: String,
    /// Time-to-live of the cached navigation structure, in seconds.
    pub cache_ttl_secs: u64,
    /// Whether to watch the source directory for changes.
    pub watch: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
            project_dir: PathBuf::from(".docnav"),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_owned(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            watch: true,
        }
    }
}

impl DocsConfig {
    /// Time-to-live of the cached navigation structure.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// File holding the sidebar expand state (`.docnav/sidebar-state.json`).
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.project_dir.join("sidebar-state.json")
    }
}

/// Metadata configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Filename of directory metadata sidecar files.
    pub name: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            name: "meta.yaml".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DOCNAV_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docnav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(watch) = settings.watch {
            self.docs_resolved.watch = watch;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            metadata: MetadataConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                project_dir: base.join(".docnav"),
                ..DocsConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before resolving so expanded paths are joined to the config dir
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;

        if !docs.route_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "docs.route_prefix must start with /".to_owned(),
            ));
        }
        if docs.route_prefix.trim_end_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "docs.route_prefix cannot be the site root".to_owned(),
            ));
        }
        if docs.cache_ttl_secs == 0 {
            return Err(ConfigError::Validation(
                "docs.cache_ttl_secs must be greater than 0".to_owned(),
            ));
        }

        require_non_empty(&self.metadata.name, "metadata.name")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref source_dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(source_dir, "docs.source_dir")?);
        }
        if let Some(ref prefix) = self.docs.route_prefix {
            self.docs.route_prefix = Some(expand::expand_env(prefix, "docs.route_prefix")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = DocsConfig::default();

        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            project_dir: config_dir.join(".docnav"),
            route_prefix: self
                .docs
                .route_prefix
                .clone()
                .unwrap_or(defaults.route_prefix),
            cache_ttl_secs: self.docs.cache_ttl_secs.unwrap_or(defaults.cache_ttl_secs),
            watch: self.docs.watch.unwrap_or(defaults.watch),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(
            config.docs_resolved.state_file(),
            PathBuf::from("/test/.docnav/sidebar-state.json")
        );
        assert_eq!(config.docs_resolved.route_prefix, "/docs");
        assert_eq!(config.docs_resolved.cache_ttl(), Duration::from_secs(300));
        assert!(config.docs_resolved.watch);
        assert_eq!(config.metadata.name, "meta.yaml");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "content"
route_prefix = "/handbook"
cache_ttl_secs = 60
watch = false
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(
            config.docs_resolved.project_dir,
            PathBuf::from("/project/.docnav")
        );
        assert_eq!(config.docs_resolved.route_prefix, "/handbook");
        assert_eq!(config.docs_resolved.cache_ttl_secs, 60);
        assert!(!config.docs_resolved.watch);
    }

    #[test]
    fn test_load_from_file() {
        let (temp, path) = write_config(
            r#"
[server]
host = "0.0.0.0"
port = 9000

[metadata]
name = "_meta.yaml"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.metadata.name, "_meta.yaml");
        assert_eq!(config.docs_resolved.source_dir, temp.path().join("docs"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/docnav.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let (_temp, path) = write_config("[server\nport = ");

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_cli_settings_override() {
        let (_temp, path) = write_config("[server]\nport = 9000\n");
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(8080),
            source_dir: Some(PathBuf::from("/elsewhere")),
            watch: Some(false),
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/elsewhere"));
        assert!(!config.docs_resolved.watch);
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let (_temp, path) = write_config("");
        let settings = CliSettings {
            port: Some(0),
            ..Default::default()
        };

        let result = Config::load(Some(&path), Some(&settings));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_empty_host() {
        let (_temp, path) = write_config("[server]\nhost = \"\"\n");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: server.host cannot be empty"
        );
    }

    #[test]
    fn test_validate_port_zero() {
        let (_temp, path) = write_config("[server]\nport = 0\n");

        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_route_prefix() {
        for prefix in ["docs", "/"] {
            let (_temp, path) = write_config(&format!("[docs]\nroute_prefix = \"{prefix}\"\n"));

            assert!(
                matches!(
                    Config::load(Some(&path), None),
                    Err(ConfigError::Validation(_))
                ),
                "prefix {prefix:?}"
            );
        }
    }

    #[test]
    fn test_validate_zero_ttl() {
        let (_temp, path) = write_config("[docs]\ncache_ttl_secs = 0\n");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(err.to_string().contains("cache_ttl_secs"));
    }

    #[test]
    fn test_env_expansion_in_file() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("DOCNAV_TEST_PORTAL_PREFIX", "/portal");
        }
        let (_temp, path) = write_config(
            "[docs]\nroute_prefix = \"${DOCNAV_TEST_PORTAL_PREFIX}\"\nsource_dir = \"${DOCNAV_TEST_NO_DIR:-pages}\"\n",
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.route_prefix, "/portal");
        assert!(config.docs_resolved.source_dir.ends_with("pages"));
        unsafe {
            std::env::remove_var("DOCNAV_TEST_PORTAL_PREFIX");
        }
    }

    #[test]
    fn test_env_expansion_missing_var() {
        let (_temp, path) = write_config("[server]\nhost = \"${DOCNAV_TEST_NO_HOST}\"\n");

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::EnvVar { .. })));
    }
}
