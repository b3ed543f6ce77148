//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::StoragePolicy;
use storefront_observability::{LogFormat, LogLevel, LoggingConfig};
use storefront_server::ServerConfig;

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseSection,

    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply `STOREFRONT_*` overrides.
    ///
    /// `lookup` is `std::env::var` in the binary; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("STOREFRONT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("STOREFRONT_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("STOREFRONT_PORT is not a port number: {port}"))?;
        }
        if let Some(path) = lookup("STOREFRONT_DB") {
            self.database.path = path;
        }
        if let Some(level) = lookup("STOREFRONT_LOG") {
            self.logging.level = level.parse::<LogLevel>()?;
        }
        if let Some(format) = lookup("STOREFRONT_LOG_FORMAT") {
            self.logging.format = format.parse::<LogFormat>()?;
        }
        Ok(())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
        }
    }

    pub fn storage_policy(&self) -> StoragePolicy {
        StoragePolicy::from_millis(self.database.timeout_ms)
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    ServerConfig::default().host
}

fn default_port() -> u16 {
    ServerConfig::default().port
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// SQLite file, relative to the working directory unless absolute.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Bound on every storage call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_db_path() -> String {
    "storefront.db".to_string()
}

fn default_timeout_ms() -> u64 {
    StoragePolicy::default().timeout.as_millis() as u64
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Storefront configuration

[server]
host = "{host}"
port = {port}

[database]
path = "{path}"
# Upper bound for each storage call, in milliseconds.
timeout_ms = {timeout}

[logging]
# trace, debug, info, warn or error. RUST_LOG takes precedence.
level = "info"
# human or json
format = "human"
"#,
        host = default_host(),
        port = default_port(),
        path = default_db_path(),
        timeout = default_timeout_ms(),
    )
}
