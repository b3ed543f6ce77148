//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_commerce::schema;
use storefront_db::Db;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file and environment.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::find_config(&cwd),
        };

        let mut config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// The configured database file.
    pub fn database_path(&self) -> PathBuf {
        self.resolve_path(&self.config.database.path)
    }

    /// Open the database with the configured timeout and migrate it.
    pub fn open_db(&self) -> Result<Db> {
        let path = self.database_path();
        self.output.debug(&format!("Opening database: {}", path.display()));

        let db = Db::open(&path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = self.config.storage_policy().apply(db)?;
        schema::migrate(&db).context("Failed to migrate database schema")?;
        Ok(db)
    }
}
