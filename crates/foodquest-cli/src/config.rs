use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for foodquest.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (FOODQUEST_* prefix)
/// 3. Config file (~/.config/foodquest/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the restaurant catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/Dataset.csv
    /// - ENV: FOODQUEST_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/Dataset.csv"
    /// - Default: data/Dataset.csv
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to the SQLite user store.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: FOODQUEST_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/foodquest/foodquest.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Number of recommendations shown when `--top` is not given.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            database_path: default_db_path(),
            top_n: default_top_n(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("foodquest");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Apply `--catalog` and `--db` overrides.
    #[must_use]
    pub fn with_overrides(mut self, catalog: Option<PathBuf>, db: Option<PathBuf>) -> Self {
        if let Some(catalog) = catalog {
            self.catalog_path = catalog;
        }
        if let Some(db) = db {
            self.database_path = db;
        }
        self
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data").join("Dataset.csv")
}

/// Returns: ~/.local/share/foodquest/foodquest.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("foodquest")
        .join("foodquest.db")
}

const fn default_top_n() -> usize {
    foodquest_search::DEFAULT_TOP_N
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/foodquest/config.toml
/// - macOS: ~/Library/Application Support/foodquest/config.toml
/// - Windows: %APPDATA%\foodquest\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("foodquest")
        .join("config.toml")
}

pub fn example_config() -> &'static str {
    r#"# FoodQuest Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (FOODQUEST_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Restaurant catalog (CSV with Restaurant Name, City and Cuisines columns)
#
# Can also be set via:
# - CLI: foodquest --catalog /path/to/Dataset.csv recommend ...
# - Environment: FOODQUEST_CATALOG_PATH=/path/to/Dataset.csv
catalog_path = "data/Dataset.csv"

# Path to the SQLite database holding users, history and badges
#
# Can also be set via:
# - CLI: foodquest --db /custom/path.db user show asha
# - Environment: FOODQUEST_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/foodquest.db"

# Number of recommendations to show
top_n = 10
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
