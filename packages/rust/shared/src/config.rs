//! Application configuration for EsgTracker.
//!
//! User config lives at `~/.esgtracker/esgtracker.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EsgTrackerError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "esgtracker.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".esgtracker";

// ---------------------------------------------------------------------------
// Config structs (matching esgtracker.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table file locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the three CSV tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Metrics table file name.
    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,

    /// Taxonomy table file name.
    #[serde(default = "default_taxonomy_file")]
    pub taxonomy_file: String,

    /// Ontology table file name.
    #[serde(default = "default_ontology_file")]
    pub ontology_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            metrics_file: default_metrics_file(),
            taxonomy_file: default_taxonomy_file(),
            ontology_file: default_ontology_file(),
        }
    }
}

fn default_data_dir() -> String {
    ".".into()
}
fn default_metrics_file() -> String {
    "gri_metrics.csv".into()
}
fn default_taxonomy_file() -> String {
    "taxonomy.csv".into()
}
fn default_ontology_file() -> String {
    "ontology.csv".into()
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format for list commands: "table", "json", or "csv".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "table".into()
}

// ---------------------------------------------------------------------------
// Resolved table paths (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved locations of the three CSV tables.
#[derive(Debug, Clone)]
pub struct TablePaths {
    /// Metrics table file.
    pub metrics: PathBuf,
    /// Taxonomy table file.
    pub taxonomy: PathBuf,
    /// Ontology table file.
    pub ontology: PathBuf,
}

impl TablePaths {
    /// Resolve paths from config, with an optional `--data-dir` flag winning
    /// over the configured data directory.
    pub fn resolve(config: &AppConfig, data_dir_flag: Option<&Path>) -> Self {
        let dir = data_dir_flag
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&config.storage.data_dir));

        Self {
            metrics: dir.join(&config.storage.metrics_file),
            taxonomy: dir.join(&config.storage.taxonomy_file),
            ontology: dir.join(&config.storage.ontology_file),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.esgtracker/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| EsgTrackerError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.esgtracker/esgtracker.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| EsgTrackerError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| EsgTrackerError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| EsgTrackerError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| EsgTrackerError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| EsgTrackerError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
