//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rehome/rehome.toml`
//! 3. Environment variables: `REHOME_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Raw settings for intermediate parsing (fields are Option to detect
/// "not specified", so unset fields inherit from the layer below).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub catalog: Option<PathBuf>,
    pub date_format: Option<String>,
}

/// Unified configuration for rehome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default catalog file used when the CLI gets no --catalog
    pub catalog: PathBuf,
    /// Default bucket format for date policies without an explicit format
    pub date_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            date_format: crate::infrastructure::catalog::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Default catalog location (~/.rehome/catalog.toml).
fn default_catalog_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".rehome").join("catalog.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.rehome/catalog.toml"))
}

/// Get the XDG config directory for rehome.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rehome").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rehome.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.catalog.to_string_lossy().as_ref());
        self.catalog = PathBuf::from(expanded);
    }

    /// Merge overlay config onto self (base). Overlay wins if Some.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            catalog: overlay
                .catalog
                .clone()
                .unwrap_or_else(|| self.catalog.clone()),
            date_format: overlay
                .date_format
                .clone()
                .unwrap_or_else(|| self.date_format.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rehome/rehome.toml`
    /// 3. Environment variables: `REHOME_*` prefix
    pub fn load() -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply REHOME_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder =
            Config::builder().add_source(Environment::with_prefix("REHOME").separator("__"));

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("catalog") {
            settings.catalog = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("date_format") {
            settings.date_format = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rehome configuration
#
# Location: ~/.config/rehome/rehome.toml
# Environment variables with a REHOME_ prefix override file values,
# e.g. REHOME_CATALOG=/tmp/catalog.toml

# Default catalog file (used when --catalog is not given)
# catalog = "~/.rehome/catalog.toml"

# Default bucket format for date policies
# date_format = "%Y/%m"
"#
        .to_string()
    }
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`. Falls back to the input on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
