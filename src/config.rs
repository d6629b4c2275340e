//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ktree/ktree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `KTREE_*` prefix
//!
//! Command line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::traversal::Order;
use crate::tree::DEFAULT_ARITY;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("environment: {0}")]
    Env(String),

    #[error("invalid arity: {0} (must be at least 1)")]
    InvalidArity(usize),
}

/// Settings for building and walking trees from the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Maximum children per node (default: 2)
    pub arity: usize,
    /// Order used by `walk` when none is given (default: depth-first)
    pub order: Order,
    /// Refuse pre/post/in-order on non-binary trees instead of falling back to depth-first
    pub strict_orders: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arity: DEFAULT_ARITY,
            order: Order::DepthFirst,
            strict_orders: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub arity: Option<usize>,
    pub order: Option<Order>,
    pub strict_orders: Option<bool>,
}

impl RawSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        match self.arity {
            Some(0) => Err(SettingsError::InvalidArity(0)),
            _ => Ok(()),
        }
    }
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ktree").map(|dirs| dirs.config_dir().join("ktree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawSettings = toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    raw.validate()?;
    Ok(raw)
}

/// Absent keys are `None`; any other lookup failure is an error.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, SettingsError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(SettingsError::Env(e.to_string())),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            arity: overlay.arity.unwrap_or(self.arity),
            order: overlay.order.unwrap_or(self.order),
            strict_orders: overlay.strict_orders.unwrap_or(self.strict_orders),
        }
    }

    /// Load settings from the global config, an optional explicit file and
    /// `KTREE_*` environment variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let global = global_config_path();
        Self::load_layers(
            global.as_deref(),
            config_file,
            Environment::with_prefix("KTREE"),
        )
    }

    /// Load settings from explicit layers.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    /// Every layer is validated before it is merged.
    #[instrument(level = "debug", skip(env))]
    pub fn load_layers(
        global: Option<&Path>,
        config_file: Option<&Path>,
        env: Environment,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global.filter(|p| p.exists()) {
            debug!("Loading global config: {}", global_path.display());
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        if let Some(path) = config_file {
            debug!("Loading config file: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current.apply_env_overrides(env)
    }

    /// Apply environment variables as explicit overrides.
    fn apply_env_overrides(self, env: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(env.prefix_separator("_").separator("__"))
            .build()
            .map_err(|e| SettingsError::Env(e.to_string()))?;

        let arity = env_value(config.get_string("arity"))?
            .map(|val| {
                val.trim()
                    .parse::<usize>()
                    .map_err(|_| SettingsError::Env(format!("arity is not a number: {val}")))
            })
            .transpose()?;
        let order = env_value(config.get_string("order"))?
            .map(|val| val.parse::<Order>().map_err(SettingsError::Env))
            .transpose()?;
        let overlay = RawSettings {
            arity,
            order,
            strict_orders: env_value(config.get_bool("strict_orders"))?,
        };

        overlay.validate()?;
        Ok(self.merge_with(&overlay))
    }

    /// Apply command line flags, the highest layer.
    pub fn apply_flags(self, arity: Option<usize>, strict: bool) -> Result<Self, SettingsError> {
        let overlay = RawSettings {
            arity,
            order: None,
            strict_orders: strict.then_some(true),
        };
        overlay.validate()?;
        Ok(self.merge_with(&overlay))
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_overlay_values_when_merging_then_keeps_base() {
        let base = Settings {
            arity: 4,
            order: Order::Heap,
            strict_orders: true,
        };
        assert_eq!(base.merge_with(&RawSettings::default()), base);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_given_fields_change() {
        let overlay = RawSettings {
            arity: Some(3),
            ..Default::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.arity, 3);
        assert_eq!(merged.order, Order::DepthFirst);
        assert!(!merged.strict_orders);
    }

    #[test]
    fn given_flags_when_applied_then_override_loaded_settings() {
        let merged = Settings::default().apply_flags(Some(4), true).unwrap();
        assert_eq!(merged.arity, 4);
        assert!(merged.strict_orders);

        let unchanged = merged.clone().apply_flags(None, false).unwrap();
        assert_eq!(unchanged, merged);
    }

    #[test]
    fn given_zero_arity_flag_when_applied_then_invalid_arity() {
        let result = Settings::default().apply_flags(Some(0), false);
        assert!(matches!(result, Err(SettingsError::InvalidArity(0))));
    }
}
