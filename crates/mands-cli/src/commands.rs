// Rust guideline compliant 2026-02-06

//! Command implementations for the Mands CLI.

pub mod build;
pub mod config;
pub mod eval;

use anyhow::{Context, Result};
use mands_core::merge::MergeStrategyKind;
use mands_core::shrink::ShrinkStrategyKind;
use mands_core::Config;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mands.toml";

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Maximum abstraction size.
    pub max_states: Option<usize>,
    /// Merge strategy name, e.g. `sccs`.
    pub merge_strategy: Option<String>,
    /// Shrink strategy name, e.g. `fh`.
    pub shrink_strategy: Option<String>,
    /// Log level name.
    pub log_level: Option<String>,
}

/// Loads the effective configuration.
///
/// Defaults, then the config file (`mands.toml` unless `path` is given),
/// then `MANDS_*` environment variables, then command line overrides.
///
/// # Errors
///
/// Returns an error if the config file or an override is invalid.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(max_states) = overrides.max_states {
        config.max_states = max_states;
        config.max_states_before_merge = config.max_states_before_merge.min(max_states);
        config.shrink_threshold_before_merge =
            config.shrink_threshold_before_merge.min(max_states);
    }
    if let Some(name) = &overrides.merge_strategy {
        config.merge_strategy = parse_kind::<MergeStrategyKind>("merge strategy", name)?;
    }
    if let Some(name) = &overrides.shrink_strategy {
        config.shrink_strategy = parse_kind::<ShrinkStrategyKind>("shrink strategy", name)?;
    }
    if let Some(level) = &overrides.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn parse_kind<T: DeserializeOwned>(what: &str, name: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(name.trim().to_lowercase()))
        .with_context(|| format!("Unknown {}: {}", what, name))
}
