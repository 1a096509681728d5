// Rust guideline compliant 2026-02-06

//! Configuration management for the merge-and-shrink construction.

use crate::label_reduction::{LabelReduction, LabelReductionMethod};
use crate::merge::{
    DfpOrder, InternalMergeOrder, MergeDfp, MergeLinear, MergeMaxPruning, MergeSccs,
    MergeStrategy, MergeStrategyKind, OrderOfSccs, VariableOrder,
};
use crate::shrink::ShrinkStrategyKind;
use crate::{Error, MergeAndShrink, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Log levels accepted by `log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuration of a merge-and-shrink run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum size of a product after shrinking.
    pub max_states: usize,

    /// Maximum size of each component before merging.
    pub max_states_before_merge: usize,

    /// Components at most this large are never shrunk.
    pub shrink_threshold_before_merge: usize,

    /// Shrink strategy.
    pub shrink_strategy: ShrinkStrategyKind,

    /// Merge strategy.
    pub merge_strategy: MergeStrategyKind,

    /// Scan order of DFP merging.
    pub dfp_order: DfpOrder,

    /// Variable order of linear merging.
    pub variable_order: VariableOrder,

    /// SCC order of SCC merging.
    pub order_of_sccs: OrderOfSccs,

    /// Merge order inside an SCC.
    pub internal_merge_order: InternalMergeOrder,

    /// Largest product tried by max-pruning merging.
    pub max_candidate_size: usize,

    /// Label reduction method.
    pub label_reduction: LabelReductionMethod,

    /// Reduce labels before shrinking.
    pub reduce_before_shrinking: bool,

    /// Reduce labels before merging.
    pub reduce_before_merging: bool,

    /// Memory reserved for a clean shutdown when running out of memory (MiB).
    pub memory_padding_mb: usize,

    /// Log level of the command line tool.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_states: 50_000,
            max_states_before_merge: 50_000,
            shrink_threshold_before_merge: 1,
            shrink_strategy: ShrinkStrategyKind::default(),
            merge_strategy: MergeStrategyKind::default(),
            dfp_order: DfpOrder::default(),
            variable_order: VariableOrder::default(),
            order_of_sccs: OrderOfSccs::default(),
            internal_merge_order: InternalMergeOrder::default(),
            max_candidate_size: 10_000,
            label_reduction: LabelReductionMethod::default(),
            reduce_before_shrinking: true,
            reduce_before_merging: false,
            memory_padding_mb: 75,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. The TOML file at `path`, if it exists
    /// 3. Environment variables with `MANDS_` prefix
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML
    /// - An environment variable has an invalid value
    /// - Configuration values fail validation
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| Error::InvalidConfig(format!("Invalid config file: {}", e)))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides, for runs without a file.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is invalid or validation fails.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment variable overrides.
    ///
    /// Every field `foo` can be overridden by `MANDS_FOO`. Enumerations use
    /// their snake_case names, e.g. `MANDS_MERGE_STRATEGY=sccs`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed.
    fn apply_env_overrides(&mut self) -> Result<()> {
        env_parse("MANDS_MAX_STATES", &mut self.max_states)?;
        env_parse(
            "MANDS_MAX_STATES_BEFORE_MERGE",
            &mut self.max_states_before_merge,
        )?;
        env_parse(
            "MANDS_SHRINK_THRESHOLD_BEFORE_MERGE",
            &mut self.shrink_threshold_before_merge,
        )?;
        env_enum("MANDS_SHRINK_STRATEGY", &mut self.shrink_strategy)?;
        env_enum("MANDS_MERGE_STRATEGY", &mut self.merge_strategy)?;
        env_enum("MANDS_DFP_ORDER", &mut self.dfp_order)?;
        env_enum("MANDS_VARIABLE_ORDER", &mut self.variable_order)?;
        env_enum("MANDS_ORDER_OF_SCCS", &mut self.order_of_sccs)?;
        env_enum("MANDS_INTERNAL_MERGE_ORDER", &mut self.internal_merge_order)?;
        env_parse("MANDS_MAX_CANDIDATE_SIZE", &mut self.max_candidate_size)?;
        env_enum("MANDS_LABEL_REDUCTION", &mut self.label_reduction)?;
        env_parse(
            "MANDS_REDUCE_BEFORE_SHRINKING",
            &mut self.reduce_before_shrinking,
        )?;
        env_parse("MANDS_REDUCE_BEFORE_MERGING", &mut self.reduce_before_merging)?;
        env_parse("MANDS_MEMORY_PADDING_MB", &mut self.memory_padding_mb)?;
        if let Ok(val) = std::env::var("MANDS_LOG_LEVEL") {
            self.log_level = val;
        }
        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - max_states or max_states_before_merge is zero
    /// - max_states_before_merge exceeds max_states
    /// - shrink_threshold_before_merge is zero or exceeds max_states
    /// - log_level is not a known level
    pub fn validate(&self) -> Result<()> {
        if self.max_states == 0 {
            return Err(Error::InvalidConfig(
                "max_states must be greater than 0".to_string(),
            ));
        }
        if self.max_states_before_merge == 0 {
            return Err(Error::InvalidConfig(
                "max_states_before_merge must be greater than 0".to_string(),
            ));
        }
        if self.max_states_before_merge > self.max_states {
            return Err(Error::InvalidConfig(format!(
                "max_states_before_merge ({}) must not exceed max_states ({})",
                self.max_states_before_merge, self.max_states
            )));
        }
        if self.shrink_threshold_before_merge == 0
            || self.shrink_threshold_before_merge > self.max_states
        {
            return Err(Error::InvalidConfig(format!(
                "shrink_threshold_before_merge must be 1-{}, got {}",
                self.max_states, self.shrink_threshold_before_merge
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::InvalidConfig(format!(
                "log_level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Ok(())
    }

    /// Saves the configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The merge strategy described by this configuration.
    pub fn build_merge_strategy(&self) -> Box<dyn MergeStrategy> {
        match self.merge_strategy {
            MergeStrategyKind::Dfp => Box::new(MergeDfp::new(self.dfp_order)),
            MergeStrategyKind::Linear => Box::new(MergeLinear::new(self.variable_order)),
            MergeStrategyKind::Sccs => Box::new(MergeSccs::new(
                self.order_of_sccs,
                self.internal_merge_order,
            )),
            MergeStrategyKind::MaxPruning => {
                Box::new(MergeMaxPruning::new(self.max_candidate_size))
            }
        }
    }

    /// Assembles the construction described by this configuration.
    pub fn into_builder(self) -> MergeAndShrink {
        MergeAndShrink::new(self.build_merge_strategy(), self.shrink_strategy.build())
            .with_label_reduction(LabelReduction::new(
                self.reduce_before_shrinking,
                self.reduce_before_merging,
                self.label_reduction,
            ))
            .with_max_states(self.max_states)
            .with_max_states_before_merge(self.max_states_before_merge)
            .with_shrink_threshold_before_merge(self.shrink_threshold_before_merge)
            .with_memory_padding_mb(self.memory_padding_mb)
    }
}

fn env_parse<T: FromStr>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(val) = std::env::var(name) {
        *target = val
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("{} has an invalid value: {}", name, val)))?;
    }
    Ok(())
}

fn env_enum<T: DeserializeOwned>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(val) = std::env::var(name) {
        *target = serde_json::from_value(serde_json::Value::String(val.trim().to_lowercase()))
            .map_err(|_| Error::InvalidConfig(format!("{} has an invalid value: {}", name, val)))?;
    }
    Ok(())
}
