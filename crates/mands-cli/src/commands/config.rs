// Rust guideline compliant 2026-02-06

//! Implementation of the `mands config` command.

use crate::output::OutputFormatter;
use anyhow::{Context, Result};
use mands_core::Config;
use std::path::Path;

/// Executes the config command.
///
/// Prints the effective configuration, or writes it as TOML to `output`.
///
/// # Errors
///
/// Returns an error if the output file cannot be written.
pub fn execute(config: &Config, output: Option<&Path>, formatter: &dyn OutputFormatter) -> Result<()> {
    match output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Wrote configuration to {}", path.display());
        }
        None => println!("{}", formatter.format_config(config)),
    }
    Ok(())
}
