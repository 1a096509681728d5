// Rust guideline compliant 2026-02-06

//! Implementation of the `mands build` command.
//!
//! Builds the merge-and-shrink heuristic of a task and reports how the
//! construction went.

use crate::output::OutputFormatter;
use anyhow::{Context, Result};
use mands_core::{Config, MergeAndShrinkHeuristic, Task};
use std::path::Path;
use tracing::info;

/// Loads a task and builds its heuristic.
///
/// # Errors
///
/// Returns an error if the task cannot be loaded or the construction runs
/// out of memory.
pub fn run(task_path: &Path, config: &Config) -> Result<(Task, MergeAndShrinkHeuristic)> {
    let task = Task::load(task_path)
        .with_context(|| format!("Failed to load task from {}", task_path.display()))?;
    info!(
        task = %task_path.display(),
        variables = task.num_variables(),
        operators = task.operators.len(),
        "Loaded task"
    );

    let heuristic = config
        .clone()
        .into_builder()
        .build(&task)
        .context("Failed to build merge-and-shrink heuristic")?;
    Ok((task, heuristic))
}

/// Executes the build command.
///
/// # Arguments
///
/// * `task_path` - Path to the JSON task
/// * `config` - Effective configuration
/// * `formatter` - Output formatter
///
/// # Errors
///
/// Returns an error if [`run`] fails.
pub fn execute(task_path: &Path, config: &Config, formatter: &dyn OutputFormatter) -> Result<()> {
    let (_, heuristic) = run(task_path, config)?;
    println!("{}", formatter.format_statistics(heuristic.statistics()));
    Ok(())
}
