// Rust guideline compliant 2026-02-06

//! Implementation of the `mands eval` command.

use crate::commands::build;
use crate::output::{OutputFormatter, StateEvaluation};
use anyhow::{Context, Result};
use mands_core::{Config, MergeAndShrinkHeuristic, Task};
use std::path::Path;

/// Parses a state written as comma-separated values, e.g. `0,2,1`.
///
/// # Errors
///
/// Returns an error if a value is not a non-negative integer.
pub fn parse_state(input: &str) -> Result<Vec<usize>> {
    input
        .split(',')
        .map(|value| {
            value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid state value '{}' in '{}'", value, input))
        })
        .collect()
}

/// Checks that `state` assigns every task variable a value of its domain.
///
/// # Errors
///
/// Returns an error describing the first mismatch.
pub fn validate_state(task: &Task, state: &[usize]) -> Result<()> {
    if state.len() != task.num_variables() {
        anyhow::bail!(
            "State has {} values, but the task has {} variables",
            state.len(),
            task.num_variables()
        );
    }
    for (var, &value) in state.iter().enumerate() {
        if value >= task.domain_size(var) {
            anyhow::bail!(
                "Value {} of variable {} is outside its domain of size {}",
                value,
                task.variables[var].name,
                task.domain_size(var)
            );
        }
    }
    Ok(())
}

/// Evaluates states with a built heuristic. No states means the initial
/// state.
///
/// # Errors
///
/// Returns an error if a state does not fit the task.
pub fn evaluate(
    task: &Task,
    heuristic: &MergeAndShrinkHeuristic,
    states: &[Vec<usize>],
) -> Result<Vec<StateEvaluation>> {
    if states.is_empty() {
        return Ok(vec![StateEvaluation {
            state: task.initial_state.clone(),
            h: heuristic.compute_heuristic(&task.initial_state),
        }]);
    }

    states
        .iter()
        .map(|state| -> Result<StateEvaluation> {
            validate_state(task, state)?;
            Ok(StateEvaluation {
                state: state.clone(),
                h: heuristic.compute_heuristic(state),
            })
        })
        .collect()
}

/// Executes the eval command.
///
/// # Arguments
///
/// * `task_path` - Path to the JSON task
/// * `states` - States as comma-separated values
/// * `config` - Effective configuration
/// * `formatter` - Output formatter
///
/// # Errors
///
/// Returns an error if a state cannot be parsed or does not fit the task,
/// or if building the heuristic fails.
pub fn execute(
    task_path: &Path,
    states: &[String],
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let states = states
        .iter()
        .map(|state| parse_state(state))
        .collect::<Result<Vec<_>>>()?;
    let (task, heuristic) = build::run(task_path, config)?;
    let evaluations = evaluate(&task, &heuristic, &states)?;
    println!("{}", formatter.format_evaluations(&evaluations));
    Ok(())
}
