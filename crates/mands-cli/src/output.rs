// Rust guideline compliant 2026-02-06

//! Output formatting module for the Mands CLI.
//!
//! This module renders build statistics, heuristic evaluations and the
//! effective configuration in various output formats (JSON, table, plain
//! text).

use mands_core::{BuildStatistics, Config, HeuristicValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{builder::Builder, settings::Style};

/// Heuristic value of one concrete state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEvaluation {
    /// Values of the task variables.
    pub state: Vec<usize>,
    /// Estimate of the abstraction heuristic.
    pub h: HeuristicValue,
}

/// Output formatter trait.
///
/// Defines the interface for rendering command results in different output
/// formats.
pub trait OutputFormatter {
    /// Formats the statistics of a merge-and-shrink construction.
    ///
    /// # Arguments
    /// * `stats` - The statistics to format
    ///
    /// # Returns
    /// A formatted string representation of the statistics
    fn format_statistics(&self, stats: &BuildStatistics) -> String;

    /// Formats heuristic values of concrete states.
    fn format_evaluations(&self, evaluations: &[StateEvaluation]) -> String;

    /// Formats the effective configuration.
    fn format_config(&self, config: &Config) -> String;

    /// Formats an error message for display.
    fn format_error(&self, error: &str) -> String;
}

/// Renders a heuristic value for humans.
pub fn display_value(value: HeuristicValue) -> String {
    match value {
        HeuristicValue::Value(h) => h.to_string(),
        HeuristicValue::DeadEnd => "dead end".to_string(),
    }
}

fn display_state(state: &[usize]) -> String {
    state
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn display_difference(difference: Option<i64>) -> String {
    match difference {
        Some(difference) => format!("{:+}", difference),
        None => "unsolvable".to_string(),
    }
}

fn summary_lines(stats: &BuildStatistics) -> Vec<(&'static str, String)> {
    vec![
        ("Merge strategy", stats.merge_strategy.clone()),
        ("Shrink strategy", stats.shrink_strategy.clone()),
        ("Variables", stats.num_variables.to_string()),
        ("Merges", stats.iterations.len().to_string()),
        ("Solvable", stats.solvable.to_string()),
        (
            "Final size",
            stats
                .final_size
                .map_or_else(|| "-".to_string(), |size| size.to_string()),
        ),
        (
            "Initial h",
            stats
                .initial_h
                .map_or_else(|| "-".to_string(), display_value),
        ),
        (
            "Remaining labels",
            stats
                .remaining_labels
                .last()
                .map_or_else(|| "-".to_string(), |labels| labels.to_string()),
        ),
        (
            "Negative improvements",
            stats.negative_improvements.to_string(),
        ),
        ("Fallback choices", stats.merge.fallback_choices.to_string()),
        (
            "Imperfect from",
            stats
                .first_imperfect_iteration
                .map_or_else(|| "-".to_string(), |i| (i + 1).to_string()),
        ),
        (
            "Imperfect shrinking",
            format!("{:.3}", stats.average_imperfect_shrinking),
        ),
        ("Elapsed (ms)", stats.elapsed_ms.to_string()),
    ]
}

/// JSON output formatter.
///
/// Formats results as valid JSON for machine consumption.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_statistics(&self, stats: &BuildStatistics) -> String {
        serde_json::to_string_pretty(stats)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize statistics" }).to_string())
    }

    fn format_evaluations(&self, evaluations: &[StateEvaluation]) -> String {
        let output = json!({
            "evaluations": evaluations,
            "total": evaluations.len(),
        });
        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize evaluations" }).to_string())
    }

    fn format_config(&self, config: &Config) -> String {
        serde_json::to_string_pretty(config)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize config" }).to_string())
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

/// Table output formatter.
///
/// Formats results as human-readable tables.
pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format_statistics(&self, stats: &BuildStatistics) -> String {
        let mut output = String::new();
        for (name, value) in summary_lines(stats) {
            output.push_str(&format!("{:<22} {}\n", format!("{}:", name), value));
        }

        if stats.iterations.is_empty() {
            return output;
        }

        let mut builder = Builder::default();
        builder.push_record(vec![
            "#".to_string(),
            "Merged".to_string(),
            "Sizes".to_string(),
            "Shrunk".to_string(),
            "Product".to_string(),
            "Init h".to_string(),
        ]);
        for (i, iteration) in stats.iterations.iter().enumerate() {
            builder.push_record(vec![
                (i + 1).to_string(),
                format!("{} + {}", iteration.merged.0, iteration.merged.1),
                format!(
                    "{} x {}",
                    iteration.sizes_before_shrinking.0, iteration.sizes_before_shrinking.1
                ),
                format!(
                    "{} x {}",
                    iteration.sizes_after_shrinking.0, iteration.sizes_after_shrinking.1
                ),
                format!("{} ({})", iteration.product_index, iteration.product_size),
                display_difference(iteration.init_h_difference),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());

        output.push('\n');
        output.push_str(&table.to_string());
        output
    }

    fn format_evaluations(&self, evaluations: &[StateEvaluation]) -> String {
        if evaluations.is_empty() {
            return "No states evaluated.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(vec!["State".to_string(), "h".to_string()]);
        for evaluation in evaluations {
            builder.push_record(vec![
                display_state(&evaluation.state),
                display_value(evaluation.h),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_config(&self, config: &Config) -> String {
        toml::to_string_pretty(config).unwrap_or_else(|e| format!("Error: {}", e))
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// Plain text output formatter.
///
/// Formats results as simple `key: value` lines without tables.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_statistics(&self, stats: &BuildStatistics) -> String {
        let mut output = String::new();
        for (name, value) in summary_lines(stats) {
            output.push_str(&format!("{}: {}\n", name, value));
        }
        for iteration in &stats.iterations {
            output.push_str(&format!(
                "merge {} {} -> {} size {} init_h {}\n",
                iteration.merged.0,
                iteration.merged.1,
                iteration.product_index,
                iteration.product_size,
                display_difference(iteration.init_h_difference)
            ));
        }
        output
    }

    fn format_evaluations(&self, evaluations: &[StateEvaluation]) -> String {
        let mut output = String::new();
        for evaluation in evaluations {
            output.push_str(&format!(
                "{} {}\n",
                display_state(&evaluation.state),
                display_value(evaluation.h)
            ));
        }
        output
    }

    fn format_config(&self, config: &Config) -> String {
        toml::to_string(config).unwrap_or_else(|e| format!("Error: {}", e))
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// Factory function to create an appropriate formatter.
///
/// # Arguments
/// * `format` - The desired output format ("json", "table", or "plain")
///
/// # Returns
/// A boxed OutputFormatter instance; unknown formats fall back to tables
pub fn create_formatter(format: &str) -> Box<dyn OutputFormatter> {
    match format {
        "json" => Box::new(JsonFormatter),
        "plain" => Box::new(PlainFormatter),
        _ => Box::new(TableFormatter),
    }
}
