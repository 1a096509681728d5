// Rust guideline compliant 2026-02-06

//! Unit tests for output formatting module.

use mands_cli::{create_formatter, StateEvaluation};
use mands_core::{
    BuildStatistics, Config, Effect, Fact, HeuristicValue, MergeAndShrink, Operator, Task,
    Variable,
};

fn two_switches() -> Task {
    Task {
        variables: vec![
            Variable {
                name: "a".to_string(),
                domain_size: 2,
            },
            Variable {
                name: "b".to_string(),
                domain_size: 2,
            },
        ],
        operators: vec![Operator {
            name: "set-both".to_string(),
            cost: 1,
            preconditions: Vec::new(),
            effects: vec![
                Effect {
                    fact: Fact::new(0, 1),
                    conditions: Vec::new(),
                },
                Effect {
                    fact: Fact::new(1, 1),
                    conditions: Vec::new(),
                },
            ],
        }],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(0, 1), Fact::new(1, 1)],
    }
}

fn create_test_statistics() -> BuildStatistics {
    MergeAndShrink::default()
        .build(&two_switches())
        .expect("Construction should succeed")
        .statistics()
        .clone()
}

fn create_test_evaluations() -> Vec<StateEvaluation> {
    vec![
        StateEvaluation {
            state: vec![0, 0],
            h: HeuristicValue::Value(1),
        },
        StateEvaluation {
            state: vec![1, 0],
            h: HeuristicValue::DeadEnd,
        },
    ]
}

#[test]
fn test_json_formatter_statistics() {
    let formatter = create_formatter("json");
    let output = formatter.format_statistics(&create_test_statistics());

    let json: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(json["merge_strategy"], "dfp");
    assert_eq!(json["solvable"], true);
    assert_eq!(json["final_size"], 2);
    assert_eq!(json["iterations"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_json_formatter_evaluations() {
    let formatter = create_formatter("json");
    let output = formatter.format_evaluations(&create_test_evaluations());

    let json: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
    assert_eq!(json["total"], 2);
    assert_eq!(json["evaluations"][0]["h"]["value"], 1);
    assert_eq!(json["evaluations"][1]["h"], "dead_end");
}

#[test]
fn test_json_formatter_error() {
    let formatter = create_formatter("json");
    let output = formatter.format_error("Test error message");

    assert!(output.contains("Test error message"));
    assert!(output.starts_with('{'));
}

#[test]
fn test_table_formatter_statistics() {
    let formatter = create_formatter("table");
    let output = formatter.format_statistics(&create_test_statistics());

    assert!(output.contains("Merge strategy:"));
    assert!(output.contains("dfp"));
    assert!(output.contains("bisimulation"));
    assert!(output.contains("Initial h:"));
    assert!(output.contains("Merged"));
    assert!(output.contains("0 + 1"));
}

#[test]
fn test_table_formatter_evaluations() {
    let formatter = create_formatter("table");
    let output = formatter.format_evaluations(&create_test_evaluations());

    assert!(output.contains("State"));
    assert!(output.contains("0,0"));
    assert!(output.contains("dead end"));
}

#[test]
fn test_table_formatter_empty_evaluations() {
    let formatter = create_formatter("table");
    assert_eq!(formatter.format_evaluations(&[]), "No states evaluated.");
}

#[test]
fn test_plain_formatter_evaluations() {
    let formatter = create_formatter("plain");
    let output = formatter.format_evaluations(&create_test_evaluations());

    assert_eq!(output, "0,0 1\n1,0 dead end\n");
}

#[test]
fn test_plain_formatter_statistics() {
    let formatter = create_formatter("plain");
    let output = formatter.format_statistics(&create_test_statistics());

    assert!(output.contains("Solvable: true\n"));
    assert!(output.contains("merge 0 1 -> 2 size 2 init_h +0\n"));
    assert!(output.contains("Imperfect from: -\n"));
    assert!(output.contains("Imperfect shrinking: 0.000\n"));
}

#[test]
fn test_config_formatters() {
    let config = Config::default();

    let toml_output = create_formatter("table").format_config(&config);
    assert!(toml_output.contains("max_states = 50000"));
    assert!(toml_output.contains("merge_strategy = \"dfp\""));

    let json_output = create_formatter("json").format_config(&config);
    let json: serde_json::Value = serde_json::from_str(&json_output).expect("valid JSON");
    assert_eq!(json["shrink_strategy"], "bisimulation");
}

#[test]
fn test_unknown_format_falls_back_to_table() {
    let formatter = create_formatter("yaml");
    assert_eq!(formatter.format_error("boom"), "Error: boom");
}
