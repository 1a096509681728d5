// Rust guideline compliant 2026-02-06

//! Tests for command helpers that do not spawn the binary.

use mands_cli::commands::eval::{evaluate, parse_state, validate_state};
use mands_cli::commands::{build, load_config, Overrides};
use mands_core::merge::MergeStrategyKind;
use mands_core::shrink::ShrinkStrategyKind;
use mands_core::{Config, HeuristicValue};
use std::fs;
use tempfile::TempDir;

/// A robot walks 0 -> 1 -> 2 and presses a button at 2.
const TASK_JSON: &str = r#"{
    "variables": [
        { "name": "robot", "domain_size": 3 },
        { "name": "button", "domain_size": 2 }
    ],
    "operators": [
        { "name": "walk-0-1", "cost": 1, "preconditions": [{ "var": 0, "value": 0 }],
          "effects": [{ "fact": { "var": 0, "value": 1 } }] },
        { "name": "walk-1-2", "cost": 2, "preconditions": [{ "var": 0, "value": 1 }],
          "effects": [{ "fact": { "var": 0, "value": 2 } }] },
        { "name": "press", "preconditions": [{ "var": 0, "value": 2 }, { "var": 1, "value": 0 }],
          "effects": [{ "fact": { "var": 1, "value": 1 } }] }
    ],
    "initial_state": [0, 0],
    "goals": [{ "var": 1, "value": 1 }]
}"#;

fn write_task(temp_dir: &TempDir) -> std::path::PathBuf {
    let path = temp_dir.path().join("task.json");
    fs::write(&path, TASK_JSON).expect("write task");
    path
}

#[test]
fn test_parse_state() {
    assert_eq!(parse_state("0,2,1").unwrap(), vec![0, 2, 1]);
    assert_eq!(parse_state(" 3 , 4 ").unwrap(), vec![3, 4]);
    assert!(parse_state("0,x").is_err());
    assert!(parse_state("0,-1").is_err());
    assert!(parse_state("").is_err());
}

#[test]
fn test_build_and_evaluate() {
    let temp_dir = TempDir::new().unwrap();
    let task_path = write_task(&temp_dir);

    let (task, heuristic) = build::run(&task_path, &Config::default()).unwrap();
    assert!(heuristic.is_solvable());

    let initial = evaluate(&task, &heuristic, &[]).unwrap();
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].state, vec![0, 0]);
    assert_eq!(initial[0].h, HeuristicValue::Value(4));

    let evaluations = evaluate(&task, &heuristic, &[vec![1, 0], vec![2, 1]]).unwrap();
    assert_eq!(evaluations[0].h, HeuristicValue::Value(3));
    assert_eq!(evaluations[1].h, HeuristicValue::Value(0));
}

#[test]
fn test_validate_state() {
    let temp_dir = TempDir::new().unwrap();
    let (task, heuristic) = build::run(&write_task(&temp_dir), &Config::default()).unwrap();

    assert!(validate_state(&task, &[2, 1]).is_ok());
    assert!(validate_state(&task, &[0]).is_err());
    assert!(validate_state(&task, &[3, 0]).is_err());
    assert!(evaluate(&task, &heuristic, &[vec![0, 2]]).is_err());
}

#[test]
fn test_build_missing_task_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = build::run(&temp_dir.path().join("missing.json"), &Config::default());
    assert!(result.is_err());
}

#[test]
fn test_build_invalid_task() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("task.json");
    fs::write(
        &path,
        r#"{ "variables": [], "operators": [], "initial_state": [], "goals": [] }"#,
    )
    .unwrap();
    assert!(build::run(&path, &Config::default()).is_err());
}

#[test]
fn test_load_config_from_file_with_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(
        &config_path,
        "max_states = 1000\nmax_states_before_merge = 800\nshrink_strategy = \"fh\"\n",
    )
    .unwrap();

    let config = load_config(Some(&config_path), &Overrides::default()).unwrap();
    assert_eq!(config.max_states, 1000);
    assert_eq!(config.shrink_strategy, ShrinkStrategyKind::Fh);

    let overrides = Overrides {
        max_states: Some(100),
        merge_strategy: Some("SCCS".to_string()),
        shrink_strategy: Some("bisimulation".to_string()),
        log_level: Some("debug".to_string()),
    };
    let config = load_config(Some(&config_path), &overrides).unwrap();
    assert_eq!(config.max_states, 100);
    assert_eq!(config.max_states_before_merge, 100);
    assert_eq!(config.merge_strategy, MergeStrategyKind::Sccs);
    assert_eq!(config.shrink_strategy, ShrinkStrategyKind::Bisimulation);
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_load_config_rejects_bad_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("missing.toml");

    let unknown_merge = Overrides {
        merge_strategy: Some("random".to_string()),
        ..Overrides::default()
    };
    assert!(load_config(Some(&config_path), &unknown_merge).is_err());

    let zero_states = Overrides {
        max_states: Some(0),
        ..Overrides::default()
    };
    assert!(load_config(Some(&config_path), &zero_states).is_err());

    let bad_level = Overrides {
        log_level: Some("loud".to_string()),
        ..Overrides::default()
    };
    assert!(load_config(Some(&config_path), &bad_level).is_err());
}
