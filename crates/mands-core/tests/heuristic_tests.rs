// Rust guideline compliant 2026-02-06

//! End-to-end tests of the merge-and-shrink construction.

use mands_core::merge::{MergeLinear, VariableOrder};
use mands_core::shrink::{ShrinkBisimulation, ShrinkFh};
use mands_core::{
    Config, Effect, Fact, HeuristicValue, LabelReduction, LabelReductionMethod, MergeAndShrink,
    Operator, Task, Variable,
};

fn var(name: &str, domain_size: usize) -> Variable {
    Variable {
        name: name.to_string(),
        domain_size,
    }
}

fn op(name: &str, cost: u32, pre: &[(usize, usize)], eff: &[(usize, usize)]) -> Operator {
    Operator {
        name: name.to_string(),
        cost,
        preconditions: pre.iter().map(|&(v, d)| Fact::new(v, d)).collect(),
        effects: eff
            .iter()
            .map(|&(v, d)| Effect {
                fact: Fact::new(v, d),
                conditions: Vec::new(),
            })
            .collect(),
    }
}

fn two_switches() -> Task {
    Task {
        variables: vec![var("a", 2), var("b", 2)],
        operators: vec![op("set-both", 1, &[], &[(0, 1), (1, 1)])],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(0, 1), Fact::new(1, 1)],
    }
}

fn unreachable_goal() -> Task {
    Task {
        variables: vec![var("a", 3), var("b", 2)],
        operators: vec![
            op("step", 1, &[(0, 0)], &[(0, 1)]),
            op("flip", 1, &[], &[(1, 1)]),
        ],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(0, 2)],
    }
}

/// A robot walks 0 -> 1 -> 2, then may press a button that needs it at 2.
/// Walking back is possible but expensive.
fn walk_and_press() -> Task {
    Task {
        variables: vec![var("robot", 3), var("button", 2)],
        operators: vec![
            op("walk-0-1", 1, &[(0, 0)], &[(0, 1)]),
            op("walk-1-2", 2, &[(0, 1)], &[(0, 2)]),
            op("walk-2-0", 5, &[(0, 2)], &[(0, 0)]),
            op("press", 1, &[(0, 2), (1, 0)], &[(1, 1)]),
        ],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(1, 1)],
    }
}

#[test]
fn test_two_switches() {
    let heuristic = MergeAndShrink::default()
        .build(&two_switches())
        .expect("Construction should succeed");
    assert!(heuristic.is_solvable());
    assert_eq!(heuristic.compute_heuristic(&[0, 0]), HeuristicValue::Value(1));
    assert_eq!(heuristic.compute_heuristic(&[1, 1]), HeuristicValue::Value(0));
    // Unreachable from the initial state, hence pruned.
    assert!(heuristic.compute_heuristic(&[1, 0]).is_dead_end());

    let stats = heuristic.statistics();
    assert_eq!(stats.merge_strategy, "dfp");
    assert_eq!(stats.shrink_strategy, "bisimulation");
    assert_eq!(stats.num_variables, 2);
    assert_eq!(stats.iterations.len(), 1);
    assert_eq!(stats.iterations[0].merged, (0, 1));
    assert_eq!(stats.iterations[0].product_size, 2);
    assert_eq!(stats.init_h_improvements, vec![0]);
    assert_eq!(stats.negative_improvements, 0);
    assert!(stats.solvable);
    assert_eq!(stats.final_size, Some(2));
    assert_eq!(stats.initial_h, Some(HeuristicValue::Value(1)));
    assert_eq!(stats.remaining_labels.first(), Some(&1));
}

#[test]
fn test_unsolvable_task_gives_dead_ends() {
    let heuristic = MergeAndShrink::default().build(&unreachable_goal()).unwrap();
    assert!(!heuristic.is_solvable());
    for a in 0..3 {
        for b in 0..2 {
            assert_eq!(heuristic.compute_heuristic(&[a, b]), HeuristicValue::DeadEnd);
        }
    }
    let stats = heuristic.statistics();
    assert!(stats.iterations.is_empty());
    assert!(!stats.solvable);
    assert_eq!(stats.final_size, None);
    assert_eq!(stats.initial_h, Some(HeuristicValue::DeadEnd));
}

#[test]
fn test_exact_without_size_pressure() {
    let heuristic = MergeAndShrink::default().build(&walk_and_press()).unwrap();
    assert_eq!(heuristic.compute_heuristic(&[0, 0]).value(), Some(4));
    assert_eq!(heuristic.compute_heuristic(&[1, 0]).value(), Some(3));
    assert_eq!(heuristic.compute_heuristic(&[2, 0]).value(), Some(1));
    assert_eq!(heuristic.compute_heuristic(&[2, 1]).value(), Some(0));
    assert!(heuristic.factored_transition_system().is_finalized());
}

#[test]
fn test_single_variable_task() {
    let task = Task {
        variables: vec![var("counter", 3)],
        operators: vec![
            op("inc0", 2, &[(0, 0)], &[(0, 1)]),
            op("inc1", 3, &[(0, 1)], &[(0, 2)]),
        ],
        initial_state: vec![0],
        goals: vec![Fact::new(0, 2)],
    };
    let heuristic = MergeAndShrink::default().build(&task).unwrap();
    assert!(heuristic.statistics().iterations.is_empty());
    assert_eq!(heuristic.compute_heuristic(&[0]), HeuristicValue::Value(5));
    assert_eq!(heuristic.compute_heuristic(&[1]), HeuristicValue::Value(3));
}

#[test]
fn test_small_limit_stays_admissible() {
    let heuristic = MergeAndShrink::new(
        Box::new(MergeLinear::new(VariableOrder::Index)),
        Box::new(ShrinkFh::default()),
    )
    .with_max_states(2)
    .with_max_states_before_merge(2)
    .with_label_reduction(LabelReduction::new(
        false,
        true,
        LabelReductionMethod::TwoTransitionSystems,
    ))
    .build(&walk_and_press())
    .unwrap();

    assert!(heuristic.is_solvable());
    let h = heuristic
        .compute_heuristic(&[0, 0])
        .value()
        .expect("Initial state is not a dead end");
    assert!(h <= 4, "h = {} exceeds the optimal cost 4", h);
    let iteration = &heuristic.statistics().iterations[0];
    assert!(iteration.sizes_after_shrinking.0 * iteration.sizes_after_shrinking.1 <= 2);
}

#[test]
fn test_imperfect_shrinking_is_tracked() {
    let heuristic = MergeAndShrink::new(
        Box::new(MergeLinear::new(VariableOrder::Index)),
        Box::new(ShrinkFh::default()),
    )
    .with_max_states(2)
    .with_max_states_before_merge(2)
    .with_label_reduction(LabelReduction::new(
        false,
        true,
        LabelReductionMethod::TwoTransitionSystems,
    ))
    .build(&walk_and_press())
    .unwrap();

    // Both components collapse to one state. All robot positions have goal
    // distance 0, the two button states do not.
    let stats = heuristic.statistics();
    assert_eq!(stats.iterations[0].sizes_after_shrinking, (1, 1));
    assert_eq!(stats.miss_qualified_ratios, vec![0.0, 1.0]);
    assert_eq!(stats.first_imperfect_iteration, Some(0));
    assert_eq!(stats.average_imperfect_shrinking, 0.5);
}

#[test]
fn test_perfect_shrinking_without_size_pressure() {
    let heuristic = MergeAndShrink::default().build(&walk_and_press()).unwrap();
    let stats = heuristic.statistics();
    assert_eq!(stats.miss_qualified_ratios.len(), 2 * stats.iterations.len());
    assert!(stats.miss_qualified_ratios.iter().all(|&ratio| ratio == 0.0));
    assert_eq!(stats.first_imperfect_iteration, None);
    assert_eq!(stats.average_imperfect_shrinking, 0.0);
}

#[test]
fn test_without_label_reduction() {
    let heuristic = MergeAndShrink::new(
        Box::new(MergeLinear::default()),
        Box::new(ShrinkBisimulation::new()),
    )
    .with_label_reduction(LabelReduction::new(
        false,
        false,
        LabelReductionMethod::AllTransitionSystems,
    ))
    .build(&walk_and_press())
    .unwrap();
    assert_eq!(heuristic.compute_heuristic(&[0, 0]), HeuristicValue::Value(4));
    assert_eq!(heuristic.statistics().remaining_labels, vec![4]);
}

#[test]
fn test_memory_padding_is_released() {
    let heuristic = MergeAndShrink::default()
        .with_memory_padding_mb(1)
        .build(&two_switches())
        .unwrap();
    assert_eq!(heuristic.compute_heuristic(&[0, 0]), HeuristicValue::Value(1));
}

#[test]
fn test_builder_from_config() {
    let config = Config {
        merge_strategy: mands_core::merge::MergeStrategyKind::Sccs,
        shrink_strategy: mands_core::shrink::ShrinkStrategyKind::Fh,
        ..Config::default()
    };
    let heuristic = config.into_builder().build(&walk_and_press()).unwrap();
    let stats = heuristic.statistics();
    assert_eq!(stats.merge_strategy, "sccs");
    assert_eq!(stats.shrink_strategy, "f-preserving");
    assert_eq!(heuristic.compute_heuristic(&[0, 0]), HeuristicValue::Value(4));
}

#[test]
fn test_statistics_serialize() {
    let heuristic = MergeAndShrink::default().build(&two_switches()).unwrap();
    let json = serde_json::to_value(heuristic.statistics()).unwrap();
    assert_eq!(json["merge_strategy"], "dfp");
    assert_eq!(json["initial_h"]["value"], 1);
    assert_eq!(json["iterations"][0]["product_size"], 2);
}
