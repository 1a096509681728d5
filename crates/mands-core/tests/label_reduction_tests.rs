// Rust guideline compliant 2026-02-06

//! Unit tests for exact generalized label reduction.

use mands_core::label_reduction::compute_combinable_equivalence_relation;
use mands_core::{
    create_factored_transition_system, Effect, Fact, LabelReduction, LabelReductionMethod,
    Operator, Task, Transition, Variable,
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

/// Two operators with the same behavior on `a`, and one operator on `b`.
fn duplicated_operators() -> Task {
    Task {
        variables: vec![var("a", 2), var("b", 2)],
        operators: vec![
            op("a-cheap", 1, &[(0, 0)], &[(0, 1)]),
            op("a-again", 1, &[(0, 0)], &[(0, 1)]),
            op("b", 1, &[(1, 0)], &[(1, 1)]),
        ],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(0, 1), Fact::new(1, 1)],
    }
}

/// Two operators that only touch `a` and differ there.
fn toggles() -> Task {
    Task {
        variables: vec![var("a", 2), var("b", 2)],
        operators: vec![
            op("on", 1, &[(0, 0)], &[(0, 1)]),
            op("off", 1, &[(0, 1)], &[(0, 0)]),
        ],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(0, 1)],
    }
}

fn sorted(mut relation: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    relation.sort();
    relation
}

#[test]
fn test_default_policy() {
    let reduction = LabelReduction::default();
    assert!(reduction.reduce_before_shrinking());
    assert!(!reduction.reduce_before_merging());
    assert_eq!(
        reduction.method(),
        LabelReductionMethod::AllTransitionSystemsWithFixpoint
    );
}

#[test]
fn test_method_names() {
    let method: LabelReductionMethod =
        serde_json::from_str("\"two_transition_systems\"").unwrap();
    assert_eq!(method, LabelReductionMethod::TwoTransitionSystems);
}

#[test]
fn test_combinable_relation() {
    let task = duplicated_operators();
    let fts = create_factored_transition_system(&task, true);
    assert_eq!(
        sorted(compute_combinable_equivalence_relation(0, &fts)),
        vec![vec![0, 1], vec![2]]
    );
    assert_eq!(
        sorted(compute_combinable_equivalence_relation(1, &fts)),
        vec![vec![0, 1], vec![2]]
    );
}

#[test]
fn test_reduce_two_transition_systems() {
    let task = duplicated_operators();
    let mut fts = create_factored_transition_system(&task, true);
    let reduction = LabelReduction::new(true, false, LabelReductionMethod::TwoTransitionSystems);

    assert!(reduction.reduce((0, 1), &mut fts));
    assert_eq!(fts.get_num_labels(), 2);
    assert_eq!(fts.labels().get_size(), 4);
    assert_eq!(fts.labels().get_label_cost(3), 1);
    assert!(!fts.labels().is_active(0));
    assert!(!fts.labels().is_active(1));
    assert_eq!(fts.get_ts(0).transitions_of_label(3), &[Transition::new(0, 1)]);
    assert!(fts.is_component_valid(0));
    assert!(fts.is_component_valid(1));
}

#[test]
fn test_fixpoint_reaches_stable_label_set() {
    let task = duplicated_operators();
    let mut fts = create_factored_transition_system(&task, true);
    let reduction = LabelReduction::default();

    assert!(reduction.reduce((0, 1), &mut fts));
    let remaining = fts.get_num_labels();
    assert!(!reduction.reduce((0, 1), &mut fts), "Nothing left to reduce");
    assert_eq!(fts.get_num_labels(), remaining);
}

#[test]
fn test_reduction_merges_groups_of_combinable_component() {
    let task = toggles();
    let mut fts = create_factored_transition_system(&task, true);
    let reduction = LabelReduction::new(true, false, LabelReductionMethod::AllTransitionSystems);

    assert!(reduction.reduce((0, 1), &mut fts));
    assert_eq!(fts.get_num_labels(), 1);
    let new_label = fts.labels().get_size() - 1;
    assert_eq!(fts.labels().get_label_cost(new_label), 1);
    assert_eq!(
        fts.get_ts(0).transitions_of_label(new_label),
        &[Transition::new(0, 1), Transition::new(1, 0)]
    );
    assert_eq!(fts.get_init_state_goal_distance(0), 1);
}

#[test]
fn test_no_reduction_when_labels_differ_everywhere() {
    let task = Task {
        variables: vec![var("a", 2), var("b", 2)],
        operators: vec![
            op("a", 1, &[(0, 0)], &[(0, 1)]),
            op("b", 1, &[(1, 0)], &[(1, 1)]),
        ],
        initial_state: vec![0, 0],
        goals: vec![Fact::new(0, 1), Fact::new(1, 1)],
    };
    let mut fts = create_factored_transition_system(&task, true);
    let reduction = LabelReduction::default();
    assert!(!reduction.reduce((0, 1), &mut fts));
    assert_eq!(fts.get_num_labels(), 2);
}

#[test]
fn test_labels_of_different_cost_are_not_combinable() {
    let mut task = duplicated_operators();
    task.operators[1].cost = 2;
    let mut fts = create_factored_transition_system(&task, true);
    assert_eq!(
        sorted(compute_combinable_equivalence_relation(0, &fts)),
        vec![vec![0], vec![1], vec![2]]
    );
    assert!(!LabelReduction::default().reduce((0, 1), &mut fts));
}
