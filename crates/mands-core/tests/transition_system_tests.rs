// Rust guideline compliant 2026-02-06

//! Unit tests for transition systems: normalization, abstraction, label
//! reduction and the synchronized product.

use mands_core::{Labels, Transition, TransitionSystem};

fn t(src: usize, target: usize) -> Transition {
    Transition::new(src, target)
}

/// Three states, labels 0 and 1 locally equivalent, label 2 with a
/// duplicated transition into the goal.
fn chain() -> (Labels, TransitionSystem) {
    let labels = Labels::from_costs(vec![1, 1, 2]);
    let ts = TransitionSystem::new(
        vec![0],
        3,
        vec![vec![t(0, 1)], vec![t(0, 1)], vec![t(1, 2), t(1, 2)]],
        &labels,
        vec![false, false, true],
        Some(0),
    );
    (labels, ts)
}

#[test]
fn test_new_groups_locally_equivalent_labels() {
    let (_labels, ts) = chain();
    assert_eq!(ts.label_groups().len(), 2);
    assert_eq!(ts.group_id_of_label(0), ts.group_id_of_label(1));
    assert_ne!(ts.group_id_of_label(0), ts.group_id_of_label(2));
    assert_eq!(ts.transitions_of_label(2), &[t(1, 2)]);
    assert_eq!(ts.num_transitions(), 2);
    assert!(ts.are_transitions_sorted_unique());

    let group = ts.group_of_label(0).expect("label 0 is active");
    assert_eq!(group.labels(), &[0, 1]);
    assert_eq!(group.cost(), 1);
}

#[test]
fn test_basic_properties() {
    let (_labels, ts) = chain();
    assert_eq!(ts.get_size(), 3);
    assert_eq!(ts.get_init_state(), Some(0));
    assert!(ts.is_solvable());
    assert!(ts.is_goal_relevant());
    assert!(ts.is_goal_state(2));
    assert_eq!(ts.incorporated_variables(), &[0]);
    assert!(ts.tag().starts_with("Atomic transition system #0"));
}

#[test]
fn test_identity_abstraction_is_noop() {
    let (_labels, mut ts) = chain();
    let before = ts.clone();
    let relation = vec![vec![0], vec![1], vec![2]];
    let mapping = vec![Some(0), Some(1), Some(2)];
    assert!(!ts.apply_abstraction(&relation, &mapping, true));
    assert_eq!(ts.get_size(), before.get_size());
    assert_eq!(ts.label_groups(), before.label_groups());
    assert_eq!(ts.goal_states(), before.goal_states());
}

#[test]
fn test_abstraction_merges_states() {
    let (_labels, mut ts) = chain();
    let relation = vec![vec![0], vec![1, 2]];
    let mapping = vec![Some(0), Some(1), Some(1)];
    assert!(ts.apply_abstraction(&relation, &mapping, false));
    assert_eq!(ts.get_size(), 2);
    assert_eq!(ts.goal_states(), &[false, true]);
    assert_eq!(ts.get_init_state(), Some(0));
    assert_eq!(ts.transitions_of_label(2), &[t(1, 1)]);
    assert_eq!(ts.transitions_of_label(0), &[t(0, 1)]);
    assert!(ts.are_transitions_sorted_unique());
}

#[test]
fn test_abstraction_prunes_states() {
    let (_labels, mut ts) = chain();
    let relation = vec![vec![0], vec![1]];
    let mapping = vec![Some(0), Some(1), None];
    assert!(ts.apply_abstraction(&relation, &mapping, true));
    assert_eq!(ts.get_size(), 2);
    assert!(ts.transitions_of_label(2).is_empty());
    assert_eq!(ts.goal_states(), &[false, false]);
}

#[test]
fn test_abstraction_pruning_initial_state_makes_unsolvable() {
    let (_labels, mut ts) = chain();
    let relation = vec![vec![1], vec![2]];
    let mapping = vec![None, Some(0), Some(1)];
    assert!(ts.apply_abstraction(&relation, &mapping, true));
    assert_eq!(ts.get_init_state(), None);
    assert!(!ts.is_solvable());
}

#[test]
fn test_label_reduction_of_equivalent_labels() {
    let (mut labels, mut ts) = chain();
    let new_label = labels.reduce_labels(&[0, 1]);
    assert_eq!(new_label, 3);
    ts.apply_label_reduction(&vec![(3, vec![0, 1])], &labels, true);

    assert_eq!(ts.group_id_of_label(0), None);
    assert_eq!(ts.group_id_of_label(1), None);
    assert_eq!(ts.transitions_of_label(3), &[t(0, 1)]);
    assert_eq!(ts.label_groups().len(), 2);
}

#[test]
fn test_label_reduction_across_groups() {
    let (mut labels, mut ts) = chain();
    labels.reduce_labels(&[1, 2]);
    assert_eq!(labels.get_label_cost(3), 1);
    ts.apply_label_reduction(&vec![(3, vec![1, 2])], &labels, false);

    assert_eq!(ts.transitions_of_label(3), &[t(0, 1), t(1, 2)]);
    assert_eq!(ts.transitions_of_label(0), &[t(0, 1)]);
    assert_eq!(ts.group_of_label(3).map(|g| g.cost()), Some(1));
    assert!(ts.are_transitions_sorted_unique());
}

#[test]
#[should_panic(expected = "locally equivalent")]
fn test_label_reduction_rejects_non_equivalent_labels() {
    let (mut labels, mut ts) = chain();
    labels.reduce_labels(&[1, 2]);
    ts.apply_label_reduction(&vec![(3, vec![1, 2])], &labels, true);
}

#[test]
fn test_product_matches_definition() {
    let labels = Labels::from_costs(vec![1, 3]);
    let ts1 = TransitionSystem::new(
        vec![0],
        2,
        vec![vec![t(0, 1)], vec![t(0, 0), t(1, 1)]],
        &labels,
        vec![false, true],
        Some(0),
    );
    let ts2 = TransitionSystem::new(
        vec![1],
        3,
        vec![vec![t(0, 1), t(1, 2)], vec![t(2, 0)]],
        &labels,
        vec![false, false, true],
        Some(1),
    );

    let product = TransitionSystem::merge(&labels, &ts1, &ts2, true).expect("small product");
    assert_eq!(product.get_size(), 6);
    assert_eq!(product.get_init_state(), Some(1));
    assert_eq!(product.incorporated_variables(), &[0, 1]);
    for s1 in 0..2 {
        for s2 in 0..3 {
            assert_eq!(
                product.is_goal_state(s1 * 3 + s2),
                ts1.is_goal_state(s1) && ts2.is_goal_state(s2)
            );
        }
    }

    for label in 0..2 {
        let mut expected: Vec<Transition> = Vec::new();
        for t1 in ts1.transitions_of_label(label) {
            for t2 in ts2.transitions_of_label(label) {
                expected.push(t(t1.src * 3 + t2.src, t1.target * 3 + t2.target));
            }
        }
        expected.sort();
        assert_eq!(product.transitions_of_label(label), expected.as_slice());
    }
    assert!(product.are_transitions_sorted_unique());
}

#[test]
fn test_product_of_two_boolean_switches() {
    let labels = Labels::from_costs(vec![1]);
    let switch = |var| {
        TransitionSystem::new(
            vec![var],
            2,
            vec![vec![t(0, 1), t(1, 1)]],
            &labels,
            vec![false, true],
            Some(0),
        )
    };
    let product = TransitionSystem::merge(&labels, &switch(0), &switch(1), true).unwrap();
    assert_eq!(product.get_size(), 4);
    assert_eq!(
        product.transitions_of_label(0),
        &[t(0, 3), t(1, 3), t(2, 3), t(3, 3)]
    );
    assert_eq!(product.goal_states(), &[false, false, false, true]);
}
