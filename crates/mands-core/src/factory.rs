// Rust guideline compliant 2026-02-06

//! Construction of the atomic factored transition system.

use crate::factored::{Component, FactoredTransitionSystem};
use crate::representation::HeuristicRepresentation;
use crate::transition_system::Transition;
use crate::{Distances, Labels, Operator, Task, TransitionSystem};
use tracing::info;

/// Builds one atomic component per task variable and prunes them.
///
/// # Arguments
///
/// * `task` - The planning task
/// * `finalize_if_unsolvable` - Finalize as soon as an atomic component
///   turns out to be unsolvable
pub fn create_factored_transition_system(
    task: &Task,
    finalize_if_unsolvable: bool,
) -> FactoredTransitionSystem {
    info!("Building atomic transition systems...");
    let labels = Labels::from_task(task);
    let components = (0..task.num_variables())
        .map(|var| {
            Component::new(
                build_atomic_transition_system(task, &labels, var),
                HeuristicRepresentation::leaf(var, task.domain_size(var)),
                Distances::new(),
            )
        })
        .collect();
    FactoredTransitionSystem::new(labels, components, finalize_if_unsolvable)
}

/// Builds the projection of `task` onto `var`.
///
/// States are the values of the variable. Goal states are the goal value,
/// or every value if the variable is not a goal variable.
pub fn build_atomic_transition_system(task: &Task, labels: &Labels, var: usize) -> TransitionSystem {
    let domain_size = task.domain_size(var);
    let label_transitions = task
        .operators
        .iter()
        .map(|op| operator_transitions(op, var, domain_size))
        .collect();
    let goal_states = match task.goal_value(var) {
        Some(goal) => (0..domain_size).map(|value| value == goal).collect(),
        None => vec![true; domain_size],
    };
    TransitionSystem::new(
        vec![var],
        domain_size,
        label_transitions,
        labels,
        goal_states,
        Some(task.initial_state[var]),
    )
}

fn operator_transitions(op: &Operator, var: usize, domain_size: usize) -> Vec<Transition> {
    let precondition = op.precondition_on(var);
    let sources: Vec<usize> = match precondition {
        Some(value) => vec![value],
        None => (0..domain_size).collect(),
    };

    let mut transitions = Vec::new();
    for src in sources {
        let mut fires_surely = false;
        for effect in op.effects_on(var) {
            let local_condition = effect.conditions.iter().find(|cond| cond.var == var);
            if local_condition.is_some_and(|cond| cond.value != src) {
                continue;
            }
            transitions.push(Transition::new(src, effect.fact.value));
            // Conditions on other variables may or may not hold.
            if effect.conditions.iter().all(|cond| cond.var == var) {
                fires_surely = true;
            }
        }
        if !fires_surely {
            transitions.push(Transition::new(src, src));
        }
    }
    transitions
}
