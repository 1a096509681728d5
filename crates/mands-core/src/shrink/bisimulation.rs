// Rust guideline compliant 2026-02-06

//! Bisimulation-based shrinking.

use super::ShrinkStrategy;
use crate::types::StateEquivalenceRelation;
use crate::FactoredTransitionSystem;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Computes the coarsest goal-respecting bisimulation, stopping early when
/// the next refinement step would exceed the target size.
///
/// The initial partition groups states by goal distance and goal status.
/// Each refinement splits classes by the signature of a state: the set of
/// `(label group, successor class)` pairs.
#[derive(Debug, Clone, Default)]
pub struct ShrinkBisimulation;

impl ShrinkBisimulation {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }
}

impl ShrinkStrategy for ShrinkBisimulation {
    fn name(&self) -> &'static str {
        "bisimulation"
    }

    fn prefers_reduction_before_shrinking(&self) -> bool {
        true
    }

    fn shrink(
        &self,
        fts: &FactoredTransitionSystem,
        index: usize,
        target_size: usize,
    ) -> StateEquivalenceRelation {
        let ts = fts.get_ts(index);
        let distances = fts.get_dist(index);
        let num_states = ts.get_size();
        let target_size = target_size.max(1);

        let keys: BTreeSet<(u32, bool)> = (0..num_states)
            .map(|state| (distances.get_goal_distance(state), !ts.is_goal_state(state)))
            .collect();
        let key_rank: HashMap<(u32, bool), usize> = keys
            .into_iter()
            .enumerate()
            // Highest goal distances share the last class if there is no room.
            .map(|(rank, key)| (key, rank.min(target_size - 1)))
            .collect();
        let mut class_of: Vec<usize> = (0..num_states)
            .map(|state| {
                key_rank[&(distances.get_goal_distance(state), !ts.is_goal_state(state))]
            })
            .collect();
        let mut num_classes = class_of.iter().copied().max().map_or(0, |max| max + 1);

        let mut iterations = 0;
        loop {
            let mut signatures: Vec<Vec<(usize, usize)>> = vec![Vec::new(); num_states];
            for (group_id, group) in ts.label_groups().iter().enumerate() {
                for t in group.transitions() {
                    signatures[t.src].push((group_id, class_of[t.target]));
                }
            }
            let mut new_ids: HashMap<(usize, Vec<(usize, usize)>), usize> = HashMap::new();
            let mut new_class_of = Vec::with_capacity(num_states);
            for (state, mut signature) in signatures.into_iter().enumerate() {
                signature.sort_unstable();
                signature.dedup();
                let next_id = new_ids.len();
                let id = *new_ids
                    .entry((class_of[state], signature))
                    .or_insert(next_id);
                new_class_of.push(id);
            }
            let new_num_classes = new_ids.len();
            iterations += 1;
            if new_num_classes == num_classes || new_num_classes > target_size {
                break;
            }
            class_of = new_class_of;
            num_classes = new_num_classes;
        }
        debug!(
            "{}bisimulation: {} classes after {} rounds",
            ts.tag(),
            num_classes,
            iterations
        );

        let mut relation: StateEquivalenceRelation = vec![Vec::new(); num_classes];
        for (state, &class) in class_of.iter().enumerate() {
            relation[class].push(state);
        }
        relation.retain(|class| !class.is_empty());
        relation
    }
}
