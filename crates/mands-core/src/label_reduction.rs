// Rust guideline compliant 2026-02-06

//! Exact generalized label reduction.
//!
//! Two labels are combinable with respect to component `k` if they have the
//! same cost and are locally equivalent (share a label group) in every other
//! active component. Reducing combinable labels shrinks the label set
//! without changing the goal distances of the product of all components.

use crate::types::LabelMapping;
use crate::FactoredTransitionSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Which components label reduction is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelReductionMethod {
    /// Only the two components about to be merged.
    TwoTransitionSystems,
    /// Every active component once.
    AllTransitionSystems,
    /// Every active component until no further reduction is possible.
    #[default]
    AllTransitionSystemsWithFixpoint,
}

/// Label reduction policy used by the construction loop.
#[derive(Debug, Clone)]
pub struct LabelReduction {
    before_shrinking: bool,
    before_merging: bool,
    method: LabelReductionMethod,
}

impl Default for LabelReduction {
    fn default() -> Self {
        Self::new(true, false, LabelReductionMethod::default())
    }
}

impl LabelReduction {
    /// Creates a label reduction policy.
    pub fn new(before_shrinking: bool, before_merging: bool, method: LabelReductionMethod) -> Self {
        Self {
            before_shrinking,
            before_merging,
            method,
        }
    }

    /// Whether labels are reduced before shrinking.
    pub fn reduce_before_shrinking(&self) -> bool {
        self.before_shrinking
    }

    /// Whether labels are reduced before merging.
    pub fn reduce_before_merging(&self) -> bool {
        self.before_merging
    }

    /// The configured method.
    pub fn method(&self) -> LabelReductionMethod {
        self.method
    }

    /// Reduces labels around the next merge.
    ///
    /// # Returns
    ///
    /// True if at least one label was reduced.
    pub fn reduce(&self, merge_pair: (usize, usize), fts: &mut FactoredTransitionSystem) -> bool {
        match self.method {
            LabelReductionMethod::TwoTransitionSystems => {
                let first = reduce_for(merge_pair.0, fts);
                let second = reduce_for(merge_pair.1, fts);
                first || second
            }
            LabelReductionMethod::AllTransitionSystems => {
                let mut reduced = false;
                for index in fts.active_indices() {
                    reduced |= reduce_for(index, fts);
                }
                reduced
            }
            LabelReductionMethod::AllTransitionSystemsWithFixpoint => {
                let indices = fts.active_indices();
                if indices.is_empty() {
                    return false;
                }
                let mut reduced = false;
                let mut unsuccessful_in_a_row = 0;
                let mut position = 0;
                while unsuccessful_in_a_row < indices.len() {
                    if reduce_for(indices[position], fts) {
                        reduced = true;
                        // The reducing component itself cannot reduce again.
                        unsuccessful_in_a_row = 1;
                    } else {
                        unsuccessful_in_a_row += 1;
                    }
                    position = (position + 1) % indices.len();
                }
                reduced
            }
        }
    }
}

/// Reduces every class of labels combinable with respect to `index`.
fn reduce_for(index: usize, fts: &mut FactoredTransitionSystem) -> bool {
    let relation = compute_combinable_equivalence_relation(index, fts);
    let mut next_label = fts.labels().get_size();
    let mut mapping: LabelMapping = Vec::new();
    for class in relation {
        if class.len() > 1 {
            mapping.push((next_label, class));
            next_label += 1;
        }
    }
    if mapping.is_empty() {
        return false;
    }
    let num_reduced: usize = mapping.iter().map(|(_, old)| old.len()).sum();
    debug!(
        "Label reduction for component {}: {} labels into {}",
        index,
        num_reduced,
        mapping.len()
    );
    fts.apply_label_reduction(&mapping, index);
    true
}

/// Partitions the active labels into classes of equal cost that share a
/// label group in every active component other than `index`.
pub fn compute_combinable_equivalence_relation(
    index: usize,
    fts: &FactoredTransitionSystem,
) -> Vec<Vec<usize>> {
    let labels = fts.labels();
    let mut by_cost: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for label in labels.active_labels() {
        by_cost
            .entry(labels.get_label_cost(label))
            .or_default()
            .push(label);
    }
    let mut relation: Vec<Vec<usize>> = by_cost.into_values().collect();
    for other in fts.active_indices() {
        if other == index {
            continue;
        }
        let ts = fts.get_ts(other);
        relation = relation
            .into_iter()
            .flat_map(|class| {
                let mut blocks: BTreeMap<Option<usize>, Vec<usize>> = BTreeMap::new();
                for label in class {
                    blocks
                        .entry(ts.group_id_of_label(label))
                        .or_default()
                        .push(label);
                }
                blocks.into_values()
            })
            .collect();
    }
    relation.retain(|class| !class.is_empty());
    relation
}
