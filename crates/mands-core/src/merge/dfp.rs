// Rust guideline compliant 2026-02-06

//! DFP merging.
//!
//! Every label gets a rank per component: the smallest goal distance of a
//! target of its transitions. The weight of a pair is the minimum over
//! labels relevant in both components of the larger of the two ranks, and
//! the pair with the smallest weight is merged. Only pairs with at least one
//! goal-relevant component are considered.

use super::{MergeCounter, MergeStatistics, MergeStrategy};
use crate::types::INF;
use crate::{FactoredTransitionSystem, Result, Task};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Order in which components are scanned; earlier pairs win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DfpOrder {
    /// Composites from newest to oldest, then atomics in variable order.
    #[default]
    Dfp,
    /// Increasing index.
    Regular,
    /// Decreasing index.
    Inverse,
}

/// The DFP merge strategy.
#[derive(Debug, Clone, Default)]
pub struct MergeDfp {
    order: DfpOrder,
    /// Index of the first composite component.
    border: usize,
    counter: MergeCounter,
}

impl MergeDfp {
    /// Creates the strategy with the given scan order.
    pub fn new(order: DfpOrder) -> Self {
        Self {
            order,
            border: 0,
            counter: MergeCounter::default(),
        }
    }

    fn corrected_index(&self, index: usize) -> usize {
        if self.order == DfpOrder::Inverse || index >= self.border {
            index
        } else {
            self.border - 1 - index
        }
    }

    /// Active components in scan order.
    pub fn sorted_active_indices(&self, fts: &FactoredTransitionSystem) -> Vec<usize> {
        let size = fts.get_size();
        let candidates: Vec<usize> = match self.order {
            DfpOrder::Regular => (0..size).collect(),
            DfpOrder::Dfp | DfpOrder::Inverse => (0..size)
                .rev()
                .map(|index| self.corrected_index(index))
                .collect(),
        };
        candidates
            .into_iter()
            .filter(|&index| fts.is_active(index))
            .collect()
    }

    /// Chooses the best pair among `indices` (scanned in this strategy's
    /// order) without consuming a merge.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two of the indices are active.
    pub fn select_pair_among(
        &self,
        fts: &FactoredTransitionSystem,
        indices: &[usize],
        stats: &mut MergeStatistics,
    ) -> (usize, usize) {
        let sorted: Vec<usize> = self
            .sorted_active_indices(fts)
            .into_iter()
            .filter(|index| indices.contains(index))
            .collect();
        compute_next_pair(fts, &sorted, stats)
    }

    /// DFP over all active components, used when another strategy has no
    /// candidate. Counts as exactly one fallback choice.
    pub(crate) fn fallback_pair(
        &self,
        fts: &FactoredTransitionSystem,
        stats: &mut MergeStatistics,
    ) -> (usize, usize) {
        let fallback_choices = stats.fallback_choices;
        let sorted = self.sorted_active_indices(fts);
        let pair = compute_next_pair(fts, &sorted, stats);
        stats.fallback_choices = fallback_choices + 1;
        pair
    }
}

impl MergeStrategy for MergeDfp {
    fn name(&self) -> &'static str {
        "dfp"
    }

    fn initialize(&mut self, task: &Task) {
        self.counter.initialize(task);
        self.border = task.num_variables();
    }

    fn get_next(
        &mut self,
        fts: &mut FactoredTransitionSystem,
        stats: &mut MergeStatistics,
    ) -> Result<(usize, usize)> {
        self.counter.next();
        let sorted = self.sorted_active_indices(fts);
        Ok(compute_next_pair(fts, &sorted, stats))
    }

    fn done(&self) -> bool {
        self.counter.done()
    }
}

/// Computes the rank of every label for component `index`.
///
/// `None` marks inactive labels and irrelevant labels (a self-loop on every
/// state and nothing else). Relevant labels without transitions rank `INF`.
pub fn compute_label_ranks(fts: &FactoredTransitionSystem, index: usize) -> Vec<Option<u32>> {
    let ts = fts.get_ts(index);
    let distances = fts.get_dist(index);
    let mut label_ranks = vec![None; fts.labels().get_size()];
    for group in ts.label_groups() {
        let transitions = group.transitions();
        let irrelevant = transitions.len() == ts.get_size()
            && transitions.iter().all(|t| t.is_self_loop());
        let rank = if irrelevant {
            None
        } else {
            Some(
                transitions
                    .iter()
                    .map(|t| distances.get_goal_distance(t.target))
                    .min()
                    .unwrap_or(INF),
            )
        };
        for &label in group.labels() {
            label_ranks[label] = rank;
        }
    }
    label_ranks
}

/// Chooses the DFP pair among `sorted` (already in scan order).
///
/// If no pair has a finite weight, the first pair with a goal-relevant
/// component is taken; if there is none, the first two indices.
///
/// # Panics
///
/// Panics if `sorted` has fewer than two entries.
pub(crate) fn compute_next_pair(
    fts: &FactoredTransitionSystem,
    sorted: &[usize],
    stats: &mut MergeStatistics,
) -> (usize, usize) {
    assert!(sorted.len() >= 2, "need at least two components to merge");
    let label_ranks: Vec<Vec<Option<u32>>> = sorted
        .iter()
        .map(|&index| compute_label_ranks(fts, index))
        .collect();

    let mut best: Option<(usize, usize)> = None;
    let mut first_relevant_pair: Option<(usize, usize)> = None;
    let mut minimum_weight = INF;
    let mut num_best_pairs = 0;
    for i in 0..sorted.len() {
        let relevant1 = fts.get_ts(sorted[i]).is_goal_relevant();
        for j in i + 1..sorted.len() {
            if !relevant1 && !fts.get_ts(sorted[j]).is_goal_relevant() {
                continue;
            }
            let pair = (sorted[i], sorted[j]);
            first_relevant_pair.get_or_insert(pair);

            let pair_weight = label_ranks[i]
                .iter()
                .zip(&label_ranks[j])
                .filter_map(|(rank1, rank2)| match (rank1, rank2) {
                    (Some(r1), Some(r2)) => Some(*r1.max(r2)),
                    _ => None,
                })
                .min()
                .unwrap_or(INF);
            if pair_weight < minimum_weight {
                minimum_weight = pair_weight;
                best = Some(pair);
                num_best_pairs = 1;
            } else if pair_weight == minimum_weight && pair_weight != INF {
                num_best_pairs += 1;
            }
        }
    }
    stats.record_ties(num_best_pairs);

    let pair = match (best, first_relevant_pair) {
        (Some(pair), _) => pair,
        (None, Some(pair)) => {
            stats.fallback_choices += 1;
            pair
        }
        (None, None) => {
            stats.fallback_choices += 1;
            (sorted[0], sorted[1])
        }
    };
    debug!("Next pair of indices: ({}, {})", pair.0, pair.1);
    pair
}
