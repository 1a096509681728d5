// Rust guideline compliant 2026-02-06

//! Merge strategies.
//!
//! A merge strategy decides which two active components are merged next.
//! For a task with `n` variables every strategy hands out exactly `n - 1`
//! pairs, after which [`MergeStrategy::done`] holds.

pub mod dfp;
pub mod linear;
pub mod max_pruning;
pub mod sccs;
pub mod symmetries;

pub use dfp::{compute_label_ranks, DfpOrder, MergeDfp};
pub use linear::{MergeLinear, VariableOrder};
pub use max_pruning::MergeMaxPruning;
pub use sccs::{InternalMergeOrder, MergeSccs, OrderOfSccs};
pub use symmetries::{MergeSymmetries, SymmetryChoice};

use crate::{FactoredTransitionSystem, Result, Task};
use serde::{Deserialize, Serialize};

/// Tiebreaking counters collected while choosing pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStatistics {
    /// Iterations in which more than one pair had the best score.
    pub iterations_with_tiebreaking: usize,
    /// Sum of the number of best-scored pairs over those iterations.
    pub total_tiebreaking_pair_count: usize,
    /// Iterations in which a fallback decided the pair.
    pub fallback_choices: usize,
}

impl MergeStatistics {
    pub(crate) fn record_ties(&mut self, num_best_pairs: usize) {
        if num_best_pairs > 1 {
            self.iterations_with_tiebreaking += 1;
            self.total_tiebreaking_pair_count += num_best_pairs;
        }
    }
}

/// Policy choosing the next pair of components to merge.
pub trait MergeStrategy: std::fmt::Debug {
    /// Short name used in logs and statistics.
    fn name(&self) -> &'static str;

    /// Prepares the strategy for `task`. Must be called before
    /// [`get_next`](Self::get_next).
    fn initialize(&mut self, task: &Task);

    /// Returns the next pair of active component indices.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if a strategy that scores pairs by
    /// tentative merges runs out of memory.
    ///
    /// # Panics
    ///
    /// Panics if the strategy is not initialized or already done.
    fn get_next(
        &mut self,
        fts: &mut FactoredTransitionSystem,
        stats: &mut MergeStatistics,
    ) -> Result<(usize, usize)>;

    /// Whether all merges have been handed out.
    fn done(&self) -> bool;
}

/// Configurable merge strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategyKind {
    /// Label-rank based DFP merging.
    #[default]
    Dfp,
    /// Linear merging along a variable order.
    Linear,
    /// Causal graph SCCs first, then DFP.
    Sccs,
    /// Tentative merges scored by the fraction of pruned states.
    MaxPruning,
}

/// Counts the merges still to be handed out.
#[derive(Debug, Clone, Default)]
pub(crate) struct MergeCounter {
    remaining: Option<usize>,
}

impl MergeCounter {
    pub(crate) fn initialize(&mut self, task: &Task) {
        self.remaining = Some(task.num_variables().saturating_sub(1));
    }

    pub(crate) fn done(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Consumes one merge.
    ///
    /// # Panics
    ///
    /// Panics if not initialized or no merges remain.
    pub(crate) fn next(&mut self) {
        match self.remaining.as_mut() {
            Some(remaining) if *remaining > 0 => *remaining -= 1,
            Some(_) => panic!("merge strategy is done"),
            None => panic!("merge strategy used before initialize"),
        }
    }
}
