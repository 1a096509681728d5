// Rust guideline compliant 2026-02-06

//! Shrink strategies.
//!
//! A shrink strategy computes a state equivalence relation for one component
//! with at most a target number of classes. The construction loop decides
//! the targets with [`compute_shrink_sizes`] and applies the relation with
//! [`shrink_component`].

pub mod bisimulation;
pub mod fh;

pub use bisimulation::ShrinkBisimulation;
pub use fh::{HighLow, ShrinkFh};

use crate::types::StateEquivalenceRelation;
use crate::FactoredTransitionSystem;
use serde::{Deserialize, Serialize};

/// Strategy for abstracting a single component.
pub trait ShrinkStrategy: std::fmt::Debug {
    /// Short name used in logs and statistics.
    fn name(&self) -> &'static str;

    /// Whether the strategy works best with labels reduced right before
    /// shrinking rather than before merging.
    fn prefers_reduction_before_shrinking(&self) -> bool;

    /// Computes an equivalence relation on the states of component `index`
    /// with at most `target_size` classes where possible.
    ///
    /// Requires valid distances for the component.
    fn shrink(
        &self,
        fts: &FactoredTransitionSystem,
        index: usize,
        target_size: usize,
    ) -> StateEquivalenceRelation;
}

/// Configurable shrink strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkStrategyKind {
    /// Greatest bisimulation within the size limit.
    #[default]
    Bisimulation,
    /// f/h bucket-based shrinking.
    Fh,
}

impl ShrinkStrategyKind {
    /// Instantiates the strategy with its default parameters.
    pub fn build(self) -> Box<dyn ShrinkStrategy> {
        match self {
            Self::Bisimulation => Box::new(ShrinkBisimulation::new()),
            Self::Fh => Box::new(ShrinkFh::default()),
        }
    }
}

/// Computes target sizes for the two components of the next merge.
///
/// Both sizes are first capped at `max_states_before_merge`. If their
/// product still exceeds `max_states`, the budget is balanced: a component
/// already below the square root keeps its size and the other gets the rest.
///
/// # Examples
///
/// ```
/// use mands_core::shrink::compute_shrink_sizes;
///
/// assert_eq!(compute_shrink_sizes(10, 10, 1000, 1000), (10, 10));
/// assert_eq!(compute_shrink_sizes(5, 400, 1000, 1000), (5, 200));
/// assert_eq!(compute_shrink_sizes(400, 400, 100, 1000), (10, 10));
/// ```
pub fn compute_shrink_sizes(
    size1: usize,
    size2: usize,
    max_states: usize,
    max_states_before_merge: usize,
) -> (usize, usize) {
    let mut new_size1 = size1.min(max_states_before_merge).max(1);
    let mut new_size2 = size2.min(max_states_before_merge).max(1);
    let within_limit = new_size1
        .checked_mul(new_size2)
        .is_some_and(|product| product <= max_states);
    if !within_limit {
        let balanced_size = ((max_states as f64).sqrt() as usize).max(1);
        if new_size1 <= balanced_size {
            new_size2 = (max_states / new_size1).max(1);
        } else if new_size2 <= balanced_size {
            new_size1 = (max_states / new_size2).max(1);
        } else {
            new_size1 = balanced_size;
            new_size2 = balanced_size;
        }
    }
    (new_size1, new_size2)
}

/// What [`shrink_component`] did to a component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShrinkOutcome {
    /// Whether the component actually shrank.
    pub shrunk: bool,
    /// Fraction of the states that share a class with a state of different
    /// goal distance. Zero when shrinking was skipped or kept goal distances.
    pub miss_qualified_ratio: f64,
}

/// Fraction of the states of component `index` that `relation` puts into a
/// class together with a state of different goal distance. Bisimulation
/// within its size limit never produces such classes.
///
/// Requires valid distances for the component.
pub fn miss_qualified_ratio(
    fts: &FactoredTransitionSystem,
    index: usize,
    relation: &StateEquivalenceRelation,
) -> f64 {
    let num_states = fts.get_ts(index).get_size();
    if num_states == 0 {
        return 0.0;
    }
    let distances = fts.get_dist(index);
    let miss_qualified: usize = relation
        .iter()
        .filter(|class| {
            class.split_first().is_some_and(|(&first, rest)| {
                let h = distances.get_goal_distance(first);
                rest.iter().any(|&state| distances.get_goal_distance(state) != h)
            })
        })
        .map(Vec::len)
        .sum();
    miss_qualified as f64 / num_states as f64
}

/// Shrinks component `index` if it is larger than
/// `min(target_size, shrink_threshold)`.
pub fn shrink_component(
    fts: &mut FactoredTransitionSystem,
    index: usize,
    target_size: usize,
    shrink_threshold: usize,
    strategy: &dyn ShrinkStrategy,
    silent: bool,
) -> ShrinkOutcome {
    let num_states = fts.get_ts(index).get_size();
    if num_states <= target_size.min(shrink_threshold) {
        return ShrinkOutcome::default();
    }
    let relation = strategy.shrink(fts, index, target_size);
    let ratio = miss_qualified_ratio(fts, index, &relation);
    let shrunk = fts.apply_abstraction(index, &relation, silent);
    ShrinkOutcome {
        shrunk,
        miss_qualified_ratio: if shrunk { ratio } else { 0.0 },
    }
}
