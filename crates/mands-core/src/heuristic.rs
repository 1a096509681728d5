// Rust guideline compliant 2026-02-06

//! The merge-and-shrink construction and the resulting heuristic.
//!
//! [`MergeAndShrink`] holds the policies and size limits and runs the main
//! loop: choose a pair, reduce labels, shrink both components, merge them,
//! prune, repeat until one component remains. The remaining component's
//! representation and goal distances make up [`MergeAndShrinkHeuristic`].

use crate::factory::create_factored_transition_system;
use crate::label_reduction::LabelReduction;
use crate::memory::{peak_memory_kb, MemoryPadding};
use crate::merge::{MergeDfp, MergeStatistics, MergeStrategy};
use crate::shrink::{compute_shrink_sizes, shrink_component, ShrinkBisimulation, ShrinkStrategy};
use crate::{Error, FactoredTransitionSystem, Result, Task};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Heuristic estimate of a concrete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicValue {
    /// Lower bound on the cost of reaching a goal.
    Value(u32),
    /// No goal state is reachable.
    DeadEnd,
}

impl HeuristicValue {
    /// The finite estimate, `None` for dead ends.
    pub fn value(self) -> Option<u32> {
        match self {
            Self::Value(value) => Some(value),
            Self::DeadEnd => None,
        }
    }

    /// Whether this is a dead end.
    pub fn is_dead_end(self) -> bool {
        self == Self::DeadEnd
    }
}

/// What happened in one iteration of the main loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationReport {
    /// Indices that were merged.
    pub merged: (usize, usize),
    /// Component sizes when the pair was chosen.
    pub sizes_before_shrinking: (usize, usize),
    /// Component sizes right before merging.
    pub sizes_after_shrinking: (usize, usize),
    /// Index of the product.
    pub product_index: usize,
    /// Size of the product after pruning.
    pub product_size: usize,
    /// Product init h minus the larger init h of the inputs; `None` if the
    /// product is unsolvable.
    pub init_h_difference: Option<i64>,
    /// Peak memory growth since the start of the construction (KiB).
    pub peak_memory_delta_kb: Option<u64>,
}

/// Statistics collected while building the heuristic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStatistics {
    /// Name of the merge strategy.
    pub merge_strategy: String,
    /// Name of the shrink strategy.
    pub shrink_strategy: String,
    /// Number of task variables (atomic components).
    pub num_variables: usize,
    /// One entry per merge.
    pub iterations: Vec<IterationReport>,
    /// Init h differences of all solvable merges.
    pub init_h_improvements: Vec<i64>,
    /// Merges that lowered the init h value.
    pub negative_improvements: usize,
    /// Active labels initially and after every label reduction.
    pub remaining_labels: Vec<usize>,
    /// Fraction of states pruned by every non-silent pruning step.
    pub relative_pruning: Vec<f64>,
    /// Fraction of miss-qualified states of every shrink attempt, two per
    /// iteration. A state is miss-qualified if its class contains a state
    /// of different goal distance.
    pub miss_qualified_ratios: Vec<f64>,
    /// First iteration whose shrinking was not perfect.
    pub first_imperfect_iteration: Option<usize>,
    /// Mean of `miss_qualified_ratios`, zero without shrink attempts.
    pub average_imperfect_shrinking: f64,
    /// Tiebreaking counters of the merge strategy.
    pub merge: MergeStatistics,
    /// Whether the abstraction is solvable.
    pub solvable: bool,
    /// Size of the final component (only when solvable).
    pub final_size: Option<usize>,
    /// Heuristic value of the initial state.
    pub initial_h: Option<HeuristicValue>,
    /// Peak memory growth of the whole construction (KiB).
    pub peak_memory_delta_kb: Option<u64>,
    /// Wall time of the construction in milliseconds.
    pub elapsed_ms: u128,
}

/// Configured merge-and-shrink construction.
#[derive(Debug)]
pub struct MergeAndShrink {
    merge_strategy: Box<dyn MergeStrategy>,
    shrink_strategy: Box<dyn ShrinkStrategy>,
    label_reduction: LabelReduction,
    max_states: usize,
    max_states_before_merge: usize,
    shrink_threshold_before_merge: usize,
    memory_padding_mb: usize,
}

impl Default for MergeAndShrink {
    fn default() -> Self {
        Self::new(Box::new(MergeDfp::default()), Box::new(ShrinkBisimulation::new()))
    }
}

impl MergeAndShrink {
    /// Creates a construction with default limits and label reduction.
    pub fn new(
        merge_strategy: Box<dyn MergeStrategy>,
        shrink_strategy: Box<dyn ShrinkStrategy>,
    ) -> Self {
        Self {
            merge_strategy,
            shrink_strategy,
            label_reduction: LabelReduction::default(),
            max_states: 50_000,
            max_states_before_merge: 50_000,
            shrink_threshold_before_merge: 1,
            memory_padding_mb: 0,
        }
    }

    /// Sets the label reduction policy.
    pub fn with_label_reduction(mut self, label_reduction: LabelReduction) -> Self {
        self.label_reduction = label_reduction;
        self
    }

    /// Sets the maximum product size.
    pub fn with_max_states(mut self, max_states: usize) -> Self {
        self.max_states = max_states;
        self
    }

    /// Sets the maximum component size before merging.
    pub fn with_max_states_before_merge(mut self, max_states_before_merge: usize) -> Self {
        self.max_states_before_merge = max_states_before_merge;
        self
    }

    /// Sets the size up to which components are never shrunk.
    pub fn with_shrink_threshold_before_merge(mut self, threshold: usize) -> Self {
        self.shrink_threshold_before_merge = threshold;
        self
    }

    /// Sets the memory padding in MiB (0 disables it).
    pub fn with_memory_padding_mb(mut self, megabytes: usize) -> Self {
        self.memory_padding_mb = megabytes;
        self
    }

    fn dump_options(&self) {
        info!(
            "Merge strategy: {}, shrink strategy: {}",
            self.merge_strategy.name(),
            self.shrink_strategy.name()
        );
        info!(
            "Max states: {}, max states before merge: {}, threshold: {}",
            self.max_states, self.max_states_before_merge, self.shrink_threshold_before_merge
        );
        info!(
            "Label reduction: {:?} (before shrinking: {}, before merging: {})",
            self.label_reduction.method(),
            self.label_reduction.reduce_before_shrinking(),
            self.label_reduction.reduce_before_merging()
        );
    }

    fn warn_on_unusual_options(&self) {
        let before_shrinking = self.label_reduction.reduce_before_shrinking();
        let before_merging = self.label_reduction.reduce_before_merging();
        if !before_shrinking && !before_merging {
            warn!(
                "Label reduction is disabled. This may drastically reduce the \
                 performance of merge-and-shrink!"
            );
        } else if before_shrinking && before_merging {
            warn!(
                "Label reduction runs both before shrinking and before merging. \
                 The double effort does not pay off for most configurations!"
            );
        } else {
            let prefers_before_shrinking =
                self.shrink_strategy.prefers_reduction_before_shrinking();
            if before_shrinking && !prefers_before_shrinking {
                warn!(
                    "Shrink strategy {} performs best with label reduction \
                     before merging, not before shrinking!",
                    self.shrink_strategy.name()
                );
            }
            if before_merging && prefers_before_shrinking {
                warn!(
                    "Shrink strategy {} performs best with label reduction \
                     before shrinking, not before merging!",
                    self.shrink_strategy.name()
                );
            }
        }
    }

    /// Runs the construction on `task`.
    ///
    /// # Returns
    ///
    /// The finished heuristic. An unsolvable abstraction is a regular
    /// outcome: the heuristic then reports every state as a dead end.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if a product cannot be allocated. The
    /// memory padding is released before the error is returned.
    pub fn build(mut self, task: &Task) -> Result<MergeAndShrinkHeuristic> {
        let timer = Instant::now();
        info!("Initializing merge-and-shrink heuristic...");
        let starting_peak_memory = peak_memory_kb();
        self.dump_options();
        self.warn_on_unusual_options();

        let mut padding = MemoryPadding::new(self.memory_padding_mb);
        self.merge_strategy.initialize(task);

        let mut stats = BuildStatistics {
            merge_strategy: self.merge_strategy.name().to_string(),
            shrink_strategy: self.shrink_strategy.name().to_string(),
            num_variables: task.num_variables(),
            ..BuildStatistics::default()
        };

        let mut fts = create_factored_transition_system(task, true);
        stats.remaining_labels.push(fts.get_num_labels());

        if fts.is_solvable() {
            if let Err(err) = self.main_loop(&mut fts, &mut stats, starting_peak_memory) {
                padding.release();
                if let Error::OutOfMemory { requested } = &err {
                    warn!("Ran out of memory allocating {} states, aborting", requested);
                }
                return Err(err);
            }
        }
        padding.release();

        stats.solvable = fts.is_solvable();
        if fts.is_solvable() {
            let final_index = fts.active_indices().last().copied();
            stats.final_size = final_index.map(|index| fts.get_ts(index).get_size());
            info!(
                "Final transition system size: {}",
                stats.final_size.unwrap_or(0)
            );
            fts.finalize(None);
        } else {
            info!("Abstract problem is unsolvable!");
        }
        stats.relative_pruning = fts.relative_pruning_per_iteration().to_vec();
        stats.peak_memory_delta_kb = memory_delta(starting_peak_memory);
        stats.elapsed_ms = timer.elapsed().as_millis();

        let initial_h = match fts.get_cost(&task.initial_state) {
            Some(cost) => HeuristicValue::Value(cost),
            None => HeuristicValue::DeadEnd,
        };
        stats.initial_h = Some(initial_h);
        info!("initial h value: {:?}", initial_h);
        info!("Init h value improvements: {:?}", stats.init_h_improvements);
        info!("Negative improvements: {}", stats.negative_improvements);
        info!("Course of label reduction: {:?}", stats.remaining_labels);
        stats.average_imperfect_shrinking = if stats.miss_qualified_ratios.is_empty() {
            0.0
        } else {
            stats.miss_qualified_ratios.iter().sum::<f64>()
                / stats.miss_qualified_ratios.len() as f64
        };
        info!(
            "Course of miss qualified states shrinking: {:?}",
            stats.miss_qualified_ratios
        );
        info!(
            "Average imperfect shrinking: {}",
            stats.average_imperfect_shrinking
        );
        info!(
            "Done initializing merge-and-shrink heuristic [{} ms]",
            stats.elapsed_ms
        );
        Ok(MergeAndShrinkHeuristic { fts, stats })
    }

    fn main_loop(
        &mut self,
        fts: &mut FactoredTransitionSystem,
        stats: &mut BuildStatistics,
        starting_peak_memory: Option<u64>,
    ) -> Result<()> {
        while !self.merge_strategy.done() {
            let (index1, index2) = self.merge_strategy.get_next(fts, &mut stats.merge)?;
            assert_ne!(index1, index2, "merge strategy returned the same index twice");
            debug!("Merging components {} and {}", index1, index2);
            fts.statistics(index1);
            fts.statistics(index2);
            let sizes_before_shrinking = (
                fts.get_ts(index1).get_size(),
                fts.get_ts(index2).get_size(),
            );

            if self.label_reduction.reduce_before_shrinking() {
                self.label_reduction.reduce((index1, index2), fts);
                stats.remaining_labels.push(fts.get_num_labels());
            }

            let (target1, target2) = compute_shrink_sizes(
                sizes_before_shrinking.0,
                sizes_before_shrinking.1,
                self.max_states,
                self.max_states_before_merge,
            );
            let mut perfect = true;
            for (index, target) in [(index1, target1), (index2, target2)] {
                let outcome = shrink_component(
                    fts,
                    index,
                    target,
                    self.shrink_threshold_before_merge,
                    self.shrink_strategy.as_ref(),
                    false,
                );
                if outcome.shrunk {
                    fts.statistics(index);
                }
                perfect &= outcome.miss_qualified_ratio == 0.0;
                stats.miss_qualified_ratios.push(outcome.miss_qualified_ratio);
            }
            if !perfect && stats.first_imperfect_iteration.is_none() {
                info!("not perfect anymore in iteration {}", stats.iterations.len());
                stats.first_imperfect_iteration = Some(stats.iterations.len());
            }

            if self.label_reduction.reduce_before_merging() {
                self.label_reduction.reduce((index1, index2), fts);
                stats.remaining_labels.push(fts.get_num_labels());
            }

            let init_dist1 = fts.get_init_state_goal_distance(index1);
            let init_dist2 = fts.get_init_state_goal_distance(index2);
            let sizes_after_shrinking = (
                fts.get_ts(index1).get_size(),
                fts.get_ts(index2).get_size(),
            );

            let product_index = fts.merge(index1, index2, true, true)?;

            if !fts.is_solvable() {
                stats.iterations.push(IterationReport {
                    merged: (index1, index2),
                    sizes_before_shrinking,
                    sizes_after_shrinking,
                    product_index,
                    product_size: 0,
                    init_h_difference: None,
                    peak_memory_delta_kb: memory_delta(starting_peak_memory),
                });
                break;
            }

            let new_init_dist = fts.get_init_state_goal_distance(product_index);
            let difference = i64::from(new_init_dist) - i64::from(init_dist1.max(init_dist2));
            info!("Difference of init h values: {}", difference);
            if difference < 0 {
                stats.negative_improvements += 1;
            }
            stats.init_h_improvements.push(difference);
            fts.statistics(product_index);

            let peak_memory_delta_kb = memory_delta(starting_peak_memory);
            if let Some(delta) = peak_memory_delta_kb {
                info!(
                    "Current peak memory increase of merge-and-shrink computation: {} KB",
                    delta
                );
            }
            stats.iterations.push(IterationReport {
                merged: (index1, index2),
                sizes_before_shrinking,
                sizes_after_shrinking,
                product_index,
                product_size: fts.get_ts(product_index).get_size(),
                init_h_difference: Some(difference),
                peak_memory_delta_kb,
            });
        }
        Ok(())
    }
}

fn memory_delta(starting_peak_memory: Option<u64>) -> Option<u64> {
    let start = starting_peak_memory?;
    peak_memory_kb().map(|now| now.saturating_sub(start))
}

/// The finished merge-and-shrink heuristic.
#[derive(Debug)]
pub struct MergeAndShrinkHeuristic {
    fts: FactoredTransitionSystem,
    stats: BuildStatistics,
}

impl MergeAndShrinkHeuristic {
    /// Estimates the cost of reaching a goal from `state`.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not assign a value to every task variable.
    pub fn compute_heuristic(&self, state: &[usize]) -> HeuristicValue {
        match self.fts.get_cost(state) {
            Some(cost) => HeuristicValue::Value(cost),
            None => HeuristicValue::DeadEnd,
        }
    }

    /// Whether the abstraction (and hence possibly the task) is solvable.
    pub fn is_solvable(&self) -> bool {
        self.fts.is_solvable()
    }

    /// Statistics of the construction.
    pub fn statistics(&self) -> &BuildStatistics {
        &self.stats
    }

    /// The finalized factored transition system.
    pub fn factored_transition_system(&self) -> &FactoredTransitionSystem {
        &self.fts
    }
}
