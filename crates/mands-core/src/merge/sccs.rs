// Rust guideline compliant 2026-02-06

//! Merging along the strongly connected components of the causal graph.
//!
//! Variables of each non-singleton SCC are merged into one composite first;
//! afterwards DFP merges whatever remains.

use super::{DfpOrder, MergeCounter, MergeDfp, MergeStatistics, MergeStrategy};
use crate::{CausalGraph, FactoredTransitionSystem, Result, Task};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Order in which SCCs are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOfSccs {
    /// Topological order of the causal graph.
    #[default]
    Topological,
    /// Reverse topological order.
    ReverseTopological,
    /// Larger SCCs first.
    Decreasing,
    /// Smaller SCCs first.
    Increasing,
}

/// How the components of one SCC are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalMergeOrder {
    /// The composite absorbs the variables in increasing order.
    Linear,
    /// DFP restricted to the SCC.
    #[default]
    Dfp,
}

/// The SCC merge strategy.
#[derive(Debug, Clone, Default)]
pub struct MergeSccs {
    order_of_sccs: OrderOfSccs,
    internal_merge_order: InternalMergeOrder,
    dfp: MergeDfp,
    pending_sccs: VecDeque<Vec<usize>>,
    /// Components of the SCC being merged; a fresh product goes in front.
    current: Vec<usize>,
    in_progress: bool,
    counter: MergeCounter,
}

impl MergeSccs {
    /// Creates the strategy.
    pub fn new(order_of_sccs: OrderOfSccs, internal_merge_order: InternalMergeOrder) -> Self {
        Self {
            order_of_sccs,
            internal_merge_order,
            dfp: MergeDfp::new(DfpOrder::Dfp),
            ..Self::default()
        }
    }

    /// Non-singleton SCCs still to be merged.
    pub fn pending_sccs(&self) -> impl Iterator<Item = &Vec<usize>> {
        self.pending_sccs.iter()
    }
}

impl MergeStrategy for MergeSccs {
    fn name(&self) -> &'static str {
        "sccs"
    }

    fn initialize(&mut self, task: &Task) {
        self.counter.initialize(task);
        self.dfp.initialize(task);

        let mut sccs = CausalGraph::new(task).strongly_connected_components();
        match self.order_of_sccs {
            OrderOfSccs::Topological => {}
            OrderOfSccs::ReverseTopological => sccs.reverse(),
            OrderOfSccs::Decreasing => sccs.sort_by(|a, b| b.len().cmp(&a.len())),
            OrderOfSccs::Increasing => sccs.sort_by_key(Vec::len),
        }
        self.pending_sccs = sccs.into_iter().filter(|scc| scc.len() > 1).collect();
        self.current.clear();
        self.in_progress = false;
        debug!("{} non-singleton causal graph SCCs", self.pending_sccs.len());
    }

    fn get_next(
        &mut self,
        fts: &mut FactoredTransitionSystem,
        stats: &mut MergeStatistics,
    ) -> Result<(usize, usize)> {
        self.counter.next();

        if self.in_progress {
            self.current.insert(0, fts.get_size() - 1);
        } else {
            match self.pending_sccs.pop_front() {
                Some(scc) => {
                    self.current = scc;
                    self.in_progress = true;
                }
                None => {
                    let sorted = self.dfp.sorted_active_indices(fts);
                    return Ok(super::dfp::compute_next_pair(fts, &sorted, stats));
                }
            }
        }

        let pair = match self.internal_merge_order {
            InternalMergeOrder::Linear => (self.current[0], self.current[1]),
            InternalMergeOrder::Dfp => self.dfp.select_pair_among(fts, &self.current, stats),
        };
        self.current.retain(|&index| index != pair.0 && index != pair.1);
        if self.current.is_empty() {
            self.in_progress = false;
        }
        Ok(pair)
    }

    fn done(&self) -> bool {
        self.counter.done()
    }
}
