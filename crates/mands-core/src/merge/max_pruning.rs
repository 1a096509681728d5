// Rust guideline compliant 2026-02-06

//! Merging by tentative products.
//!
//! Every candidate pair is merged on copies of its components; the pair
//! whose product keeps the smallest fraction of its states after pruning is
//! chosen. Pairs whose product would exceed the size limit are not tried;
//! if no pair can be tried, DFP decides.

use super::{DfpOrder, MergeCounter, MergeDfp, MergeStatistics, MergeStrategy};
use crate::{FactoredTransitionSystem, Result, Task};
use tracing::debug;

/// The tentative-merge strategy.
#[derive(Debug, Clone)]
pub struct MergeMaxPruning {
    max_candidate_size: usize,
    dfp: MergeDfp,
    counter: MergeCounter,
}

impl MergeMaxPruning {
    /// Creates the strategy.
    ///
    /// # Arguments
    ///
    /// * `max_candidate_size` - Largest unpruned product that is tried
    pub fn new(max_candidate_size: usize) -> Self {
        Self {
            max_candidate_size,
            dfp: MergeDfp::new(DfpOrder::Dfp),
            counter: MergeCounter::default(),
        }
    }

    /// Fraction of product states that survive pruning, `None` if the
    /// product is too large to try.
    fn score(
        &self,
        fts: &mut FactoredTransitionSystem,
        index1: usize,
        index2: usize,
    ) -> Result<Option<f64>> {
        let product_size = fts
            .get_ts(index1)
            .get_size()
            .checked_mul(fts.get_ts(index2).get_size());
        let product_size = match product_size {
            Some(size) if size <= self.max_candidate_size => size,
            _ => return Ok(None),
        };
        if product_size == 0 {
            return Ok(Some(0.0));
        }
        let copy1 = fts.copy(index1);
        let copy2 = fts.copy(index2);
        let merged = fts.merge(copy1, copy2, true, false);
        let remaining = merged.map(|index| fts.get_ts(index).get_size());
        fts.release_copies();
        Ok(Some(remaining? as f64 / product_size as f64))
    }
}

impl MergeStrategy for MergeMaxPruning {
    fn name(&self) -> &'static str {
        "max_pruning"
    }

    fn initialize(&mut self, task: &Task) {
        self.counter.initialize(task);
        self.dfp.initialize(task);
    }

    fn get_next(
        &mut self,
        fts: &mut FactoredTransitionSystem,
        stats: &mut MergeStatistics,
    ) -> Result<(usize, usize)> {
        self.counter.next();
        let indices = fts.active_indices();

        let mut best: Option<((usize, usize), f64)> = None;
        let mut num_best_pairs = 0;
        for (i, &index1) in indices.iter().enumerate() {
            for &index2 in &indices[i + 1..] {
                let Some(ratio) = self.score(fts, index1, index2)? else {
                    continue;
                };
                match best {
                    Some((_, best_ratio)) if ratio > best_ratio => {}
                    Some((_, best_ratio)) if ratio == best_ratio => num_best_pairs += 1,
                    _ => {
                        best = Some(((index1, index2), ratio));
                        num_best_pairs = 1;
                    }
                }
            }
        }
        stats.record_ties(num_best_pairs);

        match best {
            Some((pair, ratio)) => {
                debug!(
                    "Tentative merge of ({}, {}) keeps {:.3} of its states",
                    pair.0, pair.1, ratio
                );
                Ok(pair)
            }
            None => {
                debug!("No candidate pair within the size limit, using DFP");
                Ok(self.dfp.fallback_pair(fts, stats))
            }
        }
    }

    fn done(&self) -> bool {
        self.counter.done()
    }
}
