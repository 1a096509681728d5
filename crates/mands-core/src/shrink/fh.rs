// Rust guideline compliant 2026-02-06

//! f/h bucket-based shrinking.

use super::ShrinkStrategy;
use crate::types::{StateEquivalenceClass, StateEquivalenceRelation};
use crate::FactoredTransitionSystem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Whether high or low values are shrunk first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLow {
    /// Prefer combining states with high values.
    High,
    /// Prefer combining states with low values.
    Low,
}

/// Groups states into buckets of equal f and h and combines buckets until
/// the target size is met. States with the preferred f and h are combined
/// first.
#[derive(Debug, Clone)]
pub struct ShrinkFh {
    shrink_f: HighLow,
    shrink_h: HighLow,
}

impl Default for ShrinkFh {
    fn default() -> Self {
        Self::new(HighLow::High, HighLow::Low)
    }
}

impl ShrinkFh {
    /// Creates the strategy with the given preferences.
    pub fn new(shrink_f: HighLow, shrink_h: HighLow) -> Self {
        Self { shrink_f, shrink_h }
    }

    fn ordered_buckets(&self, fts: &FactoredTransitionSystem, index: usize) -> Vec<Vec<usize>> {
        let ts = fts.get_ts(index);
        let distances = fts.get_dist(index);
        let signed = |value: u32, order: HighLow| match order {
            HighLow::High => -i64::from(value),
            HighLow::Low => i64::from(value),
        };
        let mut buckets: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
        for state in 0..ts.get_size() {
            let g = distances.get_init_distance(state);
            let h = distances.get_goal_distance(state);
            let f = g.saturating_add(h);
            buckets
                .entry((signed(f, self.shrink_f), signed(h, self.shrink_h)))
                .or_default()
                .push(state);
        }
        buckets.into_values().collect()
    }
}

impl ShrinkStrategy for ShrinkFh {
    fn name(&self) -> &'static str {
        "f-preserving"
    }

    fn prefers_reduction_before_shrinking(&self) -> bool {
        false
    }

    fn shrink(
        &self,
        fts: &FactoredTransitionSystem,
        index: usize,
        target_size: usize,
    ) -> StateEquivalenceRelation {
        let buckets = self.ordered_buckets(fts, index);
        combine_buckets(&buckets, target_size.max(1))
    }
}

/// Turns ordered buckets into at most about `target_size` classes. Early
/// buckets are combined first so later ones can stay as singletons.
fn combine_buckets(buckets: &[Vec<usize>], target_size: usize) -> StateEquivalenceRelation {
    let mut relation: StateEquivalenceRelation = Vec::new();
    let mut states_to_go: usize = buckets.iter().map(Vec::len).sum();
    let mut warned = false;

    for (bucket_no, bucket) in buckets.iter().enumerate() {
        let remaining_budget = target_size as i64 - relation.len() as i64;
        states_to_go -= bucket.len();
        let budget_for_bucket = remaining_budget - states_to_go as i64;

        if budget_for_bucket >= bucket.len() as i64 {
            relation.extend(bucket.iter().map(|&state| vec![state]));
        } else if budget_for_bucket <= 1 {
            let remaining_buckets = (buckets.len() - bucket_no) as i64;
            if remaining_budget >= remaining_buckets || relation.is_empty() {
                relation.push(StateEquivalenceClass::new());
            } else if !warned {
                warned = true;
                info!("Very small node limit, must combine buckets.");
            }
            if let Some(class) = relation.last_mut() {
                class.extend_from_slice(bucket);
            }
        } else {
            let budget = budget_for_bucket as usize;
            let mut classes = vec![StateEquivalenceClass::new(); budget];
            for (i, &state) in bucket.iter().enumerate() {
                classes[i % budget].push(state);
            }
            relation.extend(classes);
        }
    }
    relation
}
