// Rust guideline compliant 2026-02-06

//! Symmetry-driven merging.
//!
//! The components moved by one symmetry generator are merged linearly into
//! a single composite, which makes the symmetry local to that composite.
//! When no usable generator exists, DFP decides.

use super::{DfpOrder, MergeCounter, MergeDfp, MergeStatistics, MergeStrategy};
use crate::symmetry::{SymmetryGenerator, SymmetryOracle};
use crate::{FactoredTransitionSystem, Result, Task};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which generator determines the components to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryChoice {
    /// The generator affecting the fewest components.
    #[default]
    Smallest,
    /// The generator affecting the most components.
    Largest,
}

/// The symmetry merge strategy.
#[derive(Debug)]
pub struct MergeSymmetries {
    oracle: Box<dyn SymmetryOracle>,
    choice: SymmetryChoice,
    stop_after_no_symmetries: bool,
    oracle_exhausted: bool,
    dfp: MergeDfp,
    /// Components still to be absorbed; a fresh product goes in front.
    current: Vec<usize>,
    in_progress: bool,
    counter: MergeCounter,
}

impl MergeSymmetries {
    /// Creates the strategy.
    ///
    /// # Arguments
    ///
    /// * `oracle` - Source of symmetry generators
    /// * `choice` - Generator selection
    /// * `stop_after_no_symmetries` - Stop asking the oracle once it found
    ///   nothing usable
    pub fn new(
        oracle: Box<dyn SymmetryOracle>,
        choice: SymmetryChoice,
        stop_after_no_symmetries: bool,
    ) -> Self {
        Self {
            oracle,
            choice,
            stop_after_no_symmetries,
            oracle_exhausted: false,
            dfp: MergeDfp::new(DfpOrder::Dfp),
            current: Vec::new(),
            in_progress: false,
            counter: MergeCounter::default(),
        }
    }

    fn choose_components(&mut self, fts: &FactoredTransitionSystem) -> Option<Vec<usize>> {
        let generators: Vec<SymmetryGenerator> = self.oracle.compute_generators(fts);
        let candidates = generators.iter().filter_map(|generator| {
            let affected: Vec<usize> = generator
                .affected_components()
                .into_iter()
                .filter(|&index| fts.is_active(index))
                .collect();
            (affected.len() > 1).then_some(affected)
        });
        let mut chosen: Option<Vec<usize>> = None;
        for affected in candidates {
            let better = match &chosen {
                None => true,
                Some(best) => match self.choice {
                    SymmetryChoice::Smallest => affected.len() < best.len(),
                    SymmetryChoice::Largest => affected.len() > best.len(),
                },
            };
            if better {
                chosen = Some(affected);
            }
        }
        if chosen.is_none() && self.stop_after_no_symmetries {
            info!("No usable symmetry found, not asking again");
            self.oracle_exhausted = true;
        }
        chosen
    }
}

impl MergeStrategy for MergeSymmetries {
    fn name(&self) -> &'static str {
        "symmetries"
    }

    fn initialize(&mut self, task: &Task) {
        self.counter.initialize(task);
        self.dfp.initialize(task);
        self.current.clear();
        self.in_progress = false;
        self.oracle_exhausted = false;
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
            let chosen = if self.oracle_exhausted {
                None
            } else {
                self.choose_components(fts)
            };
            match chosen {
                Some(components) => {
                    debug!("Merging components {:?} of a symmetry", components);
                    self.current = components;
                    self.in_progress = true;
                }
                None => {
                    return Ok(self.dfp.fallback_pair(fts, stats));
                }
            }
        }

        let pair = (self.current[0], self.current[1]);
        self.current.drain(..2);
        if self.current.is_empty() {
            self.in_progress = false;
        }
        Ok(pair)
    }

    fn done(&self) -> bool {
        self.counter.done()
    }
}
