// Rust guideline compliant 2026-02-06

//! Linear merging: one growing composite absorbs the atomic components in a
//! fixed variable order.

use super::{MergeCounter, MergeStatistics, MergeStrategy};
use crate::{FactoredTransitionSystem, Result, Task};
use serde::{Deserialize, Serialize};

/// Order in which variables are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableOrder {
    /// Increasing variable index.
    #[default]
    Index,
    /// Decreasing variable index.
    Reverse,
    /// Goal variables first, each group in increasing index.
    GoalsFirst,
}

impl VariableOrder {
    /// The variables of `task` in this order.
    pub fn compute(self, task: &Task) -> Vec<usize> {
        let mut order: Vec<usize> = (0..task.num_variables()).collect();
        match self {
            Self::Index => {}
            Self::Reverse => order.reverse(),
            Self::GoalsFirst => order.sort_by_key(|&var| !task.is_goal_variable(var)),
        }
        order
    }
}

/// The linear merge strategy.
#[derive(Debug, Clone, Default)]
pub struct MergeLinear {
    variable_order: VariableOrder,
    order: Vec<usize>,
    next_position: usize,
    counter: MergeCounter,
}

impl MergeLinear {
    /// Creates the strategy.
    pub fn new(variable_order: VariableOrder) -> Self {
        Self {
            variable_order,
            ..Self::default()
        }
    }

    /// The computed variable order (empty before initialization).
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

impl MergeStrategy for MergeLinear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn initialize(&mut self, task: &Task) {
        self.counter.initialize(task);
        self.order = self.variable_order.compute(task);
        self.next_position = 0;
    }

    fn get_next(
        &mut self,
        fts: &mut FactoredTransitionSystem,
        _stats: &mut MergeStatistics,
    ) -> Result<(usize, usize)> {
        self.counter.next();
        let pair = if self.next_position == 0 {
            self.next_position = 2;
            (self.order[0], self.order[1])
        } else {
            // The previous product is the newest slot.
            let composite = fts.get_size() - 1;
            let next = self.order[self.next_position];
            self.next_position += 1;
            (composite, next)
        };
        Ok(pair)
    }

    fn done(&self) -> bool {
        self.counter.done()
    }
}
