// Rust guideline compliant 2026-02-06

//! Action labels and their costs.

use crate::Task;

/// The set of labels shared by all transition systems.
///
/// Labels start out as one label per operator. Label reduction replaces a
/// set of labels by a fresh label appended at the end; the replaced labels
/// become inactive and are never reactivated.
#[derive(Debug, Clone)]
pub struct Labels {
    /// Cost of every label ever created, indexed by label number.
    costs: Vec<u32>,
    /// Whether the label is still active (not reduced into another).
    active: Vec<bool>,
}

impl Labels {
    /// Creates one label per operator of `task`, carrying the operator cost.
    pub fn from_task(task: &Task) -> Self {
        Self::from_costs(task.operators.iter().map(|op| op.cost).collect())
    }

    /// Creates active labels with the given costs.
    pub fn from_costs(costs: Vec<u32>) -> Self {
        let active = vec![true; costs.len()];
        Self { costs, active }
    }

    /// Total number of labels ever created, including reduced ones.
    pub fn get_size(&self) -> usize {
        self.costs.len()
    }

    /// Cost of `label`.
    pub fn get_label_cost(&self, label: usize) -> u32 {
        self.costs[label]
    }

    /// Whether `label` is still active.
    pub fn is_active(&self, label: usize) -> bool {
        self.active.get(label).copied().unwrap_or(false)
    }

    /// Iterates over all active label numbers in increasing order.
    pub fn active_labels(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, &active)| active)
            .map(|(label, _)| label)
    }

    /// Number of active labels.
    pub fn compute_number_active_labels(&self) -> usize {
        self.active.iter().filter(|&&active| active).count()
    }

    /// Replaces `old_labels` by a new label and returns its number.
    ///
    /// The new label costs the minimum of the replaced labels.
    ///
    /// # Panics
    ///
    /// Panics if `old_labels` is empty or contains an inactive label.
    pub fn reduce_labels(&mut self, old_labels: &[usize]) -> usize {
        assert!(!old_labels.is_empty(), "cannot reduce an empty label set");
        let mut new_cost = u32::MAX;
        for &label in old_labels {
            assert!(self.is_active(label), "label {} is not active", label);
            self.active[label] = false;
            new_cost = new_cost.min(self.costs[label]);
        }
        self.costs.push(new_cost);
        self.active.push(true);
        self.costs.len() - 1
    }
}
