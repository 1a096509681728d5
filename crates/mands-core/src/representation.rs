// Rust guideline compliant 2026-02-06

//! Mapping from concrete states to abstract states.
//!
//! The representation mirrors the merge tree: leaves look up the value of a
//! single task variable, merge nodes combine the abstract states of their
//! children through a product table. Every entry is `None` once the
//! corresponding abstract state has been pruned.

use crate::types::AbstractionMapping;
use crate::{Error, Result};
use tracing::debug;

/// Tagged merge tree used to evaluate concrete states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeuristicRepresentation {
    /// Abstraction of a single task variable.
    Leaf {
        /// The task variable.
        var: usize,
        /// Abstract state of every value of the variable.
        lookup_table: Vec<Option<usize>>,
    },
    /// Product of two sub-representations.
    Merge {
        /// Representation of the first merged component.
        left: Box<HeuristicRepresentation>,
        /// Representation of the second merged component.
        right: Box<HeuristicRepresentation>,
        /// `lookup_table[l][r]` is the abstract state of the pair.
        lookup_table: Vec<Vec<Option<usize>>>,
    },
}

impl HeuristicRepresentation {
    /// Creates the identity representation for `var` with `domain_size` values.
    pub fn leaf(var: usize, domain_size: usize) -> Self {
        Self::Leaf {
            var,
            lookup_table: (0..domain_size).map(Some).collect(),
        }
    }

    /// Creates a merge node whose table numbers pairs as
    /// `l * right_size + r`, matching the product construction.
    ///
    /// # Arguments
    ///
    /// * `left` - Representation of the first component
    /// * `right` - Representation of the second component
    /// * `left_size` - Number of states of the first component
    /// * `right_size` - Number of states of the second component
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the table cannot be allocated.
    pub fn merge(
        left: HeuristicRepresentation,
        right: HeuristicRepresentation,
        left_size: usize,
        right_size: usize,
    ) -> Result<Self> {
        let lookup_table = Self::product_table(left_size, right_size)?;
        Ok(Self::Merge {
            left: Box::new(left),
            right: Box::new(right),
            lookup_table,
        })
    }

    /// Allocates the initial product table of a merge node.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the table cannot be allocated.
    pub fn product_table(left_size: usize, right_size: usize) -> Result<Vec<Vec<Option<usize>>>> {
        let out_of_memory = || Error::OutOfMemory {
            requested: left_size.saturating_mul(right_size),
        };
        let mut lookup_table = Vec::new();
        lookup_table
            .try_reserve_exact(left_size)
            .map_err(|_| out_of_memory())?;
        for l in 0..left_size {
            let mut row = Vec::new();
            row.try_reserve_exact(right_size)
                .map_err(|_| out_of_memory())?;
            row.extend((0..right_size).map(|r| Some(l * right_size + r)));
            lookup_table.push(row);
        }
        Ok(lookup_table)
    }

    /// Maps a concrete state to its abstract state, `None` if pruned.
    pub fn get_abstract_state(&self, state: &[usize]) -> Option<usize> {
        match self {
            Self::Leaf { var, lookup_table } => lookup_table[state[*var]],
            Self::Merge {
                left,
                right,
                lookup_table,
            } => {
                let l = left.get_abstract_state(state)?;
                let r = right.get_abstract_state(state)?;
                lookup_table[l][r]
            }
        }
    }

    /// Redirects every table entry through `mapping`.
    pub fn apply_abstraction_to_lookup_table(&mut self, mapping: &AbstractionMapping) {
        debug!("applying abstraction to lookup table");
        let remap = |entry: &mut Option<usize>| {
            *entry = entry.and_then(|state| mapping[state]);
        };
        match self {
            Self::Leaf { lookup_table, .. } => lookup_table.iter_mut().for_each(remap),
            Self::Merge { lookup_table, .. } => lookup_table
                .iter_mut()
                .for_each(|row| row.iter_mut().for_each(remap)),
        }
    }

    /// Task variables covered by the leaves, in left-to-right order.
    pub fn variables(&self) -> Vec<usize> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<usize>) {
        match self {
            Self::Leaf { var, .. } => vars.push(*var),
            Self::Merge { left, right, .. } => {
                left.collect_variables(vars);
                right.collect_variables(vars);
            }
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}
