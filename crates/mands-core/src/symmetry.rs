// Rust guideline compliant 2026-02-06

//! Boundary to an external symmetry detector.
//!
//! Symmetries of the factored transition system are computed elsewhere (for
//! example by an automorphism solver over a problem description graph). The
//! construction only consumes their effect on components.

use crate::FactoredTransitionSystem;

/// A symmetry generator expressed by its action on components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryGenerator {
    /// `component_permutation[i]` is the component index `i` is mapped to.
    /// Entries for dead slots map to themselves.
    pub component_permutation: Vec<usize>,
}

impl SymmetryGenerator {
    /// Creates a generator from a component permutation.
    pub fn new(component_permutation: Vec<usize>) -> Self {
        Self {
            component_permutation,
        }
    }

    /// Components moved by the generator, in increasing order.
    pub fn affected_components(&self) -> Vec<usize> {
        self.component_permutation
            .iter()
            .enumerate()
            .filter(|(from, to)| from != *to)
            .map(|(from, _)| from)
            .collect()
    }

    /// Whether the generator is the identity.
    pub fn is_identity(&self) -> bool {
        self.affected_components().is_empty()
    }
}

/// Source of symmetry generators for the current factored system.
pub trait SymmetryOracle: std::fmt::Debug {
    /// Computes generators for the active components of `fts`.
    fn compute_generators(&mut self, fts: &FactoredTransitionSystem) -> Vec<SymmetryGenerator>;
}

/// Oracle that never finds symmetries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymmetries;

impl SymmetryOracle for NoSymmetries {
    fn compute_generators(&mut self, _fts: &FactoredTransitionSystem) -> Vec<SymmetryGenerator> {
        Vec::new()
    }
}
