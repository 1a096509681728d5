// Rust guideline compliant 2026-02-06

//! Shared vocabulary types.

/// Distance value used for unreachable states and label ranks.
pub const INF: u32 = u32::MAX;

/// A set of abstract states that an abstraction maps to one state.
pub type StateEquivalenceClass = Vec<usize>;

/// A partition of (a subset of) the abstract states. States that appear in
/// no class are pruned.
pub type StateEquivalenceRelation = Vec<StateEquivalenceClass>;

/// Maps every old abstract state to its new state, `None` if pruned.
pub type AbstractionMapping = Vec<Option<usize>>;

/// Label reductions as `(new_label, old_labels)` pairs.
pub type LabelMapping = Vec<(usize, Vec<usize>)>;
