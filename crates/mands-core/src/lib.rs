// Rust guideline compliant 2026-02-06

//! Mands Core Library
//!
//! Merge-and-shrink abstraction heuristics for classical planning:
//! - Planning task model and labels
//! - Transition systems, distances and heuristic representations
//! - The factored transition system (component arena)
//! - Label reduction, shrink strategies and merge strategies
//! - The construction loop and the resulting heuristic
//! - Configuration and error types

pub mod causal_graph;
pub mod config;
pub mod distances;
pub mod error;
pub mod factored;
pub mod factory;
pub mod heuristic;
pub mod label_reduction;
pub mod labels;
pub mod memory;
pub mod merge;
pub mod representation;
pub mod shrink;
pub mod symmetry;
pub mod task;
pub mod transition_system;
pub mod types;

pub use causal_graph::CausalGraph;
pub use config::Config;
pub use distances::Distances;
pub use error::{Error, Result};
pub use factored::{Component, FactoredTransitionSystem};
pub use factory::create_factored_transition_system;
pub use heuristic::{
    BuildStatistics, HeuristicValue, IterationReport, MergeAndShrink, MergeAndShrinkHeuristic,
};
pub use label_reduction::{LabelReduction, LabelReductionMethod};
pub use labels::Labels;
pub use representation::HeuristicRepresentation;
pub use task::{Effect, Fact, Operator, Task, Variable};
pub use transition_system::{LabelGroup, Transition, TransitionSystem};
pub use types::INF;
