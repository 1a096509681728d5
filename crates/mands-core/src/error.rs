// Rust guideline compliant 2026-02-06

//! Error types for the merge-and-shrink core library.
//!
//! Only recoverable conditions live here. Contract violations (invalid
//! component indices, querying distances before they are computed, asking
//! for costs before finalization) are programming errors and panic.
//! Unsolvability is a regular outcome and never an error.

use thiserror::Error;

/// Result type alias for merge-and-shrink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for merge-and-shrink operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The planning task is malformed.
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Configuration file or environment value is invalid.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// An abstraction could not be allocated.
    #[error("Out of memory: could not allocate {requested} abstract states")]
    OutOfMemory {
        /// Number of abstract states that were requested.
        requested: usize,
    },
}
