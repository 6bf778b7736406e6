//! Error types for the card name resolution engine.
//!
//! Resolution itself never fails: an unresolvable query is a
//! [`NotFound`](super::engine::ResolutionEngine::resolve) outcome, and data
//! source failures are absorbed by the stage that issued the call. The only
//! fallible operation is constructing an engine with a bad configuration.

use thiserror::Error;

/// Result type alias for resolution engine operations.
pub type Result<T> = std::result::Result<T, ResolutionError>;

#[derive(Error, Debug)]
pub enum ResolutionError {
    /// Similarity threshold outside of `(0, 1]`.
    #[error("Invalid similarity threshold {0}: must be greater than 0 and at most 1")]
    InvalidThreshold(f64),
}
