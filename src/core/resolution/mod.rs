//! Card name resolution.
//!
//! Reconciles free-text card names against the card database, tolerating
//! typos, word-order changes and the usual archetype-naming drift. Every
//! approximate match is recorded as a correction.
//!
//! # Module Structure
//!
//! - [`similarity`]: Blended similarity scorer (leaf, no dependencies)
//! - [`variants`]: Spelling variant generator and word tokenizer
//! - [`catalog`]: Read-only snapshot of the full card catalog
//! - [`stages`]: The individual pipeline stages
//! - [`engine`]: [`ResolutionEngine`], memoization and correction tracking
//! - [`error`]: Error types

pub mod catalog;
pub mod engine;
pub mod error;
pub mod similarity;
pub mod stages;
pub mod variants;

pub use catalog::ReferenceCatalog;
pub use engine::{ResolutionEngine, DEFAULT_SIMILARITY_THRESHOLD};
pub use error::{ResolutionError, Result};
pub use similarity::similarity;
pub use stages::{ResolutionStage, ResolvedMatch, StageKind};
pub use variants::{spelling_variants, word_tokens};
