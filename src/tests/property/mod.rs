//! Property-based tests
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Test Modules
//!
//! - `similarity_props`: the blended similarity scorer
//!   - Score is within [0, 1]
//!   - Identical strings (ignoring case) score 1.0
//!   - Edit-distance ratio is symmetric
//!
//! - `variant_props`: the spelling variant generator
//!   - The original name is always the first variant
//!   - No duplicate variants

mod similarity_props;
mod variant_props;
