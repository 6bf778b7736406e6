//! Crate-internal test suites.
//!
//! - `mocks`: card fixtures and preconfigured mock data sources
//! - `unit`: resolution engine behavior across stages
//! - `property`: proptest invariants for scoring and variants

mod mocks;
mod property;
mod unit;
