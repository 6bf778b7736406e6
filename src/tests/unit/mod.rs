//! Unit tests for the resolution engine.

mod engine_tests;
