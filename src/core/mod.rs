pub mod client;
pub mod deck;
pub mod generator;
pub mod logging;
pub mod models;
pub mod render;

// Multi-stage card name resolution: similarity scoring, spelling variants,
// catalog snapshot and the resolution engine
pub mod resolution;
