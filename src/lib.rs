/// ygo-deckdb - Yu-Gi-Oh! card database generator
///
/// Resolves free-text, possibly misspelled card names against the
/// YGOPRODeck card database and renders the matched cards as a reference
/// document, recording every name correction it makes.

pub mod cli;
pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
