//! Remote card data source.
//!
//! The resolution engine only depends on the [`CardDataSource`] trait. The
//! production implementation is [`YgoProDeckClient`], which talks to the
//! YGOPRODeck `cardinfo.php` API and keeps responses in a [`ResponseCache`].
//!
//! # Module Structure
//!
//! - [`error`]: Client error types
//! - [`cache`]: In-memory LRU + on-disk JSON response cache
//! - [`ygoprodeck`]: reqwest-based HTTP client

pub mod cache;
pub mod error;
pub mod ygoprodeck;

use async_trait::async_trait;

use crate::core::models::CardRecord;

pub use cache::ResponseCache;
pub use error::{ClientError, Result};
pub use ygoprodeck::{encode_card_name, YgoProDeckClient};

/// Source of card records.
///
/// "Nothing matched" is `Ok(None)` / `Ok(vec![])`; `Err` is reserved for
/// transport and decoding failures. The resolution engine treats both the
/// same way, but keeping them apart lets it log the failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardDataSource: Send + Sync {
    /// Exact-name lookup. Implementations must percent-encode apostrophes
    /// and quotation marks.
    async fn get_card_by_name(&self, name: &str) -> Result<Option<CardRecord>>;

    /// Partial-name search.
    async fn search_cards(&self, query: &str) -> Result<Vec<CardRecord>>;

    /// Every card known to the source.
    async fn get_all_cards(&self) -> Result<Vec<CardRecord>>;
}
