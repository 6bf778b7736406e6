//! In-memory snapshot of the full card catalog.
//!
//! Loaded once, before any resolution starts, and read-only afterwards, so
//! concurrent resolutions share it without locking. A failed or empty load
//! is not fatal: the catalog is just empty and the local stages report no
//! match.

use tracing::{info, warn};

use crate::core::client::CardDataSource;
use crate::core::models::CardRecord;

#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    records: Vec<CardRecord>,
    /// Canonical names, parallel to `records`.
    names: Vec<String>,
}

impl ReferenceCatalog {
    /// Build a catalog from already-fetched records.
    pub fn new(records: Vec<CardRecord>) -> Self {
        let names = records.iter().map(|card| card.name.clone()).collect();
        Self { records, names }
    }

    /// An empty catalog. Local fuzzy and token stages become no-ops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch the full catalog from `source`.
    ///
    /// Fetch failures are logged and yield an empty catalog.
    pub async fn load(source: &dyn CardDataSource) -> Self {
        match source.get_all_cards().await {
            Ok(records) => {
                if records.is_empty() {
                    warn!("Card catalog fetch returned no cards; local matching disabled");
                } else {
                    info!(cards = records.len(), "Loaded card catalog");
                }
                Self::new(records)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load card catalog; local matching disabled");
                Self::empty()
            }
        }
    }

    pub fn all_records(&self) -> &[CardRecord] {
        &self.records
    }

    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    /// First record whose canonical name equals `name` exactly.
    pub fn record_by_name(&self, name: &str) -> Option<&CardRecord> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .map(|idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
