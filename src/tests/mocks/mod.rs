//! Card fixtures and mock data sources.
//!
//! The mock itself is generated by `mockall` on
//! [`CardDataSource`](crate::core::client::CardDataSource); this module
//! only builds common configurations of it.

#![allow(dead_code)]

use std::sync::Arc;

use crate::core::client::{CardDataSource, ClientError, MockCardDataSource};
use crate::core::models::CardRecord;
use crate::core::resolution::{ReferenceCatalog, ResolutionEngine};

// ============================================================================
// Card fixtures
// ============================================================================

pub fn monster(name: &str) -> CardRecord {
    CardRecord {
        atk: Some(2500),
        def: Some(2100),
        level: Some(7),
        race: Some("Spellcaster".to_string()),
        attribute: Some("DARK".to_string()),
        ..CardRecord::named(name).with_type("Normal Monster")
    }
}

pub fn spell(name: &str) -> CardRecord {
    CardRecord {
        race: Some("Normal".to_string()),
        ..CardRecord::named(name).with_type("Spell Card")
    }
}

/// A small catalog covering the typo scenarios used across the suites.
pub fn sample_catalog() -> ReferenceCatalog {
    ReferenceCatalog::new(vec![
        monster("Dark Magician"),
        monster("Dark Magician Girl"),
        spell("Harpie's Feather Storm"),
        spell("Harpie's Feather Duster"),
        monster("Crystal Beast Ruby Carbuncle"),
        spell("Pot of Greed"),
    ])
}

pub fn transport_error() -> ClientError {
    ClientError::Status {
        endpoint: "/cardinfo.php".to_string(),
        status: 503,
    }
}

// ============================================================================
// Mock data sources
// ============================================================================

/// A source that knows nothing: every lookup and search comes back empty.
pub fn empty_source() -> MockCardDataSource {
    let mut source = MockCardDataSource::new();
    source.expect_get_card_by_name().returning(|_| Ok(None));
    source.expect_search_cards().returning(|_| Ok(Vec::new()));
    source.expect_get_all_cards().returning(|| Ok(Vec::new()));
    source
}

/// A source whose exact lookup knows only `names`.
pub fn exact_source(names: &'static [&'static str]) -> MockCardDataSource {
    let mut source = MockCardDataSource::new();
    source
        .expect_get_card_by_name()
        .returning(move |name| Ok(names.iter().any(|n| *n == name).then(|| monster(name))));
    source.expect_search_cards().returning(|_| Ok(Vec::new()));
    source.expect_get_all_cards().returning(|| Ok(Vec::new()));
    source
}

pub fn engine_with(
    source: MockCardDataSource,
    catalog: ReferenceCatalog,
    threshold: f64,
) -> ResolutionEngine {
    let source: Arc<dyn CardDataSource> = Arc::new(source);
    ResolutionEngine::with_catalog(source, catalog, threshold)
        .expect("valid threshold in test setup")
}
