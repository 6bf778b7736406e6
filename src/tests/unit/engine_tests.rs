//! Resolution engine scenarios across the pipeline stages.

use std::sync::Arc;

use crate::core::client::MockCardDataSource;
use crate::core::models::CardRecord;
use crate::core::resolution::stages::TokenOverlapStage;
use crate::core::resolution::{ReferenceCatalog, ResolutionStage, StageKind};
use crate::tests::mocks::{
    empty_source, engine_with, exact_source, monster, sample_catalog, spell, transport_error,
};

// ============================================================================
// Exact stage
// ============================================================================

#[tokio::test]
async fn test_exact_match_records_no_correction() {
    let mut source = MockCardDataSource::new();
    source
        .expect_get_card_by_name()
        .times(1)
        .returning(|name| Ok(Some(monster(name))));
    source.expect_search_cards().never();
    let engine = engine_with(source, sample_catalog(), 0.7);

    let found = engine.resolve_match("Dark Magician").await.unwrap();

    assert_eq!(found.record.name, "Dark Magician");
    assert_eq!(found.stage, StageKind::Exact);
    assert!(found.similarity.is_none());
    assert!(engine.name_corrections().await.is_empty());
}

#[tokio::test]
async fn test_exact_lookup_trims_but_keeps_query_as_key() {
    let engine = engine_with(exact_source(&["Pot of Greed"]), ReferenceCatalog::empty(), 0.7);

    let card = engine.resolve("  Pot of Greed ").await.unwrap();

    assert_eq!(card.name, "Pot of Greed");
    // The untrimmed query differs from the canonical name.
    assert_eq!(
        engine.correction_for("  Pot of Greed ").await.as_deref(),
        Some("Pot of Greed")
    );
}

#[tokio::test]
async fn test_exact_lookup_error_falls_through() {
    let mut source = MockCardDataSource::new();
    source
        .expect_get_card_by_name()
        .returning(|_| Err(transport_error()));
    source.expect_search_cards().returning(|_| Ok(Vec::new()));
    let engine = engine_with(source, sample_catalog(), 0.7);

    let found = engine.resolve_match("Dark Magician").await.unwrap();

    assert_eq!(found.stage, StageKind::LocalFuzzy);
    assert_eq!(found.record.name, "Dark Magician");
}

// ============================================================================
// Remote fuzzy stage
// ============================================================================

#[tokio::test]
async fn test_typo_corrected_by_remote_search() {
    let mut source = MockCardDataSource::new();
    source.expect_get_card_by_name().returning(|_| Ok(None));
    source.expect_search_cards().returning(|search| {
        Ok(if search == "Magician" {
            vec![monster("Dark Magician Girl"), monster("Dark Magician")]
        } else {
            Vec::new()
        })
    });
    let engine = engine_with(source, ReferenceCatalog::empty(), 0.7);

    let found = engine.resolve_match("Drak Magician").await.unwrap();

    assert_eq!(found.record.name, "Dark Magician");
    assert_eq!(found.stage, StageKind::RemoteFuzzy);
    assert!(found.similarity.unwrap() >= 0.7);
    assert_eq!(
        engine.name_corrections().await.get("Drak Magician").map(String::as_str),
        Some("Dark Magician")
    );
}

#[tokio::test]
async fn test_remote_search_error_skips_to_local_stage() {
    let mut source = MockCardDataSource::new();
    source.expect_get_card_by_name().returning(|_| Ok(None));
    source
        .expect_search_cards()
        .times(1)
        .returning(|_| Err(transport_error()));
    let engine = engine_with(source, sample_catalog(), 0.7);

    let found = engine.resolve_match("Drak Magician").await.unwrap();

    assert_eq!(found.stage, StageKind::LocalFuzzy);
    assert_eq!(found.record.name, "Dark Magician");
}

#[tokio::test]
async fn test_remote_tie_keeps_first_search_result() {
    // Same canonical name from two searches, so the scores tie exactly; ids
    // tell the records apart.
    let mut source = MockCardDataSource::new();
    source.expect_get_card_by_name().returning(|_| Ok(None));
    source.expect_search_cards().returning(|search| {
        let with_id = |id| CardRecord { id, ..monster("Dark Magician") };
        Ok(match search {
            "Drak" => vec![with_id(1), with_id(2)],
            "Magician" => vec![with_id(3)],
            _ => Vec::new(),
        })
    });
    let engine = engine_with(source, ReferenceCatalog::empty(), 0.7);

    let found = engine.resolve_match("Drak Magician").await.unwrap();

    assert_eq!(found.stage, StageKind::RemoteFuzzy);
    assert_eq!(found.record.id, 1);
}

#[tokio::test]
async fn test_weak_remote_candidate_falls_through_to_local() {
    let mut source = MockCardDataSource::new();
    source.expect_get_card_by_name().returning(|_| Ok(None));
    source
        .expect_search_cards()
        .times(1..)
        .returning(|_| Ok(vec![spell("Pot of Greed")]));
    let engine = engine_with(source, sample_catalog(), 0.7);

    let found = engine.resolve_match("Drak Magician").await.unwrap();

    assert_eq!(found.stage, StageKind::LocalFuzzy);
    assert_eq!(found.record.name, "Dark Magician");
}

// ============================================================================
// Local fuzzy and token overlap stages
// ============================================================================

#[tokio::test]
async fn test_local_fuzzy_match_on_catalog() {
    let engine = engine_with(empty_source(), sample_catalog(), 0.7);

    let found = engine.resolve_match("Harpies' Feather Storm").await.unwrap();

    assert_eq!(found.record.name, "Harpie's Feather Storm");
    assert_eq!(found.stage, StageKind::LocalFuzzy);
    assert_eq!(
        engine.correction_for("Harpies' Feather Storm").await.as_deref(),
        Some("Harpie's Feather Storm")
    );
}

#[tokio::test]
async fn test_token_overlap_catches_partial_names() {
    // Too far from the full name for the fuzzy stages at 0.9, but every
    // query word appears in it.
    let engine = engine_with(empty_source(), sample_catalog(), 0.9);

    let found = engine.resolve_match("Crystal Beast Ruby").await.unwrap();

    assert_eq!(found.record.name, "Crystal Beast Ruby Carbuncle");
    assert_eq!(found.stage, StageKind::TokenOverlap);
}

#[tokio::test]
async fn test_single_word_never_uses_token_overlap() {
    let stage = TokenOverlapStage::new(Arc::new(sample_catalog()), 0.9);
    assert!(stage.attempt("Carbuncle").await.is_none());

    let engine = engine_with(empty_source(), sample_catalog(), 0.9);
    assert!(engine.resolve("Carbuncle").await.is_none());
}

#[tokio::test]
async fn test_empty_catalog_and_silent_source_is_not_found() {
    let engine = engine_with(empty_source(), ReferenceCatalog::empty(), 0.7);

    assert!(engine.resolve("Drak Magician").await.is_none());
    assert!(engine.name_corrections().await.is_empty());
}

// ============================================================================
// Memoization and invariants
// ============================================================================

#[tokio::test]
async fn test_repeat_resolution_is_memoized() {
    let mut source = MockCardDataSource::new();
    source
        .expect_get_card_by_name()
        .times(1)
        .returning(|name| Ok(Some(monster(name))));
    let engine = engine_with(source, ReferenceCatalog::empty(), 0.7);

    let first = engine.resolve("Dark Magician").await;
    let second = engine.resolve("Dark Magician").await;

    assert_eq!(first, second);
    assert_eq!(engine.cached_count().await, 1);
}

#[tokio::test]
async fn test_not_found_is_memoized() {
    let mut source = MockCardDataSource::new();
    source
        .expect_get_card_by_name()
        .times(1)
        .returning(|_| Ok(None));
    source.expect_search_cards().returning(|_| Ok(Vec::new()));
    let engine = engine_with(source, ReferenceCatalog::empty(), 0.7);

    assert!(engine.resolve("Zzzz Qqqq").await.is_none());
    assert!(engine.resolve("Zzzz Qqqq").await.is_none());
    assert_eq!(engine.cached_count().await, 1);
}

#[tokio::test]
async fn test_lower_threshold_never_loses_a_match() {
    let thresholds = [0.95, 0.9, 0.75, 0.6, 0.4];
    let mut found_at_higher = false;

    for threshold in thresholds {
        let engine = engine_with(empty_source(), sample_catalog(), threshold);
        let found = engine.resolve("Crystal Beast Ruby").await.is_some();
        if found_at_higher {
            assert!(found, "lost the match at threshold {threshold}");
        }
        found_at_higher |= found;
    }
    assert!(found_at_higher);
}

#[tokio::test]
async fn test_lower_threshold_never_loses_a_remote_match() {
    let thresholds = [0.99, 0.95, 0.9, 0.8, 0.7, 0.5];
    let mut found_at_higher = false;

    for threshold in thresholds {
        let mut source = MockCardDataSource::new();
        source.expect_get_card_by_name().returning(|_| Ok(None));
        source.expect_search_cards().returning(|search| {
            Ok(if search == "Magician" {
                vec![monster("Dark Magician")]
            } else {
                Vec::new()
            })
        });
        let engine = engine_with(source, ReferenceCatalog::empty(), threshold);

        let found = engine.resolve_match("Drak Magician").await;
        if let Some(found) = &found {
            assert_eq!(found.stage, StageKind::RemoteFuzzy);
        }
        if found_at_higher {
            assert!(found.is_some(), "lost the remote match at threshold {threshold}");
        }
        found_at_higher |= found.is_some();
    }
    assert!(found_at_higher);
}

#[tokio::test]
async fn test_concurrent_resolutions_agree() {
    let engine = Arc::new(engine_with(
        exact_source(&["Dark Magician"]),
        sample_catalog(),
        0.7,
    ));
    let queries = ["Dark Magician", "Drak Magician", "Pot of Gred", "Zzzz Qqqq"];

    let mut handles = Vec::new();
    for i in 0..32 {
        let engine = Arc::clone(&engine);
        let query = queries[i % queries.len()];
        handles.push(tokio::spawn(async move {
            (query, engine.resolve(query).await.map(|card| card.name))
        }));
    }

    for handle in handles {
        let (query, name) = handle.await.unwrap();
        let expected = match query {
            "Dark Magician" | "Drak Magician" => Some("Dark Magician"),
            "Pot of Gred" => Some("Pot of Greed"),
            _ => None,
        };
        assert_eq!(name.as_deref(), expected, "{query}");
    }

    let corrections = engine.name_corrections().await;
    assert_eq!(corrections.len(), 2);
    assert_eq!(engine.cached_count().await, queries.len());
}
