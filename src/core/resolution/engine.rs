//! Card name resolution engine.
//!
//! The [`ResolutionEngine`] turns free-text card names into canonical
//! [`CardRecord`]s by running an ordered list of [`ResolutionStage`]s.
//!
//! # Resolution Order
//!
//! ```text
//! memo hit? ──yes──> memoized outcome
//!     │
//!     no
//!     v
//! exact ─> remote fuzzy ─> local fuzzy ─> token overlap ─> not found
//! ```
//!
//! The first stage to accept a match wins. Every outcome, including "not
//! found", is memoized under the exact query string, and every accepted
//! match whose canonical name differs from the query is recorded as a
//! correction.
//!
//! # Thread Safety
//!
//! The memo and the correction map live in one `tokio::sync::RwLock` owned
//! by the engine instance. They are written together in a single critical
//! section after the pipeline finishes, so a resolution dropped mid-flight
//! leaves no partial state behind. Two concurrent resolutions of the same
//! uncached query may both run the pipeline; the last writer wins, which is
//! harmless because the outcome is a function of the query and the catalog.
//!
//! # Usage
//!
//! ```rust,ignore
//! let engine = ResolutionEngine::new(client, 0.7).await?;
//!
//! if let Some(card) = engine.resolve("Drak Magician").await {
//!     assert_eq!(card.name, "Dark Magician");
//! }
//! let corrections = engine.name_corrections().await;
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::catalog::ReferenceCatalog;
use super::error::{ResolutionError, Result};
use super::stages::{
    ExactMatchStage, LocalFuzzyStage, RemoteFuzzyStage, ResolutionStage, ResolvedMatch,
    TokenOverlapStage,
};
use crate::core::client::CardDataSource;
use crate::core::models::CardRecord;

/// Default minimum similarity for the fuzzy stages.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Default)]
struct EngineState {
    /// Query -> outcome. `None` is a memoized "not found".
    memo: HashMap<String, Option<ResolvedMatch>>,

    /// Original query -> canonical name, only where the two differ.
    corrections: HashMap<String, String>,
}

/// Multi-stage fuzzy resolver for card names.
///
/// Each instance owns its memo and correction map; nothing is shared
/// between instances.
pub struct ResolutionEngine {
    stages: Vec<Box<dyn ResolutionStage>>,
    catalog: Arc<ReferenceCatalog>,
    threshold: f64,
    state: RwLock<EngineState>,
}

impl ResolutionEngine {
    /// Create an engine, fetching the reference catalog from `source`.
    ///
    /// # Errors
    ///
    /// - `ResolutionError::InvalidThreshold` if `similarity_threshold` is not
    ///   in `(0, 1]`
    pub async fn new(source: Arc<dyn CardDataSource>, similarity_threshold: f64) -> Result<Self> {
        validate_threshold(similarity_threshold)?;
        let catalog = ReferenceCatalog::load(source.as_ref()).await;
        Self::with_catalog(source, catalog, similarity_threshold)
    }

    /// Create an engine around an already-loaded catalog.
    pub fn with_catalog(
        source: Arc<dyn CardDataSource>,
        catalog: ReferenceCatalog,
        similarity_threshold: f64,
    ) -> Result<Self> {
        validate_threshold(similarity_threshold)?;
        let catalog = Arc::new(catalog);

        let stages: Vec<Box<dyn ResolutionStage>> = vec![
            Box::new(ExactMatchStage::new(Arc::clone(&source))),
            Box::new(RemoteFuzzyStage::new(Arc::clone(&source), similarity_threshold)),
            Box::new(LocalFuzzyStage::new(Arc::clone(&catalog), similarity_threshold)),
            Box::new(TokenOverlapStage::new(Arc::clone(&catalog), similarity_threshold)),
        ];

        Ok(Self {
            stages,
            catalog,
            threshold: similarity_threshold,
            state: RwLock::new(EngineState::default()),
        })
    }

    /// Resolve `query` to a card, or `None` if no stage accepts a match.
    pub async fn resolve(&self, query: &str) -> Option<CardRecord> {
        self.resolve_match(query).await.map(|m| m.record)
    }

    /// Like [`resolve`](Self::resolve), but also reports which stage
    /// accepted the match and its similarity.
    pub async fn resolve_match(&self, query: &str) -> Option<ResolvedMatch> {
        if let Some(outcome) = self.state.read().await.memo.get(query) {
            debug!(query, "Resolution cache hit");
            return outcome.clone();
        }

        let mut accepted = None;
        for stage in &self.stages {
            if let Some(found) = stage.attempt(query).await {
                accepted = Some(found);
                break;
            }
        }

        let mut state = self.state.write().await;
        match &accepted {
            Some(found) => {
                if found.record.name != query {
                    info!(
                        original = query,
                        corrected = %found.record.name,
                        stage = %found.stage,
                        "Corrected card name"
                    );
                    state
                        .corrections
                        .insert(query.to_string(), found.record.name.clone());
                }
            }
            None => warn!(query, "No card found"),
        }
        state.memo.insert(query.to_string(), accepted.clone());

        accepted
    }

    /// Every accepted non-identical match so far, original -> canonical.
    pub async fn name_corrections(&self) -> BTreeMap<String, String> {
        self.state
            .read()
            .await
            .corrections
            .iter()
            .map(|(original, corrected)| (original.clone(), corrected.clone()))
            .collect()
    }

    /// The recorded correction for `query`, if any.
    pub async fn correction_for(&self, query: &str) -> Option<String> {
        self.state.read().await.corrections.get(query).cloned()
    }

    /// Number of memoized outcomes (found and not found).
    pub async fn cached_count(&self) -> usize {
        self.state.read().await.memo.len()
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.threshold
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(ResolutionError::InvalidThreshold(threshold))
    }
}
