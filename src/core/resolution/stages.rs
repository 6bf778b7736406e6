//! Resolution stages, in pipeline order.
//!
//! Each stage implements [`ResolutionStage`]: given the raw query it either
//! accepts a match or passes. The engine runs them in order and stops at
//! the first acceptance.
//!
//! ```text
//! 1. ExactMatchStage      remote exact-name lookup
//! 2. RemoteFuzzyStage     remote partial searches, scored locally
//! 3. LocalFuzzyStage      spelling variants vs. the catalog names
//! 4. TokenOverlapStage    shared-word scoring vs. the catalog (multi-word only)
//! ```
//!
//! Data-source failures never escape a stage: they are logged and the stage
//! reports no match.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::ReferenceCatalog;
use super::similarity::similarity;
use super::variants::{spelling_variants, word_tokens};
use crate::core::client::CardDataSource;
use crate::core::models::CardRecord;

/// Archetype prefixes worth a dedicated partial search. Only the first
/// prefix the query starts with is used.
pub const ARCHETYPE_PREFIXES: &[&str] = &[
    "Snake-eye",
    "Snake-Eye",
    "Fiendsmith",
    "Crystal Beast",
    "World Legacy",
    "Allure Queen",
];

/// Token overlap accepts at a looser bar than the fuzzy stages: shared
/// words are evidence on their own.
const TOKEN_THRESHOLD_DIVISOR: f64 = 1.5;

/// Weight of the similarity component in the token-overlap score.
const TOKEN_SIMILARITY_WEIGHT: f64 = 10.0;

// ============================================================================
// Stage types
// ============================================================================

/// Which stage accepted a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Exact,
    RemoteFuzzy,
    LocalFuzzy,
    TokenOverlap,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Exact => "exact",
            StageKind::RemoteFuzzy => "remote_fuzzy",
            StageKind::LocalFuzzy => "local_fuzzy",
            StageKind::TokenOverlap => "token_overlap",
        };
        f.write_str(name)
    }
}

/// A match accepted by one of the stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub record: CardRecord,
    pub stage: StageKind,
    /// Similarity between the query and the matched name. `None` for exact
    /// lookups, which are not scored.
    pub similarity: Option<f64>,
}

impl ResolvedMatch {
    fn new(record: CardRecord, stage: StageKind, similarity: Option<f64>) -> Self {
        Self {
            record,
            stage,
            similarity,
        }
    }
}

/// One step of the resolution pipeline.
#[async_trait]
pub trait ResolutionStage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Try to resolve `query`. `None` passes to the next stage.
    async fn attempt(&self, query: &str) -> Option<ResolvedMatch>;
}

// ============================================================================
// Stage 1: exact lookup
// ============================================================================

pub struct ExactMatchStage {
    source: Arc<dyn CardDataSource>,
}

impl ExactMatchStage {
    pub fn new(source: Arc<dyn CardDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ResolutionStage for ExactMatchStage {
    fn kind(&self) -> StageKind {
        StageKind::Exact
    }

    async fn attempt(&self, query: &str) -> Option<ResolvedMatch> {
        let cleaned = query.trim();
        if cleaned.is_empty() {
            return None;
        }

        match self.source.get_card_by_name(cleaned).await {
            Ok(Some(record)) => {
                debug!(query, matched = %record.name, "Exact match");
                Some(ResolvedMatch::new(record, self.kind(), None))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(query, error = %e, "Exact lookup failed");
                None
            }
        }
    }
}

// ============================================================================
// Stage 2: remote partial search
// ============================================================================

pub struct RemoteFuzzyStage {
    source: Arc<dyn CardDataSource>,
    threshold: f64,
}

impl RemoteFuzzyStage {
    pub fn new(source: Arc<dyn CardDataSource>, threshold: f64) -> Self {
        Self { source, threshold }
    }
}

#[async_trait]
impl ResolutionStage for RemoteFuzzyStage {
    fn kind(&self) -> StageKind {
        StageKind::RemoteFuzzy
    }

    async fn attempt(&self, query: &str) -> Option<ResolvedMatch> {
        let mut best: Option<(CardRecord, f64)> = None;

        for search in search_queries(query) {
            let results = match self.source.search_cards(&search).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(query, search = %search, error = %e, "Partial search failed");
                    return None;
                }
            };

            for card in results {
                let score = similarity(query, &card.name);
                // Strictly greater: the first candidate seen keeps a tie.
                if best.as_ref().map_or(true, |(_, top)| score > *top) {
                    best = Some((card, score));
                }
            }
        }

        let (record, score) = best?;
        if score >= self.threshold {
            debug!(query, matched = %record.name, similarity = score, "Remote fuzzy match");
            Some(ResolvedMatch::new(record, self.kind(), Some(score)))
        } else {
            None
        }
    }
}

/// Partial-search queries for `query`, in a stable order without duplicates.
///
/// 1. A short prefix (`min(5, len / 2)` chars for names over 5 chars, else 3)
/// 2. The first word, for multi-word names
/// 3. The longest word (first one on ties)
/// 4. Everything before the first apostrophe
/// 5. A known archetype prefix the name starts with
pub fn search_queries(query: &str) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        if !candidate.trim().is_empty() && !queries.iter().any(|q| q == candidate) {
            queries.push(candidate.to_string());
        }
    };

    let len = query.chars().count();
    let prefix_len = if len > 5 { (len / 2).min(5) } else { 3 };
    let prefix: String = query.chars().take(prefix_len).collect();
    push(prefix.as_str());

    let mut words = query.split_whitespace();
    if let (Some(first), Some(_)) = (words.next(), words.next()) {
        push(first);
    }

    let longest = word_tokens(query)
        .into_iter()
        .fold(None::<&str>, |best, token| match best {
            Some(b) if b.chars().count() >= token.chars().count() => Some(b),
            _ => Some(token),
        });
    if let Some(token) = longest {
        push(token);
    }

    if let Some((before, _)) = query.split_once('\'') {
        push(before);
    }

    if let Some(archetype) = ARCHETYPE_PREFIXES.iter().copied().find(|p| query.starts_with(p)) {
        push(archetype);
    }

    queries
}

// ============================================================================
// Stage 3: local fuzzy match
// ============================================================================

pub struct LocalFuzzyStage {
    catalog: Arc<ReferenceCatalog>,
    threshold: f64,
}

impl LocalFuzzyStage {
    pub fn new(catalog: Arc<ReferenceCatalog>, threshold: f64) -> Self {
        Self { catalog, threshold }
    }
}

#[async_trait]
impl ResolutionStage for LocalFuzzyStage {
    fn kind(&self) -> StageKind {
        StageKind::LocalFuzzy
    }

    async fn attempt(&self, query: &str) -> Option<ResolvedMatch> {
        if self.catalog.is_empty() {
            return None;
        }

        let catalog = Arc::clone(&self.catalog);
        let owned = query.to_string();
        let threshold = self.threshold;
        let (record, variant, score) =
            scan_catalog(query, move || local_fuzzy_scan(&catalog, &owned, threshold)).await?;

        debug!(query, matched = %record.name, variant = %variant, similarity = score, "Local fuzzy match");
        Some(ResolvedMatch::new(record, self.kind(), Some(score)))
    }
}

/// Run a whole-catalog scan on the blocking pool so concurrent resolutions
/// scan in parallel and the runtime workers stay free for network I/O.
async fn scan_catalog<T, F>(query: &str, scan: F) -> Option<T>
where
    F: FnOnce() -> Option<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(scan).await {
        Ok(found) => found,
        Err(e) => {
            warn!(query, error = %e, "Catalog scan task failed");
            None
        }
    }
}

/// Closest catalog name for the first spelling variant that clears
/// `threshold`, with the variant used and the query's similarity to it.
fn local_fuzzy_scan(
    catalog: &ReferenceCatalog,
    query: &str,
    threshold: f64,
) -> Option<(CardRecord, String, f64)> {
    for variant in spelling_variants(query) {
        let Some(name) = closest_match(&variant, catalog.all_names(), threshold) else {
            continue;
        };
        let record = catalog.record_by_name(name)?.clone();
        let score = similarity(query, name);
        return Some((record, variant, score));
    }
    None
}

/// Best-scoring candidate whose similarity to `target` is at least
/// `cutoff`. The earliest candidate wins a tie.
pub fn closest_match<'a>(target: &str, candidates: &'a [String], cutoff: f64) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = similarity(target, candidate);
        if score >= cutoff && best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate.as_str(), score));
        }
    }
    best.map(|(name, _)| name)
}

// ============================================================================
// Stage 4: token overlap
// ============================================================================

pub struct TokenOverlapStage {
    catalog: Arc<ReferenceCatalog>,
    threshold: f64,
}

impl TokenOverlapStage {
    pub fn new(catalog: Arc<ReferenceCatalog>, threshold: f64) -> Self {
        Self { catalog, threshold }
    }
}

struct TokenCandidate<'a> {
    record: &'a CardRecord,
    score: f64,
    similarity: f64,
}

#[async_trait]
impl ResolutionStage for TokenOverlapStage {
    fn kind(&self) -> StageKind {
        StageKind::TokenOverlap
    }

    async fn attempt(&self, query: &str) -> Option<ResolvedMatch> {
        if word_tokens(query).len() < 2 || self.catalog.is_empty() {
            return None;
        }

        let catalog = Arc::clone(&self.catalog);
        let owned = query.to_string();
        let threshold = self.threshold;
        let (record, sim, score) =
            scan_catalog(query, move || token_overlap_scan(&catalog, &owned, threshold)).await?;

        if sim >= self.threshold / TOKEN_THRESHOLD_DIVISOR {
            debug!(
                query,
                matched = %record.name,
                similarity = sim,
                score,
                "Token overlap match"
            );
            Some(ResolvedMatch::new(record, self.kind(), Some(sim)))
        } else {
            None
        }
    }
}

/// Highest-scoring catalog record by shared words plus similarity, with its
/// similarity and combined score. Acceptance is left to the caller.
fn token_overlap_scan(
    catalog: &ReferenceCatalog,
    query: &str,
    threshold: f64,
) -> Option<(CardRecord, f64, f64)> {
    let tokens: Vec<String> = word_tokens(query)
        .into_iter()
        .map(str::to_lowercase)
        .collect();

    let mut best: Option<TokenCandidate<'_>> = None;

    for record in catalog.all_records() {
        let name_lower = record.name.to_lowercase();
        let name_tokens: HashSet<&str> = word_tokens(&name_lower).into_iter().collect();

        // Longer shared words count for more.
        let matched_weight: usize = tokens
            .iter()
            .filter(|token| name_tokens.contains(token.as_str()))
            .map(|token| token.chars().count())
            .sum();

        let sim = similarity(query, &record.name);
        if matched_weight == 0 && sim <= threshold / 2.0 {
            continue;
        }

        let score = matched_weight as f64 + sim * TOKEN_SIMILARITY_WEIGHT;
        let better = match &best {
            None => true,
            Some(top) => score > top.score || (score == top.score && sim > top.similarity),
        };
        if better {
            best = Some(TokenCandidate {
                record,
                score,
                similarity: sim,
            });
        }
    }

    best.map(|top| (top.record.clone(), top.similarity, top.score))
}
