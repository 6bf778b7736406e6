//! Batch database generation.
//!
//! Resolves a whole deck list through a shared [`ResolutionEngine`] and
//! renders the results into one document.
//!
//! ```text
//! deck list ──trim/filter──> names
//!                              │ buffered(max_workers), deck order kept
//!                              v
//!                    engine.resolve(name) ──> CardEntry
//!                              │
//!                              v
//!                  render_document(format, title, entries)
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::ConfigError;
use crate::core::client::ClientError;
use crate::core::deck::{self, DeckError};
use crate::core::render::{self, CardEntry, OutputFormat, RenderError, DEFAULT_TITLE};
use crate::core::resolution::{ResolutionEngine, ResolutionError};

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Card data source error: {0}")]
    Client(#[from] ClientError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

// ============================================================================
// Report
// ============================================================================

/// Outcome of one batch.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub document: String,
    pub format: OutputFormat,
    /// Deck entries processed, after blank lines were dropped.
    pub total: usize,
    /// Resolved under exactly the name the deck used.
    pub exact: usize,
    /// Resolved under a different canonical name.
    pub corrected: usize,
    pub not_found: usize,
    /// Original -> canonical name, for every correction the engine made.
    pub corrections: BTreeMap<String, String>,
    pub generated_at: DateTime<Utc>,
}

impl GenerationReport {
    pub fn found(&self) -> usize {
        self.exact + self.corrected
    }
}

// ============================================================================
// Generator
// ============================================================================

pub struct DatabaseGenerator {
    engine: Arc<ResolutionEngine>,
    format: OutputFormat,
    title: String,
    max_workers: usize,
}

impl DatabaseGenerator {
    pub fn new(engine: Arc<ResolutionEngine>, format: OutputFormat) -> Self {
        Self {
            engine,
            format,
            title: DEFAULT_TITLE.to_string(),
            max_workers: 1,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Maximum resolutions in flight at once. Zero is treated as one.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Resolve and render `deck`.
    pub async fn generate(&self, deck: &[String]) -> Result<GenerationReport> {
        self.generate_with_progress(deck, |_| {}).await
    }

    /// Like [`generate`](Self::generate), calling `on_entry` as each card
    /// finishes, in deck order.
    #[instrument(skip_all, fields(cards = deck.len(), format = %self.format))]
    pub async fn generate_with_progress<F>(&self, deck: &[String], on_entry: F) -> Result<GenerationReport>
    where
        F: Fn(&CardEntry),
    {
        let names: Vec<&str> = deck
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        info!(cards = names.len(), workers = self.max_workers, "Resolving deck list");

        let entries: Vec<CardEntry> = stream::iter(names.iter().copied())
            .map(|name| {
                let engine = Arc::clone(&self.engine);
                async move {
                    let card = engine.resolve(name).await;
                    CardEntry::new(name, card.as_ref())
                }
            })
            .buffered(self.max_workers)
            .inspect(|entry| on_entry(entry))
            .collect()
            .await;

        let mut exact = 0;
        let mut corrected = 0;
        let mut not_found = 0;
        for entry in &entries {
            match &entry.view {
                Some(view) if view.matched_name == entry.query => exact += 1,
                Some(_) => corrected += 1,
                None => not_found += 1,
            }
        }

        let document = render::render_document(self.format, &self.title, &entries)?;
        let report = GenerationReport {
            document,
            format: self.format,
            total: entries.len(),
            exact,
            corrected,
            not_found,
            corrections: self.engine.name_corrections().await,
            generated_at: Utc::now(),
        };

        info!(
            total = report.total,
            exact = report.exact,
            corrected = report.corrected,
            not_found = report.not_found,
            "Deck list resolved"
        );
        Ok(report)
    }

    /// Write the rendered document to `path`, creating parent directories.
    pub fn write(&self, report: &GenerationReport, path: &Path) -> Result<()> {
        deck::write_file(path, &report.document)?;
        info!(path = %path.display(), format = %report.format, "Wrote card database");
        Ok(())
    }
}
