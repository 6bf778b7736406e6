//! Output renderers.
//!
//! A batch becomes a list of [`CardEntry`] values (the user's query plus
//! the resolved view, if any) and [`render_document`] turns that list into
//! a single document in the chosen [`OutputFormat`].
//!
//! ```text
//!   CardEntry { query, view: Some(..) } --> card section
//!   CardEntry { query, view: None }     --> "not found" section
//!                                              |
//!   title + sections ---------------------> document
//! ```
//!
//! Unresolved cards always get a placeholder entry; a single missing card
//! never fails the whole document.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod rulings;
pub mod text;
pub mod view;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::CardRecord;

pub use rulings::generate_rulings;
pub use view::{CardKind, CardView, MonsterStats};

/// Default document title.
pub const DEFAULT_TITLE: &str = "Yu-Gi-Oh! Card Database";

pub(crate) const NOT_FOUND_TEXT: &str = "Card information not found in database.";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendered output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Supported document formats.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "text",
        };
        f.write_str(name)
    }
}

/// One line of the deck list and what it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct CardEntry {
    pub query: String,
    pub view: Option<CardView>,
}

impl CardEntry {
    pub fn new(query: impl Into<String>, card: Option<&CardRecord>) -> Self {
        let query = query.into();
        let view = card.map(|c| CardView::new(&query, c));
        Self { query, view }
    }

    pub fn is_found(&self) -> bool {
        self.view.is_some()
    }
}

/// Render `entries` as one document.
pub fn render_document(format: OutputFormat, title: &str, entries: &[CardEntry]) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(markdown::document(title, entries)),
        OutputFormat::Json => json::document(title, entries),
        OutputFormat::Csv => csv::document(entries),
        OutputFormat::Text => Ok(text::document(title, entries)),
    }
}
