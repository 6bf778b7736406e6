//! Deck lists and correction reports.
//!
//! A deck list is plain text with one card name per line. `#` starts a
//! comment, and blank lines are ignored. YDK exports hold card ids rather
//! than names and are rejected.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read deck list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is a YDK file; card ids are not supported, list one card name per line instead")]
    UnsupportedYdk(PathBuf),
}

pub type Result<T> = std::result::Result<T, DeckError>;

/// Read card names from `path`.
pub fn read_deck_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if is_ydk(&content) {
        return Err(DeckError::UnsupportedYdk(path.to_path_buf()));
    }

    let cards = parse_deck_list(&content);
    debug!(path = %path.display(), cards = cards.len(), "Read deck list");
    Ok(cards)
}

/// Card names from deck-list text.
pub fn parse_deck_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let name = line.split('#').next().unwrap_or_default().trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

fn is_ydk(content: &str) -> bool {
    let trimmed = content.trim_start();
    trimmed.starts_with("#main") || trimmed.starts_with("#created by")
}

/// Write `corrections` as `original -> corrected` lines, sorted by original.
pub fn write_corrections(corrections: &BTreeMap<String, String>, path: &Path) -> Result<()> {
    let mut report = String::from("# Yu-Gi-Oh! Card Name Corrections\n# Original Name -> Corrected Name\n\n");
    for (original, corrected) in corrections {
        let _ = writeln!(report, "{original} -> {corrected}");
    }

    write_file(path, &report)?;
    info!(count = corrections.len(), path = %path.display(), "Wrote name corrections");
    Ok(())
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| DeckError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, contents).map_err(write_err)
}

/// Sample deck used when no input file is given.
pub fn default_deck_list() -> Vec<String> {
    DEFAULT_DECK.iter().map(|name| name.to_string()).collect()
}

const DEFAULT_DECK: &[&str] = &[
    // Main deck
    "Snake-eye Flamberge Dragon",
    "Snake-eye Diabellstar",
    "Snake-eye Ash",
    "Snake-eye Oak",
    "Snake-eye Poplar",
    "Snake-eye Birch",
    "Fabled Lurrie",
    "Lacrima the Crimson Tear",
    "Fiendsmith Engraver",
    "Fiendsmith in Paradise",
    "Fiendsmith Kyrie",
    "Rainbow Dragon",
    "Crystal Beast Rainbow Dragon",
    "Crystal Beast Sapphire Pegasus",
    "Crystal Beast Cobalt Eagle",
    "Crystal Beast Ruby Carbuncle",
    "Magicians' Soul",
    "Illusion of Chaos",
    "Chaos Allure Queen",
    "Allure Queen LV3",
    "Allure Queen LV5",
    "World Legacy - \"World Chalice\"",
    "Chosen by the World Chalice",
    "Dragon Buster Destruction Sword",
    "World Legacy - \"World Shield\"",
    "Dramatic Snake-eye Chase",
    "Divine Temple of the Snake-eyes",
    "One for One",
    "Fiendsmith Tract",
    "Rainbow Bridge",
    "Crystal Bond",
    "Golden Rule",
    "Awakening of the Crystal Ultimates",
    "Rainbow Bridge of the Heart",
    "Foolish Burial Goods",
    "Called by the Grave",
    "Triple Tactics Thrust",
    "Triple Tactics Talents",
    "Vaylantz World - Shinra Bansho",
    "Vaylantz World - Konig Wissen",
    "World Legacy Succession",
    "Rainbow Bridge of Salvation",
    "Harpies' Feather Storm",
    "Infinite Impermanence",
    // Extra deck
    "Protector Whelp of the Destruction Swordsman",
    "Magisitus Chorozo",
    "Necroquip Princess",
    "Snake-eye Doomed Dragon",
    "Gallant Granite",
    "Infernal Flame Banshee",
    "D/D/D Wave High King Caesar",
    "Moon of the Closed Heaven",
    "Mekk-Knight Crusadia Avramax",
    "I:P Masquerena",
    "Relinquished Anima",
    "Knightmare Gryphon",
    "A Bao A Qu, The Lightless Shadow",
    "Cross-Sheep",
    "Fiendsmith Requiem",
    "Fiendsmith Agnumday",
    "Fiendsmith Sequence",
    "Fiendsmith Desirae",
    "Ib the World Chalice Justiciar",
    "Rciela Sinister Soul of the White Forest",
    "Power Tool Dragon",
    "Cherubini, Ebon Angel of the Burning Abyss",
];
