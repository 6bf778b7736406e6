use ::csv::WriterBuilder;
use serde::Serialize;

use super::view::{stat, CardView, NOT_APPLICABLE, UNKNOWN};
use super::{CardEntry, Result, NOT_FOUND_TEXT};

/// Column order of the CSV output.
pub const HEADER: [&str; 10] = [
    "Name",
    "Type",
    "Property",
    "Description",
    "Limitation",
    "Attribute",
    "Level/Rank/Link",
    "Monster Type",
    "ATK",
    "DEF",
];

/// One row; field order matches [`HEADER`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRow {
    pub name: String,
    pub card_type: String,
    pub property: String,
    pub description: String,
    pub limitation: String,
    pub attribute: String,
    pub level: String,
    pub monster_type: String,
    pub atk: String,
    pub def: String,
}

/// Header row plus one row per entry.
///
/// The header is written even when there are no entries.
pub fn document(entries: &[CardEntry]) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for e in entries {
        writer.serialize(row(e))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn row(entry: &CardEntry) -> CsvRow {
    match &entry.view {
        Some(view) => card(view),
        None => not_found(&entry.query),
    }
}

fn card(view: &CardView) -> CsvRow {
    let na = || NOT_APPLICABLE.to_string();
    let (attribute, level, monster_type, atk, def) = match &view.monster {
        Some(stats) => (
            stats.attribute.clone(),
            stats.level_info.clone(),
            stats.monster_type.clone(),
            stat(stats.atk),
            stat(stats.def),
        ),
        None => (na(), na(), na(), na(), na()),
    };

    CsvRow {
        name: view.name.clone(),
        card_type: view.kind.label().to_string(),
        property: view.property.clone(),
        description: view.text.clone(),
        limitation: view.limitation.clone(),
        attribute,
        level,
        monster_type,
        atk,
        def,
    }
}

fn not_found(name: &str) -> CsvRow {
    let na = || NOT_APPLICABLE.to_string();
    CsvRow {
        name: name.to_string(),
        card_type: UNKNOWN.to_string(),
        property: UNKNOWN.to_string(),
        description: NOT_FOUND_TEXT.to_string(),
        limitation: UNKNOWN.to_string(),
        attribute: na(),
        level: na(),
        monster_type: na(),
        atk: na(),
        def: na(),
    }
}
