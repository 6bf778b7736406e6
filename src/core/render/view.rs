//! Presentation fields derived from a [`CardRecord`].
//!
//! Every output format shows the same facts; [`CardView`] computes them
//! once from field presence on the record.

use super::rulings::generate_rulings;
use crate::core::models::CardRecord;

pub const NOT_APPLICABLE: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";

const MONSTER_PROPERTIES: &[&str] = &[
    "Effect", "Ritual", "Fusion", "Synchro", "Xyz", "Pendulum", "Link",
];
const SPELL_PROPERTIES: &[&str] = &["Normal", "Field", "Equip", "Continuous", "Quick-Play", "Ritual"];
const TRAP_PROPERTIES: &[&str] = &["Normal", "Continuous", "Counter"];

/// Broad card category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Monster,
    Spell,
    Trap,
    Unknown,
}

impl CardKind {
    pub fn of(card: &CardRecord) -> Self {
        if card.is_monster() {
            CardKind::Monster
        } else if card.is_spell() {
            CardKind::Spell
        } else if card.is_trap() {
            CardKind::Trap
        } else {
            CardKind::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardKind::Monster => "Monster",
            CardKind::Spell => "Spell",
            CardKind::Trap => "Trap",
            CardKind::Unknown => UNKNOWN,
        }
    }
}

/// Monster-only fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterStats {
    pub attribute: String,
    pub level_info: String,
    pub monster_type: String,
    pub atk: Option<i64>,
    pub def: Option<i64>,
}

impl MonsterStats {
    /// "2500/2100", with `?` for unknown values.
    pub fn atk_def(&self) -> String {
        format!("{}/{}", stat(self.atk), stat(self.def))
    }
}

pub fn stat(value: Option<i64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

/// A resolved card, ready to render under the name the user wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    /// Name as written in the deck list.
    pub name: String,
    /// Canonical name from the data source.
    pub matched_name: String,
    pub kind: CardKind,
    pub property: String,
    pub monster: Option<MonsterStats>,
    pub limitation: String,
    pub text: String,
    pub rulings: Vec<String>,
}

impl CardView {
    pub fn new(query: &str, card: &CardRecord) -> Self {
        let kind = CardKind::of(card);
        let property = card_property(card, kind);

        let monster = (kind == CardKind::Monster).then(|| MonsterStats {
            attribute: card
                .attribute
                .clone()
                .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            level_info: level_info(card),
            monster_type: card.race.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string()),
            atk: card.atk,
            def: card.def,
        });

        let rulings = generate_rulings(query, &card.desc, &property);

        Self {
            name: query.to_string(),
            matched_name: card.name.clone(),
            kind,
            property,
            monster,
            limitation: limitation_status(card).to_string(),
            text: card.desc.clone(),
            rulings,
        }
    }

    /// Card text, or a placeholder when the source has none.
    pub fn text_or_placeholder(&self) -> &str {
        if self.text.is_empty() {
            "No description available"
        } else {
            &self.text
        }
    }
}

/// Monster sub-kind from the type line, or the spell/trap property.
pub fn card_property(card: &CardRecord, kind: CardKind) -> String {
    let property = match kind {
        CardKind::Monster => MONSTER_PROPERTIES
            .iter()
            .find(|p| type_line_has(card, p))
            .copied(),
        CardKind::Spell => {
            if card.card_type.contains("Quick-Play") {
                Some("Quick-Play")
            } else {
                race_property(card, SPELL_PROPERTIES)
            }
        }
        CardKind::Trap => race_property(card, TRAP_PROPERTIES),
        CardKind::Unknown => None,
    };
    property.unwrap_or("Normal").to_string()
}

fn race_property(card: &CardRecord, allowed: &[&'static str]) -> Option<&'static str> {
    let race = card.race.as_deref()?;
    allowed.iter().find(|p| **p == race).copied()
}

/// The API spells some type words in capitals ("XYZ Monster").
fn type_line_has(card: &CardRecord, word: &str) -> bool {
    card.card_type.to_lowercase().contains(&word.to_lowercase())
}

/// "Link 2", "Rank 4", "Level 7" or "N/A".
pub fn level_info(card: &CardRecord) -> String {
    if !card.is_monster() {
        return NOT_APPLICABLE.to_string();
    }
    match (card.linkval, card.level) {
        (Some(link), _) if type_line_has(card, "Link") => format!("Link {link}"),
        (_, Some(rank)) if type_line_has(card, "Xyz") => format!("Rank {rank}"),
        (_, Some(level)) => format!("Level {level}"),
        _ => NOT_APPLICABLE.to_string(),
    }
}

/// TCG limitation status; cards absent from the banlist are unlimited.
pub fn limitation_status(card: &CardRecord) -> &'static str {
    match card.tcg_ban_status() {
        Some("Banned") | Some("Forbidden") => "Forbidden",
        Some("Limited") => "Limited",
        Some("Semi-Limited") => "Semi-Limited",
        _ => "Unlimited",
    }
}
