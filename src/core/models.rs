//! Card data model shared by the resolution engine, the data-source client
//! and the renderers.
//!
//! [`CardRecord`] mirrors the card object returned by the YGOPRODeck API.
//! Optional attributes are plain `Option` fields; callers branch on field
//! presence rather than on a per-card-type hierarchy.

use serde::{Deserialize, Serialize};

/// Banlist status as reported by the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanlistInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_tcg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_ocg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_goat: Option<String>,
}

/// A single card as stored by the remote data source.
///
/// `name` is the canonical spelling; everything else flows through
/// unmodified from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default)]
    pub id: u64,

    pub name: String,

    /// Full type line, e.g. "Effect Monster" or "Spell Card". Spell and
    /// trap properties live in `race`.
    #[serde(rename = "type", default)]
    pub card_type: String,

    #[serde(rename = "frameType", default, skip_serializing_if = "Option::is_none")]
    pub frame_type: Option<String>,

    #[serde(default)]
    pub desc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atk: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,

    /// Monster type for monsters, spell/trap property otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkval: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banlist_info: Option<BanlistInfo>,
}

impl CardRecord {
    /// Create a record with just a name, mostly useful in tests.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the type line.
    pub fn with_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = card_type.into();
        self
    }

    pub fn is_monster(&self) -> bool {
        self.card_type.contains("Monster")
    }

    pub fn is_spell(&self) -> bool {
        self.card_type.contains("Spell")
    }

    pub fn is_trap(&self) -> bool {
        self.card_type.contains("Trap")
    }

    /// TCG banlist status, if the card appears on the banlist at all.
    pub fn tcg_ban_status(&self) -> Option<&str> {
        self.banlist_info
            .as_ref()
            .and_then(|info| info.ban_tcg.as_deref())
    }
}

/// Envelope returned by every `cardinfo.php` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardInfoResponse {
    #[serde(default)]
    pub data: Vec<CardRecord>,
}
