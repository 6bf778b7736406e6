use serde::Serialize;
use serde_json::Value;

use super::view::{CardView, UNKNOWN};
use super::{CardEntry, Result, NOT_FOUND_TEXT};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCard {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_name: Option<String>,
    pub card_type: String,
    pub property: String,
    pub text: String,
    pub limitation: String,
    pub rulings: Vec<String>,
    #[serde(flatten)]
    pub monster: Option<JsonMonster>,
}

#[derive(Debug, Serialize)]
pub struct JsonMonster {
    pub attribute: String,
    pub level: String,
    #[serde(rename = "type")]
    pub monster_type: String,
    pub atk: Value,
    pub def: Value,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    cards: Vec<JsonCard>,
}

/// `{"title": .., "cards": [..]}`, pretty-printed.
pub fn document(title: &str, entries: &[CardEntry]) -> Result<String> {
    let doc = JsonDocument {
        title,
        cards: entries.iter().map(entry).collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn entry(entry: &CardEntry) -> JsonCard {
    match &entry.view {
        Some(view) => card(view),
        None => not_found(&entry.query),
    }
}

/// A known stat as a number, an unknown one as `"?"`.
fn stat_value(value: Option<i64>) -> Value {
    value.map_or_else(|| Value::from("?"), Value::from)
}

fn card(view: &CardView) -> JsonCard {
    JsonCard {
        name: view.name.clone(),
        original_name: Some(view.name.clone()),
        matched_name: Some(view.matched_name.clone()),
        card_type: view.kind.label().to_string(),
        property: view.property.clone(),
        text: view.text.clone(),
        limitation: view.limitation.clone(),
        rulings: view.rulings.clone(),
        monster: view.monster.as_ref().map(|stats| JsonMonster {
            attribute: stats.attribute.clone(),
            level: stats.level_info.clone(),
            monster_type: stats.monster_type.clone(),
            atk: stat_value(stats.atk),
            def: stat_value(stats.def),
        }),
    }
}

fn not_found(name: &str) -> JsonCard {
    JsonCard {
        name: name.to_string(),
        original_name: None,
        matched_name: None,
        card_type: UNKNOWN.to_string(),
        property: UNKNOWN.to_string(),
        text: NOT_FOUND_TEXT.to_string(),
        limitation: UNKNOWN.to_string(),
        rulings: vec!["Card information not found. Please consult the official rulebook.".to_string()],
        monster: None,
    }
}
