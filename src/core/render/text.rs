use std::fmt::Write;

use super::view::CardView;
use super::{CardEntry, NOT_FOUND_TEXT};

/// Title line, then blank-line separated entries.
pub fn document(title: &str, entries: &[CardEntry]) -> String {
    let sections: Vec<String> = entries.iter().map(entry).collect();
    format!("{title}\n\n{}", sections.join("\n\n"))
}

pub fn entry(entry: &CardEntry) -> String {
    match &entry.view {
        Some(view) => card(view),
        None => format!("{}\n{NOT_FOUND_TEXT}", entry.query),
    }
}

fn card(view: &CardView) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", view.name);
    let _ = writeln!(
        text,
        "Type: {} | Property: {}",
        view.kind.label(),
        view.property
    );
    if let Some(stats) = &view.monster {
        let _ = writeln!(
            text,
            "Attribute: {} | {} | Type: {} | ATK/DEF: {}",
            stats.attribute,
            stats.level_info,
            stats.monster_type,
            stats.atk_def()
        );
    }
    let _ = writeln!(text, "Limitation: {}\n", view.limitation);
    let _ = writeln!(text, "Text:\n{}", view.text_or_placeholder());
    text
}
