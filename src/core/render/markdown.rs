use std::fmt::Write;

use super::view::{CardKind, CardView, UNKNOWN};
use super::CardEntry;

/// `# title` followed by the card sections, separated by rules.
pub fn document(title: &str, entries: &[CardEntry]) -> String {
    let sections: Vec<String> = entries.iter().map(entry).collect();
    format!("# {title}\n\n{}", sections.join("\n---\n\n"))
}

pub fn entry(entry: &CardEntry) -> String {
    match &entry.view {
        Some(view) => card(view),
        None => not_found(&entry.query),
    }
}

fn card(view: &CardView) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## {}", view.name);
    md.push_str("Basic Information\n");
    let _ = writeln!(md, "* **Card Type**: {}", view.kind.label());
    let _ = writeln!(md, "* **Property**: {}", view.property);

    if let (CardKind::Monster, Some(stats)) = (view.kind, &view.monster) {
        let _ = writeln!(md, "* **Attribute**: {}", stats.attribute);
        let _ = writeln!(md, "* **Level/Rank/Link Rating**: {}", stats.level_info);
        let _ = writeln!(md, "* **Type**: {}", stats.monster_type);
        let _ = writeln!(md, "* **ATK/DEF**: {}", stats.atk_def());
    }

    let _ = writeln!(md, "* **Limitation Status**: {}\n", view.limitation);
    md.push_str("Card Text\n");
    let _ = writeln!(md, "{}\n", view.text_or_placeholder());
    md.push_str("Card Rulings & Interactions\n");
    for ruling in &view.rulings {
        let _ = writeln!(md, "* {ruling}");
    }
    md
}

fn not_found(name: &str) -> String {
    format!(
        "## {name}\n\
         Basic Information\n\
         * **Card Type**: {UNKNOWN}\n\
         * **Property**: {UNKNOWN}\n\
         * **Limitation Status**: {UNKNOWN}\n\n\
         Card Text\n\
         Card information not found in database. Please check the official Yu-Gi-Oh! database for accurate information.\n\n\
         Card Rulings & Interactions\n\
         * Card information not found. Please consult the official rulebook or a tournament judge for rulings.\n"
    )
}
