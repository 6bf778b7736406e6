//! Heuristic ruling notes.
//!
//! These are reminders keyed off phrases in the card text, not official
//! rulings. Each rendered card gets at least one note.

/// Archetypes whose support text earns a dedicated note.
const SUPPORTED_ARCHETYPES: &[&str] = &[
    "Snake-eye",
    "Snake-Eyes",
    "Crystal Beast",
    "Fiendsmith",
    "Allure Queen",
    "World Legacy",
    "World Chalice",
];

/// Ruling notes for a card named `name` with text `text`.
pub fn generate_rulings(name: &str, text: &str, property: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![
            "Always verify card rulings with the official rulebook or a tournament judge."
                .to_string(),
        ];
    }

    let lower = text.to_lowercase();
    let mut rulings = Vec::new();

    if lower.contains("once per turn") {
        rulings.push(format!(
            "The \"once per turn\" effect(s) of {name} reset if the card leaves the field and returns."
        ));
    }
    if lower.contains("target") {
        rulings.push(format!(
            "Effects that prevent targeting will prevent {name} from selecting those cards as targets."
        ));
    }
    if lower.contains("destroy") {
        rulings.push(format!(
            "Cards with destruction protection cannot be destroyed by {name}'s effect."
        ));
    }
    if lower.contains("you can") || lower.contains("you may") {
        rulings.push(format!(
            "The effect of {name} that states \"you can\" is optional and can be activated at the player's discretion."
        ));
    }
    if lower.contains("negate") {
        rulings.push(format!(
            "When {name} negates an effect, it only negates the effect and not the activation, unless otherwise specified."
        ));
    }
    if lower.contains("cannot be normal summoned/set") {
        rulings.push(format!(
            "{name} must be Special Summoned by its own procedure and cannot be Special Summoned by other effects unless specified."
        ));
    }

    if let Some(archetype) = SUPPORTED_ARCHETYPES
        .iter()
        .find(|a| lower.contains(&a.to_lowercase()))
    {
        rulings.push(format!(
            "This card specifically supports the \"{archetype}\" archetype and works well with other \"{archetype}\" cards."
        ));
    }

    match property {
        "Quick-Play" => rulings.push(
            "This Quick-Play Spell can be activated from the hand during your opponent's turn if it was set on your field in a previous turn."
                .to_string(),
        ),
        "Counter" => rulings.push(
            "This Counter Trap can be chained to the activation of other effects at Spell Speed 3."
                .to_string(),
        ),
        "Link" => rulings.push(
            "The Link Arrows on this card determine which zones it points to for card effects that reference linked zones."
                .to_string(),
        ),
        "Pendulum" => rulings.push(
            "When this card is destroyed while in a Monster Zone, you can place it in your Pendulum Zone instead of sending it to the GY."
                .to_string(),
        ),
        _ => {}
    }

    if rulings.is_empty() {
        rulings.push(format!(
            "Always verify the timing and activation conditions of {name} with the current official rulebook."
        ));
        rulings.push(format!(
            "For tournament play, consult with a judge for specific interactions involving {name}."
        ));
    }

    rulings
}
