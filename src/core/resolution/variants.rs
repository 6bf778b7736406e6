//! Alternative spellings of card names.
//!
//! Card names in hand-written deck lists drift from the canonical spelling
//! in predictable ways: hyphens typed as spaces, possessives dropped or
//! added, archetype names pluralised. [`spelling_variants`] produces the
//! set of rewrites worth trying against the local catalog, and
//! [`word_tokens`] is the shared word-boundary tokenizer.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Known archetype-naming inconsistencies as `(find, replace)` pairs.
///
/// A pair applies only when `find` occurs in the name.
pub const NAME_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("Snake-eye", "Snake-Eyes"),
    ("Harpies'", "Harpie's"),
    ("Magicians'", "Magician's"),
    ("Magisitus", "Magistus"),
    ("Fiendsmith", "Fiendsmith's"),
    ("Rciela Sinister Soul", "Rciela, Sinister Soul"),
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("static regex"));

/// Words of `name`, in order, split on word boundaries.
///
/// Punctuation is dropped: `"Harpie's Feather Duster"` yields
/// `["Harpie", "s", "Feather", "Duster"]`.
pub fn word_tokens(name: &str) -> Vec<&str> {
    WORD.find_iter(name).map(|m| m.as_str()).collect()
}

/// Ordered, deduplicated spelling variants of `name`.
///
/// The original string always comes first. Order matters to the local
/// fuzzy stage, which stops at the first variant that matches.
pub fn spelling_variants(name: &str) -> Vec<String> {
    let mut variants = Vec::new();

    push_unique(&mut variants, name.to_string());
    push_unique(&mut variants, name.replace('-', " "));
    // Every "'s" goes, not only a trailing possessive.
    push_unique(&mut variants, name.replace("'s", ""));
    push_unique(&mut variants, name.replace('\'', ""));

    for (find, replace) in NAME_SUBSTITUTIONS {
        if name.contains(find) {
            push_unique(&mut variants, name.replace(find, replace));
        }
    }

    push_unique(&mut variants, fold_diacritics(name));

    variants
}

/// Strip combining marks after canonical decomposition ("König" -> "Konig").
pub fn fold_diacritics(name: &str) -> String {
    name.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !variants.contains(&candidate) {
        variants.push(candidate);
    }
}
