//! Property-based tests for the spelling variant generator
//!
//! Tests invariants:
//! - The original name is always the first variant
//! - Variants never repeat
//! - Hyphen-free, apostrophe-free ASCII names without table entries have a
//!   single variant

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::resolution::variants::spelling_variants;

proptest! {
    #[test]
    fn original_comes_first(name in "\\PC{0,40}") {
        let variants = spelling_variants(&name);
        prop_assert_eq!(variants.first(), Some(&name));
    }

    #[test]
    fn variants_are_unique(name in "[A-Za-z' -]{0,40}") {
        let variants = spelling_variants(&name);
        let unique: HashSet<&String> = variants.iter().collect();
        prop_assert_eq!(unique.len(), variants.len());
    }

    #[test]
    fn plain_names_have_one_variant(name in "[a-z]{1,12}( [a-z]{1,12}){0,3}") {
        prop_assert_eq!(spelling_variants(&name), vec![name]);
    }
}
