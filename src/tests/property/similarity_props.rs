//! Property-based tests for the similarity scorer
//!
//! Tests invariants:
//! - Score is always within [0, 1]
//! - A string compared with itself, in any casing, scores 1.0
//! - The edit-distance component is symmetric
//! - The sequence ratio is 0 for strings with no character in common

use proptest::prelude::*;

use crate::core::resolution::similarity::{edit_ratio, sequence_ratio, similarity};

fn card_name() -> impl Strategy<Value = String> {
    "[A-Za-z' -]{0,30}"
}

proptest! {
    #[test]
    fn score_is_bounded(a in card_name(), b in card_name()) {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn score_is_bounded_for_any_unicode(a in "\\PC{0,20}", b in "\\PC{0,20}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn identical_names_score_one(name in card_name()) {
        prop_assert_eq!(similarity(&name, &name), 1.0);
        prop_assert_eq!(similarity(&name, &name.to_uppercase()), 1.0);
    }

    #[test]
    fn edit_ratio_is_symmetric(a in card_name(), b in card_name()) {
        let forward = edit_ratio(&a, &b);
        let backward = edit_ratio(&b, &a);
        prop_assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn disjoint_alphabets_have_no_sequence_match(a in "[a-m]{1,15}", b in "[n-z]{1,15}") {
        prop_assert_eq!(sequence_ratio(&a, &b), 0.0);
    }
}
