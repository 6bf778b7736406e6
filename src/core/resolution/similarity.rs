//! Blended string similarity for card names.
//!
//! The score is a fixed weighted average of three sub-scores, each in
//! `[0, 1]`, computed over the lower-cased inputs:
//!
//! | Component | Weight |
//! |-----------|--------|
//! | Sequence-alignment ratio (longest matching blocks) | 0.4 |
//! | Edit-distance ratio (Levenshtein) | 0.3 |
//! | Token-sorted sequence ratio | 0.3 |
//!
//! The weights are fixed; the stage thresholds in [`super::stages`] assume
//! them.

use strsim::levenshtein;

const SEQUENCE_WEIGHT: f64 = 0.4;
const EDIT_WEIGHT: f64 = 0.3;
const TOKEN_SORT_WEIGHT: f64 = 0.3;

/// Blended similarity between two names in `[0.0, 1.0]`.
///
/// Case-insensitive; identical strings after case folding score exactly 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }

    let score = SEQUENCE_WEIGHT * sequence_ratio(&a, &b)
        + EDIT_WEIGHT * edit_ratio(&a, &b)
        + TOKEN_SORT_WEIGHT * token_sort_ratio(&a, &b);

    score.clamp(0.0, 1.0)
}

/// Sequence-alignment ratio: `2 * M / T`, where `M` is the number of
/// characters in the recursively found longest matching blocks and `T` the
/// combined length. Two empty strings are identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// `1 - distance / max(len_a, len_b, 1)` using single-character
/// insert/delete/substitute edits.
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Sequence ratio after sorting each side's whitespace-delimited tokens, so
/// word order does not matter.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    sequence_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Total size of the matching blocks between `a` and `b`.
///
/// Finds the longest common block, then recurses into the unmatched
/// regions on either side of it.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(start_a, start_b, size)`. Among equally long blocks the one
/// ending earliest in `a`, then earliest in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo;
            if a[i] == b[j] {
                let run = prev[col] + 1;
                cur[col + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                cur[col + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}
