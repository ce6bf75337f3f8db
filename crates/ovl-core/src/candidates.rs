#![forbid(unsafe_code)]

//! Candidate image references: validation, de-duplication and shuffling.
//!
//! # Invariants
//!
//! 1. [`unique_candidates`] keeps first-occurrence order and never returns
//!    an invalid or duplicate reference.
//! 2. [`shuffle_in_place`] consumes exactly `len - 1` draws (zero for
//!    slices of length 0 or 1), walking the index downward.
//! 3. The same seed over the same input always yields the same order.
//!
//! # Failure Modes
//!
//! None. Empty or fully invalid input produces an empty sequence.

use std::collections::HashSet;

use crate::rng::SeededGenerator;

/// File extensions accepted as image references (matched case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".webp", ".gif", ".svg"];

/// Check whether a raw reference is usable as an avatar image.
///
/// Accepts absolute `http://`/`https://` URLs, root-relative paths (`/x`,
/// but not protocol-relative `//x`), and anything ending in a known image
/// extension.
#[must_use]
pub fn is_valid_reference(reference: &str) -> bool {
    if reference.is_empty() {
        return false;
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return true;
    }
    let mut chars = reference.chars();
    if chars.next() == Some('/') && chars.next().is_some_and(|c| c != '/') {
        return true;
    }
    let lower = reference.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Filter to valid references and drop exact duplicates, keeping the first
/// occurrence of each.
pub fn unique_candidates<I, S>(references: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    for reference in references {
        let reference = reference.as_ref();
        if !is_valid_reference(reference) {
            continue;
        }
        if seen.insert(reference.to_owned()) {
            unique.push(reference.to_owned());
        }
    }
    unique
}

/// Fisher–Yates shuffle driven by `rng`.
///
/// For `i` from `len - 1` down to `1`, swaps element `i` with element
/// `floor(next() * (i + 1))`.
pub fn shuffle_in_place<T>(items: &mut [T], rng: &mut SeededGenerator) {
    for i in (1..items.len()).rev() {
        let j = (rng.next() * (i + 1) as f64).floor() as usize;
        items.swap(i, j);
    }
}

/// Unique candidates shuffled by a fresh generator seeded with `seed`.
pub fn shuffled_candidates<I, S>(references: I, seed: u64) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique = unique_candidates(references);
    let mut rng = SeededGenerator::new(seed);
    shuffle_in_place(&mut unique, &mut rng);
    unique
}
