// Word tokenizer shared by every similarity strategy.
//
// Text is lower-cased and split on any run of non-alphanumeric characters.
// There is no stemming and no stop-word removal: repeated words matter for
// term frequency and word order matters for shingles, so the output keeps
// both duplicates and left-to-right order.

use std::collections::{HashMap, HashSet};

/// Separator used when joining the tokens of a shingle into one value.
///
/// Tokens never contain whitespace, so joined shingles are unambiguous.
const SHINGLE_SEPARATOR: &str = " ";

/// Split raw text into normalized word tokens.
///
/// Empty or whitespace-only input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the set of distinct `n`-token shingles from an ordered token stream.
///
/// A stream of `L` tokens produces `L - n + 1` windows; repeated windows
/// collapse into one entry. Streams shorter than `n` (and `n == 0`) produce
/// an empty set.
pub fn shingles<S: AsRef<str>>(tokens: &[S], n: usize) -> HashSet<String> {
    if n == 0 || tokens.len() < n {
        return HashSet::new();
    }

    tokens
        .windows(n)
        .map(|window| {
            window
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(SHINGLE_SEPARATOR)
        })
        .collect()
}

/// Count how often each distinct token occurs.
pub fn term_frequencies<S: AsRef<str>>(tokens: &[S]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_ref()).or_insert(0) += 1;
    }
    counts
}
