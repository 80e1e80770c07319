//! Word frequency extraction for the poster word cloud.

use crate::stopwords::is_stop_word;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of words a poster cloud tries to place.
pub const DEFAULT_MAX_WORDS: usize = 70;

/// Characters removed from every token before counting.
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')', '"', '\'', '-'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequencyEntry {
    pub word: String,
    pub count: u32,
}

/// Lowercases `raw`, removes the stripped punctuation set and control characters anywhere in the
/// token and trims.
///
/// Returns `None` for tokens that end up empty or are stop words.
pub fn normalize_token(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c) && !c.is_control())
        .collect();
    let word = stripped.trim();
    if word.is_empty() || is_stop_word(word) {
        return None;
    }
    Some(word.to_string())
}

/// Counts every normalized word in `text`, ordered by descending count with ties broken
/// alphabetically.
pub fn frequency_table(text: &str) -> Vec<WordFrequencyEntry> {
    let mut counts: FxHashMap<String, u32> = FxHashMap::default();
    for token in text.split_whitespace() {
        if let Some(word) = normalize_token(token) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<WordFrequencyEntry> = counts
        .into_iter()
        .map(|(word, count)| WordFrequencyEntry { word, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    entries
}

/// The first `limit` entries of [`frequency_table`].
pub fn extract_frequencies(text: &str, limit: usize) -> Vec<WordFrequencyEntry> {
    let mut entries = frequency_table(text);
    let distinct = entries.len();
    entries.truncate(limit);

    tracing::trace!(distinct, kept = entries.len(), limit, "extracted word frequencies");
    entries
}

/// [`extract_frequencies`] with the default cap of [`DEFAULT_MAX_WORDS`].
pub fn word_frequencies(text: &str) -> Vec<WordFrequencyEntry> {
    extract_frequencies(text, DEFAULT_MAX_WORDS)
}

/// Returns the observed `(min_count, max_count)`, or `None` for an empty table.
pub fn count_range(entries: &[WordFrequencyEntry]) -> Option<(u32, u32)> {
    let mut it = entries.iter().map(|e| e.count);
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))))
}
