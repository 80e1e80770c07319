//! Function words that carry no signal in a story's word cloud.
//!
//! Tokens are compared after normalization (lowercase, punctuation removed), so contractions
//! appear in their collapsed form (`dont`, `im`).

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does",
    "dont", "down", "each", "for", "from", "had", "has", "have", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "im", "in", "into", "is", "it", "its", "just", "may", "me",
    "might", "must", "my", "no", "not", "of", "on", "or", "our", "out", "over", "shall", "she",
    "should", "so", "some", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "to", "too", "up", "us", "very", "was", "we", "were", "what",
    "when", "where", "which", "who", "will", "with", "would", "you", "your",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        // `is_stop_word` relies on binary search.
        for pair in STOP_WORDS.windows(2) {
            assert!(pair[0] < pair[1], "{} must sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn common_function_words_are_stop_words() {
        for w in ["the", "and", "is", "a", "an", "of", "they", "would"] {
            assert!(is_stop_word(w), "{w}");
        }
        assert!(!is_stop_word("cat"));
        assert!(!is_stop_word("The"));
    }
}
