#![forbid(unsafe_code)]

//! Word frequency analysis and poster configuration (headless).
//!
//! Design goals:
//! - deterministic, testable outputs (frequency tables sort with an alphabetical tie-break)
//! - no rendering or I/O concerns; see `wordloom-render` for layout and SVG output

pub mod config;
pub mod error;
pub mod frequency;
pub mod scale;
pub mod stats;
pub mod stopwords;

pub use config::{ConfigLayers, PosterConfig, PosterStats};
pub use error::{Error, Result};
pub use frequency::{
    DEFAULT_MAX_WORDS, WordFrequencyEntry, count_range, extract_frequencies, frequency_table,
    normalize_token, word_frequencies,
};
pub use scale::{DEFAULT_MAX_FONT, DEFAULT_MIN_FONT, FontScale};
pub use stopwords::is_stop_word;
