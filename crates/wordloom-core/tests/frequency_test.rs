use wordloom_core::{
    DEFAULT_MAX_WORDS, FontScale, WordFrequencyEntry, count_range, extract_frequencies,
    is_stop_word, word_frequencies,
};

fn entry(word: &str, count: u32) -> WordFrequencyEntry {
    WordFrequencyEntry {
        word: word.to_string(),
        count,
    }
}

fn assert_sorted(entries: &[WordFrequencyEntry]) {
    for pair in entries.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.count > b.count || (a.count == b.count && a.word <= b.word),
            "{a:?} must sort before {b:?}"
        );
    }
}

#[test]
fn cat_cat_dog() {
    let entries = word_frequencies("cat cat dog");
    assert_eq!(entries, vec![entry("cat", 2), entry("dog", 1)]);

    let (lo, hi) = count_range(&entries).unwrap();
    let scale = FontScale::default();
    assert!(scale.size_for(2, lo, hi) > scale.size_for(1, lo, hi));
}

#[test]
fn empty_and_stop_word_only_inputs_yield_nothing() {
    assert!(word_frequencies("").is_empty());
    assert!(word_frequencies("   \n\t ").is_empty());
    assert!(word_frequencies("the a an").is_empty());
    assert!(word_frequencies("The. AND, is!").is_empty());
}

#[test]
fn eighty_distinct_words_are_capped_alphabetically() {
    let words: Vec<String> = (0..80).map(|i| format!("word{i:02}")).collect();
    let text = words.join(" ");
    let entries = word_frequencies(&text);
    assert_eq!(entries.len(), DEFAULT_MAX_WORDS);
    assert_eq!(entries.first().unwrap().word, "word00");
    assert_eq!(entries.last().unwrap().word, "word69");
    assert!(entries.iter().all(|e| e.count == 1));
    assert_sorted(&entries);
}

#[test]
fn stop_words_never_survive_even_when_dominant() {
    let text = "the the the the the the and and and is is lighthouse keeper lighthouse";
    let entries = word_frequencies(text);
    assert!(entries.iter().all(|e| !is_stop_word(&e.word)));
    assert_eq!(entries, vec![entry("lighthouse", 2), entry("keeper", 1)]);
}

#[test]
fn story_text_is_normalized_and_sorted() {
    let text = "Mia found a kite. The kite was red! \"Red kites fly high,\" said Mia. \
                Mia ran (fast) to the hill; the kite flew.";
    let entries = extract_frequencies(text, 70);
    assert_sorted(&entries);
    assert_eq!(entries[0], entry("kite", 3));
    assert_eq!(entries[1], entry("mia", 3));
    assert!(entries.contains(&entry("red", 2)));
    assert!(entries.contains(&entry("fast", 1)));
    assert!(entries.iter().all(|e| e.word == e.word.to_lowercase()));
}

#[test]
fn uniform_counts_all_get_the_midpoint_font() {
    let entries = word_frequencies("river stone cloud river stone cloud");
    let (lo, hi) = count_range(&entries).unwrap();
    let scale = FontScale::default();
    for e in &entries {
        assert_eq!(scale.size_for(e.count, lo, hi), (25.0 + 190.0) / 2.0);
    }
}

#[test]
fn font_sizes_stay_within_bounds() {
    let text = "a b c sun sun sun sun moon moon star planet planet planet comet";
    let entries = word_frequencies(text);
    let (lo, hi) = count_range(&entries).unwrap();
    let scale = FontScale::default();
    for e in &entries {
        let size = scale.size_for(e.count, lo, hi);
        assert!((25.0..=190.0).contains(&size), "{} -> {size}", e.word);
    }
}
