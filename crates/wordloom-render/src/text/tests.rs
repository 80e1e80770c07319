use super::*;

#[test]
fn deterministic_width_scales_with_font_size() {
    let m = DeterministicTextMeasurer::default();
    let small = m.measure("kite", &TextStyle::sized(10.0));
    let large = m.measure("kite", &TextStyle::sized(100.0));
    assert_eq!(small.width, 24.0);
    assert_eq!(large.width, 240.0);
    assert_eq!(large.height, 120.0);
    assert_eq!(large.line_count, 1);
}

#[test]
fn wide_characters_take_two_columns() {
    assert_eq!(DeterministicTextMeasurer::line_columns("abc"), 3);
    assert_eq!(DeterministicTextMeasurer::line_columns("風箏"), 4);
}

#[test]
fn bold_text_is_wider() {
    let m = DeterministicTextMeasurer::default();
    let regular = m.measure("Lighthouse", &TextStyle::sized(40.0));
    let bold = m.measure("Lighthouse", &TextStyle::sized(40.0).bold());
    assert!(bold.width > regular.width);
    assert!(TextStyle {
        font_weight: Some("700".to_string()),
        ..Default::default()
    }
    .is_bold());
}

#[test]
fn multi_line_height_counts_lines() {
    let m = DeterministicTextMeasurer::default();
    let metrics = m.measure("one\ntwo three", &TextStyle::sized(10.0));
    assert_eq!(metrics.line_count, 2);
    assert_eq!(metrics.height, 24.0);
    assert_eq!(metrics.width, 9.0 * 6.0);
}

#[test]
fn wrap_breaks_on_words_and_long_tokens() {
    let m = DeterministicTextMeasurer::default();
    let style = TextStyle::sized(10.0);
    // 6px per column: 60px fits ten columns.
    let lines = wrap_text_lines("the quick brown fox jumps", &style, 60.0, &m);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);

    let lines = wrap_text_lines("abcdefghijklmnop", &style, 60.0, &m);
    assert_eq!(lines, vec!["abcdefghij", "klmnop"]);

    assert_eq!(wrap_text_lines("", &style, 60.0, &m), Vec::<String>::new());
}

#[test]
fn ellipsize_trims_until_it_fits() {
    let m = DeterministicTextMeasurer::default();
    let style = TextStyle::sized(10.0);
    assert_eq!(ellipsize_to_width("short", &style, 60.0, &m), "short");
    assert_eq!(
        ellipsize_to_width("a much longer line", &style, 60.0, &m),
        "a much lo…"
    );
}
