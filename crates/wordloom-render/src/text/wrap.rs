//! Greedy word wrapping against a [`TextMeasurer`].

use super::{TextMeasurer, TextStyle};
use std::collections::VecDeque;

const FIT_EPSILON: f64 = 1e-6;

fn fits(text: &str, style: &TextStyle, max_width: f64, measurer: &dyn TextMeasurer) -> bool {
    measurer.measure(text, style).width <= max_width + FIT_EPSILON
}

/// Splits an over-long token at the last char boundary that still fits.
///
/// Always takes at least one char so wrapping makes progress.
fn split_token_to_width(
    tok: &str,
    style: &TextStyle,
    max_width: f64,
    measurer: &dyn TextMeasurer,
) -> (String, String) {
    let chars = tok.chars().collect::<Vec<_>>();
    let mut split_at = 1.min(chars.len());
    for end in (1..=chars.len()).rev() {
        let head = chars[..end].iter().collect::<String>();
        if fits(&head, style, max_width, measurer) {
            split_at = end;
            break;
        }
    }
    let head = chars[..split_at].iter().collect::<String>();
    let tail = chars[split_at..].iter().collect::<String>();
    (head, tail)
}

/// Wraps `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept; whitespace runs collapse to a single space. Returns no lines for
/// blank input.
pub fn wrap_text_lines(
    text: &str,
    style: &TextStyle,
    max_width: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if !(max_width.is_finite() && max_width > 0.0) {
        return text
            .lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|l| !l.is_empty())
            .collect();
    }

    for raw_line in text.lines() {
        let mut tokens: VecDeque<String> = raw_line.split_whitespace().map(str::to_string).collect();
        let mut cur = String::new();

        while let Some(tok) = tokens.pop_front() {
            let candidate = if cur.is_empty() {
                tok.clone()
            } else {
                format!("{cur} {tok}")
            };
            if fits(&candidate, style, max_width, measurer) {
                cur = candidate;
                continue;
            }

            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
                tokens.push_front(tok);
                continue;
            }

            let (head, tail) = split_token_to_width(&tok, style, max_width, measurer);
            out.push(head);
            if !tail.is_empty() {
                tokens.push_front(tail);
            }
        }

        if !cur.is_empty() {
            out.push(cur);
        }
    }
    out
}

/// Returns `text` unchanged when it fits, otherwise the longest prefix that fits with a trailing
/// ellipsis.
pub fn ellipsize_to_width(
    text: &str,
    style: &TextStyle,
    max_width: f64,
    measurer: &dyn TextMeasurer,
) -> String {
    if fits(text, style, max_width, measurer) {
        return text.to_string();
    }
    let chars = text.chars().collect::<Vec<_>>();
    for end in (0..chars.len()).rev() {
        let prefix = chars[..end].iter().collect::<String>();
        let candidate = format!("{}…", prefix.trim_end());
        if fits(&candidate, style, max_width, measurer) {
            return candidate;
        }
    }
    "…".to_string()
}
