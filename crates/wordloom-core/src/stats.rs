//! Display strings for the poster statistics band.

use crate::config::PosterStats;

pub const WORDS_READ_CAPTION: &str = "WORDS READ";
pub const TIME_PRACTICED_CAPTION: &str = "TIME PRACTICED";
pub const STREAK_CAPTION: &str = "DAY STREAK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatColumn {
    pub value: String,
    pub caption: &'static str,
}

/// Groups digits in threes: `1234567` becomes `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

pub fn format_streak(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// The three columns in draw order: words read, time practiced, streak.
pub fn stat_columns(stats: &PosterStats) -> [StatColumn; 3] {
    [
        StatColumn {
            value: format_count(stats.words_read),
            caption: WORDS_READ_CAPTION,
        },
        StatColumn {
            value: format_duration(stats.minutes_practiced),
            caption: TIME_PRACTICED_CAPTION,
        },
        StatColumn {
            value: format_streak(stats.streak_days),
            caption: STREAK_CAPTION,
        },
    ]
}
