//! Poster chrome: background, card, header, title, stats band and footer around the cloud.
//!
//! All sizes derive from the canvas width so posters scale uniformly. The draw order is fixed;
//! later commands paint over earlier ones.

use crate::cloud::{CloudStyle, layout_cloud, word_commands};
use crate::model::{Bounds, CloudRegion, DrawCommand, ImageSlot, PosterLayout, TextAnchor};
use crate::text::{TextMeasurer, TextStyle, ellipsize_to_width, wrap_text_lines};
use crate::Result;
use rand::Rng;
use wordloom_core::config::PosterConfig;
use wordloom_core::extract_frequencies;
use wordloom_core::stats::stat_columns;

const MAX_TITLE_LINES: usize = 3;
const MAX_SUBTITLE_LINES: usize = 2;
pub const QR_CAPTION: &str = "Scan to read along";

/// Proportional measurements for one canvas width.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    margin: f64,
    inset: f64,
    card_radius: f64,
    gap: f64,
    meta_size: f64,
    title_size: f64,
    subtitle_size: f64,
    stat_value_size: f64,
    stat_caption_size: f64,
    stats_height: f64,
    footer_height: f64,
    footer_text_size: f64,
    logo_size: f64,
}

impl Metrics {
    fn for_width(w: f64) -> Self {
        let margin = w * 0.05;
        Self {
            margin,
            inset: margin * 2.0,
            card_radius: w * 0.03,
            gap: w * 0.03,
            meta_size: w * 0.024,
            title_size: w * 0.06,
            subtitle_size: w * 0.03,
            stat_value_size: w * 0.045,
            stat_caption_size: w * 0.017,
            stats_height: w * 0.12,
            footer_height: w * 0.12,
            footer_text_size: w * 0.022,
            logo_size: w * 0.07,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn text(
    x: f64,
    y: f64,
    content: &str,
    font_size: f64,
    bold: bool,
    fill: &str,
    anchor: TextAnchor,
    letter_spacing: f64,
) -> DrawCommand {
    DrawCommand::Text {
        x,
        y,
        text: content.to_string(),
        font_size,
        bold,
        fill: fill.to_string(),
        anchor,
        letter_spacing,
        class: None,
    }
}

fn style(config: &PosterConfig, font_size: f64, bold: bool) -> TextStyle {
    let s = TextStyle {
        font_family: Some(config.font_family.clone()),
        font_size,
        font_weight: None,
    };
    if bold { s.bold() } else { s }
}

/// Wraps and caps a block of text, ellipsizing the last kept line when lines were cut.
fn capped_lines(
    content: &str,
    style: &TextStyle,
    max_width: f64,
    max_lines: usize,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = wrap_text_lines(content, style, max_width, measurer);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let marked = format!("{last}…");
            *last = ellipsize_to_width(&marked, style, max_width, measurer);
        }
    }
    lines
}

/// Lays out a complete poster for `text`.
///
/// This is a pure function of its inputs: the same text, config, measurer and RNG state always
/// produce the same command list. Invalid configs are rejected before anything is drawn.
pub fn layout_poster_with_rng<R: Rng>(
    story: &str,
    config: &PosterConfig,
    measurer: &dyn TextMeasurer,
    rng: &mut R,
) -> Result<PosterLayout> {
    config.validate()?;
    let scale = config.font_scale()?;

    let (w, h) = (config.width, config.height);
    let m = Metrics::for_width(w);
    let mut commands: Vec<DrawCommand> = Vec::new();

    commands.push(DrawCommand::Rect {
        x: 0.0,
        y: 0.0,
        width: w,
        height: h,
        corner_radius: 0.0,
        fill: config.background.clone(),
    });

    let inset = if config.card {
        commands.push(DrawCommand::Rect {
            x: m.margin,
            y: m.margin,
            width: (w - 2.0 * m.margin).max(0.0),
            height: (h - 2.0 * m.margin).max(0.0),
            corner_radius: m.card_radius,
            fill: config.card_color.clone(),
        });
        m.inset
    } else {
        m.margin
    };
    let left = inset;
    let right = (w - inset).max(left);
    let content_width = right - left;
    let mut cursor = inset;

    // Header meta line.
    let meta = config.meta.trim();
    if !meta.is_empty() {
        let meta_style = style(config, m.meta_size, true);
        let line = ellipsize_to_width(&meta.to_uppercase(), &meta_style, content_width, measurer);
        let baseline = cursor + m.meta_size;
        commands.push(text(
            left,
            baseline,
            &line,
            m.meta_size,
            true,
            &config.accent,
            TextAnchor::Start,
            m.meta_size * 0.12,
        ));
        cursor = baseline + m.meta_size * 0.9;
    }

    // Title.
    let title_style = style(config, m.title_size, true);
    let title_lines = capped_lines(
        &config.title,
        &title_style,
        content_width,
        MAX_TITLE_LINES,
        measurer,
    );
    for line in &title_lines {
        let baseline = cursor + m.title_size;
        commands.push(text(
            left,
            baseline,
            line,
            m.title_size,
            true,
            &config.ink,
            TextAnchor::Start,
            0.0,
        ));
        cursor = baseline + m.title_size * 0.15;
    }

    if let Some(subtitle) = config.subtitle.as_deref() {
        let subtitle_style = style(config, m.subtitle_size, false);
        let lines = capped_lines(
            subtitle,
            &subtitle_style,
            content_width,
            MAX_SUBTITLE_LINES,
            measurer,
        );
        if !lines.is_empty() {
            cursor += m.subtitle_size * 0.4;
        }
        for line in &lines {
            let baseline = cursor + m.subtitle_size;
            commands.push(text(
                left,
                baseline,
                line,
                m.subtitle_size,
                false,
                &config.muted,
                TextAnchor::Start,
                0.0,
            ));
            cursor = baseline + m.subtitle_size * 0.25;
        }
    }

    // Footer and stats band are anchored to the bottom edge; the cloud gets what is left.
    let footer_top = h - inset - m.footer_height;
    let stats_top = footer_top - m.gap - m.stats_height;
    let cloud_top = cursor + m.gap;
    let cloud_bottom = (stats_top - m.gap).max(cloud_top);

    let entries = extract_frequencies(story, config.max_words);
    let region = CloudRegion::new(Bounds {
        min_x: left,
        min_y: cloud_top,
        max_x: right,
        max_y: cloud_bottom,
    });
    let cloud_style = CloudStyle {
        accent: &config.accent,
        ink: &config.ink,
        font_family: Some(&config.font_family),
    };
    let cloud = layout_cloud(&entries, region, &scale, &cloud_style, measurer, rng);
    commands.extend(word_commands(&cloud));

    // Statistics band.
    commands.push(DrawCommand::Rect {
        x: left,
        y: stats_top,
        width: content_width,
        height: m.stats_height,
        corner_radius: m.card_radius / 2.0,
        fill: config.background.clone(),
    });
    let column_width = content_width / 3.0;
    for (i, column) in stat_columns(&config.stats).iter().enumerate() {
        let center = left + column_width * (i as f64 + 0.5);
        if i > 0 {
            let x = left + column_width * i as f64;
            commands.push(DrawCommand::Line {
                x1: x,
                y1: stats_top + m.stats_height * 0.2,
                x2: x,
                y2: stats_top + m.stats_height * 0.8,
                stroke: config.muted.clone(),
                stroke_width: 1.0,
            });
        }
        let value_baseline = stats_top + m.stats_height * 0.5;
        commands.push(text(
            center,
            value_baseline,
            &column.value,
            m.stat_value_size,
            true,
            &config.ink,
            TextAnchor::Middle,
            0.0,
        ));
        commands.push(text(
            center,
            value_baseline + m.stat_caption_size * 2.0,
            column.caption,
            m.stat_caption_size,
            false,
            &config.muted,
            TextAnchor::Middle,
            m.stat_caption_size * 0.12,
        ));
    }

    // Footer: QR code on the left, logo and app name on the right.
    let footer_mid = footer_top + m.footer_height / 2.0;
    let text_nudge = m.footer_text_size / 3.0;
    if config.share_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
        let q = m.footer_height;
        commands.push(DrawCommand::Image {
            slot: ImageSlot::Qr,
            x: left,
            y: footer_top,
            width: q,
            height: q,
        });
        commands.push(text(
            left + q + m.gap,
            footer_mid + text_nudge,
            QR_CAPTION,
            m.footer_text_size,
            false,
            &config.muted,
            TextAnchor::Start,
            0.0,
        ));
    }

    let mut name_right = right;
    if config.logo.as_deref().is_some_and(|l| !l.trim().is_empty()) {
        commands.push(DrawCommand::Image {
            slot: ImageSlot::Logo,
            x: right - m.logo_size,
            y: footer_mid - m.logo_size / 2.0,
            width: m.logo_size,
            height: m.logo_size,
        });
        name_right -= m.logo_size + m.gap / 2.0;
    }
    commands.push(text(
        name_right,
        footer_mid + text_nudge,
        &config.app_name,
        m.footer_text_size,
        true,
        &config.ink,
        TextAnchor::End,
        0.0,
    ));

    tracing::debug!(
        commands = commands.len(),
        words = cloud.words.len(),
        dropped = cloud.dropped.len(),
        "poster laid out"
    );

    Ok(PosterLayout {
        width: w,
        height: h,
        title: config.title.clone(),
        font_family: config.font_family.clone(),
        commands,
        cloud,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout(story: &str, config: &PosterConfig) -> PosterLayout {
        let mut rng = StdRng::seed_from_u64(42);
        layout_poster_with_rng(story, config, &DeterministicTextMeasurer::default(), &mut rng)
            .unwrap()
    }

    fn texts(layout: &PosterLayout) -> Vec<&str> {
        layout
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_story_still_draws_chrome() {
        let config = PosterConfig {
            meta: "Day 12 · The Lost Kite".to_string(),
            ..Default::default()
        };
        let out = layout("", &config);
        assert!(out.cloud.words.is_empty());
        let t = texts(&out);
        assert!(t.contains(&"DAY 12 · THE LOST KITE"));
        assert!(t.contains(&"My Reading Story"));
        assert!(t.contains(&"WORDS READ"));
        assert!(t.contains(&"TIME PRACTICED"));
        assert!(t.contains(&"DAY STREAK"));
        assert!(t.contains(&"Reading Practice"));
    }

    #[test]
    fn background_comes_first_and_card_second() {
        let out = layout("kite", &PosterConfig::default());
        assert!(matches!(
            &out.commands[0],
            DrawCommand::Rect { x, y, corner_radius, .. } if *x == 0.0 && *y == 0.0 && *corner_radius == 0.0
        ));
        assert!(matches!(
            &out.commands[1],
            DrawCommand::Rect { corner_radius, .. } if *corner_radius > 0.0
        ));

        let no_card = layout(
            "kite",
            &PosterConfig {
                card: false,
                ..Default::default()
            },
        );
        assert_eq!(no_card.commands.len(), out.commands.len() - 1);
    }

    #[test]
    fn long_titles_are_capped_with_an_ellipsis() {
        let config = PosterConfig {
            title: "one two three four five six seven eight nine ten eleven twelve thirteen \
                    fourteen fifteen sixteen seventeen eighteen nineteen twenty"
                .to_string(),
            ..Default::default()
        };
        let out = layout("", &config);
        let title_lines: Vec<&str> = out
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    text,
                    font_size,
                    bold: true,
                    ..
                } if *font_size == 1080.0 * 0.06 => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(title_lines.len(), MAX_TITLE_LINES);
        assert!(title_lines.last().unwrap().ends_with('…'));
    }

    #[test]
    fn image_slots_follow_config() {
        let plain = layout("", &PosterConfig::default());
        assert_eq!(plain.image_slots().count(), 0);

        let config = PosterConfig {
            share_url: Some("https://example.com/day/12".to_string()),
            logo: Some("logo.png".to_string()),
            ..Default::default()
        };
        let out = layout("", &config);
        let slots: Vec<ImageSlot> = out.image_slots().collect();
        assert_eq!(slots, vec![ImageSlot::Qr, ImageSlot::Logo]);
        assert!(texts(&out).contains(&QR_CAPTION));
    }

    #[test]
    fn cloud_sits_between_title_and_stats() {
        let out = layout("kite kite river", &PosterConfig::default());
        let b = out.cloud.region.bounds;
        assert!(b.min_y > 1080.0 * 0.1);
        assert!(b.max_y < 1350.0 - 1080.0 * 0.1);
        assert_eq!(out.cloud.words.len() + out.cloud.dropped.len(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = PosterConfig {
            height: -5.0,
            ..Default::default()
        };
        assert!(
            layout_poster_with_rng("x", &config, &DeterministicTextMeasurer::default(), &mut rng)
                .is_err()
        );
    }
}
