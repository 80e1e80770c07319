//! Greedy spiral placement for the poster word cloud.
//!
//! Words are placed in frequency order. Each word walks an outward spiral from a random angle
//! until its box fits inside the cloud circle without touching an earlier word, or the retry
//! budget runs out and the word is dropped.

use crate::model::{CloudLayout, CloudRegion, DrawCommand, PlacedWord, PlacementRect, TextAnchor};
use crate::text::{TextMeasurer, TextStyle};
use rand::Rng;
use std::f64::consts::{PI, TAU};
use wordloom_core::{FontScale, WordFrequencyEntry, count_range};

pub const MAX_ATTEMPTS: usize = 900;
pub const ANGLE_STEP: f64 = PI / 18.0;
pub const RADIUS_STEP: f64 = 3.0;
/// Starting radius of the least frequent word; the most frequent one starts at the centroid.
pub const START_RADIUS_SPREAD: f64 = 40.0;

pub const CLOUD_WORD_CLASS: &str = "cloud-word";

#[derive(Debug, Clone, Copy)]
pub struct CloudStyle<'a> {
    pub accent: &'a str,
    pub ink: &'a str,
    pub font_family: Option<&'a str>,
}

fn word_style(style: &CloudStyle<'_>, font_size: f64) -> TextStyle {
    TextStyle {
        font_family: style.font_family.map(str::to_string),
        font_size,
        font_weight: Some("bold".to_string()),
    }
}

/// Spiral search for one `width x height` box. Returns the baseline origin and the box.
fn find_slot<R: Rng>(
    region: &CloudRegion,
    placed: &[PlacementRect],
    width: f64,
    height: f64,
    start_radius: f64,
    rng: &mut R,
) -> Option<(f64, f64, PlacementRect)> {
    let (cx, cy) = region.centroid();
    let mut angle = rng.gen_range(0.0..TAU);
    let mut radius = start_radius;

    for _ in 0..MAX_ATTEMPTS {
        if radius >= region.radius {
            break;
        }
        let x = cx + radius * angle.cos() - width / 2.0;
        let baseline = cy + radius * angle.sin() + height / 2.0;
        let rect = PlacementRect {
            x,
            y: baseline - height,
            width,
            height,
        };
        if region.contains_rect(&rect)
            && region.within_radius(&rect)
            && !placed.iter().any(|p| p.intersects(&rect))
        {
            return Some((x, baseline, rect));
        }
        angle += ANGLE_STEP;
        radius += RADIUS_STEP;
    }
    None
}

pub fn layout_cloud<R: Rng>(
    entries: &[WordFrequencyEntry],
    region: CloudRegion,
    scale: &FontScale,
    style: &CloudStyle<'_>,
    measurer: &dyn TextMeasurer,
    rng: &mut R,
) -> CloudLayout {
    let mut words: Vec<PlacedWord> = Vec::with_capacity(entries.len());
    let mut rects: Vec<PlacementRect> = Vec::with_capacity(entries.len());
    let mut dropped: Vec<String> = Vec::new();

    let Some((min_count, max_count)) = count_range(entries) else {
        return CloudLayout {
            region,
            words,
            dropped,
        };
    };

    for (rank, entry) in entries.iter().enumerate() {
        let font_size = scale.size_for(entry.count, min_count, max_count);
        let normalized = FontScale::normalized(entry.count, min_count, max_count);
        let metrics = measurer.measure(&entry.word, &word_style(style, font_size));
        let start_radius = (1.0 - normalized) * START_RADIUS_SPREAD;

        let Some((baseline_x, baseline_y, rect)) =
            find_slot(&region, &rects, metrics.width, metrics.height, start_radius, rng)
        else {
            tracing::debug!(word = %entry.word, rank, font_size, "no free slot; word dropped");
            dropped.push(entry.word.clone());
            continue;
        };

        tracing::trace!(word = %entry.word, x = rect.x, y = rect.y, "placed word");
        let fill = if rank == 0 { style.accent } else { style.ink };
        rects.push(rect);
        words.push(PlacedWord {
            word: entry.word.clone(),
            count: entry.count,
            rank,
            font_size,
            fill: fill.to_string(),
            rect,
            baseline_x,
            baseline_y,
        });
    }

    tracing::debug!(
        placed = words.len(),
        dropped = dropped.len(),
        radius = region.radius,
        "word cloud laid out"
    );
    CloudLayout {
        region,
        words,
        dropped,
    }
}

/// Text commands for every placed word, in placement order.
pub fn word_commands<'a>(cloud: &'a CloudLayout) -> impl Iterator<Item = DrawCommand> + 'a {
    cloud.words.iter().map(|w| DrawCommand::Text {
        x: w.baseline_x,
        y: w.baseline_y,
        text: w.word.clone(),
        font_size: w.font_size,
        bold: true,
        fill: w.fill.clone(),
        anchor: TextAnchor::Start,
        letter_spacing: 0.0,
        class: Some(CLOUD_WORD_CLASS.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Bounds;
    use crate::text::DeterministicTextMeasurer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const STYLE: CloudStyle<'static> = CloudStyle {
        accent: "#e4572e",
        ink: "#1f2937",
        font_family: None,
    };

    fn region(size: f64) -> CloudRegion {
        CloudRegion::new(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: size,
            max_y: size,
        })
    }

    fn entry(word: &str, count: u32) -> WordFrequencyEntry {
        WordFrequencyEntry {
            word: word.to_string(),
            count,
        }
    }

    #[test]
    fn empty_table_places_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = layout_cloud(
            &[],
            region(400.0),
            &FontScale::default(),
            &STYLE,
            &DeterministicTextMeasurer::default(),
            &mut rng,
        );
        assert!(out.words.is_empty());
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn single_word_starts_mid_spiral_in_accent() {
        // A lone word has normalized frequency 0.5 and starts 20px out; with a region this
        // large the first candidate already fits.
        let mut rng = StdRng::seed_from_u64(7);
        let out = layout_cloud(
            &[entry("kite", 4)],
            region(800.0),
            &FontScale::default(),
            &STYLE,
            &DeterministicTextMeasurer::default(),
            &mut rng,
        );
        assert_eq!(out.words.len(), 1);
        let w = &out.words[0];
        assert_eq!(w.font_size, 107.5);
        assert_eq!(w.fill, "#e4572e");
        let (cx, cy) = w.rect.center();
        assert!(((cx - 400.0).hypot(cy - 400.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_words_are_dropped_not_clipped() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = layout_cloud(
            &[entry("extraordinarily", 9), entry("ok", 1)],
            region(160.0),
            &FontScale::default(),
            &STYLE,
            &DeterministicTextMeasurer::default(),
            &mut rng,
        );
        assert_eq!(out.dropped, vec!["extraordinarily".to_string()]);
        assert_eq!(out.words.len(), 1);
        assert_eq!(out.words[0].word, "ok");
        // Only rank 0 uses the accent color, even when it was dropped.
        assert_eq!(out.words[0].fill, "#1f2937");
    }

    #[test]
    fn degenerate_region_places_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = layout_cloud(
            &[entry("a", 1)],
            region(0.0),
            &FontScale::default(),
            &STYLE,
            &DeterministicTextMeasurer::default(),
            &mut rng,
        );
        assert!(out.words.is_empty());
        assert_eq!(out.dropped.len(), 1);
    }

    #[test]
    fn commands_mirror_placed_words() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = layout_cloud(
            &[entry("sun", 3), entry("moon", 2), entry("star", 1)],
            region(900.0),
            &FontScale::default(),
            &STYLE,
            &DeterministicTextMeasurer::default(),
            &mut rng,
        );
        let cmds: Vec<DrawCommand> = word_commands(&out).collect();
        assert_eq!(cmds.len(), out.words.len());
        for (cmd, w) in cmds.iter().zip(&out.words) {
            let DrawCommand::Text { text, x, y, .. } = cmd else {
                panic!("expected text command");
            };
            assert_eq!(text, &w.word);
            assert_eq!((*x, *y), (w.baseline_x, w.baseline_y));
        }
    }
}
