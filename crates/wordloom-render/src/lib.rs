#![forbid(unsafe_code)]

pub mod assets;
pub mod cloud;
pub mod model;
pub mod poster;
pub mod svg;
pub mod text;

use crate::assets::{ImageFetcher, PosterAssets, load_assets};
use crate::model::PosterLayout;
use crate::svg::{SvgRenderOptions, render_poster_svg};
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use wordloom_core::config::PosterConfig;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] wordloom_core::Error),
    #[error("poster layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    /// Sizes every word box the placement engine packs.
    ///
    /// The default [`DeterministicTextMeasurer`] assumes 0.6 em per character (x1.08 when bold).
    /// Real Helvetica/Arial glyphs for `m`, `w` and capitals run wider, so rasterized words heavy
    /// in them can touch or overlap even though their boxes do not. Plug in a font-metrics
    /// measurer when the output font is known.
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    /// Seeds the spiral start angles. `None` draws a fresh seed per render.
    pub seed: Option<u64>,
    pub svg: SvgRenderOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            seed: None,
            svg: SvgRenderOptions::default(),
        }
    }
}

impl LayoutOptions {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Lays out a poster for `story` using the measurer and seed from `options`.
pub fn layout_poster(
    story: &str,
    config: &PosterConfig,
    options: &LayoutOptions,
) -> Result<PosterLayout> {
    let mut rng = options.rng();
    poster::layout_poster_with_rng(story, config, options.text_measurer.as_ref(), &mut rng)
}

/// A finished poster: the layout, the images that loaded, and the serialized SVG.
#[derive(Debug, Clone)]
pub struct RenderedPoster {
    pub layout: PosterLayout,
    pub assets: PosterAssets,
    pub svg: String,
}

/// Lays out the poster, waits for the QR code and logo to load (or fail), serializes it and then
/// hands the result to `on_ready`.
///
/// `on_ready` runs exactly once for every render that starts, whatever happened to the images.
/// An invalid `config` is rejected before anything starts and `on_ready` is not called.
pub async fn render_poster<F>(
    story: &str,
    config: &PosterConfig,
    options: &LayoutOptions,
    fetcher: &dyn ImageFetcher,
    on_ready: F,
) -> Result<RenderedPoster>
where
    F: FnOnce(&RenderedPoster),
{
    let layout = layout_poster(story, config, options)?;
    let assets = load_assets(config, fetcher).await;
    let svg = render_poster_svg(&layout, &assets, &options.svg);
    let poster = RenderedPoster {
        layout,
        assets,
        svg,
    };
    tracing::debug!(
        qr = poster.assets.qr.is_some(),
        logo = poster.assets.logo.is_some(),
        bytes = poster.svg.len(),
        "poster ready"
    );
    on_ready(&poster);
    Ok(poster)
}

/// Synchronous [`render_poster`] (executor-free).
pub fn render_poster_sync<F>(
    story: &str,
    config: &PosterConfig,
    options: &LayoutOptions,
    fetcher: &dyn ImageFetcher,
    on_ready: F,
) -> Result<RenderedPoster>
where
    F: FnOnce(&RenderedPoster),
{
    futures::executor::block_on(render_poster(story, config, options, fetcher, on_ready))
}

/// Serializes a layout as JSON (for tooling and snapshot inspection).
pub fn layout_to_json(layout: &PosterLayout, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    })
}
