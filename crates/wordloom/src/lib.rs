#![forbid(unsafe_code)]

//! `wordloom` renders word-frequency posters for reading practice, headless.
//!
//! A story text is reduced to its most frequent content words, which are packed into a circular
//! word cloud by a greedy spiral search and framed by a header, a statistics band and a footer
//! with a QR code.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`wordloom::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use wordloom_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use wordloom_render::assets::{
        FetchError, FetchedImage, ImageFetcher, OfflineFetcher, PosterAssets, StaticFetcher,
        load_assets, qr_code_url,
    };
    pub use wordloom_render::model::{DrawCommand, PosterLayout};
    pub use wordloom_render::svg::{SvgRenderOptions, render_poster_svg};
    pub use wordloom_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use wordloom_render::{
        LayoutOptions, RenderedPoster, layout_poster, render_poster, render_poster_sync,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Config(#[from] wordloom_core::Error),
        #[error(transparent)]
        Render(#[from] wordloom_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token suitable for embedding
    /// several posters in the same page.
    ///
    /// This helper:
    /// - trims whitespace
    /// - replaces unsupported characters with `-`
    /// - ensures the id starts with an ASCII letter by prefixing `p-` when needed
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "p-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "p-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "p" {
            return "p-untitled".to_string();
        }
        out.to_string()
    }

    /// Convenience wrapper that bundles a poster config with layout options.
    ///
    /// The config is validated once, up front, so every render method only fails on I/O-free
    /// conditions that cannot happen for a valid config.
    #[derive(Clone)]
    pub struct PosterRenderer {
        pub config: crate::PosterConfig,
        pub layout: LayoutOptions,
    }

    impl PosterRenderer {
        pub fn new(config: crate::PosterConfig) -> Result<Self> {
            config.validate()?;
            Ok(Self {
                config,
                layout: LayoutOptions::default(),
            })
        }

        pub fn with_seed(mut self, seed: u64) -> Self {
            self.layout.seed = Some(seed);
            self
        }

        pub fn with_diagram_id(mut self, id: &str) -> Self {
            self.layout.svg.diagram_id = Some(sanitize_svg_id(id));
            self
        }

        pub fn layout_sync(&self, story: &str) -> Result<PosterLayout> {
            Ok(layout_poster(story, &self.config, &self.layout)?)
        }

        /// Renders the poster without fetching footer images.
        pub fn render_poster_sync(&self, story: &str) -> Result<RenderedPoster> {
            Ok(render_poster_sync(
                story,
                &self.config,
                &self.layout,
                &OfflineFetcher,
                |_| {},
            )?)
        }

        pub fn render_svg_sync(&self, story: &str) -> Result<String> {
            Ok(self.render_poster_sync(story)?.svg)
        }

        pub async fn render<F>(
            &self,
            story: &str,
            fetcher: &dyn ImageFetcher,
            on_ready: F,
        ) -> Result<RenderedPoster>
        where
            F: FnOnce(&RenderedPoster),
        {
            Ok(render_poster(story, &self.config, &self.layout, fetcher, on_ready).await?)
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            story: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let poster = self.render_poster_sync(story)?;
            raster::poster_to_png(&poster, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg_sync(
            &self,
            story: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let poster = self.render_poster_sync(story)?;
            raster::poster_to_jpeg(&poster, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf_sync(&self, story: &str) -> raster::Result<Vec<u8>> {
            let poster = self.render_poster_sync(story)?;
            raster::poster_to_pdf(&poster)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn sanitize_svg_id_normalizes() {
            assert_eq!(sanitize_svg_id("  "), "p-untitled");
            assert_eq!(sanitize_svg_id("day 12!"), "day-12");
            assert_eq!(sanitize_svg_id("12 kites"), "p-12-kites");
            assert_eq!(sanitize_svg_id("---"), "p-untitled");
        }

        #[test]
        fn renderer_rejects_invalid_config() {
            let config = crate::PosterConfig {
                max_words: 0,
                ..Default::default()
            };
            assert!(matches!(
                PosterRenderer::new(config),
                Err(HeadlessError::Config(_))
            ));
        }

        #[test]
        fn renderer_svg_uses_sanitized_id() {
            let renderer = PosterRenderer::new(crate::PosterConfig::default())
                .unwrap()
                .with_seed(9)
                .with_diagram_id("day 1");
            let svg = renderer.render_svg_sync("kite kite river").unwrap();
            assert!(svg.starts_with(r#"<svg id="day-1""#));
            assert!(svg.contains(r#"class="cloud-word""#));
        }
    }
}
