#![forbid(unsafe_code)]

//! PNG, JPG and PDF output for rendered posters.
//!
//! Rasterization goes through the poster's own SVG, but the canvas size, the JPG backdrop and the
//! default font come from its layout, so the output never depends on re-reading SVG attributes.

use crate::render::{HeadlessError, RenderedPoster};
use wordloom_render::model::PosterLayout;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse poster SVG: {0}")]
    SvgParse(String),
    #[error("a {width}x{height} px poster cannot be rasterized")]
    CanvasSize { width: u32, height: u32 },
    #[error("failed to encode {0}")]
    Encode(&'static str),
    #[error("unusable background color `{0}` (JPG output needs an opaque color)")]
    Background(String),
    #[error("failed to convert poster to PDF: {0}")]
    PdfConvert(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Pixels per poster unit.
    pub scale: f32,
    /// Overrides the poster's own background color.
    pub background: Option<String>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
        }
    }
}

const FALLBACK_FONT: &str = "Arial";

pub fn poster_to_png(poster: &RenderedPoster, options: &RasterOptions) -> Result<Vec<u8>> {
    let backdrop = match options.background.as_deref() {
        Some(bg) => Some(parse_color(bg)?),
        None => None,
    };
    let pixmap = rasterize(poster, options.scale, backdrop)?;
    pixmap.encode_png().map_err(|_| RasterError::Encode("PNG"))
}

pub fn poster_to_jpeg(poster: &RenderedPoster, options: &RasterOptions) -> Result<Vec<u8>> {
    let bg = jpeg_background(poster, options);
    let color = parse_color(bg)?;
    if color.alpha() != 1.0 {
        return Err(RasterError::Background(bg.to_string()));
    }

    let pixmap = rasterize(poster, options.scale, Some(color))?;
    let (w, h) = (pixmap.width(), pixmap.height());

    // Opaque backdrop: every pixel is fully covered, so RGBA drops to RGB losslessly.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality)
        .encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::Encode("JPG"))?;
    Ok(out)
}

/// Converts the poster to a single-page vector PDF the size of the poster.
pub fn poster_to_pdf(poster: &RenderedPoster) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = font_family(&poster.layout);

    let tree = svg2pdf::usvg::Tree::from_str(&poster.svg, &opt)
        .map_err(|err| RasterError::SvgParse(err.to_string()))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|err| RasterError::PdfConvert(err.to_string()))
}

/// The explicit override, else the poster's own background.
fn jpeg_background<'a>(poster: &'a RenderedPoster, options: &'a RasterOptions) -> &'a str {
    options
        .background
        .as_deref()
        .or_else(|| poster.layout.background())
        .unwrap_or("white")
}

fn font_family(layout: &PosterLayout) -> String {
    layout
        .primary_font_family()
        .unwrap_or(FALLBACK_FONT)
        .to_string()
}

/// Pixel size of the poster canvas at `scale`.
fn canvas_size(layout: &PosterLayout, scale: f32) -> Result<(u32, u32)> {
    let px = |units: f64| (units * scale as f64).ceil().max(1.0);
    let (w, h) = (px(layout.width), px(layout.height));
    if !w.is_finite() || !h.is_finite() || w > u32::MAX as f64 || h > u32::MAX as f64 {
        return Err(RasterError::CanvasSize {
            width: u32::MAX,
            height: u32::MAX,
        });
    }
    Ok((w as u32, h as u32))
}

fn rasterize(
    poster: &RenderedPoster,
    scale: f32,
    backdrop: Option<tiny_skia::Color>,
) -> Result<tiny_skia::Pixmap> {
    let (width, height) = canvas_size(&poster.layout, scale)?;
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::CanvasSize { width, height })?;
    if let Some(color) = backdrop {
        pixmap.fill(color);
    }

    let mut opt = usvg::Options::default();
    // Which system font resolves the poster's stack varies by machine.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = font_family(&poster.layout);
    let tree = usvg::Tree::from_str(&poster.svg, &opt)
        .map_err(|err| RasterError::SvgParse(err.to_string()))?;

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Any CSS color the poster config accepts: hex, `rgb()`, named colors, `transparent`.
fn parse_color(text: &str) -> Result<tiny_skia::Color> {
    let c: svgtypes::Color = text
        .trim()
        .parse()
        .map_err(|_| RasterError::Background(text.to_string()))?;
    Ok(tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha))
}
