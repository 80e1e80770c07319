//! Footer images (QR code and logo) and their asynchronous loading.
//!
//! Both images are optional decorations. A fetch that fails is logged and leaves its slot empty;
//! it never fails the render.

use crate::model::ImageSlot;
use base64::Engine as _;
use futures::future::{self, BoxFuture, FutureExt};
use rustc_hash::FxHashMap;
use wordloom_core::config::PosterConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("offline: refusing to fetch {location}")]
    Offline { location: String },
    #[error("image not found: {location}")]
    NotFound { location: String },
    #[error("HTTP {status} fetching {location}")]
    Http { location: String, status: u16 },
    #[error("failed to fetch {location}: {message}")]
    Transport { location: String, message: String },
    #[error("unsupported image data from {location}")]
    UnsupportedImage { location: String },
    #[error("invalid QR endpoint `{endpoint}`: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    /// Wraps raw bytes after checking they look like an image format SVG renderers understand.
    pub fn from_bytes(source: &str, bytes: Vec<u8>) -> Result<Self, FetchError> {
        let Some(mime) = sniff_image_mime(&bytes) else {
            return Err(FetchError::UnsupportedImage {
                location: source.to_string(),
            });
        };
        Ok(Self { mime, bytes })
    }

    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    if (head.starts_with("<svg") || head.starts_with("<?xml")) && head.contains("<svg") {
        return Some("image/svg+xml");
    }
    None
}

/// Builds the third-party QR endpoint URL that encodes `share_url`.
pub fn qr_code_url(endpoint: &str, share_url: &str, size: u32) -> Result<String, FetchError> {
    let size = format!("{size}x{size}");
    let url = url::Url::parse_with_params(
        endpoint,
        &[("size", size.as_str()), ("data", share_url), ("margin", "0")],
    )
    .map_err(|err| FetchError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })?;
    Ok(url.into())
}

/// Resolves an image source (URL or path, depending on the implementation) to bytes.
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<FetchedImage, FetchError>>;
}

/// Fails every request. Posters render without footer images.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl ImageFetcher for OfflineFetcher {
    fn fetch<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<FetchedImage, FetchError>> {
        future::ready(Err(FetchError::Offline {
            location: source.to_string(),
        }))
        .boxed()
    }
}

/// Serves images from memory, keyed by exact source string.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    images: FxHashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, source: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.images.insert(source.into(), bytes.into());
        self
    }
}

impl ImageFetcher for StaticFetcher {
    fn fetch<'a>(&'a self, source: &'a str) -> BoxFuture<'a, Result<FetchedImage, FetchError>> {
        let result = match self.images.get(source) {
            Some(bytes) => FetchedImage::from_bytes(source, bytes.clone()),
            None => Err(FetchError::NotFound {
                location: source.to_string(),
            }),
        };
        future::ready(result).boxed()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterAssets {
    pub qr: Option<FetchedImage>,
    pub logo: Option<FetchedImage>,
}

impl PosterAssets {
    pub fn get(&self, slot: ImageSlot) -> Option<&FetchedImage> {
        match slot {
            ImageSlot::Qr => self.qr.as_ref(),
            ImageSlot::Logo => self.logo.as_ref(),
        }
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

async fn fetch_slot(
    fetcher: &dyn ImageFetcher,
    slot: ImageSlot,
    source: Result<String, FetchError>,
) -> Option<FetchedImage> {
    let result = match source {
        Ok(source) => fetcher.fetch(&source).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(image) => {
            tracing::debug!(?slot, mime = image.mime, bytes = image.bytes.len(), "image loaded");
            Some(image)
        }
        Err(err) => {
            tracing::warn!(?slot, %err, "image unavailable; slot left empty");
            None
        }
    }
}

/// Fetches the QR code and logo concurrently and waits for both to settle.
///
/// Slots without a configured source are skipped without a request.
pub async fn load_assets(config: &PosterConfig, fetcher: &dyn ImageFetcher) -> PosterAssets {
    let qr = async {
        let share_url = non_blank(config.share_url.as_deref())?;
        let source = qr_code_url(&config.qr_endpoint, share_url, config.qr_size);
        fetch_slot(fetcher, ImageSlot::Qr, source).await
    };
    let logo = async {
        let source = non_blank(config.logo.as_deref())?;
        fetch_slot(fetcher, ImageSlot::Logo, Ok(source.to_string())).await
    };
    let (qr, logo) = futures::join!(qr, logo);
    PosterAssets { qr, logo }
}
