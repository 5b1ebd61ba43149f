//! Asynchronous decoding of the user's bitmap.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use appshot_common::error::{AppshotError, AppshotResult};
use appshot_device_model::geometry::Rect;
use image::imageops::FilterType;
use image::ImageFormat;
use tiny_skia::{Pixmap, PixmapRef};

use crate::surface::pixmap_from_rgba;

/// Encoded formats the uploader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitmapFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl BitmapFormat {
    /// Map a declared MIME type; parameters after `;` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Webp => ImageFormat::WebP,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }
}

/// Encoded bitmap bytes plus their declared format.
///
/// Cheap to clone; the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBitmap {
    bytes: Arc<[u8]>,
    format: BitmapFormat,
}

impl SourceBitmap {
    pub fn new(bytes: impl Into<Arc<[u8]>>, format: BitmapFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn from_mime(bytes: impl Into<Arc<[u8]>>, mime: &str) -> AppshotResult<Self> {
        let format = BitmapFormat::from_mime(mime)
            .ok_or_else(|| AppshotError::unsupported(format!("Unsupported image type '{mime}'")))?;
        Ok(Self::new(bytes, format))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> BitmapFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Pixel size the decoded bitmap is resampled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn for_content(content: Rect) -> Self {
        Self {
            width: content.w.max(0.0).round() as u32,
            height: content.h.max(0.0).round() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone)]
pub struct DecodedBitmap {
    /// Premultiplied pixels at the target size; `None` for an empty target.
    pub pixmap: Option<Pixmap>,
    pub source_width: u32,
    pub source_height: u32,
}

impl DecodedBitmap {
    pub fn as_pixmap(&self) -> Option<PixmapRef<'_>> {
        self.pixmap.as_ref().map(Pixmap::as_ref)
    }
}

/// Turns encoded bytes into pixels without blocking the caller's task.
pub trait BitmapDecoder {
    fn decode(
        &self,
        source: &SourceBitmap,
        target: TargetSize,
    ) -> impl Future<Output = AppshotResult<DecodedBitmap>>;
}

/// Decoder backed by the `image` crate, run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl BitmapDecoder for ImageDecoder {
    async fn decode(
        &self,
        source: &SourceBitmap,
        target: TargetSize,
    ) -> AppshotResult<DecodedBitmap> {
        let source = source.clone();
        tokio::task::spawn_blocking(move || decode_blocking(&source, target))
            .await
            .map_err(|e| AppshotError::decode(format!("Decode task failed: {e}")))?
    }
}

/// Decode and stretch to `target` on the current thread.
pub fn decode_blocking(source: &SourceBitmap, target: TargetSize) -> AppshotResult<DecodedBitmap> {
    let image = image::load_from_memory_with_format(source.bytes(), source.format().image_format())
        .map_err(|e| {
            AppshotError::decode(format!("Cannot read {} bitmap: {e}", source.format().mime()))
        })?;
    let rgba = image.to_rgba8();
    let (source_width, source_height) = rgba.dimensions();

    tracing::debug!(
        format = source.format().mime(),
        bytes = source.len(),
        width = source_width,
        height = source_height,
        target_width = target.width,
        target_height = target.height,
        "Decoded bitmap"
    );

    let pixmap = if target.is_empty() {
        None
    } else if (source_width, source_height) == (target.width, target.height) {
        Some(pixmap_from_rgba(rgba)?)
    } else {
        let resized = image::imageops::resize(&rgba, target.width, target.height, FilterType::Triangle);
        Some(pixmap_from_rgba(resized)?)
    };

    Ok(DecodedBitmap {
        pixmap,
        source_width,
        source_height,
    })
}

/// Counts temporary decode handles that are still alive.
#[derive(Debug, Clone, Default)]
pub struct LeaseTracker {
    outstanding: Arc<AtomicUsize>,
}

impl LeaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> DecodeLease {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        DecodeLease {
            outstanding: Arc::clone(&self.outstanding),
        }
    }

    /// Number of leases not yet dropped.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

/// Scoped handle held for the duration of one decode; released on drop.
#[derive(Debug)]
#[must_use = "dropping the lease releases it immediately"]
pub struct DecodeLease {
    outstanding: Arc<AtomicUsize>,
}

impl Drop for DecodeLease {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}
