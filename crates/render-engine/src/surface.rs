//! The composed raster surface.

use appshot_common::error::{AppshotError, AppshotResult};
use appshot_device_model::geometry::SurfaceSize;
use image::RgbaImage;
use tiny_skia::{Pixmap, PixmapRef};

/// The single raster target a preview composes into.
///
/// Pixels are premultiplied RGBA8. Only the render job controller writes to
/// it; everything else reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSurface {
    pixmap: Pixmap,
}

impl ComposedSurface {
    /// Allocate a fully transparent surface.
    pub fn new(size: SurfaceSize) -> AppshotResult<Self> {
        let pixmap = Pixmap::new(size.width, size.height).ok_or_else(|| {
            AppshotError::render(format!(
                "Cannot allocate a {}x{} surface",
                size.width, size.height
            ))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    pub fn as_pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Straight-alpha RGBA of one pixel; `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Copy out as a straight-alpha image for encoding.
    pub fn to_rgba_image(&self) -> AppshotResult<RgbaImage> {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        RgbaImage::from_raw(self.width(), self.height(), data)
            .ok_or_else(|| AppshotError::render("Surface buffer does not match its dimensions"))
    }

    /// FNV-1a hash over the raw pixel bytes; equal surfaces hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in self.pixmap.data() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }
}

/// Premultiply a straight-alpha RGBA8 buffer in place.
pub(crate) fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = u16::from(pixel[3]);
        for channel in &mut pixel[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
}

/// Turn a straight-alpha image into a premultiplied pixmap.
pub(crate) fn pixmap_from_rgba(image: RgbaImage) -> AppshotResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut data = image.into_raw();
    premultiply_rgba_in_place(&mut data);
    let size = tiny_skia::IntSize::from_wh(width, height)
        .ok_or_else(|| AppshotError::render(format!("Invalid bitmap size {width}x{height}")))?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| AppshotError::render("Bitmap buffer does not match its dimensions"))
}
