//! Text rasterisation through cosmic-text with the bundled DejaVu Sans.
//!
//! Only the embedded font is registered, so shaped output never depends on
//! the fonts installed on the host.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{
    fontdb, Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent,
};
use tiny_skia::{Color, IntSize, Pixmap, PixmapPaint, Transform};

use crate::surface::premultiply_rgba_in_place;

/// Family name of the embedded font.
pub const FONT_FAMILY: &str = "DejaVu Sans";

static FONT_DATA: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

static FONTS: OnceLock<Mutex<FontSystem>> = OnceLock::new();

const LINE_HEIGHT: f32 = 1.2;

/// Coverage of shaped text, cropped to its ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl TextMask {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at `(x, y)`, 0 outside the mask.
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[(y * self.width + x) as usize]
    }

    /// Composite the text onto `pixmap` with its top-left ink pixel at `(x, y)`.
    pub fn draw(&self, pixmap: &mut Pixmap, x: i32, y: i32, color: Color) {
        let Some(tinted) = self.tinted(color) else {
            return;
        };
        pixmap.draw_pixmap(
            x,
            y,
            tinted.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn tinted(&self, color: Color) -> Option<Pixmap> {
        let size = IntSize::from_wh(self.width, self.height)?;
        let ink = color.to_color_u8();
        let mut data = Vec::with_capacity(self.coverage.len() * 4);
        for &coverage in &self.coverage {
            let alpha = (u16::from(ink.alpha()) * u16::from(coverage) + 127) / 255;
            data.extend_from_slice(&[ink.red(), ink.green(), ink.blue(), alpha as u8]);
        }
        premultiply_rgba_in_place(&mut data);
        Pixmap::from_vec(data, size)
    }
}

struct PlacedGlyph {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

fn bundled_font_system() -> FontSystem {
    let mut db = fontdb::Database::new();
    db.load_font_data(FONT_DATA.to_vec());
    FontSystem::new_with_locale_and_db("en-US".to_string(), db)
}

/// Shape `text` at `font_size` pixels and rasterise it.
///
/// Returns `None` for empty text, a non-positive size, or text without ink.
pub fn rasterize(text: &str, font_size: f32) -> Option<TextMask> {
    if text.is_empty() || !font_size.is_finite() || font_size <= 0.0 {
        return None;
    }

    let fonts = FONTS.get_or_init(|| Mutex::new(bundled_font_system()));
    let mut guard = fonts.lock().unwrap_or_else(PoisonError::into_inner);
    let font_system = &mut *guard;
    let mut swash_cache = SwashCache::new();

    let attrs = Attrs::new().family(Family::Name(FONT_FAMILY));
    let mut buffer = Buffer::new(font_system, Metrics::relative(font_size, LINE_HEIGHT));
    buffer.set_size(font_system, None, None);
    buffer.set_text(font_system, text, &attrs, Shaping::Advanced);
    buffer.shape_until_scroll(font_system, false);

    let mut placed = Vec::new();
    for run in buffer.layout_runs() {
        for glyph in run.glyphs {
            let physical = glyph.physical((0.0, 0.0), 1.0);
            let Some(image) = swash_cache.get_image(font_system, physical.cache_key) else {
                continue;
            };
            let placement = image.placement;
            let pixels = (placement.width * placement.height) as usize;
            if pixels == 0 {
                continue;
            }
            let coverage: Vec<u8> = match image.content {
                SwashContent::Mask => match image.data.get(..pixels) {
                    Some(mask) => mask.to_vec(),
                    None => continue,
                },
                SwashContent::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
                _ => image
                    .data
                    .chunks_exact(4)
                    .map(|px| px[0].max(px[1]).max(px[2]))
                    .collect(),
            };
            if coverage.len() != pixels {
                continue;
            }
            placed.push(PlacedGlyph {
                left: physical.x + placement.left,
                top: physical.y + run.line_y as i32 - placement.top,
                width: placement.width,
                height: placement.height,
                coverage,
            });
        }
    }

    crop_to_ink(&placed)
}

fn crop_to_ink(placed: &[PlacedGlyph]) -> Option<TextMask> {
    let left = placed.iter().map(|g| g.left).min()?;
    let top = placed.iter().map(|g| g.top).min()?;
    let right = placed.iter().map(|g| g.left + g.width as i32).max()?;
    let bottom = placed.iter().map(|g| g.top + g.height as i32).max()?;

    let width = u32::try_from(right - left).ok()?;
    let height = u32::try_from(bottom - top).ok()?;
    let mut coverage = vec![0u8; (width * height) as usize];

    for glyph in placed {
        let dx = (glyph.left - left) as u32;
        let dy = (glyph.top - top) as u32;
        for row in 0..glyph.height {
            for col in 0..glyph.width {
                let src = glyph.coverage[(row * glyph.width + col) as usize];
                let dst = &mut coverage[((dy + row) * width + dx + col) as usize];
                *dst = (*dst).max(src);
            }
        }
    }

    if coverage.iter().all(|&c| c == 0) {
        return None;
    }
    Some(TextMask {
        width,
        height,
        coverage,
    })
}
