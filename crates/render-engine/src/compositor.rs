//! Layered draw order for one composed preview.
//!
//! ```text
//! clear ─► frame (shadowed fill + border) ─► screen ─► status bar
//!       ─► bottom bar ─► user bitmap ─► buttons
//! ```
//!
//! Steps up to the bottom bar never depend on the user bitmap, so a failed
//! decode still leaves a consistent partial composite.

use appshot_common::error::AppshotResult;
use appshot_device_model::geometry::FrameGeometry;
use tiny_skia::{FilterQuality, PixmapPaint, PixmapRef, Transform};

use crate::background::render_background;
use crate::bottom_bar::render_bottom_bar;
use crate::buttons::render_buttons;
use crate::raster::fill_rect;
use crate::status_bar::render_status_bar;
use crate::surface::ComposedSurface;
use crate::theme::Theme;

/// Draws one device composite onto an explicit target surface.
#[derive(Debug, Clone, Copy)]
pub struct ScreenCompositor<'a> {
    geometry: &'a FrameGeometry,
    theme: Theme,
}

impl<'a> ScreenCompositor<'a> {
    pub fn new(geometry: &'a FrameGeometry, theme: Theme) -> Self {
        Self { geometry, theme }
    }

    pub fn geometry(&self) -> &FrameGeometry {
        self.geometry
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Everything that does not need the user bitmap: clear, frame,
    /// screen fill, status bar and (if present) the bottom bar.
    pub fn draw_chrome(&self, surface: &mut ComposedSurface) -> AppshotResult<()> {
        surface.clear();
        let pixmap = surface.pixmap_mut();
        render_background(pixmap, self.geometry, self.theme)?;
        fill_rect(pixmap, self.geometry.screen, self.theme.palette().screen);
        render_status_bar(pixmap, self.geometry, self.theme);
        render_bottom_bar(pixmap, self.geometry, self.theme);
        Ok(())
    }

    /// Stretch `bitmap` over the content rectangle, ignoring its aspect ratio.
    pub fn draw_bitmap(&self, surface: &mut ComposedSurface, bitmap: PixmapRef<'_>) {
        let content = self.geometry.content;
        if content.is_empty() {
            return;
        }
        let scale_x = content.w / f64::from(bitmap.width());
        let scale_y = content.h / f64::from(bitmap.height());
        let transform = Transform::from_row(
            scale_x as f32,
            0.0,
            0.0,
            scale_y as f32,
            content.x as f32,
            content.y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        surface
            .pixmap_mut()
            .draw_pixmap(0, 0, bitmap, &paint, transform, None);
    }

    pub fn draw_buttons(&self, surface: &mut ComposedSurface) {
        render_buttons(surface.pixmap_mut(), self.geometry, self.theme);
    }

    /// The full draw order in one go, for callers that already hold the
    /// decoded bitmap.
    pub fn compose(
        &self,
        surface: &mut ComposedSurface,
        bitmap: Option<PixmapRef<'_>>,
    ) -> AppshotResult<()> {
        self.draw_chrome(surface)?;
        if let Some(bitmap) = bitmap {
            self.draw_bitmap(surface, bitmap);
        }
        self.draw_buttons(surface);
        Ok(())
    }
}
