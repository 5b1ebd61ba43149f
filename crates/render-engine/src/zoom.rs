//! Modal enlarged view of the current composite.

use appshot_common::error::{AppshotError, AppshotResult};
use appshot_device_model::geometry::{Rect, SurfaceSize};
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::surface::ComposedSurface;

/// Share of the viewport the zoomed composite may cover.
pub const ZOOM_VIEWPORT_FILL: f64 = 0.9;

/// Opacity of the black backdrop behind the zoomed composite.
pub const ZOOM_BACKDROP_ALPHA: u8 = 204;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomState {
    #[default]
    Collapsed,
    Zoomed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Character(char),
}

/// User input the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomEvent {
    /// Click or tap on the composite.
    Activate,
    Key(Key),
    BackdropClick,
    /// The close button.
    Close,
}

/// Where the zoomed composite lands in the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLayout {
    pub scale: f64,
    pub rect: Rect,
}

#[derive(Debug, Clone, Default)]
pub struct ZoomOverlayController {
    state: ZoomState,
}

impl ZoomOverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn is_zoomed(&self) -> bool {
        self.state == ZoomState::Zoomed
    }

    /// Apply one event. Opening needs a composited bitmap; closing always
    /// succeeds.
    pub fn handle(&mut self, event: ZoomEvent, has_composited: bool) -> ZoomState {
        let next = match (self.state, event) {
            (ZoomState::Collapsed, ZoomEvent::Activate) if has_composited => ZoomState::Zoomed,
            (ZoomState::Zoomed, ZoomEvent::Key(Key::Escape))
            | (ZoomState::Zoomed, ZoomEvent::BackdropClick)
            | (ZoomState::Zoomed, ZoomEvent::Close) => ZoomState::Collapsed,
            (state, _) => state,
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, event = ?event, "Zoom state changed");
            self.state = next;
        }
        self.state
    }

    /// Placement of a surface in `viewport`, only while zoomed.
    pub fn layout(&self, surface: SurfaceSize, viewport: SurfaceSize) -> Option<ZoomLayout> {
        if !self.is_zoomed() {
            return None;
        }
        fit_layout(surface, viewport)
    }

    /// Draw the zoomed view: backdrop plus the existing surface scaled to
    /// its layout. `None` while collapsed.
    pub fn render(
        &self,
        surface: &ComposedSurface,
        viewport: SurfaceSize,
    ) -> AppshotResult<Option<Pixmap>> {
        let Some(layout) = self.layout(surface.size(), viewport) else {
            return Ok(None);
        };

        let mut pixmap = Pixmap::new(viewport.width, viewport.height).ok_or_else(|| {
            AppshotError::render(format!(
                "Cannot allocate a {}x{} zoom view",
                viewport.width, viewport.height
            ))
        })?;
        pixmap.fill(Color::from_rgba8(0, 0, 0, ZOOM_BACKDROP_ALPHA));

        let scale = layout.scale as f32;
        let transform = Transform::from_row(
            scale,
            0.0,
            0.0,
            scale,
            layout.rect.x as f32,
            layout.rect.y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, surface.as_pixmap(), &paint, transform, None);
        Ok(Some(pixmap))
    }
}

/// Uniform scale fitting `surface` into 90% of `viewport`, centred.
pub fn fit_layout(surface: SurfaceSize, viewport: SurfaceSize) -> Option<ZoomLayout> {
    if surface.width == 0 || surface.height == 0 || viewport.width == 0 || viewport.height == 0 {
        return None;
    }
    let (sw, sh) = (f64::from(surface.width), f64::from(surface.height));
    let (vw, vh) = (f64::from(viewport.width), f64::from(viewport.height));

    let scale = (vw * ZOOM_VIEWPORT_FILL / sw).min(vh * ZOOM_VIEWPORT_FILL / sh);
    let (w, h) = (sw * scale, sh * scale);
    Some(ZoomLayout {
        scale,
        rect: Rect::new((vw - w) / 2.0, (vh - h) / 2.0, w, h),
    })
}
