//! Gesture bar overlay at the bottom of the screen.

use appshot_device_model::geometry::{FrameGeometry, Rect};
use tiny_skia::Pixmap;

use crate::raster::{fill_rect, fill_rounded_rect};
use crate::theme::Theme;

pub const HOME_INDICATOR_WIDTH: f64 = 120.0;
pub const HOME_INDICATOR_HEIGHT: f64 = 5.0;
pub const HOME_INDICATOR_RADIUS: f64 = 2.5;

/// The home indicator pill, centred in the gesture bar.
pub fn home_indicator_rect(bar: Rect) -> Rect {
    let width = HOME_INDICATOR_WIDTH.min(bar.w);
    let height = HOME_INDICATOR_HEIGHT.min(bar.h);
    let center = bar.center();
    Rect::new(
        center.x - width / 2.0,
        center.y - height / 2.0,
        width,
        height,
    )
}

/// Draw the gesture bar; devices without one are left untouched.
pub fn render_bottom_bar(pixmap: &mut Pixmap, geometry: &FrameGeometry, theme: Theme) {
    let Some(bar) = geometry.bottom_bar else {
        return;
    };
    let palette = theme.palette();
    fill_rect(pixmap, bar, palette.bottom_bar);
    fill_rounded_rect(
        pixmap,
        home_indicator_rect(bar),
        HOME_INDICATOR_RADIUS,
        palette.home_indicator,
    );
}
