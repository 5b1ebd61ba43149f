//! Status bar overlay: signal dots, the clock, and a battery.

use appshot_device_model::geometry::{FrameGeometry, Point, Rect};
use tiny_skia::{Color, Pixmap};

use crate::raster::{fill_circle, fill_rect, fill_rounded_rect, rounded_rect_path, stroke_path};
use crate::text;
use crate::theme::Theme;

/// The clock always reads this; rendering never looks at a real clock.
pub const STATUS_BAR_TIME: &str = "10:30";

/// Indicator height relative to the bar height.
const GLYPH_SCALE: f64 = 0.36;

/// Clock font size relative to the bar height. DejaVu digits are about
/// 0.73 em tall, which lines them up with the indicators.
const CLOCK_FONT_SCALE: f64 = 0.5;

/// Bars too short for legible glyphs only get the translucent strip.
const MIN_GLYPH_HEIGHT: f64 = 3.0;

/// Horizontal distance of the outer glyphs from the screen edges.
const EDGE_INSET: f64 = 24.0;

const SIGNAL_DOTS: usize = 4;

/// Where each status bar element goes, derived from the bar rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBarLayout {
    pub bar: Rect,
    pub glyph_height: f64,
    pub clock_font_size: f32,
    pub signal_dots: Vec<(Point, f64)>,
    pub battery_body: Rect,
    pub battery_nub: Rect,
}

impl StatusBarLayout {
    /// Lay out the glyphs; `None` when the bar is too short for them.
    pub fn compute(bar: Rect) -> Option<Self> {
        let glyph_height = bar.h * GLYPH_SCALE;
        if bar.is_empty() || glyph_height < MIN_GLYPH_HEIGHT {
            return None;
        }

        let center_y = bar.y + bar.h / 2.0;
        let inset = EDGE_INSET.min(bar.w / 8.0);

        let dot_radius = glyph_height * 0.22;
        let dot_pitch = glyph_height * 0.6;
        let signal_dots = (0..SIGNAL_DOTS)
            .map(|i| {
                let x = bar.x + inset + dot_radius + i as f64 * dot_pitch;
                (Point::new(x, center_y), dot_radius)
            })
            .collect();

        let body_w = glyph_height * 1.9;
        let body_h = glyph_height * 0.9;
        let nub_w = (glyph_height * 0.12).max(1.0);
        let nub_h = body_h * 0.4;
        let body_x = bar.right() - inset - nub_w - body_w;
        let battery_body = Rect::new(body_x, center_y - body_h / 2.0, body_w, body_h);
        let battery_nub = Rect::new(battery_body.right(), center_y - nub_h / 2.0, nub_w, nub_h);

        Some(Self {
            bar,
            glyph_height,
            clock_font_size: (bar.h * CLOCK_FONT_SCALE) as f32,
            signal_dots,
            battery_body,
            battery_nub,
        })
    }

    /// Top-left pixel that centres clock ink of the given size in the bar.
    pub fn clock_origin(&self, ink_width: u32, ink_height: u32) -> (i32, i32) {
        let center = self.bar.center();
        (
            (center.x - f64::from(ink_width) / 2.0).round() as i32,
            (center.y - f64::from(ink_height) / 2.0).round() as i32,
        )
    }
}

/// Draw the status bar across the top of the screen.
///
/// Output depends only on the geometry and the theme.
pub fn render_status_bar(pixmap: &mut Pixmap, geometry: &FrameGeometry, theme: Theme) {
    let bar = geometry.status_bar;
    if bar.is_empty() {
        return;
    }

    let palette = theme.palette();
    fill_rect(pixmap, bar, palette.status_bar);

    let Some(layout) = StatusBarLayout::compute(bar) else {
        return;
    };
    let ink = palette.status_glyph;

    for (center, radius) in &layout.signal_dots {
        fill_circle(pixmap, *center, *radius, ink);
    }

    if let Some(clock) = text::rasterize(STATUS_BAR_TIME, layout.clock_font_size) {
        let (x, y) = layout.clock_origin(clock.width(), clock.height());
        clock.draw(pixmap, x, y, ink);
    }

    draw_battery(pixmap, &layout, ink);
}

fn draw_battery(pixmap: &mut Pixmap, layout: &StatusBarLayout, ink: Color) {
    let body = layout.battery_body;
    let line = (layout.glyph_height * 0.08).max(1.0);
    let corner = body.h * 0.2;

    if let Some(outline) = rounded_rect_path(body, corner) {
        stroke_path(pixmap, &outline, ink, line as f32);
    }

    let gap = line * 2.0;
    let level = Rect::new(
        body.x + gap,
        body.y + gap,
        body.w - 2.0 * gap,
        body.h - 2.0 * gap,
    );
    fill_rounded_rect(pixmap, level, corner / 2.0, ink);
    fill_rounded_rect(pixmap, layout.battery_nub, layout.battery_nub.w / 2.0, ink);
}
