//! Thin drawing helpers over tiny-skia.
//!
//! Geometry stays in `f64` surface pixels until it reaches this module.

use appshot_device_model::geometry::{rounded_rect_outline, PathSegment, Point, Rect};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Control-point distance for approximating a quarter circle with a cubic.
const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Convert an outline into a tiny-skia path.
///
/// Returns `None` for degenerate outlines.
pub(crate) fn outline_path(segments: &[PathSegment]) -> Option<Path> {
    let mut builder = PathBuilder::new();
    let mut current: Option<Point> = None;

    for segment in segments {
        match *segment {
            PathSegment::MoveTo(p) => {
                builder.move_to(p.x as f32, p.y as f32);
                current = Some(p);
            }
            PathSegment::LineTo(p) => {
                builder.line_to(p.x as f32, p.y as f32);
                current = Some(p);
            }
            PathSegment::ArcTo { center, to, .. } => {
                let from = current?;
                let (c1, c2) = quarter_arc_controls(from, center, to);
                builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    to.x as f32,
                    to.y as f32,
                );
                current = Some(to);
            }
            PathSegment::Close => builder.close(),
        }
    }

    builder.finish()
}

/// Cubic control points of a clockwise quarter arc (y pointing down).
fn quarter_arc_controls(from: Point, center: Point, to: Point) -> (Point, Point) {
    // Clockwise tangent at p is (p - c) rotated by +90°: (x, y) -> (-y, x).
    let (fx, fy) = (from.x - center.x, from.y - center.y);
    let (tx, ty) = (to.x - center.x, to.y - center.y);
    (
        Point::new(from.x - KAPPA * fy, from.y + KAPPA * fx),
        Point::new(to.x + KAPPA * ty, to.y - KAPPA * tx),
    )
}

pub(crate) fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
}

pub(crate) fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

/// Round every edge of a rectangle to the nearest whole pixel.
pub(crate) fn snap_to_pixels(rect: Rect) -> Rect {
    let left = rect.x.round();
    let top = rect.y.round();
    Rect::new(
        left,
        top,
        (rect.right().round() - left).max(0.0),
        (rect.bottom().round() - top).max(0.0),
    )
}

/// Fill an axis-aligned rectangle snapped to whole pixels, without
/// anti-aliasing. Rectangles that snap to nothing draw nothing.
pub(crate) fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: Color) {
    let snapped = snap_to_pixels(rect);
    if snapped.is_empty() {
        return;
    }
    if let Some(rect) = skia_rect(snapped) {
        let mut paint = solid(color);
        paint.anti_alias = false;
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

pub(crate) fn fill_path(pixmap: &mut Pixmap, path: &Path, color: Color) {
    pixmap.fill_path(
        path,
        &solid(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

pub(crate) fn stroke_path(pixmap: &mut Pixmap, path: &Path, color: Color, width: f32) {
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &solid(color), &stroke, Transform::identity(), None);
}

pub(crate) fn rounded_rect_path(rect: Rect, radius: f64) -> Option<Path> {
    if rect.is_empty() {
        return None;
    }
    let radius = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
    outline_path(&rounded_rect_outline(rect, radius))
}

pub(crate) fn fill_rounded_rect(pixmap: &mut Pixmap, rect: Rect, radius: f64, color: Color) {
    if let Some(path) = rounded_rect_path(rect, radius) {
        fill_path(pixmap, &path, color);
    }
}

pub(crate) fn fill_circle(pixmap: &mut Pixmap, center: Point, radius: f64, color: Color) {
    if let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32) {
        fill_path(pixmap, &path, color);
    }
}
