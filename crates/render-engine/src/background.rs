//! Device frame body: gradient fill with a drop shadow, then a border.

use appshot_common::error::{AppshotError, AppshotResult};
use appshot_device_model::geometry::FrameGeometry;
use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Mask, Paint, Path, Pixmap, SpreadMode,
    Transform,
};

use crate::raster::{outline_path, solid, stroke_path};
use crate::theme::Theme;

/// Width of the frame border stroke.
pub const FRAME_BORDER_WIDTH: f32 = 3.0;

/// Blur radius of the frame shadow.
pub const FRAME_SHADOW_BLUR: f32 = 15.0;

/// Offset of the frame shadow.
pub const FRAME_SHADOW_OFFSET: (f32, f32) = (0.0, 5.0);

/// A blurred, offset copy of a shape drawn underneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    /// Blur radius; the Gaussian sigma is half of it.
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub color: Color,
}

impl DropShadow {
    /// The frame shadow for a theme.
    pub fn frame(theme: Theme) -> Self {
        Self {
            blur: FRAME_SHADOW_BLUR,
            offset_x: FRAME_SHADOW_OFFSET.0,
            offset_y: FRAME_SHADOW_OFFSET.1,
            color: theme.palette().frame_shadow,
        }
    }
}

/// Draw the frame: shadowed gradient fill, then an unshadowed border.
///
/// The outline path is built once and shared by the shadow mask, the fill
/// and the stroke.
pub fn render_background(
    pixmap: &mut Pixmap,
    geometry: &FrameGeometry,
    theme: Theme,
) -> AppshotResult<()> {
    let palette = theme.palette();
    let path = outline_path(&geometry.outline)
        .ok_or_else(|| AppshotError::render("Device frame outline is degenerate"))?;

    let frame = geometry.frame;
    let gradient = LinearGradient::new(
        tiny_skia::Point::from_xy(0.0, frame.y as f32),
        tiny_skia::Point::from_xy(0.0, frame.bottom() as f32),
        vec![
            GradientStop::new(0.0, palette.frame_top),
            GradientStop::new(1.0, palette.frame_bottom),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| AppshotError::render("Failed to create frame gradient"))?;

    let mut fill = Paint::default();
    fill.shader = gradient;
    fill.anti_alias = true;

    fill_path_with_shadow(pixmap, &path, &fill, &DropShadow::frame(theme))?;
    stroke_path(pixmap, &path, palette.frame_border, FRAME_BORDER_WIDTH);
    Ok(())
}

/// Fill `path` with `paint`, drawing `shadow` underneath.
///
/// The shadow applies to this fill only; callers drawing afterwards never
/// see it.
pub fn fill_path_with_shadow(
    pixmap: &mut Pixmap,
    path: &Path,
    paint: &Paint,
    shadow: &DropShadow,
) -> AppshotResult<()> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut mask = Mask::new(width, height)
        .ok_or_else(|| AppshotError::render("Failed to allocate shadow mask"))?;
    mask.fill_path(
        path,
        FillRule::Winding,
        true,
        Transform::from_translate(shadow.offset_x, shadow.offset_y),
    );

    let radius = box_radius(shadow.blur);
    if radius > 0 {
        let bounds = path.bounds();
        let reach = (3 * radius + 2) as f32;
        let region = BlurRegion::clamped(
            bounds.left() + shadow.offset_x - reach,
            bounds.top() + shadow.offset_y - reach,
            bounds.right() + shadow.offset_x + reach,
            bounds.bottom() + shadow.offset_y + reach,
            width as usize,
            height as usize,
        );
        let stride = width as usize;
        let data = mask.data_mut();
        for _ in 0..3 {
            blur_rows(data, stride, region, radius);
            blur_columns(data, stride, region, radius);
        }
    }

    if let Some(full) = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
        pixmap.fill_rect(full, &solid(shadow.color), Transform::identity(), Some(&mask));
    }
    pixmap.fill_path(path, paint, FillRule::Winding, Transform::identity(), None);
    Ok(())
}

/// Box radius whose three-pass blur approximates a Gaussian of sigma `blur / 2`.
fn box_radius(blur: f32) -> usize {
    let sigma = f64::from(blur.max(0.0)) / 2.0;
    let ideal_width = (4.0 * sigma * sigma + 1.0).sqrt();
    ((ideal_width - 1.0) / 2.0).round() as usize
}

/// Pixel window the blur runs over; pixels outside it stay untouched and
/// are treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlurRegion {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl BlurRegion {
    fn clamped(left: f32, top: f32, right: f32, bottom: f32, width: usize, height: usize) -> Self {
        let clamp = |v: f32, max: usize| (v.max(0.0) as usize).min(max);
        Self {
            x0: clamp(left.floor(), width),
            y0: clamp(top.floor(), height),
            x1: clamp(right.ceil(), width),
            y1: clamp(bottom.ceil(), height),
        }
    }
}

/// One horizontal box-blur pass.
fn blur_rows(data: &mut [u8], stride: usize, region: BlurRegion, radius: usize) {
    let len = region.x1.saturating_sub(region.x0);
    if len == 0 {
        return;
    }
    let mut line = vec![0u8; len];
    for y in region.y0..region.y1 {
        let start = y * stride + region.x0;
        line.copy_from_slice(&data[start..start + len]);
        box_filter(&line, &mut data[start..start + len], radius);
    }
}

/// One vertical box-blur pass.
fn blur_columns(data: &mut [u8], stride: usize, region: BlurRegion, radius: usize) {
    let len = region.y1.saturating_sub(region.y0);
    if len == 0 {
        return;
    }
    let mut line = vec![0u8; len];
    let mut out = vec![0u8; len];
    for x in region.x0..region.x1 {
        for (i, v) in line.iter_mut().enumerate() {
            *v = data[(region.y0 + i) * stride + x];
        }
        box_filter(&line, &mut out, radius);
        for (i, v) in out.iter().enumerate() {
            data[(region.y0 + i) * stride + x] = *v;
        }
    }
}

/// Sliding-window mean of width `2 * radius + 1` with zero padding.
fn box_filter(input: &[u8], output: &mut [u8], radius: usize) {
    let window = (2 * radius + 1) as u32;
    let mut sum: u32 = input.iter().take(radius + 1).map(|v| u32::from(*v)).sum();

    for x in 0..input.len() {
        output[x] = ((sum + window / 2) / window) as u8;
        if let Some(v) = input.get(x + radius + 1) {
            sum += u32::from(*v);
        }
        if x >= radius {
            sum -= u32::from(input[x - radius]);
        }
    }
}
