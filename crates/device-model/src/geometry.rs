//! Device-frame geometry derived from a profile.
//!
//! All coordinates are surface pixels with the origin at the top-left and
//! `y` growing downwards.

use serde::{Deserialize, Serialize};

use crate::profile::DeviceProfile;

/// Corner radius of the device frame.
pub const FRAME_CORNER_RADIUS: f64 = 40.0;

/// How far the frame extends left and right of the screen.
pub const FRAME_SIDE_BEZEL: f64 = 20.0;

/// How far the frame extends above and below the screen.
pub const FRAME_VERTICAL_BEZEL: f64 = 40.0;

/// A 2D point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// Pixel size of the composed surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

/// Largest surface edge a profile may produce, in pixels.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

impl SurfaceSize {
    /// Surface size for a profile: the screen plus left/right margins, the
    /// top margin, and half the top margin again below the screen.
    ///
    /// Saturates on overflow; registration rejects such profiles through
    /// [`SurfaceSize::checked_for_profile`].
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self {
            width: profile
                .width
                .saturating_add(profile.padding_left.saturating_mul(2)),
            height: profile
                .height
                .saturating_add(profile.padding_top)
                .saturating_add(profile.padding_top / 2),
        }
    }

    /// Like [`SurfaceSize::for_profile`], but `None` when either edge
    /// overflows or exceeds [`MAX_SURFACE_DIMENSION`].
    pub fn checked_for_profile(profile: &DeviceProfile) -> Option<Self> {
        let width = profile
            .padding_left
            .checked_mul(2)
            .and_then(|margins| profile.width.checked_add(margins))?;
        let height = profile
            .height
            .checked_add(profile.padding_top)
            .and_then(|h| h.checked_add(profile.padding_top / 2))?;
        (width <= MAX_SURFACE_DIMENSION && height <= MAX_SURFACE_DIMENSION)
            .then_some(Self { width, height })
    }
}

/// One step of a closed outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Clockwise quarter arc around `center` from the current point to `to`.
    ArcTo {
        center: Point,
        radius: f64,
        to: Point,
    },
    Close,
}

/// Everything the renderers need to know about where things go.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    /// Size of the composed surface.
    pub surface: SurfaceSize,

    /// Outer frame rectangle.
    pub frame: Rect,

    /// Effective corner radius of the frame outline.
    pub corner_radius: f64,

    /// Rounded-rectangle outline of the frame.
    pub outline: Vec<PathSegment>,

    /// The screen area.
    pub screen: Rect,

    /// Status bar strip at the top of the screen.
    pub status_bar: Rect,

    /// Gesture bar strip at the bottom of the screen, if the device has one.
    pub bottom_bar: Option<Rect>,

    /// Where the user's bitmap is stretched into.
    pub content: Rect,
}

impl FrameGeometry {
    /// Compute the frame geometry of a (validated) profile.
    pub fn build(profile: &DeviceProfile) -> Self {
        let width = f64::from(profile.width);
        let height = f64::from(profile.height);
        let pad_left = f64::from(profile.padding_left);
        let pad_top = f64::from(profile.padding_top);
        let status = f64::from(profile.status_bar_height);
        let bottom = f64::from(profile.bottom_bar_height);

        let frame = Rect::new(
            pad_left - FRAME_SIDE_BEZEL,
            pad_top - FRAME_VERTICAL_BEZEL,
            width + 2.0 * FRAME_SIDE_BEZEL,
            height + 2.0 * FRAME_VERTICAL_BEZEL,
        );
        let corner_radius = FRAME_CORNER_RADIUS.min(frame.w / 2.0).min(frame.h / 2.0);
        let screen = Rect::new(pad_left, pad_top, width, height);

        let bottom_bar = (profile.bottom_bar_height > 0)
            .then(|| Rect::new(pad_left, pad_top + height - bottom, width, bottom));

        Self {
            surface: SurfaceSize::for_profile(profile),
            frame,
            corner_radius,
            outline: rounded_rect_outline(frame, corner_radius),
            screen,
            status_bar: Rect::new(pad_left, pad_top, width, status),
            bottom_bar,
            content: Rect::new(pad_left, pad_top + status, width, height - status - bottom),
        }
    }
}

/// Rounded rectangle as an ordered segment list, clockwise from the
/// top-left point just past the corner radius.
pub fn rounded_rect_outline(rect: Rect, radius: f64) -> Vec<PathSegment> {
    let (x, y, r) = (rect.x, rect.y, radius);
    let (right, bottom) = (rect.right(), rect.bottom());

    vec![
        PathSegment::MoveTo(Point::new(x + r, y)),
        PathSegment::LineTo(Point::new(right - r, y)),
        PathSegment::ArcTo {
            center: Point::new(right - r, y + r),
            radius: r,
            to: Point::new(right, y + r),
        },
        PathSegment::LineTo(Point::new(right, bottom - r)),
        PathSegment::ArcTo {
            center: Point::new(right - r, bottom - r),
            radius: r,
            to: Point::new(right - r, bottom),
        },
        PathSegment::LineTo(Point::new(x + r, bottom)),
        PathSegment::ArcTo {
            center: Point::new(x + r, bottom - r),
            radius: r,
            to: Point::new(x, bottom - r),
        },
        PathSegment::LineTo(Point::new(x, y + r)),
        PathSegment::ArcTo {
            center: Point::new(x + r, y + r),
            radius: r,
            to: Point::new(x + r, y),
        },
        PathSegment::Close,
    ]
}
