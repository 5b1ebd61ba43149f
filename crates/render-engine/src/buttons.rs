//! Physical button marks on the frame edges.

use appshot_device_model::geometry::{FrameGeometry, Rect};
use tiny_skia::Pixmap;

use crate::raster::fill_rect;
use crate::theme::Theme;

pub const BUTTON_WIDTH: f64 = 4.0;
pub const BUTTON_HEIGHT: f64 = 30.0;

/// Distance of each mark from the top of the frame.
const POWER_OFFSET: f64 = 180.0;
const VOLUME_UP_OFFSET: f64 = 150.0;
const VOLUME_DOWN_OFFSET: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Power,
    VolumeUp,
    VolumeDown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonMark {
    pub kind: ButtonKind,
    pub rect: Rect,
}

/// Button marks placed flush outside the frame: power on the right,
/// volume on the left. Same positions for every device type.
pub fn button_marks(geometry: &FrameGeometry) -> [ButtonMark; 3] {
    let frame = geometry.frame;
    let left = frame.x - BUTTON_WIDTH;
    let right = frame.right();
    [
        ButtonMark {
            kind: ButtonKind::Power,
            rect: Rect::new(right, frame.y + POWER_OFFSET, BUTTON_WIDTH, BUTTON_HEIGHT),
        },
        ButtonMark {
            kind: ButtonKind::VolumeUp,
            rect: Rect::new(left, frame.y + VOLUME_UP_OFFSET, BUTTON_WIDTH, BUTTON_HEIGHT),
        },
        ButtonMark {
            kind: ButtonKind::VolumeDown,
            rect: Rect::new(left, frame.y + VOLUME_DOWN_OFFSET, BUTTON_WIDTH, BUTTON_HEIGHT),
        },
    ]
}

pub fn render_buttons(pixmap: &mut Pixmap, geometry: &FrameGeometry, theme: Theme) {
    let color = theme.palette().button;
    for mark in button_marks(geometry) {
        fill_rect(pixmap, mark.rect, color);
    }
}

#[cfg(test)]
mod tests {
    use appshot_device_model::profile::{DeviceProfile, DeviceType};

    use super::*;

    fn geometry(device_type: DeviceType) -> FrameGeometry {
        FrameGeometry::build(&DeviceProfile {
            id: "device".to_string(),
            name: "Device".to_string(),
            device_type,
            width: 300,
            height: 500,
            status_bar_height: 24,
            bottom_bar_height: 0,
            padding_top: 80,
            padding_left: 40,
        })
    }

    #[test]
    fn test_positions_relative_to_frame() {
        let geometry = geometry(DeviceType::Ios);
        let marks = button_marks(&geometry);

        assert_eq!(marks[0].kind, ButtonKind::Power);
        assert_eq!(marks[0].rect.x, geometry.frame.right());
        assert_eq!(marks[0].rect.y, geometry.frame.y + 180.0);

        for mark in &marks[1..] {
            assert_eq!(mark.rect.right(), geometry.frame.x);
            assert_eq!(mark.rect.w, 4.0);
            assert_eq!(mark.rect.h, 30.0);
        }
        assert!(marks[1].rect.bottom() < marks[2].rect.y);
    }

    #[test]
    fn test_independent_of_device_type() {
        assert_eq!(
            button_marks(&geometry(DeviceType::Ios)),
            button_marks(&geometry(DeviceType::Android))
        );
    }

    #[test]
    fn test_marks_are_opaque_theme_colour() {
        let geometry = geometry(DeviceType::Android);
        let mut pixmap = Pixmap::new(geometry.surface.width, geometry.surface.height).unwrap();
        render_buttons(&mut pixmap, &geometry, Theme::Light);

        let power = button_marks(&geometry)[0].rect;
        let px = pixmap
            .pixel(power.x as u32 + 1, power.y as u32 + 10)
            .unwrap()
            .demultiply();
        assert_eq!(px.alpha(), 255);
        assert_eq!(px.red(), 0xdd);
    }
}
