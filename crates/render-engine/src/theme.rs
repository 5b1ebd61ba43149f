//! Light and dark frame themes.

use tiny_skia::Color;

/// Frame theme, selected by the external dark-mode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Colours used by every renderer for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                frame_top: rgb(0x33, 0x33, 0x33),
                frame_bottom: rgb(0x22, 0x22, 0x22),
                frame_shadow: rgba(0, 0, 0, 0.5),
                frame_border: rgb(0x44, 0x44, 0x44),
                screen: rgb(0x11, 0x11, 0x11),
                status_bar: rgba(0, 0, 0, 0.85),
                status_glyph: rgb(0xff, 0xff, 0xff),
                bottom_bar: rgba(45, 45, 45, 0.8),
                home_indicator: rgba(160, 160, 160, 0.8),
                button: rgb(0x33, 0x33, 0x33),
            },
            Self::Light => Palette {
                frame_top: rgb(0xf8, 0xf8, 0xf8),
                frame_bottom: rgb(0xe8, 0xe8, 0xe8),
                frame_shadow: rgba(0, 0, 0, 0.2),
                frame_border: rgb(0xdd, 0xdd, 0xdd),
                screen: rgb(0xff, 0xff, 0xff),
                status_bar: rgba(255, 255, 255, 0.9),
                status_glyph: rgb(0, 0, 0),
                bottom_bar: rgba(245, 245, 245, 0.8),
                home_indicator: rgba(180, 180, 180, 0.8),
                button: rgb(0xdd, 0xdd, 0xdd),
            },
        }
    }
}

/// Theme-dependent colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Frame gradient, top stop.
    pub frame_top: Color,
    /// Frame gradient, bottom stop.
    pub frame_bottom: Color,
    pub frame_shadow: Color,
    pub frame_border: Color,
    pub screen: Color,
    pub status_bar: Color,
    pub status_glyph: Color,
    pub bottom_bar: Color,
    pub home_indicator: Color,
    pub button: Color,
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Color {
    let mut color = rgb(r, g, b);
    color.set_alpha(alpha);
    color
}
