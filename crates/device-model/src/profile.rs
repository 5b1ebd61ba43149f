//! Device profile types.
//!
//! A profile describes the screenshot canvas of one device: the pixel size
//! of the screen content, the OS chrome heights at top and bottom, and the
//! margins the frame is drawn into.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use appshot_common::error::AppshotError;

use crate::geometry::{SurfaceSize, MAX_SURFACE_DIMENSION};

/// Operating system family of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Ios,
    Android,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

/// Static geometry description of one device's screenshot canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    /// Unique identifier (e.g. `"iphone-14"`).
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// OS family.
    #[serde(rename = "type")]
    pub device_type: DeviceType,

    /// Screenshot content width in pixels.
    pub width: u32,

    /// Screenshot content height in pixels.
    pub height: u32,

    /// Height of the status bar overlay at the top of the screen.
    pub status_bar_height: u32,

    /// Height of the gesture bar overlay at the bottom of the screen (0 = none).
    pub bottom_bar_height: u32,

    /// Margin above the screen.
    pub padding_top: u32,

    /// Margin left (and right) of the screen.
    pub padding_left: u32,
}

impl DeviceProfile {
    /// Check the profile invariants.
    pub fn validate(&self) -> Result<(), DeviceError> {
        let invalid = |message: String| DeviceError::InvalidProfile {
            id: self.id.clone(),
            message,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "content size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let bars = u64::from(self.status_bar_height) + u64::from(self.bottom_bar_height);
        if bars > u64::from(self.height) {
            return Err(invalid(format!(
                "status bar ({}) + bottom bar ({}) exceed height ({})",
                self.status_bar_height, self.bottom_bar_height, self.height
            )));
        }
        if SurfaceSize::checked_for_profile(self).is_none() {
            return Err(invalid(format!(
                "surface for {}x{} content with padding {}/{} exceeds {MAX_SURFACE_DIMENSION}px",
                self.width, self.height, self.padding_left, self.padding_top
            )));
        }
        Ok(())
    }

    /// Whether the device draws a gesture bar.
    pub fn has_bottom_bar(&self) -> bool {
        self.bottom_bar_height > 0
    }

    /// Height left for the user's screenshot between the two bars.
    pub fn content_height(&self) -> u32 {
        self.height
            .saturating_sub(self.status_bar_height)
            .saturating_sub(self.bottom_bar_height)
    }
}

/// Errors that can occur when building or querying the device table.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Invalid device profile '{id}': {message}")]
    InvalidProfile { id: String, message: String },

    #[error("Duplicate device id '{id}'")]
    DuplicateId { id: String },

    #[error("Unknown device '{id}'")]
    UnknownDevice { id: String },

    #[error("Failed to parse device table: {source}")]
    Parse { source: serde_json::Error },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<DeviceError> for AppshotError {
    fn from(err: DeviceError) -> Self {
        AppshotError::device(err.to_string())
    }
}
