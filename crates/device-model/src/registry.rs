//! The ordered table of device profiles.

use std::path::Path;

use crate::profile::{DeviceError, DeviceProfile, DeviceType};

/// Validated, insertion-ordered collection of device profiles keyed by id.
///
/// Profiles never change after registration. An invalid profile is a
/// configuration defect and is rejected here, never at render time.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    profiles: Vec<DeviceProfile>,
}

impl DeviceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference device table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for profile in builtin_profiles() {
            // The built-in table is covered by tests; a failure here is a
            // programming error in the literals below.
            if let Err(e) = registry.register(profile) {
                tracing::error!(error = %e, "Built-in device profile rejected");
            }
        }
        registry
    }

    /// Parse an ordered JSON array of profiles.
    ///
    /// Fails on the first invalid or duplicate profile.
    pub fn from_json(content: &str) -> Result<Self, DeviceError> {
        let profiles: Vec<DeviceProfile> =
            serde_json::from_str(content).map_err(|source| DeviceError::Parse { source })?;
        let mut registry = Self::new();
        for profile in profiles {
            registry.register(profile)?;
        }
        Ok(registry)
    }

    /// Load a JSON device table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DeviceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), devices = registry.len(), "Loaded device table");
        Ok(registry)
    }

    /// Validate and append a profile.
    pub fn register(&mut self, profile: DeviceProfile) -> Result<(), DeviceError> {
        profile.validate()?;
        if self.get(&profile.id).is_some() {
            return Err(DeviceError::DuplicateId { id: profile.id });
        }
        tracing::debug!(id = %profile.id, "Registered device profile");
        self.profiles.push(profile);
        Ok(())
    }

    /// Look up a profile by id.
    pub fn get(&self, id: &str) -> Option<&DeviceProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Look up a profile by id, failing with [`DeviceError::UnknownDevice`].
    pub fn require(&self, id: &str) -> Result<&DeviceProfile, DeviceError> {
        self.get(id).ok_or_else(|| DeviceError::UnknownDevice { id: id.to_string() })
    }

    /// First registered profile, the default selection.
    pub fn default_profile(&self) -> Option<&DeviceProfile> {
        self.profiles.first()
    }

    /// Profiles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    name: &str,
    device_type: DeviceType,
    width: u32,
    height: u32,
    status_bar_height: u32,
    bottom_bar_height: u32,
    padding_top: u32,
    padding_left: u32,
) -> DeviceProfile {
    DeviceProfile {
        id: id.to_string(),
        name: name.to_string(),
        device_type,
        width,
        height,
        status_bar_height,
        bottom_bar_height,
        padding_top,
        padding_left,
    }
}

fn builtin_profiles() -> Vec<DeviceProfile> {
    use DeviceType::{Android, Ios};

    vec![
        profile("iphone-14", "iPhone 14/15 (6.1\")", Ios, 1170, 2532, 47, 34, 200, 32),
        profile("iphone-15-pro", "iPhone 15 Pro (6.1\")", Ios, 1179, 2556, 47, 34, 200, 32),
        profile("iphone-15-pro-max", "iPhone 15 Pro Max", Ios, 1290, 2796, 47, 34, 200, 32),
        profile("ipad-pro", "iPad Pro 12.9\"", Ios, 2048, 2732, 24, 0, 120, 62),
        profile("ipad-air", "iPad Air 10.9\"", Ios, 1640, 2360, 24, 0, 120, 62),
        profile("pixel-7", "Google Pixel 7", Android, 1080, 2400, 40, 42, 200, 32),
        profile("pixel-7-pro", "Google Pixel 7 Pro", Android, 1440, 3120, 40, 42, 200, 32),
        profile("samsung-s23", "Samsung Galaxy S23", Android, 1080, 2340, 40, 42, 200, 32),
        profile("iphone-8", "iPhone 8 (legacy)", Ios, 750, 1334, 20, 0, 200, 32),
    ]
}
