pub mod check;
pub mod config;
pub mod compose;
pub mod devices;
pub mod upload;

use std::path::PathBuf;

use anyhow::Context;
use appshot_device_model::DeviceRegistry;

/// The device table from `path`, or the built-in one.
pub fn load_registry(path: Option<PathBuf>) -> anyhow::Result<DeviceRegistry> {
    match path {
        Some(path) => DeviceRegistry::load(&path)
            .with_context(|| format!("Failed to load device table {}", path.display())),
        None => Ok(DeviceRegistry::builtin()),
    }
}
