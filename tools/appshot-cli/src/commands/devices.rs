//! List device profiles.

use std::path::PathBuf;

use appshot_common::config::AppConfig;
use appshot_device_model::SurfaceSize;

pub fn run(devices: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let registry = super::load_registry(devices.or(config.devices_file))?;

    println!("{} device(s)", registry.len());
    println!("{}", "=".repeat(72));
    for profile in registry.iter() {
        let surface = SurfaceSize::for_profile(profile);
        let marker = if profile.id == config.preview.device_id { "*" } else { " " };
        println!(
            "{marker} {:<20} {:<24} {:<8} {}x{} -> {}x{}",
            profile.id,
            profile.name,
            profile.device_type.as_str(),
            profile.width,
            profile.height,
            surface.width,
            surface.height,
        );
    }

    Ok(())
}
