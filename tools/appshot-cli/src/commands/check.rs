//! Validate a device table.

use std::path::PathBuf;

use appshot_device_model::DeviceRegistry;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Checking device table at: {}", path.display());

    let registry = DeviceRegistry::load(&path)
        .map_err(|e| anyhow::anyhow!("Device table is invalid: {e}"))?;

    for profile in registry.iter() {
        println!(
            "  [OK] {} ({}x{}, status {} / bottom {})",
            profile.id,
            profile.width,
            profile.height,
            profile.status_bar_height,
            profile.bottom_bar_height
        );
    }
    println!("\n{} device(s) valid.", registry.len());

    Ok(())
}
