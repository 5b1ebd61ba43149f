//! Show or create the configuration file.

use anyhow::Context;
use appshot_common::config::{config_file_path, AppConfig};

pub fn run(init: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            let written = AppConfig::default()
                .save()
                .context("Failed to write default config")?;
            println!("Wrote default config to {}", written.display());
        }
        return Ok(());
    }

    let config = if path.exists() {
        println!("# {}", path.display());
        AppConfig::read(&path)?
    } else {
        println!("# {} does not exist, showing defaults", path.display());
        AppConfig::default()
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
