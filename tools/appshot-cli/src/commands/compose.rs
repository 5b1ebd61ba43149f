//! Compose a screenshot into a device frame and export it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use appshot_common::clock::SystemClock;
use appshot_common::config::AppConfig;
use appshot_render_engine::{DirectorySink, ExportEncoder, RenderInputs, RenderJobController};

use super::upload;

pub struct ComposeArgs {
    pub input: PathBuf,
    pub device: Option<String>,
    /// `Some(true)` forces dark, `Some(false)` forces light, `None` uses the config.
    pub theme: Option<bool>,
    pub output: Option<PathBuf>,
    pub prefix: Option<String>,
    pub devices: Option<PathBuf>,
}

/// Map the `--dark`/`--light` flags to a theme override.
pub fn theme_override(dark: bool, light: bool) -> Option<bool> {
    match (dark, light) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

pub async fn run(args: ComposeArgs) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let registry = super::load_registry(args.devices.or(config.devices_file))?;

    let profile = match args.device {
        Some(id) => registry.require(&id)?,
        None => match registry.get(&config.preview.device_id) {
            Some(profile) => profile,
            None => registry
                .default_profile()
                .context("Device table is empty")?,
        },
    }
    .clone();

    let bitmap = upload::read_upload(&args.input)?;
    let dark_mode = args.theme.unwrap_or(config.preview.dark_mode);

    tracing::info!(
        input = %args.input.display(),
        device = %profile.id,
        dark_mode,
        bytes = bitmap.len(),
        "Composing screenshot"
    );

    let controller = RenderJobController::new();
    controller
        .render(RenderInputs::new(bitmap, profile, dark_mode))
        .await
        .with_context(|| format!("Failed to render {}", args.input.display()))?;

    let encoder = ExportEncoder::new(
        args.prefix.unwrap_or(config.export.file_prefix),
        Arc::new(SystemClock),
    );
    let sink = DirectorySink::new(args.output.unwrap_or(config.export.output_dir));
    let path = encoder.export(&controller, &sink)?;

    println!("{}", path.display());
    Ok(())
}
