//! PNG export of a completed composite.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use appshot_common::clock::{millis_to_rfc3339, SystemClock, WallClock};
use appshot_common::error::{AppshotError, AppshotResult};
use image::ImageFormat;

use crate::decode::BitmapDecoder;
use crate::job::RenderJobController;
use crate::surface::ComposedSurface;

/// Filename prefix used when none is configured.
pub const DEFAULT_FILE_PREFIX: &str = "AppShot";

/// An encoded composite ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// `<prefix>_<deviceId>_<unixMillis>.png`
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime(&self) -> &'static str {
        "image/png"
    }
}

/// External save action receiving the encoded bytes.
pub trait SaveSink {
    /// Persist the artifact and report where it went.
    fn save(&self, artifact: &ExportArtifact) -> AppshotResult<PathBuf>;
}

/// Writes artifacts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, artifact: &ExportArtifact) -> AppshotResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)?;
        Ok(path)
    }
}

/// Serialises composites to PNG and names them.
#[derive(Clone)]
pub struct ExportEncoder {
    prefix: String,
    clock: Arc<dyn WallClock>,
}

impl Default for ExportEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PREFIX, Arc::new(SystemClock))
    }
}

impl ExportEncoder {
    pub fn new(prefix: impl Into<String>, clock: Arc<dyn WallClock>) -> Self {
        Self {
            prefix: prefix.into(),
            clock,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn file_name(&self, device_id: &str) -> String {
        format!("{}_{}_{}.png", self.prefix, device_id, self.clock.unix_millis())
    }

    /// Encode a surface as PNG. The surface is only read.
    pub fn encode(&self, surface: &ComposedSurface, device_id: &str) -> AppshotResult<ExportArtifact> {
        let image = surface
            .to_rgba_image()
            .map_err(|e| AppshotError::export(e.to_string()))?;
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| AppshotError::export(format!("PNG encoding failed: {e}")))?;

        Ok(ExportArtifact {
            file_name: self.file_name(device_id),
            bytes,
        })
    }

    /// Encode the controller's completed surface and hand it to `sink`.
    ///
    /// The file name carries the id of the profile that produced the
    /// composite. Fails if nothing has been fully composited yet, including
    /// when the latest job stopped at a decode error.
    pub fn export<D: BitmapDecoder>(
        &self,
        controller: &RenderJobController<D>,
        sink: &dyn SaveSink,
    ) -> AppshotResult<PathBuf> {
        let missing = || AppshotError::export("No completed composite to export");
        let (artifact, device_id) = {
            let surface = controller.completed_surface().ok_or_else(missing)?;
            let profile = controller.committed_profile().ok_or_else(missing)?;
            (self.encode(&surface, &profile.id)?, profile.id)
        };

        let path = sink
            .save(&artifact)
            .map_err(|e| AppshotError::export(format!("Saving {} failed: {e}", artifact.file_name)))?;

        let at = millis_to_rfc3339(self.clock.unix_millis()).unwrap_or_default();
        tracing::info!(
            path = %path.display(),
            device = %device_id,
            bytes = artifact.bytes.len(),
            at = %at,
            "Exported composite"
        );
        Ok(path)
    }
}

impl std::fmt::Debug for ExportEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportEncoder")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
