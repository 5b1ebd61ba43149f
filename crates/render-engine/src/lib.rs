//! AppShot Render Engine
//!
//! Composites a user screenshot into a procedurally drawn device frame and
//! exports the result as PNG.
//!
//! # Pipeline
//!
//! ```text
//! SourceBitmap ──► RenderJobController ──submit──► sequence n
//!                        │
//!                        ├── decode (async, off-task)
//!                        │
//!                        ├── stale? ──► discard
//!                        ▼
//!                  ScreenCompositor
//!                   frame ─► screen ─► status bar ─► bottom bar
//!                         ─► bitmap ─► buttons
//!                        │
//!                        ▼
//!                  ComposedSurface ──► ExportEncoder ──► SaveSink
//!                        │
//!                        └──► ZoomOverlayController
//! ```

pub mod background;
pub mod bottom_bar;
pub mod buttons;
pub mod compositor;
pub mod decode;
pub mod export;
pub mod job;
mod raster;
pub mod status_bar;
pub mod surface;
pub mod text;
pub mod theme;
pub mod zoom;

pub use compositor::ScreenCompositor;
pub use decode::{
    BitmapDecoder, BitmapFormat, DecodeLease, DecodedBitmap, ImageDecoder, LeaseTracker,
    SourceBitmap, TargetSize,
};
pub use export::{DirectorySink, ExportArtifact, ExportEncoder, SaveSink};
pub use job::{
    ControllerState, JobOutcome, RenderInputs, RenderJobController, RenderObserver, RenderRequest,
};
pub use surface::ComposedSurface;
pub use theme::Theme;
pub use zoom::{Key, ZoomEvent, ZoomLayout, ZoomOverlayController, ZoomState};
