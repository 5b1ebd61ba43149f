//! Render job control: sequencing, staleness checks and the live surface.
//!
//! Every input change becomes a [`RenderRequest`] carrying a fresh sequence
//! number. The only suspension point of a job is the bitmap decode; when it
//! resolves, the job commits pixels only if its sequence is still the
//! latest one assigned. Superseded jobs drop their decode result and never
//! touch the surface.
//!
//! ```text
//! submit ─► Pending ──decode──► latest? ─yes─► Committing ─► Idle
//!                                  │
//!                                  └─no──► Discarded (silent)
//! ```
//!
//! The controller lives on one task. Overlapping jobs are futures polled by
//! that task (for example with `tokio::join!`), so interior state uses
//! `Cell`/`RefCell` and the type is deliberately `!Sync`.

use std::cell::{Cell, Ref, RefCell};

use appshot_common::error::{AppshotError, AppshotResult};
use appshot_device_model::geometry::FrameGeometry;
use appshot_device_model::profile::DeviceProfile;

use crate::compositor::ScreenCompositor;
use crate::decode::{BitmapDecoder, DecodedBitmap, ImageDecoder, LeaseTracker, SourceBitmap, TargetSize};
use crate::surface::ComposedSurface;
use crate::theme::Theme;

/// The user-visible inputs of one composite.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInputs {
    pub bitmap: SourceBitmap,
    pub profile: DeviceProfile,
    pub dark_mode: bool,
}

impl RenderInputs {
    pub fn new(bitmap: SourceBitmap, profile: DeviceProfile, dark_mode: bool) -> Self {
        Self {
            bitmap,
            profile,
            dark_mode,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_dark_mode(self.dark_mode)
    }
}

/// One submitted render job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub inputs: RenderInputs,
    pub sequence: u64,
}

/// Controller state as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Pending,
    Committing,
}

/// How a job ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job was current and its pixels are on the surface.
    Committed { sequence: u64 },
    /// A newer job was submitted before this one's decode resolved.
    Discarded { sequence: u64 },
}

impl JobOutcome {
    pub fn sequence(self) -> u64 {
        match self {
            Self::Committed { sequence } | Self::Discarded { sequence } => sequence,
        }
    }

    pub fn is_committed(self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Hooks for the preview UI. All methods default to no-ops.
pub trait RenderObserver {
    /// The rendering indicator turned on or off.
    fn rendering_changed(&self, _rendering: bool) {}

    /// A job committed a complete composite.
    fn surface_committed(&self, _surface: &ComposedSurface) {}

    /// The current job failed; the surface may hold a partial composite.
    fn render_failed(&self, _error: &AppshotError) {}
}

/// Owns the composed surface and decides which job may write to it.
pub struct RenderJobController<D = ImageDecoder> {
    decoder: D,
    leases: LeaseTracker,
    observer: Option<Box<dyn RenderObserver>>,
    latest_sequence: Cell<u64>,
    state: Cell<ControllerState>,
    rendering: Cell<bool>,
    composited: Cell<bool>,
    complete: Cell<bool>,
    surface: RefCell<Option<ComposedSurface>>,
    committed_profile: RefCell<Option<DeviceProfile>>,
}

impl RenderJobController<ImageDecoder> {
    pub fn new() -> Self {
        Self::with_decoder(ImageDecoder)
    }
}

impl Default for RenderJobController<ImageDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: BitmapDecoder> RenderJobController<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            leases: LeaseTracker::new(),
            observer: None,
            latest_sequence: Cell::new(0),
            state: Cell::new(ControllerState::Idle),
            rendering: Cell::new(false),
            composited: Cell::new(false),
            complete: Cell::new(false),
            surface: RefCell::new(None),
            committed_profile: RefCell::new(None),
        }
    }

    pub fn with_observer(mut self, observer: impl RenderObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Register an input change: assigns the next sequence number and
    /// marks the preview as rendering.
    pub fn submit(&self, inputs: RenderInputs) -> RenderRequest {
        let sequence = self.latest_sequence.get() + 1;
        self.latest_sequence.set(sequence);
        self.state.set(ControllerState::Pending);
        self.set_rendering(true);

        tracing::debug!(
            sequence,
            device = %inputs.profile.id,
            dark_mode = inputs.dark_mode,
            bytes = inputs.bitmap.len(),
            "Render job pending"
        );

        RenderRequest { inputs, sequence }
    }

    /// Decode the request's bitmap and, if the request is still the latest,
    /// draw the full composite.
    ///
    /// A decode failure on the current job leaves the frame and bars drawn
    /// and returns the decode error. Stale jobs end as
    /// [`JobOutcome::Discarded`] whatever their decode result.
    pub async fn run(&self, request: RenderRequest) -> AppshotResult<JobOutcome> {
        let RenderRequest { inputs, sequence } = request;
        let geometry = FrameGeometry::build(&inputs.profile);
        let target = TargetSize::for_content(geometry.content);

        let lease = self.leases.acquire();
        let decoded = self.decoder.decode(&inputs.bitmap, target).await;

        if sequence != self.latest_sequence.get() {
            drop(lease);
            tracing::debug!(
                sequence,
                latest = self.latest_sequence.get(),
                "Discarding stale render job"
            );
            return Ok(JobOutcome::Discarded { sequence });
        }

        self.state.set(ControllerState::Committing);
        let result = self.commit(&inputs, &geometry, decoded);
        drop(lease);
        self.state.set(ControllerState::Idle);
        self.set_rendering(false);

        match result {
            Ok(()) => {
                tracing::info!(
                    sequence,
                    device = %inputs.profile.id,
                    dark_mode = inputs.dark_mode,
                    width = geometry.surface.width,
                    height = geometry.surface.height,
                    "Committed composite"
                );
                if let Some(observer) = &self.observer {
                    if let Some(surface) = self.surface.borrow().as_ref() {
                        observer.surface_committed(surface);
                    }
                }
                Ok(JobOutcome::Committed { sequence })
            }
            Err(e) => {
                tracing::warn!(sequence, device = %inputs.profile.id, error = %e, "Render job failed");
                if let Some(observer) = &self.observer {
                    observer.render_failed(&e);
                }
                Err(e)
            }
        }
    }

    /// Submit and run in one step.
    pub async fn render(&self, inputs: RenderInputs) -> AppshotResult<JobOutcome> {
        let request = self.submit(inputs);
        self.run(request).await
    }

    /// Synchronous draw of a current job onto the live surface.
    fn commit(
        &self,
        inputs: &RenderInputs,
        geometry: &FrameGeometry,
        decoded: AppshotResult<DecodedBitmap>,
    ) -> AppshotResult<()> {
        let mut slot = self.surface.try_borrow_mut().map_err(|_| {
            AppshotError::render("Surface is still borrowed by a reader; commit refused")
        })?;
        self.complete.set(false);
        let compositor = ScreenCompositor::new(geometry, inputs.theme());

        let surface = match slot.take() {
            Some(surface) if surface.size() == geometry.surface => slot.insert(surface),
            _ => slot.insert(ComposedSurface::new(geometry.surface)?),
        };

        compositor.draw_chrome(surface)?;
        let bitmap = decoded?;
        if let Some(pixmap) = bitmap.as_pixmap() {
            compositor.draw_bitmap(surface, pixmap);
        }
        compositor.draw_buttons(surface);

        self.complete.set(true);
        self.composited.set(true);
        *self.committed_profile.borrow_mut() = Some(inputs.profile.clone());
        Ok(())
    }

    fn set_rendering(&self, rendering: bool) {
        if self.rendering.replace(rendering) != rendering {
            if let Some(observer) = &self.observer {
                observer.rendering_changed(rendering);
            }
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state.get()
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering.get()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.latest_sequence.get()
    }

    /// Whether a bitmap has been composited at least once.
    pub fn has_composited(&self) -> bool {
        self.composited.get()
    }

    /// The live surface, possibly a partial composite after a decode error.
    ///
    /// A job that reaches its commit while the returned guard is alive
    /// fails with a render error and leaves the surface untouched, so
    /// readers should not hold it across an await.
    pub fn surface(&self) -> Option<Ref<'_, ComposedSurface>> {
        Ref::filter_map(self.surface.borrow(), Option::as_ref).ok()
    }

    /// The surface, only if the most recent commit drew every layer.
    pub fn completed_surface(&self) -> Option<Ref<'_, ComposedSurface>> {
        if !self.complete.get() {
            return None;
        }
        self.surface()
    }

    /// Profile of the last complete composite.
    pub fn committed_profile(&self) -> Option<DeviceProfile> {
        self.committed_profile.borrow().clone()
    }

    pub fn leases(&self) -> &LeaseTracker {
        &self.leases
    }
}
