//! End-to-end checks of the render pipeline: registry → controller →
//! compositor → export / zoom.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use appshot_common::clock::FixedClock;
use appshot_common::error::{AppshotError, AppshotResult};
use appshot_device_model::{DeviceError, DeviceProfile, DeviceRegistry, FrameGeometry};
use appshot_render_engine::decode::decode_blocking;
use appshot_render_engine::{
    BitmapDecoder, BitmapFormat, ComposedSurface, DecodedBitmap, ExportArtifact, ExportEncoder,
    JobOutcome, RenderInputs, RenderJobController, SaveSink, ScreenCompositor, SourceBitmap,
    TargetSize, Theme, ZoomEvent, ZoomOverlayController, ZoomState,
};
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::sync::oneshot;

fn png(width: u32, height: u32, color: [u8; 4]) -> SourceBitmap {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba(color))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    SourceBitmap::new(bytes, BitmapFormat::Png)
}

fn device(id: &str) -> DeviceProfile {
    DeviceRegistry::builtin().require(id).unwrap().clone()
}

/// Decoder whose calls each wait for a release signal, in call order.
struct GatedDecoder {
    gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

impl GatedDecoder {
    fn new(gates: Vec<oneshot::Receiver<()>>) -> Self {
        Self {
            gates: RefCell::new(gates.into()),
        }
    }
}

impl BitmapDecoder for GatedDecoder {
    async fn decode(&self, source: &SourceBitmap, target: TargetSize) -> AppshotResult<DecodedBitmap> {
        let gate = self.gates.borrow_mut().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        decode_blocking(source, target)
    }
}

#[derive(Default)]
struct MemorySink {
    saved: RefCell<Vec<ExportArtifact>>,
}

impl SaveSink for MemorySink {
    fn save(&self, artifact: &ExportArtifact) -> AppshotResult<PathBuf> {
        self.saved.borrow_mut().push(artifact.clone());
        Ok(PathBuf::from(&artifact.file_name))
    }
}

#[tokio::test]
async fn test_reference_device_surface_is_1234_by_2832() {
    let controller = RenderJobController::new();
    controller
        .render(RenderInputs::new(png(39, 81, [20, 40, 60, 255]), device("iphone-14"), false))
        .await
        .unwrap();

    let surface = controller.completed_surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (1234, 2832));
}

#[tokio::test]
async fn test_every_builtin_device_composes_in_both_themes() {
    let registry = DeviceRegistry::builtin();
    let bitmap = png(12, 24, [90, 160, 220, 255]);

    for profile in registry.iter() {
        for dark_mode in [false, true] {
            let controller = RenderJobController::new();
            let outcome = controller
                .render(RenderInputs::new(bitmap.clone(), profile.clone(), dark_mode))
                .await
                .unwrap_or_else(|e| panic!("{} (dark={dark_mode}) failed: {e}", profile.id));
            assert!(outcome.is_committed());

            let geometry = FrameGeometry::build(profile);
            let surface = controller.completed_surface().unwrap();
            assert_eq!(surface.size(), geometry.surface, "{}", profile.id);

            // The status bar strip is painted at its left edge.
            let bar = geometry.status_bar;
            let [_, _, _, alpha] = surface.pixel(bar.x as u32 + 1, bar.y as u32 + 1).unwrap();
            assert_eq!(alpha, 255, "{} status bar", profile.id);
        }
    }
}

#[tokio::test]
async fn test_rendering_same_inputs_twice_is_pixel_identical() {
    let inputs = RenderInputs::new(png(16, 16, [200, 10, 90, 255]), device("pixel-7"), true);

    let controller = RenderJobController::new();
    controller.render(inputs.clone()).await.unwrap();
    let first = controller.surface().unwrap().fingerprint();
    controller.render(inputs.clone()).await.unwrap();
    let second = controller.surface().unwrap().fingerprint();
    assert_eq!(first, second);

    let other = RenderJobController::new();
    other.render(inputs).await.unwrap();
    assert_eq!(other.surface().unwrap().fingerprint(), first);
}

#[tokio::test]
async fn test_themes_produce_different_composites() {
    let bitmap = png(8, 8, [0, 0, 0, 255]);
    let controller = RenderJobController::new();

    controller
        .render(RenderInputs::new(bitmap.clone(), device("ipad-air"), false))
        .await
        .unwrap();
    let light = controller.surface().unwrap().fingerprint();
    controller
        .render(RenderInputs::new(bitmap, device("ipad-air"), true))
        .await
        .unwrap();
    let dark = controller.surface().unwrap().fingerprint();
    assert_ne!(light, dark);
}

#[tokio::test]
async fn test_export_round_trip_keeps_dimensions() {
    let controller = RenderJobController::new();
    controller
        .render(RenderInputs::new(png(30, 60, [255, 255, 0, 255]), device("samsung-s23"), false))
        .await
        .unwrap();

    let encoder = ExportEncoder::new("AppShot", Arc::new(FixedClock::new(1_718_000_000_000)));
    let sink = MemorySink::default();
    encoder.export(&controller, &sink).unwrap();

    let saved = sink.saved.borrow();
    assert_eq!(saved[0].file_name, "AppShot_samsung-s23_1718000000000.png");
    let decoded = image::load_from_memory(&saved[0].bytes).unwrap();
    let surface = controller.completed_surface().unwrap();
    assert_eq!(
        (decoded.width(), decoded.height()),
        (surface.width(), surface.height())
    );
}

#[tokio::test]
async fn test_export_is_named_after_the_committed_device() {
    let controller = RenderJobController::new();
    let encoder = ExportEncoder::new("AppShot", Arc::new(FixedClock::new(1_718_000_000_000)));
    let sink = MemorySink::default();

    controller
        .render(RenderInputs::new(png(4, 4, [1, 1, 1, 255]), device("iphone-8"), false))
        .await
        .unwrap();
    encoder.export(&controller, &sink).unwrap();

    controller
        .render(RenderInputs::new(png(4, 4, [1, 1, 1, 255]), device("pixel-7"), false))
        .await
        .unwrap();
    encoder.export(&controller, &sink).unwrap();

    // A failed job keeps neither its profile nor its pixels for export.
    let broken = SourceBitmap::new(b"not a jpeg".to_vec(), BitmapFormat::Jpeg);
    controller
        .render(RenderInputs::new(broken, device("ipad-pro"), false))
        .await
        .unwrap_err();
    assert!(encoder.export(&controller, &sink).is_err());

    let names: Vec<String> = sink
        .saved
        .borrow()
        .iter()
        .map(|a| a.file_name.clone())
        .collect();
    assert_eq!(
        names,
        vec![
            "AppShot_iphone-8_1718000000000.png",
            "AppShot_pixel-7_1718000000000.png",
        ]
    );
}

#[tokio::test]
async fn test_reader_holding_surface_during_commit_gets_an_error() {
    let (release_first, gate_first) = oneshot::channel();
    let (release_second, gate_second) = oneshot::channel();
    let controller =
        RenderJobController::with_decoder(GatedDecoder::new(vec![gate_first, gate_second]));

    release_first.send(()).unwrap();
    controller
        .render(RenderInputs::new(png(4, 4, [255, 0, 0, 255]), device("pixel-7"), false))
        .await
        .unwrap();
    let before = controller.surface().unwrap().fingerprint();

    let second = controller.submit(RenderInputs::new(
        png(4, 4, [0, 255, 0, 255]),
        device("pixel-7"),
        true,
    ));
    let (outcome, ()) = tokio::join!(controller.run(second), async {
        let reader = controller.completed_surface().unwrap();
        release_second.send(()).unwrap();
        // The job resolves and reaches its commit while the reader is alive.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(reader.fingerprint(), before);
    });

    let err = outcome.unwrap_err();
    assert!(matches!(err, AppshotError::Render { .. }));
    assert!(!controller.is_rendering());
    assert_eq!(controller.leases().outstanding(), 0);
    assert_eq!(controller.completed_surface().unwrap().fingerprint(), before);
}

#[tokio::test]
async fn test_superseded_job_never_writes_pixels() {
    let (release_a, gate_a) = oneshot::channel();
    let (release_b, gate_b) = oneshot::channel();
    let controller = RenderJobController::with_decoder(GatedDecoder::new(vec![gate_a, gate_b]));

    let job_a = controller.submit(RenderInputs::new(
        png(10, 10, [255, 0, 0, 255]),
        device("iphone-8"),
        false,
    ));
    let job_b = controller.submit(RenderInputs::new(
        png(10, 10, [0, 0, 255, 255]),
        device("pixel-7"),
        true,
    ));

    let (outcome_a, outcome_b, ()) = tokio::join!(controller.run(job_a), controller.run(job_b), async {
        tokio::task::yield_now().await;
        // Both decodes are in flight and nothing has been drawn.
        assert_eq!(controller.leases().outstanding(), 2);
        assert!(controller.surface().is_none());
        assert!(controller.is_rendering());

        // A resolves first but is already stale.
        release_a.send(()).unwrap();
        tokio::task::yield_now().await;
        release_b.send(()).unwrap();
    });

    assert_eq!(outcome_a.unwrap(), JobOutcome::Discarded { sequence: 1 });
    assert_eq!(outcome_b.unwrap(), JobOutcome::Committed { sequence: 2 });
    assert_eq!(controller.leases().outstanding(), 0);
    assert!(!controller.is_rendering());

    let expected = RenderJobController::new();
    expected
        .render(RenderInputs::new(png(10, 10, [0, 0, 255, 255]), device("pixel-7"), true))
        .await
        .unwrap();
    assert_eq!(
        controller.surface().unwrap().fingerprint(),
        expected.surface().unwrap().fingerprint()
    );
}

#[tokio::test]
async fn test_stale_job_resolving_after_commit_is_discarded() {
    let (release_a, gate_a) = oneshot::channel();
    let controller = RenderJobController::with_decoder(GatedDecoder::new(vec![gate_a]));

    let job_a = controller.submit(RenderInputs::new(
        png(4, 4, [255, 0, 0, 255]),
        device("ipad-pro"),
        false,
    ));

    let (outcome_a, ()) = tokio::join!(controller.run(job_a), async {
        tokio::task::yield_now().await;
        let committed = controller
            .render(RenderInputs::new(png(4, 4, [0, 255, 0, 255]), device("iphone-8"), false))
            .await
            .unwrap();
        assert!(committed.is_committed());
        release_a.send(()).unwrap();
    });

    assert_eq!(outcome_a.unwrap(), JobOutcome::Discarded { sequence: 1 });
    let surface = controller.surface().unwrap();
    assert_eq!((surface.width(), surface.height()), (814, 1634));
}

#[tokio::test]
async fn test_decode_failure_keeps_chrome_only() {
    let profile = device("pixel-7-pro");
    let controller = RenderJobController::new();
    let broken = SourceBitmap::new(b"GIF89a-truncated".to_vec(), BitmapFormat::Gif);

    let err = controller
        .render(RenderInputs::new(broken, profile.clone(), true))
        .await
        .unwrap_err();
    assert!(matches!(err, AppshotError::Decode { .. }));
    assert!(err.is_recoverable());
    assert!(controller.completed_surface().is_none());
    assert!(!controller.has_composited());
    assert_eq!(controller.leases().outstanding(), 0);

    let geometry = FrameGeometry::build(&profile);
    let mut chrome = ComposedSurface::new(geometry.surface).unwrap();
    ScreenCompositor::new(&geometry, Theme::Dark)
        .draw_chrome(&mut chrome)
        .unwrap();
    assert_eq!(controller.surface().unwrap().fingerprint(), chrome.fingerprint());

    // A later valid request recovers.
    controller
        .render(RenderInputs::new(png(2, 2, [1, 2, 3, 255]), profile, true))
        .await
        .unwrap();
    assert!(controller.completed_surface().is_some());
}

#[tokio::test]
async fn test_zoom_requires_a_composite() {
    let controller = RenderJobController::new();
    let mut zoom = ZoomOverlayController::new();

    assert_eq!(
        zoom.handle(ZoomEvent::Activate, controller.has_composited()),
        ZoomState::Collapsed
    );

    controller
        .render(RenderInputs::new(png(5, 5, [9, 9, 9, 255]), device("iphone-8"), false))
        .await
        .unwrap();
    assert_eq!(
        zoom.handle(ZoomEvent::Activate, controller.has_composited()),
        ZoomState::Zoomed
    );

    let surface = controller.surface().unwrap();
    let view = zoom
        .render(&surface, appshot_device_model::SurfaceSize { width: 800, height: 600 })
        .unwrap()
        .unwrap();
    assert_eq!((view.width(), view.height()), (800, 600));

    assert_eq!(zoom.handle(ZoomEvent::BackdropClick, true), ZoomState::Collapsed);
}

#[test]
fn test_invalid_profile_is_rejected_at_registration() {
    let mut registry = DeviceRegistry::builtin();
    let mut broken = device("iphone-14");
    broken.id = "iphone-broken".to_string();
    broken.status_bar_height = 2500;
    broken.bottom_bar_height = 100;

    let err = registry.register(broken).unwrap_err();
    assert!(matches!(err, DeviceError::InvalidProfile { .. }));
    assert!(registry.get("iphone-broken").is_none());
}

#[test]
fn test_oversized_profile_is_rejected_at_registration() {
    let mut registry = DeviceRegistry::builtin();

    let mut wide = device("iphone-14");
    wide.id = "wide".to_string();
    wide.width = u32::MAX - 10;
    wide.padding_left = 100;
    assert!(matches!(
        registry.register(wide),
        Err(DeviceError::InvalidProfile { .. })
    ));

    let mut huge = device("ipad-pro");
    huge.id = "huge".to_string();
    huge.width = 40_000;
    assert!(matches!(
        registry.register(huge),
        Err(DeviceError::InvalidProfile { .. })
    ));
    assert_eq!(registry.len(), 9);
}
