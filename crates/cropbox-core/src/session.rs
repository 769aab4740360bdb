use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CropboxConfig;
use crate::error::{CropboxError, Result};
use crate::events::{CropEvent, EventSink, NullSink, Payload};
use crate::export::CropResult;
use crate::render::rasterize;
use crate::source::SourceImage;
use crate::transform::{slider_to_ratio, BoundsPolicy, Transform};
use crate::viewport::{AspectRatio, Viewport};

/// One editing session tied to one viewport.
///
/// Owns the source image, the pan/zoom transform, and the last committed
/// crop result. All operations are synchronous; the session has a single
/// owner and no interior mutability.
pub struct CropSession {
    config: CropboxConfig,
    viewport: Viewport,
    source: Option<SourceImage>,
    transform: Option<Transform>,
    committed: Option<CropResult>,
    sink: Arc<dyn EventSink>,
}

impl CropSession {
    pub fn new(config: CropboxConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(NullSink))
    }

    pub fn with_sink(config: CropboxConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let viewport = config.viewport()?;
        Ok(Self {
            config,
            viewport,
            source: None,
            transform: None,
            committed: None,
            sink,
        })
    }

    /// Decode image bytes and start a fresh edit: zoom ratio 1, image
    /// centered in the viewport. On decode failure the previous state is
    /// left untouched.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<()> {
        let source = SourceImage::decode(bytes)?;
        self.load_decoded(source);
        Ok(())
    }

    /// Start a fresh edit from an image decoded elsewhere (e.g. on a
    /// worker thread).
    pub fn load_decoded(&mut self, source: SourceImage) {
        info!(
            width = source.width(),
            height = source.height(),
            format = ?source.format(),
            "image loaded"
        );

        self.transform = Some(Transform::centered(
            source.width(),
            source.height(),
            self.viewport,
        ));
        self.sink.on_event(CropEvent::FileSelected {
            payloads: vec![
                Payload::Base64(source.data_url()),
                Payload::Blob(source.raw_bytes().to_vec()),
            ],
        });
        self.source = Some(source);
    }

    /// Set zoom from a slider value in the [-20, 20] domain.
    pub fn set_zoom_slider(&mut self, value: f64) -> Result<()> {
        let ratio = self.config.zoom.clamp(slider_to_ratio(value));
        self.set_zoom_ratio(ratio)
    }

    /// Set the zoom ratio directly, anchored on the viewport's visual
    /// center.
    pub fn set_zoom_ratio(&mut self, ratio: f64) -> Result<()> {
        let viewport = self.viewport;
        let ratio = self.config.zoom.clamp(ratio);
        let transform = self.transform.as_mut().ok_or(CropboxError::NoImage)?;
        transform.set_ratio(ratio, viewport);
        self.apply_bounds();
        Ok(())
    }

    /// Add a drag delta to the pan offset.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<()> {
        let transform = self.transform.as_mut().ok_or(CropboxError::NoImage)?;
        transform.pan(dx, dy);
        self.apply_bounds();
        Ok(())
    }

    /// Accumulate a rotation delta, in degrees.
    #[cfg(feature = "rotate")]
    pub fn rotate(&mut self, delta_degrees: f64) -> Result<()> {
        let transform = self.transform.as_mut().ok_or(CropboxError::NoImage)?;
        transform.rotate(delta_degrees);
        Ok(())
    }

    /// Switch between unconstrained and clamped panning.
    pub fn set_bounds_policy(&mut self, policy: BoundsPolicy) {
        self.config.bounds = policy;
        self.apply_bounds();
    }

    /// Replace the crop window's aspect ratio, refitting the viewport.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) -> Result<()> {
        self.config.aspect_ratio = aspect;
        self.viewport = self.config.viewport()?;
        self.apply_bounds();
        Ok(())
    }

    /// Rasterize the current viewport view, commit it as the session's
    /// crop result, and emit *crop-saved*.
    pub fn crop(&mut self) -> Result<CropResult> {
        let source = self.source.as_ref().ok_or(CropboxError::NoImage)?;
        let transform = self.transform.as_ref().ok_or(CropboxError::NoImage)?;

        let bitmap = rasterize(source.pixels(), self.viewport, transform);
        let result = CropResult::from_bitmap(&bitmap)?;
        debug!(
            width = result.width(),
            height = result.height(),
            bytes = result.png_bytes().len(),
            "crop exported"
        );

        self.sink.on_event(CropEvent::CropSaved {
            payloads: vec![
                Payload::Base64(result.data_url().to_string()),
                Payload::Blob(result.png_bytes().to_vec()),
            ],
        });
        self.committed = Some(result.clone());
        Ok(result)
    }

    /// Abandon the current edit without saving and emit *crop-canceled*.
    pub fn cancel(&mut self) {
        self.discard_edit();
        self.sink.on_event(CropEvent::CropCanceled { canceled: true });
    }

    /// Dismiss the edit surface and emit *editor-closed*.
    pub fn close(&mut self) {
        self.discard_edit();
        self.sink.on_event(CropEvent::EditorClosed { closed: true });
    }

    /// Clear the committed crop result.
    pub fn remove_result(&mut self) {
        self.committed = None;
    }

    /// Return to the pre-edit baseline: no image, no transform. The last
    /// committed result is kept.
    pub fn reset(&mut self) {
        self.discard_edit();
    }

    fn discard_edit(&mut self) {
        self.source = None;
        self.transform = None;
    }

    fn apply_bounds(&mut self) {
        if self.config.bounds != BoundsPolicy::Clamp {
            return;
        }
        if let (Some(source), Some(transform)) = (&self.source, &mut self.transform) {
            transform.clamp_offset(source.width(), source.height(), self.viewport);
        }
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn committed(&self) -> Option<&CropResult> {
        self.committed.as_ref()
    }

    pub fn config(&self) -> &CropboxConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;
    use crate::config::StageConfig;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([90, 120, 150, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// Config whose viewport fits to exactly 200x200.
    fn square_config() -> CropboxConfig {
        CropboxConfig {
            stage: StageConfig {
                width: 220.0,
                height: 220.0,
                padding: 20.0,
            },
            ..CropboxConfig::default()
        }
    }

    struct RecordingSink(Mutex<Vec<CropEvent>>);

    impl EventSink for RecordingSink {
        fn on_event(&self, event: CropEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_crop_before_load_fails() {
        let mut session = CropSession::new(square_config()).unwrap();
        assert!(matches!(session.crop(), Err(CropboxError::NoImage)));
        assert!(session.committed().is_none());
    }

    #[test]
    fn test_zoom_and_pan_before_load_fail() {
        let mut session = CropSession::new(square_config()).unwrap();
        assert!(matches!(
            session.set_zoom_slider(5.0),
            Err(CropboxError::NoImage)
        ));
        assert!(matches!(session.pan(1.0, 1.0), Err(CropboxError::NoImage)));
    }

    #[test]
    fn test_scenario_400x300_into_200x200() {
        let mut session = CropSession::new(square_config()).unwrap();
        assert_eq!(session.viewport(), Viewport::new(200, 200).unwrap());

        session.load_image(&png_bytes(400, 300)).unwrap();
        let t = session.transform().unwrap();
        assert!((t.ratio - 1.0).abs() < 1e-12);
        assert!((t.offset_x - (-100.0)).abs() < 1e-12);
        assert!((t.offset_y - (-50.0)).abs() < 1e-12);

        let result = session.crop().unwrap();
        assert_eq!((result.width(), result.height()), (200, 200));
    }

    #[test]
    fn test_load_resets_prior_session_state() {
        let mut session = CropSession::new(square_config()).unwrap();
        session.load_image(&png_bytes(400, 300)).unwrap();
        session.set_zoom_ratio(2.0).unwrap();
        session.pan(33.0, -11.0).unwrap();

        session.load_image(&png_bytes(400, 300)).unwrap();
        let t = session.transform().unwrap();
        assert!((t.ratio - 1.0).abs() < 1e-12);
        assert!((t.offset_x - (-100.0)).abs() < 1e-12);
        assert!((t.offset_y - (-50.0)).abs() < 1e-12);
    }

    #[test]
    fn test_decode_failure_leaves_state_untouched() {
        let mut session = CropSession::new(square_config()).unwrap();
        session.load_image(&png_bytes(400, 300)).unwrap();
        session.pan(10.0, 10.0).unwrap();
        let before = *session.transform().unwrap();

        assert!(session.load_image(b"definitely not an image").is_err());
        assert!(session.has_image());
        assert_eq!(*session.transform().unwrap(), before);
    }

    #[test]
    fn test_crop_idempotent_without_transform_change() {
        let mut session = CropSession::new(square_config()).unwrap();
        session.load_image(&png_bytes(400, 300)).unwrap();
        let a = session.crop().unwrap();
        let b = session.crop().unwrap();
        assert_eq!(a.png_bytes(), b.png_bytes());
        assert_eq!(a.data_url(), b.data_url());
    }

    #[test]
    fn test_slider_full_range_maps_to_ratio() {
        let mut session = CropSession::new(square_config()).unwrap();
        session.load_image(&png_bytes(400, 300)).unwrap();
        session.set_zoom_slider(20.0).unwrap();
        assert!((session.transform().unwrap().ratio - 2.0).abs() < 1e-12);
        session.set_zoom_slider(-20.0).unwrap();
        assert!(session.transform().unwrap().ratio > 0.0);
    }

    #[test]
    fn test_clamp_policy_constrains_pan() {
        let config = CropboxConfig {
            bounds: BoundsPolicy::Clamp,
            ..square_config()
        };
        let mut session = CropSession::new(config).unwrap();
        session.load_image(&png_bytes(400, 300)).unwrap();
        session.pan(5_000.0, 5_000.0).unwrap();
        let t = session.transform().unwrap();
        assert!((t.offset_x - 0.0).abs() < 1e-12);
        assert!((t.offset_y - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_events_fire_with_labeled_payloads() {
        let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
        let mut session = CropSession::with_sink(square_config(), sink.clone()).unwrap();

        session.load_image(&png_bytes(400, 300)).unwrap();
        session.crop().unwrap();
        session.cancel();
        session.close();

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 4);
        match &events[0] {
            CropEvent::FileSelected { payloads } => {
                let labels: Vec<_> = payloads.iter().map(|p| p.label()).collect();
                assert_eq!(labels, ["base64", "blob"]);
            }
            other => panic!("expected FileSelected, got {other:?}"),
        }
        match &events[1] {
            CropEvent::CropSaved { payloads } => {
                let labels: Vec<_> = payloads.iter().map(|p| p.label()).collect();
                assert_eq!(labels, ["base64", "blob"]);
            }
            other => panic!("expected CropSaved, got {other:?}"),
        }
        assert_eq!(events[2], CropEvent::CropCanceled { canceled: true });
        assert_eq!(events[3], CropEvent::EditorClosed { closed: true });
    }

    #[test]
    fn test_cancel_discards_edit_keeps_committed() {
        let mut session = CropSession::new(square_config()).unwrap();
        session.load_image(&png_bytes(400, 300)).unwrap();
        session.crop().unwrap();
        session.cancel();
        assert!(!session.has_image());
        assert!(session.committed().is_some());

        session.remove_result();
        assert!(session.committed().is_none());
    }
}
