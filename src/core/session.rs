// Practice session
// Everything that lives while the practice page is open: the keypoint cell,
// the camera bridge feeding it, the relay mirroring it to the classifier and
// the consent dialog state. Leaving the page drops the session, which closes
// the socket and stops the camera.

use crate::core::bridge::{
    BridgeStatus, CameraBridge, CaptureSettings, ChannelPipeline, FrameFeed, LandmarkPipeline,
    OverlaySink, OverlayStage,
};
use crate::core::config::Config;
use crate::core::consent::{CameraPermission, ConsentError, ConsentGate};
use crate::core::overlay::SkeletonOverlay;
use crate::core::relay::{PoseRelay, RelayError};
use crate::models::permission::PermissionState;
use crate::models::pose::{ConnectionState, Keypoint, PoseResult};
use crate::ui::navbar::Navbar;
use crate::ui::pages::practice::{practice, PracticeView};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;

/// Holds the most recent overlay frame for whoever wants to show it
#[derive(Clone, Default)]
struct OverlaySlot {
    latest: Arc<Mutex<Option<RgbaImage>>>,
}

impl OverlaySink for OverlaySlot {
    fn present(&self, frame: &RgbaImage) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(frame.clone());
        }
    }
}

pub struct PracticeSession {
    id: Uuid,
    started_at: i64,
    config: Config,
    keypoints: watch::Receiver<Vec<Keypoint>>,
    bridge: CameraBridge,
    relay: Option<PoseRelay>,
    consent: ConsentGate,
    overlay: Option<OverlaySlot>,
}

impl PracticeSession {
    /// Enter the practice page: start the camera bridge on `pipeline` and, when
    /// an endpoint is known, open the classifier relay.
    ///
    /// Without an endpoint the session still runs; the prediction panel keeps
    /// showing the placeholder verdict.
    pub async fn enter(
        config: Config,
        endpoint: Option<String>,
        pipeline: Box<dyn LandmarkPipeline>,
    ) -> Self {
        let (keypoints_tx, keypoints_rx) = watch::channel(Vec::new());

        let mut bridge = CameraBridge::new(
            pipeline,
            CaptureSettings::from(&config),
            config.keypoint_precision,
            keypoints_tx,
        );

        let overlay = if config.draw_overlay {
            let slot = OverlaySlot::default();
            let skeleton = SkeletonOverlay::new(config.video_width, config.video_height);
            bridge = bridge.with_overlay(OverlayStage::new(skeleton, Box::new(slot.clone())));
            Some(slot)
        } else {
            None
        };

        let relay = match endpoint {
            Some(endpoint) => Some(PoseRelay::activate(endpoint, keypoints_rx.clone())),
            None => {
                log::warn!("No classifier endpoint configured, predictions disabled");
                None
            }
        };

        bridge.start().await;

        let session = Self {
            id: Uuid::new_v4(),
            started_at: chrono::Utc::now().timestamp_millis(),
            config,
            keypoints: keypoints_rx,
            bridge,
            relay,
            consent: ConsentGate::new(),
            overlay,
        };

        log::info!("Practice session {} started", session.id);
        session
    }

    /// Enter with a pipeline the host pushes frames into
    pub async fn enter_host_fed(config: Config, endpoint: Option<String>) -> (Self, FrameFeed) {
        let (pipeline, feed) = ChannelPipeline::new();
        let session = Self::enter(config, endpoint, Box::new(pipeline)).await;
        (session, feed)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Start time in Unix milliseconds
    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bridge(&self) -> &CameraBridge {
        &self.bridge
    }

    pub fn bridge_status(&self) -> BridgeStatus {
        self.bridge.status()
    }

    /// Keypoints currently shown in the table and last handed to the relay
    pub fn keypoints(&self) -> Vec<Keypoint> {
        self.keypoints.borrow().clone()
    }

    pub fn pose(&self) -> PoseResult {
        self.relay
            .as_ref()
            .map(PoseRelay::pose)
            .unwrap_or_default()
    }

    pub fn subscribe_pose(&self) -> Option<watch::Receiver<PoseResult>> {
        self.relay.as_ref().map(PoseRelay::subscribe)
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.relay
            .as_ref()
            .map(PoseRelay::state)
            .unwrap_or(ConnectionState::Closed)
    }

    pub fn relay_error(&self) -> Option<RelayError> {
        self.relay.as_ref().and_then(PoseRelay::last_error)
    }

    pub fn consent(&self) -> &ConsentGate {
        &self.consent
    }

    /// Query the camera permission once on page entry
    pub async fn mount_consent(&mut self, camera: &dyn CameraPermission) {
        self.consent.mount(camera).await;
    }

    pub fn on_permission_state(&mut self, state: PermissionState) {
        self.consent.on_permission_state(state);
    }

    pub async fn request_camera_access(&mut self, camera: &dyn CameraPermission) {
        self.consent.request_access(camera).await;
    }

    /// Mark a camera request started by the host as in flight
    pub fn begin_camera_request(&mut self) {
        self.consent.begin_request();
    }

    /// Apply the outcome of a camera request the host performed itself
    pub fn finish_camera_request(&mut self, outcome: Result<(), ConsentError>) {
        self.consent.finish_request(outcome);
    }

    /// Latest skeleton overlay encoded as PNG
    pub fn overlay_png(&self) -> Option<Vec<u8>> {
        let frame = self.overlay.as_ref()?.latest.lock().ok()?.clone()?;

        let mut bytes = Vec::new();
        match DynamicImage::ImageRgba8(frame).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png) {
            Ok(()) => Some(bytes),
            Err(e) => {
                log::warn!("Failed to encode overlay frame: {}", e);
                None
            }
        }
    }

    pub fn render(&self, navbar: &Navbar) -> String {
        let keypoints = self.keypoints.borrow();
        let pose = self.pose();
        practice(&PracticeView {
            navbar,
            show_consent: self.consent.show_consent(),
            keypoints: &keypoints,
            pose: &pose,
            accuracy_threshold: self.config.accuracy_threshold,
        })
    }

    /// Leave the page, waiting for the camera and socket to shut down
    pub async fn leave(mut self) {
        self.bridge.stop().await;
        if let Some(relay) = self.relay.take() {
            relay.deactivate().await;
        }
        log::info!("Practice session {} ended", self.id);
    }
}
