// Camera/landmark bridge
// Wraps an external landmark detection pipeline behind a capability trait and
// turns each detection result into the keypoint sequence the relay sends.

use crate::core::config::Config;
use crate::core::overlay::SkeletonOverlay;
use crate::models::pose::{keypoints_from_landmarks, Keypoint, Landmark, LandmarkFrame};
use async_trait::async_trait;
use image::RgbaImage;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Capture options handed to the detection pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
    pub model_complexity: u8,
    pub smooth_landmarks: bool,
    pub enable_segmentation: bool,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl From<&Config> for CaptureSettings {
    fn from(config: &Config) -> Self {
        Self {
            width: config.video_width,
            height: config.video_height,
            model_complexity: config.model_complexity,
            smooth_landmarks: config.smooth_landmarks,
            enable_segmentation: config.enable_segmentation,
            min_detection_confidence: config.min_detection_confidence,
            min_tracking_confidence: config.min_tracking_confidence,
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Landmark detection library not available: {0}")]
    Unavailable(String),

    #[error("Camera could not be opened: {0}")]
    CameraUnavailable(String),

    #[error("Landmark pipeline already running")]
    AlreadyRunning,
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Single-slot frame cell. A newer frame replaces one not yet picked up.
pub type FrameStream = watch::Receiver<Option<LandmarkFrame>>;

/// Landmark detection pipeline: video in, the latest [`LandmarkFrame`] out
#[async_trait]
pub trait LandmarkPipeline: Send + Sync {
    /// Start capturing and return the latest-frame cell
    async fn start(&mut self, settings: &CaptureSettings) -> BridgeResult<FrameStream>;

    /// Stop capturing. The frame stream closes once the pipeline is stopped.
    async fn stop(&mut self);

    /// Human readable description for logs
    fn describe(&self) -> String;
}

// ==============================================================================
// Host-fed pipeline
// ==============================================================================

/// Pipeline whose frames are pushed in by the host, e.g. the webview running
/// the detection library and forwarding each `onResults` callback.
pub struct ChannelPipeline {
    feed: Arc<Mutex<Option<watch::Sender<Option<LandmarkFrame>>>>>,
}

/// Cloneable handle the host uses to push frames into a [`ChannelPipeline`]
#[derive(Clone)]
pub struct FrameFeed {
    feed: Arc<Mutex<Option<watch::Sender<Option<LandmarkFrame>>>>>,
}

impl ChannelPipeline {
    pub fn new() -> (Self, FrameFeed) {
        let feed = Arc::new(Mutex::new(None));
        let pipeline = Self { feed: feed.clone() };
        (pipeline, FrameFeed { feed })
    }
}

#[async_trait]
impl LandmarkPipeline for ChannelPipeline {
    async fn start(&mut self, settings: &CaptureSettings) -> BridgeResult<FrameStream> {
        let mut feed = self
            .feed
            .lock()
            .map_err(|e| BridgeError::Unavailable(format!("frame feed poisoned: {}", e)))?;
        if feed.is_some() {
            return Err(BridgeError::AlreadyRunning);
        }

        let (tx, rx) = watch::channel(None);
        *feed = Some(tx);

        log::debug!(
            "Host landmark pipeline started at {}x{} (complexity {})",
            settings.width,
            settings.height,
            settings.model_complexity
        );
        Ok(rx)
    }

    async fn stop(&mut self) {
        if let Ok(mut feed) = self.feed.lock() {
            *feed = None;
        }
    }

    fn describe(&self) -> String {
        "Host-fed landmark pipeline".to_string()
    }
}

impl FrameFeed {
    /// Push one detection result, replacing any frame the bridge has not
    /// picked up yet. Returns false when the bridge is not running.
    pub fn push(&self, frame: LandmarkFrame) -> bool {
        let feed = match self.feed.lock() {
            Ok(feed) => feed,
            Err(_) => return false,
        };

        match feed.as_ref() {
            Some(tx) => {
                tx.send_replace(Some(frame));
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.feed.lock().map(|feed| feed.is_some()).unwrap_or(false)
    }
}

// ==============================================================================
// Disabled pipeline (detection library missing)
// ==============================================================================

pub struct DisabledPipeline {
    reason: String,
}

impl DisabledPipeline {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl LandmarkPipeline for DisabledPipeline {
    async fn start(&mut self, _settings: &CaptureSettings) -> BridgeResult<FrameStream> {
        Err(BridgeError::Unavailable(self.reason.clone()))
    }

    async fn stop(&mut self) {}

    fn describe(&self) -> String {
        format!("Disabled landmark pipeline ({})", self.reason)
    }
}

// ==============================================================================
// Bridge
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    Idle,
    Running,
    Disabled,
}

/// Receives overlay frames when skeleton drawing is enabled
pub trait OverlaySink: Send + Sync {
    fn present(&self, frame: &RgbaImage);
}

/// Converts detection results into keypoints and publishes them.
///
/// Each detected frame replaces the published keypoints wholesale; frames
/// without a person leave the previous keypoints in place.
pub struct CameraBridge {
    pipeline: Box<dyn LandmarkPipeline>,
    settings: CaptureSettings,
    precision: usize,
    keypoints: Arc<watch::Sender<Vec<Keypoint>>>,
    overlay: Option<Arc<OverlayStage>>,
    status: BridgeStatus,
    worker: Option<JoinHandle<()>>,
}

/// Skeleton drawing plus where to present the result
pub struct OverlayStage {
    skeleton: SkeletonOverlay,
    sink: Box<dyn OverlaySink>,
}

impl OverlayStage {
    pub fn new(skeleton: SkeletonOverlay, sink: Box<dyn OverlaySink>) -> Self {
        Self { skeleton, sink }
    }

    fn draw(&self, landmarks: &[Landmark]) {
        let canvas = self.skeleton.render(landmarks);
        self.sink.present(&canvas);
    }
}

impl CameraBridge {
    pub fn new(
        pipeline: Box<dyn LandmarkPipeline>,
        settings: CaptureSettings,
        precision: usize,
        keypoints: watch::Sender<Vec<Keypoint>>,
    ) -> Self {
        Self {
            pipeline,
            settings,
            precision,
            keypoints: Arc::new(keypoints),
            overlay: None,
            status: BridgeStatus::Idle,
            worker: None,
        }
    }

    /// Draw the skeleton for every detected frame
    pub fn with_overlay(mut self, overlay: OverlayStage) -> Self {
        self.overlay = Some(Arc::new(overlay));
        self
    }

    pub fn status(&self) -> BridgeStatus {
        self.status
    }

    /// Subscribe to the published keypoints
    pub fn keypoints(&self) -> watch::Receiver<Vec<Keypoint>> {
        self.keypoints.subscribe()
    }

    /// Start the pipeline. An unavailable pipeline disables the bridge instead
    /// of failing; it is not probed again.
    pub async fn start(&mut self) {
        if self.status != BridgeStatus::Idle {
            return;
        }

        let frames = match self.pipeline.start(&self.settings).await {
            Ok(frames) => frames,
            Err(e) => {
                log::error!("{} unavailable, camera bridge disabled: {}", self.pipeline.describe(), e);
                self.status = BridgeStatus::Disabled;
                return;
            }
        };

        log::info!("Camera bridge started with {}", self.pipeline.describe());

        let keypoints = self.keypoints.clone();
        let overlay = self.overlay.clone();
        let precision = self.precision;
        self.worker = Some(tokio::spawn(async move {
            let mut frames = frames;
            while frames.changed().await.is_ok() {
                let latest = frames.borrow_and_update().clone();
                if let Some(frame) = latest {
                    publish_frame(&keypoints, overlay.as_deref(), &frame, precision);
                }
            }
        }));
        self.status = BridgeStatus::Running;
    }

    /// Process one detection result on the caller's task
    pub fn handle_frame(&self, frame: &LandmarkFrame) {
        if self.status == BridgeStatus::Disabled {
            return;
        }
        publish_frame(&self.keypoints, self.overlay.as_deref(), frame, self.precision);
    }

    pub async fn stop(&mut self) {
        if self.status != BridgeStatus::Running {
            return;
        }

        self.pipeline.stop().await;
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                log::warn!("Camera bridge worker ended abnormally: {}", e);
            }
        }
        self.status = BridgeStatus::Idle;
        log::info!("Camera bridge stopped");
    }
}

impl Drop for CameraBridge {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

fn publish_frame(
    keypoints: &watch::Sender<Vec<Keypoint>>,
    overlay: Option<&OverlayStage>,
    frame: &LandmarkFrame,
    precision: usize,
) {
    let Some(landmarks) = frame.landmarks.as_deref() else {
        return;
    };

    // Overlay first so a keypoint update implies the matching frame is drawn
    if let Some(overlay) = overlay {
        overlay.draw(landmarks);
    }

    keypoints.send_replace(keypoints_from_landmarks(landmarks, precision));
    log::trace!("Published {} keypoints from frame {}", landmarks.len(), frame.timestamp);
}
