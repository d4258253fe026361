use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the classifier socket endpoint
pub const BACKEND_WS_ENV: &str = "YOGEASE_BACKEND_WS";

/// Endpoint captured from the build environment, if one was set
const BUILD_BACKEND_WS: Option<&str> = option_env!("YOGEASE_BACKEND_WS");

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Classifier WebSocket endpoint (ws:// or wss://). Environment wins over this.
    pub backend_ws: Option<String>,
    /// Camera capture width in pixels
    pub video_width: u32,
    /// Camera capture height in pixels
    pub video_height: u32,
    /// Landmark model complexity (0=lite, 1=full, 2=heavy)
    pub model_complexity: u8,
    /// Smooth landmarks across frames
    pub smooth_landmarks: bool,
    /// Ask the landmark model for a segmentation mask
    pub enable_segmentation: bool,
    /// Minimum confidence for a person to be detected (0.0-1.0)
    pub min_detection_confidence: f32,
    /// Minimum confidence for landmarks to be tracked (0.0-1.0)
    pub min_tracking_confidence: f32,
    /// Fraction digits kept for keypoint coordinates
    pub keypoint_precision: usize,
    /// Draw the skeleton overlay over the camera view
    pub draw_overlay: bool,
    /// Accuracy (percent) below which the prediction panel shows "No pose detected"
    pub accuracy_threshold: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_ws: None,
            video_width: 640,
            video_height: 480,
            model_complexity: 1,
            smooth_landmarks: true,
            enable_segmentation: true,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            keypoint_precision: 3,
            draw_overlay: true,
            accuracy_threshold: 85,
        }
    }
}

/// Errors from loading, saving or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No classifier endpoint configured; set YOGEASE_BACKEND_WS or backend_ws in the config file")]
    MissingEndpoint,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl Config {
    /// Load configuration from file, creating with defaults if it doesn't exist
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, creating it with defaults if missing
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(endpoint) = &self.backend_ws {
            validate_endpoint(endpoint)?;
        }

        if self.video_width == 0 || self.video_width > 4096 {
            return Err(ConfigError::Invalid(format!(
                "Invalid video width: {}. Must be between 1 and 4096",
                self.video_width
            )));
        }

        if self.video_height == 0 || self.video_height > 4096 {
            return Err(ConfigError::Invalid(format!(
                "Invalid video height: {}. Must be between 1 and 4096",
                self.video_height
            )));
        }

        if self.model_complexity > 2 {
            return Err(ConfigError::Invalid(format!(
                "Invalid model complexity: {}. Must be 0, 1 or 2",
                self.model_complexity
            )));
        }

        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(ConfigError::Invalid(format!(
                "Invalid detection confidence: {}. Must be between 0.0 and 1.0",
                self.min_detection_confidence
            )));
        }

        if !(0.0..=1.0).contains(&self.min_tracking_confidence) {
            return Err(ConfigError::Invalid(format!(
                "Invalid tracking confidence: {}. Must be between 0.0 and 1.0",
                self.min_tracking_confidence
            )));
        }

        if self.keypoint_precision > 8 {
            return Err(ConfigError::Invalid(format!(
                "Invalid keypoint precision: {}. Must be between 0 and 8",
                self.keypoint_precision
            )));
        }

        if !(0..=100).contains(&self.accuracy_threshold) {
            return Err(ConfigError::Invalid(format!(
                "Invalid accuracy threshold: {}. Must be between 0 and 100",
                self.accuracy_threshold
            )));
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> ConfigResult<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    /// Resolve the classifier endpoint: runtime environment, then this config,
    /// then the value captured at build time
    pub fn resolve_endpoint(&self) -> ConfigResult<String> {
        let runtime = std::env::var(BACKEND_WS_ENV).ok();
        Self::pick_endpoint(runtime.as_deref(), self.backend_ws.as_deref(), BUILD_BACKEND_WS)
    }

    fn pick_endpoint(
        runtime: Option<&str>,
        configured: Option<&str>,
        built_in: Option<&str>,
    ) -> ConfigResult<String> {
        let endpoint = [runtime, configured, built_in]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        validate_endpoint(endpoint)?;
        Ok(endpoint.to_string())
    }

    /// Get the configuration file path
    fn get_config_path() -> ConfigResult<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ConfigError::NoHomeDirectory)?;

        let mut path = PathBuf::from(home);
        path.push(".yogease");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}

fn validate_endpoint(endpoint: &str) -> ConfigResult<()> {
    if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "Invalid classifier endpoint: {}. Must start with ws:// or wss://",
            endpoint
        )))
    }
}
