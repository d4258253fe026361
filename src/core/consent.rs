use crate::models::permission::PermissionState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsentError {
    #[error("Camera access denied: {0}")]
    Denied(String),

    #[error("No camera available: {0}")]
    NoCamera(String),

    #[error("Camera permission could not be queried: {0}")]
    QueryFailed(String),
}

/// Platform camera permission capability
#[async_trait]
pub trait CameraPermission: Send + Sync {
    /// Current state of the "camera" permission
    async fn query(&self) -> Result<PermissionState, ConsentError>;

    /// Ask the user for camera access (may show a platform prompt)
    async fn request_access(&self) -> Result<(), ConsentError>;
}

/// Where the consent flow currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentPhase {
    Undetermined,
    Requested,
    Granted,
    Denied,
}

/// Consent dialog state for the practice page.
///
/// The dialog is shown while the platform reports `prompt`; an explicit
/// request hides it on success and keeps it up on failure so the user can try
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentGate {
    permission: Option<PermissionState>,
    show_consent: bool,
    phase: ConsentPhase,
}

impl Default for ConsentGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsentGate {
    pub fn new() -> Self {
        Self {
            permission: None,
            show_consent: false,
            phase: ConsentPhase::Undetermined,
        }
    }

    /// Query the platform once and apply the result
    pub async fn mount(&mut self, camera: &dyn CameraPermission) {
        match camera.query().await {
            Ok(state) => self.on_permission_state(state),
            Err(e) => log::warn!("Camera permission query failed: {}", e),
        }
    }

    /// Apply an initial or changed permission state
    pub fn on_permission_state(&mut self, state: PermissionState) {
        self.permission = Some(state);
        self.show_consent = state == PermissionState::Prompt;
        self.phase = match state {
            PermissionState::Granted => ConsentPhase::Granted,
            PermissionState::Denied => ConsentPhase::Denied,
            PermissionState::Prompt if self.phase == ConsentPhase::Requested => ConsentPhase::Requested,
            PermissionState::Prompt => ConsentPhase::Undetermined,
        };
    }

    /// Mark that the user asked for access and the platform request is in flight
    pub fn begin_request(&mut self) {
        self.phase = ConsentPhase::Requested;
    }

    /// Apply the outcome of an access request
    pub fn finish_request(&mut self, outcome: Result<(), ConsentError>) {
        match outcome {
            Ok(()) => {
                self.show_consent = false;
                self.phase = ConsentPhase::Granted;
            }
            Err(e) => {
                log::error!("Error accessing camera: {}", e);
                self.show_consent = true;
                self.phase = ConsentPhase::Denied;
            }
        }
    }

    /// Request camera access through the platform
    pub async fn request_access(&mut self, camera: &dyn CameraPermission) {
        self.begin_request();
        let outcome = camera.request_access().await;
        self.finish_request(outcome);
    }

    pub fn permission(&self) -> Option<PermissionState> {
        self.permission
    }

    pub fn show_consent(&self) -> bool {
        self.show_consent
    }

    pub fn phase(&self) -> ConsentPhase {
        self.phase
    }

    /// Let the user close the dialog without answering
    pub fn dismiss(&mut self) {
        self.show_consent = false;
    }
}

/// Permission source with a fixed answer; used headless and in tests
pub struct StaticPermission {
    state: Mutex<PermissionState>,
    grant_on_request: bool,
}

impl StaticPermission {
    pub fn new(state: PermissionState, grant_on_request: bool) -> Self {
        Self {
            state: Mutex::new(state),
            grant_on_request,
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::Granted, true)
    }
}

#[async_trait]
impl CameraPermission for StaticPermission {
    async fn query(&self) -> Result<PermissionState, ConsentError> {
        self.state
            .lock()
            .map(|state| *state)
            .map_err(|e| ConsentError::QueryFailed(e.to_string()))
    }

    async fn request_access(&self) -> Result<(), ConsentError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ConsentError::QueryFailed(e.to_string()))?;

        if self.grant_on_request {
            *state = PermissionState::Granted;
            Ok(())
        } else {
            *state = PermissionState::Denied;
            Err(ConsentError::Denied("Permission denied by user".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_unknown_and_hidden() {
        let gate = ConsentGate::new();
        assert_eq!(gate.permission(), None);
        assert!(!gate.show_consent());
        assert_eq!(gate.phase(), ConsentPhase::Undetermined);
    }

    #[tokio::test]
    async fn test_prompt_at_mount_shows_dialog_until_granted() {
        let camera = StaticPermission::new(PermissionState::Prompt, true);
        let mut gate = ConsentGate::new();

        gate.mount(&camera).await;
        assert_eq!(gate.permission(), Some(PermissionState::Prompt));
        assert!(gate.show_consent(), "dialog should be visible for prompt");

        gate.request_access(&camera).await;
        assert!(!gate.show_consent(), "dialog should hide after access is granted");
        assert_eq!(gate.phase(), ConsentPhase::Granted);
    }

    #[tokio::test]
    async fn test_denied_request_keeps_dialog_for_retry() {
        let camera = StaticPermission::new(PermissionState::Prompt, false);
        let mut gate = ConsentGate::new();
        gate.mount(&camera).await;

        gate.request_access(&camera).await;
        assert!(gate.show_consent());
        assert_eq!(gate.phase(), ConsentPhase::Denied);

        // The user can trigger the request again.
        gate.request_access(&camera).await;
        assert!(gate.show_consent());
    }

    #[tokio::test]
    async fn test_granted_at_mount_never_shows_dialog() {
        let camera = StaticPermission::granted();
        let mut gate = ConsentGate::new();
        gate.mount(&camera).await;

        assert_eq!(gate.permission(), Some(PermissionState::Granted));
        assert!(!gate.show_consent());
        assert_eq!(gate.phase(), ConsentPhase::Granted);
    }

    #[test]
    fn test_permission_changes_drive_visibility() {
        let mut gate = ConsentGate::new();

        gate.on_permission_state(PermissionState::Prompt);
        assert!(gate.show_consent());

        gate.on_permission_state(PermissionState::Denied);
        assert!(!gate.show_consent());
        assert_eq!(gate.phase(), ConsentPhase::Denied);

        gate.on_permission_state(PermissionState::Prompt);
        assert!(gate.show_consent());
        assert_eq!(gate.phase(), ConsentPhase::Undetermined);

        gate.on_permission_state(PermissionState::Granted);
        assert!(!gate.show_consent());
    }

    #[test]
    fn test_prompt_during_request_stays_requested() {
        let mut gate = ConsentGate::new();
        gate.on_permission_state(PermissionState::Prompt);
        gate.begin_request();
        gate.on_permission_state(PermissionState::Prompt);
        assert_eq!(gate.phase(), ConsentPhase::Requested);

        gate.finish_request(Ok(()));
        assert_eq!(gate.phase(), ConsentPhase::Granted);
        assert!(!gate.show_consent());
    }
}
