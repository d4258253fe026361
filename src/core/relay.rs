// Classifier relay
// Keeps one WebSocket open to the remote pose classifier, forwards every new
// keypoint set and republishes each reply as the latest pose result.
//
// Both directions are single-slot `watch` cells: a newer keypoint set replaces
// an unsent older one, and a newer verdict replaces the previous one. The relay
// is lossy under load by design of the channel, never queueing.

use crate::models::pose::{ConnectionState, Keypoint, KeypointsMessage, PoseResult, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

/// Errors observed by the relay. None of them are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectFailed { endpoint: String, reason: String },

    #[error("Classifier socket error: {0}")]
    Transport(String),

    #[error("Malformed classifier payload: {0}")]
    MalformedPayload(String),

    #[error("Classifier reported an error: {0}")]
    Classifier(String),

    #[error("Failed to encode keypoints: {0}")]
    Encode(String),
}

pub type RelayResult<T> = Result<T, RelayError>;

/// Writer side of the cells the relay task publishes into
struct RelayCells {
    pose: watch::Sender<PoseResult>,
    state: watch::Sender<ConnectionState>,
    error: watch::Sender<Option<RelayError>>,
}

impl RelayCells {
    fn fail(&self, error: RelayError) {
        self.error.send_replace(Some(error));
    }
}

/// Owned handle to one classifier connection.
///
/// The connection lives exactly as long as the handle: dropping it (or calling
/// [`PoseRelay::deactivate`]) closes the socket without draining pending sends.
/// A dropped connection is not re-established; create a new relay instead.
pub struct PoseRelay {
    id: Uuid,
    endpoint: String,
    pose_rx: watch::Receiver<PoseResult>,
    state_rx: watch::Receiver<ConnectionState>,
    error_rx: watch::Receiver<Option<RelayError>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PoseRelay {
    /// Open a connection to `endpoint` and start mirroring `keypoints` to it.
    /// Must be called from within a Tokio runtime.
    pub fn activate(endpoint: impl Into<String>, keypoints: watch::Receiver<Vec<Keypoint>>) -> Self {
        let endpoint = endpoint.into();
        let id = Uuid::new_v4();

        let (pose_tx, pose_rx) = watch::channel(PoseResult::default());
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (error_tx, error_rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let cells = RelayCells {
            pose: pose_tx,
            state: state_tx,
            error: error_tx,
        };

        log::debug!("Relay {} connecting to {}", id, endpoint);
        let task = tokio::spawn(run_relay(id, endpoint.clone(), keypoints, cells, shutdown_rx));

        Self {
            id,
            endpoint,
            pose_rx,
            state_rx,
            error_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Latest verdict, or the placeholder if the classifier has not replied yet
    pub fn pose(&self) -> PoseResult {
        self.pose_rx.borrow().clone()
    }

    /// Watch every verdict replacement
    pub fn subscribe(&self) -> watch::Receiver<PoseResult> {
        self.pose_rx.clone()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Most recent error seen on this connection
    pub fn last_error(&self) -> Option<RelayError> {
        self.error_rx.borrow().clone()
    }

    pub fn error_changes(&self) -> watch::Receiver<Option<RelayError>> {
        self.error_rx.clone()
    }

    /// Close the connection and wait for the relay task to finish
    pub async fn deactivate(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("Relay {} task ended abnormally: {}", self.id, e);
            }
        }
    }
}

impl Drop for PoseRelay {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn run_relay(
    id: Uuid,
    endpoint: String,
    mut keypoints: watch::Receiver<Vec<Keypoint>>,
    cells: RelayCells,
    mut shutdown: oneshot::Receiver<()>,
) {
    let connected = tokio::select! {
        result = connect_async(endpoint.as_str()) => result,
        _ = &mut shutdown => {
            cells.state.send_replace(ConnectionState::Closed);
            return;
        }
    };

    let mut socket = match connected {
        Ok((socket, _response)) => socket,
        Err(e) => {
            log::warn!("Relay {} could not connect to {}: {}", id, endpoint, e);
            cells.fail(RelayError::ConnectFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            });
            cells.state.send_replace(ConnectionState::Closed);
            return;
        }
    };

    // Keypoints published while connecting were dropped, not queued.
    keypoints.borrow_and_update();
    cells.state.send_replace(ConnectionState::Open);
    log::info!("Classifier socket connected ({})", endpoint);

    let mut keypoints_live = true;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = socket.close(None).await {
                    log::debug!("Relay {} close handshake failed: {}", id, e);
                }
                break;
            }

            changed = keypoints.changed(), if keypoints_live => {
                if changed.is_err() {
                    // Producer is gone; keep listening for verdicts.
                    keypoints_live = false;
                    continue;
                }

                let message = KeypointsMessage {
                    keypoints: keypoints.borrow_and_update().clone(),
                };

                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        cells.fail(RelayError::Encode(e.to_string()));
                        continue;
                    }
                };

                if let Err(e) = socket.send(Message::Text(text)).await {
                    log::warn!("Relay {} send failed: {}", id, e);
                    cells.fail(RelayError::Transport(e.to_string()));
                    break;
                }
            }

            incoming = socket.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => adopt_reply(&cells, &text),
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => adopt_reply(&cells, &text),
                        Err(e) => cells.fail(RelayError::MalformedPayload(e.to_string())),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("Relay {} receive failed: {}", id, e);
                        cells.fail(RelayError::Transport(e.to_string()));
                        break;
                    }
                }
            }
        }
    }

    cells.state.send_replace(ConnectionState::Closed);
    log::info!("Classifier socket disconnected ({})", endpoint);
}

/// Replace the held verdict with a reply. Anything that is not a verdict is
/// logged and recorded; the previous verdict stays in place.
fn adopt_reply(cells: &RelayCells, text: &str) {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::Prediction(pose)) => {
            log::debug!(
                "Prediction from classifier: {} (class {}, confidence {:.3})",
                pose.predicted_pose,
                pose.predicted_class,
                pose.confidence
            );
            cells.pose.send_replace(pose);
        }
        Ok(ServerMessage::Error { error }) => {
            log::warn!("Classifier rejected keypoints: {}", error);
            cells.fail(RelayError::Classifier(error));
        }
        Err(e) => {
            log::error!("Malformed classifier payload: {}", e);
            cells.fail(RelayError::MalformedPayload(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    /// Loopback classifier accepting a single connection
    struct TestClassifier {
        endpoint: String,
        inbound: mpsc::UnboundedReceiver<String>,
        outbound: mpsc::UnboundedSender<Message>,
    }

    async fn start_classifier() -> TestClassifier {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            loop {
                tokio::select! {
                    Some(message) = out_rx.recv() => {
                        if ws.send(message).await.is_err() {
                            break;
                        }
                    }
                    incoming = ws.next() => match incoming {
                        Some(Ok(Message::Text(text))) => {
                            let _ = in_tx.send(text);
                        }
                        Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                        Some(Ok(_)) => {}
                    }
                }
            }
        });

        TestClassifier {
            endpoint: format!("ws://{}", addr),
            inbound: in_rx,
            outbound: out_tx,
        }
    }

    async fn wait_for_state(relay: &PoseRelay, wanted: ConnectionState) {
        let mut states = relay.state_changes();
        timeout(WAIT, states.wait_for(|state| *state == wanted))
            .await
            .expect("timed out waiting for relay state")
            .expect("relay state cell closed");
    }

    fn sample_keypoints(offset: f32) -> Vec<Keypoint> {
        (0..33)
            .map(|i| Keypoint {
                point: i,
                x: format!("{:.3}", offset + i as f32 * 0.01),
                y: "0.500".to_string(),
                z: "-0.250".to_string(),
                visibility: "0.990".to_string(),
            })
            .collect()
    }

    fn verdict(class: i64, pose: &str, confidence: f64, feedback: &str) -> PoseResult {
        PoseResult {
            predicted_class: class,
            predicted_pose: pose.to_string(),
            confidence,
            correction_feedback: feedback.to_string(),
        }
    }

    #[tokio::test]
    async fn test_placeholder_before_any_reply() {
        let mut classifier = start_classifier().await;
        let (_keypoints_tx, keypoints_rx) = watch::channel(Vec::new());

        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        assert_eq!(relay.pose(), PoseResult::default());

        wait_for_state(&relay, ConnectionState::Open).await;
        assert_eq!(relay.pose(), PoseResult::default());
        assert!(classifier.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_forwards_each_keypoint_set_once() {
        let mut classifier = start_classifier().await;
        let (keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;

        for offset in [0.1_f32, 0.2] {
            let keypoints = sample_keypoints(offset);
            keypoints_tx.send_replace(keypoints.clone());

            let text = timeout(WAIT, classifier.inbound.recv())
                .await
                .expect("timed out waiting for keypoints")
                .expect("classifier closed");
            let message: KeypointsMessage = serde_json::from_str(&text).unwrap();
            assert_eq!(message.keypoints, keypoints);
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(classifier.inbound.try_recv().is_err(), "no duplicate sends expected");
    }

    #[tokio::test]
    async fn test_keypoints_published_while_connecting_are_not_replayed() {
        let mut classifier = start_classifier().await;
        let (keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        keypoints_tx.send_replace(sample_keypoints(0.3));

        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(classifier.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_adopts_each_reply_in_full() {
        let classifier = start_classifier().await;
        let (_keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;
        let mut poses = relay.subscribe();

        let first = verdict(3, "Utkatasana", 0.91, "Perfect form! Keep holding this position.");
        classifier
            .outbound
            .send(Message::Text(serde_json::to_string(&first).unwrap()))
            .unwrap();
        timeout(WAIT, poses.wait_for(|pose| *pose == first))
            .await
            .expect("timed out waiting for first verdict")
            .unwrap();
        assert_eq!(relay.pose(), first);

        let second = verdict(12, "Bhujangasana", 0.4, "");
        classifier
            .outbound
            .send(Message::Text(serde_json::to_string(&second).unwrap()))
            .unwrap();
        timeout(WAIT, poses.wait_for(|pose| *pose == second))
            .await
            .expect("timed out waiting for second verdict")
            .unwrap();
        assert_eq!(relay.pose(), second);
    }

    #[tokio::test]
    async fn test_malformed_reply_keeps_previous_verdict() {
        let classifier = start_classifier().await;
        let (_keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;
        let mut errors = relay.error_changes();

        let good = verdict(4, "Trikonasana", 0.88, "Very good form with minimal adjustments needed.");
        classifier
            .outbound
            .send(Message::Text(serde_json::to_string(&good).unwrap()))
            .unwrap();
        classifier
            .outbound
            .send(Message::Text("{\"predicted_class\": \"four\"".to_string()))
            .unwrap();

        timeout(WAIT, errors.wait_for(|error| error.is_some()))
            .await
            .expect("timed out waiting for parse failure")
            .unwrap();

        assert!(matches!(relay.last_error(), Some(RelayError::MalformedPayload(_))));
        assert_eq!(relay.pose(), good);
        assert_eq!(relay.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_classifier_error_reply_is_recorded() {
        let classifier = start_classifier().await;
        let (_keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;
        let mut errors = relay.error_changes();

        classifier
            .outbound
            .send(Message::Text(r#"{"error": "No keypoints provided."}"#.to_string()))
            .unwrap();

        timeout(WAIT, errors.wait_for(|error| error.is_some()))
            .await
            .expect("timed out waiting for classifier error")
            .unwrap();
        assert_eq!(
            relay.last_error(),
            Some(RelayError::Classifier("No keypoints provided.".to_string()))
        );
        assert_eq!(relay.pose(), PoseResult::default());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_drops_keypoints_silently() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(format!("ws://{}", addr), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Closed).await;
        let connect_error = relay.last_error();
        assert!(matches!(connect_error, Some(RelayError::ConnectFailed { .. })));
        let errors = relay.error_changes();

        keypoints_tx.send_replace(sample_keypoints(0.5));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(relay.state(), ConnectionState::Closed);
        assert_eq!(relay.last_error(), connect_error);
        // The relay task is gone, so nothing can be recorded later either.
        assert!(errors.has_changed().is_err());
        assert_eq!(relay.pose(), PoseResult::default());
    }

    #[tokio::test]
    async fn test_deactivate_closes_connection() {
        let mut classifier = start_classifier().await;
        let (_keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;

        relay.deactivate().await;

        let closed = timeout(WAIT, classifier.inbound.recv())
            .await
            .expect("classifier should observe the close");
        assert!(closed.is_none());
    }

    #[tokio::test]
    async fn test_drop_closes_connection() {
        let mut classifier = start_classifier().await;
        let (_keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;

        drop(relay);

        let closed = timeout(WAIT, classifier.inbound.recv())
            .await
            .expect("classifier should observe the close");
        assert!(closed.is_none());
    }

    #[tokio::test]
    async fn test_stays_closed_after_server_hangs_up() {
        let classifier = start_classifier().await;
        let (keypoints_tx, keypoints_rx) = watch::channel(Vec::new());
        let relay = PoseRelay::activate(classifier.endpoint.clone(), keypoints_rx);
        wait_for_state(&relay, ConnectionState::Open).await;

        classifier.outbound.send(Message::Close(None)).unwrap();
        wait_for_state(&relay, ConnectionState::Closed).await;

        let errors = relay.error_changes();
        keypoints_tx.send_replace(sample_keypoints(0.1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(relay.state(), ConnectionState::Closed);
        assert_eq!(relay.last_error(), None, "an orderly close records no error");
        // The relay task is gone, so nothing can be recorded later either.
        assert!(errors.has_changed().is_err());
    }
}
