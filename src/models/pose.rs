// Data models for body landmarks, relayed keypoints and classifier verdicts

use serde::{Deserialize, Serialize};

// ==============================================================================
// Landmarks (as delivered by the detection pipeline)
// ==============================================================================

/// A single body landmark as reported by the landmark detection library
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // Normalized [0, 1] across the frame width
    pub y: f32, // Normalized [0, 1] across the frame height
    pub z: f32, // Depth relative to the hip midpoint
    #[serde(default)]
    pub visibility: f32, // Likelihood of being visible [0, 1]
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }
}

/// One detection result. `landmarks` is absent when nobody was found in the frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl LandmarkFrame {
    pub fn detected(landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            landmarks: Some(landmarks),
        }
    }

    pub fn empty() -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            landmarks: None,
        }
    }
}

/// MediaPipe Pose landmark slots (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const COUNT: usize = 33;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Skeleton edges drawn by the overlay, as landmark index pairs
pub const POSE_CONNECTIONS: [(usize, usize); 33] = [
    // Face
    (0, 1), (1, 2), (2, 3), (3, 7), (0, 4), (4, 5), (5, 6), (6, 8), (9, 10),
    // Arms and hands
    (11, 12), (11, 13), (13, 15), (15, 17), (15, 19), (15, 21), (17, 19),
    (12, 14), (14, 16), (16, 18), (16, 20), (16, 22), (18, 20),
    // Torso
    (11, 23), (12, 24), (23, 24),
    // Legs and feet
    (23, 25), (24, 26), (25, 27), (26, 28), (27, 29), (28, 30), (29, 31), (30, 32),
];

// ==============================================================================
// Keypoints (wire representation sent to the classifier)
// ==============================================================================

/// Default number of decimal digits kept for keypoint coordinates
pub const DEFAULT_KEYPOINT_PRECISION: usize = 3;

/// One tracked landmark in wire form. Coordinates are decimal text with a
/// fixed number of fraction digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypoint {
    pub point: u32,
    pub x: String,
    pub y: String,
    pub z: String,
    pub visibility: String,
}

impl Keypoint {
    pub fn from_landmark(point: u32, landmark: &Landmark, precision: usize) -> Self {
        Self {
            point,
            x: format_fixed(landmark.x, precision),
            y: format_fixed(landmark.y, precision),
            z: format_fixed(landmark.z, precision),
            visibility: format_fixed(landmark.visibility, precision),
        }
    }
}

/// Convert an ordered landmark list into keypoints. Order is landmark identity.
pub fn keypoints_from_landmarks(landmarks: &[Landmark], precision: usize) -> Vec<Keypoint> {
    landmarks
        .iter()
        .enumerate()
        .map(|(index, landmark)| Keypoint::from_landmark(index as u32, landmark, precision))
        .collect()
}

/// Fraction digits needed to print any f32 exactly (smallest subnormal is 2^-149)
const EXACT_F32_DIGITS: usize = 149;

/// Fixed-point text with ties rounded away from zero, matching `Number.toFixed`.
/// Rounding is done on the exact binary value, so 0.0625 becomes "0.063".
fn format_fixed(value: f32, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    // -0.0 is not negative here, same as toFixed
    let negative = value < 0.0;
    let exact = format!("{:.*}", EXACT_F32_DIGITS, f64::from(value.abs()));
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(precision))
        .collect();

    if fraction.as_bytes().get(precision).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - precision;
    let mut text = String::with_capacity(digits.len() + 2);
    if negative {
        text.push('-');
    }
    text.extend(digits[..split].iter().map(|&d| d as char));
    if precision > 0 {
        text.push('.');
        text.extend(digits[split..].iter().map(|&d| d as char));
    }
    text
}

/// Outbound socket message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypointsMessage {
    pub keypoints: Vec<Keypoint>,
}

// ==============================================================================
// Classifier verdict
// ==============================================================================

/// The remote classifier's verdict for one submitted keypoint sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseResult {
    pub predicted_class: i64,
    pub predicted_pose: String,
    pub confidence: f64,
    pub correction_feedback: String,
}

impl Default for PoseResult {
    /// Placeholder shown before the classifier has replied
    fn default() -> Self {
        Self {
            predicted_class: 5,
            predicted_pose: "Tadasana".to_string(),
            confidence: 0.0,
            correction_feedback: String::new(),
        }
    }
}

impl PoseResult {
    /// Displayed accuracy: round(confidence * 100), not separately bounded
    pub fn accuracy_percent(&self) -> i64 {
        (self.confidence * 100.0).round() as i64
    }
}

/// Anything the classifier may send back over the socket
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Prediction(PoseResult),
    Error { error: String },
}

// ==============================================================================
// Connection state
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose_result_is_placeholder() {
        let pose = PoseResult::default();
        assert_eq!(pose.predicted_class, 5);
        assert_eq!(pose.predicted_pose, "Tadasana");
        assert_eq!(pose.confidence, 0.0);
        assert!(pose.correction_feedback.is_empty());
    }

    #[test]
    fn test_accuracy_rounding() {
        let mut pose = PoseResult::default();
        pose.confidence = 0.853;
        assert_eq!(pose.accuracy_percent(), 85);
        pose.confidence = 0.856;
        assert_eq!(pose.accuracy_percent(), 86);
        pose.confidence = 1.0;
        assert_eq!(pose.accuracy_percent(), 100);
    }

    #[test]
    fn test_keypoints_keep_landmark_order() {
        let landmarks = vec![
            Landmark::new(0.5, 0.25, -0.1, 0.99),
            Landmark::new(0.12345, 0.9876, 0.0, 0.5),
        ];
        let keypoints = keypoints_from_landmarks(&landmarks, DEFAULT_KEYPOINT_PRECISION);

        assert_eq!(keypoints.len(), 2);
        assert_eq!(keypoints[0].point, 0);
        assert_eq!(keypoints[0].x, "0.500");
        assert_eq!(keypoints[0].y, "0.250");
        assert_eq!(keypoints[0].z, "-0.100");
        assert_eq!(keypoints[0].visibility, "0.990");
        assert_eq!(keypoints[1].point, 1);
        assert_eq!(keypoints[1].x, "0.123");
        assert_eq!(keypoints[1].y, "0.988");
    }

    #[test]
    fn test_exact_ties_round_away_from_zero() {
        let keypoint = Keypoint::from_landmark(0, &Landmark::new(0.0625, 0.5625, -0.3125, 0.9375), 3);
        assert_eq!(keypoint.x, "0.063");
        assert_eq!(keypoint.y, "0.563");
        assert_eq!(keypoint.z, "-0.313");
        assert_eq!(keypoint.visibility, "0.938");
    }

    #[test]
    fn test_fixed_text_edge_values() {
        assert_eq!(format_fixed(0.9996, 3), "1.000");
        assert_eq!(format_fixed(-9.9999, 3), "-10.000");
        assert_eq!(format_fixed(-0.0, 3), "0.000");
        assert_eq!(format_fixed(-0.0001, 3), "-0.000");
        assert_eq!(format_fixed(0.25, 0), "0");
        assert_eq!(format_fixed(2.5, 0), "3");
        assert_eq!(format_fixed(0.5, 5), "0.50000");
        assert_eq!(format_fixed(f32::NAN, 3), "NaN");
    }

    #[test]
    fn test_keypoints_message_wire_format() {
        let message = KeypointsMessage {
            keypoints: vec![Keypoint::from_landmark(0, &Landmark::new(0.5, 0.5, 0.0, 1.0), 3)],
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "keypoints": [
                    {"point": 0, "x": "0.500", "y": "0.500", "z": "0.000", "visibility": "1.000"}
                ]
            })
        );
    }

    #[test]
    fn test_server_message_variants() {
        let prediction: ServerMessage = serde_json::from_str(
            r#"{"predicted_class": 3, "predicted_pose": "Utkatasana", "confidence": 0.91, "correction_feedback": "Good"}"#,
        )
        .unwrap();
        assert!(matches!(prediction, ServerMessage::Prediction(ref p) if p.predicted_class == 3));

        let error: ServerMessage =
            serde_json::from_str(r#"{"error": "No keypoints provided."}"#).unwrap();
        assert_eq!(
            error,
            ServerMessage::Error {
                error: "No keypoints provided.".to_string()
            }
        );

        assert!(serde_json::from_str::<ServerMessage>(r#"{"predicted_class": 1}"#).is_err());
    }

    #[test]
    fn test_landmark_frame_without_visibility() {
        let frame: LandmarkFrame =
            serde_json::from_str(r#"{"landmarks": [{"x": 0.1, "y": 0.2, "z": 0.3}]}"#).unwrap();
        let landmarks = frame.landmarks.unwrap();
        assert_eq!(landmarks[0].visibility, 0.0);
        assert!(!landmarks[0].is_visible(0.5));
    }

    #[test]
    fn test_body_landmark_indices() {
        assert_eq!(BodyLandmark::LeftShoulder.index(), 11);
        assert_eq!(BodyLandmark::RightFootIndex.index(), BodyLandmark::COUNT - 1);
        assert!(POSE_CONNECTIONS
            .iter()
            .all(|&(a, b)| a < BodyLandmark::COUNT && b < BodyLandmark::COUNT));
    }
}
