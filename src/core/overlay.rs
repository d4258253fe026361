// Skeleton overlay drawing for the camera view

use crate::models::pose::{Landmark, POSE_CONNECTIONS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, Blend};

/// Landmarks this far outside the frame (in normalized units) are clamped
const MAX_OVERSHOOT: f32 = 1.0;

/// Draws pose connectors and landmark dots with alpha blending
#[derive(Debug, Clone)]
pub struct SkeletonOverlay {
    width: u32,
    height: u32,
    pub connector_color: Rgba<u8>,
    pub connector_width: u32,
    pub landmark_color: Rgba<u8>,
    pub landmark_radius: i32,
}

impl SkeletonOverlay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            connector_color: Rgba([255, 215, 184, 128]),
            connector_width: 2,
            landmark_color: Rgba([255, 111, 0, 153]),
            landmark_radius: 3,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draw the skeleton on a transparent canvas sized like the video
    pub fn render(&self, landmarks: &[Landmark]) -> RgbaImage {
        self.draw_onto(RgbaImage::new(self.width, self.height), landmarks)
    }

    /// Draw the skeleton over an existing frame
    pub fn draw_onto(&self, frame: RgbaImage, landmarks: &[Landmark]) -> RgbaImage {
        let (width, height) = frame.dimensions();
        let mut canvas = Blend(frame);

        let points: Vec<Option<(f32, f32)>> = landmarks
            .iter()
            .map(|landmark| to_pixels(landmark, width, height))
            .collect();

        for &(from, to) in POSE_CONNECTIONS.iter() {
            let (Some(Some(start)), Some(Some(end))) = (points.get(from), points.get(to)) else {
                continue;
            };
            self.draw_connector(&mut canvas, *start, *end);
        }

        for (x, y) in points.iter().flatten() {
            draw_filled_circle_mut(
                &mut canvas,
                (x.round() as i32, y.round() as i32),
                self.landmark_radius,
                self.landmark_color,
            );
        }

        canvas.0
    }

    fn draw_connector(&self, canvas: &mut Blend<RgbaImage>, start: (f32, f32), end: (f32, f32)) {
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let length = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if length > f32::EPSILON {
            (-dy / length, dx / length)
        } else {
            (0.0, 0.0)
        };

        // Thick lines as parallel one-pixel strokes centred on the segment
        let strokes = self.connector_width.max(1);
        let centre = (strokes as f32 - 1.0) / 2.0;
        for stroke in 0..strokes {
            let offset = stroke as f32 - centre;
            draw_line_segment_mut(
                canvas,
                (start.0 + nx * offset, start.1 + ny * offset),
                (end.0 + nx * offset, end.1 + ny * offset),
                self.connector_color,
            );
        }
    }
}

fn to_pixels(landmark: &Landmark, width: u32, height: u32) -> Option<(f32, f32)> {
    if !landmark.x.is_finite() || !landmark.y.is_finite() {
        return None;
    }

    let x = landmark.x.clamp(-MAX_OVERSHOOT, 1.0 + MAX_OVERSHOOT);
    let y = landmark.y.clamp(-MAX_OVERSHOOT, 1.0 + MAX_OVERSHOOT);
    Some((x * width as f32, y * height as f32))
}
