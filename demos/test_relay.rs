/// Example program to exercise the classifier relay against a live server
/// Run with: YOGEASE_BACKEND_WS=ws://localhost:8000/ws cargo run --example test_relay

use std::time::Duration;
use yogease_lib::core::config::Config;
use yogease_lib::core::session::PracticeSession;
use yogease_lib::models::pose::{BodyLandmark, Landmark, LandmarkFrame};

/// A person standing upright with arms at their sides, swaying slightly with `phase`
fn standing_pose(phase: f32) -> Vec<Landmark> {
    let sway = (phase * 0.5).sin() * 0.01;
    (0..BodyLandmark::COUNT)
        .map(|i| {
            let x = if i % 2 == 0 { 0.52 } else { 0.48 };
            let y = 0.1 + i as f32 * 0.024;
            Landmark::new(x + sway, y, -0.05, 0.98)
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    yogease_lib::init_logging();

    println!("=== Testing Classifier Relay ===\n");

    let config = Config::default();
    let endpoint = config.resolve_endpoint()?;
    println!("Classifier endpoint: {}", endpoint);

    let (session, feed) = PracticeSession::enter_host_fed(config, Some(endpoint)).await;
    let mut verdicts = session.subscribe_pose().ok_or("relay not started")?;

    println!("Waiting for the connection to open...");
    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("Connection state: {:?}\n", session.connection_state());

    for frame_index in 0..20 {
        let accepted = feed.push(LandmarkFrame::detected(standing_pose(frame_index as f32)));
        if !accepted {
            println!("Frame {} dropped (bridge not running)", frame_index);
        }

        if let Ok(Ok(())) = tokio::time::timeout(Duration::from_millis(250), verdicts.changed()).await {
            let pose = verdicts.borrow_and_update().clone();
            println!(
                "✓ Frame {:>2}: {} (class {}) {}%",
                frame_index,
                pose.predicted_pose,
                pose.predicted_class,
                pose.accuracy_percent()
            );
            for line in pose.correction_feedback.lines().filter(|l| !l.trim().is_empty()) {
                println!("    {}", line);
            }
        }
    }

    if let Some(error) = session.relay_error() {
        println!("\nLast relay error: {}", error);
    }

    println!("\nKeypoints sent per frame: {}", session.keypoints().len());
    session.leave().await;
    println!("✓ Session closed");

    Ok(())
}
