/// Example program to render the landing and practice pages to disk
/// Run with: cargo run --example test_pages

use std::path::PathBuf;
use yogease_lib::core::config::Config;
use yogease_lib::core::consent::StaticPermission;
use yogease_lib::core::session::PracticeSession;
use yogease_lib::models::permission::PermissionState;
use yogease_lib::models::pose::{Landmark, LandmarkFrame};
use yogease_lib::ui::footer::current_year;
use yogease_lib::ui::navbar::Navbar;
use yogease_lib::ui::pages::landing::landing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    yogease_lib::init_logging();

    let out_dir: PathBuf = std::env::temp_dir().join("yogease_pages");
    std::fs::create_dir_all(&out_dir)?;

    println!("=== Rendering Pages ===\n");

    let mut navbar = Navbar::new();
    let landing_path = out_dir.join("landing.html");
    std::fs::write(&landing_path, landing(&navbar, current_year()))?;
    println!("✓ Landing page: {}", landing_path.display());

    navbar.toggle();
    let menu_path = out_dir.join("landing_menu_open.html");
    std::fs::write(&menu_path, landing(&navbar, current_year()))?;
    println!("✓ Landing page with menu open: {}", menu_path.display());
    navbar.close();

    // No endpoint: the practice page shows the placeholder verdict
    let (mut session, feed) = PracticeSession::enter_host_fed(Config::default(), None).await;
    let camera = StaticPermission::new(PermissionState::Prompt, true);
    session.mount_consent(&camera).await;

    let consent_path = out_dir.join("practice_consent.html");
    std::fs::write(&consent_path, session.render(&navbar))?;
    println!("✓ Practice page with consent dialog: {}", consent_path.display());

    session.request_camera_access(&camera).await;

    let landmarks: Vec<Landmark> = (0..33)
        .map(|i| Landmark::new(0.5, 0.1 + i as f32 * 0.025, 0.0, 0.9))
        .collect();
    let mut keypoints = session.bridge().keypoints();
    feed.push(LandmarkFrame::detected(landmarks));
    keypoints.changed().await?;

    let practice_path = out_dir.join("practice.html");
    std::fs::write(&practice_path, session.render(&navbar))?;
    println!("✓ Practice page: {}", practice_path.display());

    if let Some(png) = session.overlay_png() {
        let overlay_path = out_dir.join("overlay.png");
        std::fs::write(&overlay_path, png)?;
        println!("✓ Skeleton overlay: {}", overlay_path.display());
    }

    session.leave().await;
    Ok(())
}
