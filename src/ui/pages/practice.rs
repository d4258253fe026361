// Practice page: camera view, corrections and pose analysis

use super::PAGE_BACKGROUND;
use crate::models::pose::{Keypoint, PoseResult};
use crate::ui::correction::{pose_corrections, pose_corrections_mobile};
use crate::ui::navbar::Navbar;
use crate::ui::prediction::{pose_prediction, pose_prediction_mobile};

const PRIVACY_PROMISES: [&str; 3] = [
    "Your video stream never leaves your device",
    "No recordings are stored or transmitted",
    "All processing is done locally on your device",
];

/// Everything the practice page is drawn from
#[derive(Debug, Clone, Copy)]
pub struct PracticeView<'a> {
    pub navbar: &'a Navbar,
    pub show_consent: bool,
    pub keypoints: &'a [Keypoint],
    pub pose: &'a PoseResult,
    pub accuracy_threshold: i64,
}

pub fn consent_dialog() -> String {
    let promises: String = PRIVACY_PROMISES
        .iter()
        .map(|promise| {
            format!(
                r#"<li class="flex items-center"><span class="w-4 h-4 text-primary mr-2">&#x2713;</span><span>{promise}</span></li>"#
            )
        })
        .collect();

    format!(
        r#"<div role="dialog" aria-modal="true" class="fixed inset-0 z-50 flex items-center justify-center bg-black/60"><div class="bg-black/80 backdrop-blur-xl border border-white/10 p-8 rounded-3xl max-w-2xl"><div class="text-center space-y-6"><h2 class="text-2xl font-medium">Camera Access Required</h2><div class="aspect-video rounded-2xl overflow-hidden mb-6"><img src="https://images.unsplash.com/photo-1603988363607-e1e4a66962c6" alt="Privacy" class="w-full h-full object-cover" /></div><div class="text-gray-400 text-sm space-y-4"><p>YogEase needs access to your camera to provide real-time pose detection and feedback. We value your privacy and ensure that:</p><ul class="space-y-2">{promises}</ul></div><button data-action="request-camera" class="bg-primary hover:bg-primary/90 text-white px-8 py-4 rounded-xl text-sm font-medium transition-all w-full">I Understand, Enable Camera</button></div></div></div>"#
    )
}

fn desktop_layout(view: &PracticeView<'_>) -> String {
    format!(
        r#"<div class="hidden md:grid md:grid-cols-[5fr,2fr] gap-6"><div class="rounded-3xl bg-black/30 backdrop-blur-lg p-4 border border-white/10 h-full"><div class="aspect-video relative rounded-2xl overflow-hidden bg-black/50"><video id="camera-video" class="absolute inset-0 w-full h-full object-cover" autoplay muted playsinline></video><canvas id="camera-overlay" class="absolute inset-0 w-full h-full"></canvas></div>{corrections}</div><div class="space-y-6">{prediction}</div></div>"#,
        corrections = pose_corrections(&view.pose.correction_feedback),
        prediction = pose_prediction(view.keypoints, view.pose, view.accuracy_threshold),
    )
}

fn mobile_layout(view: &PracticeView<'_>) -> String {
    format!(
        r#"<div class="md:hidden relative h-screen -mt-20"><div class="absolute inset-0 bg-black/50"><div class="h-full flex flex-col items-center justify-center"><video id="camera-video-mobile" class="absolute inset-0 w-full h-full object-cover" autoplay muted playsinline></video></div></div>{prediction}<div class="absolute bottom-0 left-0 right-0 bg-black/40 backdrop-blur-lg rounded-t-3xl p-2">{corrections}</div></div>"#,
        prediction = pose_prediction_mobile(view.pose),
        corrections = pose_corrections_mobile(&view.pose.correction_feedback),
    )
}

pub fn practice(view: &PracticeView<'_>) -> String {
    let dialog = if view.show_consent {
        consent_dialog()
    } else {
        String::new()
    };

    format!(
        r#"<div class="min-h-screen bg-gradient-to-br from-[#1c1c1c] to-[#2d2d2d] text-white">{PAGE_BACKGROUND}{nav}{dialog}<main class="pt-20 px-4 pb-12"><div class="max-w-7xl mx-auto">{desktop}{mobile}</div></main></div>"#,
        nav = view.navbar.render(),
        desktop = desktop_layout(view),
        mobile = mobile_layout(view),
    )
}
