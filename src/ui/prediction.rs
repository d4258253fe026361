// Pose analysis panels: reference image, accuracy bar and keypoint table

use super::escape;
use crate::models::catalog;
use crate::models::pose::{Keypoint, PoseResult};

/// Name shown for a verdict: the catalog name for known classes, otherwise
/// whatever the classifier called it
pub fn display_name(pose: &PoseResult) -> &str {
    catalog::lookup(pose.predicted_class)
        .map(|info| info.name)
        .unwrap_or(pose.predicted_pose.as_str())
}

fn accuracy_bar(accuracy: i64) -> String {
    format!(
        r#"<div class="h-full bg-primary transition-all duration-300" style="width: {accuracy}%"></div>"#
    )
}

/// Desktop pose analysis panel
pub fn pose_prediction(keypoints: &[Keypoint], pose: &PoseResult, threshold: i64) -> String {
    let accuracy = pose.accuracy_percent();
    let detected = accuracy >= threshold;

    let view = if detected {
        format!(
            r#"<img src="{}" alt="{}" class="object-cover w-full h-full" />"#,
            escape(catalog::image_for(pose.predicted_class)),
            escape(&pose.predicted_pose),
        )
    } else {
        r#"<div class="absolute inset-0 bg-white/10 flex items-center justify-center flex-col"><p class="text-xl font-medium text-white text-center">No pose detected</p><p class="text-sm text-white/70 text-center mt-2">Try with Padmasana maybe</p></div>"#.to_string()
    };

    let title = if detected {
        escape(display_name(pose))
    } else {
        "No pose detected".to_string()
    };

    let rows: String = keypoints
        .iter()
        .map(|kp| {
            format!(
                r#"<tr class="text-gray-300 border-t border-white/10"><td class="py-2">{}</td><td class="py-2">{}</td><td class="py-2">{}</td><td class="py-2">{}</td></tr>"#,
                kp.point,
                escape(&kp.x),
                escape(&kp.y),
                escape(&kp.z),
            )
        })
        .collect();

    format!(
        r#"<div class="rounded-3xl bg-black/30 backdrop-blur-lg p-6 border border-white/10"><h2 class="text-2xl font-medium mb-4">Pose Analysis</h2><div class="mb-6"><div class="space-y-4"><div class="aspect-square rounded-2xl overflow-hidden bg-black/50 relative">{view}</div><div class="space-y-2"><h3 class="text-xl font-medium">{title}</h3><div class="flex items-center space-x-2"><div class="flex-1 h-2 bg-black/30 rounded-full overflow-hidden">{bar}</div><span class="text-sm font-medium">{accuracy}%</span></div></div></div></div><div class="mt-4"><h3 class="text-lg font-medium mb-2">Keypoints Data</h3><div class="max-h-[100px] overflow-y-auto"><table class="w-full text-sm"><thead><tr class="text-gray-400"><th class="text-left py-2">Point</th><th class="text-left py-2">X</th><th class="text-left py-2">Y</th><th class="text-left py-2">Z</th></tr></thead><tbody>{rows}</tbody></table></div></div></div>"#,
        bar = accuracy_bar(accuracy),
    )
}

/// Compact mobile overlay: name, accuracy and bar
pub fn pose_prediction_mobile(pose: &PoseResult) -> String {
    let accuracy = pose.accuracy_percent();
    format!(
        r#"<div class="absolute top-24 left-4 right-4 bg-black/40 backdrop-blur-lg rounded-xl p-4"><div class="flex items-center justify-between mb-2"><h3 class="text-sm font-medium">{name}</h3><span class="text-sm font-medium">{accuracy}%</span></div><div class="h-2 bg-black/30 rounded-full overflow-hidden">{bar}</div></div>"#,
        name = escape(display_name(pose)),
        bar = accuracy_bar(accuracy),
    )
}
