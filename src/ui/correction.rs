// Real-time correction feedback panels

use super::escape;

/// Number of feedback lines shown at once
pub const CORRECTION_LINE_LIMIT: usize = 2;

const HOME_ICON: &str = r#"<svg class="w-6 h-6 text-green-500" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M5 12H3l9-9 9 9h-2m-8 5v-8" /><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M7 17h10v4H7v-4z" /></svg>"#;

/// First `limit` non-blank lines of the feedback, in order
pub fn correction_lines(feedback: &str, limit: usize) -> Vec<&str> {
    feedback
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct PanelStyle {
    ready: &'static str,
    active: &'static str,
}

const DESKTOP: PanelStyle = PanelStyle {
    ready: "rounded-2xl bg-black/30 p-6 border border-white/10 mt-4",
    active: "rounded-2xl bg-black/50 p-6 border border-white/20 mt-4",
};

const MOBILE: PanelStyle = PanelStyle {
    ready: "rounded-3xl bg-black/30 backdrop-blur-lg p-6 border border-white/10 mt-4",
    active: "rounded-3xl bg-black/50 backdrop-blur-lg p-6 border border-white/20 mt-4",
};

/// Corrections panel under the desktop camera view
pub fn pose_corrections(feedback: &str) -> String {
    render_panel(feedback, DESKTOP)
}

/// Corrections panel docked at the bottom of the mobile layout
pub fn pose_corrections_mobile(feedback: &str) -> String {
    render_panel(feedback, MOBILE)
}

fn render_panel(feedback: &str, style: PanelStyle) -> String {
    if feedback.is_empty() {
        return panel(
            style.ready,
            r#"<span class="text-yellow-500 font-medium">Ready</span>"#,
            "<li>No Pose Detected</li>".to_string(),
        );
    }

    let items: String = correction_lines(feedback, CORRECTION_LINE_LIMIT)
        .into_iter()
        .map(|line| format!("<li>{}</li>", escape(line)))
        .collect();

    panel(
        style.active,
        r#"<span class="text-green-500 font-medium">Active</span>"#,
        items,
    )
}

fn panel(container_class: &str, badge: &str, items: String) -> String {
    format!(
        r#"<div class="{container_class}"><div class="flex items-center justify-between mb-4"><h2 class="text-2xl font-medium">Real-time Corrections</h2><div class="flex items-center gap-2">{HOME_ICON}{badge}</div></div><ul class="space-y-2 font-mono text-gray-300">{items}</ul></div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correction_lines_skip_blanks_and_keep_order() {
        let feedback = "\nGood effort! Some adjustments will help perfect your pose.\n   \nAdjust your left arm: slightly raise it.\nTry to maintain a more consistent depth in your pose.";
        assert_eq!(
            correction_lines(feedback, CORRECTION_LINE_LIMIT),
            vec![
                "Good effort! Some adjustments will help perfect your pose.",
                "Adjust your left arm: slightly raise it.",
            ]
        );
    }

    #[test]
    fn test_single_line_feedback() {
        assert_eq!(
            correction_lines("Perfect form! Keep holding this position.", 2),
            vec!["Perfect form! Keep holding this position."]
        );
        assert!(correction_lines("", 2).is_empty());
    }

    #[test]
    fn test_empty_feedback_shows_ready_placeholder() {
        for html in [pose_corrections(""), pose_corrections_mobile("")] {
            assert!(html.contains("Ready"));
            assert!(html.contains("<li>No Pose Detected</li>"));
            assert!(!html.contains("Active"));
        }
    }

    #[test]
    fn test_feedback_shows_at_most_two_lines() {
        let html = pose_corrections("Line one\n\nLine two\nLine three");
        assert!(html.contains("Active"));
        assert!(html.contains("<li>Line one</li><li>Line two</li>"));
        assert!(!html.contains("Line three"));
        assert!(!html.contains("No Pose Detected"));
    }

    #[test]
    fn test_feedback_is_escaped() {
        let html = pose_corrections_mobile("Keep <spine> straight");
        assert!(html.contains("<li>Keep &lt;spine&gt; straight</li>"));
    }
}
