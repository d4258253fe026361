// Site footer

use chrono::Datelike;

pub fn footer(year: i32) -> String {
    format!(
        r##"<footer class="bg-black/10 backdrop-blur-lg border-t border-white/10"><div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-12"><div class="grid grid-cols-1 md:grid-cols-4 gap-8"><div class="space-y-4"><h3 class="text-white font-medium text-lg">YogEase</h3><p class="text-gray-400 text-sm">Revolutionizing yoga practice with AI-powered pose detection and correction.</p></div><div><h4 class="text-white font-medium mb-4">Quick Links</h4><ul class="space-y-2"><li><a href="/" class="text-gray-400 hover:text-white text-sm transition-colors">Home</a></li><li><a href="#features" class="text-gray-400 hover:text-white text-sm transition-colors">Features</a></li><li><a href="#how-it-works" class="text-gray-400 hover:text-white text-sm transition-colors">How It Works</a></li></ul></div><div><h4 class="text-white font-medium mb-4">Support</h4><ul class="space-y-2"><li><a href="#" class="text-gray-400 hover:text-white text-sm transition-colors">FAQ</a></li><li><a href="#" class="text-gray-400 hover:text-white text-sm transition-colors">Contact</a></li><li><a href="#" class="text-gray-400 hover:text-white text-sm transition-colors">Privacy Policy</a></li></ul></div><div><h4 class="text-white font-medium mb-4">Follow Us</h4><div class="flex space-x-4"><a href="#" class="text-gray-400 hover:text-white transition-colors rounded-xl" aria-label="Twitter">Twitter</a><a href="#" class="text-gray-400 hover:text-white transition-colors rounded-xl" aria-label="Facebook">Facebook</a><a href="#" class="text-gray-400 hover:text-white transition-colors rounded-xl" aria-label="Instagram">Instagram</a></div></div></div><div class="mt-8 pt-8 border-t border-white/10"><p class="text-center text-gray-400 text-sm">&copy; {year} YogEase. All rights reserved. Made in NSUT</p></div></div></footer>"##
    )
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Footer stamped with the current local year
pub fn footer_now() -> String {
    footer(current_year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_contains_year_and_links() {
        let html = footer(2025);
        assert!(html.contains("&copy; 2025 YogEase."));
        assert!(html.contains(r##"href="#how-it-works""##));
        assert!(html.contains("Privacy Policy"));
    }

    #[test]
    fn test_footer_now_uses_current_year() {
        let year = current_year();
        assert!(footer_now().contains(&format!("&copy; {} YogEase.", year)));
    }
}
