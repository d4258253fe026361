// Top navigation bar with a collapsible mobile menu

use serde::{Deserialize, Serialize};

const LINKS: [(&str, &str); 3] = [
    ("/", "Home"),
    ("#features", "Features"),
    ("#how-it-works", "How It Works"),
];

const CTA: (&str, &str) = ("/yoga", "Try Now");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navbar {
    pub is_open: bool,
}

impl Navbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn render(&self) -> String {
        let desktop_links: String = LINKS
            .iter()
            .map(|(href, label)| {
                format!(
                    r#"<a href="{href}" class="text-gray-300 hover:text-white px-3 py-2 rounded-xl text-sm font-medium transition-colors">{label}</a>"#
                )
            })
            .collect();

        let (cta_href, cta_label) = CTA;
        let (toggle_label, toggle_icon) = if self.is_open {
            ("Close menu", "&#x2715;")
        } else {
            ("Open menu", "&#x2630;")
        };

        let mut html = format!(
            r#"<nav class="fixed w-full z-50 bg-black/10 backdrop-blur-lg border-b border-white/10"><div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8"><div class="flex items-center justify-between h-16"><div class="flex items-center"><a href="/" class="text-white font-medium text-xl">YogEase</a></div><div class="hidden md:block"><div class="ml-10 flex items-baseline space-x-4">{desktop_links}<a href="{cta_href}" class="bg-primary hover:bg-primary/90 text-white px-4 py-2 rounded-xl text-sm font-medium transition-colors">{cta_label}</a></div></div><div class="md:hidden"><button data-action="toggle-menu" aria-label="{toggle_label}" aria-expanded="{open}" class="text-gray-300 hover:text-white p-2 rounded-xl">{toggle_icon}</button></div></div></div>"#,
            open = self.is_open,
        );

        if self.is_open {
            let mobile_links: String = LINKS
                .iter()
                .map(|(href, label)| {
                    format!(
                        r#"<a href="{href}" class="text-gray-300 hover:text-white block px-3 py-2 rounded-xl text-base font-medium">{label}</a>"#
                    )
                })
                .collect();
            html.push_str(&format!(
                r#"<div class="md:hidden bg-black/10 backdrop-blur-lg"><div class="px-2 pt-2 pb-3 space-y-1 sm:px-3">{mobile_links}<a href="{cta_href}" class="bg-primary hover:bg-primary/90 text-white block px-3 py-2 rounded-xl text-base font-medium">{cta_label}</a></div></div>"#
            ));
        }

        html.push_str("</nav>");
        html
    }
}
