// Landing page

use super::PAGE_BACKGROUND;
use crate::ui::footer::footer;
use crate::ui::navbar::Navbar;

struct Feature {
    title: &'static str,
    description: &'static str,
}

const FEATURES: [Feature; 3] = [
    Feature {
        title: "Real-time Detection",
        description: "Advanced AI technology that tracks your poses with precision and accuracy.",
    },
    Feature {
        title: "Instant Feedback",
        description: "Get immediate suggestions to improve your form and alignment.",
    },
    Feature {
        title: "Safe Practice",
        description: "Prevent injuries with proper form guidance and personalized adjustments.",
    },
];

struct Step {
    step: &'static str,
    title: &'static str,
    description: &'static str,
    image: &'static str,
}

const STEPS: [Step; 3] = [
    Step {
        step: "01",
        title: "Set Up Your Camera",
        description: "Position your device camera to capture your full body.",
        image: "https://images.unsplash.com/photo-1593810450967-f9c42742e326",
    },
    Step {
        step: "02",
        title: "Choose Your Pose",
        description: "Select from our library of yoga poses to practice.",
        image: "https://images.unsplash.com/photo-1506126613408-eca07ce68773",
    },
    Step {
        step: "03",
        title: "Get Real-time Feedback",
        description: "Receive instant corrections and improvements for your poses.",
        image: "https://images.unsplash.com/photo-1599447421416-3414500d18a5",
    },
];

fn hero() -> &'static str {
    r#"<section class="pt-32 pb-20 px-4 relative overflow-hidden"><div class="max-w-7xl mx-auto grid md:grid-cols-2 gap-12 items-center"><div class="text-left"><h1 class="text-5xl md:text-7xl font-medium mb-6 animate-fadeIn leading-tight">Perfect Your<span class="text-primary block"> Yoga Practice</span><span class="ai-text text-4xl md:text-6xl block mt-2 text-white/90">with AI Guidance</span></h1><p class="text-gray-400 text-lg md:text-xl mb-8 max-w-2xl animate-fadeIn typing-effect">Get real-time pose correction and personalized feedback to enhance your yoga journey.</p><a href="/yoga" class="inline-flex items-center bg-primary hover:bg-primary/90 text-white px-8 py-4 rounded-2xl text-lg font-medium transition-all animate-fadeIn">Try Now &rarr;</a></div><div class="relative w-full h-[400px] md:h-[600px]"><img src="https://images.unsplash.com/photo-1544367567-0f2fcb009e0b" alt="Yoga Pose" class="absolute inset-0 w-full h-full object-cover rounded-3xl hero-image" /></div></div></section>"#
}

fn features() -> String {
    let cards: String = FEATURES
        .iter()
        .map(|feature| {
            format!(
                r#"<div class="p-8 rounded-3xl bg-white/5 backdrop-blur-lg border border-white/10 hover:bg-white/10 transition-colors"><h3 class="text-2xl font-medium mb-2">{}</h3><p class="text-gray-400">{}</p></div>"#,
                feature.title, feature.description
            )
        })
        .collect();

    format!(
        r#"<section id="features" class="py-20 px-4"><div class="max-w-7xl mx-auto"><h2 class="text-4xl md:text-5xl font-medium text-center mb-12">Why Choose YogEase?</h2><div class="grid grid-cols-1 md:grid-cols-3 gap-8">{cards}</div></div></section>"#
    )
}

fn how_it_works() -> String {
    let steps: String = STEPS
        .iter()
        .map(|step| {
            format!(
                r#"<div class="group"><div class="rounded-3xl overflow-hidden aspect-[4/3] mb-8 relative"><div class="absolute inset-0 bg-gradient-to-t from-black/80 to-transparent z-10"></div><img src="{image}" alt="{title}" class="w-full h-full object-cover transition-transform duration-500 group-hover:scale-110" /><div class="absolute bottom-6 left-6 z-20"><span class="text-primary text-5xl font-bold opacity-90">{number}</span></div></div><h3 class="text-2xl font-medium mb-3">{title}</h3><p class="text-gray-400">{description}</p></div>"#,
                image = step.image,
                title = step.title,
                number = step.step,
                description = step.description,
            )
        })
        .collect();

    format!(
        r#"<section id="how-it-works" class="py-20 px-4 bg-black/20"><div class="max-w-7xl mx-auto"><h2 class="text-4xl md:text-5xl font-medium text-center mb-16">How It Works</h2><div class="grid grid-cols-1 md:grid-cols-3 gap-12">{steps}</div></div></section>"#
    )
}

fn call_to_action() -> &'static str {
    r#"<section class="py-20 px-4"><div class="max-w-3xl mx-auto text-center"><h2 class="text-4xl md:text-5xl font-medium mb-6">Ready to Transform Your Yoga Practice?</h2><p class="text-gray-400 text-lg mb-8">Join thousands of yogis who have improved their practice with YogEase.</p><a href="/yoga" class="inline-flex items-center bg-primary hover:bg-primary/90 text-white px-8 py-4 rounded-2xl text-lg font-medium transition-all">Get Started Now &rarr;</a></div></section>"#
}

pub fn landing(navbar: &Navbar, year: i32) -> String {
    format!(
        r#"<div class="min-h-screen bg-gradient-to-br from-[#1c1c1c] to-[#2d2d2d] text-white">{PAGE_BACKGROUND}<div class="fixed inset-0 ai-grid opacity-10 pointer-events-none"></div>{nav}{hero}{features}{steps}{cta}{footer}</div>"#,
        nav = navbar.render(),
        hero = hero(),
        features = features(),
        steps = how_it_works(),
        cta = call_to_action(),
        footer = footer(year),
    )
}
