//! Brand voice selection and marketing copy
//!
//! A voice is picked by keyword match against free-form text; the first of
//! bold, eco, luxury and wellness whose keywords appear wins, otherwise the
//! universal voice is used. Phrases are drawn from the voice with a seeded
//! RNG so callers can pin the output.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::sync::OnceLock;
use utoipa::ToSchema;

/// A named bundle of adjectives, vibes and calls to action
#[derive(Debug)]
pub struct Voice {
    pub id: &'static str,
    /// Case-insensitive alternation of trigger keywords
    pub keywords: &'static str,
    pub adjectives: &'static [&'static str],
    pub vibes: &'static [&'static str],
    pub ctas: &'static [&'static str],
}

pub static KEYWORD_VOICES: [Voice; 4] = [
    Voice {
        id: "bold",
        keywords: "performance|power|bold|sport|speed|pro|max",
        adjectives: &["Bold", "Unstoppable", "Fearless", "Uncompromising"],
        vibes: &[
            "Built for those who refuse limits",
            "Engineered to outperform expectations",
            "Made for moments that demand more",
        ],
        ctas: &[
            "Claim yours today",
            "Level up your performance",
            "Join the power movement",
        ],
    },
    Voice {
        id: "eco",
        keywords: "eco|green|sustainable|organic|earth|planet|nature|clean",
        adjectives: &["Natural", "Pure", "Eco-Luxe", "Conscious"],
        vibes: &[
            "Where sustainability meets style",
            "Designed to respect the planet",
            "A cleaner choice for modern living",
        ],
        ctas: &[
            "Choose the greener upgrade",
            "Make the conscious switch",
            "Feel-good design, delivered",
        ],
    },
    Voice {
        id: "luxury",
        keywords: "lux|luxury|artisan|premium|signature|limited",
        adjectives: &["Signature", "Artisanal", "Refined", "Curated"],
        vibes: &[
            "Crafted for uncompromised taste",
            "Because ordinary is never enough",
            "An elevated experience in every detail",
        ],
        ctas: &[
            "Reserve your limited drop",
            "Indulge in the experience",
            "Step into the signature collection",
        ],
    },
    Voice {
        id: "wellness",
        keywords: "wellness|calm|relax|balance|fresh|glow|self-care|mindful",
        adjectives: &["Radiant", "Restorative", "Mindful", "Balanced"],
        vibes: &[
            "Your daily ritual for feeling amazing",
            "Wellness that fits real life",
            "Designed to restore your natural rhythm",
        ],
        ctas: &[
            "Refresh your routine",
            "Start your glow-up",
            "Make self-care non-negotiable",
        ],
    },
];

pub static UNIVERSAL_VOICE: Voice = Voice {
    id: "universal",
    keywords: "",
    adjectives: &["Smart", "Next-Level", "Game-Changing", "Inspired"],
    vibes: &[
        "Designed for the modern creator",
        "Innovation you can feel instantly",
        "Built to elevate your every day",
    ],
    ctas: &[
        "Unlock the full experience",
        "Make it yours today",
        "Create your highlight moment",
    ],
};

pub const DESCRIPTOR_FRAGMENTS: &[&str] = &[
    "crafted with intention",
    "designed for real-life impact",
    "built to stand out effortlessly",
    "powered by intuitive design",
    "engineered for human moments",
    "optimized for instant wow-factor",
];

pub const BENEFIT_FRAGMENTS: &[&str] = &[
    "Amplifies your brand presence in seconds",
    "Transforms simple ideas into standout visuals",
    "Turns honest moments into hero stories",
    "Helps your product spark immediate emotion",
    "Designed for social-ready storytelling",
    "Perfect for launch moments and quick campaigns",
];

pub const LAYOUT_HOOKS: &[&str] = &[
    "Optimized layout hierarchy keeps the spotlight on your hero image.",
    "Smart color pairing builds instant visual cohesion.",
    "Subtle depth layers generate premium perceived value.",
    "Asymmetric grid draws the eye to the CTA without stealing focus.",
    "Typography pairings tuned for high-contrast readability.",
];

fn matchers() -> &'static [(Regex, &'static Voice)] {
    static MATCHERS: OnceLock<Vec<(Regex, &'static Voice)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        KEYWORD_VOICES
            .iter()
            .filter_map(|voice| {
                match RegexBuilder::new(voice.keywords)
                    .case_insensitive(true)
                    .build()
                {
                    Ok(regex) => Some((regex, voice)),
                    Err(e) => {
                        tracing::warn!(voice = voice.id, %e, "Invalid voice keywords, skipping");
                        None
                    }
                }
            })
            .collect()
    })
}

/// The first keyword voice matching `text`, or the universal voice
pub fn pick_voice(text: &str) -> &'static Voice {
    matchers()
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, voice)| *voice)
        .unwrap_or(&UNIVERSAL_VOICE)
}

/// One line of the agent's rationale shown next to the poster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AgentInsight {
    pub title: String,
    pub detail: String,
}

/// Inputs summarized by [`Copywriter::generate_insights`]
#[derive(Debug, Clone, Copy)]
pub struct InsightRequest<'a> {
    pub product_name: &'a str,
    pub description: &'a str,
    /// Extracted palette as hex strings, most dominant first
    pub palette: &'a [String],
    pub tagline: &'a str,
    pub call_to_action: &'a str,
}

/// Copy generator with an explicit random source
pub struct Copywriter {
    rng: StdRng,
}

impl Copywriter {
    /// Deterministic output for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, otherwise from entropy
    pub fn with_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    fn pick(&mut self, list: &[&'static str]) -> &'static str {
        list.choose(&mut self.rng).copied().unwrap_or_default()
    }

    /// `"{adjective} {name}. {vibe}."` in the voice of name + description
    pub fn craft_tagline(&mut self, product_name: &str, description: &str) -> String {
        let voice = pick_voice(&format!("{product_name} {description}"));
        let adjective = self.pick(voice.adjectives);
        let vibe = self.pick(voice.vibes);
        format!("{adjective} {product_name}. {vibe}.")
    }

    /// A call to action in the voice of the description alone
    pub fn craft_call_to_action(&mut self, description: &str) -> String {
        let voice = pick_voice(description);
        self.pick(voice.ctas).to_string()
    }

    pub fn describe_feature_highlight(&mut self) -> String {
        self.pick(DESCRIPTOR_FRAGMENTS).to_string()
    }

    pub fn generate_insights(&mut self, request: &InsightRequest<'_>) -> Vec<AgentInsight> {
        let voice = pick_voice(request.description);
        let palette_description = if request.palette.is_empty() {
            "dynamic neutrals".to_string()
        } else {
            request
                .palette
                .iter()
                .take(3)
                .map(|color| color.to_uppercase())
                .collect::<Vec<_>>()
                .join(", ")
        };

        vec![
            AgentInsight {
                title: "Brand Voice Detected".to_string(),
                detail: format!(
                    "Aligned with a {} tone to keep {} feeling authentic.",
                    voice.id, request.product_name
                ),
            },
            AgentInsight {
                title: "Palette Strategy".to_string(),
                detail: format!(
                    "Dominant colors locked: {palette_description}. Contrast curve tuned for scroll-stopping impact."
                ),
            },
            AgentInsight {
                title: "Copywriting Pass".to_string(),
                detail: format!(
                    "Tagline generated as \u{201c}{}\u{201d} with CTA \u{201c}{}\u{201d}.",
                    request.tagline, request.call_to_action
                ),
            },
            AgentInsight {
                title: "Layout Rationale".to_string(),
                detail: self.pick(LAYOUT_HOOKS).to_string(),
            },
            AgentInsight {
                title: "Launch Checklist".to_string(),
                detail: self.pick(BENEFIT_FRAGMENTS).to_string(),
            },
        ]
    }
}
