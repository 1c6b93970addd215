//! Tone and Audience Profiles
//!
//! Free-text tone and audience strings are reduced to a small profile that
//! selects phrasing registers and localises examples. Parsing is keyword based
//! and case-insensitive; unknown text maps to the neutral defaults.

use serde::{Deserialize, Serialize};

/// Phrasing register for generated prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Register {
    /// Formal, citation-style phrasing
    Academic,
    /// Warm second-person phrasing ("you will notice...")
    Conversational,
    #[default]
    Neutral,
}

impl Register {
    /// Parse a register from a tone description.
    ///
    /// "Humanized" wins over "academic" when both appear, since the
    /// conversational templates still keep an instructive voice.
    pub fn from_tone(tone: &str) -> Self {
        let lower = tone.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["human", "conversational", "friendly", "casual", "warm", "engaging"]) {
            Self::Conversational
        } else if has(&["academic", "formal", "scholarly", "rigorous", "technical"]) {
            Self::Academic
        } else {
            Self::Neutral
        }
    }
}

/// Known regions used to localise examples.
const REGIONS: &[&str] = &[
    "India", "Nigeria", "Kenya", "South Africa", "Brazil", "Mexico", "Canada",
    "Australia", "Germany", "France", "Japan", "Singapore", "Indonesia", "Philippines",
    "Pakistan", "Bangladesh", "UK", "USA",
];

/// Reduced view of tone and audience strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneProfile {
    pub register: Register,
    /// Tone asks for exam preparation (mark schemes, revision tips)
    pub exam_oriented: bool,
    /// Region named in the audience or tone, if any
    pub region: Option<String>,
    /// Audience label used in prose, never empty
    pub audience_label: String,
}

impl ToneProfile {
    /// Build a profile from the raw audience and tone strings.
    pub fn from_inputs(audience: &str, tone: &str) -> Self {
        let audience_label = match audience.trim() {
            "" => "general readers".to_string(),
            trimmed => trimmed.to_string(),
        };

        Self {
            register: Register::from_tone(tone),
            exam_oriented: tone.to_lowercase().contains("exam"),
            region: detect_region(audience).or_else(|| detect_region(tone)),
            audience_label,
        }
    }

    /// Currency symbol for worked examples.
    pub fn currency(&self) -> &'static str {
        match self.region.as_deref() {
            Some("India") => "₹",
            Some("UK") => "£",
            Some("Germany") | Some("France") => "€",
            Some("Japan") => "¥",
            _ => "$",
        }
    }

    /// Setting phrase for worked examples ("a college lab in India").
    pub fn setting(&self) -> String {
        match &self.region {
            Some(region) => format!("in {region}"),
            None => "in a typical setting".to_string(),
        }
    }
}

fn detect_region(text: &str) -> Option<String> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric() && c != ' ')
        .flat_map(|s| s.split(' '))
        .filter(|s| !s.is_empty())
        .collect();
    let joined = format!(" {} ", words.join(" ").to_lowercase());

    REGIONS
        .iter()
        .find(|region| joined.contains(&format!(" {} ", region.to_lowercase())))
        .map(|r| r.to_string())
}
