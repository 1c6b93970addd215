//! Vocabulary Extraction
//!
//! Derives ranked key terms from the topic and audience strings.
//!
//! ## Salience
//!
//! | Source                          | Score                      |
//! |---------------------------------|----------------------------|
//! | Adjacent topic word pair        | 4.5                        |
//! | Topic word at position `p`      | 3.0 + 1 / (1 + p)          |
//! | Domain lexicon term             | 2.0                        |
//! | Audience word                   | 1.0                        |
//!
//! Repeats accumulate. Ranking is a stable descending sort, so equal scores
//! keep the order in which terms were first seen. The generic fallback list
//! is kept separately and used to pad chapters when the ranked list runs out.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

const PHRASE_SCORE: f64 = 4.5;
const TOPIC_WORD_SCORE: f64 = 3.0;
const DOMAIN_TERM_SCORE: f64 = 2.0;
const AUDIENCE_WORD_SCORE: f64 = 1.0;

/// How many times a term may appear in one chapter's term list when the
/// combined vocabulary is too small to fill it with distinct terms.
pub const MAX_TERM_REPEATS: usize = 2;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "for", "and", "or", "to", "in", "on", "with", "by", "at",
    "from", "into", "about", "as", "is", "are", "its", "their", "your", "our", "via",
    "introduction", "intro", "basics", "fundamentals", "guide", "course", "book",
    "handbook", "primer", "study", "studies", "students", "student", "learners",
    "learner", "beginners", "beginner", "undergraduate", "undergraduates", "graduate",
    "postgraduate", "level", "year", "semester", "people", "readers", "everyone",
];

/// Generic terms used when the topic yields too few.
const GENERIC_TERMS: &[&str] = &[
    "Core Principle",
    "Conceptual Framework",
    "Mental Model",
    "Case Study",
    "Trade-off",
    "Benchmark",
    "Workflow",
    "Constraint",
    "Evaluation Criteria",
    "Best Practice",
    "Problem Solving",
    "Systems Thinking",
    "Assumption",
    "Variable",
    "Feedback Loop",
    "Limitation",
];

/// Static domain lexicon: trigger prefixes and the terms they contribute.
const DOMAIN_LEXICON: &[(&[&str], &[&str])] = &[
    (
        &["thermal", "heat", "thermo"],
        &["Heat Transfer", "Thermodynamic Cycle", "Entropy", "Enthalpy", "Specific Heat", "Steam Tables", "Thermal Efficiency"],
    ),
    (
        &["engineer", "mechanic"],
        &["Design Constraint", "Factor of Safety", "Tolerance Analysis", "System Efficiency"],
    ),
    (
        &["data", "analytic", "statistic"],
        &["Dataset", "Feature Engineering", "Sampling Bias", "Regression", "Visualization", "Model Evaluation"],
    ),
    (
        &["machine", "learning", "ai", "artificial", "neural"],
        &["Training Data", "Overfitting", "Loss Function", "Generalization"],
    ),
    (
        &["software", "program", "computer", "coding", "computing"],
        &["Abstraction", "Algorithm", "Data Structure", "Testing Strategy", "Complexity"],
    ),
    (
        &["financ", "econom", "account", "money", "invest"],
        &["Cash Flow", "Interest Rate", "Risk", "Return on Investment", "Inflation"],
    ),
    (
        &["bio", "cell", "genetic", "life"],
        &["Cell Structure", "Homeostasis", "Gene Expression", "Metabolism"],
    ),
    (
        &["chem"],
        &["Reaction Rate", "Chemical Equilibrium", "Stoichiometry", "Catalyst"],
    ),
    (
        &["physic", "motion", "dynamics"],
        &["Force", "Energy Conservation", "Momentum", "Friction"],
    ),
    (
        &["manag", "business", "marketing", "entrepreneur"],
        &["Stakeholder", "Value Proposition", "Strategy", "Market Segment"],
    ),
    (
        &["electr", "circuit"],
        &["Voltage", "Current", "Resistance", "Circuit Analysis"],
    ),
    (
        &["histor", "politic", "societ", "civics"],
        &["Primary Source", "Chronology", "Causation", "Historiography"],
    ),
];

fn token_pattern() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}]+(?:[.'\-][\p{L}\p{N}]+)*").expect("token pattern is valid")
    })
}

// ============================================================================
// Vocabulary
// ============================================================================

/// Ranked key terms plus the generic fallback list. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    key_terms: Vec<String>,
    fallback_terms: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from explicit parts.
    ///
    /// An empty fallback list is replaced with the built-in generic terms,
    /// and an empty key list borrows from the fallback list.
    pub fn from_parts(key_terms: Vec<String>, fallback_terms: Vec<String>) -> Self {
        let fallback_terms = if fallback_terms.is_empty() {
            GENERIC_TERMS.iter().map(|t| t.to_string()).collect()
        } else {
            fallback_terms
        };
        let key_terms = if key_terms.is_empty() {
            log::debug!("No salient terms extracted, borrowing generic terms");
            fallback_terms.iter().take(4).cloned().collect()
        } else {
            key_terms
        };
        Self {
            key_terms,
            fallback_terms,
        }
    }

    /// Ranked key terms, most salient first.
    pub fn key_terms(&self) -> &[String] {
        &self.key_terms
    }

    /// Generic terms used for padding.
    pub fn fallback_terms(&self) -> &[String] {
        &self.fallback_terms
    }

    /// The most salient term.
    pub fn primary(&self) -> &str {
        self.key_terms
            .first()
            .or_else(|| self.fallback_terms.first())
            .map(String::as_str)
            .unwrap_or("Core Principle")
    }

    /// Pick `count` terms for a chapter.
    ///
    /// Starts at a chapter-dependent rotation of the ranked list so chapters
    /// lead with different terms, then pads from the fallback list. Terms only
    /// repeat once every distinct term is used, and never more than
    /// [`MAX_TERM_REPEATS`] times, so the result may be shorter than `count`
    /// for a tiny vocabulary.
    pub fn chapter_terms(&self, chapter_index: u32, count: usize) -> Vec<String> {
        let offset = (chapter_index.saturating_sub(1) as usize) % self.key_terms.len().max(1);
        let rotated = self.key_terms[offset..]
            .iter()
            .chain(self.key_terms[..offset].iter());

        let mut distinct: Vec<&String> = Vec::new();
        for term in rotated.chain(self.fallback_terms.iter()) {
            if !distinct.iter().any(|t| t.eq_ignore_ascii_case(term)) {
                distinct.push(term);
            }
        }

        let mut out: Vec<String> = Vec::with_capacity(count);
        'rounds: for _ in 0..MAX_TERM_REPEATS {
            for term in &distinct {
                if out.len() >= count {
                    break 'rounds;
                }
                out.push((*term).clone());
            }
        }
        out
    }
}

// ============================================================================
// Extractor
// ============================================================================

#[derive(Debug)]
struct Candidate {
    surface: String,
    score: f64,
}

/// Extracts a [`Vocabulary`] from topic and audience strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct VocabularyExtractor;

impl VocabularyExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract ranked key terms.
    pub fn extract(&self, topic: &str, audience: &str) -> Vocabulary {
        let mut candidates: IndexMap<String, Candidate> = IndexMap::new();

        let topic_tokens = tokenize(topic);
        let topic_words: Vec<String> = topic_tokens.iter().flatten().cloned().collect();

        // Phrases only span words that were adjacent in the input
        for pair in topic_tokens.windows(2) {
            if let [Some(first), Some(second)] = pair {
                let phrase = format!("{first} {second}");
                add_candidate(&mut candidates, &phrase, PHRASE_SCORE);
            }
        }
        for (position, word) in topic_words.iter().enumerate() {
            add_candidate(
                &mut candidates,
                word,
                TOPIC_WORD_SCORE + 1.0 / (1.0 + position as f64),
            );
        }

        for terms in domain_terms(&topic_words) {
            add_candidate(&mut candidates, terms, DOMAIN_TERM_SCORE);
        }

        for word in content_words(audience) {
            add_candidate(&mut candidates, &word, AUDIENCE_WORD_SCORE);
        }

        let mut ranked: Vec<Candidate> = candidates.into_values().collect();
        // sort_by is stable: equal scores keep first-seen order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        let key_terms = ranked.into_iter().map(|c| c.surface).collect();
        let fallback = GENERIC_TERMS.iter().map(|t| t.to_string()).collect();

        Vocabulary::from_parts(key_terms, fallback)
    }
}

fn add_candidate(candidates: &mut IndexMap<String, Candidate>, surface: &str, score: f64) {
    let key = surface.to_lowercase();
    candidates
        .entry(key)
        .and_modify(|c| c.score += score)
        .or_insert_with(|| Candidate {
            surface: display_case(surface),
            score,
        });
}

/// Tokenize, marking stop words and single characters as `None`.
fn tokenize(text: &str) -> Vec<Option<String>> {
    let normalized: String = text.nfkc().collect();
    token_pattern()
        .find_iter(&normalized)
        .map(|m| {
            let word = m.as_str();
            let keep = word.chars().count() >= 2
                && !STOP_WORDS.contains(&word.to_lowercase().as_str());
            keep.then(|| word.to_string())
        })
        .collect()
}

fn content_words(text: &str) -> Vec<String> {
    tokenize(text).into_iter().flatten().collect()
}

fn domain_terms(topic_words: &[String]) -> Vec<&'static str> {
    let lowered: Vec<String> = topic_words.iter().map(|w| w.to_lowercase()).collect();
    DOMAIN_LEXICON
        .iter()
        .filter(|(triggers, _)| {
            lowered
                .iter()
                .any(|w| triggers.iter().any(|t| w.starts_with(t)))
        })
        .flat_map(|(_, terms)| terms.iter().copied())
        .collect()
}

/// Capitalize words that arrive fully lowercase; leave mixed case alone.
fn display_case(surface: &str) -> String {
    surface
        .split(' ')
        .map(|word| {
            if word.chars().any(|c| c.is_uppercase()) {
                word.to_string()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
