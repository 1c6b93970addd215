//! Long-Form Text Synthesizer
//!
//! Assembles chapter prose from the sentence template library until the word
//! count lands inside the tolerance band around the target.
//!
//! ## Algorithm
//!
//! 1. Build the active template pool from the tone profile.
//! 2. Draw templates from a seeded deck without replacement; when the deck is
//!    empty it is reshuffled for the next cycle. Within a cycle no template
//!    is used twice.
//! 3. Group sentences into paragraphs of 3-8 and add them until the running
//!    word count reaches the lower band bound. A paragraph that would pass the
//!    upper bound is trimmed sentence by sentence.
//! 4. Stop at [`MAX_PARAGRAPHS`] regardless; a result still short of the band
//!    is returned with `bound_exceeded` set and a warning logged.
//!
//! The output is a pure function of `(title, audience, tone, seed, target)`.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::GenerationError;
use super::profile::ToneProfile;
use super::rng::{Seed, SeededRandom};
use super::sentences::{active_pool, fill, with_connective, CONNECTIVES};
use super::vocabulary::VocabularyExtractor;

// ============================================================================
// Constants
// ============================================================================

/// Paragraph delimiter in the joined text.
pub const PARAGRAPH_DELIMITER: &str = "\n\n";

/// Hard paragraph ceiling per call.
pub const MAX_PARAGRAPHS: usize = 160;

pub const MIN_SENTENCES_PER_PARAGRAPH: usize = 3;
pub const MAX_SENTENCES_PER_PARAGRAPH: usize = 8;

/// Band half-width as a divisor of the target (10%).
const TOLERANCE_DIVISOR: u32 = 10;

const CONNECTIVE_PROBABILITY: f64 = 0.3;

/// Number of vocabulary terms sentences draw from.
const TERM_POOL_SIZE: usize = 12;

/// Leading terms that fill the primary `{term}` slot.
const PRIMARY_TERM_WINDOW: usize = 8;

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Acceptable word counts for a target: target ± 10%.
pub fn tolerance_band(target_words: u32) -> RangeInclusive<usize> {
    let target = u64::from(target_words);
    let slack = target / u64::from(TOLERANCE_DIVISOR);
    let to_usize = |n: u64| usize::try_from(n).unwrap_or(usize::MAX);
    to_usize(target - slack)..=to_usize(target + slack)
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation flag, checked at paragraph boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ============================================================================
// Request / Result
// ============================================================================

/// Full argument tuple of one long-form generation. Also the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongFormRequest {
    pub title: String,
    pub audience: String,
    pub tone: String,
    pub seed: Seed,
    pub target_words: u32,
}

impl LongFormRequest {
    pub fn new(
        title: impl Into<String>,
        audience: impl Into<String>,
        tone: impl Into<String>,
        seed: Seed,
        target_words: u32,
    ) -> Self {
        Self {
            title: title.into(),
            audience: audience.into(),
            tone: tone.into(),
            seed,
            target_words,
        }
    }

    pub fn band(&self) -> RangeInclusive<usize> {
        tolerance_band(self.target_words)
    }
}

/// Generated chapter prose with its accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongFormText {
    /// Paragraphs joined by [`PARAGRAPH_DELIMITER`]
    pub text: String,
    /// Every sentence in order of appearance
    pub sentences: Vec<String>,
    /// Sentence count of each paragraph
    pub paragraph_lengths: Vec<usize>,
    /// Templates per draw cycle; sentences chunked by this size are cycles
    pub pool_size: usize,
    pub word_count: usize,
    pub target_words: u32,
    /// Paragraph ceiling reached before the tolerance band
    pub bound_exceeded: bool,
}

impl LongFormText {
    pub fn paragraph_count(&self) -> usize {
        self.paragraph_lengths.len()
    }

    /// Words missing to reach the lower band bound.
    pub fn shortfall(&self) -> usize {
        tolerance_band(self.target_words)
            .start()
            .saturating_sub(self.word_count)
    }

    /// Sentences grouped by template-pool cycle.
    pub fn cycles(&self) -> impl Iterator<Item = &[String]> {
        self.sentences.chunks(self.pool_size.max(1))
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.text.split(PARAGRAPH_DELIMITER)
    }
}

// ============================================================================
// Template Deck
// ============================================================================

/// Shuffled template indices drawn without replacement, reshuffled per cycle.
#[derive(Debug)]
struct TemplateDeck {
    order: Vec<usize>,
    next: usize,
    last: Option<usize>,
}

impl TemplateDeck {
    fn new(size: usize, rng: &mut SeededRandom) -> Self {
        Self {
            order: rng.permutation(size),
            next: 0,
            last: None,
        }
    }

    fn draw(&mut self, rng: &mut SeededRandom) -> usize {
        if self.next >= self.order.len() {
            rng.shuffle(&mut self.order);
            // No back-to-back repeat across the cycle boundary
            if self.order.len() > 1 && self.last == Some(self.order[0]) {
                let swap_with = 1 + rng.below(self.order.len() - 1);
                self.order.swap(0, swap_with);
            }
            self.next = 0;
        }
        let picked = self.order[self.next];
        self.next += 1;
        self.last = Some(picked);
        picked
    }
}

// ============================================================================
// Synthesizer
// ============================================================================

#[derive(Debug, Clone)]
pub struct LongFormTextSynthesizer {
    extractor: VocabularyExtractor,
    max_paragraphs: usize,
}

impl Default for LongFormTextSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LongFormTextSynthesizer {
    pub fn new() -> Self {
        Self {
            extractor: VocabularyExtractor::new(),
            max_paragraphs: MAX_PARAGRAPHS,
        }
    }

    /// Override the paragraph ceiling (minimum 1).
    pub fn with_max_paragraphs(mut self, max_paragraphs: usize) -> Self {
        self.max_paragraphs = max_paragraphs.max(1);
        self
    }

    /// Generate text for a request. Never fails.
    pub fn synthesize(&self, request: &LongFormRequest) -> LongFormText {
        self.run(request, None).0
    }

    /// Generate text, checking `token` before each paragraph.
    pub fn synthesize_with_cancel(
        &self,
        request: &LongFormRequest,
        token: &CancellationToken,
    ) -> Result<LongFormText, GenerationError> {
        match self.run(request, Some(token)) {
            (text, false) => Ok(text),
            (partial, true) => Err(GenerationError::cancelled(
                partial.paragraph_count(),
                partial.word_count,
            )),
        }
    }

    /// Core loop. The flag reports whether `token` stopped it early.
    fn run(&self, request: &LongFormRequest, token: Option<&CancellationToken>) -> (LongFormText, bool) {
        let profile = ToneProfile::from_inputs(&request.audience, &request.tone);
        let vocabulary = self.extractor.extract(&request.title, &request.audience);
        let rotation = (request.seed.value() % vocabulary.key_terms().len().max(1) as u64) as u32 + 1;
        let terms = vocabulary.chapter_terms(rotation, TERM_POOL_SIZE);

        let pool = active_pool(&profile);
        let mut rng = request.seed.rng("longform");
        let mut deck = TemplateDeck::new(pool.len(), &mut rng);

        let band = request.band();
        let (lower, upper) = (*band.start(), *band.end());
        let region = profile.region.clone().unwrap_or_else(|| "your region".to_string());

        let mut sentences: Vec<String> = Vec::new();
        let mut paragraph_lengths: Vec<usize> = Vec::new();
        let mut words = 0usize;
        let mut cancelled = false;

        while paragraph_lengths.len() < self.max_paragraphs {
            if token.is_some_and(CancellationToken::is_cancelled) {
                log::info!(
                    "Long-form generation cancelled for seed {} after {} paragraphs",
                    request.seed,
                    paragraph_lengths.len()
                );
                cancelled = true;
                break;
            }

            let sentence_count = MIN_SENTENCES_PER_PARAGRAPH
                + rng.below(MAX_SENTENCES_PER_PARAGRAPH - MIN_SENTENCES_PER_PARAGRAPH + 1);

            let mut paragraph: Vec<String> = Vec::with_capacity(sentence_count);
            for _ in 0..sentence_count {
                let template = pool[deck.draw(&mut rng)];
                let primary = terms.len().min(PRIMARY_TERM_WINDOW);
                let term_idx = rng.below(primary);
                let mut term2_idx = rng.below(terms.len());
                if term2_idx == term_idx && terms.len() > 1 {
                    term2_idx = (term2_idx + 1) % terms.len();
                }

                let sentence = fill(
                    template,
                    &[
                        ("topic", &request.title),
                        ("term", &terms[term_idx]),
                        ("term2", &terms[term2_idx]),
                        ("audience", &profile.audience_label),
                        ("region", &region),
                    ],
                );
                let sentence = if rng.chance(CONNECTIVE_PROBABILITY) {
                    let connective = CONNECTIVES[rng.below(CONNECTIVES.len())];
                    with_connective(connective, &sentence, template).unwrap_or(sentence)
                } else {
                    sentence
                };
                paragraph.push(sentence);
            }

            // Trim an overshooting paragraph, never below the minimum paragraph length.
            let mut paragraph_words: usize = paragraph.iter().map(|s| word_count(s)).sum();
            while words.saturating_add(paragraph_words) > upper
                && paragraph.len() > MIN_SENTENCES_PER_PARAGRAPH
            {
                if let Some(dropped) = paragraph.pop() {
                    paragraph_words -= word_count(&dropped);
                }
            }

            words += paragraph_words;
            paragraph_lengths.push(paragraph.len());
            sentences.extend(paragraph);

            if words >= lower {
                break;
            }
        }

        let bound_exceeded = words < lower;
        if bound_exceeded && !cancelled {
            log::warn!(
                "Paragraph ceiling ({}) reached for seed {}: {} words, {} short of {}",
                self.max_paragraphs,
                request.seed,
                words,
                lower - words,
                lower
            );
        } else if !cancelled {
            log::debug!(
                "Generated {words} words in {} paragraphs for seed {}",
                paragraph_lengths.len(),
                request.seed
            );
        }

        let text = join_paragraphs(&sentences, &paragraph_lengths);

        let result = LongFormText {
            text,
            sentences,
            paragraph_lengths,
            pool_size: pool.len(),
            word_count: words,
            target_words: request.target_words,
            bound_exceeded,
        };
        (result, cancelled)
    }
}

fn join_paragraphs(sentences: &[String], paragraph_lengths: &[usize]) -> String {
    let mut paragraphs: Vec<String> = Vec::with_capacity(paragraph_lengths.len());
    let mut start = 0;
    for &len in paragraph_lengths {
        paragraphs.push(sentences[start..start + len].join(" "));
        start += len;
    }
    paragraphs.join(PARAGRAPH_DELIMITER)
}

/// Generate chapter prose. Pure; safe to memoize on its arguments.
pub fn generate_long_form_text(
    title: &str,
    audience: &str,
    tone: &str,
    seed: Seed,
    target_words: u32,
) -> String {
    let request = LongFormRequest::new(title, audience, tone, seed, target_words);
    LongFormTextSynthesizer::new().synthesize(&request).text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(target: u32) -> LongFormRequest {
        LongFormRequest::new(
            "Thermal Engineering",
            "B.Tech (India)",
            "Humanized, exam-oriented",
            Seed::derive("Thermal Engineering", 3),
            target,
        )
    }

    #[test]
    fn test_tolerance_band() {
        assert_eq!(tolerance_band(4800), 4320..=5280);
        assert_eq!(tolerance_band(4500), 4050..=4950);
        assert_eq!(tolerance_band(0), 0..=0);
        assert_eq!(
            tolerance_band(u32::MAX),
            3_865_470_566..=4_724_464_024
        );
    }

    #[test]
    fn test_huge_target_hits_ceiling_without_panicking() {
        let out = LongFormTextSynthesizer::new()
            .with_max_paragraphs(4)
            .synthesize(&request(u32::MAX));
        assert!(out.bound_exceeded);
        assert_eq!(out.paragraph_count(), 4);
        assert!(out.word_count > 0);
        assert_eq!(request(u32::MAX).band(), tolerance_band(u32::MAX));
    }

    #[test]
    fn test_word_count_within_band() {
        let out = LongFormTextSynthesizer::new().synthesize(&request(4800));
        assert!(!out.bound_exceeded);
        assert!(tolerance_band(4800).contains(&out.word_count), "{}", out.word_count);
        assert_eq!(out.word_count, word_count(&out.text));
    }

    #[test]
    fn test_paragraph_shape() {
        let out = LongFormTextSynthesizer::new().synthesize(&request(4800));
        assert_eq!(out.paragraphs().count(), out.paragraph_count());
        for len in &out.paragraph_lengths {
            assert!((MIN_SENTENCES_PER_PARAGRAPH..=MAX_SENTENCES_PER_PARAGRAPH).contains(len));
        }
        assert_eq!(out.paragraph_lengths.iter().sum::<usize>(), out.sentences.len());
    }

    #[test]
    fn test_deterministic() {
        let a = generate_long_form_text("Data Science", "Undergraduates", "academic", Seed::new(9), 4600);
        let b = generate_long_form_text("Data Science", "Undergraduates", "academic", Seed::new(9), 4600);
        assert_eq!(a, b);

        let c = generate_long_form_text("Data Science", "Undergraduates", "academic", Seed::new(10), 4600);
        assert_ne!(a, c);
    }

    #[test]
    fn test_no_repeats_within_cycle() {
        let out = LongFormTextSynthesizer::new().synthesize(&request(5200));
        assert!(out.cycles().count() > 1);
        for cycle in out.cycles() {
            let mut seen = std::collections::HashSet::new();
            for sentence in cycle {
                assert!(seen.insert(sentence), "repeated within cycle: {sentence}");
            }
        }
    }

    #[test]
    fn test_no_back_to_back_sentences() {
        let out = LongFormTextSynthesizer::new().synthesize(&request(5200));
        for pair in out.sentences.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_paragraph_ceiling_returns_best_effort() {
        let out = LongFormTextSynthesizer::new()
            .with_max_paragraphs(2)
            .synthesize(&request(4800));
        assert!(out.bound_exceeded);
        assert_eq!(out.paragraph_count(), 2);
        assert!(out.word_count > 0);
        assert_eq!(out.shortfall(), 4320 - out.word_count);
    }

    #[test]
    fn test_zero_target_still_produces_text() {
        let out = LongFormTextSynthesizer::new().synthesize(&request(0));
        assert!(!out.text.is_empty());
        assert_eq!(out.paragraph_lengths, vec![MIN_SENTENCES_PER_PARAGRAPH]);
        assert!(!out.bound_exceeded);
    }

    #[test]
    fn test_small_target_keeps_minimum_paragraph_length() {
        let synthesizer = LongFormTextSynthesizer::new();
        for target in (40..=400).step_by(20) {
            for seed in 0..20 {
                let request = LongFormRequest::new(
                    "Thermal Engineering",
                    "B.Tech (India)",
                    "neutral",
                    Seed::new(seed),
                    target,
                );
                let out = synthesizer.synthesize(&request);
                assert!(!out.bound_exceeded);
                assert!(out.word_count >= *request.band().start());
                for len in &out.paragraph_lengths {
                    assert!(
                        (MIN_SENTENCES_PER_PARAGRAPH..=MAX_SENTENCES_PER_PARAGRAPH).contains(len),
                        "target {target}, seed {seed}: {:?}",
                        out.paragraph_lengths
                    );
                }
            }
        }
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let err = LongFormTextSynthesizer::new()
            .synthesize_with_cancel(&request(4800), &token)
            .unwrap_err();
        assert_eq!(err, GenerationError::cancelled(0, 0));
    }

    #[test]
    fn test_tone_changes_register() {
        let seed = Seed::new(5);
        let academic = generate_long_form_text("Data Science", "", "formal academic", seed, 4800);
        let humanized = generate_long_form_text("Data Science", "", "humanized", seed, 4800);
        assert_ne!(academic, humanized);
        assert!(humanized.contains("you") || humanized.contains("You"));
    }
}
