//! Property-based tests for the book synthesis engine
//!
//! Tests invariants:
//! - Outline generation is deterministic for fixed inputs
//! - Chapters are exactly 1..=15 and every chart/table is well formed
//! - Words per chapter are clamped into range
//! - Long-form text lands in the tolerance band without repeats per cycle,
//!   including full 4800-word chapters
//! - Vocabulary is never empty and chapter terms never repeat early

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::book_gen::{
    generate_book, BookOptions, LongFormRequest, LongFormTextSynthesizer, Seed,
    VocabularyExtractor, CHAPTER_COUNT, MAX_SENTENCES_PER_PARAGRAPH, MAX_WORDS_PER_CHAPTER,
    MIN_SENTENCES_PER_PARAGRAPH, MIN_WORDS_PER_CHAPTER,
};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// A topic of 1-4 words that always trims to at least 3 characters.
fn arb_topic() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}( [A-Za-z]{2,10}){0,3}"
}

fn arb_audience() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("B.Tech (India)".to_string()),
        Just("Undergraduate students in Kenya".to_string()),
        "[a-z ]{0,24}",
    ]
}

fn arb_tone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Humanized, exam-oriented".to_string()),
        Just("formal academic".to_string()),
        Just("friendly and conversational".to_string()),
        "[a-z ,]{0,24}",
    ]
}

fn arb_options() -> impl Strategy<Value = BookOptions> {
    (arb_topic(), arb_audience(), arb_tone(), any::<u32>())
        .prop_map(|(topic, audience, tone, words)| {
            BookOptions::new(topic, audience, tone).with_words_per_chapter(words.max(1))
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: identical options give byte-identical outlines
    #[test]
    fn prop_outline_is_deterministic(options in arb_options()) {
        let first = generate_book(&options).unwrap().to_json().unwrap();
        let second = generate_book(&options).unwrap().to_json().unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: chapters are 1..=15 in order with well-formed charts and tables
    #[test]
    fn prop_outline_shape(options in arb_options()) {
        let book = generate_book(&options).unwrap();

        prop_assert_eq!(book.chapters.len(), CHAPTER_COUNT as usize);
        for (i, chapter) in book.chapters.iter().enumerate() {
            prop_assert_eq!(chapter.index, i as u32 + 1);
            prop_assert!((1..=3).contains(&chapter.charts.len()));
            prop_assert!((1..=2).contains(&chapter.tables.len()));
            for chart in &chapter.charts {
                prop_assert!(chart.is_well_formed(), "chart {:?}", chart);
            }
            for table in &chapter.tables {
                prop_assert!(table.is_well_formed(), "table {:?}", table);
            }
        }
    }

    /// Property: words per chapter always land in the clamp range
    #[test]
    fn prop_words_per_chapter_clamped(words in 1u32..=u32::MAX) {
        let options = BookOptions::new("Thermal Engineering", "", "").with_words_per_chapter(words);
        let book = generate_book(&options).unwrap();
        prop_assert!(
            (MIN_WORDS_PER_CHAPTER..=MAX_WORDS_PER_CHAPTER).contains(&book.target_words_per_chapter)
        );
        prop_assert_eq!(
            book.target_words_per_chapter,
            words.clamp(MIN_WORDS_PER_CHAPTER, MAX_WORDS_PER_CHAPTER)
        );
    }

    /// Property: vocabulary is never empty, whatever the input
    #[test]
    fn prop_vocabulary_never_empty(topic in ".{0,40}", audience in ".{0,40}") {
        let vocabulary = VocabularyExtractor::new().extract(&topic, &audience);
        prop_assert!(!vocabulary.key_terms().is_empty());
        prop_assert!(!vocabulary.primary().is_empty());
    }

    /// Property: up to 8 chapter terms are distinct (case-insensitive)
    #[test]
    fn prop_chapter_terms_distinct(
        topic in arb_topic(),
        chapter in 1u32..=15,
        count in 1usize..=8
    ) {
        let vocabulary = VocabularyExtractor::new().extract(&topic, "");
        let terms = vocabulary.chapter_terms(chapter, count);
        prop_assert_eq!(terms.len(), count);
        let unique: HashSet<String> = terms.iter().map(|t| t.to_lowercase()).collect();
        prop_assert_eq!(unique.len(), terms.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: long-form text is within target +/- 10% and never empty
    #[test]
    fn prop_long_form_within_band(
        title in arb_topic(),
        tone in arb_tone(),
        seed in any::<u64>(),
        target in 600u32..=2000
    ) {
        let request = LongFormRequest::new(title, "B.Tech (India)", tone, Seed::new(seed), target);
        let text = LongFormTextSynthesizer::new().synthesize(&request);

        prop_assert!(!text.text.is_empty());
        prop_assert!(!text.bound_exceeded);
        prop_assert!(
            request.band().contains(&text.word_count),
            "{} words outside {:?}",
            text.word_count,
            request.band()
        );
        for len in &text.paragraph_lengths {
            prop_assert!((MIN_SENTENCES_PER_PARAGRAPH..=MAX_SENTENCES_PER_PARAGRAPH).contains(len));
        }
    }

    /// Property: no sentence repeats within one template-pool cycle
    #[test]
    fn prop_no_repeats_within_cycle(
        title in arb_topic(),
        tone in arb_tone(),
        seed in any::<u64>()
    ) {
        let request = LongFormRequest::new(title, "students", tone, Seed::new(seed), 1500);
        let text = LongFormTextSynthesizer::new().synthesize(&request);

        for cycle in text.cycles() {
            let unique: HashSet<&String> = cycle.iter().collect();
            prop_assert_eq!(unique.len(), cycle.len());
        }
    }

    /// Property: long-form text is a pure function of its request
    #[test]
    fn prop_long_form_is_deterministic(
        title in arb_topic(),
        seed in any::<u64>(),
        target in 300u32..=1200
    ) {
        let request = LongFormRequest::new(title, "", "", Seed::new(seed), target);
        let synthesizer = LongFormTextSynthesizer::new();
        prop_assert_eq!(
            synthesizer.synthesize(&request).text,
            synthesizer.synthesize(&request).text
        );
    }
}

proptest! {
    // Full-size chapters are expensive; a handful of cases covers the band.
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// Property: a default-length chapter lands in 4320..=5280 words
    #[test]
    fn prop_default_chapter_length_within_band(
        title in arb_topic(),
        audience in arb_audience(),
        tone in arb_tone(),
        seed in any::<u64>()
    ) {
        let request = LongFormRequest::new(title, audience, tone, Seed::new(seed), 4800);
        let text = LongFormTextSynthesizer::new().synthesize(&request);

        prop_assert!(!text.bound_exceeded);
        prop_assert!(
            (4320..=5280).contains(&text.word_count),
            "{} words",
            text.word_count
        );
    }
}
