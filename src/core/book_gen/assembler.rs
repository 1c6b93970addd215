//! Book Assembler
//!
//! Validates [`BookOptions`], derives one seed per chapter, and drives the
//! planner and data synthesizers into an immutable [`Book`]. Long-form text is
//! not produced here; callers request it per chapter through
//! [`generate_long_form_text`](super::generate_long_form_text) or a
//! [`LongFormCache`].

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::cache::LongFormCache;
use super::charts::ChartDataSynthesizer;
use super::errors::ValidationError;
use super::longform::{LongFormRequest, LongFormText};
use super::outline::{OutlinePlanner, PlanContext};
use super::profile::ToneProfile;
use super::rng::Seed;
use super::tables::TableDataSynthesizer;
use super::types::{Book, ChapterOutline};
use super::vocabulary::VocabularyExtractor;
use super::worked_examples::ExampleSynthesizer;

// ============================================================================
// Constants
// ============================================================================

/// Every book has exactly this many chapters.
pub const CHAPTER_COUNT: u32 = 15;

pub const MIN_WORDS_PER_CHAPTER: u32 = 4500;
pub const MAX_WORDS_PER_CHAPTER: u32 = 5200;
pub const DEFAULT_WORDS_PER_CHAPTER: u32 = 4800;

/// Minimum topic length in characters, after trimming.
pub const MIN_TOPIC_CHARS: usize = 3;

pub const DEFAULT_TOPIC: &str = "Introduction to Data Science for India";
pub const DEFAULT_AUDIENCE: &str = "Undergraduate students in India";
pub const DEFAULT_TONE: &str = "Human, neutral-academic, culturally contextualized for India";

// ============================================================================
// Options
// ============================================================================

/// Inputs for one generate action. Immutable once passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookOptions {
    pub topic: String,
    pub audience: String,
    pub tone: String,
    /// Requested chapter count. Always assembled as [`CHAPTER_COUNT`].
    pub num_chapters: u32,
    /// Clamped to `[MIN_WORDS_PER_CHAPTER, MAX_WORDS_PER_CHAPTER]`.
    pub min_words_per_chapter: u32,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            tone: DEFAULT_TONE.to_string(),
            num_chapters: CHAPTER_COUNT,
            min_words_per_chapter: DEFAULT_WORDS_PER_CHAPTER,
        }
    }
}

impl BookOptions {
    pub fn new(topic: impl Into<String>, audience: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            audience: audience.into(),
            tone: tone.into(),
            ..Default::default()
        }
    }

    pub fn with_words_per_chapter(mut self, words: u32) -> Self {
        self.min_words_per_chapter = words;
        self
    }

    pub fn with_num_chapters(mut self, chapters: u32) -> Self {
        self.num_chapters = chapters;
        self
    }

    /// Reject invalid input and return the clamped form used for assembly.
    pub fn validate(&self) -> Result<ValidatedOptions, ValidationError> {
        let topic = self.topic.trim();
        let topic_chars = topic.chars().count();
        if topic_chars < MIN_TOPIC_CHARS {
            return Err(ValidationError::topic_too_short(MIN_TOPIC_CHARS, topic_chars));
        }
        if self.num_chapters == 0 {
            return Err(ValidationError::non_positive("numChapters"));
        }
        if self.min_words_per_chapter == 0 {
            return Err(ValidationError::non_positive("minWordsPerChapter"));
        }

        if self.num_chapters != CHAPTER_COUNT {
            log::debug!(
                "Requested {} chapters; books always have {CHAPTER_COUNT}",
                self.num_chapters
            );
        }

        Ok(ValidatedOptions {
            topic: topic.to_string(),
            audience: self.audience.trim().to_string(),
            tone: self.tone.trim().to_string(),
            chapters: CHAPTER_COUNT,
            words_per_chapter: self
                .min_words_per_chapter
                .clamp(MIN_WORDS_PER_CHAPTER, MAX_WORDS_PER_CHAPTER),
        })
    }
}

/// Options after validation and clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub topic: String,
    pub audience: String,
    pub tone: String,
    pub chapters: u32,
    pub words_per_chapter: u32,
}

// ============================================================================
// Assembler
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct BookAssembler {
    extractor: VocabularyExtractor,
    planner: OutlinePlanner,
    charts: ChartDataSynthesizer,
    tables: TableDataSynthesizer,
    examples: ExampleSynthesizer,
}

impl BookAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the outline-only book for `options`.
    #[instrument(skip(self, options), fields(topic = %options.topic.trim()))]
    pub fn assemble(&self, options: &BookOptions) -> Result<Book, ValidationError> {
        let options = options.validate()?;

        let profile = ToneProfile::from_inputs(&options.audience, &options.tone);
        let vocabulary = self.extractor.extract(&options.topic, &options.audience);
        let ctx = PlanContext {
            topic: options.topic.clone(),
            profile,
            vocabulary,
            total_chapters: options.chapters,
        };

        let chapters: Vec<ChapterOutline> = (1..=options.chapters)
            .map(|index| self.chapter(&ctx, index))
            .collect();

        log::info!(
            "Assembled '{}' with {} chapters at {} words per chapter",
            options.topic,
            chapters.len(),
            options.words_per_chapter
        );

        Ok(Book {
            subtitle: subtitle(&ctx.profile),
            title: options.topic,
            audience: options.audience,
            tone: options.tone,
            target_words_per_chapter: options.words_per_chapter,
            chapters,
        })
    }

    fn chapter(&self, ctx: &PlanContext, index: u32) -> ChapterOutline {
        let seed = Seed::derive(&ctx.topic, index);
        let plan = self.planner.plan(ctx, index, seed);
        let stage = plan.position.stage;

        let charts = self.charts.synthesize(stage, &plan.key_terms, seed);
        let tables = self
            .tables
            .synthesize(stage, &plan.key_terms, &ctx.topic, &ctx.profile, seed);
        let examples = self
            .examples
            .synthesize(index, stage, &plan.key_terms, &ctx.profile, seed);

        ChapterOutline {
            index,
            title: plan.title,
            summary: plan.summary,
            key_terms: plan.key_terms,
            objectives: plan.objectives,
            charts,
            tables,
            examples,
            seed,
        }
    }

    /// Fill `cache` with every chapter's long-form text, in parallel.
    ///
    /// Results come back in chapter order.
    pub fn precompute_long_form(&self, book: &Book, cache: &LongFormCache) -> Vec<Arc<LongFormText>> {
        book.chapters
            .par_iter()
            .map(|chapter| cache.get_or_generate(&long_form_request(book, chapter)))
            .collect()
    }
}

/// Long-form request for a chapter. The book title, not the chapter title, is
/// the text's subject.
pub fn long_form_request(book: &Book, chapter: &ChapterOutline) -> LongFormRequest {
    LongFormRequest::new(
        book.title.clone(),
        book.audience.clone(),
        book.tone.clone(),
        chapter.seed,
        book.target_words_per_chapter,
    )
}

fn subtitle(profile: &ToneProfile) -> String {
    let kind = if profile.exam_oriented {
        "An exam-oriented study guide"
    } else {
        "A structured course companion"
    };
    format!("{kind} for {}", profile.audience_label)
}

/// Build a book from options. Deterministic; no side effects.
pub fn generate_book(options: &BookOptions) -> Result<Book, ValidationError> {
    BookAssembler::new().assemble(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn thermal() -> BookOptions {
        BookOptions::new("Thermal Engineering", "B.Tech (India)", "Humanized, exam-oriented")
    }

    #[rstest]
    #[case(10_000, 5200)]
    #[case(100, 4500)]
    #[case(4800, 4800)]
    #[case(4500, 4500)]
    #[case(5200, 5200)]
    fn test_words_per_chapter_clamped(#[case] requested: u32, #[case] expected: u32) {
        let book = generate_book(&thermal().with_words_per_chapter(requested)).unwrap();
        assert_eq!(book.target_words_per_chapter, expected);
    }

    #[rstest]
    #[case(1)]
    #[case(15)]
    #[case(40)]
    fn test_chapter_count_forced(#[case] requested: u32) {
        let book = generate_book(&thermal().with_num_chapters(requested)).unwrap();
        assert_eq!(book.chapters.len(), CHAPTER_COUNT as usize);
    }

    #[rstest]
    #[case("", 0)]
    #[case("AI", 2)]
    #[case("   ab  ", 2)]
    fn test_short_topic_rejected(#[case] topic: &str, #[case] actual: usize) {
        let err = generate_book(&BookOptions::new(topic, "", "")).unwrap_err();
        assert_eq!(err, ValidationError::topic_too_short(MIN_TOPIC_CHARS, actual));
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = generate_book(&thermal().with_num_chapters(0)).unwrap_err();
        assert_eq!(err.field(), "numChapters");
        let err = generate_book(&thermal().with_words_per_chapter(0)).unwrap_err();
        assert_eq!(err.field(), "minWordsPerChapter");
    }

    #[test]
    fn test_contiguous_indices_and_seeds() {
        let book = generate_book(&thermal()).unwrap();
        for (i, chapter) in book.chapters.iter().enumerate() {
            assert_eq!(chapter.index, i as u32 + 1);
            assert_eq!(chapter.seed, Seed::derive("Thermal Engineering", chapter.index));
        }
    }

    #[test]
    fn test_deterministic_outline() {
        let a = generate_book(&thermal()).unwrap().to_json().unwrap();
        let b = generate_book(&thermal()).unwrap().to_json().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_chapter_has_content() {
        let book = generate_book(&BookOptions::default()).unwrap();
        assert_eq!(book.title, DEFAULT_TOPIC);
        for chapter in &book.chapters {
            assert!(!chapter.charts.is_empty());
            assert!(!chapter.tables.is_empty());
            assert!(!chapter.examples.is_empty());
            assert!((4..=8).contains(&chapter.key_terms.len()));
            assert!((3..=6).contains(&chapter.objectives.len()));
        }
    }

    #[test]
    fn test_subtitle_reflects_tone() {
        let book = generate_book(&thermal()).unwrap();
        assert_eq!(book.subtitle, "An exam-oriented study guide for B.Tech (India)");
    }

    #[test]
    fn test_topic_is_trimmed() {
        let book = generate_book(&BookOptions::new("  Thermal Engineering ", "", "")).unwrap();
        assert_eq!(book.title, "Thermal Engineering");
    }

    #[test]
    fn test_long_form_request_uses_book_title() {
        let book = generate_book(&thermal()).unwrap();
        let request = long_form_request(&book, &book.chapters[4]);
        assert_eq!(request.title, "Thermal Engineering");
        assert_eq!(request.seed, book.chapters[4].seed);
        assert_eq!(request.target_words, 4800);
    }

    #[test]
    fn test_precompute_fills_cache_in_order() {
        let book = generate_book(&thermal()).unwrap();
        let cache = LongFormCache::with_capacity(CHAPTER_COUNT as usize);
        let texts = BookAssembler::new().precompute_long_form(&book, &cache);

        assert_eq!(texts.len(), book.chapters.len());
        assert_eq!(cache.len(), book.chapters.len());
        let third = cache.get_or_generate(&long_form_request(&book, &book.chapters[2]));
        assert!(Arc::ptr_eq(&third, &texts[2]));
    }
}
