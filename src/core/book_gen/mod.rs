//! Book Content Synthesis Engine
//!
//! Turns a short `{topic, audience, tone}` description into a 15-chapter
//! [`Book`]: per-chapter titles, summaries, objectives, key terms, charts,
//! tables and worked examples, plus on-demand long-form chapter text bounded
//! by a target word count. Every output is a pure function of its inputs.
//!
//! # Architecture
//!
//! ```text
//!                     +-------------------------+
//!                     |     BookAssembler       |
//!                     |  (validate, seed, plan) |
//!                     +-------------------------+
//!                                 |
//!        +-------------+----------+-----------+---------------+
//!        |             |                      |               |
//!        v             v                      v               v
//!  +-----------+ +---------------+   +----------------+ +-------------+
//!  | Outline   | | ChartData     |   | TableData      | | Example     |
//!  | Planner   | | Synthesizer   |   | Synthesizer    | | Synthesizer |
//!  +-----------+ +---------------+   +----------------+ +-------------+
//!        |
//!        v
//!  +-------------------+        +--------------------------+
//!  | Vocabulary        | <----- | LongFormTextSynthesizer  | <-- LongFormCache
//!  | Extractor         |        |  (on demand, per chapter)|
//!  +-------------------+        +--------------------------+
//!
//!              all randomness: Seed::derive(topic, index) -> SeededRandom
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use booksmith::core::book_gen::{generate_book, generate_long_form_text, BookOptions};
//!
//! let book = generate_book(&BookOptions::new(
//!     "Thermal Engineering",
//!     "B.Tech (India)",
//!     "Humanized, exam-oriented",
//! ))?;
//!
//! let chapter = &book.chapters[0];
//! let text = generate_long_form_text(
//!     &book.title,
//!     &book.audience,
//!     &book.tone,
//!     chapter.seed,
//!     book.target_words_per_chapter,
//! );
//! ```

pub mod arc;
pub mod assembler;
pub mod cache;
pub mod charts;
pub mod errors;
pub mod longform;
pub mod outline;
pub mod profile;
pub mod rng;
pub mod sentences;
pub mod tables;
pub mod types;
pub mod vocabulary;
pub mod worked_examples;

pub use arc::{ArcPosition, ArcStage};
pub use assembler::{
    generate_book, long_form_request, BookAssembler, BookOptions, ValidatedOptions,
    CHAPTER_COUNT, DEFAULT_WORDS_PER_CHAPTER, MAX_WORDS_PER_CHAPTER, MIN_TOPIC_CHARS,
    MIN_WORDS_PER_CHAPTER,
};
pub use cache::{CacheStats, LongFormCache};
pub use charts::ChartDataSynthesizer;
pub use errors::{GenerationError, ValidationError};
pub use longform::{
    generate_long_form_text, tolerance_band, word_count, CancellationToken, LongFormRequest,
    LongFormText, LongFormTextSynthesizer, MAX_SENTENCES_PER_PARAGRAPH, MIN_SENTENCES_PER_PARAGRAPH,
};
pub use outline::{ChapterPlan, OutlinePlanner, PlanContext};
pub use profile::{Register, ToneProfile};
pub use rng::{Seed, SeededRandom};
pub use tables::{TableDataSynthesizer, TableKind};
pub use types::{Book, ChapterOutline, ChartSpec, ChartType, Dataset, Example, TableSpec};
pub use vocabulary::{Vocabulary, VocabularyExtractor};
pub use worked_examples::ExampleSynthesizer;
