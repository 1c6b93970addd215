//! Outline Planner
//!
//! Turns a chapter index into a title, summary, key terms and learning
//! objectives by combining the chapter's arc stage with the book vocabulary.
//! All choices come from the chapter seed, so a fixed
//! `(topic, audience, tone, index)` always plans the same chapter.

use super::arc::{ArcPosition, ArcStage};
use super::profile::ToneProfile;
use super::rng::{Seed, SeededRandom};
use super::sentences::fill;
use super::vocabulary::Vocabulary;

// ============================================================================
// Constants
// ============================================================================

pub const MIN_KEY_TERMS: usize = 4;
pub const MAX_KEY_TERMS: usize = 8;
pub const MIN_OBJECTIVES: usize = 3;
pub const MAX_OBJECTIVES: usize = 6;

/// Objective phrasing after the verb. Placeholders: `{term}`, `{term2}`, `{topic}`.
const OBJECTIVE_PATTERNS: &[&str] = &[
    "the role of {term} in {topic}",
    "how {term} relates to {term2}",
    "the key assumptions behind {term}",
    "a worked problem involving {term}",
    "common misconceptions about {term}",
    "the limits of {term} in real {topic} settings",
];

const EXAM_OBJECTIVE: &str = "Practise exam-style questions on {term} under timed conditions";

// ============================================================================
// Types
// ============================================================================

/// Book-wide inputs shared by every chapter plan.
#[derive(Debug, Clone)]
pub struct PlanContext {
    pub topic: String,
    pub profile: ToneProfile,
    pub vocabulary: Vocabulary,
    pub total_chapters: u32,
}

/// Planned text fields of one chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterPlan {
    pub index: u32,
    pub position: ArcPosition,
    pub title: String,
    pub summary: String,
    pub key_terms: Vec<String>,
    pub objectives: Vec<String>,
}

// ============================================================================
// Planner
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct OutlinePlanner;

impl OutlinePlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan chapter `index` of the book described by `ctx`.
    pub fn plan(&self, ctx: &PlanContext, index: u32, seed: Seed) -> ChapterPlan {
        let mut rng = seed.rng("outline");
        let position = ArcStage::for_chapter(index, ctx.total_chapters);

        let key_terms = self.key_terms(ctx, index, position, &mut rng);
        let term = key_terms[0].as_str();
        let term2 = key_terms.get(1).map(String::as_str).unwrap_or(term);

        let patterns = position.stage.title_patterns();
        let title = fill(
            patterns[position.step % patterns.len()],
            &[("topic", &ctx.topic), ("term", term), ("term2", term2)],
        );

        let summary = fill(
            position.stage.summary_template(),
            &[
                ("topic", &ctx.topic),
                ("term", term),
                ("term2", term2),
                ("audience", &ctx.profile.audience_label),
            ],
        );

        let objectives = self.objectives(ctx, position.stage, &key_terms, &mut rng);

        log::debug!(
            "Planned chapter {index} ({}): {title} with {} terms, {} objectives",
            position.stage,
            key_terms.len(),
            objectives.len()
        );

        ChapterPlan {
            index,
            position,
            title,
            summary,
            key_terms,
            objectives,
        }
    }

    fn key_terms(
        &self,
        ctx: &PlanContext,
        index: u32,
        position: ArcPosition,
        rng: &mut SeededRandom,
    ) -> Vec<String> {
        let count = MIN_KEY_TERMS + rng.below(MAX_KEY_TERMS - MIN_KEY_TERMS + 1);
        let mut terms = ctx.vocabulary.chapter_terms(index, count - 1);

        let stage_terms = position.stage.stage_terms();
        let preferred = stage_terms[position.step % stage_terms.len()];
        for candidate in std::iter::once(preferred).chain(stage_terms.iter().copied()) {
            if terms.len() >= count.max(MIN_KEY_TERMS) {
                break;
            }
            if !terms.iter().any(|t| t.eq_ignore_ascii_case(candidate)) {
                terms.push(candidate.to_string());
            }
        }
        terms
    }

    fn objectives(
        &self,
        ctx: &PlanContext,
        stage: ArcStage,
        key_terms: &[String],
        rng: &mut SeededRandom,
    ) -> Vec<String> {
        let count = MIN_OBJECTIVES + rng.below(MAX_OBJECTIVES - MIN_OBJECTIVES + 1);
        let verbs = stage.objective_verbs();

        // Keep chosen verbs in their lower-to-higher order
        let mut verb_picks: Vec<usize> = rng.permutation(verbs.len()).into_iter().take(count).collect();
        verb_picks.sort_unstable();
        let pattern_order = rng.permutation(OBJECTIVE_PATTERNS.len());

        let mut objectives: Vec<String> = verb_picks
            .iter()
            .enumerate()
            .map(|(k, &verb_idx)| {
                let term = &key_terms[k % key_terms.len()];
                let term2 = &key_terms[(k + 1) % key_terms.len()];
                let object = fill(
                    OBJECTIVE_PATTERNS[pattern_order[k % pattern_order.len()]],
                    &[("term", term), ("term2", term2), ("topic", &ctx.topic)],
                );
                format!("{} {}", verbs[verb_idx], object)
            })
            .collect();

        if ctx.profile.exam_oriented {
            let exam = fill(EXAM_OBJECTIVE, &[("term", &key_terms[0])]);
            if objectives.len() >= MAX_OBJECTIVES {
                objectives.pop();
            }
            objectives.push(exam);
        }

        objectives
    }
}
