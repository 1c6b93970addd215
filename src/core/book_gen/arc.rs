//! Pedagogical Arc
//!
//! Each chapter plays a role in a fixed five-stage progression. With the
//! standard fifteen chapters every stage spans three consecutive chapters:
//!
//! ```text
//!  1- 3  Orientation
//!  4- 6  Foundational concepts
//!  7- 9  Core mechanisms
//! 10-12  Applied techniques
//! 13-15  Synthesis & assessment
//! ```

use serde::{Deserialize, Serialize};

use super::types::ChartType;

/// Pedagogical role of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcStage {
    Orientation,
    FoundationalConcepts,
    CoreMechanisms,
    AppliedTechniques,
    SynthesisAssessment,
}

/// Where a chapter sits within the arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcPosition {
    pub stage: ArcStage,
    /// 0-based position of the chapter inside its stage
    pub step: usize,
}

impl ArcStage {
    /// All stages in arc order.
    pub fn all() -> &'static [ArcStage] {
        &[
            ArcStage::Orientation,
            ArcStage::FoundationalConcepts,
            ArcStage::CoreMechanisms,
            ArcStage::AppliedTechniques,
            ArcStage::SynthesisAssessment,
        ]
    }

    /// Place a 1-based chapter index within a book of `total` chapters.
    ///
    /// `stage = floor((index - 1) * 5 / total)`; the step counts chapters
    /// already assigned to the same stage.
    pub fn for_chapter(index: u32, total: u32) -> ArcPosition {
        let stages = Self::all();
        let total = total.max(1) as usize;
        let zero_based = (index.max(1) as usize - 1).min(total - 1);
        let stage_of = |i: usize| (i * stages.len() / total).min(stages.len() - 1);

        let stage_idx = stage_of(zero_based);
        let step = (0..zero_based).filter(|i| stage_of(*i) == stage_idx).count();

        ArcPosition {
            stage: stages[stage_idx],
            step,
        }
    }

    /// Human-readable stage name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Orientation => "Orientation",
            Self::FoundationalConcepts => "Foundational Concepts",
            Self::CoreMechanisms => "Core Mechanisms",
            Self::AppliedTechniques => "Applied Techniques",
            Self::SynthesisAssessment => "Synthesis & Assessment",
        }
    }

    /// Chapter title patterns, indexed by step within the stage.
    ///
    /// Placeholders: `{topic}`, `{term}`, `{term2}`.
    pub fn title_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Orientation => &[
                "Why {topic} Matters",
                "The Landscape of {topic}",
                "Getting Oriented: {term} in Context",
            ],
            Self::FoundationalConcepts => &[
                "Foundations of {term}",
                "Core Concepts: {term} and {term2}",
                "Building Blocks of {topic}",
            ],
            Self::CoreMechanisms => &[
                "How {term} Works",
                "Inside {term}: Mechanisms and Models",
                "Cause and Effect in {topic}",
            ],
            Self::AppliedTechniques => &[
                "Applying {term} in Practice",
                "Techniques for {term} and {term2}",
                "Case Studies in {topic}",
            ],
            Self::SynthesisAssessment => &[
                "Connecting {term} and {term2}",
                "Integrated Problem Solving in {topic}",
                "Review and Assessment: {topic}",
            ],
        }
    }

    /// Summary template. Placeholders: `{topic}`, `{term}`, `{term2}`, `{audience}`.
    pub fn summary_template(&self) -> &'static str {
        match self {
            Self::Orientation => "An orientation to {topic} for {audience}. This chapter frames the foundational questions around {term}, explains why they matter, and sets up the vocabulary used throughout the book.",
            Self::FoundationalConcepts => "This chapter builds the foundational concepts of {topic}, defining {term} and {term2} carefully so that later mechanisms rest on solid ground for {audience}.",
            Self::CoreMechanisms => "This chapter opens up the core mechanisms behind {term}, tracing how {term2} drives observable behaviour in {topic} and how to model it.",
            Self::AppliedTechniques => "This chapter turns to applied techniques, showing {audience} how {term} and {term2} are used to solve realistic problems in {topic}.",
            Self::SynthesisAssessment => "A synthesis and assessment chapter that ties {term} and {term2} back to the rest of {topic}, with integrated problems and self-assessment for {audience}.",
        }
    }

    /// Imperative verbs for learning objectives, from lower to higher order.
    pub fn objective_verbs(&self) -> &'static [&'static str] {
        match self {
            Self::Orientation => &["Describe", "Identify", "Explain", "Recognize", "Outline", "Summarize"],
            Self::FoundationalConcepts => &["Define", "Explain", "Distinguish", "Classify", "Relate", "Illustrate"],
            Self::CoreMechanisms => &["Analyze", "Model", "Derive", "Trace", "Compare", "Predict"],
            Self::AppliedTechniques => &["Apply", "Calculate", "Design", "Solve", "Implement", "Evaluate"],
            Self::SynthesisAssessment => &["Synthesize", "Evaluate", "Critique", "Integrate", "Justify", "Assess"],
        }
    }

    /// Concept terms every chapter of this stage may lean on.
    pub fn stage_terms(&self) -> &'static [&'static str] {
        match self {
            Self::Orientation => &["Scope", "Context"],
            Self::FoundationalConcepts => &["Definition", "Principle"],
            Self::CoreMechanisms => &["Mechanism", "Model"],
            Self::AppliedTechniques => &["Technique", "Application"],
            Self::SynthesisAssessment => &["Synthesis", "Assessment"],
        }
    }

    /// Chart type the first chart of the chapter uses.
    pub fn lead_chart(&self) -> ChartType {
        match self {
            Self::Orientation => ChartType::Pie,
            Self::FoundationalConcepts => ChartType::Bar,
            Self::CoreMechanisms => ChartType::Line,
            Self::AppliedTechniques => ChartType::Bar,
            Self::SynthesisAssessment => ChartType::Radar,
        }
    }
}

impl std::fmt::Display for ArcStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
