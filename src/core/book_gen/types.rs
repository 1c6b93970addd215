//! Book Data Contract
//!
//! The structures the presentation layer reads. Field names serialize in
//! camelCase so the JSON matches what chart/table renderers expect.
//!
//! ```text
//! Book
//!   +-- title, subtitle, audience, tone, targetWordsPerChapter
//!   +-- chapters: Vec<ChapterOutline>        (indices 1..=15, ascending)
//!         +-- index, title, summary, seed
//!         +-- keyTerms, objectives
//!         +-- charts: Vec<ChartSpec>          (type, title, labels, datasets)
//!         +-- tables: Vec<TableSpec>          (title, headers, rows)
//!         +-- examples: Vec<Example>          (title, body)
//! ```

use serde::{Deserialize, Serialize};

use super::rng::Seed;

// ============================================================================
// Book
// ============================================================================

/// Top-level generated artifact. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub subtitle: String,
    pub audience: String,
    pub tone: String,
    pub target_words_per_chapter: u32,
    pub chapters: Vec<ChapterOutline>,
}

impl Book {
    /// Look up a chapter by its 1-based index.
    pub fn chapter(&self, index: u32) -> Option<&ChapterOutline> {
        self.chapters.iter().find(|c| c.index == index)
    }

    /// Serialize the outline portion to canonical JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// Chapter Outline
// ============================================================================

/// One chapter's structured content, excluding its long-form text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterOutline {
    /// 1-based, contiguous within the book
    pub index: u32,
    pub title: String,
    pub summary: String,
    pub key_terms: Vec<String>,
    pub objectives: Vec<String>,
    pub charts: Vec<ChartSpec>,
    pub tables: Vec<TableSpec>,
    pub examples: Vec<Example>,
    pub seed: Seed,
}

// ============================================================================
// Charts
// ============================================================================

/// Chart kind. Determines the shape of the generated series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Monotonic growth across ordered steps
    Line,
    /// Bounded random walk across categories
    Bar,
    /// Non-negative proportions summing to 100
    Pie,
    /// Scores on a shared 0-10 scale, one per dimension
    Radar,
}

impl ChartType {
    /// Get all chart types.
    pub fn all() -> &'static [ChartType] {
        &[ChartType::Line, ChartType::Bar, ChartType::Pie, ChartType::Radar]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Radar => "radar",
        }
    }
}

/// A single named data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// A chart ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSpec {
    /// Every dataset has exactly one value per label.
    pub fn is_well_formed(&self) -> bool {
        !self.labels.is_empty()
            && !self.datasets.is_empty()
            && self
                .datasets
                .iter()
                .all(|d| d.data.len() == self.labels.len())
    }
}

// ============================================================================
// Tables
// ============================================================================

/// A reference table. Every row has one cell per header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    /// Row widths match the header and no cell is blank.
    pub fn is_well_formed(&self) -> bool {
        !self.headers.is_empty()
            && self.rows.iter().all(|row| {
                row.len() == self.headers.len() && row.iter().all(|c| !c.trim().is_empty())
            })
    }
}

// ============================================================================
// Examples
// ============================================================================

/// Short illustrative worked example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub title: String,
    pub body: String,
}
