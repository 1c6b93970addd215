//! Chart Data Synthesizer
//!
//! Produces 1-3 charts per chapter. Labels come from the chapter's key terms;
//! numbers come from the chapter seed. The chart type fixes the series shape:
//!
//! | Type  | Labels                  | Series                                   |
//! |-------|-------------------------|------------------------------------------|
//! | line  | Phase 1..Phase n        | monotonic growth, one series per term    |
//! | bar   | key terms               | bounded random walk in [10, 100]         |
//! | pie   | key terms               | non-negative integer shares summing to 100 |
//! | radar | key terms (dimensions)  | 0-10 scores, "Proficient" >= "Novice"    |

use super::arc::ArcStage;
use super::rng::{Seed, SeededRandom};
use super::types::{ChartSpec, ChartType, Dataset};

pub const MIN_CHARTS: usize = 1;
pub const MAX_CHARTS: usize = 3;

const LINE_POINTS: usize = 6;
const BAR_FLOOR: f64 = 10.0;
const BAR_CEILING: f64 = 100.0;
const RADAR_MAX: f64 = 10.0;

/// Round to one decimal place so serialized values stay short and stable.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChartDataSynthesizer;

impl ChartDataSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Synthesize the charts for one chapter.
    pub fn synthesize(&self, stage: ArcStage, key_terms: &[String], seed: Seed) -> Vec<ChartSpec> {
        let stage_label = [stage.label().to_string()];
        let key_terms = if key_terms.is_empty() { &stage_label[..] } else { key_terms };

        let mut rng = seed.rng("charts");
        let count = MIN_CHARTS + rng.below(MAX_CHARTS - MIN_CHARTS + 1);

        let lead = stage.lead_chart();
        let mut others: Vec<ChartType> = ChartType::all()
            .iter()
            .copied()
            .filter(|t| *t != lead)
            .collect();
        rng.shuffle(&mut others);

        std::iter::once(lead)
            .chain(others)
            .take(count)
            .enumerate()
            .map(|(i, chart_type)| {
                // Each chart leads with a different term
                let offset = i % key_terms.len().max(1);
                let rotated: Vec<String> = key_terms[offset..]
                    .iter()
                    .chain(key_terms[..offset].iter())
                    .cloned()
                    .collect();
                self.chart(chart_type, &rotated, &mut rng)
            })
            .collect()
    }

    fn chart(&self, chart_type: ChartType, terms: &[String], rng: &mut SeededRandom) -> ChartSpec {
        match chart_type {
            ChartType::Line => line_chart(terms, rng),
            ChartType::Bar => bar_chart(terms, rng),
            ChartType::Pie => pie_chart(terms, rng),
            ChartType::Radar => radar_chart(terms, rng),
        }
    }
}

fn term_labels(terms: &[String], min: usize, max: usize, rng: &mut SeededRandom) -> Vec<String> {
    let wanted = min + rng.below(max - min + 1);
    terms.iter().take(wanted.min(terms.len())).cloned().collect()
}

fn line_chart(terms: &[String], rng: &mut SeededRandom) -> ChartSpec {
    let labels: Vec<String> = (1..=LINE_POINTS).map(|p| format!("Phase {p}")).collect();
    let series = 1 + rng.below(2).min(terms.len().saturating_sub(1));

    let datasets = terms
        .iter()
        .take(series)
        .map(|term| {
            let mut value = rng.float_between(10.0, 30.0);
            let data = (0..LINE_POINTS)
                .map(|_| {
                    let point = round1(value);
                    value += rng.float_between(2.0, 12.0);
                    point
                })
                .collect();
            Dataset {
                label: term.clone(),
                data,
            }
        })
        .collect();

    ChartSpec {
        chart_type: ChartType::Line,
        title: format!("Growth of {} Across Learning Phases", terms[0]),
        labels,
        datasets,
    }
}

fn bar_chart(terms: &[String], rng: &mut SeededRandom) -> ChartSpec {
    let labels = term_labels(terms, 4, 6, rng);
    let mut value = rng.float_between(40.0, 70.0);
    let data = labels
        .iter()
        .map(|_| {
            let point = round1(value);
            value = (value + rng.float_between(-15.0, 15.0)).clamp(BAR_FLOOR, BAR_CEILING);
            point
        })
        .collect();

    ChartSpec {
        chart_type: ChartType::Bar,
        title: format!("Relative Emphasis: {} and Related Ideas", terms[0]),
        labels,
        datasets: vec![Dataset {
            label: "Emphasis score".to_string(),
            data,
        }],
    }
}

fn pie_chart(terms: &[String], rng: &mut SeededRandom) -> ChartSpec {
    let labels = term_labels(terms, 3, 5, rng);
    let weights: Vec<f64> = labels.iter().map(|_| rng.float_between(1.0, 10.0)).collect();

    ChartSpec {
        chart_type: ChartType::Pie,
        title: format!("Where Study Time Goes Around {}", terms[0]),
        labels,
        datasets: vec![Dataset {
            label: "Share of study time (%)".to_string(),
            data: percentages(&weights),
        }],
    }
}

fn radar_chart(terms: &[String], rng: &mut SeededRandom) -> ChartSpec {
    let labels = term_labels(terms, 5, 6, rng);
    let novice: Vec<f64> = labels
        .iter()
        .map(|_| round1(rng.float_between(2.0, 6.0)))
        .collect();
    let proficient: Vec<f64> = novice
        .iter()
        .map(|v| round1((v + rng.float_between(1.5, 4.0)).min(RADAR_MAX)))
        .collect();

    ChartSpec {
        chart_type: ChartType::Radar,
        title: format!("Skill Profile: {} and Neighbouring Concepts", terms[0]),
        labels,
        datasets: vec![
            Dataset {
                label: "Novice".to_string(),
                data: novice,
            },
            Dataset {
                label: "Proficient".to_string(),
                data: proficient,
            },
        ],
    }
}

/// Integer percentages summing to exactly 100 (largest remainder method).
fn percentages(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return vec![0.0; weights.len()];
    }

    let raw: Vec<f64> = weights.iter().map(|w| w / total * 100.0).collect();
    let mut floors: Vec<u32> = raw.iter().map(|r| r.floor() as u32).collect();
    let mut remaining = 100u32.saturating_sub(floors.iter().sum::<u32>());

    let mut by_remainder: Vec<usize> = (0..raw.len()).collect();
    // Stable: ties go to the earlier label
    by_remainder.sort_by(|&a, &b| {
        let ra = raw[a] - raw[a].floor();
        let rb = raw[b] - raw[b].floor();
        rb.total_cmp(&ra)
    });
    for idx in by_remainder {
        if remaining == 0 {
            break;
        }
        floors[idx] += 1;
        remaining -= 1;
    }

    floors.into_iter().map(f64::from).collect()
}
