use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::dataset::CleaningAudit;
use crate::model::insight::AnswerCount;
use crate::model::scores::UnmappedValue;

pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub path: String,
    pub source: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub key: &'static str,
    pub question: &'static str,
    pub distinct: usize,
    pub top: Vec<AnswerCount>,
    pub insight: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContributionMeans {
    pub vaccination: f64,
    pub destination: f64,
    pub study_status: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub unmapped_policy: &'static str,
    pub n_scored: usize,
    pub n_unscored: usize,
    pub median: Option<f64>,
    pub p10: Option<f64>,
    pub p90: Option<f64>,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean_contributions: Option<ContributionMeans>,
    /// Destination table after unlisted destinations got the default weight.
    pub destination_weights: BTreeMap<String, f64>,
    pub defaulted_destinations: Vec<String>,
    pub unmapped: Vec<UnmappedValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
    pub exported: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub input: InputMeta,
    pub cleaning: CleaningAudit,
    pub questions: Vec<QuestionSummary>,
    pub scores: ScoreSummary,
    pub filter: FilterSummary,
}

/// Shortest round-trip form; integral values keep a trailing `.0`.
pub fn format_float(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p10(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.10)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
