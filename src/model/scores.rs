use serde::Serialize;

use crate::input::schema::SurveyField;
use crate::model::weights::clip01;

/// Weighted sub-scores of one respondent, already multiplied by their field weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contributions {
    pub vaccination: f64,
    pub destination: f64,
    pub status: f64,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        clip01(self.vaccination + self.destination + self.status)
    }
}

#[derive(Debug, Clone)]
pub struct LikelihoodScores {
    pub score: Vec<Option<f64>>,
    pub contributions: Vec<Option<Contributions>>,
}

impl LikelihoodScores {
    pub fn n_scored(&self) -> usize {
        self.score.iter().filter(|s| s.is_some()).count()
    }

    pub fn n_unscored(&self) -> usize {
        self.score.len() - self.n_scored()
    }

    pub fn defined(&self) -> Vec<f64> {
        self.score.iter().flatten().copied().collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnmappedValue {
    pub field: &'static str,
    pub value: String,
    pub rows: usize,
}

impl UnmappedValue {
    pub fn new(field: SurveyField, value: &str, rows: usize) -> Self {
        Self {
            field: field.key(),
            value: value.to_string(),
            rows,
        }
    }
}
