use serde::Serialize;

use crate::input::schema::SurveyField;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerCount {
    pub answer: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct QuestionInsight {
    pub field: SurveyField,
    /// Descending by count; ties keep first-appearance order.
    pub counts: Vec<AnswerCount>,
    pub insight: String,
}

impl QuestionInsight {
    pub fn top(&self, k: usize) -> &[AnswerCount] {
        &self.counts[..self.counts.len().min(k)]
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }
}
