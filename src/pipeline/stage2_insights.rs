use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::input::schema::{SurveyField, question_order};
use crate::model::dataset::{Dataset, FieldIndex};
use crate::model::insight::{AnswerCount, QuestionInsight};

/// Number of answers shown in each distribution chart.
pub const CHART_TOP_K: usize = 10;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error(
        "question '{question}' has {distinct} distinct answer(s); an insight needs at least 2"
    )]
    TooFewAnswers { question: String, distinct: usize },
}

pub fn run_stage2(
    dataset: &Dataset,
    fields: &FieldIndex,
) -> Result<Vec<QuestionInsight>, InsightError> {
    let mut out = Vec::with_capacity(question_order().len());
    for &field in question_order() {
        out.push(question_insight(dataset, fields, field)?);
    }
    info!(questions = out.len(), "computed question insights");
    Ok(out)
}

pub fn question_insight(
    dataset: &Dataset,
    fields: &FieldIndex,
    field: SurveyField,
) -> Result<QuestionInsight, InsightError> {
    let counts = value_counts(dataset.column_values(fields.get(field)));
    let insight = insight_sentence(field.column(), &counts)?;
    debug!(question = field.key(), distinct = counts.len(), "{}", insight);
    Ok(QuestionInsight {
        field,
        counts,
        insight,
    })
}

/// Counts answers, descending by count. Equal counts keep first-appearance order.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<AnswerCount> {
    let mut slot: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<AnswerCount> = Vec::new();
    for value in values {
        match slot.get(value) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                slot.insert(value, counts.len());
                counts.push(AnswerCount {
                    answer: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn insight_sentence(question: &str, counts: &[AnswerCount]) -> Result<String, InsightError> {
    let [first, second, ..] = counts else {
        return Err(InsightError::TooFewAnswers {
            question: question.to_string(),
            distinct: counts.len(),
        });
    };
    Ok(format!(
        "- The most common responses for '{}' are '{}' with {} responses and '{}' with {} responses.",
        question, first.answer, first.count, second.answer, second.count
    ))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_insights.rs"]
mod tests;
