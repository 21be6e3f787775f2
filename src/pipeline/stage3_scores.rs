use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::input::schema::SurveyField;
use crate::model::dataset::{Dataset, FieldIndex};
use crate::model::scores::{Contributions, LikelihoodScores, UnmappedValue};
use crate::model::weights::{UnmappedPolicy, WeightProfile, WeightTable};

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("unmapped value {value:?} for '{}' on input line {line}", .field.column())]
    Unmapped {
        field: SurveyField,
        value: String,
        line: u64,
    },
    #[error("invalid weight profile: {0}")]
    InvalidProfile(String),
}

#[derive(Debug, Clone)]
pub struct Stage3Inputs<'a> {
    pub dataset: &'a Dataset,
    pub fields: &'a FieldIndex,
    pub profile: &'a WeightProfile,
}

#[derive(Debug)]
pub struct Stage3Output {
    pub scores: LikelihoodScores,
    /// Destination table extended with every observed value.
    pub destinations: WeightTable,
    pub defaulted_destinations: Vec<String>,
    pub unmapped: Vec<UnmappedValue>,
}

pub fn run_stage3(inputs: &Stage3Inputs<'_>) -> Result<Stage3Output, ScoreError> {
    let profile = inputs.profile;
    profile.validate().map_err(ScoreError::InvalidProfile)?;

    let dataset = inputs.dataset;
    let vacc_col = inputs.fields.get(SurveyField::Vaccination);
    let dest_col = inputs.fields.get(SurveyField::Destination);
    let status_col = inputs.fields.get(SurveyField::StudyStatus);

    let mut destinations = profile.destination.clone();
    let defaulted_destinations = destinations.extend_with_fallback(dataset.column_values(dest_col));
    if !defaulted_destinations.is_empty() {
        info!(
            count = defaulted_destinations.len(),
            table_size = destinations.len(),
            "destinations assigned the default weight"
        );
    }

    let n = dataset.n_rows();
    let mut scores = LikelihoodScores {
        score: Vec::with_capacity(n),
        contributions: Vec::with_capacity(n),
    };
    let mut unmapped: BTreeMap<(SurveyField, &str), usize> = BTreeMap::new();

    for row in 0..n {
        let vaccination = dataset.value(row, vacc_col);
        let destination = dataset.value(row, dest_col);
        let status = dataset.value(row, status_col);
        match score_respondent(profile, &destinations, vaccination, destination, status) {
            Ok(c) => {
                scores.score.push(Some(c.total()));
                scores.contributions.push(Some(c));
            }
            Err(field) => {
                let value = match field {
                    SurveyField::Vaccination => vaccination,
                    SurveyField::Destination => destination,
                    _ => status,
                };
                if profile.unmapped == UnmappedPolicy::Strict {
                    return Err(ScoreError::Unmapped {
                        field,
                        value: value.to_string(),
                        line: dataset.source_line(row),
                    });
                }
                *unmapped.entry((field, value)).or_insert(0) += 1;
                scores.score.push(None);
                scores.contributions.push(None);
            }
        }
    }

    let unmapped: Vec<UnmappedValue> = unmapped
        .into_iter()
        .map(|((field, value), rows)| UnmappedValue::new(field, value, rows))
        .collect();
    for u in &unmapped {
        warn!(
            field = u.field,
            value = %u.value,
            rows = u.rows,
            "unmapped answer; score left undefined"
        );
    }

    info!(
        scored = scores.n_scored(),
        unscored = scores.n_unscored(),
        policy = profile.unmapped.name(),
        "computed likelihood scores"
    );

    Ok(Stage3Output {
        scores,
        destinations,
        defaulted_destinations,
        unmapped,
    })
}

/// Weighted contributions for one answer triple. On failure returns the first
/// field whose answer has no weight, checked in vaccination, destination, status order.
pub fn score_respondent(
    profile: &WeightProfile,
    destinations: &WeightTable,
    vaccination: &str,
    destination: &str,
    status: &str,
) -> Result<Contributions, SurveyField> {
    let v = profile
        .vaccination
        .get(vaccination)
        .ok_or(SurveyField::Vaccination)?;
    let d = destinations
        .get(destination)
        .or(destinations.fallback())
        .ok_or(SurveyField::Destination)?;
    let s = profile.status.get(status).ok_or(SurveyField::StudyStatus)?;
    Ok(Contributions {
        vaccination: v * profile.vaccination_weight,
        destination: d * profile.destination_weight,
        status: s * profile.status_weight,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_scores.rs"]
mod tests;
