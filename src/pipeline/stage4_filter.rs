use thiserror::Error;
use tracing::{debug, warn};

use crate::model::dataset::Dataset;
use crate::model::scores::LikelihoodScores;

/// Granularity of the score range control.
pub const SCORE_STEP: f64 = 0.05;
const STEPS_PER_UNIT: f64 = 1.0 / SCORE_STEP;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("score range [{lo}, {hi}] must lie within [0, 1]")]
    OutOfBounds { lo: f64, hi: f64 },
}

/// Closed score interval. `lo > hi` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    lo: f64,
    hi: f64,
}

impl ScoreRange {
    pub fn new(lo: f64, hi: f64) -> Result<Self, FilterError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(lo) || !in_unit(hi) {
            return Err(FilterError::OutOfBounds { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Builds a range from user input snapped to the control step. The raw
    /// bounds must already lie within [0, 1].
    pub fn snapped(lo: f64, hi: f64) -> Result<Self, FilterError> {
        Self::new(lo, hi)?;
        let (slo, shi) = (snap_to_step(lo), snap_to_step(hi));
        if slo != lo || shi != hi {
            warn!(lo, hi, snapped_lo = slo, snapped_hi = shi, "score range snapped to 0.05 steps");
        }
        Self::new(slo, shi)
    }

    pub fn full() -> Self {
        Self { lo: 0.0, hi: 1.0 }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// True when every score this range matches is also matched by `outer`.
    pub fn is_within(&self, outer: ScoreRange) -> bool {
        self.is_empty() || (self.lo >= outer.lo && self.hi <= outer.hi)
    }

    pub fn contains(&self, score: f64) -> bool {
        score >= self.lo && score <= self.hi
    }
}

pub fn snap_to_step(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * STEPS_PER_UNIT).round() / STEPS_PER_UNIT + 0.0
}

/// Respondents whose score lies in a range. Borrows the scored dataset.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    scores: &'a LikelihoodScores,
    range: ScoreRange,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn range(&self) -> ScoreRange {
        self.range
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Row cells and score, in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a [String], f64)> + '_ {
        self.rows.iter().filter_map(|&row| {
            let score = self.scores.score[row]?;
            Some((row, self.dataset.rows[row].as_slice(), score))
        })
    }

    /// Filters this view again. Applying the same range twice leaves it unchanged.
    pub fn refine(&self, range: ScoreRange) -> FilteredView<'a> {
        let rows = select_rows(self.scores, self.rows().iter().copied(), range);
        FilteredView {
            dataset: self.dataset,
            scores: self.scores,
            range,
            rows,
        }
    }
}

pub fn filter_by_score<'a>(
    dataset: &'a Dataset,
    scores: &'a LikelihoodScores,
    range: ScoreRange,
) -> FilteredView<'a> {
    let rows = select_rows(scores, 0..dataset.n_rows(), range);
    debug!(lo = range.lo(), hi = range.hi(), matched = rows.len(), "filtered respondents");
    FilteredView {
        dataset,
        scores,
        range,
        rows,
    }
}

fn select_rows(
    scores: &LikelihoodScores,
    candidates: impl Iterator<Item = usize>,
    range: ScoreRange,
) -> Vec<usize> {
    candidates
        .filter(|&row| {
            scores
                .score
                .get(row)
                .copied()
                .flatten()
                .is_some_and(|s| range.contains(s))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_filter.rs"]
mod tests;
