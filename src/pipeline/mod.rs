use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::input::{InputBundle, InputError, InputSourceKind, load_survey};
use crate::model::dataset::{CleaningAudit, Dataset};
use crate::model::insight::QuestionInsight;
use crate::model::weights::WeightProfile;
use crate::report::SummaryData;

pub mod stage1_clean;
pub mod stage2_insights;
pub mod stage3_scores;
pub mod stage4_filter;
pub mod stage5_export;
pub mod stage6_report;

use stage1_clean::run_stage1;
use stage2_insights::{InsightError, run_stage2};
use stage3_scores::{ScoreError, Stage3Inputs, Stage3Output, run_stage3};
use stage4_filter::{FilterError, FilteredView, ScoreRange, filter_by_score};
use stage5_export::ExportError;
use stage6_report::{ReportError, Stage6Input, build_summary};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Insight(#[from] InsightError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("console IO error: {0}")]
    Console(#[from] std::io::Error),
}

/// Loaded, cleaned and scored survey. Read-only once built; only filtering
/// runs again when the score range changes.
#[derive(Debug)]
pub struct ScoredSurvey {
    pub input_path: PathBuf,
    pub source: InputSourceKind,
    pub profile: WeightProfile,
    pub dataset: Dataset,
    pub audit: CleaningAudit,
    pub insights: Vec<QuestionInsight>,
    pub scoring: Stage3Output,
}

impl ScoredSurvey {
    pub fn load(
        path: &Path,
        delimiter: u8,
        profile: WeightProfile,
    ) -> Result<Self, PipelineError> {
        let bundle = load_survey(path, delimiter)?;
        Self::from_bundle(bundle, profile)
    }

    pub fn from_bundle(bundle: InputBundle, profile: WeightProfile) -> Result<Self, PipelineError> {
        let stage1 = run_stage1(bundle.table)?;
        let insights = run_stage2(&stage1.dataset, &stage1.fields)?;
        let scoring = run_stage3(&Stage3Inputs {
            dataset: &stage1.dataset,
            fields: &stage1.fields,
            profile: &profile,
        })?;
        Ok(Self {
            input_path: bundle.path,
            source: bundle.source,
            profile,
            dataset: stage1.dataset,
            audit: stage1.audit,
            insights,
            scoring,
        })
    }

    pub fn view(&self, range: ScoreRange) -> FilteredView<'_> {
        filter_by_score(&self.dataset, &self.scoring.scores, range)
    }

    pub fn summary(&self, view: &FilteredView<'_>, exported: Option<&Path>) -> SummaryData {
        build_summary(&Stage6Input {
            input_path: &self.input_path,
            source: self.source,
            audit: &self.audit,
            insights: &self.insights,
            scoring: &self.scoring,
            policy: self.profile.unmapped,
            view,
            exported,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
