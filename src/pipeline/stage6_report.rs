use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::input::InputSourceKind;
use crate::model::dataset::CleaningAudit;
use crate::model::insight::QuestionInsight;
use crate::model::scores::Contributions;
use crate::model::weights::UnmappedPolicy;
use crate::pipeline::stage2_insights::CHART_TOP_K;
use crate::pipeline::stage3_scores::Stage3Output;
use crate::pipeline::stage4_filter::FilteredView;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{
    ContributionMeans, FilterSummary, InputMeta, QuestionSummary, ScoreSummary, SummaryData,
    ToolMeta, mean, median, p10, p90,
};

pub const REPORT_FILE_NAME: &str = "report.txt";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Stage6Input<'a> {
    pub input_path: &'a Path,
    pub source: InputSourceKind,
    pub audit: &'a CleaningAudit,
    pub insights: &'a [QuestionInsight],
    pub scoring: &'a Stage3Output,
    pub policy: UnmappedPolicy,
    pub view: &'a FilteredView<'a>,
    pub exported: Option<&'a Path>,
}

pub fn build_summary(input: &Stage6Input<'_>) -> SummaryData {
    let questions = input
        .insights
        .iter()
        .map(|q| QuestionSummary {
            key: q.field.key(),
            question: q.field.column(),
            distinct: q.distinct(),
            top: q.top(CHART_TOP_K).to_vec(),
            insight: q.insight.clone(),
        })
        .collect();

    let scores = &input.scoring.scores;
    let defined = scores.defined();
    let some_if_scored = |v: f64| (!defined.is_empty()).then_some(v);
    let mean_contributions = contribution_means(input.scoring);

    SummaryData {
        tool: ToolMeta {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputMeta {
            path: input.input_path.display().to_string(),
            source: input.source.name(),
        },
        cleaning: input.audit.clone(),
        questions,
        scores: ScoreSummary {
            unmapped_policy: input.policy.name(),
            n_scored: scores.n_scored(),
            n_unscored: scores.n_unscored(),
            median: some_if_scored(median(&defined)),
            p10: some_if_scored(p10(&defined)),
            p90: some_if_scored(p90(&defined)),
            mean: some_if_scored(mean(&defined)),
            min: defined.iter().copied().reduce(f64::min),
            max: defined.iter().copied().reduce(f64::max),
            mean_contributions,
            destination_weights: input
                .scoring
                .destinations
                .iter()
                .map(|(answer, w)| (answer.to_string(), w))
                .collect(),
            defaulted_destinations: input.scoring.defaulted_destinations.clone(),
            unmapped: input.scoring.unmapped.clone(),
        },
        filter: FilterSummary {
            lo: input.view.range().lo(),
            hi: input.view.range().hi(),
            count: input.view.len(),
            exported: input.exported.map(|p| p.display().to_string()),
        },
    }
}

fn contribution_means(scoring: &Stage3Output) -> Option<ContributionMeans> {
    let contributions: Vec<_> = scoring.scores.contributions.iter().flatten().collect();
    if contributions.is_empty() {
        return None;
    }
    let n = contributions.len() as f64;
    let sum = |f: fn(&Contributions) -> f64| contributions.iter().map(|&c| f(c)).sum::<f64>() / n;
    Some(ContributionMeans {
        vaccination: sum(|c| c.vaccination),
        destination: sum(|c| c.destination),
        study_status: sum(|c| c.status),
    })
}

pub fn write_reports(summary: &SummaryData, out_dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let report_path = out_dir.join(REPORT_FILE_NAME);
    write_text(&report_path, &render_report_text(summary))?;

    let summary_path = out_dir.join(SUMMARY_FILE_NAME);
    write_text(&summary_path, &render_summary_json(summary)?)?;

    info!(out_dir = %out_dir.display(), "wrote reports");
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    w.write_all(contents.as_bytes()).map_err(io_err)?;
    w.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
