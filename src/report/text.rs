use std::str::FromStr;

use crate::input::schema::SCORE_COLUMN;
use crate::model::dataset::Dataset;
use crate::model::insight::AnswerCount;
use crate::pipeline::stage4_filter::FilteredView;
use crate::report::{SummaryData, format_f64_6, format_float};

const BAR_WIDTH: usize = 40;

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Student Study Abroad and COVID-19 Impact Report\n");
    out.push_str("===============================================\n\n");

    out.push_str("1. Dataset\n");
    out.push_str(&format!("Input: {} ({})\n", data.input.path, data.input.source));
    out.push_str(&format!(
        "Rows: {} raw, {} retained, {} dropped for missing values\n",
        data.cleaning.rows_raw, data.cleaning.rows_retained, data.cleaning.rows_dropped
    ));
    if data.cleaning.columns_dropped.is_empty() {
        out.push_str("Identifier columns dropped: none present\n\n");
    } else {
        out.push_str(&format!(
            "Identifier columns dropped: {}\n\n",
            data.cleaning.columns_dropped.join("; ")
        ));
    }

    out.push_str("2. Question insights\n");
    for q in &data.questions {
        out.push('\n');
        out.push_str(&render_bar_table(q.question, &q.top));
        out.push_str(&format!("{}\n", q.insight));
    }
    out.push('\n');

    out.push_str("3. Likelihood to study abroad\n");
    let s = &data.scores;
    out.push_str(&format!(
        "Scored respondents: {} (undefined: {}, unmapped policy: {})\n",
        s.n_scored, s.n_unscored, s.unmapped_policy
    ));
    if let (Some(median), Some(p10), Some(p90)) = (s.median, s.p10, s.p90) {
        out.push_str(&format!(
            "Score median: {}, p10: {}, p90: {}\n",
            format_f64_6(median),
            format_f64_6(p10),
            format_f64_6(p90)
        ));
    }
    if let Some(c) = s.mean_contributions {
        out.push_str(&format!(
            "Mean contributions: vaccination={}, destination={}, study_status={}\n",
            format_f64_6(c.vaccination),
            format_f64_6(c.destination),
            format_f64_6(c.study_status)
        ));
    }
    let weights: Vec<String> = s
        .destination_weights
        .iter()
        .map(|(answer, w)| format!("{}={}", answer, format_float(*w)))
        .collect();
    out.push_str(&format!("Destination weights: {}\n", weights.join(", ")));
    if !s.defaulted_destinations.is_empty() {
        out.push_str(&format!(
            "Destinations at default weight: {}\n",
            s.defaulted_destinations.join(", ")
        ));
    }
    for u in &s.unmapped {
        out.push_str(&format!(
            "Unmapped {} answer {:?}: {} row(s)\n",
            u.field, u.value, u.rows
        ));
    }
    out.push('\n');

    out.push_str("4. Filter\n");
    out.push_str(&range_heading(data.filter.lo, data.filter.hi));
    out.push('\n');
    out.push_str(&count_line(data.filter.count));
    out.push('\n');
    if let Some(path) = &data.filter.exported {
        out.push_str(&format!("Exported to: {}\n", path));
    }

    out
}

/// Horizontal bar chart as text. The longest bar spans the full width.
pub fn render_bar_table(question: &str, counts: &[AnswerCount]) -> String {
    let mut out = format!("Distribution of Responses for: \"{}\"\n", question);
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let label_width = counts
        .iter()
        .map(|c| c.answer.chars().count())
        .max()
        .unwrap_or(0);
    for c in counts {
        let bar = bar_length(c.count, max);
        out.push_str(&format!(
            "  {:<width$} | {} {}\n",
            c.answer,
            "#".repeat(bar),
            c.count,
            width = label_width
        ));
    }
    out
}

fn bar_length(count: usize, max: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let scaled = (count as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    scaled.max(1)
}

pub fn range_heading(lo: f64, hi: f64) -> String {
    format!(
        "Students with Likelihood to Study Abroad Score between {} and {}",
        format_float(lo),
        format_float(hi)
    )
}

pub fn count_line(count: usize) -> String {
    format!("Total number of possible students to study abroad: {}", count)
}

/// Number of rows a console table prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLimit {
    All,
    First(usize),
}

impl RowLimit {
    fn count(self) -> usize {
        match self {
            RowLimit::All => usize::MAX,
            RowLimit::First(n) => n,
        }
    }
}

impl FromStr for RowLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(RowLimit::All);
        }
        s.parse::<usize>()
            .map(RowLimit::First)
            .map_err(|_| format!("expected a row count or 'all', got {s:?}"))
    }
}

/// Cleaned dataset as a tab-separated table, one line per respondent.
pub fn render_dataset_table(dataset: &Dataset, limit: RowLimit) -> String {
    let mut out = String::new();
    push_header(&mut out, &dataset.columns, None);
    for (row, cells) in dataset.rows.iter().enumerate().take(limit.count()) {
        push_cells(&mut out, row, cells, None);
    }
    push_remainder(&mut out, dataset.n_rows(), limit);
    out
}

/// Filtered respondents with every cleaned column and their score.
pub fn render_view_table(view: &FilteredView<'_>, limit: RowLimit) -> String {
    let mut out = String::new();
    push_header(&mut out, &view.dataset().columns, Some(SCORE_COLUMN));
    for (row, cells, score) in view.iter().take(limit.count()) {
        push_cells(&mut out, row, cells, Some(score));
    }
    push_remainder(&mut out, view.len(), limit);
    out
}

fn push_header(out: &mut String, columns: &[String], extra: Option<&str>) {
    out.push_str("row");
    for name in columns.iter().map(String::as_str).chain(extra) {
        out.push('\t');
        out.push_str(name);
    }
    out.push('\n');
}

fn push_cells(out: &mut String, row: usize, cells: &[String], score: Option<f64>) {
    out.push_str(&row.to_string());
    for cell in cells {
        out.push('\t');
        out.push_str(cell);
    }
    if let Some(score) = score {
        out.push('\t');
        out.push_str(&format_float(score));
    }
    out.push('\n');
}

fn push_remainder(out: &mut String, total: usize, limit: RowLimit) {
    if total > limit.count() {
        out.push_str(&format!("... {} more\n", total - limit.count()));
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
