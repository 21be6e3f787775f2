use super::*;
use crate::fixtures::{sample_rows, survey_table};
use crate::model::weights::WeightProfile;
use crate::pipeline::stage1_clean::{Stage1Output, run_stage1};
use crate::pipeline::stage3_scores::{Stage3Inputs, Stage3Output, run_stage3};
use crate::pipeline::stage4_filter::{ScoreRange, filter_by_score};

fn counts(pairs: &[(&str, usize)]) -> Vec<AnswerCount> {
    pairs
        .iter()
        .map(|&(answer, count)| AnswerCount {
            answer: answer.to_string(),
            count,
        })
        .collect()
}

#[test]
fn test_bar_table_scales_to_longest() {
    let out = render_bar_table("Q?", &counts(&[("Australia", 40), ("Canada", 10), ("UK", 0)]));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Distribution of Responses for: \"Q?\"");
    assert_eq!(lines[1], format!("  Australia | {} 40", "#".repeat(40)));
    assert_eq!(lines[2], format!("  Canada    | {} 10", "#".repeat(10)));
    assert_eq!(lines[3], "  UK        |  0");
}

#[test]
fn test_bar_length_minimum_one_cell() {
    assert_eq!(bar_length(1, 1000), 1);
    assert_eq!(bar_length(0, 1000), 0);
    assert_eq!(bar_length(5, 0), 0);
    assert_eq!(bar_length(7, 7), BAR_WIDTH);
}

#[test]
fn test_headings() {
    assert_eq!(
        range_heading(0.5, 1.0),
        "Students with Likelihood to Study Abroad Score between 0.5 and 1.0"
    );
    assert_eq!(
        count_line(3),
        "Total number of possible students to study abroad: 3"
    );
}

fn scored_view_parts() -> (Stage1Output, Stage3Output) {
    let stage1 = run_stage1(survey_table(&sample_rows())).unwrap();
    let stage3 = run_stage3(&Stage3Inputs {
        dataset: &stage1.dataset,
        fields: &stage1.fields,
        profile: &WeightProfile::default_v1(),
    })
    .unwrap();
    (stage1, stage3)
}

#[test]
fn test_view_table_shows_every_column() {
    let (stage1, stage3) = scored_view_parts();
    let view = filter_by_score(&stage1.dataset, &stage3.scores, ScoreRange::full());
    let out = render_view_table(&view, RowLimit::All);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 6);

    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(header[0], "row");
    assert_eq!(&header[1..7], stage1.dataset.columns.as_slice());
    assert_eq!(header[7], SCORE_COLUMN);

    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(first.len(), 8);
    assert_eq!(first[0], "0");
    assert_eq!(&first[1..7], stage1.dataset.rows[0].as_slice());
    assert_eq!(first[7], "1.0");
    assert!(lines[2].ends_with("\t0.32"));
}

#[test]
fn test_view_table_truncates() {
    let (stage1, stage3) = scored_view_parts();
    let view = filter_by_score(&stage1.dataset, &stage3.scores, ScoreRange::full());
    let out = render_view_table(&view, RowLimit::First(2));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3], "... 3 more");
}

#[test]
fn test_dataset_table() {
    let (stage1, _) = scored_view_parts();
    let out = render_dataset_table(&stage1.dataset, RowLimit::All);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], format!("row\t{}", stage1.dataset.columns.join("\t")));
    assert_eq!(lines[5], format!("4\t{}", stage1.dataset.rows[4].join("\t")));
}

#[test]
fn test_row_limit_from_str() {
    assert_eq!("all".parse::<RowLimit>().unwrap(), RowLimit::All);
    assert_eq!("ALL".parse::<RowLimit>().unwrap(), RowLimit::All);
    assert_eq!("20".parse::<RowLimit>().unwrap(), RowLimit::First(20));
    assert!("-1".parse::<RowLimit>().is_err());
    assert!("".parse::<RowLimit>().is_err());
}
