use std::path::Path;

use super::*;
use crate::fixtures::{make_temp_dir, sample_rows, write_survey_csv};
use crate::input::schema::SCORE_COLUMN;
use crate::model::weights::UnmappedPolicy;
use crate::pipeline::stage5_export::EXPORT_FILE_NAME;
use crate::pipeline::stage6_report::{REPORT_FILE_NAME, SUMMARY_FILE_NAME};

fn run_args(input: &Path, out: &Path, min: f64, max: f64, export: bool) -> RunArgs {
    RunArgs {
        source: SourceArgs {
            input: input.to_path_buf(),
            out: out.to_path_buf(),
            strict: false,
            delimiter: ',',
            preview: RowLimit::All,
            show_cleaned: false,
        },
        min,
        max,
        export,
    }
}

fn run_to_string(args: &RunArgs) -> (Result<(), PipelineError>, String) {
    let mut buf = Vec::new();
    let result = run_once(args, &mut buf);
    (result, String::from_utf8(buf).unwrap())
}

fn read_summary(out: &Path) -> serde_json::Value {
    let json = std::fs::read_to_string(out.join(SUMMARY_FILE_NAME)).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_run_defaults() {
    let cli = Cli::try_parse_from(["abroad-survey", "run", "--input", "s.csv", "--out", "out"])
        .unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.source.input, PathBuf::from("s.csv"));
    assert_eq!(args.source.out, PathBuf::from("out"));
    assert_eq!(args.source.delimiter, ',');
    assert!(!args.source.strict);
    assert_eq!(args.min, 0.0);
    assert_eq!(args.max, 1.0);
    assert!(!args.export);
    assert_eq!(args.source.preview, RowLimit::All);
    assert!(!args.source.show_cleaned);
}

#[test]
fn test_run_with_range_and_export() {
    let cli = Cli::try_parse_from([
        "abroad-survey",
        "run",
        "--input",
        "s.csv.gz",
        "--out",
        "out",
        "--min",
        "0.5",
        "--max",
        "0.9",
        "--export",
        "--strict",
        "--delimiter",
        ";",
        "--preview",
        "5",
        "--show-cleaned",
    ])
    .unwrap();
    let Command::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.min, 0.5);
    assert_eq!(args.max, 0.9);
    assert!(args.export);
    assert!(args.source.strict);
    assert_eq!(args.source.delimiter, ';');
    assert_eq!(args.source.preview, RowLimit::First(5));
    assert!(args.source.show_cleaned);
}

#[test]
fn test_bad_preview_is_rejected() {
    let parsed = Cli::try_parse_from([
        "abroad-survey",
        "run",
        "--input",
        "s.csv",
        "--out",
        "o",
        "--preview",
        "some",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_explore_subcommand() {
    let cli = Cli::try_parse_from(["abroad-survey", "explore", "--input", "s.csv", "--out", "o"])
        .unwrap();
    assert!(matches!(cli.command, Command::Explore(_)));
}

#[test]
fn test_missing_input_is_rejected() {
    assert!(Cli::try_parse_from(["abroad-survey", "run", "--out", "o"]).is_err());
    assert!(Cli::try_parse_from(["abroad-survey"]).is_err());
}

#[test]
fn test_weight_profile_policy() {
    assert_eq!(weight_profile(false).unmapped, UnmappedPolicy::Missing);
    assert_eq!(weight_profile(true).unmapped, UnmappedPolicy::Strict);
}

#[test]
fn test_run_once_prints_exports_and_reports() {
    let dir = make_temp_dir("run_once");
    let input = write_survey_csv(&dir, &sample_rows());
    let out = dir.join("out");
    let (result, stdout) = run_to_string(&run_args(&input, &out, 0.52, 1.0, true));
    result.unwrap();

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6 + 1 + 1 + 3 + 1);
    assert!(lines[0].starts_with(
        "- The most common responses for 'What is your preferred study destination?' are 'Germany' with 2 responses"
    ));
    assert_eq!(
        lines[6],
        "Students with Likelihood to Study Abroad Score between 0.5 and 1.0"
    );
    assert!(lines[7].starts_with("row\tWhat is your preferred study destination?\t"));
    assert!(lines[7].ends_with(SCORE_COLUMN));
    assert!(lines[8].starts_with("0\tAustralia\tPfizer\t"));
    assert!(lines[8].ends_with("\t1.0"));
    assert_eq!(
        lines[11],
        "Total number of possible students to study abroad: 3"
    );

    let mut rdr = csv::Reader::from_path(out.join(EXPORT_FILE_NAME)).unwrap();
    assert_eq!(rdr.records().count(), 3);
    assert!(out.join(REPORT_FILE_NAME).exists());
    let summary = read_summary(&out);
    assert_eq!(summary["filter"]["count"], 3);
    assert_eq!(summary["filter"]["lo"], 0.5);
    assert!(summary["filter"]["exported"].is_string());
}

#[test]
fn test_run_once_without_export_writes_only_reports() {
    let dir = make_temp_dir("run_once_plain");
    let input = write_survey_csv(&dir, &sample_rows());
    let out = dir.join("out");
    let (result, stdout) = run_to_string(&run_args(&input, &out, 0.0, 1.0, false));
    result.unwrap();
    assert!(stdout.contains("Total number of possible students to study abroad: 5"));
    assert!(!out.join(EXPORT_FILE_NAME).exists());
    assert!(read_summary(&out)["filter"]["exported"].is_null());
}

#[test]
fn test_failed_export_still_writes_reports() {
    let dir = make_temp_dir("run_once_export_fail");
    let input = write_survey_csv(&dir, &sample_rows());
    let out = dir.join("out");
    std::fs::create_dir_all(out.join(EXPORT_FILE_NAME)).unwrap();

    let (result, stdout) = run_to_string(&run_args(&input, &out, 0.0, 1.0, true));
    assert!(matches!(result, Err(PipelineError::Export(_))));
    assert!(stdout.contains("Total number of possible students to study abroad: 5"));
    assert!(out.join(REPORT_FILE_NAME).exists());
    let summary = read_summary(&out);
    assert_eq!(summary["filter"]["count"], 5);
    assert!(summary["filter"]["exported"].is_null());
}

#[test]
fn test_show_cleaned_and_preview_limit() {
    let dir = make_temp_dir("run_once_preview");
    let input = write_survey_csv(&dir, &sample_rows());
    let mut args = run_args(&input, &dir.join("out"), 0.0, 1.0, false);
    args.source.show_cleaned = true;
    args.source.preview = RowLimit::First(2);
    let (result, stdout) = run_to_string(&args);
    result.unwrap();

    let first = stdout.lines().next().unwrap();
    assert!(first.starts_with("row\tWhat is your preferred study destination?"));
    assert!(!first.contains(SCORE_COLUMN));
    assert_eq!(stdout.matches("... 3 more").count(), 2);
}

#[test]
fn test_out_of_range_bounds_fail_before_loading() {
    let dir = make_temp_dir("run_once_bounds");
    let args = run_args(&dir.join("missing.csv"), &dir.join("out"), -0.02, 1.0, false);
    let (result, stdout) = run_to_string(&args);
    assert!(matches!(result, Err(PipelineError::Filter(_))));
    assert!(stdout.is_empty());
}
