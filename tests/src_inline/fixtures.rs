use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::input::reader::RawTable;
use crate::input::schema::{SurveyField, question_order};
use crate::input::{InputBundle, InputSourceKind};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn make_temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("abroad_survey_{}_{}_{}", tag, std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn survey_columns() -> Vec<String> {
    let mut cols = vec!["Response ID".to_string()];
    cols.extend(question_order().iter().map(|f| f.column().to_string()));
    cols
}

/// One row per (vaccination, destination, study_status) triple. The other
/// questions alternate between two answers so every question has at least two.
pub fn survey_table(rows: &[(&str, &str, &str)]) -> RawTable {
    let rows: Vec<Vec<Option<String>>> = rows
        .iter()
        .enumerate()
        .map(|(i, &(vacc, dest, status))| {
            let mut row = vec![Some(format!("R{}", i + 1))];
            for &field in question_order() {
                let value = match field {
                    SurveyField::Destination => dest,
                    SurveyField::Vaccination => vacc,
                    SurveyField::StudyStatus => status,
                    SurveyField::Vaccine => ["Pfizer", "AstraZeneca"][i % 2],
                    SurveyField::ChangeFactor => ["Travel restrictions", "Cost of living"][i % 2],
                    SurveyField::OnlineSentiment => ["Negative", "Neutral"][i % 2],
                };
                row.push(Some(value.to_string()));
            }
            row
        })
        .collect();
    let lines = (0..rows.len() as u64).map(|i| i + 2).collect();
    RawTable {
        columns: survey_columns(),
        rows,
        lines,
    }
}

/// Scores: 1.0, 0.32, 0.65, 0.47, 0.85.
pub fn sample_rows() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("Yes - 2 doses", "Australia", "Already studying abroad"),
        (
            "No (I don't intend to get vaccinated)",
            "Germany",
            "Not Interested",
        ),
        ("Yes - 1 dose", "Canada", "Not Sure"),
        (
            "I'm planning to be vaccinated soon",
            "Still Deciding (Not Sure)",
            "Pursuing/ Completed High School",
        ),
        ("Yes - 3 doses", "Germany", "Considering studies abroad"),
    ]
}

pub fn bundle(table: RawTable) -> InputBundle {
    InputBundle {
        path: PathBuf::from("survey.csv"),
        source: InputSourceKind::Plain,
        table,
    }
}

/// Writes `survey_table(rows)` as `survey.csv` under `dir`.
pub fn write_survey_csv(dir: &Path, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join("survey.csv");
    let table = survey_table(rows);
    let mut w = csv::Writer::from_path(&path).unwrap();
    w.write_record(&table.columns).unwrap();
    for row in table.rows {
        w.write_record(row.into_iter().map(|c| c.unwrap_or_default()))
            .unwrap();
    }
    w.flush().unwrap();
    path
}
