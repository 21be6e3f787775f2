use serde::Serialize;

use crate::input::InputError;
use crate::input::schema::{SurveyField, question_order};

/// Cleaned survey rows. Every cell is present.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Input line of each retained row.
    pub source_lines: Vec<u64>,
}

impl Dataset {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].as_str()
    }

    pub fn source_line(&self, row: usize) -> u64 {
        self.source_lines[row]
    }

    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[col].as_str())
    }
}

/// Column positions of the required survey fields, resolved once after cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIndex {
    indices: [usize; 6],
}

impl FieldIndex {
    pub fn resolve(dataset: &Dataset) -> Result<Self, InputError> {
        let mut indices = [0usize; 6];
        for &field in question_order() {
            let idx = dataset
                .column_index(field.column())
                .ok_or_else(|| InputError::MissingColumn {
                    column: field.column().to_string(),
                })?;
            indices[field.ordinal()] = idx;
        }
        Ok(Self { indices })
    }

    pub fn get(&self, field: SurveyField) -> usize {
        self.indices[field.ordinal()]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CleaningAudit {
    pub rows_raw: usize,
    pub rows_retained: usize,
    pub rows_dropped: usize,
    pub columns_raw: usize,
    pub columns_retained: usize,
    pub columns_dropped: Vec<String>,
}
