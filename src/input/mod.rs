use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub mod reader;
pub mod schema;

use reader::{RawTable, is_gz, open_maybe_gz, read_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSourceKind {
    Plain,
    Gzip,
}

impl InputSourceKind {
    pub fn name(self) -> &'static str {
        match self {
            InputSourceKind::Plain => "plain",
            InputSourceKind::Gzip => "gzip",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputBundle {
    pub path: PathBuf,
    pub source: InputSourceKind,
    pub table: RawTable,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("missing column: {column}")]
    MissingColumn { column: String },
    #[error("empty input: {0}")]
    Empty(String),
}

pub fn load_survey(path: &Path, delimiter: u8) -> Result<InputBundle, InputError> {
    let source = if is_gz(path) {
        InputSourceKind::Gzip
    } else {
        InputSourceKind::Plain
    };
    let reader = open_maybe_gz(path)?;
    let table = read_table(reader, delimiter)?;

    info!(
        path = %path.display(),
        source = source.name(),
        columns = table.columns.len(),
        rows = table.rows.len(),
        "loaded survey table"
    );

    Ok(InputBundle {
        path: path.to_path_buf(),
        source,
        table,
    })
}

pub fn parse_delimiter(c: char) -> Result<u8, InputError> {
    if c.is_ascii() && c != '"' && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(InputError::Parse(format!(
            "delimiter must be a single ASCII character other than a quote or newline, got {c:?}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
