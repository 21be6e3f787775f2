use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::input::InputError;
use crate::input::schema::is_missing;

/// Header plus records as read from disk. `None` marks a missing cell.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// 1-based input line each record starts on.
    pub lines: Vec<u64>,
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if is_gz(path) {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn is_gz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(InputError::Empty("header row is empty".to_string()));
    }
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let mut seen = HashSet::with_capacity(columns.len());
    for name in &columns {
        if !seen.insert(name.as_str()) {
            return Err(InputError::Parse(format!("duplicate column name: {name}")));
        }
    }

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(rows.len() as u64 + 2);
        if record.len() > columns.len() {
            return Err(InputError::Parse(format!(
                "record on line {} has {} fields, header has {}",
                line,
                record.len(),
                columns.len()
            )));
        }
        // Short records are padded with missing cells.
        let row = (0..columns.len())
            .map(|idx| {
                record
                    .get(idx)
                    .filter(|value| !is_missing(value))
                    .map(str::to_string)
            })
            .collect();
        rows.push(row);
        lines.push(line);
    }

    Ok(RawTable {
        columns,
        rows,
        lines,
    })
}
