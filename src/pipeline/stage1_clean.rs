use tracing::{debug, info};

use crate::input::InputError;
use crate::input::reader::RawTable;
use crate::input::schema::DROPPED_COLUMNS;
use crate::model::dataset::{CleaningAudit, Dataset, FieldIndex};

#[derive(Debug)]
pub struct Stage1Output {
    pub dataset: Dataset,
    pub fields: FieldIndex,
    pub audit: CleaningAudit,
}

pub fn run_stage1(table: RawTable) -> Result<Stage1Output, InputError> {
    let rows_raw = table.rows.len();
    let columns_raw = table.columns.len();

    let (keep, columns_dropped) = select_columns(&table.columns, DROPPED_COLUMNS);
    for name in &columns_dropped {
        debug!(column = %name, "dropping identifier column");
    }

    let columns: Vec<String> = keep.iter().map(|&idx| table.columns[idx].clone()).collect();
    let (rows, source_lines) = drop_incomplete_rows(table.rows, table.lines, &keep);
    let rows_retained = rows.len();
    let dataset = Dataset {
        columns,
        rows,
        source_lines,
    };
    let fields = FieldIndex::resolve(&dataset)?;

    let audit = CleaningAudit {
        rows_raw,
        rows_retained,
        rows_dropped: rows_raw - rows_retained,
        columns_raw,
        columns_retained: dataset.columns.len(),
        columns_dropped,
    };

    info!(
        rows_raw = audit.rows_raw,
        rows_retained = audit.rows_retained,
        columns_dropped = audit.columns_dropped.len(),
        "cleaned survey dataset"
    );

    Ok(Stage1Output {
        dataset,
        fields,
        audit,
    })
}

/// Splits column positions into kept ones and the names actually removed.
/// Names in `drop` that are absent are ignored.
pub fn select_columns(columns: &[String], drop: &[&str]) -> (Vec<usize>, Vec<String>) {
    let mut keep = Vec::with_capacity(columns.len());
    let mut dropped = Vec::new();
    for (idx, name) in columns.iter().enumerate() {
        if drop.contains(&name.as_str()) {
            dropped.push(name.clone());
        } else {
            keep.push(idx);
        }
    }
    (keep, dropped)
}

/// Keeps rows whose retained cells are all present, projected onto `keep`,
/// together with their input line numbers.
pub fn drop_incomplete_rows(
    rows: Vec<Vec<Option<String>>>,
    lines: Vec<u64>,
    keep: &[usize],
) -> (Vec<Vec<String>>, Vec<u64>) {
    rows.into_iter()
        .zip(lines)
        .filter_map(|(mut row, line)| {
            let mut out = Vec::with_capacity(keep.len());
            for &idx in keep {
                out.push(row.get_mut(idx)?.take()?);
            }
            Some((out, line))
        })
        .unzip()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_clean.rs"]
mod tests;
