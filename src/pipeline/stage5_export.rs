use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::input::schema::SCORE_COLUMN;
use crate::pipeline::stage4_filter::FilteredView;
use crate::report::format_float;

pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes the view to `out_dir/filtered_data.csv`, replacing any existing file.
pub fn export_view(view: &FilteredView<'_>, out_dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(EXPORT_FILE_NAME);
    write_view_csv(view, &path)?;
    info!(path = %path.display(), rows = view.len(), "exported filtered respondents");
    Ok(path)
}

pub fn write_view_csv(view: &FilteredView<'_>, path: &Path) -> Result<(), ExportError> {
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut w = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(csv_err)?;

    let columns = &view.dataset().columns;
    w.write_record(columns.iter().map(String::as_str).chain([SCORE_COLUMN]))
        .map_err(csv_err)?;

    for (_, cells, score) in view.iter() {
        let score = format_float(score);
        w.write_record(cells.iter().map(String::as_str).chain([score.as_str()]))
            .map_err(csv_err)?;
    }

    w.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_export.rs"]
mod tests;
