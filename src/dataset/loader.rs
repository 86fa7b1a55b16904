//! CSV loading for the project dataset

use crate::error::{CostError, Result};
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Loader for the raw project CSV.
///
/// The file opens with a banner line that groups columns (project dates,
/// physical/financial variables, lagged economic indices). The column codes
/// live on the line after it, so the header sits at an offset of one row.
pub struct DatasetLoader {
    header_offset: usize,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    /// Create a new loader with a header offset of one row
    pub fn new() -> Self {
        Self { header_offset: 1 }
    }

    /// Set the number of lines preceding the header line
    pub fn with_header_offset(mut self, offset: usize) -> Self {
        self.header_offset = offset;
        self
    }

    /// Load the CSV into a frame of `f64` columns named by their raw codes.
    pub fn load(&self, path: &Path) -> Result<DataFrame> {
        if !path.is_file() {
            return Err(CostError::DatasetNotFound(path.to_path_buf()));
        }

        let start = Instant::now();
        let file = File::open(path)?;

        // Everything is read as text: the header line is parsed as data so that
        // duplicated codes can be disambiguated before any column is named.
        let raw = CsvReadOptions::default()
            .with_has_header(false)
            .with_skip_rows(self.header_offset)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(file)
            .finish()?;

        if raw.height() == 0 {
            return Err(CostError::DataError(format!(
                "{} has no header line after offset {}",
                path.display(),
                self.header_offset
            )));
        }

        let raw_headers = raw
            .get_columns()
            .iter()
            .map(header_cell)
            .collect::<Result<Vec<_>>>()?;
        let headers = dedupe_headers(raw_headers);

        let body = raw.slice(1, raw.height() - 1);
        let columns = body
            .get_columns()
            .iter()
            .zip(headers.iter())
            .map(|(column, name)| {
                let mut series = column
                    .as_materialized_series()
                    .strict_cast(&DataType::Float64)
                    .map_err(|e| CostError::DataError(format!("column '{}': {}", name, e)))?;
                series.rename(name.as_str().into());
                Ok(series.into())
            })
            .collect::<Result<Vec<Column>>>()?;

        let df = DataFrame::new(columns)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );
        Ok(df)
    }
}

fn header_cell(column: &Column) -> Result<String> {
    let cell = column
        .as_materialized_series()
        .str()?
        .get(0)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    Ok(cell)
}

/// Disambiguate repeated header names: the second `X` becomes `X.1`, the third
/// `X.2`. Blank headers become `Unnamed: <index>`.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                header
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            if name != base {
                debug!(original = %base, renamed = %name, "Disambiguated duplicate column");
            }
            name
        })
        .collect()
}
