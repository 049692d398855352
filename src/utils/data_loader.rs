//! Data loading utilities

use crate::error::{HousePriceError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Loader for delimited dataset files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows scanned for type inference; `None` scans the whole file
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a loader that infers column types from every row
    pub fn new() -> Self {
        Self {
            infer_schema_length: None,
        }
    }

    /// Limit schema inference to the first `n` rows
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Load a delimited file, picking tab for `.tsv` and comma otherwise
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        let delimiter = if is_tsv { b'\t' } else { b',' };
        self.load_csv_with_delimiter(path, delimiter)
    }

    /// Load a delimited file with an explicit separator
    pub fn load_csv_with_delimiter(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<DataFrame> {
        let path = path.as_ref();
        let start = Instant::now();

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                HousePriceError::NotFound(format!("CSV file not found at '{}'", path.display()))
            }
            _ => HousePriceError::IoError(e),
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(CsvParseOptions::default().with_separator(delimiter))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| HousePriceError::DataError(e.to_string()))?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );

        Ok(df)
    }

    /// Parse in-memory CSV bytes, used to sanity-check uploads
    pub fn parse_csv_bytes(&self, bytes: &[u8]) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| HousePriceError::DataError(e.to_string()))
    }
}
