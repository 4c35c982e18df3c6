//! Pivots a ragged dataset into a rectangular per-run table.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use gmx_core::{ErrorInfo, GmxError};

use crate::dataset::StatDataset;

/// Rectangular table of one run's measurement windows.
///
/// Columns are the dataset's keys in first-appearance order; row `r` holds
/// each key's sample for window `r`, or the empty string where a key's
/// series ran out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    /// Column names, one per dataset key.
    pub header: Vec<String>,
    /// Data rows, all exactly `header.len()` cells wide.
    pub rows: Vec<Vec<String>>,
}

/// Pivots `dataset` into a table, or `None` when the dataset is empty.
///
/// The very first sample of every series is the dump taken at the
/// checkpoint, before counters were reset, so it is dropped: a dataset
/// whose longest series holds `n` samples pivots into `n - 1` rows, and
/// emitted row `r` reads each series at index `r + 1`.
pub fn pivot(dataset: &StatDataset) -> Option<ResultTable> {
    let max_len = dataset.max_len();
    if max_len == 0 {
        return None;
    }
    let header: Vec<String> = dataset.keys().map(str::to_string).collect();
    let rows = (1..max_len)
        .map(|window| {
            dataset
                .iter()
                .map(|(_, series)| series.get(window).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Some(ResultTable { header, rows })
}

impl ResultTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serializes the table as CSV into `writer`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), GmxError> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.header).map_err(csv_error)?;
        for row in &self.rows {
            out.write_record(row).map_err(csv_error)?;
        }
        out.flush().map_err(|err| {
            GmxError::Report(ErrorInfo::new("table-flush", err.to_string()))
        })
    }

    /// Writes the table to a CSV file, creating parent directories.
    pub fn store(&self, path: &Path) -> Result<(), GmxError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                GmxError::Report(
                    ErrorInfo::new("table-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let file = File::create(path).map_err(|err| {
            GmxError::Report(
                ErrorInfo::new("table-create", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        self.write_csv(file)
    }

    /// Reads a previously stored table back from a CSV file.
    pub fn load(path: &Path) -> Result<Self, GmxError> {
        let mut reader = csv::Reader::from_path(path).map_err(|err| {
            GmxError::Report(
                ErrorInfo::new("table-open", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let header = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { header, rows })
    }
}

fn csv_error(err: csv::Error) -> GmxError {
    GmxError::Report(ErrorInfo::new("table-csv", err.to_string()))
}
