//! Merges collected per-run tables into one cross-run corpus CSV.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use gmx_core::{ErrorInfo, GmxError};
use indexmap::IndexSet;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::collect::MANIFEST_FILE;
use crate::pivot::ResultTable;

/// Which `(experiment, benchmark)` pairs a corpus merge should include.
///
/// An empty set means "no filter on that axis".
#[derive(Debug, Clone, Default)]
pub struct CorpusSelection {
    /// Experiments to include; empty selects all.
    pub experiments: BTreeSet<String>,
    /// Benchmarks to include; empty selects all.
    pub benchmarks: BTreeSet<String>,
}

impl CorpusSelection {
    /// Builds a selection from experiment and benchmark name lists.
    pub fn new<E, B>(experiments: E, benchmarks: B) -> Self
    where
        E: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
    {
        Self {
            experiments: experiments.into_iter().collect(),
            benchmarks: benchmarks.into_iter().collect(),
        }
    }

    fn selects(&self, experiment: &str, benchmark: &str) -> bool {
        (self.experiments.is_empty() || self.experiments.contains(experiment))
            && (self.benchmarks.is_empty() || self.benchmarks.contains(benchmark))
    }
}

/// What a corpus merge produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusSummary {
    /// Source tables that contributed rows.
    pub tables: usize,
    /// Total data rows written, excluding the header.
    pub rows: usize,
}

/// Merges the selected tables under `collected_root` into `out_path`.
///
/// The corpus header is the union of the source headers in first-seen
/// order, plus trailing `experiment` and `benchmark` provenance columns.
/// Rows from a table without some corpus column carry empty cells there.
/// Tables that vanished or lost their data since collection are logged and
/// skipped.
pub fn merge_corpus(
    collected_root: &Path,
    selection: &CorpusSelection,
    out_path: &Path,
) -> Result<CorpusSummary, GmxError> {
    let mut tables: Vec<(String, String, ResultTable)> = Vec::new();
    let mut header: IndexSet<String> = IndexSet::new();

    for entry in WalkDir::new(collected_root)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            GmxError::Registry(
                ErrorInfo::new("corpus-walk", err.to_string())
                    .with_context("path", collected_root.display().to_string()),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || entry.file_name() == MANIFEST_FILE
            || path.extension().map_or(true, |ext| ext != "csv")
        {
            continue;
        }
        let (Some(experiment), Some(benchmark)) = (
            path.parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            path.file_stem().map(|stem| stem.to_string_lossy().into_owned()),
        ) else {
            continue;
        };
        if !selection.selects(&experiment, &benchmark) {
            continue;
        }
        let table = match ResultTable::load(path) {
            Ok(table) => table,
            Err(err) => {
                warn!(
                    experiment = %experiment,
                    benchmark = %benchmark,
                    path = %path.display(),
                    error = %err,
                    "collected table unreadable, skipping"
                );
                continue;
            }
        };
        if table.is_empty() {
            warn!(
                experiment = %experiment,
                benchmark = %benchmark,
                path = %path.display(),
                "collected table holds no rows, skipping"
            );
            continue;
        }
        header.extend(table.header.iter().cloned());
        tables.push((experiment, benchmark, table));
    }

    let file = File::create(out_path).map_err(|err| {
        GmxError::Registry(
            ErrorInfo::new("corpus-create", err.to_string())
                .with_context("path", out_path.display().to_string()),
        )
    })?;
    let mut writer = csv::Writer::from_writer(file);
    let mut corpus_header: Vec<&str> = header.iter().map(String::as_str).collect();
    corpus_header.push("experiment");
    corpus_header.push("benchmark");
    writer.write_record(&corpus_header).map_err(csv_error)?;

    let mut rows = 0;
    for (experiment, benchmark, table) in &tables {
        // Map each source column into its corpus position once per table.
        let positions: Vec<usize> = table
            .header
            .iter()
            .map(|column| header.get_index_of(column).unwrap_or_default())
            .collect();
        for row in &table.rows {
            let mut record = vec![""; header.len()];
            for (cell, &position) in row.iter().zip(&positions) {
                record[position] = cell;
            }
            record.push(experiment);
            record.push(benchmark);
            writer.write_record(&record).map_err(csv_error)?;
            rows += 1;
        }
    }
    writer.flush().map_err(|err| {
        GmxError::Registry(ErrorInfo::new("corpus-flush", err.to_string()))
    })?;

    let summary = CorpusSummary {
        tables: tables.len(),
        rows,
    };
    info!(
        tables = summary.tables,
        rows = summary.rows,
        out = %out_path.display(),
        "merged corpus"
    );
    Ok(summary)
}

fn csv_error(err: csv::Error) -> GmxError {
    GmxError::Registry(ErrorInfo::new("corpus-csv", err.to_string()))
}
