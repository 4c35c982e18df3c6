//! Turns a tree of raw reports into per-run CSV tables plus a manifest.
//!
//! Raw reports live at `<results-root>/<arch>/<experiment>/<benchmark>/stats.txt`;
//! each one pivots independently into `<out-root>/<experiment>/<benchmark>.csv`.
//! Runs share nothing, so processing order carries no meaning.

use std::fs;
use std::path::Path;

use gmx_core::{sha256_hex, CollectionManifest, ErrorInfo, GmxError, SourceReport};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::dataset::StatDataset;
use crate::pivot;

/// Name of the raw report file inside each benchmark directory.
pub const REPORT_FILE: &str = "stats.txt";

/// Name of the manifest written next to an experiment's tables.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Collects every benchmark report of one experiment.
///
/// A benchmark whose report is missing, empty, or holds no complete block
/// is logged and skipped; the run simply contributes no table. The returned
/// manifest lists the reports that did contribute, with their digests, and
/// is also written to `<out-root>/<experiment>/manifest.json`.
pub fn collect_experiment(
    results_root: &Path,
    arch: &str,
    experiment: &str,
    out_root: &Path,
) -> Result<CollectionManifest, GmxError> {
    let experiment_dir = results_root.join(arch).join(experiment);
    if !experiment_dir.is_dir() {
        return Err(GmxError::Registry(
            ErrorInfo::new("collect-experiment-dir", "experiment directory not found")
                .with_context("path", experiment_dir.display().to_string())
                .with_hint("check the results root, architecture, and experiment name"),
        ));
    }

    let mut manifest = CollectionManifest::new(arch, experiment);
    for entry in WalkDir::new(&experiment_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            GmxError::Registry(
                ErrorInfo::new("collect-walk", err.to_string())
                    .with_context("path", experiment_dir.display().to_string()),
            )
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let benchmark = entry.file_name().to_string_lossy().into_owned();
        let report_path = entry.path().join(REPORT_FILE);
        let report = match fs::read_to_string(&report_path) {
            Ok(report) => report,
            Err(err) => {
                warn!(
                    experiment,
                    benchmark = %benchmark,
                    path = %report_path.display(),
                    error = %err,
                    "report unreadable, skipping run"
                );
                continue;
            }
        };
        let dataset = StatDataset::from_report(&report);
        let table = match pivot::pivot(&dataset) {
            Some(table) => table,
            None => {
                warn!(
                    experiment,
                    benchmark = %benchmark,
                    path = %report_path.display(),
                    "report holds no complete statistics block, skipping run"
                );
                continue;
            }
        };
        let table_path = out_root.join(experiment).join(format!("{benchmark}.csv"));
        table.store(&table_path)?;
        debug!(
            experiment,
            benchmark = %benchmark,
            rows = table.len(),
            columns = table.header.len(),
            "collected run table"
        );
        manifest.sources.push(SourceReport {
            benchmark,
            path: report_path,
            sha256: sha256_hex(report.as_bytes()),
            rows: table.len(),
        });
    }

    manifest.store(&out_root.join(experiment).join(MANIFEST_FILE))?;
    Ok(manifest)
}

/// Collects a list of experiments, returning one manifest per experiment.
pub fn collect(
    results_root: &Path,
    arch: &str,
    experiments: &[String],
    out_root: &Path,
) -> Result<Vec<CollectionManifest>, GmxError> {
    experiments
        .iter()
        .map(|experiment| collect_experiment(results_root, arch, experiment, out_root))
        .collect()
}
