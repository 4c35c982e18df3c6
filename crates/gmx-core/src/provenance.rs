//! Provenance manifests for collected statistics artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, GmxError};

/// Schema tag written into every collection manifest.
pub const MANIFEST_SCHEMA: &str = "gmx-collection-v1";

/// One source report that contributed a table to a collected experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Benchmark name (immediate parent directory of the report file).
    pub benchmark: String,
    /// Path of the raw report file that was parsed.
    pub path: PathBuf,
    /// Hex encoded sha256 digest of the raw report bytes.
    pub sha256: String,
    /// Number of data rows emitted into the per-run table.
    pub rows: usize,
}

/// Manifest written next to the per-run CSV tables of one experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionManifest {
    /// Manifest schema tag, currently [`MANIFEST_SCHEMA`].
    pub schema: String,
    /// ISO-8601 timestamp recording when the collection ran.
    pub created_at: String,
    /// Architecture label the reports were produced under.
    pub arch: String,
    /// Experiment name the reports belong to.
    pub experiment: String,
    /// Reports that contributed tables, in discovery order.
    pub sources: Vec<SourceReport>,
}

impl CollectionManifest {
    /// Creates an empty manifest stamped with the current time.
    pub fn new(arch: impl Into<String>, experiment: impl Into<String>) -> Self {
        Self {
            schema: MANIFEST_SCHEMA.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            arch: arch.into(),
            experiment: experiment.into(),
            sources: Vec::new(),
        }
    }

    /// Restores a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, GmxError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            GmxError::Registry(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            GmxError::Registry(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Writes the manifest to disk as pretty-printed JSON.
    pub fn store(&self, path: &Path) -> Result<(), GmxError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                GmxError::Registry(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            GmxError::Registry(ErrorInfo::new("manifest-serialize", err.to_string()))
        })?;
        fs::write(path, json).map_err(|err| {
            GmxError::Registry(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Hex encoded sha256 digest of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_roundtrips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let mut manifest = CollectionManifest::new("arm64", "fdp-on");
        manifest.sources.push(SourceReport {
            benchmark: "nodeapp".to_string(),
            path: PathBuf::from("results/arm64/fdp-on/nodeapp/stats.txt"),
            sha256: sha256_hex(b"stats"),
            rows: 99,
        });
        manifest.store(&path).unwrap();
        let restored = CollectionManifest::load(&path).unwrap();
        assert_eq!(manifest, restored);
    }

    #[test]
    fn digest_is_stable() {
        assert_eq!(sha256_hex(b""), sha256_hex(b""));
        assert_ne!(sha256_hex(b"a"), sha256_hex(b"b"));
    }
}
