#![deny(missing_docs)]
//! Shared error, configuration, and provenance types for the gmx harness.

pub mod config;
pub mod errors;
pub mod provenance;
pub mod workloads;

pub use config::{CpuType, ExperimentConfig, Isa, Mode};
pub use errors::{ErrorInfo, GmxError};
pub use provenance::{sha256_hex, CollectionManifest, SourceReport};
pub use workloads::{lookup_workload, WorkloadKind, WorkloadSpec, REGISTRY};
