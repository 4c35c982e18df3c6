//! Experiment configuration loaded from YAML before a run starts.
//!
//! All validation happens up front: an unknown mode, ISA, CPU model, or
//! workload key must fail before the simulator is ever launched, because a
//! misconfigured full-system run wastes hours of host time.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, GmxError};
use crate::workloads::{lookup_workload, WorkloadSpec};

/// Execution mode of an experiment run.
///
/// `Setup` boots the guest from scratch, warms it, and takes a checkpoint.
/// `Eval` restores that checkpoint and performs the actual measurement with a
/// detailed core model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Boot, warm, and checkpoint using a fast functional core.
    Setup,
    /// Resume from the checkpoint and measure with a detailed core.
    Eval,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Setup => write!(f, "setup"),
            Mode::Eval => write!(f, "eval"),
        }
    }
}

/// Guest instruction set architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// 64-bit x86 full-system simulation.
    X86,
    /// AArch64 full-system simulation.
    Arm,
}

impl Isa {
    /// Short architecture label used in filesystem layouts (`results/<arch>/...`).
    pub fn arch_label(&self) -> &'static str {
        match self {
            Isa::X86 => "amd64",
            Isa::Arm => "arm64",
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arch_label())
    }
}

/// Detailed CPU model used in eval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CpuType {
    /// Functional atomic core.
    #[default]
    Atomic,
    /// Timing-accurate in-order core.
    Timing,
    /// Out-of-order core model.
    O3,
}

/// YAML-configurable parameters governing one experiment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Execution mode for this run.
    pub mode: Mode,
    /// Guest instruction set architecture.
    pub isa: Isa,
    /// Detailed CPU model (eval mode only; ignored during setup).
    #[serde(default)]
    pub cpu_type: CpuType,
    /// Workload key; must exist in the workload registry.
    pub workload: String,
    /// Instructions simulated per measurement window.
    #[serde(default = "default_inst_delta")]
    pub inst_delta: u64,
    /// Total instruction ceiling for an eval run.
    #[serde(default = "default_inst_ceiling")]
    pub inst_ceiling: u64,
    /// Number of measured invocations of the guest workload.
    #[serde(default = "default_invocations")]
    pub invocations: u32,
    /// Number of warmup invocations before measurement.
    #[serde(default = "default_warming")]
    pub warming: u32,
    /// Root directory under which checkpoints are stored.
    #[serde(default = "default_checkpoint_root")]
    pub checkpoint_root: PathBuf,
}

fn default_inst_delta() -> u64 {
    100_000_000
}

fn default_inst_ceiling() -> u64 {
    10_000_000_000
}

fn default_invocations() -> u32 {
    200
}

fn default_warming() -> u32 {
    5000
}

fn default_checkpoint_root() -> PathBuf {
    PathBuf::from("wkdir")
}

impl ExperimentConfig {
    /// Loads a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, GmxError> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            GmxError::Config(
                ErrorInfo::new("config-read", "failed to read experiment config")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let config: ExperimentConfig = serde_yaml::from_str(&contents).map_err(|err| {
            GmxError::Config(
                ErrorInfo::new("config-parse", "failed to parse experiment config")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration before any run starts.
    pub fn validate(&self) -> Result<(), GmxError> {
        if lookup_workload(&self.workload).is_none() {
            return Err(GmxError::Config(
                ErrorInfo::new("config-workload", "unknown workload key")
                    .with_context("workload", self.workload.clone())
                    .with_hint("see gmx_core::workloads::REGISTRY for known keys"),
            ));
        }
        if self.inst_delta == 0 {
            return Err(GmxError::Config(ErrorInfo::new(
                "config-delta",
                "instruction delta must be positive",
            )));
        }
        if self.inst_ceiling < self.inst_delta {
            return Err(GmxError::Config(
                ErrorInfo::new(
                    "config-ceiling",
                    "instruction ceiling is smaller than one measurement window",
                )
                .with_context("inst_delta", self.inst_delta.to_string())
                .with_context("inst_ceiling", self.inst_ceiling.to_string()),
            ));
        }
        if self.invocations == 0 {
            return Err(GmxError::Config(ErrorInfo::new(
                "config-invocations",
                "at least one measured invocation is required",
            )));
        }
        Ok(())
    }

    /// Returns the registry entry for the configured workload.
    ///
    /// Only valid after [`ExperimentConfig::validate`] succeeded.
    pub fn workload_spec(&self) -> Option<&'static WorkloadSpec> {
        lookup_workload(&self.workload)
    }

    /// Checkpoint directory for this run.
    ///
    /// Checkpoints are keyed by architecture and workload identity, not by
    /// attempt count: re-running setup overwrites the previous checkpoint.
    pub fn checkpoint_path(&self) -> PathBuf {
        self.checkpoint_root
            .join(self.isa.arch_label())
            .join("checkpoints")
            .join(&self.workload)
    }
}
