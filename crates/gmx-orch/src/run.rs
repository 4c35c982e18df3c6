//! Per-run mutable state owned by the dispatcher.

use std::path::{Path, PathBuf};

use gmx_core::{ExperimentConfig, GmxError, Isa, Mode};

use crate::budget::InstructionBudget;
use crate::phase::Phase;

/// State of one instrumented simulation run.
///
/// Created from a validated [`ExperimentConfig`] before the simulator starts;
/// conceptually destroyed once the dispatcher reports a terminal phase.
#[derive(Debug, Clone)]
pub struct ExperimentRun {
    workload: String,
    mode: Mode,
    isa: Isa,
    phase: Phase,
    budget: InstructionBudget,
    checkpoint_taken: bool,
    checkpoint_path: PathBuf,
}

impl ExperimentRun {
    /// Builds the run state, failing fast on an invalid configuration.
    pub fn new(config: &ExperimentConfig) -> Result<Self, GmxError> {
        config.validate()?;
        let phase = match config.mode {
            Mode::Setup => Phase::Warming,
            Mode::Eval => Phase::Measuring,
        };
        Ok(Self {
            workload: config.workload.clone(),
            mode: config.mode,
            isa: config.isa,
            phase,
            budget: InstructionBudget::new(config.inst_delta, config.inst_ceiling),
            checkpoint_taken: false,
            checkpoint_path: config.checkpoint_path(),
        })
    }

    /// Workload key this run is driving.
    pub fn workload(&self) -> &str {
        &self.workload
    }

    /// Execution mode of the run.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Guest architecture of the run.
    pub fn isa(&self) -> Isa {
        self.isa
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Instruction budget state.
    pub fn budget(&self) -> &InstructionBudget {
        &self.budget
    }

    /// Cumulative simulated instructions committed so far.
    pub fn instructions(&self) -> u64 {
        self.budget.consumed()
    }

    /// Whether the run has already taken its checkpoint.
    pub fn checkpoint_taken(&self) -> bool {
        self.checkpoint_taken
    }

    /// Directory the simulator snapshot is written to. Overwritten on
    /// re-runs; checkpoints are keyed by workload identity, not attempt.
    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn mark_checkpoint_taken(&mut self) {
        self.checkpoint_taken = true;
    }

    pub(crate) fn budget_mut(&mut self) -> &mut InstructionBudget {
        &mut self.budget
    }
}
