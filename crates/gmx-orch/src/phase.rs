//! Experiment lifecycle phases and the pure transition function.
//!
//! The transition function never touches the simulator: it maps the current
//! run state and an incoming exit event to the next phase plus an ordered
//! list of side effects. The dispatcher executes those effects afterwards,
//! which keeps the protocol logic testable without a simulator process.

use std::fmt;

use gmx_core::{ErrorInfo, GmxError, Mode};
use serde::{Deserialize, Serialize};

use crate::event::{ExitEvent, CHECKPOINT_FAIL_CODE};
use crate::run::ExperimentRun;

/// Lifecycle phase of one experiment run. Transitions are forward-only
/// except into [`Phase::Failed`], which is reachable from any non-terminal
/// phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Guest is booting and functionally warming (setup mode entry).
    Warming,
    /// Guest kernel finished booting.
    Booted,
    /// Function container is up.
    ContainerStarted,
    /// Container pinned to the measurement core.
    ContainerPinned,
    /// Detailed measurement windows are running (eval mode entry).
    Measuring,
    /// Simulator snapshot has been taken.
    Checkpointed,
    /// Run finished cleanly.
    Done,
    /// Run aborted after a protocol violation or simulator failure.
    Failed,
}

impl Phase {
    /// Whether the run has reached a terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Warming => "warming",
            Phase::Booted => "booted",
            Phase::ContainerStarted => "container-started",
            Phase::ContainerPinned => "container-pinned",
            Phase::Measuring => "measuring",
            Phase::Checkpointed => "checkpointed",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Simulator side effect requested by a transition, executed by the
/// dispatcher strictly in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Flush the current counter values into the report stream.
    DumpStats,
    /// Zero all counters, opening the next measurement window.
    ResetStats,
    /// Snapshot the simulator state at the run's checkpoint path.
    TakeCheckpoint,
    /// Re-arm the instruction stop for the next window of `delta` instructions.
    ScheduleInstStop(u64),
}

/// Result of one pure transition step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Phase the run moves to.
    pub next: Phase,
    /// Side effects to execute, in order.
    pub effects: Vec<SideEffect>,
}

impl Transition {
    fn to(next: Phase) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(next: Phase, effects: Vec<SideEffect>) -> Self {
        Self { next, effects }
    }
}

/// Computes the transition for `event` against the run's current state.
///
/// Protocol violations return an error; the dispatcher is responsible for
/// parking the run in [`Phase::Failed`] before surfacing it.
pub fn advance(run: &ExperimentRun, event: ExitEvent) -> Result<Transition, GmxError> {
    match run.mode() {
        Mode::Setup => advance_setup(run, event),
        Mode::Eval => advance_eval(run, event),
    }
}

fn advance_setup(run: &ExperimentRun, event: ExitEvent) -> Result<Transition, GmxError> {
    let phase = run.phase();
    match event {
        // The guest run script raises one `exit` per lifecycle step, in a
        // fixed order. Anything else means the script diverged.
        ExitEvent::Exit => match phase {
            Phase::Warming => Ok(Transition::to(Phase::Booted)),
            Phase::Booted => Ok(Transition::to(Phase::ContainerStarted)),
            Phase::ContainerStarted => Ok(Transition::to(Phase::ContainerPinned)),
            Phase::Checkpointed => Ok(Transition::with(
                Phase::Done,
                vec![SideEffect::DumpStats],
            )),
            _ => Err(protocol_violation(run, event)),
        },
        ExitEvent::Fail(code) if code == CHECKPOINT_FAIL_CODE => {
            // Checkpointing is idempotent at this level: repeat requests
            // still flush counters but never snapshot twice.
            let mut effects = Vec::new();
            if !run.checkpoint_taken() {
                effects.push(SideEffect::TakeCheckpoint);
            }
            effects.push(SideEffect::DumpStats);
            effects.push(SideEffect::ResetStats);
            let next = match phase {
                Phase::ContainerPinned => Phase::Checkpointed,
                other => other,
            };
            Ok(Transition::with(next, effects))
        }
        // Foreign fail codes (e.g. the client's "connection established"
        // marker) are informational during setup.
        ExitEvent::Fail(_) => Ok(Transition::to(phase)),
        ExitEvent::MaxInstructions => Err(protocol_violation(run, event)),
    }
}

fn advance_eval(run: &ExperimentRun, event: ExitEvent) -> Result<Transition, GmxError> {
    let phase = run.phase();
    match event {
        ExitEvent::Exit => match phase {
            Phase::Measuring => Ok(Transition::with(
                Phase::Done,
                vec![SideEffect::DumpStats],
            )),
            _ => Err(protocol_violation(run, event)),
        },
        ExitEvent::MaxInstructions => match phase {
            Phase::Measuring => {
                let effects = vec![
                    SideEffect::DumpStats,
                    SideEffect::ResetStats,
                    SideEffect::ScheduleInstStop(run.budget().delta()),
                ];
                let next = if run.budget().would_exhaust() {
                    Phase::Done
                } else {
                    Phase::Measuring
                };
                Ok(Transition::with(next, effects))
            }
            _ => Err(protocol_violation(run, event)),
        },
        // The guest's warmup-done marker; nothing to do when measuring from
        // a restored checkpoint.
        ExitEvent::Fail(code) if code == CHECKPOINT_FAIL_CODE => Ok(Transition::to(phase)),
        ExitEvent::Fail(_) => Err(protocol_violation(run, event)),
    }
}

fn protocol_violation(run: &ExperimentRun, event: ExitEvent) -> GmxError {
    GmxError::Protocol(
        ErrorInfo::new(
            "protocol-event-order",
            "exit event does not match the expected workload protocol",
        )
        .with_context("mode", run.mode().to_string())
        .with_context("phase", run.phase().to_string())
        .with_context("event", event.to_string())
        .with_hint("the guest run script desynchronized from its scripted sequence"),
    )
}
