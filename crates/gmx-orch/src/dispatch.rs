//! Routes simulator exit events to the phase machine and executes the
//! resulting side effects.

use gmx_core::GmxError;
use tracing::{debug, warn};

use crate::event::ExitEvent;
use crate::phase::{self, Phase, SideEffect};
use crate::run::ExperimentRun;
use crate::sim::Simulator;

/// Whether the simulation should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Hand control back to the simulator and wait for the next event.
    Continue,
    /// The run reached a terminal phase; stop the simulation.
    Terminate,
}

/// Single-threaded responder for one experiment run.
///
/// The dispatcher is passive: it performs no work between events and holds
/// no shared state beyond the [`ExperimentRun`] it owns. Each call to
/// [`ExitEventDispatcher::dispatch`] processes exactly one event
/// synchronously.
pub struct ExitEventDispatcher<'sim, S: Simulator> {
    run: ExperimentRun,
    sim: &'sim mut S,
}

impl<'sim, S: Simulator> ExitEventDispatcher<'sim, S> {
    /// Wires a run to its simulator.
    pub fn new(run: ExperimentRun, sim: &'sim mut S) -> Self {
        Self { run, sim }
    }

    /// Read access to the run state.
    pub fn run(&self) -> &ExperimentRun {
        &self.run
    }

    /// Handles a fail-style event, reading the code from the simulator.
    pub fn dispatch_fail(&mut self) -> Result<Disposition, GmxError> {
        let code = self.sim.last_exit_code();
        self.dispatch(ExitEvent::Fail(code))
    }

    /// Processes one event: pure transition first, side effects after.
    ///
    /// A protocol violation parks the run in [`Phase::Failed`] and surfaces
    /// the error; the caller must treat that as termination.
    pub fn dispatch(&mut self, event: ExitEvent) -> Result<Disposition, GmxError> {
        let transition = match phase::advance(&self.run, event) {
            Ok(transition) => transition,
            Err(err) => {
                warn!(
                    workload = self.run.workload(),
                    phase = %self.run.phase(),
                    %event,
                    "protocol violation, failing the run"
                );
                self.run.set_phase(Phase::Failed);
                return Err(err);
            }
        };

        for effect in &transition.effects {
            match effect {
                SideEffect::DumpStats => self.sim.dump_statistics()?,
                SideEffect::ResetStats => self.sim.reset_statistics()?,
                SideEffect::TakeCheckpoint => {
                    let path = self.run.checkpoint_path().to_path_buf();
                    self.sim.take_checkpoint(&path)?;
                    self.run.mark_checkpoint_taken();
                }
                SideEffect::ScheduleInstStop(delta) => {
                    self.sim.schedule_instruction_stop(*delta)?;
                }
            }
        }
        if matches!(event, ExitEvent::MaxInstructions) {
            // Only reachable in eval mode; commit after dump/reset so every
            // block covers exactly one window.
            self.run.budget_mut().commit_window();
        }
        self.run.set_phase(transition.next);
        debug!(
            workload = self.run.workload(),
            phase = %self.run.phase(),
            instructions = self.run.instructions(),
            %event,
            "dispatched exit event"
        );

        if self.run.phase().is_terminal() {
            Ok(Disposition::Terminate)
        } else {
            Ok(Disposition::Continue)
        }
    }

    /// Consumes the dispatcher, returning the final run state.
    pub fn into_run(self) -> ExperimentRun {
        self.run
    }
}
