#![deny(missing_docs)]
//! Exit-event orchestration for instrumented full-system simulation runs.
//!
//! The simulator runs until the guest raises a signal; the
//! [`ExitEventDispatcher`] resumes the matching handler, which mutates the
//! run's [`Phase`], may request a checkpoint or a statistics flush, and
//! either yields control back to the simulator or declares the run finished.

pub mod budget;
pub mod dispatch;
pub mod event;
pub mod phase;
pub mod run;
pub mod sim;

pub use budget::InstructionBudget;
pub use dispatch::{Disposition, ExitEventDispatcher};
pub use event::{ExitEvent, CHECKPOINT_FAIL_CODE};
pub use phase::{advance, Phase, SideEffect, Transition};
pub use run::ExperimentRun;
pub use sim::Simulator;
