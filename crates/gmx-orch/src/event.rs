//! Exit events raised by the simulation engine.

use std::fmt;

/// Fail code the guest uses to announce it is ready for a checkpoint.
pub const CHECKPOINT_FAIL_CODE: i64 = 4;

/// One discrete signal raised by the simulator. Events arrive in a total
/// order and are dispatched one at a time, synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitEvent {
    /// The guest executed an exit magic instruction.
    Exit,
    /// The guest executed a fail magic instruction with the given code.
    Fail(i64),
    /// The scheduled per-window instruction budget was consumed.
    MaxInstructions,
}

impl fmt::Display for ExitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitEvent::Exit => write!(f, "exit"),
            ExitEvent::Fail(code) => write!(f, "fail({code})"),
            ExitEvent::MaxInstructions => write!(f, "max-instructions"),
        }
    }
}
