//! Surface of the external simulation engine the orchestrator drives.

use std::path::Path;

use gmx_core::GmxError;

/// Operations the orchestrator requests from the simulation engine.
///
/// The engine itself (core models, guest image, magic-instruction plumbing)
/// is an external collaborator; this trait is the whole surface the
/// dispatcher needs. Implementations wrap whatever binding the embedding
/// provides.
pub trait Simulator {
    /// Flushes current counter values into the report stream.
    fn dump_statistics(&mut self) -> Result<(), GmxError>;

    /// Zeroes all counters, opening the next measurement window.
    fn reset_statistics(&mut self) -> Result<(), GmxError>;

    /// Snapshots the full simulator state into `path`, overwriting any
    /// previous snapshot at that location.
    fn take_checkpoint(&mut self, path: &Path) -> Result<(), GmxError>;

    /// Arms an instruction stop `delta` instructions in the future.
    fn schedule_instruction_stop(&mut self, delta: u64) -> Result<(), GmxError>;

    /// Code attached to the most recent fail-style exit event.
    fn last_exit_code(&self) -> i64;
}
