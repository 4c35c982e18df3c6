//! Instruction budget accounting for eval-mode measurement windows.

/// Tracks how many simulated instructions an eval run has consumed.
///
/// Each `MaxInstructions` event closes one fixed-size window: the dispatcher
/// dumps then resets the counters (in that order, so every stats block covers
/// exactly one window rather than a cumulative total), re-arms the next stop,
/// and commits `delta` to this counter. Plain integer addition only; the
/// controller must stay exact over an arbitrary number of windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionBudget {
    delta: u64,
    ceiling: u64,
    consumed: u64,
}

impl InstructionBudget {
    /// Creates a budget with a per-window delta and a total ceiling.
    pub fn new(delta: u64, ceiling: u64) -> Self {
        Self {
            delta,
            ceiling,
            consumed: 0,
        }
    }

    /// Instructions simulated per measurement window.
    pub fn delta(&self) -> u64 {
        self.delta
    }

    /// Total instruction ceiling for the run.
    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Instructions committed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Whether committing the current window would reach the ceiling.
    pub fn would_exhaust(&self) -> bool {
        self.consumed.saturating_add(self.delta) >= self.ceiling
    }

    /// Commits one closed window to the cumulative counter.
    pub fn commit_window(&mut self) {
        self.consumed += self.delta;
    }
}
