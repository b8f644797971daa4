//! Scheduling context for dispatching rule evaluation.

/// Runtime state passed to dispatching rules.
///
/// Only the simulation clock is needed: everything else a rule looks at
/// (remaining work, deadline, ready time) lives on the process itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulingContext {
    /// Current simulation cycle.
    pub current_time: u64,
}

impl SchedulingContext {
    /// Creates a context at the given cycle.
    pub fn at_time(current_time: u64) -> Self {
        Self { current_time }
    }
}
