//! Process model.
//!
//! A process is a schedulable unit of work: it becomes eligible at its
//! ready time and needs `exec_time` atomic cycles on some CPU to finish.
//!
//! # Time Representation
//! All times are abstract integer cycles relative to the simulation start
//! (t=0). There is no mapping to wall-clock time.

use serde::{Deserialize, Serialize};

use crate::error::PreconditionViolation;

/// Stable process identifier, unique within one simulation run.
pub type ProcessId = u32;

/// Static description of a process, without identity or runtime state.
///
/// Used by configuration and workload generators; ids are assigned when
/// specs are turned into [`Process`]es.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessSpec {
    /// Earliest cycle at which the process may be allocated.
    pub ready_time: u64,
    /// Total atomic cycles required.
    pub exec_time: u64,
    /// Target completion cycle. `None` = no deadline.
    #[serde(default)]
    pub deadline: Option<u64>,
}

impl ProcessSpec {
    /// Creates a spec without a deadline.
    pub fn new(ready_time: u64, exec_time: u64) -> Self {
        Self {
            ready_time,
            exec_time,
            deadline: None,
        }
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Turns the descriptor into a fresh process with the given id.
    pub fn into_process(self, id: ProcessId) -> Process {
        Process {
            id,
            ready_time: self.ready_time,
            exec_time: self.exec_time,
            deadline: self.deadline,
            program_counter: 0,
        }
    }
}

/// A process taking part in a simulation.
///
/// Everything except `program_counter` is fixed at construction. The
/// counter only moves through [`Process::exec_atomic_command`], one cycle
/// at a time, and never passes `exec_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier.
    pub id: ProcessId,
    /// Earliest cycle at which the process may be allocated.
    pub ready_time: u64,
    /// Total atomic cycles required.
    pub exec_time: u64,
    /// Target completion cycle. `None` = no deadline.
    pub deadline: Option<u64>,
    #[serde(skip)]
    program_counter: u64,
}

impl Process {
    /// Creates a process that is ready at t=0 and has no deadline.
    pub fn new(id: ProcessId, exec_time: u64) -> Self {
        ProcessSpec::new(0, exec_time).into_process(id)
    }

    /// Sets the ready time.
    pub fn with_ready_time(mut self, ready_time: u64) -> Self {
        self.ready_time = ready_time;
        self
    }

    /// Sets the deadline.
    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cycles executed so far.
    #[inline]
    pub fn program_counter(&self) -> u64 {
        self.program_counter
    }

    /// Whether all required cycles have been executed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.program_counter >= self.exec_time
    }

    /// Cycles still required.
    #[inline]
    pub fn remaining_exec_time(&self) -> u64 {
        self.exec_time.saturating_sub(self.program_counter)
    }

    /// Deadline as a signed score. Missing deadlines sort last.
    pub fn deadline_score(&self) -> i64 {
        self.deadline.map(to_score).unwrap_or(i64::MAX)
    }

    /// Laxity fixed at construction: `deadline - ready_time - exec_time`.
    ///
    /// May be negative, saturating at `i64::MIN`. `i64::MAX` without a
    /// deadline.
    pub fn static_laxity(&self) -> i64 {
        match self.deadline {
            Some(d) => to_score(d)
                .saturating_sub(to_score(self.ready_time))
                .saturating_sub(to_score(self.exec_time)),
            None => i64::MAX,
        }
    }

    /// Laxity at cycle `time`: `deadline - time - remaining_exec_time`.
    ///
    /// May be negative, saturating at `i64::MIN`. `i64::MAX` without a
    /// deadline.
    pub fn dynamic_laxity(&self, time: u64) -> i64 {
        match self.deadline {
            Some(d) => to_score(d)
                .saturating_sub(to_score(time))
                .saturating_sub(to_score(self.remaining_exec_time())),
            None => i64::MAX,
        }
    }

    /// Executes one atomic cycle.
    ///
    /// # Errors
    /// Fails if the process is already finished; the counter is left
    /// untouched.
    pub fn exec_atomic_command(&mut self) -> Result<(), PreconditionViolation> {
        if self.is_finished() {
            return Err(PreconditionViolation::ProcessAlreadyFinished { pid: self.id });
        }
        self.program_counter += 1;
        Ok(())
    }

    /// Static part of the process.
    pub fn spec(&self) -> ProcessSpec {
        ProcessSpec {
            ready_time: self.ready_time,
            exec_time: self.exec_time,
            deadline: self.deadline,
        }
    }
}

#[inline]
fn to_score(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
