//! Simulation event log.
//!
//! The engine appends one [`LogEntry`] per notable transition. Entries are
//! typed; callers format them (the `Display` impl gives the classic
//! `[TIME = nn] text` rendering).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CpuId, ProcessId};

/// A notable transition in the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A blocked process reached its ready time.
    Ready { pid: ProcessId },
    /// A ready process was bound to a CPU.
    Allocated { pid: ProcessId, cpu: CpuId },
    /// A running process was displaced by a higher-priority one.
    Preempted { pid: ProcessId, cpu: CpuId },
    /// A running process used up its round-robin quantum.
    QuantumExpired { pid: ProcessId, cpu: CpuId },
    /// A finished process was released from its CPU.
    Finished {
        pid: ProcessId,
        cpu: CpuId,
        turnaround: u64,
    },
    /// All processes finished. `None` when the workload was empty.
    Completed { average_turnaround: Option<f64> },
}

impl SimEvent {
    /// Process the event refers to, if any.
    pub fn pid(&self) -> Option<ProcessId> {
        match *self {
            SimEvent::Ready { pid }
            | SimEvent::Allocated { pid, .. }
            | SimEvent::Preempted { pid, .. }
            | SimEvent::QuantumExpired { pid, .. }
            | SimEvent::Finished { pid, .. } => Some(pid),
            SimEvent::Completed { .. } => None,
        }
    }

    /// Whether the event took a process away from its CPU before it finished.
    pub fn is_preemption(&self) -> bool {
        matches!(
            self,
            SimEvent::Preempted { .. } | SimEvent::QuantumExpired { .. }
        )
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Ready { pid } => write!(f, "Process {pid} is ready"),
            SimEvent::Allocated { pid, cpu } => {
                write!(f, "Allocated process {pid} to CPU #{cpu}")
            }
            SimEvent::Preempted { pid, cpu } => {
                write!(f, "Preempted process {pid} on CPU #{cpu}")
            }
            SimEvent::QuantumExpired { pid, cpu } => {
                write!(f, "Quantum expired for process {pid} on CPU #{cpu}")
            }
            SimEvent::Finished {
                pid,
                cpu,
                turnaround,
            } => write!(
                f,
                "Finished process {pid} on CPU #{cpu} (turnaround {turnaround})"
            ),
            SimEvent::Completed {
                average_turnaround: Some(avg),
            } => write!(f, "Average turnaround time was {avg}"),
            SimEvent::Completed {
                average_turnaround: None,
            } => write!(f, "No process finished"),
        }
    }
}

/// A timestamped event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Cycle in which the event happened.
    pub timestamp: u64,
    /// What happened.
    pub event: SimEvent,
}

impl LogEntry {
    /// Creates an entry.
    pub fn new(timestamp: u64, event: SimEvent) -> Self {
        Self { timestamp, event }
    }

    /// Event text without the timestamp prefix.
    pub fn text(&self) -> String {
        self.event.to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[TIME = {:2}] {}", self.timestamp, self.event)
    }
}
