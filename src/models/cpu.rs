//! CPU model.
//!
//! A CPU is the execution resource of the simulation. It holds at most one
//! process at a time, but never owns it: the scheduler's arena owns every
//! process, and the CPU only keeps a [`ProcessHandle`] while running one.

use serde::{Deserialize, Serialize};

use super::{Process, ProcessId};
use crate::error::PreconditionViolation;

/// Stable CPU identifier within a pool (1-based).
pub type CpuId = u32;

/// Non-owning reference to a process in the scheduler's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessHandle {
    /// Arena slot of the process.
    pub slot: usize,
    /// Id of the process, kept for history and checks.
    pub pid: ProcessId,
}

/// A simulated CPU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    id: CpuId,
    current: Option<ProcessHandle>,
    history: Vec<(u64, ProcessId)>,
}

impl Cpu {
    /// Creates an idle CPU.
    pub fn new(id: CpuId) -> Self {
        Self {
            id,
            current: None,
            history: Vec::new(),
        }
    }

    /// CPU id.
    #[inline]
    pub fn id(&self) -> CpuId {
        self.id
    }

    /// Handle of the held process, if any.
    #[inline]
    pub fn current(&self) -> Option<ProcessHandle> {
        self.current
    }

    /// Whether a process is bound to this CPU.
    #[inline]
    pub fn has_process(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the bound process is `process` and has finished.
    pub fn has_finished_process(&self, process: &Process) -> bool {
        matches!(self.current, Some(h) if h.pid == process.id) && process.is_finished()
    }

    /// Cycles executed on this CPU, as `(timestamp, process_id)`.
    pub fn history(&self) -> &[(u64, ProcessId)] {
        &self.history
    }

    /// Number of cycles this CPU was busy.
    pub fn busy_cycles(&self) -> usize {
        self.history.len()
    }

    /// Binds a process to this CPU.
    ///
    /// # Errors
    /// Fails if the CPU already holds a process.
    pub fn allocate(&mut self, handle: ProcessHandle) -> Result<(), PreconditionViolation> {
        if let Some(held) = self.current {
            return Err(PreconditionViolation::CpuOccupied {
                cpu: self.id,
                held: held.pid,
            });
        }
        self.current = Some(handle);
        Ok(())
    }

    /// Releases the bound process and returns its handle.
    ///
    /// # Errors
    /// Fails if the CPU is idle.
    pub fn deallocate(&mut self) -> Result<ProcessHandle, PreconditionViolation> {
        self.current
            .take()
            .ok_or(PreconditionViolation::CpuIdle { cpu: self.id })
    }

    /// Executes one cycle of the bound process at `timestamp`.
    ///
    /// `process` must be the process referenced by the held handle.
    ///
    /// # Errors
    /// Fails if the CPU is idle, if `process` is not the bound one, or if
    /// the process has already finished.
    pub fn execute(
        &mut self,
        timestamp: u64,
        process: &mut Process,
    ) -> Result<(), PreconditionViolation> {
        let handle = self
            .current
            .ok_or(PreconditionViolation::CpuIdle { cpu: self.id })?;
        if handle.pid != process.id {
            return Err(PreconditionViolation::HandleMismatch {
                cpu: self.id,
                held: handle.pid,
                given: process.id,
            });
        }
        process.exec_atomic_command()?;
        self.history.push((timestamp, process.id));
        Ok(())
    }
}
