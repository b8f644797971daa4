//! Simulation domain models.
//!
//! Provides the data types the engine operates on: processes, CPUs, the
//! per-cycle allocation history, and the event log.
//!
//! # Ownership
//!
//! | Type | Owned by | Mutated by |
//! |------|----------|------------|
//! | Process | Scheduler arena | The CPU running it (one cycle at a time) |
//! | Cpu | Scheduler pool | Scheduler (allocate/deallocate/execute) |
//! | AllocationHistory | Scheduler | Append-only |
//! | LogEntry | Scheduler | Append-only |

mod cpu;
mod event;
mod history;
mod process;

pub use cpu::{Cpu, CpuId, ProcessHandle};
pub use event::{LogEntry, SimEvent};
pub use history::{AllocationHistory, AllocationRecord, ExecutionSpan};
pub use process::{Process, ProcessId, ProcessSpec};
