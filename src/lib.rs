//! Discrete-time CPU scheduling simulator.
//!
//! Simulates classical single- and multi-CPU scheduling disciplines over a
//! synthetic workload of processes with ready times, execution times and
//! optional deadlines, so strategies can be compared by average turnaround
//! time and by their CPU allocation timelines.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `Cpu`, `AllocationHistory`,
//!   `LogEntry`
//! - **`dispatching`**: Ordering rules (FCFS, SJF, SRT, EDF, LLF) and the
//!   rule engine with deterministic tie-breaking
//! - **`scheduler`**: The step engine, `Strategy`, run configuration, KPIs
//! - **`experiments`**: Reference workloads, workload generator, permutation
//!   sweeps
//! - **`validation`**: Input integrity checks (duplicate IDs, empty work,
//!   empty CPU pools, zero quanta)
//!
//! # Time
//!
//! Time is an abstract integer cycle counter. One call to
//! `Scheduler::step` is one cycle.
//!
//! # Example
//!
//! ```
//! use cpu_sched_sim::models::Process;
//! use cpu_sched_sim::scheduler::{Scheduler, Strategy};
//!
//! let processes: Vec<Process> = [22, 2, 3, 5, 8]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &exec)| Process::new(i as u32 + 1, exec))
//!     .collect();
//!
//! let mut scheduler = Scheduler::new(Strategy::NpFcfs, 1, processes).unwrap();
//! while scheduler.step().unwrap() {}
//!
//! assert_eq!(scheduler.average_turnaround_time().unwrap(), 29.0);
//! ```
//!
//! # References
//!
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4
//! - Liu (2000), "Real-Time Systems", Ch. 6 (EDF, LLF)

pub mod dispatching;
pub mod error;
pub mod experiments;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{PreconditionViolation, SimError};
