//! Strategy comparison experiments.
//!
//! Thin drivers over the public scheduler API: reference workloads, a
//! seeded synthetic workload generator, and permutation sweeps that rank
//! input orderings by average turnaround time.
//!
//! # Usage
//!
//! ```
//! use cpu_sched_sim::experiments::{sweep_exec_time_orderings, workloads};
//! use cpu_sched_sim::scheduler::Strategy;
//!
//! let ranked = sweep_exec_time_orderings(
//!     &workloads::TEXTBOOK_BATCH,
//!     Strategy::RoundRobin { quantum: 3 },
//!     1,
//! )
//! .unwrap();
//! assert_eq!(ranked.len(), 120);
//! ```

mod sweep;
mod workload;

pub use sweep::{
    permutations, sweep_exec_time_orderings, sweep_ready_time_orderings, SweepOutcome,
};
pub use workload::WorkloadGenerator;

/// Reference workloads from the classic scheduling exercise sheet.
pub mod workloads {
    pub use super::workload::{
        TEXTBOOK_BATCH, TEXTBOOK_DEADLINES, TEXTBOOK_DEADLINES_TIGHT, TEXTBOOK_STAGGERED,
    };
}
