//! Simulation engine, strategies, and KPI evaluation.
//!
//! # Algorithm
//!
//! `Scheduler` advances a discrete clock one cycle per [`Scheduler::step`].
//! Each cycle admits newly ready processes, lets the strategy's allocation
//! policy rearrange the CPU pool, and executes one unit of work on every
//! busy CPU.
//!
//! | Policy | Strategies | Candidates each cycle |
//! |--------|------------|-----------------------|
//! | Non-preemptive | FCFS, SJF, EDF, LLF | Ready queue only |
//! | Preemptive | SJF (remaining), EDF, LLF (dynamic) | Incumbents + ready queue |
//! | Round-robin | RR | Ready queue head, on quantum expiry |
//!
//! # KPI
//!
//! `SimulationKpi` computes turnaround, waiting, tardiness, utilization,
//! and preemption metrics from a finished run.

mod engine;
mod kpi;
mod request;
mod strategy;

pub use engine::{ProcessOutcome, ProcessState, Scheduler};
pub use kpi::SimulationKpi;
pub use request::SimulationRequest;
pub use strategy::{AllocationPolicy, ParseStrategyError, Strategy};
