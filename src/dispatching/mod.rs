//! Dispatching rules and rule engine.
//!
//! A dispatching rule scores a process; the rule engine orders a set of
//! processes by those scores, falling back to further rules and finally to
//! a deterministic tie-breaker.
//!
//! # Usage
//!
//! ```
//! use cpu_sched_sim::dispatching::{RuleEngine, SchedulingContext, TieBreaker};
//! use cpu_sched_sim::dispatching::rules;
//! use cpu_sched_sim::models::Process;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Edf)
//!     .with_final_tie_breaker(TieBreaker::ById);
//!
//! let a = Process::new(1, 4).with_deadline(9);
//! let b = Process::new(2, 8).with_deadline(5);
//! let order = engine.sort_indices(&[&a, &b], &SchedulingContext::at_time(0));
//! assert_eq!(order, vec![1, 0]);
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::{RuleEngine, TieBreaker};

use crate::models::Process;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (allocated first). Scores are exact
/// integers; laxities may be negative.
pub type RuleScore = i64;

/// A dispatching rule that evaluates process priority.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SJF", "EDF").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a process at the context's cycle.
    fn evaluate(&self, process: &Process, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
