//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Arrival**: FCFS
//! - **Work-based**: SJF (total work), SRT (remaining work)
//! - **Deadline-based**: EDF, LLF (static and dynamic laxity)
//!
//! # Score Convention
//! All rules return lower scores for higher priority processes. Processes
//! without a deadline score `i64::MAX` under deadline-based rules.

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Process;

// ======================== Arrival ========================

/// First Come First Served.
///
/// Scores every process the same, so a stable sort leaves the ready queue
/// in arrival order.
#[derive(Debug, Clone, Copy)]
pub struct Fcfs;

impl DispatchingRule for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn evaluate(&self, _process: &Process, _context: &SchedulingContext) -> RuleScore {
        0
    }

    fn description(&self) -> &'static str {
        "First Come First Served"
    }
}

// ======================== Work-based ========================

/// Shortest Job First.
///
/// Orders by total execution time. Minimizes mean turnaround on a single
/// CPU when all processes are ready together.
#[derive(Debug, Clone, Copy)]
pub struct Sjf;

impl DispatchingRule for Sjf {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        score(process.exec_time)
    }

    fn description(&self) -> &'static str {
        "Shortest Job First"
    }
}

/// Shortest Remaining Time.
///
/// Orders by `exec_time - program_counter`. The preemptive form of SJF:
/// counters move between cycles, so total work is the wrong key there.
#[derive(Debug, Clone, Copy)]
pub struct Srt;

impl DispatchingRule for Srt {
    fn name(&self) -> &'static str {
        "SRT"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        score(process.remaining_exec_time())
    }

    fn description(&self) -> &'static str {
        "Shortest Remaining Time"
    }
}

// ======================== Deadline-based ========================

/// Earliest Deadline First.
#[derive(Debug, Clone, Copy)]
pub struct Edf;

impl DispatchingRule for Edf {
    fn name(&self) -> &'static str {
        "EDF"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        process.deadline_score()
    }

    fn description(&self) -> &'static str {
        "Earliest Deadline First"
    }
}

/// Least Laxity First, static form.
///
/// Laxity = `deadline - ready_time - exec_time`, fixed for the lifetime of
/// the process. Only meaningful while a process has not started, which is
/// always the case when a non-preemptive policy sorts its ready queue.
#[derive(Debug, Clone, Copy)]
pub struct StaticLlf;

impl DispatchingRule for StaticLlf {
    fn name(&self) -> &'static str {
        "LLF"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        process.static_laxity()
    }

    fn description(&self) -> &'static str {
        "Least Laxity First (static laxity)"
    }
}

/// Least Laxity First, dynamic form.
///
/// Laxity = `deadline - current_time - remaining_exec_time`. A running
/// process keeps its laxity; a waiting one loses one unit per cycle.
#[derive(Debug, Clone, Copy)]
pub struct DynamicLlf;

impl DispatchingRule for DynamicLlf {
    fn name(&self) -> &'static str {
        "LLF"
    }

    fn evaluate(&self, process: &Process, context: &SchedulingContext) -> RuleScore {
        process.dynamic_laxity(context.current_time)
    }

    fn description(&self) -> &'static str {
        "Least Laxity First (dynamic laxity)"
    }
}

#[inline]
fn score(cycles: u64) -> RuleScore {
    RuleScore::try_from(cycles).unwrap_or(RuleScore::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fcfs_is_constant() {
        let ctx = SchedulingContext::at_time(7);
        assert_eq!(
            Fcfs.evaluate(&Process::new(1, 22), &ctx),
            Fcfs.evaluate(&Process::new(2, 2), &ctx)
        );
    }

    #[test]
    fn test_sjf() {
        let ctx = SchedulingContext::at_time(0);
        let short = Process::new(1, 2);
        let long = Process::new(2, 22);
        assert!(Sjf.evaluate(&short, &ctx) < Sjf.evaluate(&long, &ctx));
    }

    #[test]
    fn test_sjf_ignores_progress() {
        let ctx = SchedulingContext::at_time(0);
        let mut p = Process::new(1, 5);
        p.exec_atomic_command().unwrap();
        assert_eq!(Sjf.evaluate(&p, &ctx), 5);
    }

    #[test]
    fn test_srt_uses_remaining_work() {
        let ctx = SchedulingContext::at_time(0);
        let mut started = Process::new(1, 10);
        for _ in 0..8 {
            started.exec_atomic_command().unwrap();
        }
        let fresh = Process::new(2, 3);
        assert_eq!(Srt.evaluate(&started, &ctx), 2);
        assert!(Srt.evaluate(&started, &ctx) < Srt.evaluate(&fresh, &ctx));
    }

    #[test]
    fn test_edf() {
        let ctx = SchedulingContext::at_time(0);
        let early = Process::new(1, 4).with_deadline(5);
        let late = Process::new(2, 4).with_deadline(13);
        let none = Process::new(3, 4);
        assert!(Edf.evaluate(&early, &ctx) < Edf.evaluate(&late, &ctx));
        assert!(Edf.evaluate(&late, &ctx) < Edf.evaluate(&none, &ctx));
    }

    #[test]
    fn test_static_llf_ignores_time() {
        let p = Process::new(1, 8).with_deadline(10);
        assert_eq!(StaticLlf.evaluate(&p, &SchedulingContext::at_time(0)), 2);
        assert_eq!(StaticLlf.evaluate(&p, &SchedulingContext::at_time(5)), 2);
    }

    #[test]
    fn test_dynamic_llf_shrinks_while_waiting() {
        let p = Process::new(1, 8).with_deadline(10);
        assert_eq!(DynamicLlf.evaluate(&p, &SchedulingContext::at_time(0)), 2);
        assert_eq!(DynamicLlf.evaluate(&p, &SchedulingContext::at_time(5)), -3);
    }

    #[test]
    fn test_llf_prefers_tighter_slack() {
        // Laxities: 9-0-4 = 5, 9-0-5 = 4, 10-0-8 = 2
        let ctx = SchedulingContext::at_time(0);
        let p1 = Process::new(1, 4).with_deadline(9);
        let p2 = Process::new(2, 5).with_deadline(9);
        let p3 = Process::new(3, 8).with_deadline(10);
        assert!(DynamicLlf.evaluate(&p3, &ctx) < DynamicLlf.evaluate(&p2, &ctx));
        assert!(DynamicLlf.evaluate(&p2, &ctx) < DynamicLlf.evaluate(&p1, &ctx));
    }
}
