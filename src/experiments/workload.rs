//! Workloads: the classic exercise-sheet examples and a seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

use crate::models::ProcessSpec;

const fn spec(ready_time: u64, exec_time: u64, deadline: Option<u64>) -> ProcessSpec {
    ProcessSpec {
        ready_time,
        exec_time,
        deadline,
    }
}

/// Five jobs ready at t=0 (FCFS, SJF, RR comparison).
pub const TEXTBOOK_BATCH: [ProcessSpec; 5] = [
    spec(0, 22, None),
    spec(0, 2, None),
    spec(0, 3, None),
    spec(0, 5, None),
    spec(0, 8, None),
];

/// The same jobs with three late arrivals (preemptive vs non-preemptive SJF).
pub const TEXTBOOK_STAGGERED: [ProcessSpec; 5] = [
    spec(0, 22, None),
    spec(0, 2, None),
    spec(4, 3, None),
    spec(4, 5, None),
    spec(4, 8, None),
];

/// Deadline workload for EDF/LLF on two CPUs.
pub const TEXTBOOK_DEADLINES: [ProcessSpec; 3] = [
    spec(0, 4, Some(9)),
    spec(0, 5, Some(9)),
    spec(0, 8, Some(10)),
];

/// Second deadline workload for EDF/LLF.
pub const TEXTBOOK_DEADLINES_TIGHT: [ProcessSpec; 4] = [
    spec(0, 4, Some(5)),
    spec(0, 1, Some(7)),
    spec(0, 2, Some(7)),
    spec(0, 5, Some(13)),
];

/// Seeded generator of synthetic workloads.
///
/// # Example
/// ```
/// use cpu_sched_sim::experiments::WorkloadGenerator;
///
/// let generator = WorkloadGenerator::new()
///     .with_exec_range(1..=8)
///     .with_deadline_slack(0..=5);
/// let a = generator.generate_seeded(6, 42);
/// let b = generator.generate_seeded(6, 42);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadGenerator {
    ready_range: RangeInclusive<u64>,
    exec_range: RangeInclusive<u64>,
    deadline_slack: Option<RangeInclusive<u64>>,
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkloadGenerator {
    /// Ready times in `0..=10`, exec times in `1..=10`, no deadlines.
    pub fn new() -> Self {
        Self {
            ready_range: 0..=10,
            exec_range: 1..=10,
            deadline_slack: None,
        }
    }

    /// Sets the ready time range.
    pub fn with_ready_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.ready_range = ordered(range);
        self
    }

    /// Sets the exec time range. Values below 1 are raised to 1.
    pub fn with_exec_range(mut self, range: RangeInclusive<u64>) -> Self {
        let range = ordered(range);
        self.exec_range = (*range.start()).max(1)..=(*range.end()).max(1);
        self
    }

    /// Gives every process a deadline of `ready + exec + slack`, with the
    /// slack drawn from `range`.
    pub fn with_deadline_slack(mut self, range: RangeInclusive<u64>) -> Self {
        self.deadline_slack = Some(ordered(range));
        self
    }

    /// Generates `count` specs from `rng`.
    pub fn generate<R: Rng>(&self, count: usize, rng: &mut R) -> Vec<ProcessSpec> {
        (0..count)
            .map(|_| {
                let ready_time = rng.random_range(self.ready_range.clone());
                let exec_time = rng.random_range(self.exec_range.clone());
                let deadline = self
                    .deadline_slack
                    .as_ref()
                    .map(|slack| ready_time + exec_time + rng.random_range(slack.clone()));
                spec(ready_time, exec_time, deadline)
            })
            .collect()
    }

    /// Generates `count` specs from a deterministic seed.
    pub fn generate_seeded(&self, count: usize, seed: u64) -> Vec<ProcessSpec> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(count, &mut rng)
    }
}

fn ordered(range: RangeInclusive<u64>) -> RangeInclusive<u64> {
    let (start, end) = range.into_inner();
    if start <= end {
        start..=end
    } else {
        end..=start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_batch_total_work() {
        let total: u64 = TEXTBOOK_BATCH.iter().map(|s| s.exec_time).sum();
        assert_eq!(total, 40);
        assert!(TEXTBOOK_BATCH.iter().all(|s| s.deadline.is_none()));
    }

    #[test]
    fn test_generated_values_within_ranges() {
        let generator = WorkloadGenerator::new()
            .with_ready_range(2..=4)
            .with_exec_range(3..=6)
            .with_deadline_slack(1..=2);
        for s in generator.generate_seeded(50, 7) {
            assert!((2..=4).contains(&s.ready_time));
            assert!((3..=6).contains(&s.exec_time));
            let slack = s.deadline.unwrap() - s.ready_time - s.exec_time;
            assert!((1..=2).contains(&slack));
        }
    }

    #[test]
    fn test_exec_range_never_zero() {
        let generator = WorkloadGenerator::new().with_exec_range(0..=0);
        assert!(generator.generate_seeded(10, 1).iter().all(|s| s.exec_time == 1));
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let generator = WorkloadGenerator::new().with_ready_range(5..=1);
        assert!(generator
            .generate_seeded(20, 3)
            .iter()
            .all(|s| (1..=5).contains(&s.ready_time)));
    }

    #[test]
    fn test_no_deadlines_by_default() {
        let specs = WorkloadGenerator::default().generate_seeded(5, 9);
        assert_eq!(specs.len(), 5);
        assert!(specs.iter().all(|s| s.deadline.is_none()));
    }
}
