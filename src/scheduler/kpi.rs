//! Simulation quality metrics (KPIs).
//!
//! Computes standard scheduling performance indicators from a scheduler's
//! finished processes and allocation history.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Cycle after the last executed one |
//! | Avg Turnaround | Mean of completion - ready time |
//! | Max Turnaround | Largest single turnaround |
//! | Avg Waiting | Mean of turnaround - exec time |
//! | Total Tardiness | Sum of max(0, completion - deadline) |
//! | Maximum Tardiness | Largest single delay |
//! | On-Time Rate | Fraction meeting deadlines |
//! | Avg Utilization | Mean CPU busyness over the makespan |
//! | Preemptions | Priority and quantum preemptions |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Scheduler;
use crate::models::CpuId;

/// Simulation performance indicators.
///
/// All time values are in cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationKpi {
    /// Number of finished processes the metrics cover.
    pub finished: usize,
    /// Cycle after the last executed one.
    pub makespan: u64,
    /// Mean turnaround over finished processes.
    pub avg_turnaround: f64,
    /// Largest turnaround of any finished process.
    pub max_turnaround: u64,
    /// Mean time spent ready but not running.
    pub avg_waiting: f64,
    /// Sum of tardiness across finished processes.
    pub total_tardiness: u64,
    /// Maximum tardiness of any single process.
    pub max_tardiness: u64,
    /// Fraction of finished processes meeting their deadline (0.0..1.0).
    pub on_time_rate: f64,
    /// Per-CPU utilization (busy cycles / makespan).
    pub utilization_by_cpu: BTreeMap<CpuId, f64>,
    /// Mean utilization over the whole pool.
    pub avg_utilization: f64,
    /// Number of preemptions.
    pub preemptions: usize,
}

impl SimulationKpi {
    /// Computes KPIs from the current state of a scheduler.
    ///
    /// Usually called after [`Scheduler::run_to_completion`]; on a partial
    /// run only finished processes are counted.
    pub fn calculate(scheduler: &Scheduler) -> Self {
        let outcomes = scheduler.outcomes();
        let makespan = scheduler
            .allocation_history()
            .iter()
            .map(|r| r.timestamp + 1)
            .max()
            .unwrap_or(0);

        let mut total_turnaround: u64 = 0;
        let mut max_turnaround: u64 = 0;
        let mut total_waiting: u64 = 0;
        let mut total_tardiness: u64 = 0;
        let mut max_tardiness: u64 = 0;
        let mut on_time_count: usize = 0;

        for o in &outcomes {
            total_turnaround += o.turnaround;
            max_turnaround = max_turnaround.max(o.turnaround);
            total_waiting += o.waiting_time();

            let tardiness = o.tardiness();
            if tardiness > 0 {
                total_tardiness += tardiness;
                max_tardiness = max_tardiness.max(tardiness);
            } else {
                // Met, or no deadline
                on_time_count += 1;
            }
        }

        let busy = scheduler.history().busy_cycles_by_cpu();
        let utilization_by_cpu: BTreeMap<CpuId, f64> = scheduler
            .cpus()
            .iter()
            .map(|cpu| {
                let cycles = busy.get(&cpu.id()).copied().unwrap_or(0);
                let util = if makespan == 0 {
                    0.0
                } else {
                    cycles as f64 / makespan as f64
                };
                (cpu.id(), util)
            })
            .collect();

        let avg_utilization = if utilization_by_cpu.is_empty() {
            0.0
        } else {
            utilization_by_cpu.values().sum::<f64>() / utilization_by_cpu.len() as f64
        };

        let finished = outcomes.len();
        let mean = |total: u64| {
            if finished == 0 {
                0.0
            } else {
                total as f64 / finished as f64
            }
        };

        Self {
            finished,
            makespan,
            avg_turnaround: mean(total_turnaround),
            max_turnaround,
            avg_waiting: mean(total_waiting),
            total_tardiness,
            max_tardiness,
            on_time_rate: if finished == 0 {
                1.0
            } else {
                on_time_count as f64 / finished as f64
            },
            utilization_by_cpu,
            avg_utilization,
            preemptions: scheduler.preemption_count(),
        }
    }

    /// Whether the run meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_tardiness: u64, min_utilization: f64) -> bool {
        self.max_tardiness <= max_tardiness && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Process;
    use crate::scheduler::Strategy;

    fn run(strategy: Strategy, cpus: usize, processes: Vec<Process>) -> Scheduler {
        let mut s = Scheduler::new(strategy, cpus, processes).unwrap();
        s.run_to_completion().unwrap();
        s
    }

    #[test]
    fn test_kpi_basic() {
        let s = run(
            Strategy::NpFcfs,
            1,
            vec![Process::new(1, 1).with_deadline(5), Process::new(2, 2).with_deadline(5)],
        );
        let kpi = SimulationKpi::calculate(&s);
        assert_eq!(kpi.finished, 2);
        assert_eq!(kpi.makespan, 3);
        assert!((kpi.avg_turnaround - 2.0).abs() < 1e-10); // (1+3)/2
        assert_eq!(kpi.max_turnaround, 3);
        assert!((kpi.avg_waiting - 0.5).abs() < 1e-10); // (0+1)/2
        assert_eq!(kpi.total_tardiness, 0);
        assert!((kpi.on_time_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_tardiness() {
        // P1 completes at 4 (deadline 2 → tardy 2), P2 at 5 (deadline 10)
        let s = run(
            Strategy::NpFcfs,
            1,
            vec![Process::new(1, 4).with_deadline(2), Process::new(2, 1).with_deadline(10)],
        );
        let kpi = SimulationKpi::calculate(&s);
        assert_eq!(kpi.total_tardiness, 2);
        assert_eq!(kpi.max_tardiness, 2);
        assert!((kpi.on_time_rate - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_utilization() {
        let s = run(
            Strategy::NpFcfs,
            2,
            vec![Process::new(1, 4), Process::new(2, 2)],
        );
        let kpi = SimulationKpi::calculate(&s);
        assert_eq!(kpi.makespan, 4);
        assert!((kpi.utilization_by_cpu[&1] - 1.0).abs() < 1e-10);
        assert!((kpi.utilization_by_cpu[&2] - 0.5).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_counts_preemptions() {
        let s = run(
            Strategy::RoundRobin { quantum: 1 },
            1,
            vec![Process::new(1, 2), Process::new(2, 2)],
        );
        let kpi = SimulationKpi::calculate(&s);
        // 1,2,1,2: P1 and P2 each lose the CPU once
        assert_eq!(kpi.preemptions, 2);
    }

    #[test]
    fn test_kpi_empty() {
        let s = run(Strategy::PEdf, 2, Vec::new());
        let kpi = SimulationKpi::calculate(&s);
        assert_eq!(kpi.finished, 0);
        assert_eq!(kpi.makespan, 0);
        assert!((kpi.on_time_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_meets_thresholds() {
        let s = run(Strategy::NpFcfs, 1, vec![Process::new(1, 4).with_deadline(2)]);
        let kpi = SimulationKpi::calculate(&s);
        assert!(kpi.meets_thresholds(2, 0.0));
        assert!(!kpi.meets_thresholds(1, 0.0));
        assert!(!kpi.meets_thresholds(5, 1.5));
    }
}
