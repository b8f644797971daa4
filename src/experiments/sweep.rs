//! Permutation sweeps.
//!
//! Re-runs one strategy over every reordering of a workload attribute and
//! ranks the orderings by average turnaround time. Every run uses a fresh
//! scheduler, so runs never share state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::models::ProcessSpec;
use crate::scheduler::{SimulationRequest, Strategy};

/// Result of one ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Permuted values, by process position.
    pub ordering: Vec<u64>,
    /// Average turnaround of the run.
    pub average_turnaround: f64,
}

#[derive(Debug, Clone, Copy)]
enum SweepField {
    ReadyTime,
    ExecTime,
}

impl SweepField {
    fn get(self, spec: &ProcessSpec) -> u64 {
        match self {
            SweepField::ReadyTime => spec.ready_time,
            SweepField::ExecTime => spec.exec_time,
        }
    }

    fn set(self, spec: &mut ProcessSpec, value: u64) {
        match self {
            SweepField::ReadyTime => spec.ready_time = value,
            SweepField::ExecTime => spec.exec_time = value,
        }
    }
}

/// All orderings of `items`.
///
/// Orderings are produced in lexicographic order of positions, and equal
/// items are not deduplicated: `n` items always give `n!` orderings.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }

    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}

/// Runs `strategy` for every ordering of the exec times of `specs`.
///
/// Ready times and deadlines stay with their positions. Results are ranked
/// by ascending average turnaround; equal results keep permutation order.
pub fn sweep_exec_time_orderings(
    specs: &[ProcessSpec],
    strategy: Strategy,
    cpu_count: usize,
) -> Result<Vec<SweepOutcome>, SimError> {
    sweep(specs, strategy, cpu_count, SweepField::ExecTime)
}

/// Runs `strategy` for every ordering of the ready times of `specs`.
///
/// Exec times and deadlines stay with their positions. Ranked like
/// [`sweep_exec_time_orderings`].
pub fn sweep_ready_time_orderings(
    specs: &[ProcessSpec],
    strategy: Strategy,
    cpu_count: usize,
) -> Result<Vec<SweepOutcome>, SimError> {
    sweep(specs, strategy, cpu_count, SweepField::ReadyTime)
}

fn sweep(
    specs: &[ProcessSpec],
    strategy: Strategy,
    cpu_count: usize,
    field: SweepField,
) -> Result<Vec<SweepOutcome>, SimError> {
    let values: Vec<u64> = specs.iter().map(|s| field.get(s)).collect();
    let mut outcomes = Vec::new();

    for ordering in permutations(&values) {
        let permuted: Vec<ProcessSpec> = specs
            .iter()
            .zip(&ordering)
            .map(|(spec, &value)| {
                let mut spec = *spec;
                field.set(&mut spec, value);
                spec
            })
            .collect();

        let mut scheduler = SimulationRequest::new(strategy)
            .with_cpu_count(cpu_count)
            .with_specs(&permuted)
            .build()?;
        scheduler.run_to_completion()?;

        outcomes.push(SweepOutcome {
            ordering,
            average_turnaround: scheduler.average_turnaround_time()?,
        });
    }

    outcomes.sort_by(|a, b| a.average_turnaround.total_cmp(&b.average_turnaround));
    debug!(
        strategy = strategy.short_name(),
        ?field,
        runs = outcomes.len(),
        "sweep finished"
    );
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::workload::{TEXTBOOK_BATCH, TEXTBOOK_STAGGERED};

    #[test]
    fn test_permutations_order() {
        assert_eq!(
            permutations(&[1, 2, 3]),
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[test]
    fn test_permutations_keep_duplicates() {
        assert_eq!(permutations(&[0, 0, 4]).len(), 6);
        assert_eq!(permutations::<u8>(&[]), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_fcfs_best_ordering_is_shortest_first() {
        let outcomes = sweep_exec_time_orderings(&TEXTBOOK_BATCH, Strategy::NpFcfs, 1).unwrap();
        assert_eq!(outcomes.len(), 120);
        // FCFS on an ascending ordering is SJF: average 15
        assert_eq!(outcomes[0].ordering, vec![2, 3, 5, 8, 22]);
        assert!((outcomes[0].average_turnaround - 15.0).abs() < 1e-10);
        // Descending ordering is the worst
        let worst = outcomes.last().unwrap();
        assert_eq!(worst.ordering, vec![22, 8, 5, 3, 2]);
    }

    #[test]
    fn test_ranking_is_ascending() {
        let outcomes =
            sweep_exec_time_orderings(&TEXTBOOK_BATCH, Strategy::RoundRobin { quantum: 3 }, 1)
                .unwrap();
        assert!(outcomes
            .windows(2)
            .all(|w| w[0].average_turnaround <= w[1].average_turnaround));
    }

    #[test]
    fn test_ready_time_sweep_keeps_exec_times() {
        let outcomes =
            sweep_ready_time_orderings(&TEXTBOOK_STAGGERED, Strategy::NpSjf, 1).unwrap();
        assert_eq!(outcomes.len(), 120);
        for o in &outcomes {
            let mut sorted = o.ordering.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 0, 4, 4, 4]);
        }
    }

    #[test]
    fn test_invalid_configuration_propagates() {
        let err = sweep_exec_time_orderings(&TEXTBOOK_BATCH, Strategy::NpSjf, 0).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }
}
