//! Serializable run configuration.

use serde::{Deserialize, Serialize};

use super::{Scheduler, Strategy};
use crate::error::SimError;
use crate::models::{Process, ProcessSpec};

/// Input container for one simulation run.
///
/// # Example
///
/// ```
/// use cpu_sched_sim::models::ProcessSpec;
/// use cpu_sched_sim::scheduler::{SimulationRequest, Strategy};
///
/// let mut scheduler = SimulationRequest::new(Strategy::NpFcfs)
///     .with_specs(&[ProcessSpec::new(0, 3), ProcessSpec::new(1, 2)])
///     .build()
///     .unwrap();
/// scheduler.run_to_completion().unwrap();
/// assert_eq!(scheduler.time(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Strategy to simulate.
    pub strategy: Strategy,
    /// CPU pool size (forced to 1 for round-robin).
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Workload.
    #[serde(default)]
    pub processes: Vec<Process>,
}

fn default_cpu_count() -> usize {
    1
}

impl SimulationRequest {
    /// Creates a request with one CPU and no processes.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            cpu_count: default_cpu_count(),
            processes: Vec::new(),
        }
    }

    /// Sets the CPU pool size.
    pub fn with_cpu_count(mut self, cpu_count: usize) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    /// Adds a process.
    pub fn with_process(mut self, process: Process) -> Self {
        self.processes.push(process);
        self
    }

    /// Adds processes from specs, numbering them in input order after the
    /// largest existing id (from 1 on an empty request).
    ///
    /// Ids saturate at `ProcessId::MAX`; the duplicates that produces are
    /// reported by [`build`](Self::build).
    pub fn with_specs(mut self, specs: &[ProcessSpec]) -> Self {
        let mut next = self
            .processes
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(1, |id| id.saturating_add(1));
        for spec in specs {
            self.processes.push(spec.into_process(next));
            next = next.saturating_add(1);
        }
        self
    }

    /// Builds a fresh scheduler for this request.
    pub fn build(&self) -> Result<Scheduler, SimError> {
        Scheduler::new(self.strategy, self.cpu_count, self.processes.clone())
    }
}

impl Scheduler {
    /// Builds a scheduler from a request.
    pub fn from_request(request: &SimulationRequest) -> Result<Self, SimError> {
        request.build()
    }
}
