//! Discrete-time scheduling engine.
//!
//! # Algorithm
//!
//! Each call to [`Scheduler::step`] is one cycle:
//!
//! 1. Blocked processes whose ready time has come join the ready queue, in
//!    (ready time, input position) order.
//! 2. The strategy's allocation policy frees finished processes, may
//!    preempt incumbents, and fills idle CPUs from the ready queue.
//! 3. Every busy CPU executes one cycle of its process.
//! 4. If nothing is blocked, ready or running, the run is complete and
//!    `step` returns `false` without advancing the clock.
//!
//! # Ownership
//!
//! Processes live in an arena owned by the scheduler. Queues and CPUs refer
//! to arena slots, and every record carries an explicit [`ProcessState`],
//! so a process can never sit in two containers at once.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::strategy::{AllocationPolicy, Strategy};
use crate::dispatching::{RuleEngine, SchedulingContext};
use crate::error::SimError;
use crate::models::{
    AllocationHistory, AllocationRecord, Cpu, CpuId, LogEntry, Process, ProcessHandle, ProcessId,
    SimEvent,
};
use crate::validation::validate_input;

/// Lifecycle state of a process.
///
/// `Blocked → Ready → Running → {Running | Ready | Finished}`.
/// `Finished` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    /// Ready time lies in the future.
    Blocked,
    /// Eligible, waiting for a CPU.
    Ready,
    /// Bound to a CPU.
    Running,
    /// All work done and released from its CPU.
    Finished,
}

/// Result of one finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    /// Process id.
    pub pid: ProcessId,
    /// Ready time of the process.
    pub ready_time: u64,
    /// Execution time of the process.
    pub exec_time: u64,
    /// Deadline of the process.
    pub deadline: Option<u64>,
    /// Cycle after the last executed one.
    pub completion_time: u64,
    /// `completion_time - ready_time`.
    pub turnaround: u64,
}

impl ProcessOutcome {
    /// Cycles spent eligible but not executing.
    pub fn waiting_time(&self) -> u64 {
        self.turnaround.saturating_sub(self.exec_time)
    }

    /// Cycles past the deadline (0 if met or absent).
    pub fn tardiness(&self) -> u64 {
        self.deadline
            .map(|d| self.completion_time.saturating_sub(d))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
struct ProcessRecord {
    process: Process,
    state: ProcessState,
    last_executed: Option<u64>,
}

impl ProcessRecord {
    fn outcome(&self) -> Option<ProcessOutcome> {
        if self.state != ProcessState::Finished {
            return None;
        }
        let last = self.last_executed?;
        let completion_time = last + 1;
        Some(ProcessOutcome {
            pid: self.process.id,
            ready_time: self.process.ready_time,
            exec_time: self.process.exec_time,
            deadline: self.process.deadline,
            completion_time,
            turnaround: completion_time.saturating_sub(self.process.ready_time),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Displacement {
    Priority,
    QuantumExpired,
}

/// Discrete-time CPU scheduling simulator.
///
/// # Example
///
/// ```
/// use cpu_sched_sim::models::Process;
/// use cpu_sched_sim::scheduler::{Scheduler, Strategy};
///
/// let processes = vec![Process::new(1, 22), Process::new(2, 2), Process::new(3, 3)];
/// let mut scheduler = Scheduler::new(Strategy::NpSjf, 1, processes).unwrap();
/// scheduler.run_to_completion().unwrap();
///
/// // Finish times 2, 5, 27
/// assert!((scheduler.average_turnaround_time().unwrap() - 34.0 / 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    strategy: Strategy,
    rule_engine: RuleEngine,
    records: Vec<ProcessRecord>,
    index: HashMap<ProcessId, usize>,
    blocked: VecDeque<usize>,
    ready: Vec<usize>,
    cpus: Vec<Cpu>,
    time: u64,
    quantum_counter: u64,
    history: AllocationHistory,
    log: Vec<LogEntry>,
    complete: bool,
}

impl Scheduler {
    /// Creates a scheduler over `processes` with `cpu_count` CPUs.
    ///
    /// Round-robin always runs on exactly one CPU; `cpu_count` is ignored
    /// for it.
    ///
    /// # Errors
    /// [`SimError::InvalidConfiguration`] listing every problem found by
    /// [`validate_input`].
    pub fn new(
        strategy: Strategy,
        cpu_count: usize,
        processes: Vec<Process>,
    ) -> Result<Self, SimError> {
        validate_input(&processes, &strategy, cpu_count)?;

        let cpu_count = match strategy.policy() {
            AllocationPolicy::RoundRobin { .. } => 1,
            _ => cpu_count,
        };
        // Bounded by validation; round-robin is pinned to 1 above.
        let pool_size = CpuId::try_from(cpu_count).unwrap_or(CpuId::MAX);
        let cpus = (1..=pool_size).map(Cpu::new).collect();

        let index = processes
            .iter()
            .enumerate()
            .map(|(slot, p)| (p.id, slot))
            .collect();

        let mut arrival: Vec<usize> = (0..processes.len()).collect();
        arrival.sort_by_key(|&slot| processes[slot].ready_time);

        let mut records: Vec<ProcessRecord> = processes
            .into_iter()
            .map(|process| ProcessRecord {
                process,
                state: ProcessState::Blocked,
                last_executed: None,
            })
            .collect();

        let mut blocked = VecDeque::new();
        let mut ready = Vec::new();
        for slot in arrival {
            if records[slot].process.ready_time == 0 {
                records[slot].state = ProcessState::Ready;
                ready.push(slot);
            } else {
                blocked.push_back(slot);
            }
        }

        debug!(
            strategy = strategy.short_name(),
            cpus = cpu_count,
            processes = records.len(),
            "scheduler created"
        );

        Ok(Self {
            strategy,
            rule_engine: strategy.rule_engine(),
            records,
            index,
            blocked,
            ready,
            cpus,
            time: 0,
            quantum_counter: 0,
            history: AllocationHistory::new(),
            log: Vec::new(),
            complete: false,
        })
    }

    /// Creates a single-CPU round-robin scheduler.
    pub fn round_robin(quantum: u64, processes: Vec<Process>) -> Result<Self, SimError> {
        Self::new(Strategy::RoundRobin { quantum }, 1, processes)
    }

    // ======================== Stepping ========================

    /// Advances the simulation by one cycle.
    ///
    /// Returns `Ok(false)` once every process has finished; the clock is not
    /// advanced by that final call, and further calls are no-ops.
    ///
    /// # Errors
    /// [`SimError::PreconditionViolation`] if an engine invariant breaks.
    pub fn step(&mut self) -> Result<bool, SimError> {
        if self.complete {
            return Ok(false);
        }

        self.admit_ready();

        match self.strategy.policy() {
            AllocationPolicy::NonPreemptive => self.allocate_non_preemptive()?,
            AllocationPolicy::Preemptive => self.allocate_preemptive()?,
            AllocationPolicy::RoundRobin { quantum } => self.allocate_round_robin(quantum)?,
        }

        self.execute_cycle()?;

        if self.blocked.is_empty() && self.ready.is_empty() && !self.any_running() {
            self.complete = true;
            let average_turnaround = self.average_turnaround_time().ok();
            self.push_log(SimEvent::Completed { average_turnaround });
            info!(
                time = self.time,
                strategy = self.strategy.short_name(),
                average_turnaround = ?average_turnaround,
                "simulation complete"
            );
            return Ok(false);
        }

        self.time += 1;
        Ok(true)
    }

    /// Steps until the simulation is complete.
    pub fn run_to_completion(&mut self) -> Result<(), SimError> {
        while self.step()? {}
        Ok(())
    }

    fn admit_ready(&mut self) {
        while let Some(&slot) = self.blocked.front() {
            if self.records[slot].process.ready_time > self.time {
                break;
            }
            self.blocked.pop_front();
            self.records[slot].state = ProcessState::Ready;
            self.ready.push(slot);
            let pid = self.records[slot].process.id;
            trace!(time = self.time, pid, "process ready");
            self.push_log(SimEvent::Ready { pid });
        }
    }

    fn execute_cycle(&mut self) -> Result<(), SimError> {
        let time = self.time;
        for cpu in self.cpus.iter_mut() {
            let Some(handle) = cpu.current() else {
                continue;
            };
            let record = &mut self.records[handle.slot];
            cpu.execute(time, &mut record.process)?;
            record.last_executed = Some(time);
            self.history.push(AllocationRecord {
                timestamp: time,
                cpu_id: cpu.id(),
                process_id: handle.pid,
            });
            trace!(time, pid = handle.pid, cpu = cpu.id(), "executed cycle");
        }
        Ok(())
    }

    // ======================== Allocation policies ========================

    /// Allocated processes run to completion; idle CPUs take the head of
    /// the sorted ready queue.
    fn allocate_non_preemptive(&mut self) -> Result<(), SimError> {
        self.release_finished()?;
        self.ready = self.rank(&self.ready);

        for cpu_idx in 0..self.cpus.len() {
            if self.ready.is_empty() {
                break;
            }
            if !self.cpus[cpu_idx].has_process() {
                let slot = self.ready.remove(0);
                self.bind(cpu_idx, slot)?;
            }
        }
        Ok(())
    }

    /// Incumbents and ready processes compete every cycle; the best
    /// `#CPUs` of them hold the CPUs afterwards.
    fn allocate_preemptive(&mut self) -> Result<(), SimError> {
        self.release_finished()?;

        let mut candidates: Vec<usize> = self
            .cpus
            .iter()
            .filter_map(|cpu| cpu.current().map(|h| h.slot))
            .collect();
        candidates.extend(self.ready.iter().copied());

        let winners: Vec<usize> = self
            .rank(&candidates)
            .into_iter()
            .take(self.cpus.len())
            .collect();

        for cpu_idx in 0..self.cpus.len() {
            if let Some(handle) = self.cpus[cpu_idx].current() {
                if !winners.contains(&handle.slot) {
                    self.displace(cpu_idx, Displacement::Priority)?;
                }
            }
        }

        let mut unbound: VecDeque<usize> = winners
            .into_iter()
            .filter(|&slot| self.records[slot].state == ProcessState::Ready)
            .collect();

        for cpu_idx in 0..self.cpus.len() {
            if self.cpus[cpu_idx].has_process() {
                continue;
            }
            let Some(slot) = unbound.pop_front() else {
                break;
            };
            self.take_ready(slot);
            self.bind(cpu_idx, slot)?;
        }
        Ok(())
    }

    /// FIFO rotation on the single CPU, gated by the quantum.
    ///
    /// The counter also advances on idle cycles, so idle time eats into
    /// the quantum of the next process.
    fn allocate_round_robin(&mut self, quantum: u64) -> Result<(), SimError> {
        if self.release_finished()? > 0 {
            self.quantum_counter = 0;
        } else if self.quantum_counter >= quantum && self.cpus[0].has_process() {
            self.displace(0, Displacement::QuantumExpired)?;
            self.quantum_counter = 0;
        }

        if !self.cpus[0].has_process() && !self.ready.is_empty() {
            let slot = self.ready.remove(0);
            self.bind(0, slot)?;
            self.quantum_counter = 0;
        }

        self.quantum_counter += 1;
        Ok(())
    }

    // ======================== Transitions ========================

    /// Releases every CPU whose process has finished. Returns how many.
    fn release_finished(&mut self) -> Result<usize, SimError> {
        let mut released = 0;
        for cpu_idx in 0..self.cpus.len() {
            let Some(handle) = self.cpus[cpu_idx].current() else {
                continue;
            };
            if !self.cpus[cpu_idx].has_finished_process(&self.records[handle.slot].process) {
                continue;
            }

            self.cpus[cpu_idx].deallocate()?;
            let record = &mut self.records[handle.slot];
            record.state = ProcessState::Finished;
            let turnaround = record.outcome().map(|o| o.turnaround).unwrap_or(0);
            let cpu = self.cpus[cpu_idx].id();

            debug!(time = self.time, pid = handle.pid, cpu, turnaround, "process finished");
            self.push_log(SimEvent::Finished {
                pid: handle.pid,
                cpu,
                turnaround,
            });
            released += 1;
        }
        Ok(released)
    }

    fn bind(&mut self, cpu_idx: usize, slot: usize) -> Result<(), SimError> {
        let pid = self.records[slot].process.id;
        self.cpus[cpu_idx].allocate(ProcessHandle { slot, pid })?;
        self.records[slot].state = ProcessState::Running;

        let cpu = self.cpus[cpu_idx].id();
        debug!(time = self.time, pid, cpu, "process allocated");
        self.push_log(SimEvent::Allocated { pid, cpu });
        Ok(())
    }

    /// Takes an unfinished process off its CPU and appends it to the ready
    /// queue.
    fn displace(&mut self, cpu_idx: usize, reason: Displacement) -> Result<(), SimError> {
        let handle = self.cpus[cpu_idx].deallocate()?;
        self.records[handle.slot].state = ProcessState::Ready;
        self.ready.push(handle.slot);

        let cpu = self.cpus[cpu_idx].id();
        let pid = handle.pid;
        debug!(time = self.time, pid, cpu, ?reason, "process preempted");
        self.push_log(match reason {
            Displacement::Priority => SimEvent::Preempted { pid, cpu },
            Displacement::QuantumExpired => SimEvent::QuantumExpired { pid, cpu },
        });
        Ok(())
    }

    fn take_ready(&mut self, slot: usize) {
        if let Some(pos) = self.ready.iter().position(|&s| s == slot) {
            self.ready.remove(pos);
        }
    }

    /// Orders arena slots by the strategy's rule engine at the current cycle.
    fn rank(&self, slots: &[usize]) -> Vec<usize> {
        let processes: Vec<&Process> = slots.iter().map(|&s| &self.records[s].process).collect();
        let context = SchedulingContext::at_time(self.time);
        self.rule_engine
            .sort_indices(&processes, &context)
            .into_iter()
            .map(|i| slots[i])
            .collect()
    }

    fn any_running(&self) -> bool {
        self.cpus.iter().any(Cpu::has_process)
    }

    fn push_log(&mut self, event: SimEvent) {
        self.log.push(LogEntry::new(self.time, event));
    }

    // ======================== Metrics ========================

    /// Mean of `last_execution - ready_time + 1` over finished processes.
    ///
    /// # Errors
    /// [`SimError::EmptyResult`] if no process has finished yet.
    pub fn average_turnaround_time(&self) -> Result<f64, SimError> {
        let outcomes = self.outcomes();
        if outcomes.is_empty() {
            return Err(SimError::EmptyResult);
        }
        let total: u64 = outcomes.iter().map(|o| o.turnaround).sum();
        Ok(total as f64 / outcomes.len() as f64)
    }

    /// Outcomes of finished processes, in input order.
    pub fn outcomes(&self) -> Vec<ProcessOutcome> {
        self.records.iter().filter_map(ProcessRecord::outcome).collect()
    }

    /// Outcome of one process, if it has finished.
    pub fn outcome(&self, pid: ProcessId) -> Option<ProcessOutcome> {
        self.index
            .get(&pid)
            .and_then(|&slot| self.records[slot].outcome())
    }

    /// Number of preemptions (priority and quantum) so far.
    pub fn preemption_count(&self) -> usize {
        self.log.iter().filter(|e| e.event.is_preemption()).count()
    }

    // ======================== Accessors ========================

    /// Strategy being simulated.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Current cycle.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Whether the run has completed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// CPU pool.
    pub fn cpus(&self) -> &[Cpu] {
        &self.cpus
    }

    /// Event log, in order.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Executed cycles as `(timestamp, cpu_id, process_id)` records.
    pub fn allocation_history(&self) -> &[AllocationRecord] {
        self.history.records()
    }

    /// Full allocation history with query helpers.
    pub fn history(&self) -> &AllocationHistory {
        &self.history
    }

    /// Every process, in input order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> + '_ {
        self.records.iter().map(|r| &r.process)
    }

    /// A process by id.
    pub fn process(&self, pid: ProcessId) -> Option<&Process> {
        self.index.get(&pid).map(|&slot| &self.records[slot].process)
    }

    /// Lifecycle state of a process.
    pub fn process_state(&self, pid: ProcessId) -> Option<ProcessState> {
        self.index.get(&pid).map(|&slot| self.records[slot].state)
    }

    /// Ids of ready processes, in queue order.
    pub fn ready_queue(&self) -> Vec<ProcessId> {
        self.ready
            .iter()
            .map(|&s| self.records[s].process.id)
            .collect()
    }

    /// Ids of blocked processes, in arrival order.
    pub fn blocked_queue(&self) -> Vec<ProcessId> {
        self.blocked
            .iter()
            .map(|&s| self.records[s].process.id)
            .collect()
    }

    /// Ids of running processes, by CPU.
    pub fn running(&self) -> Vec<(CpuId, ProcessId)> {
        self.cpus
            .iter()
            .filter_map(|cpu| cpu.current().map(|h| (cpu.id(), h.pid)))
            .collect()
    }

    /// Round-robin quantum counter (always 0 for other strategies).
    pub fn quantum_counter(&self) -> u64 {
        self.quantum_counter
    }
}
