//! Allocation history.
//!
//! One [`AllocationRecord`] is appended per busy CPU per cycle. The
//! history is what a timeline view renders; [`AllocationHistory::spans`]
//! collapses it into contiguous execution intervals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CpuId, ProcessId};

/// A process executed on a CPU during one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Cycle of the execution.
    pub timestamp: u64,
    /// Executing CPU.
    pub cpu_id: CpuId,
    /// Executed process.
    pub process_id: ProcessId,
}

/// A contiguous run of one process on one CPU, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSpan {
    /// Executing CPU.
    pub cpu_id: CpuId,
    /// Executed process.
    pub process_id: ProcessId,
    /// First cycle of the run.
    pub start: u64,
    /// Cycle after the last one of the run.
    pub end: u64,
}

impl ExecutionSpan {
    /// Number of cycles in the span.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the span covers no cycle.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Ordered, append-only record of every executed cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationHistory {
    records: Vec<AllocationRecord>,
}

impl AllocationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub(crate) fn push(&mut self, record: AllocationRecord) {
        self.records.push(record);
    }

    /// All records, in execution order.
    pub fn records(&self) -> &[AllocationRecord] {
        &self.records
    }

    /// Number of records (busy CPU-cycles).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has executed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of a given CPU.
    pub fn records_for_cpu(&self, cpu_id: CpuId) -> Vec<&AllocationRecord> {
        self.records.iter().filter(|r| r.cpu_id == cpu_id).collect()
    }

    /// Records of a given process.
    pub fn records_for_process(&self, process_id: ProcessId) -> Vec<&AllocationRecord> {
        self.records
            .iter()
            .filter(|r| r.process_id == process_id)
            .collect()
    }

    /// Last cycle in which a process executed.
    pub fn last_execution(&self, process_id: ProcessId) -> Option<u64> {
        self.records
            .iter()
            .rev()
            .find(|r| r.process_id == process_id)
            .map(|r| r.timestamp)
    }

    /// Busy cycles per CPU. CPUs that never executed are absent.
    pub fn busy_cycles_by_cpu(&self) -> BTreeMap<CpuId, u64> {
        let mut busy = BTreeMap::new();
        for r in &self.records {
            *busy.entry(r.cpu_id).or_insert(0) += 1;
        }
        busy
    }

    /// Collapses the history into contiguous spans.
    ///
    /// Spans are ordered by CPU id, then by start cycle.
    pub fn spans(&self) -> Vec<ExecutionSpan> {
        let mut by_cpu: BTreeMap<CpuId, Vec<ExecutionSpan>> = BTreeMap::new();

        for r in &self.records {
            let spans = by_cpu.entry(r.cpu_id).or_default();
            match spans.last_mut() {
                Some(last) if last.process_id == r.process_id && last.end == r.timestamp => {
                    last.end += 1;
                }
                _ => spans.push(ExecutionSpan {
                    cpu_id: r.cpu_id,
                    process_id: r.process_id,
                    start: r.timestamp,
                    end: r.timestamp + 1,
                }),
            }
        }

        by_cpu.into_values().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: u64, cpu_id: CpuId, process_id: ProcessId) -> AllocationRecord {
        AllocationRecord {
            timestamp,
            cpu_id,
            process_id,
        }
    }

    fn span(cpu_id: CpuId, process_id: ProcessId, start: u64, end: u64) -> ExecutionSpan {
        ExecutionSpan {
            cpu_id,
            process_id,
            start,
            end,
        }
    }

    fn sample_history() -> AllocationHistory {
        let mut h = AllocationHistory::new();
        h.push(record(0, 1, 1));
        h.push(record(0, 2, 2));
        h.push(record(1, 1, 1));
        h.push(record(1, 2, 3));
        h.push(record(2, 1, 2));
        h
    }

    #[test]
    fn test_queries() {
        let h = sample_history();
        assert_eq!(h.len(), 5);
        assert_eq!(h.records_for_cpu(1).len(), 3);
        assert_eq!(h.records_for_process(2).len(), 2);
        assert_eq!(h.last_execution(2), Some(2));
        assert_eq!(h.last_execution(9), None);
    }

    #[test]
    fn test_busy_cycles_by_cpu() {
        let busy = sample_history().busy_cycles_by_cpu();
        assert_eq!(busy[&1], 3);
        assert_eq!(busy[&2], 2);
    }

    #[test]
    fn test_spans_merge_consecutive_cycles() {
        let spans = sample_history().spans();
        assert_eq!(
            spans,
            vec![
                span(1, 1, 0, 2),
                span(1, 2, 2, 3),
                span(2, 2, 0, 1),
                span(2, 3, 1, 2),
            ]
        );
        assert_eq!(spans[0].len(), 2);
    }

    #[test]
    fn test_spans_split_on_idle_gap() {
        let mut h = AllocationHistory::new();
        h.push(record(0, 1, 1));
        h.push(record(3, 1, 1));
        let spans = h.spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].start, 3);
    }

    #[test]
    fn test_empty() {
        let h = AllocationHistory::new();
        assert!(h.is_empty());
        assert!(h.spans().is_empty());
    }
}
