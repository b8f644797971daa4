//! Input validation for simulation runs.
//!
//! Checks a workload and its CPU pool before the engine is built. Detects:
//! - Duplicate process IDs
//! - Processes that need no work (`exec_time == 0`)
//! - Zero deadlines
//! - Empty CPU pools (non-round-robin strategies)
//! - CPU pools too large to number with a `CpuId`
//! - Zero round-robin quanta
//!
//! Every problem is reported, not only the first one.

use std::collections::HashSet;

use crate::models::{CpuId, Process};
use crate::scheduler::Strategy;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two processes share the same ID.
    DuplicateId,
    /// A process has `exec_time == 0`.
    NonPositiveExecTime,
    /// A process has a deadline of 0.
    NonPositiveDeadline,
    /// The CPU pool is empty.
    NoCpus,
    /// The CPU pool has more CPUs than `CpuId` can number.
    TooManyCpus,
    /// The round-robin quantum is 0.
    NonPositiveQuantum,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates process descriptors.
///
/// Checks:
/// 1. No duplicate process IDs
/// 2. Every `exec_time` is positive
/// 3. Every present deadline is positive
pub fn validate_processes(processes: &[Process]) -> ValidationResult {
    let mut errors = Vec::new();
    collect_process_errors(processes, &mut errors);
    into_result(errors)
}

/// Validates a complete run configuration.
///
/// In addition to [`validate_processes`], checks that the pool has at least
/// one CPU, or, for round-robin (which always uses a single CPU), that the
/// quantum is positive.
pub fn validate_input(
    processes: &[Process],
    strategy: &Strategy,
    cpu_count: usize,
) -> ValidationResult {
    let mut errors = Vec::new();

    match strategy {
        Strategy::RoundRobin { quantum } => {
            if *quantum == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveQuantum,
                    "Round-robin quantum must be positive",
                ));
            }
        }
        _ => {
            if cpu_count == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NoCpus,
                    format!("CPU count must be positive for {}", strategy.name()),
                ));
            } else if CpuId::try_from(cpu_count).is_err() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::TooManyCpus,
                    format!("CPU count {cpu_count} exceeds {}", CpuId::MAX),
                ));
            }
        }
    }

    collect_process_errors(processes, &mut errors);
    into_result(errors)
}

fn collect_process_errors(processes: &[Process], errors: &mut Vec<ValidationError>) {
    let mut ids = HashSet::new();

    for p in processes {
        if !ids.insert(p.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate process ID: {}", p.id),
            ));
        }

        if p.exec_time == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveExecTime,
                format!("Process {} has no execution time", p.id),
            ));
        }

        if p.deadline == Some(0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDeadline,
                format!("Process {} has a zero deadline", p.id),
            ));
        }
    }
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
