//! Error types.
//!
//! Three failure classes exist:
//! - invalid input, rejected at construction ([`SimError::InvalidConfiguration`]);
//! - broken engine invariants ([`SimError::PreconditionViolation`]), which
//!   indicate a bug and are never silently ignored;
//! - metrics requested before any process finished ([`SimError::EmptyResult`]).
//!
//! The simulation is deterministic, so none of these are retryable.

use std::fmt;

use crate::models::{CpuId, ProcessId};
use crate::validation::ValidationError;

/// An operation was invoked in a state where it is not allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
    /// A finished process was asked to execute another cycle.
    ProcessAlreadyFinished { pid: ProcessId },
    /// A process was allocated to a CPU that already holds one.
    CpuOccupied { cpu: CpuId, held: ProcessId },
    /// A CPU without a process was deallocated or executed.
    CpuIdle { cpu: CpuId },
    /// A CPU was asked to execute a process other than the one it holds.
    HandleMismatch {
        cpu: CpuId,
        held: ProcessId,
        given: ProcessId,
    },
}

impl fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessAlreadyFinished { pid } => {
                write!(f, "process {pid} is already finished")
            }
            Self::CpuOccupied { cpu, held } => {
                write!(f, "CPU #{cpu} already holds process {held}")
            }
            Self::CpuIdle { cpu } => write!(f, "CPU #{cpu} holds no process"),
            Self::HandleMismatch { cpu, held, given } => write!(
                f,
                "CPU #{cpu} holds process {held} but was asked to run process {given}"
            ),
        }
    }
}

impl std::error::Error for PreconditionViolation {}

/// Simulation error.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Construction input was rejected. Carries every detected problem.
    InvalidConfiguration(Vec<ValidationError>),
    /// An engine invariant was broken.
    PreconditionViolation(PreconditionViolation),
    /// A metric was requested before any process finished.
    EmptyResult,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(errors) => {
                write!(f, "invalid configuration")?;
                for (i, e) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{sep}{}", e.message)?;
                }
                Ok(())
            }
            Self::PreconditionViolation(v) => write!(f, "precondition violated: {v}"),
            Self::EmptyResult => write!(f, "no process has finished yet"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PreconditionViolation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<PreconditionViolation> for SimError {
    fn from(v: PreconditionViolation) -> Self {
        Self::PreconditionViolation(v)
    }
}

impl From<Vec<ValidationError>> for SimError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidConfiguration(errors)
    }
}
