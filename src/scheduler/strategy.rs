//! Scheduling strategies.
//!
//! A strategy is plain data: it names a dispatching rule and the allocation
//! policy (non-preemptive, preemptive, or round-robin) the engine applies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dispatching::{rules, RuleEngine, TieBreaker};

/// How the engine reacts to running processes each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationPolicy {
    /// Allocated processes run to completion.
    NonPreemptive,
    /// Incumbents compete with ready processes every cycle.
    Preemptive,
    /// FIFO rotation on a single CPU, gated by a quantum.
    RoundRobin { quantum: u64 },
}

/// A scheduling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Strategy {
    /// First Come First Served (non-preemptive).
    NpFcfs,
    /// Shortest Job First (non-preemptive).
    NpSjf,
    /// Earliest Deadline First (non-preemptive).
    NpEdf,
    /// Least Laxity First (non-preemptive, static laxity).
    NpLlf,
    /// Shortest Job First (preemptive, remaining time).
    PSjf,
    /// Earliest Deadline First (preemptive).
    PEdf,
    /// Least Laxity First (preemptive, dynamic laxity).
    PLlf,
    /// Round Robin on a single CPU.
    RoundRobin { quantum: u64 },
}

impl Strategy {
    /// Every strategy, with round-robin using the given quantum.
    pub fn all(quantum: u64) -> [Strategy; 8] {
        [
            Strategy::NpFcfs,
            Strategy::NpSjf,
            Strategy::NpEdf,
            Strategy::NpLlf,
            Strategy::PSjf,
            Strategy::PEdf,
            Strategy::PLlf,
            Strategy::RoundRobin { quantum },
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::NpFcfs => "First Come First Serve (nonpreemptive)",
            Strategy::NpSjf => "Shortest Job First (nonpreemptive)",
            Strategy::NpEdf => "Earliest Deadline First (nonpreemptive)",
            Strategy::NpLlf => "Least Laxity First (nonpreemptive)",
            Strategy::PSjf => "Shortest Job First (preemptive)",
            Strategy::PEdf => "Earliest Deadline First (preemptive)",
            Strategy::PLlf => "Least Laxity First (preemptive)",
            Strategy::RoundRobin { .. } => "Round Robin (preemptive)",
        }
    }

    /// Short, parseable name (see [`FromStr`]).
    pub fn short_name(&self) -> &'static str {
        match self {
            Strategy::NpFcfs => "np-fcfs",
            Strategy::NpSjf => "np-sjf",
            Strategy::NpEdf => "np-edf",
            Strategy::NpLlf => "np-llf",
            Strategy::PSjf => "p-sjf",
            Strategy::PEdf => "p-edf",
            Strategy::PLlf => "p-llf",
            Strategy::RoundRobin { .. } => "rr",
        }
    }

    /// Allocation policy of the strategy.
    pub fn policy(&self) -> AllocationPolicy {
        match *self {
            Strategy::NpFcfs | Strategy::NpSjf | Strategy::NpEdf | Strategy::NpLlf => {
                AllocationPolicy::NonPreemptive
            }
            Strategy::PSjf | Strategy::PEdf | Strategy::PLlf => AllocationPolicy::Preemptive,
            Strategy::RoundRobin { quantum } => AllocationPolicy::RoundRobin { quantum },
        }
    }

    /// Whether running processes can lose their CPU before finishing.
    pub fn is_preemptive(&self) -> bool {
        !matches!(self.policy(), AllocationPolicy::NonPreemptive)
    }

    /// Whether the strategy ranks by deadline.
    pub fn uses_deadlines(&self) -> bool {
        matches!(
            self,
            Strategy::NpEdf | Strategy::NpLlf | Strategy::PEdf | Strategy::PLlf
        )
    }

    /// Rule engine ordering candidates for this strategy.
    ///
    /// FCFS and round-robin keep queue order; every other strategy breaks
    /// ties by ascending process id.
    pub fn rule_engine(&self) -> RuleEngine {
        let engine = RuleEngine::new();
        match self {
            Strategy::NpFcfs | Strategy::RoundRobin { .. } => engine
                .with_rule(rules::Fcfs)
                .with_final_tie_breaker(TieBreaker::Stable),
            Strategy::NpSjf => engine
                .with_rule(rules::Sjf)
                .with_final_tie_breaker(TieBreaker::ById),
            Strategy::PSjf => engine
                .with_rule(rules::Srt)
                .with_final_tie_breaker(TieBreaker::ById),
            Strategy::NpEdf | Strategy::PEdf => {
                engine.with_rule(rules::Edf).with_final_tie_breaker(TieBreaker::ById)
            }
            Strategy::NpLlf => engine
                .with_rule(rules::StaticLlf)
                .with_final_tie_breaker(TieBreaker::ById),
            Strategy::PLlf => engine
                .with_rule(rules::DynamicLlf)
                .with_final_tie_breaker(TieBreaker::ById),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::RoundRobin { quantum } => write!(f, "{}, quantum {quantum}", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// A strategy name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scheduling strategy '{}'", self.0)
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    /// Parses a short name. Round-robin takes its quantum after a colon,
    /// e.g. `rr:3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let strategy = match lower.as_str() {
            "np-fcfs" | "fcfs" => Strategy::NpFcfs,
            "np-sjf" | "sjf" => Strategy::NpSjf,
            "np-edf" | "edf" => Strategy::NpEdf,
            "np-llf" | "llf" => Strategy::NpLlf,
            "p-sjf" | "srt" => Strategy::PSjf,
            "p-edf" => Strategy::PEdf,
            "p-llf" => Strategy::PLlf,
            other => {
                let quantum = other
                    .strip_prefix("rr:")
                    .or_else(|| other.strip_prefix("round-robin:"))
                    .and_then(|q| q.parse::<u64>().ok())
                    .ok_or_else(|| ParseStrategyError(s.to_string()))?;
                Strategy::RoundRobin { quantum }
            }
        };
        Ok(strategy)
    }
}
