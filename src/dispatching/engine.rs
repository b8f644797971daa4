//! Rule engine for multi-criteria dispatching.
//!
//! Applies rules in sequence: the next rule is consulted only when the
//! previous ones tie, and the final tie-breaker decides what is left.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Process;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep the input order (stable sort).
    #[default]
    Stable,
    /// Ascending process ID.
    ById,
}

/// A composable rule engine for process prioritization.
///
/// # Example
/// ```
/// use cpu_sched_sim::dispatching::{RuleEngine, TieBreaker};
/// use cpu_sched_sim::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Edf)
///     .with_rule(rules::Sjf)
///     .with_final_tie_breaker(TieBreaker::ById);
/// assert_eq!(engine.rule_names(), vec!["EDF", "SJF"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine. With no rules every process ties.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::Stable,
        }
    }

    /// Appends a rule to the evaluation chain.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Final tie-breaker.
    pub fn tie_breaker(&self) -> TieBreaker {
        self.tie_breaker
    }

    /// Sorts processes by priority (highest priority first).
    ///
    /// Returns indices into `processes`. The sort is stable, so with
    /// [`TieBreaker::Stable`] equal processes keep their input order.
    pub fn sort_indices(&self, processes: &[&Process], context: &SchedulingContext) -> Vec<usize> {
        let scores: Vec<Vec<RuleScore>> = processes
            .iter()
            .map(|p| self.evaluate(p, context))
            .collect();

        let mut indices: Vec<usize> = (0..processes.len()).collect();
        indices.sort_by(|&a, &b| {
            scores[a]
                .cmp(&scores[b])
                .then_with(|| self.break_tie(processes[a], processes[b]))
        });
        indices
    }

    /// Returns the index of the highest-priority process.
    pub fn select_best(
        &self,
        processes: &[&Process],
        context: &SchedulingContext,
    ) -> Option<usize> {
        self.sort_indices(processes, context).first().copied()
    }

    /// Evaluates a single process and returns the score of each rule.
    pub fn evaluate(&self, process: &Process, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|r| r.evaluate(process, context))
            .collect()
    }

    fn break_tie(&self, a: &Process, b: &Process) -> Ordering {
        match self.tie_breaker {
            TieBreaker::Stable => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
