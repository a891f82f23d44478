//! Per-run trace of one filtering pass.

use serde::Serialize;

use crate::models::{Run, RunNumber};

/// A run removed from the candidate set, with the first rule that removed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub run: RunNumber,
    pub rule: &'static str,
}

/// Result of filtering without the random draw.
///
/// `eligible` is ordered by run number; `eligible` and the excluded runs
/// together are exactly the input availability set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AllocationReport {
    /// Runs that survived every applicable rule.
    pub eligible: Vec<Run>,
    /// Runs removed, in run-number order.
    pub exclusions: Vec<Exclusion>,
    /// Names of the rules that applied to the dog, in priority order.
    pub applied_rules: Vec<&'static str>,
}

impl AllocationReport {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    /// Number of runs the named rule removed.
    pub fn excluded_by(&self, rule: &str) -> usize {
        self.exclusions.iter().filter(|e| e.rule == rule).count()
    }

    /// The rule that removed `run`, if it was removed.
    pub fn reason_for(&self, run: &RunNumber) -> Option<&'static str> {
        self.exclusions
            .iter()
            .find(|e| &e.run == run)
            .map(|e| e.rule)
    }
}
