//! Run allocator: rule pipeline plus random selection.
//!
//! # Algorithm
//!
//! 1. Copy the free set and order it by run number.
//! 2. Keep the rules whose trigger matches the dog.
//! 3. Drop every run that any kept rule excludes. Exclusion is final: the
//!    first excluding rule is recorded and later rules skip the run.
//! 4. Draw one survivor uniformly at random.
//!
//! # Complexity
//! O(r * n) where r=rules, n=free runs.

use std::sync::Arc;

use rand::prelude::IndexedRandom;
use rand::Rng;
use tracing::{debug, trace};

use super::rules::standard_rules;
use super::{AllocationReport, Exclusion, ExclusionRule};
use crate::config::AllocatorConfig;
use crate::error::AllocationResult;
use crate::models::{Allocation, DogProfile, Run};
use crate::validation::validate_request;

/// Stateless run allocator.
///
/// Holds an ordered list of exclusion rules and nothing else, so one
/// allocator can be shared across threads and called concurrently.
///
/// # Example
/// ```
/// use u_kennel::allocation::{RunAllocator, rules};
///
/// let allocator = RunAllocator::new()
///     .with_rule(rules::DoNotEnter)
///     .with_rule(rules::NoUppers);
/// assert_eq!(allocator.rule_names(), vec!["DO_NOT_ENTER", "NO_UPPERS"]);
/// ```
#[derive(Clone)]
pub struct RunAllocator {
    rules: Vec<Arc<dyn ExclusionRule>>,
}

impl RunAllocator {
    /// Creates an allocator with no rules (every free run is eligible).
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The eleven standard rules with default thresholds.
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(&AllocatorConfig::default()),
        }
    }

    /// The eleven standard rules with thresholds from `config`.
    ///
    /// Fails if the config is invalid: a NaN threshold would silently
    /// switch the weight rules off.
    pub fn with_config(config: &AllocatorConfig) -> AllocationResult<Self> {
        config.validate()?;
        Ok(Self {
            rules: standard_rules(config),
        })
    }

    /// Appends a rule at the lowest priority.
    pub fn with_rule<R: ExclusionRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Rule names in priority order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Filters `free_runs` for `dog` and reports why each run was dropped.
    ///
    /// Does not validate; `free_runs` is never modified.
    pub fn evaluate(&self, dog: &DogProfile, free_runs: &[Run]) -> AllocationReport {
        let mut candidates = free_runs.to_vec();
        candidates.sort_by(|a, b| a.number.cmp(&b.number));

        let active: Vec<&Arc<dyn ExclusionRule>> =
            self.rules.iter().filter(|r| r.applies(dog)).collect();

        let mut report = AllocationReport {
            applied_rules: active.iter().map(|r| r.name()).collect(),
            ..Default::default()
        };

        for run in candidates {
            match active.iter().find(|r| r.excludes(&run)) {
                Some(rule) => {
                    trace!(run = %run.number, rule = rule.name(), "run excluded");
                    report.exclusions.push(Exclusion {
                        run: run.number,
                        rule: rule.name(),
                    });
                }
                None => report.eligible.push(run),
            }
        }

        for rule in &active {
            let excluded = report.excluded_by(rule.name());
            if excluded > 0 {
                debug!(rule = rule.name(), excluded, "rule narrowed candidates");
            }
        }

        report
    }

    /// Eligible runs for `dog`, ordered by run number.
    pub fn eligible(&self, dog: &DogProfile, free_runs: &[Run]) -> Vec<Run> {
        self.evaluate(dog, free_runs).eligible
    }

    /// Selects one run for `dog` using the supplied random source.
    ///
    /// Empty availability is `Unavailable` without evaluating anything.
    /// Otherwise the inputs are validated, filtered, and one survivor is
    /// drawn uniformly. The same seed and inputs always give the same run,
    /// whatever order `free_runs` arrives in.
    pub fn assign_with<R: Rng + ?Sized>(
        &self,
        dog: &DogProfile,
        free_runs: &[Run],
        rng: &mut R,
    ) -> AllocationResult<Allocation> {
        if free_runs.is_empty() {
            debug!("no free runs");
            return Ok(Allocation::Unavailable);
        }
        validate_request(dog, free_runs)?;

        let report = self.evaluate(dog, free_runs);
        match report.eligible.choose(rng) {
            Some(run) => {
                debug!(
                    run = %run.number,
                    candidates = report.eligible.len(),
                    "run selected"
                );
                Ok(Allocation::Assigned(run.number.clone()))
            }
            None => {
                debug!(free = free_runs.len(), "no eligible run");
                Ok(Allocation::Unavailable)
            }
        }
    }

    /// Selects one run for `dog` using the thread-local random source.
    pub fn assign(&self, dog: &DogProfile, free_runs: &[Run]) -> AllocationResult<Allocation> {
        self.assign_with(dog, free_runs, &mut rand::rng())
    }
}

impl Default for RunAllocator {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RunAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunAllocator")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::rules;
    use crate::error::AllocationError;
    use crate::models::{Building, DogTag, RunNumber, RunType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn run(label: &str, run_type: RunType) -> Run {
        Run::parse(label, run_type).unwrap()
    }

    fn labels(runs: &[Run]) -> Vec<&str> {
        runs.iter().map(|r| r.number.as_str()).collect()
    }

    const TYPES: [RunType; 6] = [
        RunType::Standard,
        RunType::Suite,
        RunType::Covered,
        RunType::Tall,
        RunType::Upper,
        RunType::Lower,
    ];

    /// Every building × type combination, two of each.
    fn kennel() -> Vec<Run> {
        let mut runs = Vec::new();
        let mut n = 1;
        for building in ['A', 'B', 'C', 'D', 'E'] {
            for run_type in TYPES {
                for _ in 0..2 {
                    runs.push(run(&format!("{building}{n}"), run_type));
                    n += 1;
                }
            }
        }
        runs
    }

    fn random_dog(rng: &mut StdRng) -> DogProfile {
        let weight = rng.random_range(0.0..200.0);
        let tags = DogTag::ALL.iter().copied().filter(|_| rng.random_bool(0.2));
        DogProfile::new(weight).with_tags(tags)
    }

    fn random_subset(rng: &mut StdRng, runs: &[Run]) -> Vec<Run> {
        runs.iter()
            .filter(|_| rng.random_bool(0.5))
            .cloned()
            .collect()
    }

    #[test]
    fn test_scenario_no_uppers() {
        let dog = DogProfile::new(20.0).with_tag(DogTag::NoUppers);
        let free = vec![
            run("A1", RunType::Standard),
            run("A2", RunType::Upper),
            run("B1", RunType::Suite),
        ];
        let allocator = RunAllocator::standard();

        let report = allocator.evaluate(&dog, &free);
        assert_eq!(labels(&report.eligible), vec!["A1", "B1"]);
        assert_eq!(
            report.reason_for(&"A2".parse().unwrap()),
            Some("NO_UPPERS")
        );

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let a = allocator.assign_with(&dog, &free, &mut rng).unwrap();
            let picked = a.run().unwrap().as_str();
            assert!(picked == "A1" || picked == "B1");
        }
    }

    #[test]
    fn test_scenario_giant_dog_gets_d_suite() {
        let dog = DogProfile::new(140.0);
        let free = vec![run("D1", RunType::Suite), run("A1", RunType::Standard)];
        let allocator = RunAllocator::standard();

        assert_eq!(labels(&allocator.eligible(&dog, &free)), vec!["D1"]);
        let a = allocator.assign(&dog, &free).unwrap();
        assert_eq!(a, Allocation::Assigned("D1".parse().unwrap()));
    }

    #[test]
    fn test_scenario_e_request_without_e_runs() {
        let dog = DogProfile::new(200.0).with_tag(DogTag::EKennelRequest);
        let free = vec![run("A1", RunType::Standard)];
        let a = RunAllocator::standard().assign(&dog, &free).unwrap();
        assert!(a.is_unavailable());
    }

    #[test]
    fn test_heavy_e_request_has_no_home() {
        // Rule 2 removes E, rule 9 keeps only E.
        let dog = DogProfile::new(120.0).with_tag(DogTag::EKennelRequest);
        let report = RunAllocator::standard().evaluate(&dog, &kennel());
        assert!(report.is_empty());
        assert!(report.excluded_by("HEAVY_BUILDING_BAN") > 0);
        assert!(report.excluded_by("E_KENNEL") > 0);
    }

    #[test]
    fn test_ab_suite_request() {
        let dog = DogProfile::new(40.0).with_tag(DogTag::ABSuiteRequest);
        let eligible = RunAllocator::standard().eligible(&dog, &kennel());
        assert!(!eligible.is_empty());
        for r in &eligible {
            assert_eq!(r.run_type, RunType::Suite);
            assert!(r.in_building(Building::A) || r.in_building(Building::B));
        }
        assert_eq!(eligible.len(), 4);
    }

    #[test]
    fn test_d_suite_request() {
        let dog = DogProfile::new(40.0).with_tag(DogTag::DSuiteRequest);
        let eligible = RunAllocator::standard().eligible(&dog, &kennel());
        assert_eq!(eligible.len(), 2);
        assert!(eligible.iter().all(|r| r.is_d_suite()));
    }

    #[test]
    fn test_fence_climber() {
        let dog = DogProfile::new(40.0).with_tag(DogTag::FenceClimber);
        let eligible = RunAllocator::standard().eligible(&dog, &kennel());
        // Covered runs in five buildings + the two D-suites.
        assert_eq!(eligible.len(), 12);
        assert!(eligible
            .iter()
            .all(|r| r.run_type == RunType::Covered || r.is_d_suite()));
    }

    #[test]
    fn test_small_dog_may_use_uppers_and_lowers() {
        let dog = DogProfile::new(12.0);
        let eligible = RunAllocator::standard().eligible(&dog, &kennel());
        assert_eq!(eligible.len(), kennel().len());
    }

    #[test]
    fn test_empty_availability_is_unavailable() {
        let allocator = RunAllocator::standard();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let dog = random_dog(&mut rng);
            let a = allocator.assign_with(&dog, &[], &mut rng).unwrap();
            assert!(a.is_unavailable());
        }
    }

    #[test]
    fn test_invalid_input_rejected() {
        let allocator = RunAllocator::standard();
        let free = vec![run("A1", RunType::Standard)];
        let err = allocator.assign(&DogProfile::new(-3.0), &free).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidInput(_)));

        let dup = vec![run("A1", RunType::Standard), run("A1", RunType::Suite)];
        let err = allocator.assign(&DogProfile::new(30.0), &dup).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidInput(_)));
    }

    #[test]
    fn test_do_not_enter_property() {
        let allocator = RunAllocator::standard();
        let all = kennel();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let dog = random_dog(&mut rng).with_tag(DogTag::DoNotEnter);
            let free = random_subset(&mut rng, &all);
            if let Allocation::Assigned(picked) =
                allocator.assign_with(&dog, &free, &mut rng).unwrap()
            {
                assert_eq!(picked.building(), Building::A);
            }
        }
    }

    #[test]
    fn test_giant_dog_property() {
        let allocator = RunAllocator::standard();
        let all = kennel();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let dog = DogProfile::new(rng.random_range(130.5..250.0));
            let free = random_subset(&mut rng, &all);
            let tall_capable: Vec<&Run> = free
                .iter()
                .filter(|r| {
                    (r.run_type == RunType::Tall || r.is_d_suite())
                        && !r.in_building(Building::E)
                })
                .collect();
            let a = allocator.assign_with(&dog, &free, &mut rng).unwrap();
            match a {
                Allocation::Assigned(picked) => {
                    assert!(tall_capable.iter().any(|r| r.number == picked));
                }
                Allocation::Unavailable => assert!(tall_capable.is_empty()),
            }
        }
    }

    #[test]
    fn test_filtering_is_idempotent_and_order_independent() {
        let allocator = RunAllocator::standard();
        let all = kennel();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let dog = random_dog(&mut rng);
            let free = random_subset(&mut rng, &all);
            let first = allocator.eligible(&dog, &free);
            let second = allocator.eligible(&dog, &free);
            assert_eq!(first, second);

            let mut reversed = free.clone();
            reversed.reverse();
            assert_eq!(allocator.eligible(&dog, &reversed), first);
        }
    }

    #[test]
    fn test_adding_a_run_never_removes_candidates() {
        let allocator = RunAllocator::standard();
        let all = kennel();
        let mut rng = StdRng::seed_from_u64(19);
        for _ in 0..200 {
            let dog = random_dog(&mut rng);
            let mut free = random_subset(&mut rng, &all);
            let before: BTreeSet<RunNumber> = allocator
                .eligible(&dog, &free)
                .into_iter()
                .map(|r| r.number)
                .collect();

            if let Some(extra) = all.iter().find(|r| !free.contains(r)) {
                free.push(extra.clone());
            }
            let after: BTreeSet<RunNumber> = allocator
                .eligible(&dog, &free)
                .into_iter()
                .map(|r| r.number)
                .collect();
            assert!(before.is_subset(&after));
        }
    }

    #[test]
    fn test_result_is_subset_of_availability() {
        let allocator = RunAllocator::standard();
        let all = kennel();
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..100 {
            let dog = random_dog(&mut rng);
            let free = random_subset(&mut rng, &all);
            let report = allocator.evaluate(&dog, &free);
            assert_eq!(report.eligible.len() + report.exclusions.len(), free.len());
            assert!(report.eligible.iter().all(|r| free.contains(r)));
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let free = vec![run("B2", RunType::Upper), run("A1", RunType::Standard)];
        let snapshot = free.clone();
        let dog = DogProfile::new(30.0);
        let _ = RunAllocator::standard().evaluate(&dog, &free);
        assert_eq!(free, snapshot);
    }

    #[test]
    fn test_seeded_draw_is_reproducible() {
        let allocator = RunAllocator::standard();
        let dog = DogProfile::new(50.0);
        let free: Vec<Run> = (1..=8).map(|n| run(&format!("A{n}"), RunType::Standard)).collect();
        let mut reversed = free.clone();
        reversed.reverse();

        let a = allocator
            .assign_with(&dog, &free, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = allocator
            .assign_with(&dog, &reversed, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_covers_all_ties() {
        let allocator = RunAllocator::standard();
        let dog = DogProfile::new(50.0);
        let free: Vec<Run> = (1..=4).map(|n| run(&format!("B{n}"), RunType::Standard)).collect();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = BTreeSet::new();
        for _ in 0..400 {
            if let Allocation::Assigned(r) = allocator.assign_with(&dog, &free, &mut rng).unwrap() {
                seen.insert(r);
            }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_with_config_rejects_invalid_thresholds() {
        let nan = AllocatorConfig {
            heavy_weight_lbs: f64::NAN,
            giant_weight_lbs: f64::NAN,
            ..AllocatorConfig::default()
        };
        assert!(matches!(
            RunAllocator::with_config(&nan),
            Err(AllocationError::Config(_))
        ));

        let negative = AllocatorConfig {
            small_run_max_lbs: -1.0,
            ..AllocatorConfig::default()
        };
        assert!(matches!(
            RunAllocator::with_config(&negative),
            Err(AllocationError::Config(_))
        ));
    }

    #[test]
    fn test_with_config_keeps_heavy_dogs_out_of_e() {
        let config = AllocatorConfig {
            heavy_weight_lbs: 80.0,
            ..AllocatorConfig::default()
        };
        let allocator = RunAllocator::with_config(&config).unwrap();
        let dog = DogProfile::new(90.0);
        let free = vec![run("E1", RunType::Standard)];
        assert!(allocator.assign(&dog, &free).unwrap().is_unavailable());
        assert!(!RunAllocator::standard()
            .assign(&dog, &free)
            .unwrap()
            .is_unavailable());
    }

    #[test]
    fn test_custom_pipeline() {
        let allocator = RunAllocator::new().with_rule(rules::NoUppers);
        let dog = DogProfile::new(200.0).with_tag(DogTag::NoUppers);
        let free = vec![run("E1", RunType::Standard), run("E2", RunType::Upper)];
        assert_eq!(labels(&allocator.eligible(&dog, &free)), vec!["E1"]);
        assert!(format!("{allocator:?}").contains("NO_UPPERS"));
    }

    #[test]
    fn test_exclusion_is_recorded_once() {
        // A2 is both an upper and outside building A for a do-not-enter dog;
        // only the first rule in priority order is recorded.
        let dog = DogProfile::new(30.0)
            .with_tag(DogTag::DoNotEnter)
            .with_tag(DogTag::NoUppers);
        let free = vec![run("B2", RunType::Upper), run("A1", RunType::Standard)];
        let report = RunAllocator::standard().evaluate(&dog, &free);
        assert_eq!(report.exclusions.len(), 1);
        assert_eq!(report.exclusions[0].rule, "DO_NOT_ENTER");
        assert_eq!(
            report.applied_rules,
            vec!["DO_NOT_ENTER", "NO_UPPERS", "NO_SMALL_RUNS"]
        );
    }
}
