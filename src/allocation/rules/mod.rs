//! Built-in exclusion rules.
//!
//! # Categories
//!
//! - **Building**: DO_NOT_ENTER, HEAVY_BUILDING_BAN, AB_KENNEL, D_KENNEL, E_KENNEL
//! - **Run type**: AB_SUITE, D_SUITE, COVERED, NO_UPPERS, TALL, NO_SMALL_RUNS
//!
//! # Priority
//! [`standard_rules`] returns the rules in their fixed priority order. The
//! order matters only for reporting (the first excluding rule is recorded);
//! the eligible set is the same in any order.

use std::sync::Arc;

use super::ExclusionRule;
use crate::config::AllocatorConfig;
use crate::models::{Building, DogProfile, DogTag, Run, RunType};

/// The standard pipeline in priority order.
pub fn standard_rules(config: &AllocatorConfig) -> Vec<Arc<dyn ExclusionRule>> {
    vec![
        Arc::new(DoNotEnter),
        Arc::new(HeavyBuildingBan {
            max_weight_lbs: config.heavy_weight_lbs,
            building: config.heavy_excluded_building,
        }),
        Arc::new(AbKennel),
        Arc::new(AbSuite),
        Arc::new(DKennel),
        Arc::new(DSuite),
        Arc::new(Covered),
        Arc::new(NoUppers),
        Arc::new(EKennel),
        Arc::new(TallHousing {
            giant_weight_lbs: config.giant_weight_lbs,
        }),
        Arc::new(NoSmallRuns {
            max_weight_lbs: config.small_run_max_lbs,
        }),
    ]
}

// ======================== Building rules ========================

/// Dogs staff must not enter are housed in building A only.
#[derive(Debug, Clone, Copy)]
pub struct DoNotEnter;

impl ExclusionRule for DoNotEnter {
    fn name(&self) -> &'static str {
        "DO_NOT_ENTER"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has(DogTag::DoNotEnter)
    }

    fn excludes(&self, run: &Run) -> bool {
        !run.in_building(Building::A)
    }

    fn description(&self) -> &'static str {
        "Do-not-enter dogs only in building A"
    }
}

/// Keeps heavy dogs out of one building (E by default).
#[derive(Debug, Clone, Copy)]
pub struct HeavyBuildingBan {
    /// Weight above which the rule applies.
    pub max_weight_lbs: f64,
    /// Building the dog is kept out of.
    pub building: Building,
}

impl Default for HeavyBuildingBan {
    fn default() -> Self {
        Self {
            max_weight_lbs: 100.0,
            building: Building::E,
        }
    }
}

impl ExclusionRule for HeavyBuildingBan {
    fn name(&self) -> &'static str {
        "HEAVY_BUILDING_BAN"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.weight_lbs > self.max_weight_lbs
    }

    fn excludes(&self, run: &Run) -> bool {
        run.in_building(self.building)
    }

    fn description(&self) -> &'static str {
        "Heavy dogs kept out of one building"
    }
}

/// Kennel or suite request for buildings A/B.
#[derive(Debug, Clone, Copy)]
pub struct AbKennel;

impl ExclusionRule for AbKennel {
    fn name(&self) -> &'static str {
        "AB_KENNEL"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has_any(&[DogTag::ABKennelRequest, DogTag::ABSuiteRequest])
    }

    fn excludes(&self, run: &Run) -> bool {
        !run.in_building(Building::A) && !run.in_building(Building::B)
    }

    fn description(&self) -> &'static str {
        "A/B request: only buildings A and B"
    }
}

/// Kennel or suite request for building D.
#[derive(Debug, Clone, Copy)]
pub struct DKennel;

impl ExclusionRule for DKennel {
    fn name(&self) -> &'static str {
        "D_KENNEL"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has_any(&[DogTag::DKennelRequest, DogTag::DSuiteRequest])
    }

    fn excludes(&self, run: &Run) -> bool {
        !run.in_building(Building::D)
    }

    fn description(&self) -> &'static str {
        "D request: only building D"
    }
}

/// Kennel request for building E.
#[derive(Debug, Clone, Copy)]
pub struct EKennel;

impl ExclusionRule for EKennel {
    fn name(&self) -> &'static str {
        "E_KENNEL"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has(DogTag::EKennelRequest)
    }

    fn excludes(&self, run: &Run) -> bool {
        !run.in_building(Building::E)
    }

    fn description(&self) -> &'static str {
        "E request: only building E"
    }
}

// ======================== Run type rules ========================

/// Suite request in A/B. Paired with [`AbKennel`] for the building half.
#[derive(Debug, Clone, Copy)]
pub struct AbSuite;

impl ExclusionRule for AbSuite {
    fn name(&self) -> &'static str {
        "AB_SUITE"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has(DogTag::ABSuiteRequest)
    }

    fn excludes(&self, run: &Run) -> bool {
        run.run_type != RunType::Suite
    }

    fn description(&self) -> &'static str {
        "A/B suite request: suites only"
    }
}

/// Suite request in D. Paired with [`DKennel`] for the building half.
#[derive(Debug, Clone, Copy)]
pub struct DSuite;

impl ExclusionRule for DSuite {
    fn name(&self) -> &'static str {
        "D_SUITE"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has(DogTag::DSuiteRequest)
    }

    fn excludes(&self, run: &Run) -> bool {
        run.run_type != RunType::Suite
    }

    fn description(&self) -> &'static str {
        "D suite request: suites only"
    }
}

/// Fence climbers and covered-run requests need a roof: covered runs or D-suites.
#[derive(Debug, Clone, Copy)]
pub struct Covered;

impl ExclusionRule for Covered {
    fn name(&self) -> &'static str {
        "COVERED"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has_any(&[DogTag::CoveredRun, DogTag::FenceClimber])
    }

    fn excludes(&self, run: &Run) -> bool {
        run.run_type != RunType::Covered && !run.is_d_suite()
    }

    fn description(&self) -> &'static str {
        "Covered runs or D-suites only"
    }
}

/// No upper (stacked) enclosures.
#[derive(Debug, Clone, Copy)]
pub struct NoUppers;

impl ExclusionRule for NoUppers {
    fn name(&self) -> &'static str {
        "NO_UPPERS"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has(DogTag::NoUppers)
    }

    fn excludes(&self, run: &Run) -> bool {
        run.run_type == RunType::Upper
    }

    fn description(&self) -> &'static str {
        "No upper enclosures"
    }
}

/// Tall dogs, or dogs above the giant threshold: tall runs or D-suites.
#[derive(Debug, Clone, Copy)]
pub struct TallHousing {
    /// Weight above which tall housing is required regardless of tags.
    pub giant_weight_lbs: f64,
}

impl Default for TallHousing {
    fn default() -> Self {
        Self {
            giant_weight_lbs: 130.0,
        }
    }
}

impl ExclusionRule for TallHousing {
    fn name(&self) -> &'static str {
        "TALL"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.has(DogTag::Tall) || dog.weight_lbs > self.giant_weight_lbs
    }

    fn excludes(&self, run: &Run) -> bool {
        run.run_type != RunType::Tall && !run.is_d_suite()
    }

    fn description(&self) -> &'static str {
        "Tall runs or D-suites only"
    }
}

/// Keeps dogs above the small-run limit out of the 4×4 upper/lower enclosures.
#[derive(Debug, Clone, Copy)]
pub struct NoSmallRuns {
    /// Heaviest weight that still fits a 4×4 enclosure.
    pub max_weight_lbs: f64,
}

impl Default for NoSmallRuns {
    fn default() -> Self {
        Self {
            max_weight_lbs: 15.0,
        }
    }
}

impl ExclusionRule for NoSmallRuns {
    fn name(&self) -> &'static str {
        "NO_SMALL_RUNS"
    }

    fn applies(&self, dog: &DogProfile) -> bool {
        dog.weight_lbs > self.max_weight_lbs
    }

    fn excludes(&self, run: &Run) -> bool {
        run.run_type.is_small()
    }

    fn description(&self) -> &'static str {
        "No 4x4 enclosures above the small-dog weight"
    }
}
