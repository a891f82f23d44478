//! Exclusion rules and the run allocator.
//!
//! Allocation is a filter followed by a draw: every applicable
//! [`ExclusionRule`] removes runs from an independent copy of the free set,
//! and one survivor is picked uniformly at random.
//!
//! # Usage
//!
//! ```
//! use u_kennel::allocation::RunAllocator;
//! use u_kennel::models::{DogProfile, DogTag, Run, RunType};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let allocator = RunAllocator::standard();
//! let dog = DogProfile::new(20.0).with_tag(DogTag::NoUppers);
//! let free = vec![
//!     Run::parse("A1", RunType::Standard).unwrap(),
//!     Run::parse("A2", RunType::Upper).unwrap(),
//! ];
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let allocation = allocator.assign_with(&dog, &free, &mut rng).unwrap();
//! assert_eq!(allocation.run().unwrap().as_str(), "A1");
//! ```

mod engine;
mod report;
pub mod rules;

pub use engine::RunAllocator;
pub use report::{AllocationReport, Exclusion};

use crate::models::{DogProfile, Run};
use std::fmt::Debug;

/// A hard placement constraint derived from the dog's attributes.
///
/// A rule has two halves: a trigger ([`applies`](Self::applies)) that looks
/// only at the dog, and an exclusion test ([`excludes`](Self::excludes)) that
/// looks only at the run. A run is dropped if any applicable rule excludes it.
pub trait ExclusionRule: Send + Sync + Debug {
    /// Rule name (e.g., "DO_NOT_ENTER").
    fn name(&self) -> &'static str;

    /// Whether this rule constrains housing for the given dog.
    fn applies(&self, dog: &DogProfile) -> bool;

    /// Whether the run is ruled out when this rule applies.
    fn excludes(&self, run: &Run) -> bool;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
