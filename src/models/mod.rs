//! Kennel domain models.
//!
//! Plain data consumed and produced by the allocator. Persistence of these
//! records belongs to the caller.
//!
//! # Domain Mappings
//!
//! | u-kennel | Scheduling analogue |
//! |----------|---------------------|
//! | Run | Resource |
//! | DogProfile | Task requirements |
//! | StayWindow | Time window |
//! | Allocation | Assignment decision |

mod dog;
mod run;
mod stay;

pub use dog::{DogId, DogProfile, DogTag};
pub use run::{Building, Run, RunNumber, RunType};
pub use stay::StayWindow;

use serde::{Deserialize, Serialize};

/// Outcome of one allocation decision.
///
/// `Unavailable` is an ordinary outcome: it must be shown to the operator,
/// never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allocation {
    /// The selected run.
    Assigned(RunNumber),
    /// No free run satisfies every applicable rule.
    Unavailable,
}

impl Allocation {
    /// The selected run, if any.
    pub fn run(&self) -> Option<&RunNumber> {
        match self {
            Allocation::Assigned(run) => Some(run),
            Allocation::Unavailable => None,
        }
    }

    #[inline]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Allocation::Unavailable)
    }
}
