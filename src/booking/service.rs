//! Allocate-then-reserve loop.
//!
//! # Algorithm
//!
//! 1. Validate the stay window and look up the dog's profile.
//! 2. Query availability for the window.
//! 3. Run the allocator. `Unavailable` ends the request with `NoEligibleRun`.
//! 4. Reserve the chosen run. On `ReservationConflict` go back to 2 with a
//!    fresh availability set, up to `max_attempts` times.

use rand::Rng;
use tracing::{info, instrument, warn};

use super::{KennelStore, Reservation, ReservationRequest};
use crate::allocation::{AllocationReport, RunAllocator};
use crate::config::BookingConfig;
use crate::error::{AllocationError, AllocationResult};
use crate::models::{Allocation, DogId, StayWindow};
use crate::validation::{validate_profile, validate_window};

/// Books a run for a dog's stay against a [`KennelStore`].
#[derive(Debug, Clone)]
pub struct Booker {
    allocator: RunAllocator,
    config: BookingConfig,
}

impl Booker {
    /// Creates a booker. Fails if the config is invalid.
    pub fn new(allocator: RunAllocator, config: BookingConfig) -> AllocationResult<Self> {
        config.validate()?;
        Ok(Self { allocator, config })
    }

    /// Filters current availability for `dog` without reserving anything.
    pub fn preview<S: KennelStore + ?Sized>(
        &self,
        store: &S,
        dog: &DogId,
        window: &StayWindow,
    ) -> AllocationResult<AllocationReport> {
        validate_window(window)?;
        let profile = store.profile(dog)?;
        validate_profile(&profile)?;
        let free = store.free_runs(window)?;
        Ok(self.allocator.evaluate(&profile, &free))
    }

    /// Selects and reserves a run for `dog` over `window`.
    ///
    /// `NoEligibleRun` is returned as soon as the filtered set is empty.
    /// A lost reservation race triggers a full re-run against fresh
    /// availability; when the attempt budget is spent the last conflict is
    /// returned.
    #[instrument(skip(self, store, dog, window, rng), fields(dog = %dog, window = %window))]
    pub fn book<S: KennelStore + ?Sized, R: Rng + ?Sized>(
        &self,
        store: &S,
        dog: &DogId,
        window: &StayWindow,
        rng: &mut R,
    ) -> AllocationResult<Reservation> {
        validate_window(window)?;
        let profile = store.profile(dog)?;

        let mut last_conflict = None;
        for attempt in 1..=self.config.max_attempts {
            let free = store.free_runs(window)?;
            let run = match self.allocator.assign_with(&profile, &free, &mut *rng)? {
                Allocation::Assigned(run) => run,
                Allocation::Unavailable => return Err(AllocationError::NoEligibleRun),
            };

            let request = ReservationRequest {
                run,
                dog: dog.clone(),
                window: *window,
            };
            match store.reserve(&request) {
                Ok(reservation) => {
                    info!(run = %reservation.run, attempt, "run reserved");
                    return Ok(reservation);
                }
                Err(AllocationError::ReservationConflict { run }) => {
                    warn!(run = %run, attempt, "reservation lost to a concurrent booking");
                    last_conflict = Some(run);
                }
                Err(e) => return Err(e),
            }
        }

        Err(match last_conflict {
            Some(run) => AllocationError::ReservationConflict { run },
            None => AllocationError::NoEligibleRun,
        })
    }
}

impl Default for Booker {
    fn default() -> Self {
        Self {
            allocator: RunAllocator::standard(),
            config: BookingConfig::default(),
        }
    }
}
