//! Booking boundary around the allocator.
//!
//! The allocator is pure; reading availability and committing the chosen
//! run happen here, through narrow collaborator traits. Between the read and
//! the commit another request may take the same run, so a
//! [`ReservationStore`] must let at most one overlapping reservation per run
//! succeed and report the loser as
//! [`AllocationError::ReservationConflict`](crate::error::AllocationError::ReservationConflict).
//! [`Booker`] reacts to that by re-querying availability and re-running the
//! whole rule pipeline.
//!
//! [`MemoryKennel`] is an in-process implementation of all three traits.

mod memory;
mod service;

pub use memory::MemoryKennel;
pub use service::Booker;

use serde::{Deserialize, Serialize};

use crate::error::AllocationResult;
use crate::models::{DogId, DogProfile, Run, RunNumber, StayWindow};

/// Availability lookup.
pub trait AvailabilitySource {
    /// Runs with no reservation overlapping `window`.
    fn free_runs(&self, window: &StayWindow) -> AllocationResult<Vec<Run>>;
}

/// Dog attribute lookup.
pub trait DogDirectory {
    /// Weight and tags for `dog`. Fails with `UnknownDog` if absent.
    fn profile(&self, dog: &DogId) -> AllocationResult<DogProfile>;
}

/// Durable reservation of a chosen run.
pub trait ReservationStore {
    /// Records the reservation, or fails with `ReservationConflict` if an
    /// overlapping reservation for the same run is already committed.
    fn reserve(&self, request: &ReservationRequest) -> AllocationResult<Reservation>;
}

/// Everything [`Booker`] needs from the persistence side.
pub trait KennelStore: AvailabilitySource + DogDirectory + ReservationStore {}

impl<T: AvailabilitySource + DogDirectory + ReservationStore + ?Sized> KennelStore for T {}

/// A run reservation to be committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub run: RunNumber,
    pub dog: DogId,
    pub window: StayWindow,
}

/// A committed reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Store-assigned identifier.
    pub id: u64,
    pub run: RunNumber,
    pub dog: DogId,
    pub window: StayWindow,
}
