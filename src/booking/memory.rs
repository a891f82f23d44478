//! In-memory kennel store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{AvailabilitySource, DogDirectory, Reservation, ReservationRequest, ReservationStore};
use crate::error::{AllocationError, AllocationResult};
use crate::models::{DogId, DogProfile, Run, StayWindow};

#[derive(Debug, Default)]
struct Ledger {
    next_id: u64,
    reservations: Vec<Reservation>,
}

/// Runs, dog profiles and a reservation ledger held in process.
///
/// The overlap check and the insert in [`reserve`](ReservationStore::reserve)
/// happen under one lock, so concurrent reservations of the same run for
/// overlapping windows have exactly one winner.
#[derive(Debug, Default)]
pub struct MemoryKennel {
    runs: Vec<Run>,
    dogs: HashMap<DogId, DogProfile>,
    ledger: Mutex<Ledger>,
}

impl MemoryKennel {
    /// Creates a kennel with the given runs and no dogs.
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// Registers a dog.
    pub fn with_dog(mut self, id: impl Into<String>, profile: DogProfile) -> Self {
        self.dogs.insert(DogId::new(id), profile);
        self
    }

    /// Snapshot of committed reservations.
    pub fn reservations(&self) -> AllocationResult<Vec<Reservation>> {
        Ok(self.ledger()?.reservations.clone())
    }

    /// Releases a reservation. Returns `false` if it did not exist.
    pub fn cancel(&self, id: u64) -> AllocationResult<bool> {
        let mut ledger = self.ledger()?;
        let before = ledger.reservations.len();
        ledger.reservations.retain(|r| r.id != id);
        Ok(ledger.reservations.len() != before)
    }

    fn ledger(&self) -> AllocationResult<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| AllocationError::Store("reservation ledger poisoned".into()))
    }
}

impl AvailabilitySource for MemoryKennel {
    fn free_runs(&self, window: &StayWindow) -> AllocationResult<Vec<Run>> {
        let ledger = self.ledger()?;
        Ok(self
            .runs
            .iter()
            .filter(|run| {
                !ledger
                    .reservations
                    .iter()
                    .any(|r| r.run == run.number && r.window.overlaps(window))
            })
            .cloned()
            .collect())
    }
}

impl DogDirectory for MemoryKennel {
    fn profile(&self, dog: &DogId) -> AllocationResult<DogProfile> {
        self.dogs
            .get(dog)
            .cloned()
            .ok_or_else(|| AllocationError::UnknownDog(dog.clone()))
    }
}

impl ReservationStore for MemoryKennel {
    fn reserve(&self, request: &ReservationRequest) -> AllocationResult<Reservation> {
        if !self.runs.iter().any(|r| r.number == request.run) {
            return Err(AllocationError::Store(format!(
                "unknown run {}",
                request.run
            )));
        }

        let mut ledger = self.ledger()?;
        let taken = ledger
            .reservations
            .iter()
            .any(|r| r.run == request.run && r.window.overlaps(&request.window));
        if taken {
            return Err(AllocationError::ReservationConflict {
                run: request.run.clone(),
            });
        }

        ledger.next_id += 1;
        let reservation = Reservation {
            id: ledger.next_id,
            run: request.run.clone(),
            dog: request.dog.clone(),
            window: request.window,
        };
        ledger.reservations.push(reservation.clone());
        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunType;
    use chrono::NaiveDate;

    fn window(from: u32, to: u32) -> StayWindow {
        StayWindow::new(
            NaiveDate::from_ymd_opt(2024, 7, from).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, to).unwrap(),
        )
    }

    fn kennel() -> MemoryKennel {
        MemoryKennel::new(vec![
            Run::parse("A1", RunType::Standard).unwrap(),
            Run::parse("A2", RunType::Suite).unwrap(),
        ])
        .with_dog("rex", DogProfile::new(55.0))
    }

    fn request(run: &str, dog: &str, w: StayWindow) -> ReservationRequest {
        ReservationRequest {
            run: run.parse().unwrap(),
            dog: DogId::new(dog),
            window: w,
        }
    }

    #[test]
    fn test_reserve_removes_from_availability() {
        let k = kennel();
        k.reserve(&request("A1", "rex", window(1, 5))).unwrap();

        let free = k.free_runs(&window(3, 4)).unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].number.as_str(), "A2");

        // Departure day is free again.
        assert_eq!(k.free_runs(&window(5, 8)).unwrap().len(), 2);
    }

    #[test]
    fn test_overlapping_reservation_conflicts() {
        let k = kennel();
        k.reserve(&request("A1", "rex", window(1, 5))).unwrap();
        let err = k.reserve(&request("A1", "fido", window(4, 9))).unwrap_err();
        assert!(matches!(err, AllocationError::ReservationConflict { .. }));

        assert!(k.reserve(&request("A1", "fido", window(5, 9))).is_ok());
        assert_eq!(k.reservations().unwrap().len(), 2);
    }

    #[test]
    fn test_cancel() {
        let k = kennel();
        let r = k.reserve(&request("A2", "rex", window(1, 5))).unwrap();
        assert!(k.cancel(r.id).unwrap());
        assert!(!k.cancel(r.id).unwrap());
        assert!(k.reserve(&request("A2", "fido", window(2, 3))).is_ok());
    }

    #[test]
    fn test_unknown_run_and_dog() {
        let k = kennel();
        assert!(matches!(
            k.reserve(&request("Z9", "rex", window(1, 2))),
            Err(AllocationError::Store(_))
        ));
        assert!(matches!(
            k.profile(&DogId::new("ghost")),
            Err(AllocationError::UnknownDog(_))
        ));
        assert!((k.profile(&DogId::new("rex")).unwrap().weight_lbs - 55.0).abs() < 1e-10);
    }

    #[test]
    fn test_concurrent_reservations_have_one_winner() {
        let k = kennel();
        let wins = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let k = &k;
                    s.spawn(move || {
                        k.reserve(&request("A1", &format!("dog{i}"), window(10, 12)))
                            .is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });
        assert_eq!(wins, 1);
    }
}
