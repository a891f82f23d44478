//! Stay window model.
//!
//! A stay occupies the nights `[arrive, depart)`: the departure day is free
//! for another arrival. A same-day stay (`arrive == depart`) still occupies
//! the arrival day.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested stay date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayWindow {
    /// Arrival date (inclusive).
    pub arrive: NaiveDate,
    /// Departure date.
    pub depart: NaiveDate,
}

impl StayWindow {
    /// Creates a window. Not validated; see [`crate::validation::validate_window`].
    pub fn new(arrive: NaiveDate, depart: NaiveDate) -> Self {
        Self { arrive, depart }
    }

    /// Whether departure precedes arrival.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.depart < self.arrive
    }

    /// Number of nights (0 for a same-day stay).
    pub fn nights(&self) -> i64 {
        (self.depart - self.arrive).num_days().max(0)
    }

    /// Exclusive end of the occupied span.
    fn occupied_end(&self) -> NaiveDate {
        if self.depart > self.arrive {
            self.depart
        } else {
            self.arrive.checked_add_days(Days::new(1)).unwrap_or(self.arrive)
        }
    }

    /// Whether two stays need the same run on at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.arrive < other.occupied_end() && other.arrive < self.occupied_end()
    }

    /// Whether the stay occupies the given date.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.arrive && date < self.occupied_end()
    }
}

impl fmt::Display for StayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.arrive, self.depart)
    }
}
