//! Run (housing enclosure) model.
//!
//! A run is identified by a building letter followed by a numeric suffix
//! (`A12`, `D3`). The leading letter groups runs into physical buildings.
//! Runs are immutable reference data for the duration of one allocation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{AllocationError, AllocationResult};

/// Building identifier: the upper-cased leading letter of a run number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char")]
pub struct Building(char);

impl Building {
    pub const A: Building = Building('A');
    pub const B: Building = Building('B');
    pub const D: Building = Building('D');
    pub const E: Building = Building('E');

    /// Creates a building from a letter. Returns `None` for non-letters.
    pub fn new(letter: char) -> Option<Self> {
        letter
            .is_ascii_alphabetic()
            .then(|| Building(letter.to_ascii_uppercase()))
    }
}

impl TryFrom<char> for Building {
    type Error = AllocationError;
    fn try_from(letter: char) -> AllocationResult<Self> {
        Building::new(letter).ok_or_else(|| AllocationError::InvalidRunNumber(letter.to_string()))
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Run identifier: building letter + numeric suffix.
///
/// The building letter is upper-cased and the digits are kept verbatim
/// (`a01` becomes `A01`); ordering is by building, then numeric suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunNumber {
    label: String,
    building: Building,
    number: u32,
}

impl RunNumber {
    /// Parses a run number, e.g. `"A12"`.
    pub fn parse(label: &str) -> AllocationResult<Self> {
        let label = label.trim();
        let mut chars = label.chars();
        let building = chars
            .next()
            .and_then(Building::new)
            .ok_or_else(|| AllocationError::InvalidRunNumber(label.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AllocationError::InvalidRunNumber(label.to_string()));
        }
        let number = digits
            .parse::<u32>()
            .map_err(|_| AllocationError::InvalidRunNumber(label.to_string()))?;
        Ok(Self {
            label: format!("{building}{digits}"),
            building,
            number,
        })
    }

    /// The building this run belongs to.
    #[inline]
    pub fn building(&self) -> Building {
        self.building
    }

    /// Numeric suffix.
    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl Ord for RunNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.building
            .cmp(&other.building)
            .then(self.number.cmp(&other.number))
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for RunNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for RunNumber {
    type Err = AllocationError;
    fn from_str(s: &str) -> AllocationResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RunNumber {
    type Error = AllocationError;
    fn try_from(s: String) -> AllocationResult<Self> {
        Self::parse(&s)
    }
}

impl From<RunNumber> for String {
    fn from(n: RunNumber) -> Self {
        n.label
    }
}

impl fmt::Display for RunNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Run category.
///
/// `Upper` and `Lower` are the stacked 4×4 small-dog enclosures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunType {
    Standard,
    Suite,
    Covered,
    Tall,
    Upper,
    Lower,
}

impl RunType {
    /// Whether this is one of the stacked small-dog enclosures.
    #[inline]
    pub fn is_small(&self) -> bool {
        matches!(self, RunType::Upper | RunType::Lower)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RunType::Standard => "Standard",
            RunType::Suite => "Suite",
            RunType::Covered => "Covered",
            RunType::Tall => "Tall",
            RunType::Upper => "Upper",
            RunType::Lower => "Lower",
        }
    }
}

impl FromStr for RunType {
    type Err = AllocationError;
    fn from_str(s: &str) -> AllocationResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(RunType::Standard),
            "suite" => Ok(RunType::Suite),
            "covered" => Ok(RunType::Covered),
            "tall" => Ok(RunType::Tall),
            "upper" => Ok(RunType::Upper),
            "lower" => Ok(RunType::Lower),
            other => Err(AllocationError::UnknownRunType(other.to_string())),
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A housing enclosure as returned by the availability lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Run {
    /// Run identifier.
    pub number: RunNumber,
    /// Run category.
    pub run_type: RunType,
}

impl Run {
    /// Creates a run from an already parsed number.
    pub fn new(number: RunNumber, run_type: RunType) -> Self {
        Self { number, run_type }
    }

    /// Parses a run from its textual number, e.g. `Run::parse("D4", RunType::Suite)`.
    pub fn parse(number: &str, run_type: RunType) -> AllocationResult<Self> {
        Ok(Self::new(RunNumber::parse(number)?, run_type))
    }

    #[inline]
    pub fn building(&self) -> Building {
        self.number.building()
    }

    /// Whether this run is in the given building.
    #[inline]
    pub fn in_building(&self, building: Building) -> bool {
        self.building() == building
    }

    /// Whether this run is a suite in building D.
    ///
    /// D-suites double as covered and tall-capable housing.
    #[inline]
    pub fn is_d_suite(&self) -> bool {
        self.run_type == RunType::Suite && self.in_building(Building::D)
    }
}
