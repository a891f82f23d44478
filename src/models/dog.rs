//! Dog profile model.
//!
//! The allocator only needs two facts about a dog: its weight and the
//! behavioral/request tags attached to it. Everything else about the dog
//! lives in the record store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{AllocationError, AllocationResult};

/// Dog identity in the record store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DogId(pub String);

impl DogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behavioral or request flag attached to a dog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DogTag {
    /// Staff must not enter the run; only building A supports this.
    DoNotEnter,
    ABKennelRequest,
    ABSuiteRequest,
    DKennelRequest,
    DSuiteRequest,
    CoveredRun,
    FenceClimber,
    NoUppers,
    EKennelRequest,
    Tall,
}

impl DogTag {
    pub const ALL: [DogTag; 10] = [
        DogTag::DoNotEnter,
        DogTag::ABKennelRequest,
        DogTag::ABSuiteRequest,
        DogTag::DKennelRequest,
        DogTag::DSuiteRequest,
        DogTag::CoveredRun,
        DogTag::FenceClimber,
        DogTag::NoUppers,
        DogTag::EKennelRequest,
        DogTag::Tall,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DogTag::DoNotEnter => "DoNotEnter",
            DogTag::ABKennelRequest => "ABKennelRequest",
            DogTag::ABSuiteRequest => "ABSuiteRequest",
            DogTag::DKennelRequest => "DKennelRequest",
            DogTag::DSuiteRequest => "DSuiteRequest",
            DogTag::CoveredRun => "CoveredRun",
            DogTag::FenceClimber => "FenceClimber",
            DogTag::NoUppers => "NoUppers",
            DogTag::EKennelRequest => "EKennelRequest",
            DogTag::Tall => "Tall",
        }
    }
}

impl FromStr for DogTag {
    type Err = AllocationError;

    /// Accepts the code form (`DoNotEnter`) as well as display labels
    /// (`Do not enter`, `do-not-enter`): case and non-alphanumerics are ignored.
    fn from_str(s: &str) -> AllocationResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        DogTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.code().eq_ignore_ascii_case(&key))
            .ok_or_else(|| AllocationError::UnknownTag(s.trim().to_string()))
    }
}

impl fmt::Display for DogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What the allocator knows about a dog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DogProfile {
    /// Weight in pounds.
    pub weight_lbs: f64,
    /// Behavioral/request tags. Missing means none.
    #[serde(default)]
    pub tags: BTreeSet<DogTag>,
}

impl DogProfile {
    /// Creates an untagged profile.
    pub fn new(weight_lbs: f64) -> Self {
        Self {
            weight_lbs,
            tags: BTreeSet::new(),
        }
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: DogTag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Adds several tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = DogTag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Builds a profile from stored tag labels.
    ///
    /// Labels outside the tag vocabulary (e.g. medication notes) do not affect
    /// housing and are skipped.
    pub fn from_labels<I, S>(weight_lbs: f64, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profile = Self::new(weight_lbs);
        for label in labels {
            match label.as_ref().parse::<DogTag>() {
                Ok(tag) => {
                    profile.tags.insert(tag);
                }
                Err(_) => debug!(label = label.as_ref(), "ignoring non-housing tag"),
            }
        }
        profile
    }

    #[inline]
    pub fn has(&self, tag: DogTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Whether any of the given tags is present.
    #[inline]
    pub fn has_any(&self, tags: &[DogTag]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}
