//! Error taxonomy for allocation and booking.

use thiserror::Error;

use crate::models::{DogId, RunNumber};
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("no eligible run")]
    NoEligibleRun,

    #[error("reservation conflict on run {run}")]
    ReservationConflict { run: RunNumber },

    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("unknown dog: {0}")]
    UnknownDog(DogId),

    #[error("invalid run number: {0:?}")]
    InvalidRunNumber(String),

    #[error("unknown run type: {0}")]
    UnknownRunType(String),

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),
}

pub type AllocationResult<T> = Result<T, AllocationError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for AllocationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        AllocationError::InvalidInput(errors)
    }
}
