//! Input validation for allocation requests.
//!
//! Checks structural integrity of the dog profile, the stay window and the
//! availability set before any rule is evaluated. Detects:
//! - Negative or non-finite weights
//! - Departure before arrival
//! - The same run listed twice in one availability set
//!
//! All problems are collected, not just the first one.

use std::collections::HashSet;

use crate::models::{DogProfile, Run, StayWindow};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Weight is negative, NaN or infinite.
    InvalidWeight,
    /// Departure date precedes arrival date.
    InvertedWindow,
    /// A run appears more than once in the availability set.
    DuplicateRun,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a dog profile.
pub fn validate_profile(dog: &DogProfile) -> ValidationResult {
    let mut errors = Vec::new();
    check_profile(dog, &mut errors);
    into_result(errors)
}

/// Validates a stay window.
pub fn validate_window(window: &StayWindow) -> ValidationResult {
    let mut errors = Vec::new();
    check_window(window, &mut errors);
    into_result(errors)
}

/// Validates the inputs of one allocation call.
///
/// Checks:
/// 1. Weight is a finite, non-negative number
/// 2. No run number appears twice in `free_runs`
pub fn validate_request(dog: &DogProfile, free_runs: &[Run]) -> ValidationResult {
    let mut errors = Vec::new();
    check_profile(dog, &mut errors);

    let mut seen = HashSet::new();
    for run in free_runs {
        if !seen.insert(&run.number) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRun,
                format!("Duplicate run in availability: {}", run.number),
            ));
        }
    }

    into_result(errors)
}

fn check_profile(dog: &DogProfile, errors: &mut Vec<ValidationError>) {
    if !dog.weight_lbs.is_finite() || dog.weight_lbs < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidWeight,
            format!("Weight must be a non-negative number, got {}", dog.weight_lbs),
        ));
    }
}

fn check_window(window: &StayWindow, errors: &mut Vec<ValidationError>) {
    if window.is_inverted() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedWindow,
            format!(
                "Departure {} is before arrival {}",
                window.depart, window.arrive
            ),
        ));
    }
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunType;
    use chrono::NaiveDate;

    fn runs(labels: &[&str]) -> Vec<Run> {
        labels
            .iter()
            .map(|l| Run::parse(l, RunType::Standard).unwrap())
            .collect()
    }

    #[test]
    fn test_valid_request() {
        let dog = DogProfile::new(40.0);
        assert!(validate_request(&dog, &runs(&["A1", "B2"])).is_ok());
        assert!(validate_request(&dog, &[]).is_ok());
    }

    #[test]
    fn test_zero_weight_is_valid() {
        assert!(validate_profile(&DogProfile::new(0.0)).is_ok());
    }

    #[test]
    fn test_invalid_weights() {
        for w in [-1.0, f64::NAN, f64::INFINITY] {
            let errors = validate_profile(&DogProfile::new(w)).unwrap_err();
            assert_eq!(errors[0].kind, ValidationErrorKind::InvalidWeight);
        }
    }

    #[test]
    fn test_duplicate_run() {
        let dog = DogProfile::new(40.0);
        let errors = validate_request(&dog, &runs(&["A1", "B2", "a1"])).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateRun && e.message.contains("A1")));
    }

    #[test]
    fn test_inverted_window() {
        let w = StayWindow::new(
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
        );
        let errors = validate_window(&w).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvertedWindow);
    }

    #[test]
    fn test_multiple_errors() {
        let dog = DogProfile::new(-5.0);
        let errors = validate_request(&dog, &runs(&["A1", "A1"])).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
