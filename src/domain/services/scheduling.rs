use chrono::{DateTime, Utc};
use crate::error::AppError;

/// Half-open interval overlap: [a0, a1) and [b0, b1) intersect iff
/// `a0 < b1 && b0 < a1`. Two bookings that only share an endpoint do not
/// conflict. The repository overlap queries encode the same comparison.
pub fn overlaps(a0: DateTime<Utc>, a1: DateTime<Utc>, b0: DateTime<Utc>, b1: DateTime<Utc>) -> bool {
    a0 < b1 && b0 < a1
}

pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::Validation("Start time must be before end time".into()));
    }
    Ok(())
}
