//! Crate-wide error types.
//!
//! Every fallible operation in this crate returns `TimelineError`.
//! There is no transient class of failure: nothing here is retried,
//! and an insert either commits fully or leaves the store untouched.

use thiserror::Error;

/// Errors raised by the timeline engine.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// The `(week, year)` pair does not name an ISO-8601 week.
    ///
    /// Raised when `week` is outside `1..=weeks_in_year(year)` or the
    /// year is outside the representable date range. Out-of-range
    /// weeks are rejected, never clamped.
    #[error("no such ISO week: W{week:02}/{year}")]
    InvalidWeekReference { week: u32, year: i32 },

    /// An insert candidate failed admission checks.
    ///
    /// Rejected before any mutation; the stored timeline is unchanged.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),

    /// A stored timeline violates the no-overlap or unique-id
    /// invariant.
    ///
    /// Fatal: the resolver was bypassed or the store returned
    /// corrupted data. Callers must propagate this, not mask it.
    #[error("timeline invariant violated: {0}")]
    InvariantViolation(String),

    /// The injected store failed to load or save.
    #[error("store error: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = TimelineError::InvalidWeekReference { week: 54, year: 2024 };
        assert_eq!(e.to_string(), "no such ISO week: W54/2024");

        let e = TimelineError::InvalidAssignment("missing level".into());
        assert_eq!(e.to_string(), "invalid assignment: missing level");

        let e = TimelineError::InvariantViolation("overlap".into());
        assert!(e.to_string().contains("invariant"));
    }

    #[test]
    fn test_week_formatting_pads_to_two_digits() {
        let e = TimelineError::InvalidWeekReference { week: 0, year: 2020 };
        assert_eq!(e.to_string(), "no such ISO week: W00/2020");
    }
}
