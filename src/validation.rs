//! Candidate admission and timeline invariant checks.
//!
//! Two layers with different severities:
//! - [`validate_candidate`] gatekeeps inserts. Failures are caller
//!   errors (`InvalidAssignment`), raised before any mutation.
//! - [`verify_timeline`] checks a resolved set against the storage
//!   invariants. Failures are `InvariantViolation` — the resolver was
//!   bypassed or the store returned corrupted data — and must be
//!   propagated, never masked.

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::TimelineError;
use crate::models::Assignment;

/// Validates an insert candidate.
///
/// Checks:
/// 1. `id` and `subject_id` are non-empty
/// 2. At least one of `level_id` / `override_factor` is set
/// 3. `override_factor`, if set, is positive
/// 4. `valid_to`, if set, does not precede `valid_from`
///
/// A range with `valid_from == valid_to` is a valid single-week
/// assignment. Week references themselves need no checking here:
/// they are validated at construction.
pub fn validate_candidate(candidate: &Assignment) -> Result<(), TimelineError> {
    if candidate.id.is_empty() {
        return Err(TimelineError::InvalidAssignment(
            "assignment id must not be empty".into(),
        ));
    }
    if candidate.subject_id.is_empty() {
        return Err(TimelineError::InvalidAssignment(
            "subject id must not be empty".into(),
        ));
    }
    if candidate.level_id.is_none() && candidate.override_factor.is_none() {
        return Err(TimelineError::InvalidAssignment(
            "assignment must carry a career level or an override factor".into(),
        ));
    }
    if let Some(factor) = candidate.override_factor {
        if factor <= Decimal::ZERO {
            return Err(TimelineError::InvalidAssignment(format!(
                "override factor must be positive, got {factor}"
            )));
        }
    }
    if let Some(valid_to) = candidate.valid_to {
        if valid_to < candidate.valid_from {
            return Err(TimelineError::InvalidAssignment(format!(
                "validity range ends before it starts: {} – {}",
                candidate.valid_from, valid_to
            )));
        }
    }
    Ok(())
}

/// Verifies the storage invariants over a resolved set.
///
/// Checks:
/// 1. No two entries share an id
/// 2. No two entries of the same subject overlap
pub fn verify_timeline(entries: &[Assignment]) -> Result<(), TimelineError> {
    let mut ids = HashSet::new();
    for entry in entries {
        if !ids.insert(entry.id.as_str()) {
            return Err(TimelineError::InvariantViolation(format!(
                "duplicate assignment id '{}'",
                entry.id
            )));
        }
    }

    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if a.subject_id == b.subject_id && a.overlaps(b) {
                return Err(TimelineError::InvariantViolation(format!(
                    "assignments '{}' and '{}' overlap for subject '{}'",
                    a.id, b.id, a.subject_id
                )));
            }
        }
    }

    Ok(())
}
