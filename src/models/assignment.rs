//! Assignment model.
//!
//! An assignment binds a subject (a sales representative) to a career
//! level and/or an override commission factor for an inclusive range
//! of calendar weeks. Ranges may be open-ended: `valid_to == None`
//! means the assignment holds until superseded.
//!
//! # Lifecycle
//!
//! Assignments are built with the constructor/builder below and enter
//! a timeline only through `Timeline::insert`. After storage they are
//! never edited directly; overlap resolution may shorten `valid_to`,
//! push `valid_from` later, or retire an entry entirely when a newer
//! insert covers it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::WeekRef;

/// A role/factor assignment valid for a range of calendar weeks.
///
/// Carries a career-level reference and/or an override factor; the
/// override, when present, wins over the catalog factor. `valid_to`
/// is serialized as an explicit `null` when unbounded so stores
/// round-trip "open-ended" without sentinel dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier within the subject's timeline. Immutable.
    pub id: String,
    /// The subject this assignment belongs to. Subjects never
    /// interact; every operation is scoped to one.
    pub subject_id: String,
    /// Career-ladder level reference, resolved through the host's
    /// catalog.
    pub level_id: Option<String>,
    /// Manual commission factor, taking precedence over the catalog
    /// factor. Must be positive.
    pub override_factor: Option<Decimal>,
    /// First effective week (inclusive).
    pub valid_from: WeekRef,
    /// Last effective week (inclusive). `None` = effective until
    /// superseded.
    pub valid_to: Option<WeekRef>,
    /// Creation timestamp. Immutable; breaks ties between entries
    /// starting in the same week.
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates an open-ended assignment starting at `valid_from`.
    ///
    /// The creation timestamp is stamped here, once; resolution never
    /// touches it.
    pub fn new(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        valid_from: WeekRef,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            level_id: None,
            override_factor: None,
            valid_from,
            valid_to: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the career-level reference.
    pub fn with_level(mut self, level_id: impl Into<String>) -> Self {
        self.level_id = Some(level_id.into());
        self
    }

    /// Sets a manual override factor.
    pub fn with_override_factor(mut self, factor: Decimal) -> Self {
        self.override_factor = Some(factor);
        self
    }

    /// Bounds the assignment to end at `valid_to` (inclusive).
    pub fn with_valid_to(mut self, valid_to: WeekRef) -> Self {
        self.valid_to = Some(valid_to);
        self
    }

    /// Overrides the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Whether the assignment has no end week.
    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.valid_to.is_none()
    }

    /// Whether the given week falls within this assignment's range.
    ///
    /// Both ends are inclusive; an open end covers every later week.
    pub fn covers(&self, week: WeekRef) -> bool {
        week >= self.valid_from && self.valid_to.map_or(true, |to| week <= to)
    }

    /// Whether two assignments' week ranges intersect.
    pub fn overlaps(&self, other: &Assignment) -> bool {
        let self_ends_first = self.valid_to.is_some_and(|to| to < other.valid_from);
        let other_ends_first = other.valid_to.is_some_and(|to| to < self.valid_from);
        !(self_ends_first || other_ends_first)
    }
}
