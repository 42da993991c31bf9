//! ISO-8601 calendar week references.
//!
//! A `WeekRef` names one ISO week: `(week, year)` where `year` is the
//! ISO week-year, weeks run Monday through Sunday, and week 1 is the
//! week containing the year's first Thursday. Validity ranges, overlap
//! detection, and history ordering all reduce to comparisons between
//! week anchor dates, so this module is the single source of truth for
//! week↔date conversion.
//!
//! # Anchor Rule
//!
//! `monday()` is the one canonical week→date formula in the crate:
//! week 1's Monday is the Monday of the week containing January 4th,
//! and week *n* starts `(n − 1) * 7` days later. Every other
//! operation (ordering, stepping, range checks) is derived from it.
//!
//! # References
//!
//! - ISO 8601:2004, §2.2.10 (calendar week number)
//! - Dershowitz & Reingold (2008), "Calendrical Calculations", Ch. 5

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::TimelineError;

/// A validated ISO-8601 week reference.
///
/// Fields are private: every live `WeekRef` satisfies
/// `1 <= week <= weeks_in_year(year)`, enforced by [`WeekRef::new`]
/// and re-checked when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWeek", into = "RawWeek")]
pub struct WeekRef {
    week: u32,
    year: i32,
}

/// Unvalidated wire form of a week reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawWeek {
    week: u32,
    year: i32,
}

impl WeekRef {
    /// Creates a week reference, validating against the ISO calendar.
    ///
    /// # Errors
    /// `InvalidWeekReference` when `week` is outside
    /// `1..=weeks_in_year(year)` or the year itself is outside the
    /// representable date range. Out-of-range weeks are rejected,
    /// never clamped.
    pub fn new(week: u32, year: i32) -> Result<Self, TimelineError> {
        let max = Self::weeks_in_year(year)
            .map_err(|_| TimelineError::InvalidWeekReference { week, year })?;
        if week == 0 || week > max {
            return Err(TimelineError::InvalidWeekReference { week, year });
        }
        Ok(Self { week, year })
    }

    /// The week containing the given date.
    ///
    /// Standard ISO classification: the date belongs to the week of
    /// its Thursday, numbered within that Thursday's year.
    pub fn of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            week: iso.week(),
            year: iso.year(),
        }
    }

    /// Week number within the ISO year (1–53).
    #[inline]
    pub fn week(&self) -> u32 {
        self.week
    }

    /// ISO week-year. May differ from the calendar year of dates near
    /// January 1st (2024-12-31 is W01/2025).
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The Monday this week begins on.
    ///
    /// Week 1's Monday is the Monday of the week containing
    /// January 4th; week `n` starts `(n - 1) * 7` days later. All
    /// week→date conversion in the crate goes through here.
    pub fn monday(&self) -> NaiveDate {
        let jan4 = NaiveDate::from_ymd_opt(self.year, 1, 4)
            .expect("week reference years are validated at construction");
        let week_one = jan4 - Duration::days(i64::from(jan4.weekday().num_days_from_monday()));
        week_one + Duration::days(7 * (i64::from(self.week) - 1))
    }

    /// The Sunday this week ends on.
    #[inline]
    pub fn sunday(&self) -> NaiveDate {
        self.monday() + Duration::days(6)
    }

    /// Number of ISO weeks in the given year: 52 or 53.
    ///
    /// Derived from the classification of December 31, stepping back
    /// one week when December 31 already counts into week 1 of the
    /// next ISO year.
    ///
    /// # Errors
    /// `InvalidWeekReference` when the year is outside the
    /// representable date range.
    pub fn weeks_in_year(year: i32) -> Result<u32, TimelineError> {
        let dec31 = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or(TimelineError::InvalidWeekReference { week: 1, year })?;
        let last = Self::of(dec31);
        if last.year == year {
            Ok(last.week)
        } else {
            Ok(Self::of(dec31 - Duration::days(7)).week)
        }
    }

    /// The previous calendar week, crossing year boundaries.
    pub fn pred(&self) -> Self {
        Self::of(self.monday() - Duration::days(7))
    }

    /// The next calendar week, crossing year boundaries.
    pub fn succ(&self) -> Self {
        Self::of(self.monday() + Duration::days(7))
    }
}

impl Ord for WeekRef {
    /// Orders by anchor Monday.
    ///
    /// Never compares `(week, year)` tuples lexicographically: the
    /// anchor date is the semantics, the tuple is only its name.
    fn cmp(&self, other: &Self) -> Ordering {
        self.monday().cmp(&other.monday())
    }
}

impl PartialOrd for WeekRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WeekRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{:02}/{}", self.week, self.year)
    }
}

impl From<WeekRef> for RawWeek {
    fn from(w: WeekRef) -> Self {
        Self {
            week: w.week,
            year: w.year,
        }
    }
}

impl TryFrom<RawWeek> for WeekRef {
    type Error = TimelineError;

    fn try_from(raw: RawWeek) -> Result<Self, Self::Error> {
        Self::new(raw.week, raw.year)
    }
}
