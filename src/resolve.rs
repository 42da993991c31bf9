//! Overlap resolution for assignment timelines.
//!
//! Pure computation: given a subject's existing assignments and one
//! insert candidate, produce the new canonical set in which no two
//! entries cover the same week, plus the list of conflicts (the
//! original form of every entry the candidate altered or retired).
//! No I/O, no clock reads — hosts can run it as a dry-run preview and
//! discard the result.
//!
//! # Algorithm
//!
//! 1. Compare every existing entry's week range against the
//!    candidate's, through anchor dates (`WeekRef::monday`; an open
//!    end counts as +∞).
//! 2. Classify each entry and rewrite it (see below).
//! 3. Append the candidate, sort descending by start week
//!    (`created_at` breaking ties), and return.
//!
//! # Classification
//!
//! | Relation to candidate | Outcome |
//! |---|---|
//! | Disjoint | kept unchanged |
//! | Covered entirely (equal ranges included) | retired |
//! | Starts earlier, ends inside | end truncated to the week before the candidate |
//! | Starts earlier, ends later | split: truncated head + resumed tail |
//! | Starts inside, ends later | start deferred to the week after the candidate |
//!
//! # Reference
//! Allen (1983), "Maintaining Knowledge about Temporal Intervals",
//! CACM 26(11) — the thirteen interval relations collapse into the
//! five outcomes above.

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, WeekRef};

/// Outcome of resolving one candidate against an existing set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// The new canonical set, sorted by `valid_from` descending.
    pub entries: Vec<Assignment>,
    /// Altered or retired entries, in their original stored form.
    pub conflicts: Vec<Conflict>,
}

/// An existing entry the candidate collided with.
///
/// Carries the entry as it was stored, so hosts can show a
/// confirmation dialog before committing. Confirmation is a UX
/// nicety — the resolution is already correct without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// What happened to the entry.
    pub kind: ConflictKind,
    /// The entry in its pre-resolution form.
    pub assignment: Assignment,
}

/// How an overlapping entry was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The candidate covers the entry's whole range; it was removed.
    Superseded,
    /// The entry's end was pulled back to the week before the
    /// candidate starts.
    Truncated,
    /// The entry's start was pushed to the week after the candidate
    /// ends.
    Deferred,
    /// The entry bracketed the candidate and was cut in two around it.
    Split,
}

impl Conflict {
    fn superseded(assignment: Assignment) -> Self {
        Self {
            kind: ConflictKind::Superseded,
            assignment,
        }
    }

    fn truncated(assignment: Assignment) -> Self {
        Self {
            kind: ConflictKind::Truncated,
            assignment,
        }
    }

    fn deferred(assignment: Assignment) -> Self {
        Self {
            kind: ConflictKind::Deferred,
            assignment,
        }
    }

    fn split(assignment: Assignment) -> Self {
        Self {
            kind: ConflictKind::Split,
            assignment,
        }
    }
}

/// Resolves a candidate against a subject's existing assignments.
///
/// Entries belonging to a different subject pass through untouched.
/// Re-inserting an identical candidate is idempotent: the stored copy
/// is superseded and replaced by its twin.
pub fn resolve(existing: &[Assignment], candidate: &Assignment) -> Resolution {
    let c_start = candidate.valid_from.monday();
    let c_end = candidate.valid_to.map(|week| week.monday());

    let mut entries = Vec::with_capacity(existing.len() + 1);
    let mut conflicts = Vec::new();

    for entry in existing {
        if entry.subject_id != candidate.subject_id {
            entries.push(entry.clone());
            continue;
        }

        let e_start = entry.valid_from.monday();
        let e_end = entry.valid_to.map(|week| week.monday());

        let ends_before = e_end.is_some_and(|end| end < c_start);
        let starts_after = c_end.is_some_and(|end| e_start > end);
        if ends_before || starts_after {
            entries.push(entry.clone());
            continue;
        }

        let starts_earlier = e_start < c_start;
        let outlasts = match (e_end, c_end) {
            (None, None) | (Some(_), None) => false,
            (None, Some(_)) => true,
            (Some(entry_end), Some(candidate_end)) => entry_end > candidate_end,
        };

        match (starts_earlier, outlasts) {
            (false, false) => {
                conflicts.push(Conflict::superseded(entry.clone()));
            }
            (true, false) => {
                let mut head = entry.clone();
                head.valid_to = Some(candidate.valid_from.pred());
                conflicts.push(Conflict::truncated(entry.clone()));
                entries.push(head);
            }
            (false, true) => {
                // `outlasts` guarantees the candidate has an end week.
                if let Some(resume) = candidate.valid_to.map(|week| week.succ()) {
                    let mut rest = entry.clone();
                    rest.valid_from = resume;
                    conflicts.push(Conflict::deferred(entry.clone()));
                    entries.push(rest);
                }
            }
            (true, true) => {
                if let Some(resume) = candidate.valid_to.map(|week| week.succ()) {
                    let mut head = entry.clone();
                    head.valid_to = Some(candidate.valid_from.pred());
                    let tail = split_tail(entry, resume);
                    conflicts.push(Conflict::split(entry.clone()));
                    entries.push(head);
                    entries.push(tail);
                }
            }
        }
    }

    entries.push(candidate.clone());
    sort_descending(&mut entries);

    Resolution { entries, conflicts }
}

/// Canonical history order: start week descending, then creation
/// timestamp descending.
pub(crate) fn sort_descending(entries: &mut [Assignment]) {
    entries.sort_by(|a, b| {
        b.valid_from
            .cmp(&a.valid_from)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// The resumed remainder of a split entry.
///
/// Keeps level, factor, and creation timestamp; the id is derived
/// from the source id and the resume week (`"a1@W13/2024"`), which a
/// given source can spawn at most once per week, so derived ids never
/// collide.
fn split_tail(source: &Assignment, resume: WeekRef) -> Assignment {
    Assignment {
        id: format!("{}@{}", source.id, resume),
        subject_id: source.subject_id.clone(),
        level_id: source.level_id.clone(),
        override_factor: source.override_factor,
        valid_from: resume,
        valid_to: source.valid_to,
        created_at: source.created_at,
    }
}
