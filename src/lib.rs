//! Role-assignment timeline engine for commission dashboards.
//!
//! Sales representatives move through a fixed career ladder; each
//! ladder position — or a manually overridden commission factor — is
//! valid for a range of ISO-8601 calendar weeks. This crate keeps
//! that history canonical: inserting a new assignment truncates,
//! splits, defers, or retires whatever it overlaps, so no two stored
//! entries ever describe the same subject for the same week, and
//! "which assignment applied in week W" always has at most one
//! answer.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `WeekRef`, `Assignment`,
//!   `CareerLevel`, `LevelCatalog`
//! - **`resolve`**: Pure overlap resolution (existing set + candidate
//!   → canonical set + conflicts), usable as a dry-run preview
//! - **`store`**: `Timeline` engine over an injected `TimelineStore`
//! - **`validation`**: Candidate admission and invariant verification
//! - **`error`**: Crate-wide `TimelineError`
//!
//! # Architecture
//!
//! The engine is fully synchronous and does no I/O of its own.
//! Persistence and the career-ladder catalog are injected traits;
//! resolution is a pure function over borrowed slices, committed in a
//! single `save`. Hosts serialize concurrent inserts per subject —
//! the engine provides no compare-and-swap.
//!
//! All week→date conversion goes through `WeekRef::monday`. There is
//! deliberately no second formula anywhere in the crate: two anchors
//! that disagree for some `(week, year)` pair would silently corrupt
//! overlap detection.

pub mod error;
pub mod models;
pub mod resolve;
pub mod store;
pub mod validation;
