// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # tempspan
//!
//! Half-open intervals over zone-less civil time, with a round-trippable
//! ISO-8601 text form, Allen's thirteen relations and calendar-aware
//! arithmetic.
//!
//! An [`Interval<T>`] spans `[start, end)`. Either side may be
//! [`Bound::Unbounded`]; an interval whose start equals its end is empty.
//! One generic engine serves three point flavors:
//!
//! | Alias | Point | Text example |
//! |-------|-------|--------------|
//! | [`DateInterval`] | [`chrono::NaiveDate`] | `2012-04-01/2012-04-05` |
//! | [`DateTimeInterval`] | [`chrono::NaiveDateTime`] | `2012-04-01T14:15/P4DT1H45M` |
//! | [`TimeInterval`] | [`chrono::NaiveTime`] | `09:00/PT8H30M` |
//!
//! # Core types
//!
//! - [`Interval<T>`]: construction, predicates, ordering, shifting.
//! - [`Bound<T>`]: a finite point or the unbounded marker.
//! - [`AllenRelation`]: the relation that holds between two intervals.
//! - [`CivilInstant`] / [`CalendarInstant`]: point abstractions.
//! - [`Duration`], [`Period`], [`Offset`]: exact and calendar lengths.
//!
//! # Example
//!
//! ```
//! use tempspan::{DateTimeInterval, Duration};
//!
//! let shift: DateTimeInterval = "2012-04-01T14:15/P4DT1H45M".parse().unwrap();
//! assert_eq!(shift.to_string(), "2012-04-01T14:15/2012-04-05T16:00");
//! assert_eq!(shift.duration().unwrap(), Duration::from_minutes(97 * 60 + 45));
//!
//! let open: DateTimeInterval = "2012-04-01T14:15/-".parse().unwrap();
//! assert!(open.contains_interval(&shift));
//! ```
//!
//! # Features
//!
//! - `serde`: string-form `Serialize`/`Deserialize` for intervals and lengths.

mod collection;
mod error;
pub(crate) mod instant;
pub(crate) mod interval;
mod iter;
mod length;
mod schema;
mod text;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use collection::{complement_within, container_of, intersect_sorted};
pub use error::{Error, GrammarError, GrammarErrorKind, Result};
pub use instant::{CalendarInstant, CivilInstant};
pub use interval::{AllenRelation, Bound, Interval};
pub use iter::{DaySeries, Slices, Steps};
pub use length::{Duration, Offset, Period};
pub use schema::Schema;
pub use text::{decode, encode};

// ── Flavor aliases ────────────────────────────────────────────────────────

/// Interval of calendar dates; the end date is exclusive.
pub type DateInterval = Interval<chrono::NaiveDate>;

/// Interval of zone-less date-times.
pub type DateTimeInterval = Interval<chrono::NaiveDateTime>;

/// Interval within a single day.
pub type TimeInterval = Interval<chrono::NaiveTime>;
