// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil time interval implementation.
//!
//! This module provides:
//! - [`Bound<T>`]: a finite point or the unbounded sentinel
//! - [`Interval<T>`]: a half-open span `[start, end)` over any [`CivilInstant`]
//! - [`AllenRelation`]: the thirteen relations of Allen's interval algebra
//!
//! An unbounded start stands for −∞ and an unbounded end for +∞. Every
//! comparison first places both bounds on the extended line
//! −∞ < points < +∞, so predicates never special-case the sentinels.

use crate::error::{Error, Result};
use crate::instant::{CivilInstant, Iso};
use crate::length::{Duration, Offset};
use qtty::Days;
use std::cmp::Ordering;

/// One side of an interval: a concrete point or unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound<T> {
    Finite(T),
    Unbounded,
}

impl<T: Copy> Bound<T> {
    /// The point, if finite.
    #[inline]
    pub fn finite(&self) -> Option<T> {
        match self {
            Bound::Finite(t) => Some(*t),
            Bound::Unbounded => None,
        }
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }

    fn try_map(self, f: impl FnOnce(T) -> Option<T>) -> Option<Self> {
        match self {
            Bound::Finite(t) => f(t).map(Bound::Finite),
            Bound::Unbounded => Some(Bound::Unbounded),
        }
    }
}

impl<T> From<T> for Bound<T> {
    #[inline]
    fn from(value: T) -> Self {
        Bound::Finite(value)
    }
}

/// A bound placed on the extended line −∞ < points < +∞.
///
/// Variant order drives the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Edge<T> {
    NegInf,
    At(T),
    PosInf,
}

impl<T: Copy> Edge<T> {
    #[inline]
    fn lower(bound: Bound<T>) -> Self {
        bound.finite().map_or(Edge::NegInf, Edge::At)
    }

    #[inline]
    fn upper(bound: Bound<T>) -> Self {
        bound.finite().map_or(Edge::PosInf, Edge::At)
    }

    #[inline]
    fn into_bound(self) -> Bound<T> {
        match self {
            Edge::At(t) => Bound::Finite(t),
            Edge::NegInf | Edge::PosInf => Bound::Unbounded,
        }
    }
}

/// Represents a half-open span `[start, end)` between two civil points.
///
/// Either side may be unbounded. When both are finite, `start <= end`;
/// `start == end` is the empty interval. Values are immutable: every
/// transformation returns a new interval.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tempspan::{Bound, Interval};
///
/// let a = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
/// let b = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
/// let span = Interval::new(a, b).unwrap();
///
/// assert!(span.contains(a));
/// assert!(!span.contains(b));
/// assert_eq!(Interval::since(a).end(), Bound::Unbounded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<T> {
    start: Bound<T>,
    end: Bound<T>,
}

/// The thirteen mutually exclusive relations between two intervals.
///
/// Each variant reads as "`self` *relation* `other`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllenRelation {
    Precedes,
    Meets,
    Overlaps,
    FinishedBy,
    Encloses,
    Starts,
    Equals,
    StartedBy,
    EnclosedBy,
    Finishes,
    OverlappedBy,
    MetBy,
    PrecededBy,
}

impl AllenRelation {
    /// The relation seen from the other interval.
    pub fn converse(self) -> Self {
        use AllenRelation::*;
        match self {
            Precedes => PrecededBy,
            Meets => MetBy,
            Overlaps => OverlappedBy,
            FinishedBy => Finishes,
            Encloses => EnclosedBy,
            Starts => StartedBy,
            Equals => Equals,
            StartedBy => Starts,
            EnclosedBy => Encloses,
            Finishes => FinishedBy,
            OverlappedBy => Overlaps,
            MetBy => Meets,
            PrecededBy => Precedes,
        }
    }
}

impl<T: CivilInstant> Interval<T> {
    // ── construction ──────────────────────────────────────────────────

    /// Creates an interval between two bounds, each finite or unbounded.
    ///
    /// Fails with [`Error::InvalidBounds`] when both are finite and
    /// `start > end`.
    pub fn between(start: impl Into<Bound<T>>, end: impl Into<Bound<T>>) -> Result<Self> {
        let (start, end) = (start.into(), end.into());
        if let (Bound::Finite(s), Bound::Finite(e)) = (start, end) {
            if s > e {
                return Err(Error::InvalidBounds {
                    start: Iso(&s).to_string(),
                    end: Iso(&e).to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates a finite interval `[start, end)`.
    #[inline]
    pub fn new(start: T, end: T) -> Result<Self> {
        Self::between(start, end)
    }

    /// `[start, +∞)`.
    #[inline]
    pub fn since(start: T) -> Self {
        Self {
            start: Bound::Finite(start),
            end: Bound::Unbounded,
        }
    }

    /// `(−∞, end)`.
    #[inline]
    pub fn until(end: T) -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Finite(end),
        }
    }

    /// `(−∞, +∞)`.
    #[inline]
    pub fn forever() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// The empty interval at `point`.
    #[inline]
    pub fn empty_at(point: T) -> Self {
        Self {
            start: Bound::Finite(point),
            end: Bound::Finite(point),
        }
    }

    /// Builds `[start, end)` from bounds already known to be ordered.
    #[inline]
    pub(crate) fn ordered(start: T, end: T) -> Self {
        debug_assert!(start <= end);
        Self {
            start: Bound::Finite(start),
            end: Bound::Finite(end),
        }
    }

    /// Builds an interval from extended-line edges with `lower <= upper`.
    #[inline]
    pub(crate) fn from_edges(lower: Edge<T>, upper: Edge<T>) -> Self {
        debug_assert!(lower <= upper);
        Self {
            start: lower.into_bound(),
            end: upper.into_bound(),
        }
    }

    /// A copy with the start replaced, re-validated.
    pub fn with_start(&self, start: impl Into<Bound<T>>) -> Result<Self> {
        Self::between(start, self.end)
    }

    /// A copy with the end replaced, re-validated.
    pub fn with_end(&self, end: impl Into<Bound<T>>) -> Result<Self> {
        Self::between(self.start, end)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub fn start(&self) -> Bound<T> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Bound<T> {
        self.end
    }

    #[inline]
    pub(crate) fn lower(&self) -> Edge<T> {
        Edge::lower(self.start)
    }

    #[inline]
    pub(crate) fn upper(&self) -> Edge<T> {
        Edge::upper(self.end)
    }

    /// Both bounds, if both are finite.
    #[inline]
    pub(crate) fn finite_bounds(&self) -> Option<(T, T)> {
        Some((self.start.finite()?, self.end.finite()?))
    }

    /// Whether both sides are finite.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.finite_bounds().is_some()
    }

    /// Whether either side is unbounded.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        !self.is_bounded()
    }

    // ── point predicates ──────────────────────────────────────────────

    /// Finite and zero-length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.finite_bounds(), Some((s, e)) if s == e)
    }

    /// `start <= t < end`.
    #[inline]
    pub fn contains(&self, t: T) -> bool {
        self.lower() <= Edge::At(t) && Edge::At(t) < self.upper()
    }

    /// The interval ends at or before `t`.
    #[inline]
    pub fn is_before(&self, t: T) -> bool {
        self.upper() <= Edge::At(t)
    }

    /// The interval starts strictly after `t`.
    #[inline]
    pub fn is_after(&self, t: T) -> bool {
        self.lower() > Edge::At(t)
    }

    // ── interval predicates ───────────────────────────────────────────

    /// `other` is finite and lies within `self`.
    pub fn contains_interval(&self, other: &Self) -> bool {
        other.is_bounded() && self.lower() <= other.lower() && other.upper() <= self.upper()
    }

    /// `self` ends at or before `other` starts.
    #[inline]
    pub fn is_before_interval(&self, other: &Self) -> bool {
        self.upper() <= other.lower()
    }

    /// `self` starts at or after `other` ends.
    #[inline]
    pub fn is_after_interval(&self, other: &Self) -> bool {
        other.is_before_interval(self)
    }

    /// A strict gap separates `self` from the later `other`.
    #[inline]
    pub fn precedes(&self, other: &Self) -> bool {
        self.upper() < other.lower()
    }

    #[inline]
    pub fn preceded_by(&self, other: &Self) -> bool {
        other.precedes(self)
    }

    /// `self` ends exactly where `other` starts.
    #[inline]
    pub fn meets(&self, other: &Self) -> bool {
        self.upper() == other.lower()
    }

    #[inline]
    pub fn met_by(&self, other: &Self) -> bool {
        other.meets(self)
    }

    /// `start < other.start < end < other.end`.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.lower() < other.lower()
            && other.lower() < self.upper()
            && self.upper() < other.upper()
    }

    #[inline]
    pub fn overlapped_by(&self, other: &Self) -> bool {
        other.overlaps(self)
    }

    /// Same start, strictly earlier end.
    pub fn starts(&self, other: &Self) -> bool {
        self.lower() == other.lower() && self.upper() < other.upper()
    }

    #[inline]
    pub fn started_by(&self, other: &Self) -> bool {
        other.starts(self)
    }

    /// Same end, strictly later start.
    pub fn finishes(&self, other: &Self) -> bool {
        self.upper() == other.upper() && self.lower() > other.lower()
    }

    #[inline]
    pub fn finished_by(&self, other: &Self) -> bool {
        other.finishes(self)
    }

    /// `other` is finite and strictly inside `self`, touching neither bound.
    pub fn encloses(&self, other: &Self) -> bool {
        other.is_bounded() && self.lower() < other.lower() && other.upper() < self.upper()
    }

    #[inline]
    pub fn enclosed_by(&self, other: &Self) -> bool {
        other.encloses(self)
    }

    /// `self` meets or is met by `other`.
    #[inline]
    pub fn abuts(&self, other: &Self) -> bool {
        self.meets(other) || self.met_by(other)
    }

    /// The two intervals share at least one point.
    ///
    /// An empty interval intersects another exactly when the other contains
    /// its single position.
    pub fn intersects(&self, other: &Self) -> bool {
        if let Some((point, _)) = self.finite_bounds().filter(|_| self.is_empty()) {
            return other.contains(point);
        }
        if let Some((point, _)) = other.finite_bounds().filter(|_| other.is_empty()) {
            return self.contains(point);
        }
        self.lower().max(other.lower()) < self.upper().min(other.upper())
    }

    /// Returns the overlapping sub-interval, or `None` when the two do not
    /// intersect. Intervals that merely touch do not intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self::from_edges(
            self.lower().max(other.lower()),
            self.upper().min(other.upper()),
        ))
    }

    /// Bound-wise equality.
    #[inline]
    pub fn is_equal_to(&self, other: &Self) -> bool {
        self == other
    }

    /// Which of the thirteen Allen relations holds between `self` and `other`.
    ///
    /// For finite, non-empty intervals exactly one relation holds. Unbounded
    /// or empty operands may match none.
    pub fn relation(&self, other: &Self) -> Option<AllenRelation> {
        use AllenRelation::*;
        let checks: [(fn(&Self, &Self) -> bool, AllenRelation); 13] = [
            (Self::precedes, Precedes),
            (Self::meets, Meets),
            (Self::overlaps, Overlaps),
            (Self::finished_by, FinishedBy),
            (Self::encloses, Encloses),
            (Self::starts, Starts),
            (Self::is_equal_to, Equals),
            (Self::started_by, StartedBy),
            (Self::enclosed_by, EnclosedBy),
            (Self::finishes, Finishes),
            (Self::overlapped_by, OverlappedBy),
            (Self::met_by, MetBy),
            (Self::preceded_by, PrecededBy),
        ];
        checks
            .into_iter()
            .find(|(holds, _)| holds(self, other))
            .map(|(_, relation)| relation)
    }

    // ── ordering ──────────────────────────────────────────────────────

    /// Orders by start, then end; −∞ first and +∞ last.
    #[inline]
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Translates both finite bounds by `offset`.
    ///
    /// An exact [`Duration`] is added arithmetically, a calendar
    /// [`Period`](crate::Period) field by field. Unbounded sides stay
    /// unbounded.
    pub fn shift(&self, offset: impl Into<Offset>) -> Result<Self> {
        let offset = offset.into();
        let unrepresentable = || Error::Unrepresentable {
            offset: offset.to_string(),
        };
        let start = self
            .start
            .try_map(|t| t.add_offset(offset))
            .ok_or_else(unrepresentable)?;
        let end = self
            .end
            .try_map(|t| t.add_offset(offset))
            .ok_or_else(unrepresentable)?;
        // Calendar clamping can pull the bounds across each other.
        Self::between(start, end)
    }

    /// The empty interval at the start.
    pub fn collapse(&self) -> Result<Self> {
        self.start
            .finite()
            .map(Self::empty_at)
            .ok_or(Error::UnboundedCollapse)
    }

    /// Exact elapsed time between the bounds.
    pub fn duration(&self) -> Result<Duration> {
        let (start, end) = self.finite_bounds().ok_or(Error::UnboundedDuration)?;
        Ok(end.difference(&start))
    }

    /// Elapsed time in days.
    pub fn duration_days(&self) -> Result<Days> {
        Ok(self.duration()?.as_days())
    }

    /// The last point inside the interval, for closed-closed presentation.
    ///
    /// `None` when the end is unbounded.
    pub fn inclusive_end(&self) -> Option<T> {
        self.end.finite()?.predecessor()
    }
}

impl<T: CivilInstant> PartialOrd for Interval<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: CivilInstant> Ord for Interval<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower()
            .cmp(&other.lower())
            .then_with(|| self.upper().cmp(&other.upper()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
