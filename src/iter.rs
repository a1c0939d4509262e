// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lazy walks over finite intervals and calendar-day alignment.
//!
//! [`Interval::iterate`] and [`Interval::slice`] return independent
//! iterators over an immutable copy of the interval and step; calling them
//! again starts a fresh sequence. The `k`-th point is computed as
//! `start + k·step` rather than by repeated addition, so calendar steps keep
//! their anchor (Jan 31 + 1 month = Feb 29, + 2 months = Mar 31).

use crate::error::{Error, Result};
use crate::instant::{CalendarInstant, CivilInstant};
use crate::interval::{Bound, Interval};
use crate::length::{Offset, Period};
use chrono::NaiveDate;
use std::iter::{FusedIterator, Peekable};

/// Points `start, start + step, start + 2·step, …` strictly before `end`.
#[derive(Debug, Clone)]
pub struct Steps<T> {
    start: T,
    end: T,
    step: Offset,
    index: i64,
    last: Option<T>,
    done: bool,
}

impl<T: CivilInstant> Iterator for Steps<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = self
            .step
            .checked_mul(self.index)
            .and_then(|offset| self.start.add_offset(offset))
            // Overflow, the end, or a clamped step that failed to advance.
            .filter(|p| *p < self.end && self.last.map_or(true, |last| *p > last));
        match point {
            Some(p) => {
                self.index += 1;
                self.last = Some(p);
                Some(p)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<T: CivilInstant> FusedIterator for Steps<T> {}

/// Consecutive step-sized windows tiling an interval; the last one is
/// truncated at the interval's end.
#[derive(Debug, Clone)]
pub struct Slices<T: CivilInstant> {
    points: Peekable<Steps<T>>,
    end: T,
}

impl<T: CivilInstant> Iterator for Slices<T> {
    type Item = Interval<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.points.next()?;
        let stop = self.points.peek().copied().unwrap_or(self.end);
        Some(Interval::ordered(start, stop))
    }
}

impl<T: CivilInstant> FusedIterator for Slices<T> {}

/// Calendar dates overlapped by an interval.
#[derive(Debug, Clone)]
pub struct DaySeries {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl Iterator for DaySeries {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.next.filter(|day| *day <= self.last)?;
        self.next = if day == self.last {
            None
        } else {
            day.succ_opt()
        };
        Some(day)
    }
}

impl FusedIterator for DaySeries {}

fn day_overflow() -> Error {
    Error::Unrepresentable {
        offset: Period::from_days(1).to_string(),
    }
}

impl<T: CivilInstant> Interval<T> {
    /// Points from the start, `step` apart, strictly before the end.
    ///
    /// Fails with [`Error::UnboundedIteration`] on an unbounded interval and
    /// with [`Error::InvalidStep`] unless the step moves forward. A step the
    /// point type cannot apply at all (a fractional day on dates, a calendar
    /// step on times of day) fails with [`Error::Unrepresentable`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tempspan::{Interval, Period};
    ///
    /// let q1 = Interval::new(
    ///     NaiveDate::from_ymd_opt(2021, 1, 31).unwrap(),
    ///     NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
    /// )
    /// .unwrap();
    /// let month_ends: Vec<_> = q1.iterate(Period::from_months(1)).unwrap().collect();
    /// assert_eq!(month_ends.len(), 3);
    /// assert_eq!(month_ends[1], NaiveDate::from_ymd_opt(2021, 2, 28).unwrap());
    /// assert_eq!(month_ends[2], NaiveDate::from_ymd_opt(2021, 3, 31).unwrap());
    /// ```
    pub fn iterate(&self, step: impl Into<Offset>) -> Result<Steps<T>> {
        let step = step.into();
        let (start, end) = self.finite_bounds().ok_or(Error::UnboundedIteration)?;
        if !step.is_forward() {
            return Err(Error::InvalidStep {
                step: step.to_string(),
            });
        }
        if !T::accepts(step) {
            return Err(Error::Unrepresentable {
                offset: step.to_string(),
            });
        }
        tracing::trace!(%step, "iterating interval");
        Ok(Steps {
            start,
            end,
            step,
            index: 0,
            last: None,
            done: false,
        })
    }

    /// Consecutive `step`-sized sub-intervals covering `[start, end)`.
    ///
    /// Same preconditions as [`Interval::iterate`].
    pub fn slice(&self, step: impl Into<Offset>) -> Result<Slices<T>> {
        let points = self.iterate(step)?;
        Ok(Slices {
            end: points.end,
            points: points.peekable(),
        })
    }
}

impl<T: CalendarInstant> Interval<T> {
    /// Widens the interval to whole calendar days.
    ///
    /// A finite start rounds down to its day start, a finite end rounds up
    /// to the next day start unless already aligned. An empty interval
    /// always becomes the full day containing its point.
    pub fn to_full_days(&self) -> Result<Self> {
        if let Some((point, _)) = self.finite_bounds().filter(|_| self.is_empty()) {
            let next = point.next_day_start().ok_or_else(day_overflow)?;
            return Self::between(point.day_start(), next);
        }
        let start = match self.start() {
            Bound::Finite(s) => Bound::Finite(s.day_start()),
            Bound::Unbounded => Bound::Unbounded,
        };
        let end = match self.end() {
            Bound::Finite(e) if e.is_day_start() => Bound::Finite(e),
            Bound::Finite(e) => Bound::Finite(e.next_day_start().ok_or_else(day_overflow)?),
            Bound::Unbounded => Bound::Unbounded,
        };
        Self::between(start, end)
    }

    /// Every finite bound falls on a day start.
    pub fn is_full_days(&self) -> bool {
        let aligned = |bound: Bound<T>| bound.finite().map_or(true, |t| t.is_day_start());
        aligned(self.start()) && aligned(self.end())
    }

    /// Dates the interval overlaps for a non-zero length.
    ///
    /// An end falling exactly on midnight excludes that day. An unbounded
    /// end yields dates up to the calendar's maximum; an unbounded start
    /// fails with [`Error::UnboundedIteration`].
    pub fn days(&self) -> Result<DaySeries> {
        let start = self.start().finite().ok_or(Error::UnboundedIteration)?;
        let last = match self.end() {
            Bound::Finite(e) if e.is_day_start() => e.date().pred_opt(),
            Bound::Finite(e) => Some(e.date()),
            Bound::Unbounded => Some(NaiveDate::MAX),
        };
        let series = match last {
            Some(last) if !self.is_empty() => DaySeries {
                next: Some(start.date()),
                last,
            },
            _ => DaySeries {
                next: None,
                last: start.date(),
            },
        };
        Ok(series)
    }
}
