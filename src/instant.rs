// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil points usable as interval bounds.
//!
//! [`CivilInstant`] is the minimal abstraction the interval engine needs:
//! a totally ordered, copyable point that can be shifted by an exact
//! [`Duration`] or a calendar [`Period`], measured against another point,
//! and printed/parsed in canonical ISO-8601 form.
//!
//! The three flavors are backed by chrono's zone-less types:
//!
//! | Point | Flavor | Smallest unit |
//! |-------|--------|---------------|
//! | [`NaiveDate`] | date | one day |
//! | [`NaiveDateTime`] | date-time | one nanosecond |
//! | [`NaiveTime`] | time of day | one nanosecond |
//!
//! Day-aware operations (full-day alignment, day iteration) additionally
//! require [`CalendarInstant`], implemented for dates and date-times only.

use crate::length::{Duration, Offset, Period};
use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use std::fmt;
use std::hash::Hash;

// ═══════════════════════════════════════════════════════════════════════════
// CivilInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// Trait for zone-less points in time.
///
/// Arithmetic is checked: `None` means the result is outside the point
/// type's range, or the offset has no meaning for it (a fractional day
/// added to a date, a duration wrapping a time of day past midnight).
pub trait CivilInstant: Copy + Ord + Hash + fmt::Debug + Sized + 'static {
    /// Flavor label, used as schema format prefix.
    const LABEL: &'static str;

    /// Representative value used for documentation examples.
    fn example() -> Self;

    /// Whether `offset` has a meaning for this point type at all,
    /// independent of range limits.
    #[inline]
    fn accepts(_offset: Offset) -> bool {
        true
    }

    /// Add an exact duration.
    fn add_duration(&self, duration: Duration) -> Option<Self>;

    /// Add a calendar period (month-end clamping, leap-day aware).
    fn add_period(&self, period: Period) -> Option<Self>;

    /// Exact elapsed time from `earlier` to `self`.
    fn difference(&self, earlier: &Self) -> Duration;

    /// The closest representable point before `self`.
    fn predecessor(&self) -> Option<Self>;

    /// Parse the canonical ISO-8601 form.
    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError>;

    /// Write the canonical ISO-8601 form.
    fn fmt_iso(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Add either kind of offset.
    #[inline]
    fn add_offset(&self, offset: Offset) -> Option<Self> {
        match offset {
            Offset::Exact(duration) => self.add_duration(duration),
            Offset::Calendar(period) => self.add_period(period),
        }
    }

    /// Subtract either kind of offset.
    #[inline]
    fn sub_offset(&self, offset: Offset) -> Option<Self> {
        self.add_offset(offset.negated()?)
    }
}

/// Points that sit on a calendar and therefore have day boundaries.
pub trait CalendarInstant: CivilInstant {
    /// Calendar date this point falls on.
    fn date(&self) -> NaiveDate;

    /// First point of `date`.
    fn from_date(date: NaiveDate) -> Self;

    /// Start of the day containing `self`.
    #[inline]
    fn day_start(&self) -> Self {
        Self::from_date(self.date())
    }

    /// Start of the day after the one containing `self`.
    #[inline]
    fn next_day_start(&self) -> Option<Self> {
        self.date().succ_opt().map(Self::from_date)
    }

    /// Whether `self` is exactly the start of its day.
    #[inline]
    fn is_day_start(&self) -> bool {
        self.day_start() == *self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Formatting helpers
// ═══════════════════════════════════════════════════════════════════════════

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes `.fff`, `.ffffff` or `.fffffffff`, whichever is the shortest exact form.
pub(crate) fn write_fraction(f: &mut fmt::Formatter<'_>, nanos: u32) -> fmt::Result {
    if nanos == 0 {
        Ok(())
    } else if nanos % 1_000_000 == 0 {
        write!(f, ".{:03}", nanos / 1_000_000)
    } else if nanos % 1_000 == 0 {
        write!(f, ".{:06}", nanos / 1_000)
    } else {
        write!(f, ".{nanos:09}")
    }
}

fn fmt_time(time: &NaiveTime, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}:{:02}", time.hour(), time.minute())?;
    // A leap second is carried in the nanosecond field past 1e9 and prints as `:60`.
    let leap = time.nanosecond() >= 1_000_000_000;
    let second = time.second() + u32::from(leap);
    let nanos = time.nanosecond() % 1_000_000_000;
    if second != 0 || nanos != 0 {
        write!(f, ":{second:02}")?;
        write_fraction(f, nanos)?;
    }
    Ok(())
}

/// Tries the long form (seconds, optional fraction) then the short `HH:MM` form.
fn parse_with_fallback<T>(
    text: &str,
    parse: impl Fn(&str, &str) -> Result<T, chrono::ParseError>,
    long: &str,
    short: &str,
) -> Result<T, chrono::ParseError> {
    parse(text, long).or_else(|long_err| parse(text, short).map_err(|_| long_err))
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(chrono::Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(chrono::Days::new(days.unsigned_abs()))
    }
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Implementations
// ═══════════════════════════════════════════════════════════════════════════

impl CivilInstant for NaiveDate {
    const LABEL: &'static str = "date";

    fn example() -> Self {
        NaiveDate::from_ymd_opt(2012, 4, 1).unwrap_or_default()
    }

    fn accepts(offset: Offset) -> bool {
        match offset {
            Offset::Exact(duration) => duration.whole_days().is_some(),
            Offset::Calendar(_) => true,
        }
    }

    fn add_duration(&self, duration: Duration) -> Option<Self> {
        add_days(*self, duration.whole_days()?)
    }

    fn add_period(&self, period: Period) -> Option<Self> {
        let shifted = add_months(*self, period.total_months())?;
        add_days(shifted, i64::from(period.days()))
    }

    fn difference(&self, earlier: &Self) -> Duration {
        Duration::from_time_delta(self.signed_duration_since(*earlier))
    }

    fn predecessor(&self) -> Option<Self> {
        self.pred_opt()
    }

    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
    }

    fn fmt_iso(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(DATE_FORMAT))
    }
}

impl CalendarInstant for NaiveDate {
    #[inline]
    fn date(&self) -> NaiveDate {
        *self
    }

    #[inline]
    fn from_date(date: NaiveDate) -> Self {
        date
    }
}

impl CivilInstant for NaiveDateTime {
    const LABEL: &'static str = "date-time";

    fn example() -> Self {
        NaiveDate::example().and_time(NaiveTime::example())
    }

    fn add_duration(&self, duration: Duration) -> Option<Self> {
        self.checked_add_signed(duration.to_time_delta()?)
    }

    fn add_period(&self, period: Period) -> Option<Self> {
        Some(NaiveDateTime::date(self).add_period(period)?.and_time(self.time()))
    }

    fn difference(&self, earlier: &Self) -> Duration {
        Duration::from_time_delta(self.signed_duration_since(*earlier))
    }

    fn predecessor(&self) -> Option<Self> {
        self.checked_sub_signed(TimeDelta::nanoseconds(1))
    }

    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        parse_with_fallback(
            text,
            NaiveDateTime::parse_from_str,
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        )
    }

    fn fmt_iso(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        NaiveDateTime::date(self).fmt_iso(f)?;
        f.write_str("T")?;
        fmt_time(&self.time(), f)
    }
}

impl CalendarInstant for NaiveDateTime {
    #[inline]
    fn date(&self) -> NaiveDate {
        NaiveDateTime::date(self)
    }

    #[inline]
    fn from_date(date: NaiveDate) -> Self {
        date.and_time(NaiveTime::MIN)
    }
}

impl CivilInstant for NaiveTime {
    const LABEL: &'static str = "time";

    fn example() -> Self {
        NaiveTime::from_hms_opt(14, 15, 0).unwrap_or_default()
    }

    fn accepts(offset: Offset) -> bool {
        match offset {
            Offset::Exact(_) => true,
            Offset::Calendar(period) => period.is_zero(),
        }
    }

    fn add_duration(&self, duration: Duration) -> Option<Self> {
        let (time, wrapped) = self.overflowing_add_signed(duration.to_time_delta()?);
        (wrapped == 0).then_some(time)
    }

    fn add_period(&self, period: Period) -> Option<Self> {
        period.is_zero().then_some(*self)
    }

    fn difference(&self, earlier: &Self) -> Duration {
        Duration::from_time_delta(self.signed_duration_since(*earlier))
    }

    fn predecessor(&self) -> Option<Self> {
        let (time, wrapped) = self.overflowing_sub_signed(TimeDelta::nanoseconds(1));
        (wrapped == 0).then_some(time)
    }

    fn parse_iso(text: &str) -> Result<Self, chrono::ParseError> {
        parse_with_fallback(text, NaiveTime::parse_from_str, "%H:%M:%S%.f", "%H:%M")
    }

    fn fmt_iso(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_time(self, f)
    }
}

/// Adapter that prints a point in its canonical form through `Display`.
pub(crate) struct Iso<'a, T>(pub(crate) &'a T);

impl<T: CivilInstant> fmt::Display for Iso<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_iso(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        date(y, mo, d).and_hms_opt(h, mi, 0).unwrap()
    }

    fn iso<T: CivilInstant>(value: T) -> String {
        Iso(&value).to_string()
    }

    #[test]
    fn test_datetime_canonical_form_omits_zero_seconds() {
        assert_eq!(iso(datetime(2012, 4, 1, 14, 15)), "2012-04-01T14:15");
        let with_secs = date(2012, 4, 1).and_hms_opt(14, 15, 30).unwrap();
        assert_eq!(iso(with_secs), "2012-04-01T14:15:30");
    }

    #[test]
    fn test_fraction_uses_shortest_group() {
        let millis = NaiveTime::from_hms_milli_opt(1, 2, 3, 450).unwrap();
        let micros = NaiveTime::from_hms_micro_opt(1, 2, 3, 450_001).unwrap();
        let nanos = NaiveTime::from_hms_nano_opt(1, 2, 0, 7).unwrap();
        assert_eq!(iso(millis), "01:02:03.450");
        assert_eq!(iso(micros), "01:02:03.450001");
        assert_eq!(iso(nanos), "01:02:00.000000007");
    }

    #[test]
    fn test_parse_accepts_short_and_long_forms() {
        assert_eq!(
            NaiveDateTime::parse_iso("2012-04-01T14:15").unwrap(),
            datetime(2012, 4, 1, 14, 15)
        );
        assert_eq!(
            NaiveDateTime::parse_iso("2012-04-01T14:15:00.000").unwrap(),
            datetime(2012, 4, 1, 14, 15)
        );
        assert_eq!(
            NaiveTime::parse_iso("01:02:03.450").unwrap(),
            NaiveTime::from_hms_milli_opt(1, 2, 3, 450).unwrap()
        );
        assert_eq!(NaiveDate::parse_iso("2020-02-29").unwrap(), date(2020, 2, 29));
    }

    #[test]
    fn test_parse_rejects_reduced_and_infinite_forms() {
        assert!(NaiveDate::parse_iso("2012-092").is_err());
        assert!(NaiveDate::parse_iso("2012-W13-7").is_err());
        assert!(NaiveDate::parse_iso("04-05").is_err());
        assert!(NaiveDateTime::parse_iso("+∞").is_err());
        assert!(NaiveDateTime::parse_iso("-∞").is_err());
        assert!(NaiveDateTime::parse_iso("2012-04-01").is_err());
        assert!(NaiveTime::parse_iso("1415").is_err());
    }

    #[test]
    fn test_period_on_leap_day_clamps() {
        let leap = date(2020, 2, 29);
        assert_eq!(leap.add_period(Period::from_years(1)), Some(date(2021, 2, 28)));
        assert_eq!(
            date(2021, 1, 31).add_period(Period::from_months(1)),
            Some(date(2021, 2, 28))
        );
        assert_eq!(
            date(2021, 3, 31).add_period(Period::from_months(-1)),
            Some(date(2021, 2, 28))
        );
    }

    #[test]
    fn test_date_rejects_fractional_days() {
        let d = date(2020, 1, 1);
        assert_eq!(d.add_duration(Duration::from_days(2)), Some(date(2020, 1, 3)));
        assert_eq!(d.add_duration(Duration::from_hours(25)), None);
    }

    #[test]
    fn test_time_of_day_does_not_wrap() {
        let t = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(
            t.add_duration(Duration::from_minutes(59)),
            NaiveTime::from_hms_opt(23, 59, 0)
        );
        assert_eq!(t.add_duration(Duration::from_hours(1)), None);
        assert_eq!(t.add_period(Period::ZERO), Some(t));
        assert_eq!(t.add_period(Period::from_days(1)), None);
        assert_eq!(NaiveTime::MIN.predecessor(), None);
    }

    #[test]
    fn test_datetime_period_keeps_time_of_day() {
        let dt = datetime(2019, 1, 31, 10, 30);
        assert_eq!(
            dt.add_period(Period::new(0, 1, 1)),
            Some(datetime(2019, 3, 1, 10, 30))
        );
        assert_eq!(
            dt.sub_offset(Offset::Exact(Duration::from_hours(11))),
            Some(datetime(2019, 1, 30, 23, 30))
        );
    }

    #[test]
    fn test_difference_and_predecessor() {
        let a = datetime(2020, 1, 1, 0, 0);
        let b = datetime(2020, 1, 2, 1, 0);
        assert_eq!(b.difference(&a), Duration::from_hours(25));
        assert_eq!(date(2020, 3, 1).difference(&date(2020, 2, 1)), Duration::from_days(29));
        assert_eq!(
            a.predecessor(),
            Some(date(2019, 12, 31).and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap())
        );
        assert_eq!(date(2020, 3, 1).predecessor(), Some(date(2020, 2, 29)));
    }

    #[test]
    fn test_leap_second_prints_as_sixty() {
        let leap = date(2016, 12, 31).and_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        assert_eq!(iso(leap), "2016-12-31T23:59:60.500");
        assert_eq!(NaiveDateTime::parse_iso("2016-12-31T23:59:60.500").unwrap(), leap);
        let whole = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_000).unwrap();
        assert_eq!(iso(whole), "23:59:60");
    }

    #[test]
    fn test_offset_applicability_per_flavor() {
        assert!(NaiveDate::accepts(Offset::Exact(Duration::from_days(2))));
        assert!(!NaiveDate::accepts(Offset::Exact(Duration::from_hours(12))));
        assert!(NaiveTime::accepts(Offset::Exact(Duration::from_hours(12))));
        assert!(!NaiveTime::accepts(Offset::Calendar(Period::from_days(1))));
        assert!(NaiveDateTime::accepts(Offset::Calendar(Period::from_months(1))));
    }

    #[test]
    fn test_calendar_day_boundaries() {
        let dt = datetime(2020, 12, 31, 18, 0);
        assert_eq!(dt.day_start(), datetime(2020, 12, 31, 0, 0));
        assert_eq!(dt.next_day_start(), Some(datetime(2021, 1, 1, 0, 0)));
        assert!(!dt.is_day_start());
        assert!(datetime(2021, 1, 1, 0, 0).is_day_start());
        assert!(date(2021, 1, 1).is_day_start());
        assert_eq!(date(2021, 1, 1).next_day_start(), Some(date(2021, 1, 2)));
    }
}
