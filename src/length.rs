// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Exact and calendar lengths.
//!
//! - [`Duration`]: exact machine time, a signed count of nanoseconds. Added
//!   to a point by pure arithmetic.
//! - [`Period`]: calendar length in years, months and days. Added to a point
//!   field by field, clamping to month ends (Feb 29 + 1 year = Feb 28).
//! - [`Offset`]: either of the above, as accepted by interval arithmetic.
//!
//! Both lengths print and parse the ISO-8601 `P...` notation. A token is a
//! [`Duration`] when it carries a time designator `T`, otherwise a [`Period`].

use crate::error::{Error, Result};
use crate::instant::write_fraction;
use qtty::{Day, Days, Seconds};
use regex::Regex;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use std::sync::OnceLock;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// An exact, signed amount of elapsed time with nanosecond resolution.
///
/// A day in a `Duration` is always 24 hours.
///
/// # Examples
///
/// ```
/// use tempspan::Duration;
///
/// let d: Duration = "P4DT1H45M".parse().unwrap();
/// assert_eq!(d, Duration::from_hours(97) + Duration::from_minutes(45));
/// assert_eq!(d.to_string(), "PT97H45M");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    nanos: i128,
}

impl Duration {
    /// The zero-length duration.
    pub const ZERO: Self = Self { nanos: 0 };

    /// Exact nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    /// Whole seconds.
    #[inline]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self::from_nanos(seconds as i128 * NANOS_PER_SECOND)
    }

    /// Whole minutes of 60 seconds.
    #[inline]
    pub const fn from_minutes(minutes: i64) -> Self {
        Self::from_nanos(minutes as i128 * NANOS_PER_MINUTE)
    }

    /// Whole hours of 60 minutes.
    #[inline]
    pub const fn from_hours(hours: i64) -> Self {
        Self::from_nanos(hours as i128 * NANOS_PER_HOUR)
    }

    /// Exact days of 24 hours.
    #[inline]
    pub const fn from_days(days: i64) -> Self {
        Self::from_nanos(days as i128 * NANOS_PER_DAY)
    }

    /// Total length in nanoseconds.
    #[inline]
    pub const fn as_nanos(&self) -> i128 {
        self.nanos
    }

    /// Length in seconds as a typed quantity.
    pub fn as_seconds(&self) -> Seconds {
        Seconds::new(self.nanos as f64 / NANOS_PER_SECOND as f64)
    }

    /// Length in days as a typed quantity.
    pub fn as_days(&self) -> Days {
        self.as_seconds().to::<Day>()
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    /// Number of whole days, if this duration is an exact multiple of 24 hours.
    pub fn whole_days(&self) -> Option<i64> {
        if self.nanos % NANOS_PER_DAY == 0 {
            i64::try_from(self.nanos / NANOS_PER_DAY).ok()
        } else {
            None
        }
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.nanos.checked_add(other.nanos).map(Self::from_nanos)
    }

    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        self.nanos.checked_mul(i128::from(factor)).map(Self::from_nanos)
    }

    /// Convert to chrono's duration type, if it fits.
    pub fn to_time_delta(&self) -> Option<chrono::TimeDelta> {
        let seconds = i64::try_from(self.nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
        let subsec = self.nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        chrono::TimeDelta::new(seconds, subsec)
    }

    pub fn from_time_delta(delta: chrono::TimeDelta) -> Self {
        Self::from_nanos(
            i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos()),
        )
    }

    /// Whole seconds for single-column storage, rounding half to even.
    pub fn to_storage_seconds(&self) -> i64 {
        let seconds = self.nanos.div_euclid(NANOS_PER_SECOND);
        let remainder = self.nanos.rem_euclid(NANOS_PER_SECOND);
        let half = NANOS_PER_SECOND / 2;
        let rounded = if remainder > half || (remainder == half && seconds.rem_euclid(2) == 1) {
            seconds + 1
        } else {
            seconds
        };
        i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
    }

    /// Inverse of [`Duration::to_storage_seconds`].
    #[inline]
    pub const fn from_storage_seconds(seconds: i64) -> Self {
        Self::from_seconds(seconds)
    }

    /// Parse the ISO-8601 `PnDTnHnMn.nS` notation.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::LengthParse {
            token: text.to_owned(),
        };
        let caps = duration_pattern().captures(text).ok_or_else(invalid)?;

        let fields = [
            (caps.get(2), NANOS_PER_DAY),
            (caps.get(4), NANOS_PER_HOUR),
            (caps.get(5), NANOS_PER_MINUTE),
            (caps.get(6), NANOS_PER_SECOND),
        ];
        if fields.iter().all(|(field, _)| field.is_none()) {
            return Err(invalid());
        }
        let has_time_part = caps.get(3).is_some();
        if has_time_part && fields[1..].iter().all(|(field, _)| field.is_none()) {
            return Err(invalid());
        }

        let mut nanos: i128 = 0;
        for (field, unit) in fields {
            if let Some(field) = field {
                let value: i64 = field.as_str().parse().map_err(|_| invalid())?;
                nanos += i128::from(value) * unit;
            }
        }
        if let Some(fraction) = caps.get(7) {
            let padded = format!("{:0<9}", fraction.as_str());
            let frac: i128 = padded.parse().map_err(|_| invalid())?;
            let seconds_negative = caps.get(6).is_some_and(|s| s.as_str().starts_with('-'));
            nanos += if seconds_negative { -frac } else { frac };
        }
        if caps.get(1).is_some_and(|sign| sign.as_str() == "-") {
            nanos = -nanos;
        }
        Ok(Self::from_nanos(nanos))
    }
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^([-+]?)P(?:([-+]?[0-9]+)D)?(?:(T)(?:([-+]?[0-9]+)H)?(?:([-+]?[0-9]+)M)?(?:([-+]?[0-9]+)(?:[.,]([0-9]{1,9}))?S)?)?$",
        )
        .expect("duration pattern is a valid regex")
    })
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("PT0S");
        }
        if self.nanos < 0 {
            f.write_str("-")?;
        }
        let total = self.nanos.unsigned_abs();
        let hours = total / NANOS_PER_HOUR as u128;
        let minutes = (total / NANOS_PER_MINUTE as u128) % 60;
        let seconds = (total / NANOS_PER_SECOND as u128) % 60;
        let fraction = (total % NANOS_PER_SECOND as u128) as u32;

        f.write_str("PT")?;
        if hours != 0 {
            write!(f, "{hours}H")?;
        }
        if minutes != 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds != 0 || fraction != 0 {
            write!(f, "{seconds}")?;
            write_fraction(f, fraction)?;
            f.write_str("S")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Add for Duration {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_nanos(self.nanos + rhs.nanos)
    }
}

impl Sub for Duration {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_nanos(self.nanos - rhs.nanos)
    }
}

impl Neg for Duration {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Self::from_nanos(-self.nanos)
    }
}

impl From<chrono::TimeDelta> for Duration {
    #[inline]
    fn from(delta: chrono::TimeDelta) -> Self {
        Self::from_time_delta(delta)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Period
// ═══════════════════════════════════════════════════════════════════════════

/// A calendar length in years, months and days.
///
/// Years and months are applied first (clamping to the end of the month),
/// then days.
///
/// # Examples
///
/// ```
/// use tempspan::Period;
///
/// let p: Period = "P1Y2M3W".parse().unwrap();
/// assert_eq!(p, Period::new(1, 2, 21));
/// assert_eq!(p.to_string(), "P1Y2M21D");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
}

impl Period {
    /// The zero-length period.
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Calendar years.
    pub const fn from_years(years: i32) -> Self {
        Self::new(years, 0, 0)
    }

    /// Calendar months.
    pub const fn from_months(months: i32) -> Self {
        Self::new(0, months, 0)
    }

    /// Weeks of seven days, or `None` if the day count overflows.
    pub const fn from_weeks(weeks: i32) -> Option<Self> {
        match weeks.checked_mul(7) {
            Some(days) => Some(Self::from_days(days)),
            None => None,
        }
    }

    /// Calendar days.
    pub const fn from_days(days: i32) -> Self {
        Self::new(0, 0, days)
    }

    #[inline]
    pub const fn years(&self) -> i32 {
        self.years
    }

    #[inline]
    pub const fn months(&self) -> i32 {
        self.months
    }

    #[inline]
    pub const fn days(&self) -> i32 {
        self.days
    }

    /// Years and months folded into a month count.
    #[inline]
    pub const fn total_months(&self) -> i64 {
        self.years as i64 * 12 + self.months as i64
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Whether any field is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        let factor = i32::try_from(factor).ok()?;
        Some(Self::new(
            self.years.checked_mul(factor)?,
            self.months.checked_mul(factor)?,
            self.days.checked_mul(factor)?,
        ))
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.checked_mul(-1)
    }

    /// Parse the ISO-8601 `PnYnMnWnD` notation.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::LengthParse {
            token: text.to_owned(),
        };
        let caps = period_pattern().captures(text).ok_or_else(invalid)?;
        if (2..=5).all(|i| caps.get(i).is_none()) {
            return Err(invalid());
        }

        let field = |i: usize| -> Result<i32> {
            caps.get(i)
                .map_or(Ok(0), |m| m.as_str().parse::<i32>())
                .map_err(|_| invalid())
        };
        let weeks = field(4)?;
        let days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(field(5).ok()?))
            .ok_or_else(invalid)?;
        let period = Self::new(field(2)?, field(3)?, days);

        if caps.get(1).is_some_and(|sign| sign.as_str() == "-") {
            period.checked_neg().ok_or_else(invalid)
        } else {
            Ok(period)
        }
    }
}

fn period_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^([-+]?)P(?:([-+]?[0-9]+)Y)?(?:([-+]?[0-9]+)M)?(?:([-+]?[0-9]+)W)?(?:([-+]?[0-9]+)D)?$",
        )
        .expect("period pattern is a valid regex")
    })
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Offset
// ═══════════════════════════════════════════════════════════════════════════

/// An amount to shift or step by: exact or calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offset {
    Exact(Duration),
    Calendar(Period),
}

impl Offset {
    /// Resolve a relative grammar token: `T` selects exact time.
    pub fn parse(token: &str) -> Result<Self> {
        if token.contains('T') {
            Duration::parse(token).map(Offset::Exact)
        } else {
            Period::parse(token).map(Offset::Calendar)
        }
    }

    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        match self {
            Offset::Exact(d) => d.checked_mul(factor).map(Offset::Exact),
            Offset::Calendar(p) => p.checked_mul(factor).map(Offset::Calendar),
        }
    }

    pub fn negated(self) -> Option<Self> {
        match self {
            Offset::Exact(d) => d.nanos.checked_neg().map(|n| Offset::Exact(Duration::from_nanos(n))),
            Offset::Calendar(p) => p.checked_neg().map(Offset::Calendar),
        }
    }

    /// Whether stepping by this offset always moves forward.
    pub fn is_forward(&self) -> bool {
        match self {
            Offset::Exact(d) => d.nanos > 0,
            Offset::Calendar(p) => !p.is_zero() && !p.is_negative(),
        }
    }
}

impl From<Duration> for Offset {
    #[inline]
    fn from(duration: Duration) -> Self {
        Offset::Exact(duration)
    }
}

impl From<Period> for Offset {
    #[inline]
    fn from(period: Period) -> Self {
        Offset::Calendar(period)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Exact(d) => fmt::Display::fmt(d, f),
            Offset::Calendar(p) => fmt::Display::fmt(p, f),
        }
    }
}

impl FromStr for Offset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_parse_with_day_part() {
        let d = Duration::parse("P4DT1H45M").unwrap();
        assert_eq!(d.as_nanos(), (4 * 24 * 60 + 105) as i128 * 60 * NANOS_PER_SECOND);
    }

    #[test]
    fn test_duration_parse_fraction_and_signs() {
        assert_eq!(
            Duration::parse("PT1.5S").unwrap(),
            Duration::from_nanos(1_500_000_000)
        );
        assert_eq!(
            Duration::parse("PT-0.25S").unwrap(),
            Duration::from_nanos(-250_000_000)
        );
        assert_eq!(Duration::parse("-PT2H").unwrap(), Duration::from_hours(-2));
        assert_eq!(
            Duration::parse("PT2H-30M").unwrap(),
            Duration::from_minutes(90)
        );
    }

    #[test]
    fn test_duration_parse_rejects_malformed() {
        for bad in ["P", "PT", "P1DT", "PT1.S", "1H", "PT1H2H", "PT1.0000000001S", "P1Y"] {
            assert!(Duration::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::from_minutes(105).to_string(), "PT1H45M");
        assert_eq!(Duration::from_nanos(-1_500_000_000).to_string(), "-PT1.500S");
        assert_eq!(Duration::from_days(2).to_string(), "PT48H");
    }

    #[test]
    fn test_duration_time_delta_conversion() {
        let d = Duration::from_nanos(-1_500_000_000);
        let delta = d.to_time_delta().unwrap();
        assert_eq!(delta.num_milliseconds(), -1_500);
        assert_eq!(Duration::from_time_delta(delta), d);
        assert_eq!(Duration::from(chrono::TimeDelta::hours(3)), Duration::from_hours(3));
    }

    #[test]
    fn test_storage_seconds_round_half_to_even() {
        let cases = [
            (2_500_000_000, 2),
            (3_500_000_000, 4),
            (-1_500_000_000, -2),
            (-500_000_000, 0),
            (1_499_999_999, 1),
            (1_500_000_001, 2),
        ];
        for (nanos, expected) in cases {
            assert_eq!(Duration::from_nanos(nanos).to_storage_seconds(), expected);
        }
        assert_eq!(Duration::from_storage_seconds(90), Duration::from_minutes(1) + Duration::from_seconds(30));
    }

    #[test]
    fn test_duration_quantities() {
        let d = Duration::from_hours(36);
        assert_eq!(d.as_seconds(), Seconds::new(129_600.0));
        assert!((d.as_days() - Days::new(1.5)).abs() < Days::new(1e-12));
        assert_eq!(d.whole_days(), None);
        assert_eq!(Duration::from_days(3).whole_days(), Some(3));
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!(Period::parse("P1Y2M3D").unwrap(), Period::new(1, 2, 3));
        assert_eq!(Period::parse("P2W").unwrap(), Period::from_days(14));
        assert_eq!(Period::parse("-P1M").unwrap(), Period::from_months(-1));
        assert_eq!(Period::parse("P-1Y1M").unwrap(), Period::new(-1, 1, 0));
        assert_eq!(Period::ZERO.to_string(), "P0D");
        assert_eq!(Period::new(-1, 1, 0).to_string(), "P-1Y1M");
    }

    #[test]
    fn test_period_parse_rejects_malformed() {
        for bad in ["P", "P1H", "P1D1Y", "PT1H", "1Y", "P99999999999D"] {
            assert!(Period::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_offset_disambiguates_on_time_designator() {
        assert_eq!(
            Offset::parse("P1DT0H").unwrap(),
            Offset::Exact(Duration::from_days(1))
        );
        assert_eq!(
            Offset::parse("P1D").unwrap(),
            Offset::Calendar(Period::from_days(1))
        );
    }

    #[test]
    fn test_period_from_weeks_is_checked() {
        assert_eq!(Period::from_weeks(3), Some(Period::from_days(21)));
        assert_eq!(Period::from_weeks(-1), Some(Period::from_days(-7)));
        assert_eq!(Period::from_weeks(i32::MAX), None);
    }

    #[test]
    fn test_offset_direction() {
        assert!(Offset::from(Duration::from_seconds(1)).is_forward());
        assert!(!Offset::from(Duration::ZERO).is_forward());
        assert!(Offset::from(Period::new(0, 1, 0)).is_forward());
        assert!(!Offset::from(Period::new(0, 1, -1)).is_forward());
        assert_eq!(
            Offset::from(Period::new(1, 0, 2)).checked_mul(3),
            Some(Offset::Calendar(Period::new(3, 0, 6)))
        );
        assert_eq!(
            Offset::from(Duration::from_hours(1)).negated(),
            Some(Offset::Exact(Duration::from_hours(-1)))
        );
    }
}
