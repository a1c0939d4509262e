// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Schema descriptions for API documentation generators.
//!
//! Every value type travels as a string, so a description is a format tag
//! plus one literal example produced by the same printer used on the wire.

use crate::instant::CivilInstant;
use crate::interval::Interval;
use crate::length::{Duration, Period};
use crate::text::encode;

/// Description of a value's wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Always `"string"`.
    pub type_name: &'static str,
    pub format: String,
    pub example: String,
}

impl Schema {
    fn string(format: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            type_name: "string",
            format: format.into(),
            example: example.into(),
        }
    }
}

impl<T: CivilInstant> Interval<T> {
    /// Schema for this interval flavor, e.g. format `date-time-interval`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tempspan::Interval;
    ///
    /// let schema = Interval::<NaiveDate>::schema();
    /// assert_eq!(schema.type_name, "string");
    /// assert_eq!(schema.format, "date-interval");
    /// assert_eq!(schema.example, "2012-04-01/2012-04-05");
    /// ```
    pub fn schema() -> Schema {
        let start = T::example();
        let end = [Duration::from_hours(2), Duration::from_days(4)]
            .into_iter()
            .find_map(|step| start.add_duration(step))
            .unwrap_or(start);
        let example = Interval::ordered(start, end);
        Schema::string(format!("{}-interval", T::LABEL), encode(&example))
    }
}

impl Duration {
    pub fn schema() -> Schema {
        Schema::string(
            "duration",
            (Duration::from_hours(1) + Duration::from_minutes(45)).to_string(),
        )
    }
}

impl Period {
    pub fn schema() -> Schema {
        Schema::string("period", Period::new(1, 2, 3).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    #[test]
    fn test_interval_schemas() {
        let dt = Interval::<NaiveDateTime>::schema();
        assert_eq!(dt.format, "date-time-interval");
        assert_eq!(dt.example, "2012-04-01T14:15/2012-04-01T16:15");

        let t = Interval::<NaiveTime>::schema();
        assert_eq!(t.format, "time-interval");
        assert_eq!(t.example, "14:15/16:15");

        let d = Interval::<NaiveDate>::schema();
        assert_eq!(d.example, "2012-04-01/2012-04-05");
    }

    #[test]
    fn test_schema_examples_parse_back() {
        let dt = Interval::<NaiveDateTime>::schema();
        assert!(dt.example.parse::<Interval<NaiveDateTime>>().is_ok());
        assert_eq!(
            Duration::schema().example.parse::<Duration>().unwrap(),
            Duration::from_minutes(105)
        );
        assert_eq!(Period::schema().example, "P1Y2M3D");
        assert_eq!(Period::schema().type_name, "string");
    }
}
