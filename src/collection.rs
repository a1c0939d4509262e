// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Operations over collections of intervals.

use crate::instant::CivilInstant;
use crate::interval::Interval;

impl<T: CivilInstant> Interval<T> {
    /// The smallest interval covering `self` and every present interval in
    /// `others`.
    ///
    /// Absent (`None`) entries are skipped and the result never narrows
    /// `self`. An unbounded side on any input makes that side unbounded.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use tempspan::Interval;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
    /// let a = Interval::new(day(1), day(3)).unwrap();
    /// let b = Interval::new(day(10), day(12)).unwrap();
    ///
    /// assert_eq!(a.expand([Some(&b), None]), Interval::new(day(1), day(12)).unwrap());
    /// ```
    pub fn expand<'a, I>(&self, others: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<&'a Interval<T>>>,
        T: 'a,
    {
        let (lower, upper) = others
            .into_iter()
            .filter_map(|other| -> Option<&'a Interval<T>> { other.into() })
            .fold((self.lower(), self.upper()), |(lower, upper), other| {
                (lower.min(other.lower()), upper.max(other.upper()))
            });
        Self::from_edges(lower, upper)
    }
}

/// The smallest interval covering all `intervals`, or `None` if there are none.
pub fn container_of<'a, T, I>(intervals: I) -> Option<Interval<T>>
where
    T: CivilInstant + 'a,
    I: IntoIterator<Item = &'a Interval<T>>,
{
    let mut intervals = intervals.into_iter();
    let first = intervals.next()?;
    Some(first.expand(intervals))
}

/// Returns the gaps (complement) of `intervals` within the bounding `outer` interval.
///
/// Given a sorted, non-overlapping list of intervals and a bounding interval,
/// this returns the spans of `outer` NOT covered by any of them, in order.
/// Parts of `intervals` outside `outer` are ignored. Runs in O(n) time with
/// a single pass.
pub fn complement_within<T: CivilInstant>(
    outer: Interval<T>,
    intervals: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut gaps = Vec::new();
    let mut cursor = outer.lower();
    for interval in intervals {
        let gap_end = interval.lower().min(outer.upper());
        if cursor < gap_end {
            gaps.push(Interval::from_edges(cursor, gap_end));
        }
        if interval.upper() > cursor {
            cursor = interval.upper();
        }
    }
    if cursor < outer.upper() {
        gaps.push(Interval::from_edges(cursor, outer.upper()));
    }
    gaps
}

/// Returns the intersection of two sorted, non-overlapping interval lists.
///
/// Uses an O(n+m) merge to find every overlapping span; spans that only
/// touch are not reported.
pub fn intersect_sorted<T: CivilInstant>(a: &[Interval<T>], b: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lower = a[i].lower().max(b[j].lower());
        let upper = a[i].upper().min(b[j].upper());
        if lower < upper {
            result.push(Interval::from_edges(lower, upper));
        }
        if a[i].upper() <= b[j].upper() {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    fn span(a: u32, b: u32) -> Interval<NaiveDate> {
        Interval::new(d(a), d(b)).unwrap()
    }

    #[test]
    fn test_container_of_spans_all() {
        let all = [span(5, 6), span(1, 3), span(10, 12)];
        assert_eq!(container_of(&all), Some(span(1, 12)));
        assert_eq!(container_of::<NaiveDate, _>(&[]), None);
    }

    #[test]
    fn test_container_of_unbounded_dominates() {
        let all = [span(5, 6), Interval::until(d(3)), Interval::since(d(20))];
        assert_eq!(container_of(&all), Some(Interval::forever()));
    }

    #[test]
    fn test_expand_never_narrows_and_skips_absent() {
        let base = span(1, 10);
        assert_eq!(base.expand([&span(2, 3)]), base);
        assert_eq!(base.expand([None, Some(&span(9, 15))]), span(1, 15));
        assert_eq!(base.expand(Vec::<Option<&Interval<NaiveDate>>>::new()), base);
        assert_eq!(
            base.expand([Some(&Interval::since(d(5)))]),
            Interval::since(d(1))
        );
    }

    #[test]
    fn test_complement_within_gaps() {
        let gaps = complement_within(span(1, 11), &[span(3, 5), span(7, 9)]);
        assert_eq!(gaps, vec![span(1, 3), span(5, 7), span(9, 11)]);
    }

    #[test]
    fn test_complement_within_empty_and_full() {
        assert_eq!(complement_within(span(1, 11), &[]), vec![span(1, 11)]);
        assert!(complement_within(span(1, 11), &[span(1, 11)]).is_empty());
        assert!(complement_within(span(3, 5), &[span(1, 20)]).is_empty());
    }

    #[test]
    fn test_complement_within_unbounded_outer() {
        let gaps = complement_within(Interval::forever(), &[span(3, 5)]);
        assert_eq!(gaps, vec![Interval::until(d(3)), Interval::since(d(5))]);
    }

    #[test]
    fn test_intersect_sorted() {
        let a = [span(2, 4), span(6, 10)];
        let b = [span(1, 3), span(4, 7), span(8, 9)];
        assert_eq!(intersect_sorted(&a, &b), vec![span(2, 3), span(6, 7), span(8, 9)]);
        assert!(intersect_sorted(&[span(1, 3)], &[span(3, 5)]).is_empty());
    }

    #[test]
    fn test_complement_intersect_roundtrip() {
        // above(min) ∩ complement(above(max)) = between(min, max)
        let outer = span(1, 11);
        let above_min = [span(2, 4), span(6, 10)];
        let above_max = [span(3, 5), span(8, 9)];
        let below_max = complement_within(outer, &above_max);
        let between = intersect_sorted(&above_min, &below_max);
        assert_eq!(between, vec![span(2, 3), span(6, 8), span(9, 10)]);
    }
}
