// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Interval text grammar.
//!
//! The canonical form is `<start>/<end>`, each token being one of:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | ISO point (`2012-04-01T14:15`) | finite bound |
//! | `-` | unbounded side |
//! | `P...` | length relative to the other, concrete side |
//!
//! A relative token with a time designator `T` is an exact [`Duration`];
//! without one it is a calendar [`Period`](crate::Period). Two relative
//! tokens, or a relative token facing `-`, are rejected with a
//! [`GrammarError`]. Printing always emits explicit points and `-`.
//!
//! [`Duration`]: crate::Duration

use crate::error::{Error, GrammarError, GrammarErrorKind, Result};
use crate::instant::{CivilInstant, Iso};
use crate::interval::{Bound, Interval};
use crate::length::Offset;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const UNBOUNDED: &str = "-";
const SEPARATOR: char = '/';

enum Token<'a, T> {
    Point(T),
    Unbounded,
    Relative(&'a str),
}

impl<'a, T: CivilInstant> Token<'a, T> {
    fn classify(raw: &'a str) -> Result<Self> {
        if raw == UNBOUNDED {
            Ok(Token::Unbounded)
        } else if raw.starts_with('P') {
            Ok(Token::Relative(raw))
        } else {
            T::parse_iso(raw)
                .map(Token::Point)
                .map_err(|source| Error::PointParse {
                    token: raw.to_owned(),
                    source,
                })
        }
    }
}

/// Canonical text of `interval`.
pub fn encode<T: CivilInstant>(interval: &Interval<T>) -> String {
    interval.to_string()
}

/// Parses an interval text.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDateTime;
/// use tempspan::{decode, Bound};
///
/// let span = decode::<NaiveDateTime>("2012-04-01T14:15/P4DT1H45M").unwrap();
/// assert_eq!(span.to_string(), "2012-04-01T14:15/2012-04-05T16:00");
///
/// let open = decode::<NaiveDateTime>("2012-04-01T14:15/-").unwrap();
/// assert_eq!(open.end(), Bound::Unbounded);
/// ```
pub fn decode<T: CivilInstant>(text: &str) -> Result<Interval<T>> {
    tracing::trace!(text, "decoding interval");
    let grammar = |kind| {
        tracing::debug!(text, %kind, "interval text rejected");
        Error::Grammar(GrammarError::new(text, kind))
    };

    let (start, end) = text
        .split_once(SEPARATOR)
        .ok_or_else(|| grammar(GrammarErrorKind::MissingSeparator))?;

    // Shape rules come first so they are reported even when a point is also malformed.
    let start_relative = start.starts_with('P');
    let end_relative = end.starts_with('P');
    if start_relative && end_relative {
        return Err(grammar(GrammarErrorKind::AmbiguousLength));
    }
    if (start_relative && end == UNBOUNDED) || (end_relative && start == UNBOUNDED) {
        return Err(grammar(GrammarErrorKind::RelativeWithUnbounded));
    }

    match (Token::<T>::classify(start)?, Token::<T>::classify(end)?) {
        (Token::Point(s), Token::Relative(raw)) => {
            let offset = Offset::parse(raw)?;
            let e = s.add_offset(offset).ok_or_else(|| Error::Unrepresentable {
                offset: offset.to_string(),
            })?;
            Interval::new(s, e)
        }
        (Token::Relative(raw), Token::Point(e)) => {
            let offset = Offset::parse(raw)?;
            let s = e.sub_offset(offset).ok_or_else(|| Error::Unrepresentable {
                offset: offset.to_string(),
            })?;
            Interval::new(s, e)
        }
        (s, e) => Interval::between(s.into_bound(), e.into_bound()),
    }
}

impl<T> Token<'_, T> {
    fn into_bound(self) -> Bound<T> {
        match self {
            Token::Point(t) => Bound::Finite(t),
            // Relative tokens are resolved before reaching here.
            Token::Unbounded | Token::Relative(_) => Bound::Unbounded,
        }
    }
}

struct BoundText<'a, T>(&'a Bound<T>);

impl<T: CivilInstant> fmt::Display for BoundText<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Bound::Finite(t) => write!(f, "{}", Iso(t)),
            Bound::Unbounded => f.write_str(UNBOUNDED),
        }
    }
}

impl<T: CivilInstant> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            BoundText(&self.start()),
            SEPARATOR,
            BoundText(&self.end())
        )
    }
}

impl<T: CivilInstant> FromStr for Interval<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode(s)
    }
}

impl<T: CivilInstant> Interval<T> {
    /// Parses an interval text; see [`decode`].
    #[inline]
    pub fn parse(text: &str) -> Result<Self> {
        decode(text)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────
//
// Intervals and lengths travel as their canonical strings.

#[cfg(feature = "serde")]
struct TextVisitor<V>(std::marker::PhantomData<V>);

#[cfg(feature = "serde")]
impl<V> de::Visitor<'_> for TextVisitor<V>
where
    V: FromStr<Err = Error>,
{
    type Value = V;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ISO-8601 interval, duration or period string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<V, E> {
        v.parse().map_err(E::custom)
    }
}

#[cfg(feature = "serde")]
macro_rules! impl_serde_as_text {
    ($ty:ty $(, $generic:ident)?) => {
        impl$(<$generic: CivilInstant>)? Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de $(, $generic: CivilInstant)?> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_str(TextVisitor(std::marker::PhantomData))
            }
        }
    };
}

#[cfg(feature = "serde")]
impl_serde_as_text!(Interval<T>, T);
#[cfg(feature = "serde")]
impl_serde_as_text!(crate::length::Duration);
#[cfg(feature = "serde")]
impl_serde_as_text!(crate::length::Period);
