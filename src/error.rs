// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types shared by every interval operation.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of interval construction, parsing and arithmetic.
///
/// Point-level syntax errors ([`Error::PointParse`]) are kept apart from
/// interval-shape errors ([`Error::Grammar`]) so callers can tell a bad
/// date from a bad combination of tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A finite start lies after a finite end.
    #[error("invalid bounds: start {start} is after end {end}")]
    InvalidBounds { start: String, end: String },

    /// The interval text combines its tokens in an unsupported way.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The underlying civil point grammar rejected a token.
    #[error("cannot parse '{token}' as a civil point: {source}")]
    PointParse {
        token: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A relative token is not a valid ISO-8601 duration or period.
    #[error("cannot parse '{token}' as a duration or period")]
    LengthParse { token: String },

    /// Applying an offset leaves the range of the point type, or the offset
    /// has no meaning for it (e.g. a fractional day added to a date).
    #[error("offset {offset} is not representable for this point type")]
    Unrepresentable { offset: String },

    /// `collapse` needs a finite start.
    #[error("cannot collapse an interval with an unbounded start")]
    UnboundedCollapse,

    /// `duration` needs both bounds finite.
    #[error("an unbounded interval has no finite duration")]
    UnboundedDuration,

    /// Iteration and slicing need both bounds finite.
    #[error("cannot iterate over an unbounded interval")]
    UnboundedIteration,

    /// Iteration steps must move strictly forward.
    #[error("step {step} does not advance")]
    InvalidStep { step: String },
}

/// Structural rejection of an interval text by the interval grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid interval '{text}': {kind}")]
pub struct GrammarError {
    text: String,
    kind: GrammarErrorKind,
}

impl GrammarError {
    pub(crate) fn new(text: &str, kind: GrammarErrorKind) -> Self {
        Self {
            text: text.to_owned(),
            kind,
        }
    }

    /// The rejected input.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Which grammar rule was violated.
    pub fn kind(&self) -> GrammarErrorKind {
        self.kind
    }
}

/// Grammar rules an interval text can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarErrorKind {
    /// No `/` between the two tokens.
    MissingSeparator,
    /// Both sides are relative lengths.
    AmbiguousLength,
    /// A relative length faces the unbounded sentinel.
    RelativeWithUnbounded,
}

impl fmt::Display for GrammarErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            GrammarErrorKind::MissingSeparator => "expected '<start>/<end>'",
            GrammarErrorKind::AmbiguousLength => {
                "a unique duration cannot be resolved without a concrete endpoint"
            }
            GrammarErrorKind::RelativeWithUnbounded => {
                "a relative length is incompatible with an unbounded endpoint"
            }
        };
        f.write_str(message)
    }
}
