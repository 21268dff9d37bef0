//! Feature location model: simple spans, joined (spliced) spans, and
//! reverse-strand complements.

pub mod parser;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::strand::Strand;

pub use parser::parse_location;

/// A 1-based inclusive coordinate range.
///
/// Spans read from a feature table always satisfy `1 <= start <= end`. Gap
/// spans returned by [`gaps`] may be empty, in which case `end + 1 == start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The (possibly empty) range from `from` up to, not including, `next_start`.
    fn between(from: usize, next_start: usize) -> Self {
        Self {
            start: from,
            end: next_start.max(from) - 1,
        }
    }

    /// Number of bases covered.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        (self.end - self.start).saturating_add(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same bases expressed on the reverse strand of a sequence of
    /// `length` bases. Returns `None` if the span does not fit on that axis.
    #[must_use]
    pub fn mirror(&self, length: usize) -> Option<Self> {
        if self.start == 0 || self.end > length || self.is_empty() {
            return None;
        }
        Some(Self {
            start: length - self.end + 1,
            end: length - self.start + 1,
        })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A parsed feature location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// `start..end`
    Simple(Span),
    /// `complement(...)`: the inner location read on the reverse strand.
    Complement(Box<Location>),
    /// `join(...)`: spliced segments in transcription order. Never nested.
    Joined(Vec<Span>),
}

impl Location {
    /// Strand the location reads on.
    #[must_use]
    pub fn strand(&self) -> Strand {
        match self {
            Self::Simple(_) | Self::Joined(_) => Strand::Forward,
            Self::Complement(inner) => inner.strand().flip(),
        }
    }

    /// All spans in forward-strand coordinates, in the order they are written.
    #[must_use]
    pub fn parts(&self) -> Vec<Span> {
        match self {
            Self::Simple(span) => vec![*span],
            Self::Joined(parts) => parts.clone(),
            Self::Complement(inner) => inner.parts(),
        }
    }

    /// Outermost `(start, end)` covered by the location.
    #[must_use]
    pub fn bounds(&self) -> Option<(usize, usize)> {
        let parts = self.parts();
        let start = parts.iter().map(|s| s.start).min()?;
        let end = parts.iter().map(|s| s.end).max()?;
        Some((start, end))
    }

    /// Canonical joined form of the location on a sequence of `length` bases.
    ///
    /// Forward locations keep their spans. A complemented location is
    /// translated onto the reverse-strand axis: every span is mirrored and
    /// the order reversed, so the spans index into the reverse complement of
    /// the sequence and read 5' to 3'.
    pub fn to_joined(&self, length: usize) -> Result<(Vec<Span>, Strand), Error> {
        match self {
            Self::Simple(span) => Ok((vec![*span], Strand::Forward)),
            Self::Joined(parts) => Ok((parts.clone(), Strand::Forward)),
            Self::Complement(inner) => {
                let (parts, strand) = inner.to_joined(length)?;
                let mirrored = parts
                    .iter()
                    .rev()
                    .map(|span| {
                        span.mirror(length).ok_or_else(|| {
                            Error::Validation(format!(
                                "span {span} of location {self} lies outside a sequence of {length} bases"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((mirrored, strand.flip()))
            }
        }
    }

    /// Gaps around and between the forward-strand parts, up to `length`.
    #[must_use]
    pub fn inversed(&self, length: usize) -> Vec<Span> {
        gaps(&self.parts(), length)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(span) => write!(f, "{span}"),
            Self::Complement(inner) => write!(f, "complement({inner})"),
            Self::Joined(parts) => {
                write!(f, "join(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_location(s)
    }
}

/// Inversed locations of `parts` on a sequence of `length` bases: the gap
/// before the first part, between each pair of consecutive parts, and after
/// the last part.
///
/// Adjacent or overlapping parts yield an empty gap, which is kept so the
/// result always has `parts.len() + 1` entries.
#[must_use]
pub fn gaps(parts: &[Span], length: usize) -> Vec<Span> {
    let mut gaps = Vec::with_capacity(parts.len() + 1);
    let mut cursor = 1;
    for part in parts {
        gaps.push(Span::between(cursor, part.start));
        cursor = cursor.max(part.end.saturating_add(1));
    }
    gaps.push(Span::new(cursor, length.max(cursor - 1)));
    gaps
}
