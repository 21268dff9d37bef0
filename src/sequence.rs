//! Nucleotide sequence read from a record's ORIGIN section.

use std::fmt;

use log::warn;

use crate::error::Error;
use crate::location::{Location, Span};

/// An immutable nucleotide sequence. Transformations return new instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    bases: Vec<u8>,
}

impl Sequence {
    #[must_use]
    pub fn new(bases: impl Into<Vec<u8>>) -> Self {
        Self {
            bases: bases.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    /// Bases covered by a 1-based inclusive span. Empty spans yield an empty slice.
    pub fn slice(&self, span: Span) -> Result<&[u8], Error> {
        if span.is_empty() {
            return Ok(&[]);
        }
        if span.start == 0 || span.end > self.bases.len() {
            return Err(Error::Validation(format!(
                "span {span} lies outside a sequence of {} bases",
                self.bases.len()
            )));
        }
        Ok(&self.bases[span.start - 1..span.end])
    }

    /// Bases denoted by `location`. Joined parts are concatenated in order;
    /// complemented locations yield the reverse complement of the inner bases.
    pub fn extract(&self, location: &Location) -> Result<Sequence, Error> {
        match location {
            Location::Simple(span) => Ok(Self::new(self.slice(*span)?)),
            Location::Joined(parts) => {
                let slices = parts
                    .iter()
                    .map(|part| self.slice(*part))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::new(slices.concat()))
            }
            Location::Complement(inner) => Ok(self.extract(inner)?.reverse_complement()),
        }
    }

    /// Reverse complement of the whole sequence.
    ///
    /// A/T and C/G pair with case preserved; N pairs with itself. Any other
    /// symbol is kept as is and reported.
    #[must_use]
    pub fn reverse_complement(&self) -> Sequence {
        let mut unexpected = 0usize;
        let bases = self
            .bases
            .iter()
            .rev()
            .map(|&b| {
                complement_base(b).unwrap_or_else(|| {
                    unexpected += 1;
                    b
                })
            })
            .collect();
        if unexpected > 0 {
            warn!("{unexpected} unexpected symbol(s) left uncomplemented");
        }
        Self { bases }
    }

    #[must_use]
    pub fn to_uppercase(&self) -> Sequence {
        Self {
            bases: self.bases.to_ascii_uppercase(),
        }
    }
}

fn complement_base(b: u8) -> Option<u8> {
    match b {
        b'A' => Some(b'T'),
        b'T' => Some(b'A'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'a' => Some(b't'),
        b't' => Some(b'a'),
        b'c' => Some(b'g'),
        b'g' => Some(b'c'),
        b'N' | b'n' => Some(b),
        _ => None,
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bases))
    }
}

impl From<&str> for Sequence {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}
