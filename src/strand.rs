//! Strand orientation of a feature location.

use std::fmt;

use serde::Serialize;

/// Strand a location reads on. Each `complement(...)` flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    #[must_use]
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }

    /// The opposite strand.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_twice_is_identity() {
        for strand in [Strand::Forward, Strand::Reverse] {
            assert_eq!(strand.flip().flip(), strand);
        }
        assert_eq!(Strand::Forward.flip(), Strand::Reverse);
    }

    #[test]
    fn is_reverse() {
        assert!(!Strand::Forward.is_reverse());
        assert!(Strand::Reverse.is_reverse());
    }

    #[test]
    fn display() {
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
    }
}
