use std::error::Error;
use std::fmt;

use crate::level_generator::MAX_LEVEL;

#[derive(Debug)]
pub enum SkipListError {
    /// The list needs between 1 and `MAX_LEVEL` levels.
    InvalidMaxLevel(usize),
    /// The promotion probability must lie in `(0, 1)`.
    InvalidProbability(f64),
    /// The operating system could not provide a seed for the level generator.
    Entropy(rand::Error),
}

impl fmt::Display for SkipListError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SkipListError::InvalidMaxLevel(n) => write!(f, "invalid max level {}, must be between 1 and {}", n, MAX_LEVEL),
            SkipListError::InvalidProbability(p) => write!(f, "invalid probability {}, must be in (0, 1)", p),
            SkipListError::Entropy(ref e) => write!(f, "cannot seed level generator: {}", e),
        }
    }
}

impl Error for SkipListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            SkipListError::Entropy(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<rand::Error> for SkipListError {
    fn from(e: rand::Error) -> SkipListError { SkipListError::Entropy(e) }
}

#[cfg(test)]
mod tests {
    use super::SkipListError;

    #[test]
    fn display() {
        assert_eq!(
            format!("{}", SkipListError::InvalidMaxLevel(0)),
            "invalid max level 0, must be between 1 and 64"
        );
        assert_eq!(
            format!("{}", SkipListError::InvalidMaxLevel(65)),
            "invalid max level 65, must be between 1 and 64"
        );
        assert_eq!(
            format!("{}", SkipListError::InvalidProbability(1.5)),
            "invalid probability 1.5, must be in (0, 1)"
        );
    }
}
