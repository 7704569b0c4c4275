//! Errors raised by the forest automaton
//!
//! All of these are precondition violations detected eagerly at construction
//! or at the public ignition primitive. None are retryable.

use crate::cell::{CellState, GridPos};

/// Errors that can occur when building or mutating a [`crate::Forest`]
#[derive(Debug, Clone, PartialEq)]
pub enum ForestError {
    /// Width or height is zero, or the cell count overflows `usize`
    InvalidDimension { width: usize, height: usize },
    /// Spread probability outside `[0, 1]` (or NaN)
    InvalidProbability(f64),
    /// Ignition coordinate outside the grid
    IgnitionOutOfBounds {
        pos: GridPos,
        width: usize,
        height: usize,
    },
    /// Attempted to ignite a cell that is not a tree
    IllegalIgnition { pos: GridPos, state: CellState },
}

impl std::fmt::Display for ForestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForestError::InvalidDimension { width, height } => {
                write!(f, "Invalid forest dimensions {width}x{height}: both must be positive")
            }
            ForestError::InvalidProbability(p) => {
                write!(f, "Invalid spread probability {p}: must be within [0, 1]")
            }
            ForestError::IgnitionOutOfBounds { pos, width, height } => write!(
                f,
                "Ignition point {pos} lies outside the {width}x{height} forest"
            ),
            ForestError::IllegalIgnition { pos, state } => {
                write!(f, "Cannot ignite cell {pos}: it is {state}, not a tree")
            }
        }
    }
}

impl std::error::Error for ForestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_cause() {
        let err = ForestError::InvalidDimension {
            width: 0,
            height: 4,
        };
        assert_eq!(
            err.to_string(),
            "Invalid forest dimensions 0x4: both must be positive"
        );

        let err = ForestError::IllegalIgnition {
            pos: GridPos::new(1, 2),
            state: CellState::Ash,
        };
        assert_eq!(err.to_string(), "Cannot ignite cell (1, 2): it is ash, not a tree");
    }
}
