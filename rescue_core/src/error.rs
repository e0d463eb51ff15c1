//! Error types for grid and roster construction.

use crate::grid::Coordinate;
use thiserror::Error;

/// Errors raised when a grid or agent roster violates its invariants.
///
/// These are only produced at construction time. Once a [`Grid`](crate::Grid)
/// or an [`Agent`](crate::Agent) exists, every operation on it is infallible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Width or height is zero
    #[error("Grid must have non-zero dimensions, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    /// A coordinate lies outside `[0, width) x [0, height)`
    #[error("{kind} at {coordinate} is outside the {width}x{height} grid")]
    OutOfBounds {
        kind: &'static str,
        coordinate: Coordinate,
        width: usize,
        height: usize,
    },

    /// Base, victim and obstacle sets are not pairwise disjoint
    #[error("Cell {coordinate} is both {first} and {second}")]
    Overlap {
        coordinate: Coordinate,
        first: &'static str,
        second: &'static str,
    },

    /// A coordinate string could not be parsed as `x,y`
    #[error("Invalid coordinate '{0}', expected 'x,y'")]
    InvalidCoordinate(String),

    /// A roster needs at least one agent
    #[error("Agent roster is empty")]
    EmptyRoster,

    /// Two agents share an identifier
    #[error("Duplicate agent identifier: {0}")]
    DuplicateAgent(String),

    /// An agent was placed out of bounds or on an obstacle
    #[error("Agent {agent} cannot stand on {coordinate}")]
    InvalidAgentPosition { agent: String, coordinate: Coordinate },
}

impl ConfigurationError {
    /// Creates an out-of-bounds error for the given grid dimensions.
    pub fn out_of_bounds(kind: &'static str, coordinate: Coordinate, width: usize, height: usize) -> Self {
        Self::OutOfBounds { kind, coordinate, width, height }
    }

    /// Creates an overlap error.
    pub fn overlap(coordinate: Coordinate, first: &'static str, second: &'static str) -> Self {
        Self::Overlap { coordinate, first, second }
    }
}
