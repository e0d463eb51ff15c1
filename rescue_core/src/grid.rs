//! Grid geometry - the ground truth every agent searches.
//!
//! A [`Grid`] is a fixed `width x height` rectangle with a base cell, a set of
//! victims and a set of obstacles. It is immutable once built: agents only
//! ever read from it, and their beliefs are tracked separately in a
//! [`KnowledgeStore`](crate::KnowledgeStore).

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A cell position on the grid.
///
/// Ordering is lexicographic by `x` then `y` (field declaration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Axis-aligned neighbours in the order +x, -x, +y, -y.
    ///
    /// Cells that would underflow are skipped. Upper bounds are not checked
    /// here; see [`Grid::neighbors`].
    fn adjacent(self) -> impl Iterator<Item = Coordinate> {
        let Coordinate { x, y } = self;
        [
            Some(Coordinate::new(x + 1, y)),
            x.checked_sub(1).map(|x| Coordinate::new(x, y)),
            Some(Coordinate::new(x, y + 1)),
            y.checked_sub(1).map(|y| Coordinate::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = ConfigurationError;

    /// Parses `"x,y"` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidCoordinate(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

/// Manhattan distance `|ax - bx| + |ay - by|`.
///
/// Used both as the A* heuristic and as the target-selection metric.
pub fn manhattan(a: Coordinate, b: Coordinate) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Ground-truth classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Obstacle,
    Victim,
    Base,
}

/// The search area.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    base: Coordinate,
    victims: HashSet<Coordinate>,
    obstacles: HashSet<Coordinate>,
}

impl Grid {
    /// Creates a grid, validating that base, victims and obstacles are in
    /// bounds and pairwise disjoint.
    pub fn new(
        width: usize,
        height: usize,
        base: Coordinate,
        victims: impl IntoIterator<Item = Coordinate>,
        obstacles: impl IntoIterator<Item = Coordinate>,
    ) -> Result<Self, ConfigurationError> {
        if width == 0 || height == 0 {
            return Err(ConfigurationError::EmptyGrid { width, height });
        }

        let grid = Self {
            width,
            height,
            base,
            victims: victims.into_iter().collect(),
            obstacles: obstacles.into_iter().collect(),
        };
        grid.validate()?;
        Ok(grid)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let check = |kind, c: Coordinate| {
            if self.in_bounds(c) {
                Ok(())
            } else {
                Err(ConfigurationError::out_of_bounds(kind, c, self.width, self.height))
            }
        };

        check("base", self.base)?;
        for &victim in &self.victims {
            check("victim", victim)?;
        }
        for &obstacle in &self.obstacles {
            check("obstacle", obstacle)?;
        }

        if self.victims.contains(&self.base) {
            return Err(ConfigurationError::overlap(self.base, "base", "victim"));
        }
        if self.obstacles.contains(&self.base) {
            return Err(ConfigurationError::overlap(self.base, "base", "obstacle"));
        }
        // Report the smallest overlapping cell so the error is stable.
        if let Some(&cell) = self.victims.intersection(&self.obstacles).min() {
            return Err(ConfigurationError::overlap(cell, "victim", "obstacle"));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn base(&self) -> Coordinate {
        self.base
    }

    pub fn victims(&self) -> &HashSet<Coordinate> {
        &self.victims
    }

    pub fn obstacles(&self) -> &HashSet<Coordinate> {
        &self.obstacles
    }

    /// Total number of cells, `width * height`.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn in_bounds(&self, c: Coordinate) -> bool {
        c.x < self.width && c.y < self.height
    }

    pub fn is_blocked(&self, c: Coordinate) -> bool {
        self.obstacles.contains(&c)
    }

    pub fn is_victim(&self, c: Coordinate) -> bool {
        self.victims.contains(&c)
    }

    /// In-bounds, unblocked axis-aligned neighbours of `c`.
    ///
    /// Obstacles are filtered against ground truth, not against any agent's
    /// belief. Order is +x, -x, +y, -y.
    pub fn neighbors(&self, c: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        c.adjacent()
            .filter(move |&n| self.in_bounds(n) && !self.is_blocked(n))
    }

    /// All in-bounds axis-aligned neighbours of `c`, blocked or not.
    ///
    /// This is what an agent standing on `c` can sense.
    pub fn adjacent(&self, c: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        c.adjacent().filter(move |&n| self.in_bounds(n))
    }

    /// Every cell, column by column (`x` outer, `y` inner).
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Coordinate::new(x, y)))
    }

    /// Classifies a cell. The base takes precedence over everything else.
    pub fn cell_type(&self, c: Coordinate) -> CellType {
        if c == self.base {
            CellType::Base
        } else if self.is_victim(c) {
            CellType::Victim
        } else if self.is_blocked(c) {
            CellType::Obstacle
        } else {
            CellType::Empty
        }
    }
}
