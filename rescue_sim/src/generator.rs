//! Seeded random grid generation.
//!
//! The base is fixed at `(0, 0)`. Every other cell is shuffled with a
//! ChaCha8 RNG; the first `num_victims` cells become victims and the next
//! `num_obstacles` become obstacles. The same seed always yields the same grid.

use crate::error::SimError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rescue_core::{Coordinate, Grid};

/// Builds random grids from a seed.
pub struct GridGenerator {
    /// Seed the RNG was created from
    seed: u64,

    rng: ChaCha8Rng,
}

impl GridGenerator {
    /// Creates a generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a `width x height` grid with the requested victims and obstacles.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        num_victims: usize,
        num_obstacles: usize,
    ) -> Result<Grid, SimError> {
        let base = Coordinate::new(0, 0);
        let mut free: Vec<Coordinate> = (0..width)
            .flat_map(|x| (0..height).map(move |y| Coordinate::new(x, y)))
            .filter(|&c| c != base)
            .collect();

        let requested = num_victims + num_obstacles;
        if requested > free.len() {
            return Err(SimError::Overcommit {
                requested,
                available: free.len(),
            });
        }

        free.shuffle(&mut self.rng);
        let victims = free[..num_victims].iter().copied();
        let obstacles = free[num_victims..requested].iter().copied();

        Ok(Grid::new(width, height, base, victims, obstacles)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_core::ConfigurationError;
    use std::collections::BTreeSet;

    fn sorted(cells: &std::collections::HashSet<Coordinate>) -> BTreeSet<Coordinate> {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_generates_requested_counts() {
        let grid = GridGenerator::new(42).generate(10, 10, 4, 10).unwrap();

        assert_eq!(grid.base(), Coordinate::new(0, 0));
        assert_eq!(grid.victims().len(), 4);
        assert_eq!(grid.obstacles().len(), 10);
        assert!(grid.victims().is_disjoint(grid.obstacles()));
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = GridGenerator::new(7).generate(8, 6, 3, 5).unwrap();
        let b = GridGenerator::new(7).generate(8, 6, 3, 5).unwrap();

        assert_eq!(sorted(a.victims()), sorted(b.victims()));
        assert_eq!(sorted(a.obstacles()), sorted(b.obstacles()));
    }

    #[test]
    fn test_rejects_overcommit() {
        let err = GridGenerator::new(1).generate(2, 2, 2, 2).unwrap_err();
        assert!(matches!(err, SimError::Overcommit { requested: 4, available: 3 }));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let err = GridGenerator::new(1).generate(0, 5, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            SimError::Configuration(ConfigurationError::EmptyGrid { .. })
        ));
    }
}
