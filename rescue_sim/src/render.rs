//! Plain-text map rendering.
//!
//! One line per row, cells separated by a single space:
//!
//! | glyph | cell                     |
//! |-------|--------------------------|
//! | `.`   | empty                    |
//! | `#`   | obstacle                 |
//! | `V`   | victim                   |
//! | `B`   | base                     |
//! | `A`   | agent on an empty cell   |
//! | `R`   | agent on a victim        |

use rescue_core::{CellType, Coordinate, Grid};

fn glyph(cell: CellType) -> char {
    match cell {
        CellType::Empty => '.',
        CellType::Obstacle => '#',
        CellType::Victim => 'V',
        CellType::Base => 'B',
    }
}

/// Renders the ground-truth layout.
pub fn describe(grid: &Grid) -> Vec<String> {
    describe_with_agents(grid, &[])
}

/// Renders the layout with agent positions overlaid. The base glyph is kept.
pub fn describe_with_agents(grid: &Grid, agents: &[Coordinate]) -> Vec<String> {
    (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| {
                    let c = Coordinate::new(x, y);
                    let cell = grid.cell_type(c);
                    match (cell, agents.contains(&c)) {
                        (CellType::Victim, true) => 'R',
                        (CellType::Empty, true) => 'A',
                        _ => glyph(cell),
                    }
                })
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let grid = Grid::new(
            3,
            2,
            Coordinate::new(0, 0),
            [Coordinate::new(2, 1)],
            [Coordinate::new(1, 0)],
        )
        .unwrap();

        assert_eq!(describe(&grid), vec!["B # .", ". . V"]);
    }

    #[test]
    fn test_describe_with_agents() {
        let grid = Grid::new(3, 2, Coordinate::new(0, 0), [Coordinate::new(2, 1)], []).unwrap();
        let agents = [Coordinate::new(0, 0), Coordinate::new(1, 1), Coordinate::new(2, 1)];

        assert_eq!(describe_with_agents(&grid, &agents), vec!["B . .", ". A R"]);
    }
}
