#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure lifecycle system that advances the automaton one generation.
//!
//! The system owns no state: [`step`] reads a frozen current grid and
//! produces a freshly allocated successor, so the neighbor source can never
//! be observed mid-transition. Neighbor lookups wrap toroidally on both
//! axes; the rule is the classic birth-on-3, survive-on-2-or-3 table.

use raster_life_core::{CellState, GridIndex};
use raster_life_grid::Grid;

/// Relative offsets of the eight Moore neighbors, center excluded.
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies the automaton rule to one cell.
///
/// An alive cell survives with exactly 2 or 3 live neighbors and dies of
/// underpopulation or overcrowding otherwise; a dead cell becomes alive with
/// exactly 3 live neighbors (reproduction) and stays dead otherwise.
#[must_use]
pub const fn transition(state: CellState, live_neighbors: u8) -> CellState {
    match (state, live_neighbors) {
        (CellState::Alive, 2 | 3) => CellState::Alive,
        (CellState::Alive, _) => CellState::Dead,
        (CellState::Dead, 3) => CellState::Alive,
        (CellState::Dead, _) => CellState::Dead,
    }
}

/// Counts the live cells among the eight toroidally wrapped neighbors.
#[must_use]
pub fn live_neighbors(grid: &Grid, index: GridIndex) -> u8 {
    let column = i64::from(index.column());
    let row = i64::from(index.row());
    let mut count = 0;
    for (column_offset, row_offset) in NEIGHBOR_OFFSETS {
        let value = grid.wrapped_value(column + column_offset, row + row_offset);
        if CellState::from_value(value).is_alive() {
            count += 1;
        }
    }
    count
}

/// Computes the successor generation of the provided grid.
///
/// `current` acts as the read-only neighbor source for the entire pass while
/// every cell of a new grid is written; the successor carries the same
/// georeferencing metadata and replaces the current grid wholesale at the
/// controller.
#[must_use]
pub fn step(current: &Grid) -> Grid {
    current.successor(|index| {
        let state = CellState::from_value(
            current.wrapped_value(i64::from(index.column()), i64::from(index.row())),
        );
        transition(state, live_neighbors(current, index)).value()
    })
}

#[cfg(test)]
mod tests {
    use super::{live_neighbors, transition};
    use raster_life_core::{CellState, GeoPoint, GeoReference, GridIndex, Srid};
    use raster_life_grid::Grid;

    fn unit_reference() -> GeoReference {
        GeoReference::new(GeoPoint::new(0.0, 0.0), 1.0, -1.0, Srid::WGS84)
    }

    #[test]
    fn rule_table_is_exhaustive() {
        for neighbors in 0..=8 {
            let alive_next = transition(CellState::Alive, neighbors);
            let dead_next = transition(CellState::Dead, neighbors);

            match neighbors {
                2 => {
                    assert_eq!(alive_next, CellState::Alive);
                    assert_eq!(dead_next, CellState::Dead);
                }
                3 => {
                    assert_eq!(alive_next, CellState::Alive);
                    assert_eq!(dead_next, CellState::Alive);
                }
                _ => {
                    assert_eq!(alive_next, CellState::Dead);
                    assert_eq!(dead_next, CellState::Dead);
                }
            }
        }
    }

    #[test]
    fn neighbor_count_excludes_center_cell() {
        let grid = Grid::from_literal(
            vec![
                vec![0.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 0.0],
            ],
            unit_reference(),
        )
        .expect("grid");
        assert_eq!(live_neighbors(&grid, GridIndex::new(1, 1)), 0);
    }

    #[test]
    fn neighbor_count_wraps_across_edges() {
        // A single live cell in the far corner is a diagonal neighbor of the
        // opposite corner on a torus.
        let grid = Grid::from_literal(
            vec![
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 1.0],
            ],
            unit_reference(),
        )
        .expect("grid");
        assert_eq!(live_neighbors(&grid, GridIndex::new(0, 0)), 1);
        assert_eq!(live_neighbors(&grid, GridIndex::new(2, 1)), 1);
        assert_eq!(live_neighbors(&grid, GridIndex::new(1, 1)), 0);
    }

    #[test]
    fn non_unit_values_do_not_count_as_alive() {
        let grid = Grid::from_literal(
            vec![vec![2.0, 0.5, -99.0], vec![0.0, 0.0, 0.0]],
            unit_reference(),
        )
        .expect("grid");
        assert_eq!(live_neighbors(&grid, GridIndex::new(1, 1)), 0);
    }
}
