use raster_life_core::{CellAddress, GeoPoint, GeoReference, GridIndex, Srid};
use raster_life_grid::Grid;
use raster_life_system_lifecycle::step;

fn unit_reference() -> GeoReference {
    GeoReference::new(GeoPoint::new(0.0, 0.0), 1.0, -1.0, Srid::WGS84)
}

fn grid_from(rows: Vec<Vec<f64>>) -> Grid {
    Grid::from_literal(rows, unit_reference()).expect("literal grid")
}

#[test]
fn blinker_oscillates_with_period_two() {
    // Vertical blinker centered on a 5x5 grid; large enough that the torus
    // does not let the pattern interact with itself.
    let seed = grid_from(vec![
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
    ]);
    let horizontal_phase = grid_from(vec![
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 1.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0, 0.0],
    ]);

    let after_one = step(&seed);
    assert_eq!(after_one, horizontal_phase);

    let after_two = step(&after_one);
    assert_eq!(after_two, seed);
}

#[test]
fn block_is_a_still_life() {
    let block = grid_from(vec![
        vec![0.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0, 0.0],
    ]);
    assert_eq!(step(&block), block);
}

#[test]
fn lone_cell_dies_of_underpopulation() {
    let lone = grid_from(vec![
        vec![0.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0],
    ]);
    let next = step(&lone);
    assert!(next.values().iter().all(|value| *value == 0.0));
}

#[test]
fn step_is_deterministic_for_a_frozen_grid() {
    let seed = grid_from(vec![
        vec![1.0, 0.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0, 0.0],
        vec![1.0, 1.0, 0.0, 1.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ]);
    assert_eq!(step(&seed), step(&seed));
}

#[test]
fn step_does_not_mutate_the_neighbor_source() {
    let seed = grid_from(vec![
        vec![0.0, 1.0, 0.0],
        vec![1.0, 1.0, 1.0],
        vec![0.0, 1.0, 0.0],
    ]);
    let frozen = seed.clone();
    let _ = step(&seed);
    assert_eq!(seed, frozen);
}

#[test]
fn successor_keeps_georeferencing_metadata() {
    let geo = GeoReference::new(GeoPoint::new(120.5, -33.25), 0.25, -0.25, Srid::new(3857));
    let seed = Grid::from_literal(
        vec![vec![1.0, 1.0], vec![1.0, 0.0]],
        geo,
    )
    .expect("literal grid");

    let next = step(&seed);
    assert_eq!(next.geo_reference(), &geo);
    assert_eq!(next.size(), seed.size());
}

#[test]
fn wrapped_edges_participate_in_the_rule() {
    // Three live cells in one row of a 3x3 torus form a horizontal triple
    // whose wrapped columns keep every live cell at exactly two neighbors.
    let seed = grid_from(vec![
        vec![0.0, 0.0, 0.0],
        vec![1.0, 1.0, 1.0],
        vec![0.0, 0.0, 0.0],
    ]);
    let next = step(&seed);
    for column in 0..3 {
        assert_eq!(
            next.get(CellAddress::Array(GridIndex::new(column, 1)))
                .expect("in bounds"),
            1.0,
        );
    }
}
