#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the raster life engine.
//!
//! This crate defines the vocabulary that connects the grid container, the
//! lifecycle stepping system, the simulation controller, and the external
//! raster store. Collaborators exchange [`RasterPayload`] values through the
//! [`RasterStore`] seam and announce finished generations through the
//! optional [`FrameSink`] seam; neither side ever reaches for a global
//! registry or display singleton.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier under which the starting grid is externalized.
pub const START_SNAPSHOT: &str = "start";

/// Prefix shared by every externalized cycle snapshot.
pub const CYCLE_SNAPSHOT_PREFIX: &str = "cycle";

/// Derives the store identifier for a cycle snapshot.
///
/// When `overwrite` is set every generation reuses the bare `"cycle"` slot so
/// only the latest generation stays durable; otherwise the current cycle
/// count is appended, retaining full history. The resulting names are part of
/// the external contract and must stay stable.
#[must_use]
pub fn cycle_snapshot_name(overwrite: bool, cycle_count: u64) -> String {
    if overwrite {
        CYCLE_SNAPSHOT_PREFIX.to_owned()
    } else {
        format!("{CYCLE_SNAPSHOT_PREFIX}{cycle_count}")
    }
}

/// Geographic location expressed in the units of the spatial reference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    x: f64,
    y: f64,
}

impl GeoPoint {
    /// Creates a new geographic point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
}

/// Opaque spatial reference identifier carried through but never interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Srid(u32);

impl Srid {
    /// Common geographic default (WGS 84).
    pub const WGS84: Srid = Srid(4326);

    /// Creates a spatial reference identifier from its numeric code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Retrieves the numeric code of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Srid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// One-based raster band selector forwarded to the store on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterBand(u32);

impl RasterBand {
    /// The first band of a raster, which every store must provide.
    pub const FIRST: RasterBand = RasterBand(1);

    /// Creates a band selector from its one-based index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Retrieves the one-based band index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for RasterBand {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Dimensions of a grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells addressed by the size.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

/// Location of a single grid cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    column: u32,
    row: u32,
}

impl GridIndex {
    /// Creates a new grid index.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Georeferencing metadata attached to a grid.
///
/// `cell_height` is conventionally negative for north-up rasters; the sign is
/// carried through untouched and must never be assumed positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoReference {
    origin: GeoPoint,
    cell_width: f64,
    cell_height: f64,
    srid: Srid,
}

impl GeoReference {
    /// Creates georeferencing metadata from an origin and cell dimensions.
    #[must_use]
    pub const fn new(origin: GeoPoint, cell_width: f64, cell_height: f64, srid: Srid) -> Self {
        Self {
            origin,
            cell_width,
            cell_height,
            srid,
        }
    }

    /// Geographic coordinate of the grid's reference corner.
    #[must_use]
    pub const fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Width of a single cell in geographic units.
    #[must_use]
    pub const fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Height of a single cell in geographic units, sign preserved.
    #[must_use]
    pub const fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Spatial reference identifier attached to the grid.
    #[must_use]
    pub const fn srid(&self) -> Srid {
        self.srid
    }
}

/// Addressing mode selecting how a grid cell is referenced.
///
/// The two modes mirror the original raster tooling: geographic addressing
/// resolves real-world coordinates through the coordinate transform before
/// range validation, while array addressing interprets the pair directly as
/// `(column, row)`. The array ordering is a documented convention choice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellAddress {
    /// Geographic coordinates resolved through [`to_array_index`].
    Geographic(GeoPoint),
    /// Direct `(column, row)` array index.
    Array(GridIndex),
}

/// Logical state of a single automaton cell.
///
/// The container itself is numeric; only the exact value `1.0` is treated as
/// alive when deriving a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// The cell is dead and stored as `0.0`.
    Dead,
    /// The cell is alive and stored as `1.0`.
    Alive,
}

impl CellState {
    /// Derives the logical state from a stored cell value.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        if value == 1.0 {
            Self::Alive
        } else {
            Self::Dead
        }
    }

    /// Numeric representation written into the grid container.
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Alive => 1.0,
            Self::Dead => 0.0,
        }
    }

    /// Reports whether the state counts toward neighbor totals.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// Unit of exchange between the grid and a raster store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RasterPayload {
    /// Row-major cell values, exactly `size.cell_count()` entries.
    pub values: Vec<f64>,
    /// Dimensions of the raster in whole cells.
    pub size: GridSize,
    /// Georeferencing metadata attached to the raster.
    pub geo: GeoReference,
}

/// Maps a geographic coordinate to signed `(column, row)` array indices.
///
/// `column = floor((x - origin.x) / cell_width)` and
/// `row = floor((y + 1 - origin.y) / cell_height)`. The `+1` vertical offset
/// is the fixed addressing convention inherited from the original raster
/// tooling; [`cell_center`] compensates for it so integer round trips hold.
/// The function is total over real inputs and performs no bounds checking —
/// range validation belongs to the grid.
#[must_use]
pub fn to_array_index(point: GeoPoint, geo: &GeoReference) -> (i64, i64) {
    let column = ((point.x() - geo.origin().x()) / geo.cell_width()).floor();
    let row = ((point.y() + 1.0 - geo.origin().y()) / geo.cell_height()).floor();
    (column as i64, row as i64)
}

/// Computes the geographic coordinate at the center of a cell.
///
/// Inverse of [`to_array_index`]: the vertical component subtracts the same
/// `+1` offset the forward transform adds, so converting a cell center back
/// through the transform yields the original `(column, row)` pair.
#[must_use]
pub fn cell_center(index: GridIndex, geo: &GeoReference) -> GeoPoint {
    let x = geo.origin().x() + (f64::from(index.column()) + 0.5) * geo.cell_width();
    let y = geo.origin().y() + (f64::from(index.row()) + 0.5) * geo.cell_height() - 1.0;
    GeoPoint::new(x, y)
}

/// Errors raised by grid construction and cell addressing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid shape is unusable; construction is aborted.
    #[error("grid shape is invalid: {reason}")]
    InvalidGrid {
        /// Human-readable description of the shape defect.
        reason: String,
    },
    /// A resolved index lies outside the grid bounds.
    #[error("index (column {column}, row {row}) lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        /// Resolved column index, possibly negative after a transform.
        column: i64,
        /// Resolved row index, possibly negative after a transform.
        row: i64,
        /// Number of columns in the addressed grid.
        columns: u32,
        /// Number of rows in the addressed grid.
        rows: u32,
    },
}

/// Errors raised by raster store collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No raster exists under the requested identifier.
    #[error("raster '{identifier}' was not found")]
    RasterNotFound {
        /// Identifier that failed to resolve.
        identifier: String,
    },
    /// The raster exists but could not be read or decoded.
    #[error("could not read raster '{identifier}': {reason}")]
    RasterRead {
        /// Identifier of the unreadable raster.
        identifier: String,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The raster could not be written to its destination.
    #[error("could not write raster '{destination}': {reason}")]
    RasterWrite {
        /// Destination identifier that failed.
        destination: String,
        /// Human-readable description of the failure.
        reason: String,
    },
}

/// Non-fatal failure collected while deleting externalized snapshots.
///
/// Losing an old snapshot must never block returning to a valid start state,
/// so these are reported to the caller instead of aborting the reset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unable to delete snapshot '{identifier}': {reason}")]
pub struct CleanupWarning {
    /// Identifier of the snapshot that could not be deleted.
    pub identifier: String,
    /// Human-readable description of the failure.
    pub reason: String,
}

/// Persistence seam implemented by an external raster store.
pub trait RasterStore {
    /// Loads the raster stored under `identifier`, selecting one band.
    fn load(&self, identifier: &str, band: RasterBand) -> Result<RasterPayload, StoreError>;

    /// Writes the payload under `destination`, overwriting any existing slot.
    fn save(&mut self, payload: &RasterPayload, destination: &str) -> Result<(), StoreError>;

    /// Removes the raster stored under `identifier`, best effort.
    fn delete(&mut self, identifier: &str) -> Result<(), StoreError>;
}

/// Optional display seam notified whenever a generation becomes durable.
pub trait FrameSink {
    /// Announces that the snapshot under `identifier` is ready to present.
    fn frame_ready(&mut self, identifier: &str, style_hint: &str);
}

/// Frame sink that discards every notification, for headless execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn frame_ready(&mut self, _identifier: &str, _style_hint: &str) {}
}

#[cfg(test)]
mod tests {
    use super::{
        cell_center, cycle_snapshot_name, to_array_index, CellState, GeoPoint, GeoReference,
        GridIndex, GridSize, RasterPayload, Srid,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn north_up_reference() -> GeoReference {
        GeoReference::new(GeoPoint::new(0.0, 10.0), 1.0, -1.0, Srid::WGS84)
    }

    #[test]
    fn transform_floors_toward_negative_infinity() {
        let geo = GeoReference::new(GeoPoint::new(0.0, 0.0), 1.0, 1.0, Srid::WGS84);
        let (column, row) = to_array_index(GeoPoint::new(-0.25, -1.5), &geo);
        assert_eq!(column, -1);
        assert_eq!(row, -1);
    }

    #[test]
    fn transform_applies_vertical_offset() {
        let geo = north_up_reference();
        // With origin y = 10 and cell height -1, the +1 offset places row 0
        // over y in (8, 9] rather than (9, 10].
        assert_eq!(to_array_index(GeoPoint::new(2.5, 8.5), &geo), (2, 0));
        assert_eq!(to_array_index(GeoPoint::new(2.5, 9.5), &geo), (2, -1));
        assert_eq!(to_array_index(GeoPoint::new(2.5, 7.5), &geo), (2, 1));
    }

    #[test]
    fn cell_center_round_trips_for_north_up_rasters() {
        let geo = north_up_reference();
        for column in 0..8 {
            for row in 0..6 {
                let index = GridIndex::new(column, row);
                let center = cell_center(index, &geo);
                let (resolved_column, resolved_row) = to_array_index(center, &geo);
                assert_eq!(resolved_column, i64::from(column));
                assert_eq!(resolved_row, i64::from(row));
            }
        }
    }

    #[test]
    fn cell_center_round_trips_for_positive_cell_height() {
        let geo = GeoReference::new(GeoPoint::new(-3.0, 7.0), 0.5, 2.0, Srid::new(3857));
        for column in 0..5 {
            for row in 0..5 {
                let index = GridIndex::new(column, row);
                let center = cell_center(index, &geo);
                let (resolved_column, resolved_row) = to_array_index(center, &geo);
                assert_eq!(resolved_column, i64::from(column));
                assert_eq!(resolved_row, i64::from(row));
            }
        }
    }

    #[test]
    fn snapshot_names_match_external_contract() {
        assert_eq!(cycle_snapshot_name(true, 17), "cycle");
        assert_eq!(cycle_snapshot_name(false, 17), "cycle17");
        assert_eq!(cycle_snapshot_name(false, 0), "cycle0");
    }

    #[test]
    fn cell_state_only_treats_exact_one_as_alive() {
        assert!(CellState::from_value(1.0).is_alive());
        assert!(!CellState::from_value(0.0).is_alive());
        assert!(!CellState::from_value(0.999).is_alive());
        assert!(!CellState::from_value(-99.0).is_alive());
    }

    #[test]
    fn cell_state_values_round_trip() {
        assert_eq!(CellState::from_value(CellState::Alive.value()), CellState::Alive);
        assert_eq!(CellState::from_value(CellState::Dead.value()), CellState::Dead);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn geo_reference_round_trips_through_bincode() {
        assert_round_trip(&north_up_reference());
    }

    #[test]
    fn raster_payload_round_trips_through_bincode() {
        let payload = RasterPayload {
            values: vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
            size: GridSize::new(3, 2),
            geo: north_up_reference(),
        };
        assert_round_trip(&payload);
    }
}
