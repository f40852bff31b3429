#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Georeferenced cell grid for the raster life engine.
//!
//! A [`Grid`] owns a dense row-major array of numeric cell values together
//! with the georeferencing metadata required to address cells by real-world
//! coordinates. Cells are read and written through [`Grid::get`] and
//! [`Grid::set`] using either addressing mode; the container is never
//! resized after construction and is replaced wholesale when the lifecycle
//! system produces a successor generation.

use raster_life_core::{
    to_array_index, CellAddress, GeoReference, GridError, GridIndex, GridSize, RasterBand,
    RasterPayload, RasterStore, StoreError,
};
use thiserror::Error;

/// Tagged description of where a grid's initial values come from.
///
/// Replaces the original union-typed source parameter: each variant is
/// resolved exactly once at construction through [`Grid::from_source`].
#[derive(Clone, Debug, PartialEq)]
pub enum GridSource {
    /// Every cell starts at one provided scalar.
    Filled {
        /// Value assigned to all cells.
        value: f64,
    },
    /// Cells are initialized from an explicit row-major literal.
    Literal {
        /// Outer vector of rows, each holding one value per column.
        values: Vec<Vec<f64>>,
    },
    /// Cells and georeferencing are loaded from the raster store.
    Loaded {
        /// Store identifier of the raster to load.
        identifier: String,
        /// Band selected from the stored raster.
        band: RasterBand,
    },
}

/// Errors raised while building a grid from a [`GridSource`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GridBuildError {
    /// The resolved values did not form a usable grid shape.
    #[error(transparent)]
    Shape(#[from] GridError),
    /// The raster store failed to provide the requested raster.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Dense rectangular grid of numeric cell values with georeferencing.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    values: Vec<f64>,
    size: GridSize,
    geo: GeoReference,
}

impl Grid {
    /// Creates a grid with every cell set to the provided scalar.
    pub fn filled(size: GridSize, geo: GeoReference, value: f64) -> Result<Self, GridError> {
        validate_size(size)?;
        Ok(Self {
            values: vec![value; size.cell_count()],
            size,
            geo,
        })
    }

    /// Creates a grid from an explicit row-major literal.
    ///
    /// Dimensions are derived from the literal's shape; ragged or empty
    /// literals fail fast with [`GridError::InvalidGrid`].
    pub fn from_literal(rows: Vec<Vec<f64>>, geo: GeoReference) -> Result<Self, GridError> {
        let row_count = rows.len();
        let column_count = rows.first().map_or(0, Vec::len);
        if row_count == 0 || column_count == 0 {
            return Err(GridError::InvalidGrid {
                reason: "literal must contain at least one row and one column".to_owned(),
            });
        }

        let mut values = Vec::with_capacity(row_count * column_count);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != column_count {
                return Err(GridError::InvalidGrid {
                    reason: format!(
                        "row {row_index} holds {} values, expected {column_count}",
                        row.len()
                    ),
                });
            }
            values.extend(row);
        }

        let columns = u32::try_from(column_count).map_err(|_| GridError::InvalidGrid {
            reason: format!("literal is {column_count} columns wide"),
        })?;
        let rows = u32::try_from(row_count).map_err(|_| GridError::InvalidGrid {
            reason: format!("literal is {row_count} rows tall"),
        })?;

        Ok(Self {
            values,
            size: GridSize::new(columns, rows),
            geo,
        })
    }

    /// Creates a grid from a raster payload, validating its shape.
    pub fn from_payload(payload: RasterPayload) -> Result<Self, GridError> {
        validate_size(payload.size)?;
        if payload.values.len() != payload.size.cell_count() {
            return Err(GridError::InvalidGrid {
                reason: format!(
                    "payload holds {} values for a {}x{} grid",
                    payload.values.len(),
                    payload.size.columns(),
                    payload.size.rows()
                ),
            });
        }
        Ok(Self {
            values: payload.values,
            size: payload.size,
            geo: payload.geo,
        })
    }

    /// Loads a grid from the raster store.
    ///
    /// The georeferencing metadata returned by the store is authoritative and
    /// replaces whatever defaults the caller may hold.
    pub fn load<S: RasterStore>(
        store: &S,
        identifier: &str,
        band: RasterBand,
    ) -> Result<Self, GridBuildError> {
        let payload = store.load(identifier, band)?;
        Ok(Self::from_payload(payload)?)
    }

    /// Resolves a tagged source into a grid.
    ///
    /// `size` and `geo` act as defaults for the filled and literal variants;
    /// the loaded variant takes both from the store instead.
    pub fn from_source<S: RasterStore>(
        source: GridSource,
        size: GridSize,
        geo: GeoReference,
        store: &S,
    ) -> Result<Self, GridBuildError> {
        match source {
            GridSource::Filled { value } => Ok(Self::filled(size, geo, value)?),
            GridSource::Literal { values } => Ok(Self::from_literal(values, geo)?),
            GridSource::Loaded { identifier, band } => Self::load(store, &identifier, band),
        }
    }

    /// Dimensions of the grid in whole cells.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Georeferencing metadata attached to the grid.
    #[must_use]
    pub const fn geo_reference(&self) -> &GeoReference {
        &self.geo
    }

    /// Row-major view of the stored cell values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Reads the cell referenced by the provided address.
    pub fn get(&self, address: CellAddress) -> Result<f64, GridError> {
        let index = self.resolve(address)?;
        Ok(self.values[self.offset(index)])
    }

    /// Writes one cell in place; the only mutation a grid ever undergoes.
    pub fn set(&mut self, address: CellAddress, value: f64) -> Result<(), GridError> {
        let index = self.resolve(address)?;
        let offset = self.offset(index);
        self.values[offset] = value;
        Ok(())
    }

    /// Reads a cell with toroidal wraparound on both axes.
    ///
    /// Out-of-range indices wrap to the opposite edge, so column `-1` reads
    /// the last column and row `rows` reads row `0`; there is no boundary.
    #[must_use]
    pub fn wrapped_value(&self, column: i64, row: i64) -> f64 {
        let columns = i64::from(self.size.columns());
        let rows = i64::from(self.size.rows());
        let wrapped_column = column.rem_euclid(columns) as usize;
        let wrapped_row = row.rem_euclid(rows) as usize;
        self.values[wrapped_row * columns as usize + wrapped_column]
    }

    /// Builds a successor grid by evaluating `cell` for every index.
    ///
    /// The closure reads only from `self`, which stays frozen for the whole
    /// pass; the successor is a separate allocation so a mid-step observer
    /// can never see partially transitioned state. Georeferencing metadata is
    /// copied unchanged.
    #[must_use]
    pub fn successor<F>(&self, mut cell: F) -> Self
    where
        F: FnMut(GridIndex) -> f64,
    {
        let mut values = Vec::with_capacity(self.size.cell_count());
        for row in 0..self.size.rows() {
            for column in 0..self.size.columns() {
                values.push(cell(GridIndex::new(column, row)));
            }
        }
        Self {
            values,
            size: self.size,
            geo: self.geo,
        }
    }

    /// Captures the grid as a raster payload for externalization.
    #[must_use]
    pub fn to_payload(&self) -> RasterPayload {
        RasterPayload {
            values: self.values.clone(),
            size: self.size,
            geo: self.geo,
        }
    }

    /// Externalizes the grid through the raster store; does not mutate.
    pub fn to_raster<S: RasterStore>(
        &self,
        store: &mut S,
        destination: &str,
    ) -> Result<(), StoreError> {
        store.save(&self.to_payload(), destination)
    }

    fn resolve(&self, address: CellAddress) -> Result<GridIndex, GridError> {
        let (column, row) = match address {
            CellAddress::Geographic(point) => to_array_index(point, &self.geo),
            CellAddress::Array(index) => (i64::from(index.column()), i64::from(index.row())),
        };

        let in_bounds = column >= 0
            && row >= 0
            && column < i64::from(self.size.columns())
            && row < i64::from(self.size.rows());
        if !in_bounds {
            return Err(GridError::OutOfBounds {
                column,
                row,
                columns: self.size.columns(),
                rows: self.size.rows(),
            });
        }

        Ok(GridIndex::new(column as u32, row as u32))
    }

    fn offset(&self, index: GridIndex) -> usize {
        index.row() as usize * self.size.columns() as usize + index.column() as usize
    }
}

fn validate_size(size: GridSize) -> Result<(), GridError> {
    if size.columns() == 0 || size.rows() == 0 {
        return Err(GridError::InvalidGrid {
            reason: format!("dimensions {}x{} are empty", size.columns(), size.rows()),
        });
    }
    Ok(())
}
