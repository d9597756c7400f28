//! Single-band raster grids.
//!
//! A [`RasterGrid`] holds one environmental covariate (vegetation index,
//! temperature, elevation, ...) as a dense row-major array together with the
//! declared grid footprint and a no-data sentinel. Grids are loaded from
//! ESRI ASCII files via [`read_ascii_grid`] or constructed synthetically for
//! demos and tests.

mod ascii;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use ascii::read_ascii_grid;

use crate::error::CoreError;
use crate::table::RasterTable;

/// Declared footprint of a raster grid.
///
/// Two rasters are aligned exactly when their geometries are equal; the join
/// pipeline enforces this before merging columns. The origin is the
/// geographic coordinate of cell (0, 0) and `cell_size` is the cell edge
/// length in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Number of columns (x extent).
    pub ncols: usize,
    /// Number of rows (y extent).
    pub nrows: usize,
    /// Longitude of the grid origin.
    pub origin_lon: f64,
    /// Latitude of the grid origin.
    pub origin_lat: f64,
    /// Cell size in degrees.
    pub cell_size: f64,
}

impl GridGeometry {
    /// Map a geographic point to grid indices.
    ///
    /// Uses `floor((coord - origin) / cell_size)` on each axis. Returns
    /// `None` when the point falls outside the grid footprint.
    pub fn cell_index(&self, lat: f64, lon: f64) -> Option<(i32, i32)> {
        let x = ((lon - self.origin_lon) / self.cell_size).floor();
        let y = ((lat - self.origin_lat) / self.cell_size).floor();
        if x < 0.0 || y < 0.0 || x >= self.ncols as f64 || y >= self.nrows as f64 {
            return None;
        }
        Some((x as i32, y as i32))
    }

    /// Geographic coordinate (lon, lat) of a cell's origin corner.
    ///
    /// Inverse of [`GridGeometry::cell_index`]; used when exporting burned
    /// cells back to geographic space.
    pub fn cell_origin(&self, x: i32, y: i32) -> (f64, f64) {
        (
            self.origin_lon + f64::from(x) * self.cell_size,
            self.origin_lat + f64::from(y) * self.cell_size,
        )
    }

    /// Total number of cells in the footprint.
    pub fn cell_count(&self) -> usize {
        self.ncols * self.nrows
    }
}

impl fmt::Display for GridGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} cells at ({}, {}) resolution {}",
            self.ncols, self.nrows, self.origin_lon, self.origin_lat, self.cell_size
        )
    }
}

/// A single-band raster held fully in memory.
///
/// Values are stored row-major: index `y * ncols + x`. Cells equal to the
/// no-data sentinel are reported as missing; the comparison is exact
/// equality, matching how the sentinel is declared in the file header.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    geometry: GridGeometry,
    nodata: f32,
    values: Vec<f32>,
}

impl RasterGrid {
    /// Create a grid from raw row-major values.
    ///
    /// # Errors
    /// Returns [`CoreError::Dimensions`] when the value count does not match
    /// the declared geometry.
    pub fn new(geometry: GridGeometry, nodata: f32, values: Vec<f32>) -> Result<Self, CoreError> {
        let expected = geometry.cell_count();
        if values.len() != expected {
            return Err(CoreError::Dimensions {
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            geometry,
            nodata,
            values,
        })
    }

    /// Create a grid where every cell holds the same value.
    pub fn constant(geometry: GridGeometry, value: f32) -> Self {
        Self {
            geometry,
            nodata: DEFAULT_NODATA,
            values: vec![value; geometry.cell_count()],
        }
    }

    /// Create a grid by evaluating a function at every cell.
    pub fn from_fn(geometry: GridGeometry, nodata: f32, mut f: impl FnMut(i32, i32) -> f32) -> Self {
        let mut values = Vec::with_capacity(geometry.cell_count());
        for y in 0..geometry.nrows {
            for x in 0..geometry.ncols {
                values.push(f(x as i32, y as i32));
            }
        }
        Self {
            geometry,
            nodata,
            values,
        }
    }

    /// Declared footprint of this grid.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// No-data sentinel declared for this grid.
    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    /// Value at a cell, with the sentinel translated to missing.
    ///
    /// Returns `None` for out-of-bounds indices and for cells holding exactly
    /// the no-data sentinel.
    pub fn value(&self, x: i32, y: i32) -> Option<f32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.geometry.ncols || y >= self.geometry.nrows {
            return None;
        }
        let v = self.values[y * self.geometry.ncols + x];
        if v == self.nodata {
            None
        } else {
            Some(v)
        }
    }

    /// Convert into a coordinate-indexed single-column table.
    ///
    /// Produces one row per cell in row-major order with the no-data sentinel
    /// already translated to a missing marker, ready for joining.
    pub fn into_table(self, column: impl Into<String>) -> RasterTable {
        let nodata = self.nodata;
        let values = self
            .values
            .iter()
            .map(|&v| if v == nodata { None } else { Some(v) })
            .collect();
        RasterTable::new(column.into(), self.geometry, values)
    }
}

/// Sentinel used when a synthetic grid does not declare one.
pub(crate) const DEFAULT_NODATA: f32 = -9999.0;
