//! Coordinate-indexed feature tables and the raster join pipeline.
//!
//! Each raster becomes a single-column [`RasterTable`] keyed by (x, y).
//! [`FeatureTable::join`] inner-joins any number of those tables on the cell
//! key and drops every row with a missing value, yielding the fully
//! populated per-cell feature rows consumed by the classifier and the
//! conditioned spread simulator.

use std::path::PathBuf;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::raster::{read_ascii_grid, GridGeometry};

/// A raster file on disk together with the column name its values take in
/// the joined feature table.
#[derive(Debug, Clone)]
pub struct RasterSourceSpec {
    /// Path to the ESRI ASCII grid.
    pub path: PathBuf,
    /// Column name in the joined table (e.g. `"ndvi"`, `"temp"`).
    pub column: String,
}

impl RasterSourceSpec {
    /// Convenience constructor.
    pub fn new(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            column: column.into(),
        }
    }
}

/// One named column over a full grid footprint.
///
/// Every cell of the grid has a row; missing measurements are `None`. Rows
/// are stored row-major, so the (x, y) key is implied by position.
#[derive(Debug, Clone)]
pub struct RasterTable {
    column: String,
    geometry: GridGeometry,
    values: Vec<Option<f32>>,
}

impl RasterTable {
    pub(crate) fn new(column: String, geometry: GridGeometry, values: Vec<Option<f32>>) -> Self {
        debug_assert_eq!(values.len(), geometry.cell_count());
        Self {
            column,
            geometry,
            values,
        }
    }

    /// Column name carried by this table.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Grid footprint this table was derived from.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Value at a cell; `None` when out of bounds or missing.
    pub fn value(&self, x: i32, y: i32) -> Option<f32> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.geometry.ncols || y >= self.geometry.nrows {
            return None;
        }
        self.values[y * self.geometry.ncols + x]
    }
}

/// Fully populated per-cell feature rows, the output of the join-and-drop
/// step.
///
/// Rows keep the row-major order of the underlying grid; a hash index over
/// the (x, y) key gives O(1) lookup for the simulators. The table is
/// immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    columns: Vec<String>,
    keys: Vec<(i32, i32)>,
    /// Flat row-major storage, `keys.len() * columns.len()` values.
    values: Vec<f32>,
    index: FxHashMap<(i32, i32), usize>,
}

impl FeatureTable {
    /// An empty table with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Natural inner join of single-column tables on the (x, y) key,
    /// dropping every row with a missing value in any column.
    ///
    /// Column order follows input order. Zero surviving rows is a valid
    /// empty result, as is an empty input slice.
    ///
    /// # Errors
    /// Returns [`CoreError::AlignmentMismatch`] when the inputs do not all
    /// declare the same grid footprint; joining misaligned grids would
    /// silently produce a meaningless row set.
    pub fn join(tables: &[RasterTable]) -> Result<Self, CoreError> {
        let Some(first) = tables.first() else {
            return Ok(Self::empty());
        };

        for table in &tables[1..] {
            if table.geometry != first.geometry {
                return Err(CoreError::AlignmentMismatch {
                    column: table.column.clone(),
                    expected: first.geometry,
                    found: table.geometry,
                });
            }
        }

        let ncols_grid = first.geometry.ncols;
        let cell_count = first.geometry.cell_count();
        let width = tables.len();

        let mut keys = Vec::new();
        let mut values = Vec::new();
        let mut index = FxHashMap::default();

        'cells: for cell in 0..cell_count {
            let row_start = values.len();
            for table in tables {
                match table.values[cell] {
                    Some(v) => values.push(v),
                    None => {
                        values.truncate(row_start);
                        continue 'cells;
                    }
                }
            }
            let key = ((cell % ncols_grid) as i32, (cell / ncols_grid) as i32);
            index.insert(key, keys.len());
            keys.push(key);
        }

        debug!(
            columns = width,
            cells = cell_count,
            rows = keys.len(),
            "joined feature tables"
        );

        Ok(Self {
            columns: tables.iter().map(|t| t.column.clone()).collect(),
            keys,
            values,
            index,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Column names, in join order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a cell survived the join.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index.contains_key(&(x, y))
    }

    /// Row position of a cell, if present.
    pub fn row_index(&self, x: i32, y: i32) -> Option<usize> {
        self.index.get(&(x, y)).copied()
    }

    /// Value at a row position and column position.
    ///
    /// # Panics
    /// Panics when either position is out of range; positions come from
    /// [`FeatureTable::row_index`] and [`FeatureTable::column_index`].
    pub fn value_at(&self, row: usize, column: usize) -> f32 {
        assert!(row < self.keys.len() && column < self.columns.len());
        self.values[row * self.columns.len() + column]
    }

    /// Value at a cell and named column; `None` when either is absent.
    pub fn value(&self, x: i32, y: i32, column: &str) -> Option<f32> {
        let row = self.row_index(x, y)?;
        let col = self.column_index(column)?;
        Some(self.value_at(row, col))
    }

    /// Iterate rows in row-major key order as `((x, y), values)`.
    pub fn rows(&self) -> impl Iterator<Item = ((i32, i32), &[f32])> + '_ {
        let width = self.columns.len();
        self.keys
            .iter()
            .enumerate()
            .map(move |(i, &key)| (key, &self.values[i * width..(i + 1) * width]))
    }
}

/// Load every source raster and join them into one feature table.
///
/// Sources are read in parallel; each file is opened, fully read, and closed
/// within its own load. Join and drop semantics are those of
/// [`FeatureTable::join`].
///
/// # Errors
/// Propagates the first raster load failure, or
/// [`CoreError::AlignmentMismatch`] when the sources disagree on footprint.
pub fn load_feature_table(sources: &[RasterSourceSpec]) -> Result<FeatureTable, CoreError> {
    let tables: Vec<RasterTable> = sources
        .par_iter()
        .map(|spec| Ok(read_ascii_grid(&spec.path)?.into_table(spec.column.clone())))
        .collect::<Result<_, CoreError>>()?;

    let table = FeatureTable::join(&tables)?;
    info!(
        sources = sources.len(),
        rows = table.len(),
        "loaded and joined feature table"
    );
    Ok(table)
}
