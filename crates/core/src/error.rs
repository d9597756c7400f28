//! Error types for raster loading, joining, and simulation setup.

use std::path::PathBuf;

use thiserror::Error;

use crate::raster::GridGeometry;

/// Errors surfaced by the core library.
///
/// Structural failures (unreadable or malformed rasters, misaligned grids)
/// are reported through this enum and propagate to the caller. Data-sparsity
/// conditions (missing values, absent cells, out-of-bounds sample points) are
/// not errors; they degrade to empty or missing results at the call site.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The raster file could not be opened or read.
    #[error("failed to read raster '{}'", path.display())]
    Io {
        /// Path of the offending raster.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The raster file was readable but not a valid ASCII grid.
    #[error("malformed raster '{}' at line {line}: {reason}", path.display())]
    Parse {
        /// Path of the offending raster.
        path: PathBuf,
        /// 1-based line number where parsing failed.
        line: usize,
        /// What was wrong with the content.
        reason: String,
    },

    /// Grid data length does not match the declared dimensions.
    #[error("raster data has {got} cells, declared geometry requires {expected}")]
    Dimensions {
        /// Cell count implied by the declared geometry.
        expected: usize,
        /// Cell count actually supplied.
        got: usize,
    },

    /// Two rasters submitted to a join declare different grid footprints.
    ///
    /// Joining misaligned grids would silently produce a meaningless row set,
    /// so alignment is checked up front and mismatches fail fast.
    #[error("raster grids are not aligned: column '{column}' declares {found}, expected {expected}")]
    AlignmentMismatch {
        /// Column whose source raster disagrees with the first input.
        column: String,
        /// Geometry of the first joined table.
        expected: GridGeometry,
        /// Geometry declared by the mismatched source.
        found: GridGeometry,
    },

    /// A feature table lookup referenced a column that was never joined in.
    #[error("feature table has no column named '{0}'")]
    UnknownColumn(String),
}
