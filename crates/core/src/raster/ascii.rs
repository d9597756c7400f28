//! ESRI ASCII grid reader.
//!
//! The format is a short `key value` header followed by whitespace-separated
//! cell values in row-major order:
//!
//! ```text
//! ncols 4
//! nrows 3
//! xllcorner 79.0193
//! yllcorner 30.0668
//! cellsize 0.01
//! NODATA_value -9999
//! 0.1 0.2 0.3 0.4
//! ...
//! ```
//!
//! `NODATA_value` is optional and defaults to -9999. The whole file is read
//! into memory and the handle released before this function returns.

use std::path::Path;

use tracing::debug;

use crate::error::CoreError;
use crate::raster::{GridGeometry, RasterGrid, DEFAULT_NODATA};

/// Read a single-band ESRI ASCII grid from disk.
///
/// # Errors
/// Returns [`CoreError::Io`] when the file cannot be read and
/// [`CoreError::Parse`] when the header is incomplete or the data section
/// does not hold exactly `ncols * nrows` numeric values.
pub fn read_ascii_grid(path: &Path) -> Result<RasterGrid, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse_ascii_grid(&text, path)?;
    debug!(
        path = %path.display(),
        geometry = %grid.geometry(),
        nodata = grid.nodata(),
        "loaded raster"
    );
    Ok(grid)
}

struct HeaderField {
    key: &'static str,
    value: Option<f64>,
}

fn parse_ascii_grid(text: &str, path: &Path) -> Result<RasterGrid, CoreError> {
    let parse_err = |line: usize, reason: String| CoreError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut header = [
        HeaderField { key: "ncols", value: None },
        HeaderField { key: "nrows", value: None },
        HeaderField { key: "xllcorner", value: None },
        HeaderField { key: "yllcorner", value: None },
        HeaderField { key: "cellsize", value: None },
        HeaderField { key: "nodata_value", value: None },
    ];

    let mut values: Vec<f32> = Vec::new();
    let mut in_header = true;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if in_header {
            let mut parts = line.split_whitespace();
            let first = parts.next().unwrap_or_default();
            if first.chars().next().is_some_and(char::is_alphabetic) {
                let key = first.to_ascii_lowercase();
                let field = header
                    .iter_mut()
                    .find(|f| f.key == key)
                    .ok_or_else(|| parse_err(line_no, format!("unknown header key '{first}'")))?;
                let value = parts
                    .next()
                    .ok_or_else(|| parse_err(line_no, format!("header key '{first}' has no value")))?;
                field.value = Some(value.parse::<f64>().map_err(|_| {
                    parse_err(line_no, format!("header value '{value}' is not numeric"))
                })?);
                continue;
            }
            in_header = false;
        }

        for token in line.split_whitespace() {
            let v = token
                .parse::<f32>()
                .map_err(|_| parse_err(line_no, format!("cell value '{token}' is not numeric")))?;
            values.push(v);
        }
    }

    let required = |idx: usize| {
        header[idx]
            .value
            .ok_or_else(|| parse_err(1, format!("missing required header key '{}'", header[idx].key)))
    };

    let ncols = required(0)? as usize;
    let nrows = required(1)? as usize;
    let geometry = GridGeometry {
        ncols,
        nrows,
        origin_lon: required(2)?,
        origin_lat: required(3)?,
        cell_size: required(4)?,
    };
    let nodata = header[5].value.map_or(DEFAULT_NODATA, |v| v as f32);

    RasterGrid::new(geometry, nodata, values)
}
