//! Wildfire Risk Grid Core Library
//!
//! Estimates and simulates wildfire risk and spread over a gridded region.
//! The library covers the algorithmic core of the system:
//!
//! - loading single-band rasters of environmental covariates into
//!   coordinate-indexed tables ([`raster`]),
//! - joining independently gridded sources into fully populated per-cell
//!   feature rows ([`table`]),
//! - two cellular-automaton spread models over the cell lattice
//!   ([`spread`]),
//! - direct point sampling with optional classification ([`sample`]).
//!
//! Serving, model training, and export formatting are external callers: they
//! hand in raster paths and a [`RiskModel`] and consume the burn sequences
//! and feature tables produced here. All operations are synchronous and keep
//! their mutable state local to one call.

pub mod error;
pub mod raster;
pub mod sample;
pub mod spread;
pub mod table;

pub use error::CoreError;
pub use raster::{read_ascii_grid, GridGeometry, RasterGrid};
pub use sample::{PointSample, PointSampler, Prediction, RiskModel};
pub use spread::{
    generate_unbounded_spread, BurnEvent, ConditionedSpread, FireCell, SpreadConditions,
    SpreadFrame, FLAMMABILITY_FLOOR,
};
pub use table::{load_feature_table, FeatureTable, RasterSourceSpec, RasterTable};
