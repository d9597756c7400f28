//! Single-point raster sampling with optional risk classification.
//!
//! Maps a geographic coordinate to grid indices against each source's
//! declared footprint and reads the cell value directly. Every failure mode
//! on this path (unreadable source, out-of-bounds index, no-data cell)
//! degrades to a missing value for that attribute only; classification is
//! attempted only when every required feature sampled non-missing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::raster::read_ascii_grid;
use crate::table::RasterSourceSpec;

/// External classifier capability.
///
/// The core never trains or persists a model; callers supply one trained
/// elsewhere. `features` arrive in the sampler's configured column order.
pub trait RiskModel {
    /// Predict a discrete class label from a per-cell feature vector.
    fn predict(&self, features: &[f32]) -> i32;
}

/// Outcome of the optional classification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    /// The classifier ran and produced this label.
    Label(i32),
    /// No model was supplied or a required feature was missing.
    Unavailable,
}

/// Per-attribute values sampled at one geographic point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSample {
    /// (column, value) pairs in source order; `None` marks a missing value.
    pub values: Vec<(String, Option<f32>)>,
    /// Classification result, when one was possible.
    pub prediction: Prediction,
}

impl PointSample {
    /// Sampled value for a named attribute, if present and non-missing.
    pub fn value(&self, column: &str) -> Option<f32> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, v)| *v)
    }
}

/// Samples raster values at geographic points, one open-read-close cycle per
/// source per query.
#[derive(Debug, Clone)]
pub struct PointSampler {
    sources: Vec<RasterSourceSpec>,
    feature_columns: Vec<String>,
}

impl PointSampler {
    /// Create a sampler over the given sources.
    ///
    /// `feature_columns` names the attributes fed to the classifier, in the
    /// order the model expects them; columns sampled but not listed here are
    /// reported without participating in classification.
    pub fn new(sources: Vec<RasterSourceSpec>, feature_columns: Vec<String>) -> Self {
        Self {
            sources,
            feature_columns,
        }
    }

    /// Sample every source at a geographic point.
    ///
    /// Each source maps the point through its own declared origin and cell
    /// size (`floor((coord - origin) / cell_size)` per axis). A source that
    /// cannot be read, an index outside its bounds, or a no-data cell all
    /// yield a missing value for that attribute, never a hard error.
    /// Classification runs only when a model is supplied and every feature
    /// column sampled non-missing.
    pub fn sample(&self, lat: f64, lon: f64, model: Option<&dyn RiskModel>) -> PointSample {
        let values: Vec<(String, Option<f32>)> = self
            .sources
            .iter()
            .map(|spec| (spec.column.clone(), sample_source(spec, lat, lon)))
            .collect();

        let prediction = match model {
            Some(model) => {
                let features: Option<Vec<f32>> = self
                    .feature_columns
                    .iter()
                    .map(|column| {
                        values
                            .iter()
                            .find(|(name, _)| name == column)
                            .and_then(|(_, v)| *v)
                    })
                    .collect();
                match features {
                    Some(features) => Prediction::Label(model.predict(&features)),
                    None => Prediction::Unavailable,
                }
            }
            None => Prediction::Unavailable,
        };

        PointSample { values, prediction }
    }
}

fn sample_source(spec: &RasterSourceSpec, lat: f64, lon: f64) -> Option<f32> {
    match read_ascii_grid(&spec.path) {
        Ok(grid) => {
            let (x, y) = grid.geometry().cell_index(lat, lon)?;
            grid.value(x, y)
        }
        Err(err) => {
            warn!(
                column = %spec.column,
                error = %err,
                "raster unreadable during point sample, reporting missing"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    struct ConstantModel(i32);

    impl RiskModel for ConstantModel {
        fn predict(&self, features: &[f32]) -> i32 {
            assert_eq!(features.len(), 2);
            self.0
        }
    }

    /// 2x2 grid at origin (10, 20), cell size 1, with a no-data hole at
    /// (1, 0).
    fn write_grid(dir: &Path, name: &str, values: &str) -> RasterSourceSpec {
        let path = dir.join(format!("{name}.asc"));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "ncols 2\nnrows 2\nxllcorner 10\nyllcorner 20\ncellsize 1\nNODATA_value -9999\n{values}\n"
        )
        .unwrap();
        RasterSourceSpec::new(path, name)
    }

    fn sampler(dir: &Path) -> PointSampler {
        let ndvi = write_grid(dir, "ndvi", "0.5 -9999\n0.7 0.8");
        let temp = write_grid(dir, "temp", "25 26\n27 28");
        PointSampler::new(
            vec![ndvi, temp],
            vec!["ndvi".to_string(), "temp".to_string()],
        )
    }

    #[test]
    fn samples_all_attributes_at_a_point() {
        let dir = tempfile::tempdir().unwrap();
        let sample = sampler(dir.path()).sample(20.5, 10.5, None);

        assert_eq!(sample.value("ndvi"), Some(0.5));
        assert_eq!(sample.value("temp"), Some(25.0));
        assert_eq!(sample.prediction, Prediction::Unavailable);
    }

    #[test]
    fn out_of_bounds_point_reports_all_missing() {
        let dir = tempfile::tempdir().unwrap();
        let sample = sampler(dir.path()).sample(50.0, 10.5, None);

        assert!(sample.values.iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn nodata_cell_blocks_classification() {
        let dir = tempfile::tempdir().unwrap();
        let model = ConstantModel(1);
        // (1, 0) cell: ndvi is the sentinel, temp is fine.
        let sample = sampler(dir.path()).sample(20.5, 11.5, Some(&model));

        assert_eq!(sample.value("ndvi"), None);
        assert_eq!(sample.value("temp"), Some(26.0));
        assert_eq!(sample.prediction, Prediction::Unavailable);
    }

    #[test]
    fn classification_runs_when_all_features_present() {
        let dir = tempfile::tempdir().unwrap();
        let model = ConstantModel(1);
        let sample = sampler(dir.path()).sample(21.5, 11.5, Some(&model));

        assert_eq!(sample.prediction, Prediction::Label(1));
    }

    #[test]
    fn unreadable_source_degrades_to_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = sampler(dir.path());
        s.sources.push(RasterSourceSpec::new(
            dir.path().join("absent.asc"),
            "elevation",
        ));
        let sample = s.sample(20.5, 10.5, None);

        assert_eq!(sample.value("elevation"), None);
        assert_eq!(sample.value("ndvi"), Some(0.5));
    }
}
