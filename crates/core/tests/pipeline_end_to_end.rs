//! End-to-end test of the raster-to-simulation pipeline: write synthetic
//! ASCII rasters to disk, load and join them, run the conditioned spread
//! simulator over the joined table, and sample single points.

use std::io::Write;
use std::path::Path;

use fire_risk_core::{
    generate_unbounded_spread, load_feature_table, ConditionedSpread, CoreError, PointSampler,
    Prediction, RasterSourceSpec, RiskModel, SpreadConditions,
};

/// Route library tracing through the test harness when `RUST_LOG` is set.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const NCOLS: usize = 8;
const NROWS: usize = 8;
const ORIGIN_LON: f64 = 79.0193;
const ORIGIN_LAT: f64 = 30.0668;
const CELL_SIZE: f64 = 0.01;

/// Write an 8x8 ASCII raster whose cells come from `f(x, y)`; return the
/// source spec binding it to `column`. `-9999` marks no-data.
fn write_raster(
    dir: &Path,
    column: &str,
    f: impl Fn(usize, usize) -> f32,
) -> RasterSourceSpec {
    let path = dir.join(format!("{column}.asc"));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "ncols {NCOLS}").unwrap();
    writeln!(file, "nrows {NROWS}").unwrap();
    writeln!(file, "xllcorner {ORIGIN_LON}").unwrap();
    writeln!(file, "yllcorner {ORIGIN_LAT}").unwrap();
    writeln!(file, "cellsize {CELL_SIZE}").unwrap();
    writeln!(file, "NODATA_value -9999").unwrap();
    for y in 0..NROWS {
        let row: Vec<String> = (0..NCOLS).map(|x| f(x, y).to_string()).collect();
        writeln!(file, "{}", row.join(" ")).unwrap();
    }
    RasterSourceSpec::new(path, column)
}

/// The five covariate sources of the production dataset, shrunk to 8x8.
/// One river cell (3, 3) carries no vegetation measurement.
fn write_sources(dir: &Path) -> Vec<RasterSourceSpec> {
    vec![
        write_raster(dir, "ndvi", |x, y| {
            if (x, y) == (3, 3) {
                -9999.0
            } else {
                0.8
            }
        }),
        write_raster(dir, "temp", |_, _| 30.0),
        write_raster(dir, "elevation", |x, _| 1500.0 + x as f32 * 10.0),
        write_raster(dir, "burned", |_, _| 0.0),
        write_raster(dir, "viirs_fire", |_, _| 0.0),
    ]
}

struct ThresholdModel;

impl RiskModel for ThresholdModel {
    fn predict(&self, features: &[f32]) -> i32 {
        i32::from(features[0] > 0.5)
    }
}

#[test]
fn load_join_and_simulate_over_real_files() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path());

    let table = load_feature_table(&sources).unwrap();

    // 64 cells minus the single no-data hole.
    assert_eq!(table.len(), 63);
    assert_eq!(
        table.columns(),
        ["ndvi", "temp", "elevation", "burned", "viirs_fire"]
    );
    assert!(!table.contains(3, 3));
    assert_eq!(table.value(0, 0, "elevation"), Some(1500.0));

    let sim = ConditionedSpread::new(&table, "ndvi", "temp").unwrap();
    let events = sim.simulate(0, 0, &SpreadConditions {
        threshold: 0.5,
        max_steps: 20,
        wind_speed: 0.0,
        wind_direction_deg: 0.0,
        humidity: 0.0,
    });

    // Everything flammable burns; the hole never appears.
    assert_eq!(events.len(), 63);
    assert!(events.iter().all(|e| (e.x, e.y) != (3, 3)));
    assert_eq!((events[0].x, events[0].y, events[0].step), (0, 0, 0));
}

#[test]
fn misaligned_source_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut sources = write_sources(dir.path());

    // A source with a different footprint.
    let path = dir.path().join("rogue.asc");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        "ncols 4\nnrows 4\nxllcorner {ORIGIN_LON}\nyllcorner {ORIGIN_LAT}\ncellsize {CELL_SIZE}\n{}",
        "1 1 1 1\n".repeat(4)
    )
    .unwrap();
    sources.push(RasterSourceSpec::new(path, "rogue"));

    let err = load_feature_table(&sources).unwrap_err();
    assert!(matches!(err, CoreError::AlignmentMismatch { column, .. } if column == "rogue"));
}

#[test]
fn missing_source_file_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut sources = write_sources(dir.path());
    sources.push(RasterSourceSpec::new(dir.path().join("gone.asc"), "gone"));

    assert!(matches!(
        load_feature_table(&sources).unwrap_err(),
        CoreError::Io { .. }
    ));
}

#[test]
fn point_sampling_and_classification_against_files() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let sources = write_sources(dir.path());

    let sampler = PointSampler::new(
        sources,
        vec!["ndvi".into(), "temp".into(), "elevation".into()],
    );
    let model = ThresholdModel;

    // Center of cell (2, 1).
    let lat = ORIGIN_LAT + 1.5 * CELL_SIZE;
    let lon = ORIGIN_LON + 2.5 * CELL_SIZE;
    let sample = sampler.sample(lat, lon, Some(&model));

    assert_eq!(sample.value("ndvi"), Some(0.8));
    assert_eq!(sample.value("temp"), Some(30.0));
    assert_eq!(sample.prediction, Prediction::Label(1));

    // The no-data hole blocks classification but still reports the rest.
    let lat = ORIGIN_LAT + 3.5 * CELL_SIZE;
    let lon = ORIGIN_LON + 3.5 * CELL_SIZE;
    let hole = sampler.sample(lat, lon, Some(&model));

    assert_eq!(hole.value("ndvi"), None);
    assert_eq!(hole.value("temp"), Some(30.0));
    assert_eq!(hole.prediction, Prediction::Unavailable);

    // Far outside the footprint: everything missing, no error.
    let outside = sampler.sample(0.0, 0.0, Some(&model));
    assert!(outside.values.iter().all(|(_, v)| v.is_none()));
    assert_eq!(outside.prediction, Prediction::Unavailable);
}

#[test]
fn unbounded_spread_matches_production_demo_scenario() {
    // The visualization endpoint's fixed scenario: ignition (10, 10), 15
    // steps, final frame is the full 31x31 Chebyshev square.
    let frames = generate_unbounded_spread(10, 10, 15);

    assert_eq!(frames.len(), 15);
    assert_eq!(frames[14].cells.len(), 961);
}
