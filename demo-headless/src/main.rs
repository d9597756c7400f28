//! Headless demo: builds synthetic covariate rasters, joins them into a
//! feature table, and runs both spread simulators, printing summaries.

use clap::Parser;
use fire_risk_core::{
    generate_unbounded_spread, ConditionedSpread, FeatureTable, GridGeometry, RasterGrid,
    SpreadConditions,
};
use rand::{Rng, SeedableRng};

/// Wildfire spread demo with configurable weather parameters
#[derive(Parser, Debug)]
#[command(name = "fire-risk-demo")]
#[command(about = "Grid-based wildfire spread simulation demo", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 40)]
    cols: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 40)]
    rows: usize,

    /// Ignition cell x
    #[arg(short = 'x', long, default_value_t = 20)]
    ignition_x: i32,

    /// Ignition cell y
    #[arg(short = 'y', long, default_value_t = 20)]
    ignition_y: i32,

    /// Vegetation threshold for ignition
    #[arg(short, long, default_value_t = 0.5)]
    threshold: f32,

    /// Maximum expansion steps
    #[arg(short, long, default_value_t = 10)]
    steps: u32,

    /// Wind speed
    #[arg(short = 'w', long, default_value_t = 10.0)]
    wind_speed: f32,

    /// Wind direction in degrees, snapped to the 8 lattice directions
    /// (0 points along +x, 90 along +y)
    #[arg(long, default_value_t = 90.0)]
    wind_direction: f32,

    /// Relative humidity in %
    #[arg(long, default_value_t = 30.0)]
    humidity: f32,

    /// Seed for the synthetic vegetation field
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Also run the unconditioned dilation model for this many steps
    #[arg(long, default_value_t = 0)]
    unbounded_steps: u32,
}

/// Synthetic covariates over the demo footprint: patchy vegetation with a
/// no-data river running down one column, and a north-south temperature
/// gradient.
fn build_table(args: &Args, geometry: GridGeometry) -> FeatureTable {
    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);
    let river_x = (geometry.ncols / 3) as i32;

    let ndvi = RasterGrid::from_fn(geometry, -9999.0, |x, _| {
        if x == river_x {
            -9999.0
        } else {
            rng.random_range(0.2..0.95)
        }
    });
    let temp = RasterGrid::from_fn(geometry, -9999.0, |_, y| {
        22.0 + 12.0 * (y as f32 / geometry.nrows as f32)
    });
    let elevation = RasterGrid::from_fn(geometry, -9999.0, |x, y| {
        1500.0 + 5.0 * (x + y) as f32
    });

    FeatureTable::join(&[
        ndvi.into_table("ndvi"),
        temp.into_table("temp"),
        elevation.into_table("elevation"),
    ])
    .unwrap_or_else(|err| {
        eprintln!("failed to build feature table: {err}");
        std::process::exit(1);
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("=== Wildfire Spread Demo ===\n");

    let geometry = GridGeometry {
        ncols: args.cols,
        nrows: args.rows,
        origin_lon: 79.0193,
        origin_lat: 30.0668,
        cell_size: 0.01,
    };
    let table = build_table(&args, geometry);
    println!(
        "Feature table: {} rows x {} columns over {}",
        table.len(),
        table.columns().len(),
        geometry
    );

    let sim = match ConditionedSpread::new(&table, "ndvi", "temp") {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("simulator setup failed: {err}");
            std::process::exit(1);
        }
    };
    let conditions = SpreadConditions {
        threshold: args.threshold,
        max_steps: args.steps,
        wind_speed: args.wind_speed,
        wind_direction_deg: args.wind_direction,
        humidity: args.humidity,
    };
    let events = sim.simulate(args.ignition_x, args.ignition_y, &conditions);

    println!(
        "\nConditioned spread from ({}, {}): {} cells burned",
        args.ignition_x,
        args.ignition_y,
        events.len()
    );
    if events.is_empty() {
        println!("Ignition cell is not in the feature table (river or out of bounds).");
    } else {
        let last = events[events.len() - 1];
        println!("Final ignition at step {}", last.step);
        for event in events.iter().take(5) {
            let (lon, lat) = geometry.cell_origin(event.x, event.y);
            println!(
                "  step {:>2}: cell ({:>3}, {:>3}) at ({:.4}, {:.4})",
                event.step, event.x, event.y, lon, lat
            );
        }
        if events.len() > 5 {
            println!("  ... {} more", events.len() - 5);
        }
    }

    if args.unbounded_steps > 0 {
        let frames = generate_unbounded_spread(args.ignition_x, args.ignition_y, args.unbounded_steps);
        println!("\nUnbounded dilation for {} steps:", args.unbounded_steps);
        for (i, frame) in frames.iter().enumerate() {
            println!("  frame {:>2}: {} burning cells", i, frame.cells.len());
        }
    }
}
