//! Unconditioned fire growth: pure dilation over the 8-connected lattice.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::spread::{FireCell, NEIGHBOR_OFFSETS};

/// The full set of burning cells after one dilation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadFrame {
    /// Every currently burning cell, in row-major order.
    pub cells: Vec<FireCell>,
}

/// Grow a fire front outward from an ignition cell for a fixed number of
/// steps with no environmental gating.
///
/// Each step adds every 8-connected neighbor of every burning cell; cells
/// never stop burning, so each frame is a superset of the previous one.
/// Coordinates are unclamped and may go negative — the model is not tied to
/// any raster footprint. Each frame lists the complete burning set with a
/// constant intensity of 1.0, sorted row-major for deterministic output.
pub fn generate_unbounded_spread(ignition_x: i32, ignition_y: i32, steps: u32) -> Vec<SpreadFrame> {
    let mut burning: FxHashSet<(i32, i32)> = FxHashSet::default();
    burning.insert((ignition_x, ignition_y));

    let mut frames = Vec::with_capacity(steps as usize);
    for _ in 0..steps {
        let mut grown: Vec<(i32, i32)> = Vec::with_capacity(burning.len() * 8);
        for &(x, y) in &burning {
            for (dx, dy) in NEIGHBOR_OFFSETS {
                grown.push((x + dx, y + dy));
            }
        }
        burning.extend(grown);

        let mut cells: Vec<(i32, i32)> = burning.iter().copied().collect();
        cells.sort_unstable_by_key(|&(x, y)| (y, x));
        frames.push(SpreadFrame {
            cells: cells
                .into_iter()
                .map(|(x, y)| FireCell {
                    x,
                    y,
                    intensity: 1.0,
                })
                .collect(),
        });
    }

    debug!(
        ignition_x,
        ignition_y,
        steps,
        final_cells = burning.len(),
        "generated unbounded spread"
    );
    frames
}
