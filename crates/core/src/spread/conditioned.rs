//! Environmentally gated fire spread over a joined feature table.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::spread::{BurnEvent, NEIGHBOR_OFFSETS};
use crate::table::FeatureTable;

/// Minimum cell temperature for ignition, in the units of the temperature
/// raster.
pub const FLAMMABILITY_FLOOR: f32 = 20.0;

/// Weather forcing and termination parameters for a conditioned spread run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadConditions {
    /// Adjusted vegetation must exceed this for a neighbor to ignite.
    pub threshold: f32,
    /// Cells reached at this step still burn but stop expanding.
    pub max_steps: u32,
    /// Wind speed; boosts the single downwind neighbor by `speed / 20`.
    pub wind_speed: f32,
    /// Wind direction in degrees; snapped to the nearest of the 8 lattice
    /// directions via `(round(cos), round(sin))`. Continuous angles are
    /// deliberately not modeled.
    pub wind_direction_deg: f32,
    /// Relative humidity 0-100; damps spread linearly as `1 - humidity/100`.
    pub humidity: f32,
}

impl Default for SpreadConditions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            max_steps: 10,
            wind_speed: 10.0,
            wind_direction_deg: 90.0,
            humidity: 30.0,
        }
    }
}

/// Breadth-first fire spread gated by vegetation, temperature, wind, and
/// humidity.
///
/// Cells absent from the feature table are untraversable and never ignite.
/// All burn state is local to one [`simulate`](ConditionedSpread::simulate)
/// call, so concurrent runs over the same table are independent.
#[derive(Debug)]
pub struct ConditionedSpread<'a> {
    table: &'a FeatureTable,
    vegetation: usize,
    temperature: usize,
}

impl<'a> ConditionedSpread<'a> {
    /// Bind the simulator to a feature table and its vegetation and
    /// temperature columns.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownColumn`] when the table lacks either
    /// column.
    pub fn new(
        table: &'a FeatureTable,
        vegetation_column: &str,
        temperature_column: &str,
    ) -> Result<Self, CoreError> {
        let vegetation = table
            .column_index(vegetation_column)
            .ok_or_else(|| CoreError::UnknownColumn(vegetation_column.to_string()))?;
        let temperature = table
            .column_index(temperature_column)
            .ok_or_else(|| CoreError::UnknownColumn(temperature_column.to_string()))?;
        Ok(Self {
            table,
            vegetation,
            temperature,
        })
    }

    /// Run the frontier expansion from an ignition cell and return the
    /// ordered burn sequence.
    ///
    /// The frontier is processed FIFO, so the output is breadth-first burn
    /// order; a cell is never reprocessed once burned. A start cell absent
    /// from the table yields an empty sequence, not an error. The run is
    /// deterministic for identical inputs.
    pub fn simulate(
        &self,
        start_x: i32,
        start_y: i32,
        conditions: &SpreadConditions,
    ) -> Vec<BurnEvent> {
        // Snap wind onto the 8-connected lattice; only the one neighbor
        // directly downwind receives the boost.
        let radians = f64::from(conditions.wind_direction_deg).to_radians();
        let wind_offset = (radians.cos().round() as i32, radians.sin().round() as i32);
        let wind_boost = 1.0 + conditions.wind_speed / 20.0;
        let humidity_penalty = 1.0 - conditions.humidity / 100.0;

        // Fresh burn state per invocation; nothing is shared across calls.
        let mut burned = vec![false; self.table.len()];
        let mut frontier: VecDeque<(i32, i32, u32)> = VecDeque::new();
        frontier.push_back((start_x, start_y, 0));

        let mut sequence = Vec::new();
        while let Some((x, y, step)) = frontier.pop_front() {
            let Some(row) = self.table.row_index(x, y) else {
                continue;
            };
            if burned[row] {
                continue;
            }
            burned[row] = true;
            sequence.push(BurnEvent { x, y, step });

            if step >= conditions.max_steps {
                continue;
            }

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let (nx, ny) = (x + dx, y + dy);
                let Some(neighbor) = self.table.row_index(nx, ny) else {
                    continue;
                };
                if burned[neighbor] {
                    continue;
                }

                let boost = if (dx, dy) == wind_offset {
                    wind_boost
                } else {
                    1.0
                };
                let adjusted_vegetation =
                    self.table.value_at(neighbor, self.vegetation) * boost * humidity_penalty;
                let temperature = self.table.value_at(neighbor, self.temperature);

                if adjusted_vegetation > conditions.threshold && temperature > FLAMMABILITY_FLOOR {
                    frontier.push_back((nx, ny, step + 1));
                }
            }
        }

        debug!(
            start_x,
            start_y,
            burned = sequence.len(),
            max_steps = conditions.max_steps,
            "conditioned spread complete"
        );
        sequence
    }
}
