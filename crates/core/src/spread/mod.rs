//! Fire-spread simulators over the integer cell lattice.
//!
//! Two models live here:
//! - [`generate_unbounded_spread`] — pure geometric dilation with no
//!   environmental gating, for visualization.
//! - [`ConditionedSpread`] — breadth-first frontier expansion gated by
//!   vegetation, temperature, wind, and humidity over a joined
//!   [`FeatureTable`](crate::table::FeatureTable).

mod conditioned;
mod unbounded;

use serde::{Deserialize, Serialize};

pub use conditioned::{ConditionedSpread, SpreadConditions, FLAMMABILITY_FLOOR};
pub use unbounded::{generate_unbounded_spread, SpreadFrame};

/// The 8-connected neighbor offsets, in frontier expansion order.
pub(crate) const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// One burning cell in an unbounded spread frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireCell {
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub y: i32,
    /// Burn intensity; the unbounded model reports a constant 1.0.
    pub intensity: f32,
}

/// A cell transitioning to burned at a given step of the conditioned
/// simulation. The sequence of these events is the burn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnEvent {
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub y: i32,
    /// Step index at which the cell ignited.
    pub step: u32,
}
