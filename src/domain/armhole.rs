//! Armhole bind-off and decrease search
//!
//! One side of an armhole loses `armhole_n` stitches as `x` bound off, then
//! `y` bound off two rows later, then `z` single decreases on alternate rows.
//! The search starts `x` at one inch of stitches and widens it until the
//! shaping fits inside the allowed fraction of the armhole depth.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gauge::{hypotenuse, Gauge};
use super::rounding::{round_to, RoundingDirection};

#[derive(Debug, Error, PartialEq)]
pub enum ArmholeShapingError {
    #[error("Armhole depth must be positive, got {0}")]
    InvalidDepth(f64),

    #[error("Not enough stitches for armhole shaping: {armhole_n} to remove, first bind-off alone is {bind_off}")]
    NotEnoughStitches { armhole_n: u32, bind_off: u32 },

    #[error("No armhole shaping for {armhole_n} stitches fits in {max_height:.2} inches")]
    NotEnoughHeight { armhole_n: u32, max_height: f64 },
}

/// Stitches removed at one armhole edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmholeShaping {
    /// First bind-off
    pub x: u32,
    /// Second bind-off, may be zero
    pub y: u32,
    /// Single decreases, one every other row
    pub z: u32,
}

impl ArmholeShaping {
    pub fn total_stitches(&self) -> u32 {
        self.x + self.y + self.z
    }

    /// Rows consumed, counting each bind-off and decrease with its return row
    pub fn shaping_rows(&self) -> u32 {
        let x_rows = if self.x > 0 { 2 } else { 0 };
        let y_rows = if self.y > 0 { 2 } else { 0 };
        x_rows + y_rows + 2 * self.z
    }

    pub fn shaping_height(&self, gauge: &Gauge) -> f64 {
        gauge.height_for_rows(f64::from(self.shaping_rows()))
    }
}

/// Finds the armhole shaping for one side
#[tracing::instrument(level = "debug", skip(gauge))]
pub fn calculate_armhole_shaping(
    armhole_n: u32,
    armhole_depth: f64,
    gauge: &Gauge,
    max_height_percentage: f64,
) -> Result<ArmholeShaping, ArmholeShapingError> {
    if !(armhole_depth > 0.0 && armhole_depth.is_finite()) {
        return Err(ArmholeShapingError::InvalidDepth(armhole_depth));
    }
    let max_height = armhole_depth * max_height_percentage;
    let fits = |candidate: &ArmholeShaping| {
        candidate.x >= 1 && candidate.shaping_height(gauge) < max_height
    };

    let first_x = round_to(gauge.stitches_per_inch, RoundingDirection::Down, 2.0, 0.0).max(0.0) as u32;
    if armhole_n < first_x + 1 {
        return Err(ArmholeShapingError::NotEnoughStitches {
            armhole_n,
            bind_off: first_x,
        });
    }

    for x in first_x..armhole_n {
        if let Some(found) = candidates_for(armhole_n, x).find(|c| fits(c)) {
            tracing::debug!(x = found.x, y = found.y, z = found.z, "armhole shaping found");
            return Ok(found);
        }
        tracing::trace!(x, "no armhole split fits, widening first bind-off");
    }

    Err(ArmholeShapingError::NotEnoughHeight {
        armhole_n,
        max_height,
    })
}

/// Splits of `armhole_n - x` into `(y, z)`, in the order they are tried
fn candidates_for(armhole_n: u32, x: u32) -> impl Iterator<Item = ArmholeShaping> {
    let remainder = armhole_n - x;
    let small = match remainder {
        1 => Some((0, 1)),
        2 => Some((0, 2)),
        3 => Some((2, 1)),
        _ => None,
    };
    let large = (remainder > 3).then(|| (2..x).take_while(move |&y| y < remainder));

    small
        .into_iter()
        .chain(large.into_iter().flatten().map(move |y| (y, remainder - y)))
        .map(move |(y, z)| ArmholeShaping { x, y, z })
}

/// Armhole edge length on one side: both bind-offs, the decrease diagonal,
/// and the straight rows above it
pub fn compute_armhole_circumference(
    gauge: &Gauge,
    shaping: &ArmholeShaping,
    armhole_depth: f64,
) -> f64 {
    let bind_off_rows = if shaping.y > 0 { 2.0 } else { 1.0 };
    let z = f64::from(shaping.z);
    let diagonal = hypotenuse(gauge.width_for_stitches(z), gauge.height_for_rows(2.0 * z));
    let straight = armhole_depth - gauge.height_for_rows(bind_off_rows + 2.0 * z);

    gauge.width_for_stitches(f64::from(shaping.x))
        + gauge.width_for_stitches(f64::from(shaping.y))
        + diagonal
        + straight
}
