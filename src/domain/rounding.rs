//! Rounding primitives and the measurement discretizer
//!
//! Physical measurements become stitch and row counts here. Every count the
//! solvers produce starts life as `length * gauge`, rounded in a direction the
//! caller chooses and snapped onto a stitch-pattern repeat.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Differences smaller than this are representation error, not real fractions
pub const FLOATING_POINT_NOISE: f64 = 1e-6;

/// How fractional counts are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RoundingDirection {
    Up,
    Down,
    /// Closest value; ties go up
    #[default]
    Nearest,
    /// Same resolution as `Nearest`
    AnyDirection,
}

impl RoundingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingDirection::Up => "up",
            RoundingDirection::Down => "down",
            RoundingDirection::Nearest => "nearest",
            RoundingDirection::AnyDirection => "any_direction",
        }
    }
}

/// A count `c` satisfies the constraint when `(c - x_mod) % mod_y == 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepeatConstraint {
    pub x_mod: u32,
    pub mod_y: u32,
}

impl RepeatConstraint {
    pub fn new(x_mod: u32, mod_y: u32) -> Self {
        Self { x_mod, mod_y }
    }

    /// Returns true if `count` lands on the repeat
    pub fn is_satisfied_by(&self, count: u32) -> bool {
        if self.mod_y == 0 {
            return count == self.x_mod;
        }
        (i64::from(count) - i64::from(self.x_mod)).rem_euclid(i64::from(self.mod_y)) == 0
    }
}

impl Default for RepeatConstraint {
    fn default() -> Self {
        Self { x_mod: 0, mod_y: 1 }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ApproximationError {
    #[error("Rate must be positive, got {0}")]
    InvalidRate(f64),

    #[error("Repeat modulus must be positive")]
    ZeroModulus,

    #[error("No count within {tolerance} of {target} at {rate} per unit satisfies the repeat (closest was {closest})")]
    OutOfTolerance {
        target: f64,
        rate: f64,
        tolerance: f64,
        closest: u32,
    },
}

/// Rounds `orig` onto the lattice `{ k * multiple + modulus }`.
///
/// `multiple` may be fractional (0.5 gives half-integers). Values within
/// [`FLOATING_POINT_NOISE`] of a lattice point snap to it regardless of
/// direction.
pub fn round_to(orig: f64, direction: RoundingDirection, multiple: f64, modulus: f64) -> f64 {
    let base = (orig / multiple).floor() * multiple;

    let lower = if base + modulus <= orig {
        base + modulus
    } else {
        base - multiple + modulus
    };

    let mut upper = base;
    if upper < orig {
        upper += multiple;
    }
    let upper = if upper - multiple + modulus >= orig {
        upper - multiple + modulus
    } else {
        upper + modulus
    };

    if (upper - orig).abs() < FLOATING_POINT_NOISE {
        return upper;
    }
    if (orig - lower).abs() < FLOATING_POINT_NOISE {
        return lower;
    }

    match direction {
        RoundingDirection::Up => upper,
        RoundingDirection::Down => lower,
        RoundingDirection::Nearest | RoundingDirection::AnyDirection => {
            if orig - lower < upper - orig {
                lower
            } else {
                upper
            }
        }
    }
}

/// Integer rounding with unit multiple
pub fn round_count(orig: f64, direction: RoundingDirection) -> i64 {
    round_to(orig, direction, 1.0, 0.0).round() as i64
}

/// Even values step down to the next odd value
pub fn down_to_odd(x: i64) -> i64 {
    if x.rem_euclid(2) == 0 {
        x - 1
    } else {
        x
    }
}

/// Converts a physical length to a count at the given rate.
///
/// The result honours `direction`, lands on `repeat` when one is given, and
/// deviates from `target` by at most `tolerance` units of length. When no
/// candidate qualifies the garment is infeasible at this gauge.
#[tracing::instrument(level = "debug", skip(repeat), fields(repeat = ?repeat))]
pub fn find_best_approximation(
    target: f64,
    rate: f64,
    direction: RoundingDirection,
    tolerance: f64,
    repeat: Option<RepeatConstraint>,
) -> Result<u32, ApproximationError> {
    if !(rate > 0.0) || !rate.is_finite() {
        return Err(ApproximationError::InvalidRate(rate));
    }
    let repeat = repeat.unwrap_or_default();
    if repeat.mod_y == 0 {
        return Err(ApproximationError::ZeroModulus);
    }

    let raw = target * rate;
    let multiple = f64::from(repeat.mod_y);
    let modulus = f64::from(repeat.x_mod % repeat.mod_y);

    let mut candidate = round_to(raw, direction, multiple, modulus);
    // Counts cannot go negative; step up onto the first non-negative repeat
    while candidate < 0.0 {
        candidate += multiple;
    }

    let count = candidate.round() as u32;
    if (candidate / rate - target).abs() <= tolerance + FLOATING_POINT_NOISE {
        tracing::debug!(raw, count, "approximation accepted");
        Ok(count)
    } else {
        tracing::debug!(raw, count, "approximation out of tolerance");
        Err(ApproximationError::OutOfTolerance {
            target,
            rate,
            tolerance,
            closest: count,
        })
    }
}
