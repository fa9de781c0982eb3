//! Solver outcomes
//!
//! Edge, compound and marker solvers never fail outright when the rows run
//! out. They return [`ShapingOutcome::Infeasible`] with the closest stitch
//! counts they could reach, and the caller decides what to do with it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rounding::FLOATING_POINT_NOISE;

/// Stitch counts a shaping solver cannot work between
#[derive(Debug, Error, PartialEq)]
pub enum CountError {
    #[error("Larger stitch count {larger} is below smaller count {smaller}")]
    Reversed { larger: u32, smaller: u32 },

    #[error("Stitch counts {larger} and {smaller} differ by an odd number; two stitches are shaped per row")]
    ParityMismatch { larger: u32, smaller: u32 },
}

/// Checks the counts before they reach a solver, which would panic on them
pub fn check_counts(larger: u32, smaller: u32) -> Result<(), CountError> {
    if larger < smaller {
        return Err(CountError::Reversed { larger, smaller });
    }
    if (larger - smaller) % 2 == 1 {
        return Err(CountError::ParityMismatch { larger, smaller });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShapingOutcome<S> {
    /// All constraints hold
    Solved {
        shaping: S,
        /// Height left over after the last shaping row, when the budget was
        /// given as a height
        vertical_play: Option<f64>,
    },
    /// The budget is too small; `best_effort` packs as tightly as allowed
    Infeasible {
        best_effort: S,
        /// Larger count reachable from the requested smaller count
        best_larger_stitches: u32,
        /// Smaller count reachable from the requested larger count
        best_smaller_stitches: u32,
    },
}

impl<S> ShapingOutcome<S> {
    pub fn constraints_met(&self) -> bool {
        matches!(self, ShapingOutcome::Solved { .. })
    }

    /// The shaping, solved or best effort
    pub fn shaping(&self) -> &S {
        match self {
            ShapingOutcome::Solved { shaping, .. } => shaping,
            ShapingOutcome::Infeasible { best_effort, .. } => best_effort,
        }
    }

    pub fn into_shaping(self) -> S {
        match self {
            ShapingOutcome::Solved { shaping, .. } => shaping,
            ShapingOutcome::Infeasible { best_effort, .. } => best_effort,
        }
    }

    pub fn vertical_play(&self) -> Option<f64> {
        match self {
            ShapingOutcome::Solved { vertical_play, .. } => *vertical_play,
            ShapingOutcome::Infeasible { .. } => None,
        }
    }

    pub fn best_larger_stitches(&self) -> Option<u32> {
        match self {
            ShapingOutcome::Infeasible {
                best_larger_stitches,
                ..
            } => Some(*best_larger_stitches),
            ShapingOutcome::Solved { .. } => None,
        }
    }

    pub fn best_smaller_stitches(&self) -> Option<u32> {
        match self {
            ShapingOutcome::Infeasible {
                best_smaller_stitches,
                ..
            } => Some(*best_smaller_stitches),
            ShapingOutcome::Solved { .. } => None,
        }
    }

    /// Converts the shaping type, keeping the outcome
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> ShapingOutcome<T> {
        match self {
            ShapingOutcome::Solved {
                shaping,
                vertical_play,
            } => ShapingOutcome::Solved {
                shaping: f(shaping),
                vertical_play,
            },
            ShapingOutcome::Infeasible {
                best_effort,
                best_larger_stitches,
                best_smaller_stitches,
            } => ShapingOutcome::Infeasible {
                best_effort: f(best_effort),
                best_larger_stitches,
                best_smaller_stitches,
            },
        }
    }

    /// Attaches the unused height to a solved outcome
    pub(crate) fn with_play(self, height: f64, rows_used: u32, rows_per_inch: f64) -> Self {
        match self {
            ShapingOutcome::Solved { shaping, .. } => ShapingOutcome::Solved {
                shaping,
                vertical_play: Some(vertical_play(height, rows_used, rows_per_inch)),
            },
            infeasible => infeasible,
        }
    }
}

/// Height left after `rows_used` rows, with tiny negative noise clamped to zero
pub fn vertical_play(height: f64, rows_used: u32, rows_per_inch: f64) -> f64 {
    let play = height - f64::from(rows_used) / rows_per_inch;
    if play < 0.0 && play > -FLOATING_POINT_NOISE {
        0.0
    } else {
        play
    }
}

/// Shaping events needed to go between two counts, two stitches per event
pub(crate) fn events_needed(larger: u32, smaller: u32) -> u32 {
    assert!(
        larger >= smaller,
        "larger stitch count {} is below smaller {}",
        larger,
        smaller
    );
    assert!(
        (larger - smaller) % 2 == 0,
        "stitch counts {} and {} differ in parity",
        larger,
        smaller
    );
    (larger - smaller) / 2
}

/// Best reachable endpoints when only `stitches_delta` stitches can be shaped
pub(crate) fn best_endpoints(larger: u32, smaller: u32, stitches_delta: u32) -> (u32, u32) {
    (
        smaller.saturating_add(stitches_delta),
        larger.saturating_sub(stitches_delta),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_accessors() {
        let outcome: ShapingOutcome<u32> = ShapingOutcome::Solved {
            shaping: 7,
            vertical_play: Some(0.5),
        };
        assert!(outcome.constraints_met());
        assert_eq!(*outcome.shaping(), 7);
        assert_eq!(outcome.vertical_play(), Some(0.5));
        assert_eq!(outcome.best_larger_stitches(), None);
    }

    #[test]
    fn infeasible_accessors() {
        let outcome: ShapingOutcome<u32> = ShapingOutcome::Infeasible {
            best_effort: 3,
            best_larger_stitches: 16,
            best_smaller_stitches: 14,
        };
        assert!(!outcome.constraints_met());
        assert_eq!(outcome.vertical_play(), None);
        assert_eq!(outcome.best_larger_stitches(), Some(16));
        assert_eq!(outcome.best_smaller_stitches(), Some(14));
        assert_eq!(outcome.map(|n| n * 2).into_shaping(), 6);
    }

    #[test]
    fn vertical_play_clamps_noise() {
        assert_eq!(vertical_play(1.0, 10, 10.0), 0.0);
        assert_eq!(vertical_play(1.0 - 1e-9, 10, 10.0), 0.0);
        assert!((vertical_play(1.0, 5, 10.0) - 0.5).abs() < 1e-12);
        assert!(vertical_play(1.0, 20, 10.0) < 0.0);
    }

    #[test]
    fn serializes_with_status_tag() {
        let outcome: ShapingOutcome<u32> = ShapingOutcome::Infeasible {
            best_effort: 3,
            best_larger_stitches: 16,
            best_smaller_stitches: 14,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "infeasible");
        assert_eq!(json["best_larger_stitches"], 16);
    }

    #[test]
    #[should_panic(expected = "differ in parity")]
    fn events_needed_rejects_parity_mismatch() {
        events_needed(11, 8);
    }

    #[test]
    fn check_counts_reports_what_the_solvers_assert() {
        assert_eq!(check_counts(20, 10), Ok(()));
        assert_eq!(check_counts(10, 10), Ok(()));
        assert_eq!(
            check_counts(10, 20),
            Err(CountError::Reversed { larger: 10, smaller: 20 })
        );
        assert_eq!(
            check_counts(11, 8),
            Err(CountError::ParityMismatch { larger: 11, smaller: 8 })
        );
    }

    #[test]
    fn best_endpoints_saturate() {
        assert_eq!(best_endpoints(20, 10, 4), (14, 16));
        assert_eq!(best_endpoints(4, 2, 10), (12, 0));
    }
}
