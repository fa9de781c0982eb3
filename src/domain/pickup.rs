//! Pickup calculator
//!
//! How many stitches to pick up along a vertical edge, and a simple
//! "pick up x stitches for every y rows" rate that gets close to it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gauge::Gauge;
use super::rounding::{round_count, RoundingDirection};

/// Largest numerator or denominator in a pickup rate
const MAX_RATE_TERM: u32 = 9;

#[derive(Debug, Error, PartialEq)]
pub enum PickupError {
    #[error("Edge has no rows to pick up from")]
    EmptyEdge,

    #[error("Edge length must be positive, got {0}")]
    InvalidLength(f64),
}

/// Where the edge length comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupEdge {
    Rows(u32),
    Inches(f64),
}

impl PickupEdge {
    pub fn rows(&self, gauge: &Gauge) -> Result<u32, PickupError> {
        let rows = match *self {
            PickupEdge::Rows(rows) => rows,
            PickupEdge::Inches(inches) => {
                if !(inches > 0.0) || !inches.is_finite() {
                    return Err(PickupError::InvalidLength(inches));
                }
                round_count(gauge.rows_in(inches), RoundingDirection::AnyDirection).max(0) as u32
            }
        };
        if rows == 0 {
            return Err(PickupError::EmptyEdge);
        }
        Ok(rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupEstimate {
    pub rows_on_edge: u32,
    pub stitches_to_pick_up: u32,
    pub stitch_pickup_rate: u32,
    pub row_pickup_rate: u32,
}

pub fn estimate_pickup(gauge: &Gauge, edge: PickupEdge) -> Result<PickupEstimate, PickupError> {
    let rows = edge.rows(gauge)?;
    let stitches = gauge.stitches_per_inch * f64::from(rows) / gauge.rows_per_inch;
    let (stitch_rate, row_rate) = closest_rate(stitches / f64::from(rows));

    Ok(PickupEstimate {
        rows_on_edge: rows,
        stitches_to_pick_up: round_count(stitches, RoundingDirection::AnyDirection).max(0) as u32,
        stitch_pickup_rate: stitch_rate,
        row_pickup_rate: row_rate,
    })
}

/// Smallest-term fraction closest to `ratio`; earlier candidates win ties
fn closest_rate(ratio: f64) -> (u32, u32) {
    let mut best = (1, 1);
    let mut best_distance = (1.0 - ratio).abs();
    for x in 1..=MAX_RATE_TERM {
        for y in 1..=MAX_RATE_TERM {
            let distance = (f64::from(x) / f64::from(y) - ratio).abs();
            if distance < best_distance {
                best = (x, y);
                best_distance = distance;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_to_seven_gauge() {
        let gauge = Gauge::new(5.0, 7.0).unwrap();
        let estimate = estimate_pickup(&gauge, PickupEdge::Rows(70)).unwrap();

        assert_eq!(estimate.stitches_to_pick_up, 50);
        assert_eq!((estimate.stitch_pickup_rate, estimate.row_pickup_rate), (5, 7));
    }

    #[test]
    fn three_in_four() {
        let gauge = Gauge::new(4.5, 6.0).unwrap();
        let estimate = estimate_pickup(&gauge, PickupEdge::Rows(30)).unwrap();

        assert_eq!(estimate.stitches_to_pick_up, 23);
        assert_eq!((estimate.stitch_pickup_rate, estimate.row_pickup_rate), (3, 4));
    }

    #[test]
    fn edge_given_in_inches() {
        let gauge = Gauge::new(5.0, 7.0).unwrap();
        let estimate = estimate_pickup(&gauge, PickupEdge::Inches(10.0)).unwrap();
        assert_eq!(estimate.rows_on_edge, 70);
        assert_eq!(estimate.stitches_to_pick_up, 50);
    }

    #[test]
    fn empty_edges_are_rejected() {
        let gauge = Gauge::new(5.0, 7.0).unwrap();
        assert_eq!(estimate_pickup(&gauge, PickupEdge::Rows(0)).unwrap_err(), PickupError::EmptyEdge);
        assert_eq!(
            estimate_pickup(&gauge, PickupEdge::Inches(-1.0)).unwrap_err(),
            PickupError::InvalidLength(-1.0)
        );
    }

    #[test]
    fn same_gauge_is_one_for_one() {
        assert_eq!(closest_rate(1.0), (1, 1));
        assert_eq!(closest_rate(0.5), (1, 2));
    }
}
