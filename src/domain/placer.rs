//! Shaping placer
//!
//! Spreads the shaping between two stitch counts across a fixed number of
//! rows and centres the shaped section, leaving the odd plain row at the end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::edge::compute_edge_shaping_in_rows;

#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    #[error("Cannot shape an odd number of stitches ({start} to {end}) two stitches per row")]
    ParityMismatch { start: u32, end: u32 },

    #[error("Shaping {stitches} stitches at {per_row} per row needs more than {total_rows} rows")]
    TooFewRows {
        stitches: u32,
        per_row: u32,
        total_rows: u32,
    },

    #[error("Shaping rows change the count by 1 or 2 stitches, got {0}")]
    UnsupportedRate(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapingDirection {
    Increase,
    Decrease,
}

impl ShapingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapingDirection::Increase => "increase",
            ShapingDirection::Decrease => "decrease",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapingPlacement {
    pub num_shaping_rows: u32,
    /// Plain rows between two shaping rows
    pub rows_between: u32,
    pub rows_before_first: u32,
    pub rows_after_last: u32,
    pub direction: ShapingDirection,
}

impl ShapingPlacement {
    /// Shaping rows after the first
    pub fn num_shaping_repeats(&self) -> u32 {
        self.num_shaping_rows.saturating_sub(1)
    }

    /// Rows from the first shaping row through the last
    pub fn rows_in_shaping(&self) -> u32 {
        if self.num_shaping_rows == 0 {
            return 0;
        }
        self.num_shaping_rows + self.rows_between * self.num_shaping_repeats()
    }
}

/// Places shaping from `start` to `end` stitches in `total_rows` rows.
///
/// `per_row` is the number of stitches each shaping row adds or removes.
#[tracing::instrument(level = "debug")]
pub fn place_shaping(
    start: u32,
    end: u32,
    total_rows: u32,
    per_row: u32,
) -> Result<ShapingPlacement, PlacementError> {
    if per_row != 1 && per_row != 2 {
        return Err(PlacementError::UnsupportedRate(per_row));
    }
    let stitches = start.abs_diff(end);
    if per_row == 2 && stitches % 2 == 1 {
        return Err(PlacementError::ParityMismatch { start, end });
    }
    let too_few_rows = PlacementError::TooFewRows {
        stitches,
        per_row,
        total_rows,
    };
    if total_rows * per_row < stitches {
        return Err(too_few_rows);
    }

    // The edge solver shapes two stitches per row; doubling both counts turns
    // one-stitch rows into two-stitch rows with the same row count.
    let scale = 3 - per_row;
    let (larger, smaller) = (start.max(end) * scale, start.min(end) * scale);
    let outcome = compute_edge_shaping_in_rows(larger, smaller, f64::from(total_rows), false, None);
    if !outcome.constraints_met() {
        return Err(too_few_rows);
    }
    let shaping = outcome.into_shaping();

    let mut placement = ShapingPlacement {
        num_shaping_rows: shaping.num_standard_shaping_rows,
        rows_between: shaping.rows_between_standard_shaping_rows.unwrap_or(0),
        rows_before_first: 0,
        rows_after_last: 0,
        direction: if start < end {
            ShapingDirection::Increase
        } else {
            ShapingDirection::Decrease
        },
    };

    let remaining = total_rows - placement.rows_in_shaping();
    if placement.num_shaping_rows == 0 {
        placement.rows_before_first = remaining;
    } else {
        placement.rows_before_first = remaining / 2;
        placement.rows_after_last = remaining - remaining / 2;
    }
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increases_two_per_row() {
        let placement = place_shaping(40, 60, 40, 2).unwrap();

        assert_eq!(placement.num_shaping_rows, 10);
        assert_eq!(placement.rows_between, 3);
        assert_eq!(placement.num_shaping_repeats(), 9);
        assert_eq!(placement.rows_before_first, 1);
        assert_eq!(placement.rows_after_last, 2);
        assert_eq!(placement.direction, ShapingDirection::Increase);
        assert_eq!(placement.rows_in_shaping(), 37);
    }

    #[test]
    fn decreases_one_per_row() {
        let placement = place_shaping(60, 50, 40, 1).unwrap();

        assert_eq!(placement.num_shaping_rows, 10);
        assert_eq!(placement.rows_between, 3);
        assert_eq!(placement.rows_before_first, 1);
        assert_eq!(placement.rows_after_last, 2);
        assert_eq!(placement.direction, ShapingDirection::Decrease);
    }

    #[test]
    fn tight_budget() {
        let placement = place_shaping(50, 40, 12, 2).unwrap();
        assert_eq!(placement.num_shaping_rows, 5);
        assert_eq!(placement.rows_between, 1);
        assert_eq!(placement.rows_before_first, 1);
        assert_eq!(placement.rows_after_last, 2);
    }

    #[test]
    fn no_shaping_puts_all_rows_first() {
        let placement = place_shaping(40, 40, 10, 2).unwrap();
        assert_eq!(placement.num_shaping_rows, 0);
        assert_eq!(placement.rows_before_first, 10);
        assert_eq!(placement.rows_after_last, 0);
        assert_eq!(placement.rows_in_shaping(), 0);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            place_shaping(41, 60, 40, 2).unwrap_err(),
            PlacementError::ParityMismatch { start: 41, end: 60 }
        );
        assert_eq!(
            place_shaping(40, 60, 9, 2).unwrap_err(),
            PlacementError::TooFewRows {
                stitches: 20,
                per_row: 2,
                total_rows: 9
            }
        );
        assert_eq!(place_shaping(40, 60, 40, 3).unwrap_err(), PlacementError::UnsupportedRate(3));
    }

    #[test]
    fn one_per_row_accepts_odd_difference() {
        let placement = place_shaping(41, 60, 40, 1).unwrap();
        assert_eq!(placement.num_shaping_rows, 19);
        assert_eq!(placement.rows_in_shaping() + placement.rows_before_first + placement.rows_after_last, 40);
    }
}
