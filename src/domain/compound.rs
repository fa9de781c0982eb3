//! Compound edge shaping
//!
//! When `(rows - 1) / (k - 1)` is not whole, alternating two adjacent gaps
//! lands closer to the row budget than any single gap. Standard and alternate
//! shaping rows interleave: the standard rows take the first gap, alternates
//! take the other, and the two counts differ by at most one.

use serde::{Deserialize, Serialize};

use super::edge::{compute_edge_shaping, EdgeShaping, EdgeShapingOptions};
use super::gauge::Gauge;
use super::rounding::{round_count, round_to, RoundingDirection};
use super::shaping::{best_endpoints, events_needed, ShapingOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompoundEdgeShaping {
    pub num_standard_shaping_rows: u32,
    pub rows_between_standard_shaping_rows: Option<u32>,
    pub num_alternate_shaping_rows: u32,
    /// `None` when there are no alternate rows
    pub rows_after_alternate_shaping_rows: Option<u32>,
    pub max_distance_constraint_hit: bool,
}

impl CompoundEdgeShaping {
    /// True when only one rate is in use
    pub fn is_single_rate(&self) -> bool {
        self.num_alternate_shaping_rows == 0
    }

    pub fn num_total_shaping_rows(&self) -> u32 {
        self.num_standard_shaping_rows + self.num_alternate_shaping_rows
    }

    pub fn stitches_shaped(&self) -> u32 {
        2 * self.num_total_shaping_rows()
    }

    /// Rows from the first shaping row through the last, inclusive
    pub fn num_total_rows(&self) -> u32 {
        compound_total_rows(
            self.num_standard_shaping_rows,
            self.rows_between_standard_shaping_rows.unwrap_or(0),
            self.num_alternate_shaping_rows,
            self.rows_after_alternate_shaping_rows.unwrap_or(0),
        )
    }
}

impl From<EdgeShaping> for CompoundEdgeShaping {
    fn from(edge: EdgeShaping) -> Self {
        Self {
            num_standard_shaping_rows: edge.num_standard_shaping_rows,
            rows_between_standard_shaping_rows: edge.rows_between_standard_shaping_rows,
            num_alternate_shaping_rows: 0,
            rows_after_alternate_shaping_rows: None,
            max_distance_constraint_hit: edge.max_distance_constraint_hit,
        }
    }
}

pub type CompoundEdgeShapingResult = ShapingOutcome<CompoundEdgeShaping>;

fn compound_total_rows(standard: u32, gap1: u32, alternate: u32, gap2: u32) -> u32 {
    if standard <= 1 {
        standard
    } else if alternate == 0 {
        standard + gap1 * (standard - 1)
    } else {
        standard + gap1 * standard + alternate + gap2 * (alternate - 1)
    }
}

/// Solves edge shaping with up to two interleaved rates
#[tracing::instrument(level = "debug", skip(gauge))]
pub fn compute_compound_edge_shaping(
    larger: u32,
    smaller: u32,
    height: f64,
    gauge: &Gauge,
) -> CompoundEdgeShapingResult {
    let k = events_needed(larger, smaller);
    let total_rows = round_count(gauge.rows_in(height), RoundingDirection::Down).max(0) as u32;

    if total_rows < 1 {
        if k == 0 {
            return solved(CompoundEdgeShaping::default(), height, 0, gauge);
        }
        let (best_larger, best_smaller) = best_endpoints(larger, smaller, 0);
        return ShapingOutcome::Infeasible {
            best_effort: CompoundEdgeShaping::default(),
            best_larger_stitches: best_larger,
            best_smaller_stitches: best_smaller,
        };
    }

    match k {
        0 => return solved(CompoundEdgeShaping::default(), height, 0, gauge),
        1 => {
            let single = CompoundEdgeShaping {
                num_standard_shaping_rows: 1,
                ..Default::default()
            };
            return solved(single, height, 1, gauge);
        }
        _ => {}
    }

    let rows_per_shaping = round_to(
        f64::from(total_rows - 1) / f64::from(k - 1),
        RoundingDirection::Down,
        0.5,
        0.0,
    );

    if rows_per_shaping < 1.0 {
        tracing::debug!(k, total_rows, "compound shaping does not fit");
        let best_effort = CompoundEdgeShaping {
            num_standard_shaping_rows: total_rows,
            rows_between_standard_shaping_rows: Some(0),
            ..Default::default()
        };
        let (best_larger, best_smaller) = best_endpoints(larger, smaller, 2 * total_rows);
        return ShapingOutcome::Infeasible {
            best_effort,
            best_larger_stitches: best_larger,
            best_smaller_stitches: best_smaller,
        };
    }

    if rows_per_shaping.fract() == 0.0 {
        tracing::debug!(rows_per_shaping, "single rate suffices");
        return compute_edge_shaping(larger, smaller, height, gauge, &EdgeShapingOptions::default())
            .map(CompoundEdgeShaping::from);
    }

    let standard = k.div_ceil(2);
    let alternate = k - standard;
    let wide_gap = (rows_per_shaping - 1.0).ceil() as u32;
    let narrow_gap = (rows_per_shaping - 1.0).floor() as u32;

    let wide_first = compound_total_rows(standard, wide_gap, alternate, narrow_gap);
    let narrow_first = compound_total_rows(standard, narrow_gap, alternate, wide_gap);

    let (gap1, gap2, rows_used) = if wide_first <= total_rows && narrow_first <= total_rows {
        if wide_first >= narrow_first {
            (wide_gap, narrow_gap, wide_first)
        } else {
            (narrow_gap, wide_gap, narrow_first)
        }
    } else if wide_first <= total_rows {
        (wide_gap, narrow_gap, wide_first)
    } else {
        (narrow_gap, wide_gap, narrow_first)
    };
    debug_assert!(rows_used <= total_rows);

    let shaping = CompoundEdgeShaping {
        num_standard_shaping_rows: standard,
        rows_between_standard_shaping_rows: Some(gap1),
        num_alternate_shaping_rows: alternate,
        rows_after_alternate_shaping_rows: if alternate > 0 { Some(gap2) } else { None },
        max_distance_constraint_hit: false,
    };
    tracing::debug!(standard, alternate, gap1, gap2, rows_used, total_rows, "compound shaping");
    solved(shaping, height, rows_used, gauge)
}

fn solved(
    shaping: CompoundEdgeShaping,
    height: f64,
    rows_used: u32,
    gauge: &Gauge,
) -> CompoundEdgeShapingResult {
    ShapingOutcome::Solved {
        shaping,
        vertical_play: None,
    }
    .with_play(height, rows_used, gauge.rows_per_inch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> Gauge {
        Gauge::new(5.0, 10.0).unwrap()
    }

    #[test]
    fn whole_rate_delegates_to_edge_shaping() {
        let result = compute_compound_edge_shaping(20, 10, 1.0, &gauge());

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert!(shaping.is_single_rate());
        assert_eq!(shaping.num_standard_shaping_rows, 5);
        assert_eq!(shaping.rows_between_standard_shaping_rows, Some(1));
        assert_eq!(shaping.rows_after_alternate_shaping_rows, None);
    }

    #[test]
    fn row_budget_survives_float_noise() {
        // 16.4in at 7.5 rows/in is 123 rows, so 122 / 2 is a whole rate
        let result = compute_compound_edge_shaping(26, 20, 16.4, &Gauge::new(5.0, 7.5).unwrap());

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert!(shaping.is_single_rate());
        assert_eq!(shaping.num_standard_shaping_rows, 3);
        assert_eq!(shaping.rows_between_standard_shaping_rows, Some(60));
        assert_eq!(shaping.num_alternate_shaping_rows, 0);
    }

    #[test]
    fn half_rate_alternates_gaps() {
        // 33 rows, 8 events: 32/7 rounds down to 4.5 rows per shaping
        let result = compute_compound_edge_shaping(26, 10, 3.3, &gauge());

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 4);
        assert_eq!(shaping.num_alternate_shaping_rows, 4);
        assert_eq!(shaping.rows_between_standard_shaping_rows, Some(4));
        assert_eq!(shaping.rows_after_alternate_shaping_rows, Some(3));
        assert_eq!(shaping.num_total_rows(), 33);
        assert_eq!(result.vertical_play(), Some(0.0));
    }

    #[test]
    fn odd_event_count_puts_extra_in_standard() {
        // 40 rows, 9 events: 39/8 = 4.875, rounds down to 4.5
        let result = compute_compound_edge_shaping(28, 10, 4.0, &gauge());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 5);
        assert_eq!(shaping.num_alternate_shaping_rows, 4);
        assert!(shaping.num_total_rows() <= 40);
        let gap1 = shaping.rows_between_standard_shaping_rows.unwrap();
        let gap2 = shaping.rows_after_alternate_shaping_rows.unwrap();
        assert_eq!(gap1.abs_diff(gap2), 1);
    }

    #[test]
    fn too_few_rows_is_infeasible() {
        // 5 rows for 10 events
        let result = compute_compound_edge_shaping(40, 20, 0.5, &gauge());

        assert!(!result.constraints_met());
        assert_eq!(result.shaping().num_standard_shaping_rows, 5);
        assert_eq!(result.best_larger_stitches(), Some(30));
        assert_eq!(result.best_smaller_stitches(), Some(30));
    }

    #[test]
    fn no_rows_and_no_shaping_is_solved() {
        let result = compute_compound_edge_shaping(10, 10, 0.0, &gauge());
        assert!(result.constraints_met());
        assert_eq!(result.shaping().num_total_shaping_rows(), 0);
    }

    #[test]
    fn total_rows_formula() {
        assert_eq!(compound_total_rows(0, 3, 0, 2), 0);
        assert_eq!(compound_total_rows(1, 3, 0, 2), 1);
        assert_eq!(compound_total_rows(4, 3, 0, 2), 13);
        assert_eq!(compound_total_rows(4, 4, 4, 3), 33);
    }
}
