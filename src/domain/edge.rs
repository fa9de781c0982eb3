//! Edge shaping
//!
//! One shaping point at each fabric edge, so every shaping row moves the count
//! by two stitches. The solver spreads `k = (larger - smaller) / 2` shaping
//! rows as evenly as the row budget allows.

use serde::{Deserialize, Serialize};

use super::gauge::Gauge;
use super::rounding::{down_to_odd, round_count, RoundingDirection};
use super::shaping::{best_endpoints, events_needed, ShapingOutcome};

/// A single-rate shaping schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EdgeShaping {
    pub num_standard_shaping_rows: u32,
    /// Plain rows between consecutive shaping rows; `None` with fewer than two
    pub rows_between_standard_shaping_rows: Option<u32>,
    pub max_distance_constraint_hit: bool,
}

impl EdgeShaping {
    fn new(num: u32, rows_between: u32, max_distance_constraint_hit: bool) -> Self {
        Self {
            num_standard_shaping_rows: num,
            rows_between_standard_shaping_rows: if num >= 2 { Some(rows_between) } else { None },
            max_distance_constraint_hit,
        }
    }

    /// Rows from the first shaping row through the last, inclusive
    pub fn num_total_rows(&self) -> u32 {
        let num = self.num_standard_shaping_rows;
        match self.rows_between_standard_shaping_rows {
            Some(between) if num >= 2 => num + between * (num - 1),
            _ => num,
        }
    }

    pub fn num_total_shaping_rows(&self) -> u32 {
        self.num_standard_shaping_rows
    }

    pub fn stitches_shaped(&self) -> u32 {
        2 * self.num_total_shaping_rows()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeShapingOptions {
    /// Keep every shaping row on the same side of the fabric
    pub even_spacing: bool,
    /// Upper bound on the gap between shaping rows, in inches
    pub max_distance_between_shaping_rows: Option<f64>,
}

pub type EdgeShapingResult = ShapingOutcome<EdgeShaping>;

/// Solves edge shaping against a budget given directly in rows.
///
/// `total_rows` may be fractional; only whole rows are ever used.
pub fn compute_edge_shaping_in_rows(
    larger: u32,
    smaller: u32,
    total_rows: f64,
    even_spacing: bool,
    max_rows_between: Option<u32>,
) -> EdgeShapingResult {
    let k = events_needed(larger, smaller);
    assert!(total_rows >= 0.0, "row budget {} is negative", total_rows);

    if total_rows < 1.0 {
        if k == 0 {
            return solved(EdgeShaping::default());
        }
        let (best_larger, best_smaller) = best_endpoints(larger, smaller, 0);
        return ShapingOutcome::Infeasible {
            best_effort: EdgeShaping::default(),
            best_larger_stitches: best_larger,
            best_smaller_stitches: best_smaller,
        };
    }

    match k {
        0 => return solved(EdgeShaping::default()),
        1 => return solved(EdgeShaping::new(1, 0, false)),
        _ => {}
    }

    let mut rows_between = round_count((total_rows - 1.0) / f64::from(k - 1) - 1.0, RoundingDirection::Down);
    let mut max_hit = false;
    // a zero limit means no limit
    if let Some(max) = max_rows_between.filter(|&max| max > 0) {
        if rows_between > i64::from(max) {
            rows_between = i64::from(max);
            max_hit = true;
        }
    }
    if even_spacing {
        rows_between = down_to_odd(rows_between);
    }

    if rows_between < 0 {
        let (between, num) = if even_spacing {
            (1, round_count((total_rows - 1.0) / 2.0, RoundingDirection::Down).max(0) as u32 + 1)
        } else {
            (0, round_count(total_rows, RoundingDirection::Down).max(0) as u32)
        };
        tracing::debug!(k, num, between, "edge shaping does not fit");
        let (best_larger, best_smaller) = best_endpoints(larger, smaller, 2 * num);
        return ShapingOutcome::Infeasible {
            best_effort: EdgeShaping::new(num, between, max_hit),
            best_larger_stitches: best_larger,
            best_smaller_stitches: best_smaller,
        };
    }

    solved(EdgeShaping::new(k, rows_between as u32, max_hit))
}

/// Solves edge shaping over a height at the given gauge
#[tracing::instrument(level = "debug", skip(gauge, options))]
pub fn compute_edge_shaping(
    larger: u32,
    smaller: u32,
    height: f64,
    gauge: &Gauge,
    options: &EdgeShapingOptions,
) -> EdgeShapingResult {
    let total_rows = gauge.rows_in(height).max(0.0);
    let max_rows = options
        .max_distance_between_shaping_rows
        .map(|inches| round_count(gauge.rows_in(inches), RoundingDirection::Down).max(0) as u32);

    let outcome =
        compute_edge_shaping_in_rows(larger, smaller, total_rows, options.even_spacing, max_rows);
    let rows_used = outcome.shaping().num_total_rows();
    outcome.with_play(height, rows_used, gauge.rows_per_inch)
}

fn solved(shaping: EdgeShaping) -> EdgeShapingResult {
    ShapingOutcome::Solved {
        shaping,
        vertical_play: None,
    }
}
