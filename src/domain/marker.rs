//! Marker (dart) shaping for torso pieces
//!
//! Standard dart rows sit at least three plain rows apart. When that spacing
//! cannot fit all the events, double darts are staggered halfway between the
//! standard rows, and after that standard rows are upgraded to triple darts.
//!
//! Stitch accounting: a standard or double dart row shapes two stitches, a
//! triple dart row shapes four, so a schedule shapes
//! `2 * (standard + double + 2 * triple)` stitches.

use serde::{Deserialize, Serialize};

use super::gauge::Gauge;
use super::limits::MAX_INCHES_BETWEEN_BODY_SHAPING_ROWS;
use super::rounding::{down_to_odd, round_count, RoundingDirection};
use super::shaping::{best_endpoints, events_needed, ShapingOutcome};

/// Gap used once double darts come into play
const DART_ROWS_BETWEEN: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TorsoShaping {
    pub num_standard_shaping_rows: u32,
    pub rows_between_standard_shaping_rows: Option<u32>,
    pub num_double_dart_shaping_rows: u32,
    pub num_triple_dart_shaping_rows: u32,
}

impl TorsoShaping {
    fn straight() -> Self {
        Self::default()
    }

    pub fn uses_double_darts(&self) -> bool {
        self.num_double_dart_shaping_rows > 0
    }

    pub fn uses_triple_darts(&self) -> bool {
        self.num_triple_dart_shaping_rows > 0
    }

    pub fn stitches_shaped(&self) -> u32 {
        2 * (self.num_standard_shaping_rows
            + self.num_double_dart_shaping_rows
            + 2 * self.num_triple_dart_shaping_rows)
    }

    /// Rows from the first standard/triple row through the last, inclusive.
    /// Double darts fall inside this span.
    pub fn num_total_rows(&self) -> u32 {
        let rows = self.num_standard_shaping_rows + self.num_triple_dart_shaping_rows;
        match self.rows_between_standard_shaping_rows {
            Some(between) if rows >= 2 => (between + 1) * (rows - 1) + 1,
            _ => rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerShapingOptions {
    /// Inches
    pub max_distance_between_shaping_rows: f64,
    pub allow_double_darts: bool,
    /// Requires `allow_double_darts`
    pub allow_triple_darts: bool,
}

impl Default for MarkerShapingOptions {
    fn default() -> Self {
        Self {
            max_distance_between_shaping_rows: MAX_INCHES_BETWEEN_BODY_SHAPING_ROWS,
            allow_double_darts: true,
            allow_triple_darts: true,
        }
    }
}

impl MarkerShapingOptions {
    /// Options for graded patterns, where dart placement must stay simple
    /// enough to read the same way across sizes
    pub fn graded() -> Self {
        Self {
            allow_double_darts: false,
            allow_triple_darts: false,
            ..Self::default()
        }
    }
}

pub type TorsoShapingResult = ShapingOutcome<TorsoShaping>;

/// Solves dart shaping between two counts over a height
#[tracing::instrument(level = "debug", skip(gauge, options), fields(double = options.allow_double_darts, triple = options.allow_triple_darts))]
pub fn compute_marker_shaping(
    larger: u32,
    smaller: u32,
    height: f64,
    gauge: &Gauge,
    options: &MarkerShapingOptions,
) -> TorsoShapingResult {
    assert!(
        options.allow_double_darts || !options.allow_triple_darts,
        "triple darts require double darts"
    );
    let k = events_needed(larger, smaller);
    let total_rows = gauge.rows_in(height).max(0.0);

    if total_rows < 1.0 {
        if k == 0 {
            return solved(TorsoShaping::straight(), height, gauge);
        }
        let (best_larger, best_smaller) = best_endpoints(larger, smaller, 0);
        return ShapingOutcome::Infeasible {
            best_effort: TorsoShaping::straight(),
            best_larger_stitches: best_larger,
            best_smaller_stitches: best_smaller,
        };
    }

    match k {
        0 => return solved(TorsoShaping::straight(), height, gauge),
        1 => {
            let single = TorsoShaping {
                num_standard_shaping_rows: 1,
                ..Default::default()
            };
            return solved(single, height, gauge);
        }
        _ => {}
    }

    let spread = (total_rows - 1.0) / f64::from(k - 1) - 1.0;
    let capped = spread.min(gauge.rows_in(options.max_distance_between_shaping_rows));
    let rows_between = down_to_odd(round_count(capped, RoundingDirection::Down));

    if rows_between >= i64::from(DART_ROWS_BETWEEN) {
        let shaping = TorsoShaping {
            num_standard_shaping_rows: k,
            rows_between_standard_shaping_rows: Some(rows_between as u32),
            ..Default::default()
        };
        return solved(shaping, height, gauge);
    }

    // a tight max distance can leave room for more dart rows than are needed
    let dart_rows = round_count((total_rows - 1.0) / 4.0, RoundingDirection::Down).max(0) as u32 + 1;
    let mut shaping = TorsoShaping {
        num_standard_shaping_rows: dart_rows.min(k),
        rows_between_standard_shaping_rows: Some(DART_ROWS_BETWEEN),
        ..Default::default()
    };
    if dart_rows >= k {
        tracing::debug!(k, dart_rows, "max distance is tighter than the dart gap");
        return solved(shaping, height, gauge);
    }
    tracing::debug!(k, standard = shaping.num_standard_shaping_rows, "standard darts alone do not fit");

    if !options.allow_double_darts {
        return infeasible(shaping, larger, smaller);
    }

    let double_possible = shaping.num_standard_shaping_rows.saturating_sub(1);
    let double_needed = k - shaping.num_standard_shaping_rows;
    if double_needed <= double_possible {
        shaping.num_double_dart_shaping_rows = double_needed;
        return solved(shaping, height, gauge);
    }

    shaping.num_double_dart_shaping_rows = double_possible;
    if !options.allow_triple_darts {
        return infeasible(shaping, larger, smaller);
    }

    let triple_needed = k - shaping.num_standard_shaping_rows - double_possible;
    if triple_needed <= shaping.num_standard_shaping_rows {
        shaping.num_triple_dart_shaping_rows = triple_needed;
        shaping.num_standard_shaping_rows -= triple_needed;
        tracing::debug!(triple_needed, "triple darts close the gap");
        return solved(shaping, height, gauge);
    }

    shaping.num_triple_dart_shaping_rows = shaping.num_standard_shaping_rows;
    shaping.num_standard_shaping_rows = 0;
    infeasible(shaping, larger, smaller)
}

fn solved(shaping: TorsoShaping, height: f64, gauge: &Gauge) -> TorsoShapingResult {
    let rows_used = shaping.num_total_rows();
    ShapingOutcome::Solved {
        shaping,
        vertical_play: None,
    }
    .with_play(height, rows_used, gauge.rows_per_inch)
}

fn infeasible(shaping: TorsoShaping, larger: u32, smaller: u32) -> TorsoShapingResult {
    let (best_larger, best_smaller) = best_endpoints(larger, smaller, shaping.stitches_shaped());
    tracing::debug!(best_larger, best_smaller, "dart shaping infeasible");
    ShapingOutcome::Infeasible {
        best_effort: shaping,
        best_larger_stitches: best_larger,
        best_smaller_stitches: best_smaller,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge(rows: f64) -> Gauge {
        Gauge::new(5.0, rows).unwrap()
    }

    #[test]
    fn standard_darts_when_rows_allow() {
        // 40 rows for 10 events gives a gap of exactly three
        let result = compute_marker_shaping(100, 80, 2.0, &gauge(20.0), &MarkerShapingOptions::default());

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 10);
        assert_eq!(shaping.rows_between_standard_shaping_rows, Some(3));
        assert!(!shaping.uses_double_darts());
        assert_eq!(shaping.num_total_rows(), 37);
    }

    #[test]
    fn double_and_triple_darts_in_tight_budget() {
        // 20 rows for 10 events
        let result = compute_marker_shaping(100, 80, 1.0, &gauge(20.0), &MarkerShapingOptions::default());

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 4);
        assert_eq!(shaping.num_double_dart_shaping_rows, 4);
        assert_eq!(shaping.num_triple_dart_shaping_rows, 1);
        assert_eq!(shaping.stitches_shaped(), 20);
        assert!((result.vertical_play().unwrap() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn double_darts_alone_can_suffice() {
        // 24 rows for 8 events: 6 standard rows and 2 double darts
        let result = compute_marker_shaping(56, 40, 1.2, &gauge(20.0), &MarkerShapingOptions::default());

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 6);
        assert_eq!(shaping.num_double_dart_shaping_rows, 2);
        assert_eq!(shaping.num_triple_dart_shaping_rows, 0);
        assert_eq!(shaping.stitches_shaped(), 16);
    }

    #[test]
    fn graded_options_forbid_double_darts() {
        let result = compute_marker_shaping(100, 80, 1.0, &gauge(20.0), &MarkerShapingOptions::graded());

        assert!(!result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 5);
        assert_eq!(shaping.num_double_dart_shaping_rows, 0);
        assert_eq!(result.best_larger_stitches(), Some(90));
        assert_eq!(result.best_smaller_stitches(), Some(90));
    }

    #[test]
    fn no_triple_darts_reports_best_effort() {
        let options = MarkerShapingOptions {
            allow_triple_darts: false,
            ..Default::default()
        };
        let result = compute_marker_shaping(100, 60, 1.0, &gauge(20.0), &options);

        assert!(!result.constraints_met());
        assert_eq!(result.shaping().num_double_dart_shaping_rows, 4);
        assert_eq!(result.best_larger_stitches(), Some(78));
        assert_eq!(result.best_smaller_stitches(), Some(82));
    }

    #[test]
    fn demand_beyond_triple_darts_is_infeasible() {
        let result = compute_marker_shaping(100, 60, 1.0, &gauge(20.0), &MarkerShapingOptions::default());

        assert!(!result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 0);
        assert_eq!(shaping.num_double_dart_shaping_rows, 4);
        assert_eq!(shaping.num_triple_dart_shaping_rows, 5);
        assert_eq!(result.best_larger_stitches(), Some(88));
        assert_eq!(result.best_smaller_stitches(), Some(72));
    }

    #[test]
    fn max_distance_caps_the_gap() {
        // 80 rows, 5 events would spread 18.75 apart; 2in at 8 rows/in caps at 16, odd 15
        let result = compute_marker_shaping(100, 90, 10.0, &gauge(8.0), &MarkerShapingOptions::default());

        assert!(result.constraints_met());
        assert_eq!(result.shaping().rows_between_standard_shaping_rows, Some(15));
        assert_eq!(result.shaping().num_total_rows(), 65);
        assert!((result.vertical_play().unwrap() - 1.875).abs() < 1e-9);
    }

    #[test]
    fn tight_max_distance_falls_back_to_dart_gap() {
        // half an inch at 4 rows/in allows only 2 rows between, below the dart gap
        let options = MarkerShapingOptions {
            max_distance_between_shaping_rows: 0.5,
            ..Default::default()
        };
        let result = compute_marker_shaping(84, 80, 10.0, &gauge(4.0), &options);

        assert!(result.constraints_met());
        let shaping = result.shaping();
        assert_eq!(shaping.num_standard_shaping_rows, 2);
        assert_eq!(shaping.rows_between_standard_shaping_rows, Some(3));
        assert_eq!(shaping.num_double_dart_shaping_rows, 0);
        assert_eq!(shaping.stitches_shaped(), 4);

        let graded = MarkerShapingOptions {
            max_distance_between_shaping_rows: 0.5,
            ..MarkerShapingOptions::graded()
        };
        assert!(compute_marker_shaping(100, 80, 10.0, &gauge(4.0), &graded).constraints_met());
    }

    #[test]
    fn gap_survives_float_noise() {
        // 12.5in at 9.2 rows/in is 115 rows; 114 / 19 - 1 lands a hair under 5
        let result = compute_marker_shaping(120, 80, 12.5, &gauge(9.2), &MarkerShapingOptions::default());

        assert!(result.constraints_met());
        assert_eq!(result.shaping().num_standard_shaping_rows, 20);
        assert_eq!(result.shaping().rows_between_standard_shaping_rows, Some(5));
    }

    #[test]
    fn trivial_cases() {
        let straight = compute_marker_shaping(80, 80, 5.0, &gauge(8.0), &MarkerShapingOptions::default());
        assert!(straight.constraints_met());
        assert_eq!(straight.shaping().num_total_rows(), 0);

        let single = compute_marker_shaping(82, 80, 5.0, &gauge(8.0), &MarkerShapingOptions::default());
        assert_eq!(single.shaping().num_standard_shaping_rows, 1);
        assert_eq!(single.shaping().rows_between_standard_shaping_rows, None);

        let no_rows = compute_marker_shaping(82, 80, 0.1, &gauge(8.0), &MarkerShapingOptions::default());
        assert!(!no_rows.constraints_met());
    }

    #[test]
    #[should_panic(expected = "triple darts require double darts")]
    fn triple_without_double_panics() {
        let options = MarkerShapingOptions {
            allow_double_darts: false,
            allow_triple_darts: true,
            ..Default::default()
        };
        compute_marker_shaping(100, 80, 1.0, &gauge(20.0), &options);
    }
}
