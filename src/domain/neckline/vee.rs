use serde::{Deserialize, Serialize};

use super::{pickup_count, Neckline, NecklineError, NecklineRequest, NecklineStyle};
use crate::domain::edge::{compute_edge_shaping, EdgeShapingOptions};
use crate::domain::gauge::{hypotenuse, rectangle_area, triangle_area, Gauge, RowParity};
use crate::domain::rounding::{round_count, RoundingDirection};

/// Depth added each time the decreases do not fit
const DEPTH_STEP: f64 = 0.25;

const MAX_DEPTH_STEPS: usize = 1000;

/// A vee neck. An odd goal binds off the centre stitch; the rest come off
/// in decrease rows spaced evenly up to the shoulders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VeeNeck {
    /// `None` when the neckline is empty
    pub depth: Option<f64>,
    pub extra_bindoffs: u32,
    /// Rows from one decrease row to the next
    pub rows_per_decrease: Option<u32>,
    pub decrease_rows: u32,
    pub pickup_stitches: u32,
    pub gauge: Gauge,
}

impl VeeNeck {
    pub fn make(request: &NecklineRequest, gauge: &Gauge) -> Result<Self, NecklineError> {
        let goal = request.stitches_goal;
        let extra_bindoffs = goal % 2;
        // the bind-off (or marker) row and the row before the first decrease
        let two_rows = gauge.height_for_rows(2.0);

        let mut shaping_depth = request.depth_goal - two_rows;
        let mut found = None;
        for _ in 0..MAX_DEPTH_STEPS {
            let outcome = compute_edge_shaping(goal, extra_bindoffs, shaping_depth, gauge, &EdgeShapingOptions::default());
            if outcome.constraints_met() {
                found = Some(outcome.into_shaping());
                break;
            }
            shaping_depth += DEPTH_STEP;
        }
        let Some(shaping) = found else {
            return Err(NecklineError::DepthSearchExhausted {
                stitches: goal,
                depth: shaping_depth,
            });
        };

        let decrease_rows = shaping.num_standard_shaping_rows;
        if decrease_rows == 0 && extra_bindoffs == 0 {
            return Ok(Self {
                depth: None,
                extra_bindoffs,
                rows_per_decrease: None,
                decrease_rows,
                pickup_stitches: 0,
                gauge: *gauge,
            });
        }

        let depth = shaping_depth + two_rows;
        let rows_per_decrease = shaping.rows_between_standard_shaping_rows.map(|between| between + 1);

        let rows_in_neck = round_count(gauge.rows_in(depth), RoundingDirection::Down);
        let slope_rows = 1 + rows_per_decrease.map_or(0, |per| (decrease_rows - 1) * per);
        let straight_rows = rows_in_neck - i64::from(slope_rows);

        let per_side = gauge.height_for_rows(straight_rows as f64)
            + hypotenuse(
                gauge.width_for_stitches(f64::from(decrease_rows)),
                gauge.height_for_rows(f64::from(slope_rows)),
            );
        let pickup_stitches = pickup_count(2.0 * per_side, gauge, request.pickup_rounding) + extra_bindoffs;

        Ok(Self {
            depth: Some(depth),
            extra_bindoffs,
            rows_per_decrease,
            decrease_rows,
            pickup_stitches,
            gauge: *gauge,
        })
    }

    /// Decrease rows after the first
    pub fn decrease_repeats(&self) -> Option<u32> {
        self.decrease_rows.checked_sub(1)
    }

    fn rows_in_decreases(&self) -> u32 {
        match (self.decrease_repeats(), self.rows_per_decrease) {
            (Some(repeats), Some(per)) if repeats > 0 => per * repeats + 1,
            (Some(_), _) => 1,
            (None, _) => 0,
        }
    }
}

impl Neckline for VeeNeck {
    fn style(&self) -> NecklineStyle {
        NecklineStyle::Vee
    }

    fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    fn total_depth(&self) -> Option<f64> {
        self.depth
    }

    fn rows_in_pullover_shaping(&self) -> u32 {
        let mut rows = 0;
        if self.extra_bindoffs > 0 || self.decrease_rows > 0 {
            rows += 1;
        }
        match self.decrease_repeats() {
            // skip row before the first decrease
            Some(repeats) if repeats > 0 => rows + 1 + self.rows_in_decreases(),
            Some(_) => rows + 1,
            None => rows,
        }
    }

    fn rows_in_cardigan_shaping(&self, _parity: RowParity) -> Option<u32> {
        Some(self.rows_in_decreases())
    }

    fn stitches_across_neckline(&self) -> u32 {
        self.extra_bindoffs + 2 * self.decrease_rows
    }

    fn pickup_stitches(&self) -> u32 {
        self.pickup_stitches
    }

    fn area(&self) -> f64 {
        let (Some(depth), Some(to_shaping_end)) = (self.depth, self.depth_to_shaping_end()) else {
            return 0.0;
        };
        let width = self.width();
        let mut slope_height = depth - to_shaping_end;
        // without a centre bind-off the first two rows remove nothing
        if self.extra_bindoffs == 0 {
            slope_height -= self.gauge.height_for_rows(2.0);
        }
        rectangle_area(width, to_shaping_end) + triangle_area(width, slope_height)
    }

    fn is_empty(&self) -> bool {
        self.extra_bindoffs == 0 && self.decrease_rows == 0
    }
}
