use serde::{Deserialize, Serialize};

use super::{pickup_count, Neckline, NecklineError, NecklineRequest, NecklineStyle};
use crate::domain::gauge::{rectangle_area, Gauge, RowParity};
use crate::domain::rounding::{round_count, RoundingDirection};

/// Rows a back neck needs before it gets decreases after the bind-off
const SHAPED_BACK_ROWS: i64 = 5;

/// Stitches the two-row decrease stage removes across both sides
const BACK_DECREASE_STITCHES: u32 = 4;

/// A back neck: a bind-off, then one decrease each side on two rows when
/// the neck is deep enough. Shallow necks are square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackNeckline {
    pub bindoff_stitches: u32,
    pub stitches_before_initial_bindoffs: u32,
    pub neckline_depth: f64,
    pub pickup_stitches: u32,
    /// False for square necks
    pub shaped: bool,
    pub gauge: Gauge,
}

impl BackNeckline {
    pub fn make(request: &NecklineRequest, gauge: &Gauge) -> Result<Self, NecklineError> {
        let goal = request.stitches_goal;
        if goal == 0 {
            return Err(NecklineError::ZeroStitches(NecklineStyle::Back));
        }
        let rows = round_count(gauge.rows_in(request.depth_goal), RoundingDirection::Up);
        if rows < 1 {
            return Err(NecklineError::InvalidDepth(request.depth_goal));
        }
        let neckline_depth = gauge.height_for_rows(rows as f64);
        let shaped = rows >= SHAPED_BACK_ROWS && goal > BACK_DECREASE_STITCHES;

        let (bindoff_stitches, stitches_before_initial_bindoffs) = if shaped {
            (goal - BACK_DECREASE_STITCHES, request.shoulder_stitches + 2)
        } else {
            (goal, request.shoulder_stitches)
        };
        // the bind-off row plus both sides of the neck
        let edge = gauge.width_for_stitches(f64::from(goal)) + 2.0 * neckline_depth;

        Ok(Self {
            bindoff_stitches,
            stitches_before_initial_bindoffs,
            neckline_depth,
            pickup_stitches: pickup_count(edge, gauge, request.pickup_rounding),
            shaped,
            gauge: *gauge,
        })
    }
}

impl Neckline for BackNeckline {
    fn style(&self) -> NecklineStyle {
        NecklineStyle::Back
    }

    fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    fn total_depth(&self) -> Option<f64> {
        Some(self.neckline_depth)
    }

    fn depth_to_shaping_end(&self) -> Option<f64> {
        if self.shaped {
            Some(self.neckline_depth - self.gauge.height_for_rows(4.0))
        } else {
            Some(self.neckline_depth)
        }
    }

    fn rows_in_pullover_shaping(&self) -> u32 {
        if self.shaped {
            SHAPED_BACK_ROWS as u32
        } else {
            0
        }
    }

    fn rows_in_cardigan_shaping(&self, _parity: RowParity) -> Option<u32> {
        None
    }

    fn stitches_across_neckline(&self) -> u32 {
        if self.shaped {
            self.bindoff_stitches + BACK_DECREASE_STITCHES
        } else {
            self.bindoff_stitches
        }
    }

    fn pickup_stitches(&self) -> u32 {
        self.pickup_stitches
    }

    fn area(&self) -> f64 {
        rectangle_area(self.neckline_depth, self.width())
    }

    fn is_empty(&self) -> bool {
        false
    }
}
