use serde::{Deserialize, Serialize};

use super::{pickup_count, round_up_half, trapezoid_area_in_stitches, Neckline, NecklineRequest, NecklineStyle};
use crate::domain::gauge::{hypotenuse, rectangle_area, Gauge, RowParity};
use crate::domain::rounding::{round_count, round_to, RoundingDirection};

/// Share of the goal bound off at the centre
const CENTER_SHARE: f64 = 0.4;
/// Share of each side taken by every-row decreases
const Y_SHARE: f64 = 0.4;
/// Share of what remains taken by every-other-row decreases
const Z_SHARE: f64 = 0.5;

/// A scoop neck: centre bind-off, then per side `y` decreases every row,
/// `z` every other row and `q` every fourth row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoopNeck {
    pub total_depth: Option<f64>,
    pub marker_before_center_stitch: bool,
    pub bindoff_stitches_before_marker: u32,
    pub y_bindoffs: u32,
    pub z_bindoffs: u32,
    pub q_bindoffs: u32,
    pub pickup_stitches: u32,
    pub gauge: Gauge,
}

impl ScoopNeck {
    pub fn make(request: &NecklineRequest, gauge: &Gauge) -> Self {
        let goal = request.stitches_goal;
        let parity = goal % 2;

        let x = round_to(f64::from(goal) * CENTER_SHARE, RoundingDirection::Down, 2.0, f64::from(parity))
            .max(f64::from(parity)) as u32;
        let per_side = (goal - x) / 2;
        let y = round_count(Y_SHARE * f64::from(per_side), RoundingDirection::Up) as u32;
        let z = round_count(f64::from(per_side - y) * Z_SHARE, RoundingDirection::Up) as u32;

        let mut neck = Self {
            total_depth: None,
            marker_before_center_stitch: parity == 1,
            bindoff_stitches_before_marker: round_up_half(x),
            y_bindoffs: y,
            z_bindoffs: z,
            q_bindoffs: per_side - y - z,
            pickup_stitches: 0,
            gauge: *gauge,
        };
        if neck.is_empty() {
            return neck;
        }

        let depth = request.depth_goal.max(neck.shaping_height());
        neck.total_depth = Some(depth);

        let diagonal = |stitches: u32, rows_each: u32| {
            hypotenuse(
                gauge.width_for_stitches(f64::from(stitches)),
                gauge.height_for_rows(f64::from(rows_each * stitches)),
            )
        };
        let edge = gauge.width_for_stitches(f64::from(neck.initial_bindoffs()))
            + 2.0 * diagonal(neck.y_bindoffs, 1)
            + 2.0 * diagonal(neck.z_bindoffs, 2)
            + 2.0 * diagonal(neck.q_bindoffs, 4)
            + 2.0 * neck.straight_height(depth);

        neck.pickup_stitches = pickup_count(edge, gauge, request.pickup_rounding);
        neck
    }

    pub fn initial_bindoffs(&self) -> u32 {
        let both_sides = 2 * self.bindoff_stitches_before_marker;
        if self.marker_before_center_stitch {
            both_sides.saturating_sub(1)
        } else {
            both_sides
        }
    }

    pub fn initial_bindoffs_cardigan(&self) -> u32 {
        self.initial_bindoffs() / 2
    }

    fn shaping_height(&self) -> f64 {
        self.gauge.height_for_rows(f64::from(self.rows_in_pullover_shaping()))
    }

    /// Plain knitting above the shaping; the three plain rows after the last
    /// `q` decrease already count in its diagonal
    fn straight_height(&self, depth: f64) -> f64 {
        let mut height = depth - self.shaping_height();
        if self.q_bindoffs > 0 {
            height -= self.gauge.height_for_rows(3.0);
        }
        height
    }

    fn has_any_shaping(&self) -> bool {
        self.initial_bindoffs() > 0 || self.y_bindoffs > 0 || self.z_bindoffs > 0 || self.q_bindoffs > 0
    }

    /// Rows of the `z` and `q` stages, which end without their plain rows
    fn rows_in_slower_stages(&self) -> u32 {
        let mut rows = 0;
        if self.z_bindoffs > 0 {
            rows += 2 * self.z_bindoffs;
            if self.q_bindoffs == 0 {
                rows -= 1;
            }
        }
        if self.q_bindoffs > 0 {
            rows += 4 * self.q_bindoffs - 3;
        }
        rows
    }
}

impl Neckline for ScoopNeck {
    fn style(&self) -> NecklineStyle {
        NecklineStyle::Scoop
    }

    fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    fn total_depth(&self) -> Option<f64> {
        self.total_depth
    }

    fn rows_in_pullover_shaping(&self) -> u32 {
        let mut rows = u32::from(self.has_any_shaping());
        let slower = self.z_bindoffs > 0 || self.q_bindoffs > 0;

        if self.y_bindoffs > 0 {
            rows += self.y_bindoffs;
            // skip row before the slower decreases
            if slower && self.y_bindoffs % 2 == 0 {
                rows += 1;
            }
        } else if slower {
            rows += 1;
        }
        rows + self.rows_in_slower_stages()
    }

    fn rows_in_cardigan_shaping(&self, parity: RowParity) -> Option<u32> {
        let mut rows = u32::from(self.has_any_shaping()) + self.y_bindoffs;
        if self.z_bindoffs > 0 && parity.after_rows(rows) == RowParity::WrongSide {
            rows += 1;
        }
        Some(rows + self.rows_in_slower_stages())
    }

    fn stitches_across_neckline(&self) -> u32 {
        self.initial_bindoffs() + 2 * (self.y_bindoffs + self.z_bindoffs + self.q_bindoffs)
    }

    fn pickup_stitches(&self) -> u32 {
        self.pickup_stitches
    }

    fn area(&self) -> f64 {
        let Some(depth) = self.total_depth else {
            return 0.0;
        };
        let gauge = &self.gauge;
        let bottom = self.initial_bindoffs();
        let y_top = bottom + 2 * self.y_bindoffs;
        let z_top = y_top + 2 * self.z_bindoffs;

        trapezoid_area_in_stitches(bottom, y_top, self.y_bindoffs, gauge)
            + trapezoid_area_in_stitches(y_top, z_top, 2 * self.z_bindoffs, gauge)
            + trapezoid_area_in_stitches(z_top, self.stitches_across_neckline(), 4 * self.q_bindoffs, gauge)
            + rectangle_area(self.straight_height(depth), self.width())
    }

    fn is_empty(&self) -> bool {
        self.y_bindoffs == 0
            && self.z_bindoffs == 0
            && self.q_bindoffs == 0
            && self.bindoff_stitches_before_marker == 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{gauge, request};
    use super::*;

    #[test]
    fn even_goal_stages() {
        let neck = ScoopNeck::make(&request(30, 3.0), &gauge());

        assert_eq!(neck.initial_bindoffs(), 12);
        assert_eq!(neck.y_bindoffs, 4);
        assert_eq!(neck.z_bindoffs, 3);
        assert_eq!(neck.q_bindoffs, 2);
        assert_eq!(neck.rows_in_pullover_shaping(), 17);
        assert_eq!(neck.pickup_stitches, 46);
        assert_eq!(neck.stitches_across_neckline(), 30);
        assert!((neck.area() - 13.028571428).abs() < 1e-6);
    }

    #[test]
    fn odd_goal_stages() {
        let neck = ScoopNeck::make(&request(31, 3.0), &gauge());

        assert!(neck.marker_before_center_stitch);
        assert_eq!(neck.initial_bindoffs(), 11);
        assert_eq!(neck.q_bindoffs, 3);
        assert_eq!(neck.rows_in_pullover_shaping(), 21);
        assert_eq!(neck.pickup_stitches, 45);
        assert!((neck.area() - 12.428571428).abs() < 1e-6);
    }

    #[test]
    fn cardigan_rows() {
        let neck = ScoopNeck::make(&request(30, 3.0), &gauge());
        assert_eq!(neck.rows_in_cardigan_shaping(RowParity::RightSide), Some(17));
        assert_eq!(neck.rows_in_cardigan_shaping(RowParity::WrongSide), Some(16));
        assert_eq!(neck.initial_bindoffs_cardigan(), 6);
    }

    #[test]
    fn zero_goal_is_empty() {
        let neck = ScoopNeck::make(&request(0, 3.0), &gauge());
        assert!(neck.is_empty());
        assert_eq!(neck.total_depth, None);
        assert_eq!(neck.pickup_stitches, 0);
        assert_eq!(neck.area(), 0.0);
    }
}
