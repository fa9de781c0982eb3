use serde::{Deserialize, Serialize};

use super::{pickup_count, round_up_half, trapezoid_area_in_stitches, Neckline, NecklineRequest, NecklineStyle};
use crate::domain::gauge::{hypotenuse, rectangle_area, Gauge, RowParity};
use crate::domain::rounding::{round_count, round_to, RoundingDirection};

/// A crew neck: centre bind-off, neck-edge decreases every row, then RS-edge
/// decreases every other row. When the shaping is taller than the goal,
/// RS-edge decreases move to the neck edge one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewNeck {
    pub depth: Option<f64>,
    /// Centre marker sits before the centre stitch rather than between two
    pub marker_before_center_stitch: bool,
    pub bindoffs_before_marker: u32,
    pub center_bindoffs: u32,
    pub neck_edge_decreases: u32,
    pub rs_edge_decreases: u32,
    pub pickup_stitches: u32,
    pub gauge: Gauge,
}

impl CrewNeck {
    pub fn make(request: &NecklineRequest, gauge: &Gauge) -> Self {
        let goal = request.stitches_goal;
        let half = f64::from(goal) / 2.0;
        let marker_before_center_stitch = goal % 2 == 1;
        // both sides of the bind-off keep the same count
        let center_bindoffs = if marker_before_center_stitch {
            round_to(half, RoundingDirection::Down, 2.0, 1.0).max(1.0) as u32
        } else {
            round_to(half, RoundingDirection::Down, 2.0, 0.0).max(0.0) as u32
        };

        let per_side = (goal - center_bindoffs) / 2;
        let neck_edge_decreases = round_up_half(per_side);

        let mut neck = Self {
            depth: None,
            marker_before_center_stitch,
            bindoffs_before_marker: round_up_half(center_bindoffs),
            center_bindoffs,
            neck_edge_decreases,
            rs_edge_decreases: per_side - neck_edge_decreases,
            pickup_stitches: 0,
            gauge: *gauge,
        };

        while neck.rs_edge_decreases > 0 && neck.shaping_height() > request.depth_goal {
            neck.rs_edge_decreases -= 1;
            neck.neck_edge_decreases += 1;
        }
        if neck.is_empty() {
            return neck;
        }

        let depth = request.depth_goal.max(neck.shaping_height());
        let rows_in_neck = round_count(gauge.rows_in(depth), RoundingDirection::Down);
        let neck_edge_rows = neck.neck_edge_decreases;
        let rs_edge_rows = 2 * neck.rs_edge_decreases;
        let straight_rows = rows_in_neck - i64::from(neck_edge_rows) - i64::from(rs_edge_rows);

        let neck_edge = hypotenuse(
            gauge.width_for_stitches(f64::from(neck.neck_edge_decreases)),
            gauge.height_for_rows(f64::from(neck_edge_rows)),
        );
        let rs_edge = hypotenuse(
            gauge.width_for_stitches(f64::from(neck.rs_edge_decreases)),
            gauge.height_for_rows(f64::from(rs_edge_rows)),
        );
        let edge = gauge.width_for_stitches(f64::from(center_bindoffs))
            + 2.0 * neck_edge
            + 2.0 * rs_edge
            + 2.0 * gauge.height_for_rows(straight_rows as f64);

        neck.depth = Some(depth);
        neck.pickup_stitches = pickup_count(edge, gauge, request.pickup_rounding);
        neck
    }

    /// Two-stitch bind-offs when every decrease is at the neck edge
    pub fn no_rs_decreases_two_stitch_bindoffs(&self) -> Option<u32> {
        if self.rs_edge_decreases > 0 {
            return None;
        }
        let half_rounded_even = round_to(
            f64::from(self.neck_edge_decreases) / 2.0,
            RoundingDirection::Nearest,
            2.0,
            0.0,
        );
        Some((half_rounded_even / 2.0) as u32)
    }

    /// One-stitch bind-offs when every decrease is at the neck edge
    pub fn no_rs_decreases_one_stitch_bindoffs(&self) -> Option<u32> {
        self.no_rs_decreases_two_stitch_bindoffs()
            .map(|two| self.neck_edge_decreases - 2 * two)
    }

    /// Centre bind-off on each cardigan front
    pub fn center_bindoffs_cardigan(&self) -> u32 {
        self.center_bindoffs / 2
    }

    fn shaping_height(&self) -> f64 {
        self.gauge.height_for_rows(f64::from(self.rows_in_pullover_shaping()))
    }

    fn rows_without_rs_decreases(&self) -> u32 {
        let two = self.no_rs_decreases_two_stitch_bindoffs().unwrap_or(0);
        let one = self.no_rs_decreases_one_stitch_bindoffs().unwrap_or(0);
        // two-stitch bind-offs come every other row
        2 * two + one
    }
}

impl Neckline for CrewNeck {
    fn style(&self) -> NecklineStyle {
        NecklineStyle::Crew
    }

    fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    fn total_depth(&self) -> Option<f64> {
        self.depth
    }

    fn rows_in_pullover_shaping(&self) -> u32 {
        let mut rows = u32::from(self.center_bindoffs > 0);
        if self.rs_edge_decreases == 0 {
            return rows + self.rows_without_rs_decreases();
        }
        if self.neck_edge_decreases > 0 {
            rows += self.neck_edge_decreases;
            // gap row between the two decrease stages
            if self.neck_edge_decreases % 2 == 0 {
                rows += 1;
            }
            rows + 2 * self.rs_edge_decreases - 1
        } else {
            rows + 2 * self.rs_edge_decreases
        }
    }

    fn rows_in_cardigan_shaping(&self, parity: RowParity) -> Option<u32> {
        let mut rows = u32::from(self.center_bindoffs > 0);
        if self.rs_edge_decreases == 0 {
            return Some(rows + self.rows_without_rs_decreases());
        }
        rows += self.neck_edge_decreases;
        // RS-edge decreases start on a right-side row
        if parity.after_rows(rows) == RowParity::WrongSide {
            rows += 1;
        }
        Some(rows + 2 * self.rs_edge_decreases - 1)
    }

    fn stitches_across_neckline(&self) -> u32 {
        self.center_bindoffs + 2 * (self.neck_edge_decreases + self.rs_edge_decreases)
    }

    fn pickup_stitches(&self) -> u32 {
        self.pickup_stitches
    }

    fn area(&self) -> f64 {
        let Some(to_shaping_end) = self.depth_to_shaping_end() else {
            return 0.0;
        };
        let gauge = &self.gauge;
        let center = self.center_bindoffs;

        let shaped = if self.rs_edge_decreases > 0 {
            let neck_top = center + 2 * self.neck_edge_decreases;
            let rs_top = neck_top + 2 * self.rs_edge_decreases;
            trapezoid_area_in_stitches(center, neck_top, self.neck_edge_decreases, gauge)
                + trapezoid_area_in_stitches(neck_top, rs_top, 2 * self.rs_edge_decreases, gauge)
        } else {
            let two = self.no_rs_decreases_two_stitch_bindoffs().unwrap_or(0);
            let one = self.no_rs_decreases_one_stitch_bindoffs().unwrap_or(0);
            let two_top = center + 4 * two;
            trapezoid_area_in_stitches(center, two_top, 2 * two, gauge)
                + trapezoid_area_in_stitches(two_top, two_top + 2 * one, one, gauge)
        };

        shaped + rectangle_area(self.width(), to_shaping_end)
    }

    fn is_empty(&self) -> bool {
        self.center_bindoffs == 0 && self.neck_edge_decreases == 0 && self.rs_edge_decreases == 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{gauge, request};
    use super::*;

    #[test]
    fn even_goal_splits_into_three_stages() {
        let neck = CrewNeck::make(&request(30, 3.0), &gauge());

        assert!(!neck.marker_before_center_stitch);
        assert_eq!(neck.center_bindoffs, 14);
        assert_eq!(neck.bindoffs_before_marker, 7);
        assert_eq!(neck.neck_edge_decreases, 4);
        assert_eq!(neck.rs_edge_decreases, 4);
        assert_eq!(neck.rows_in_pullover_shaping(), 13);
        assert_eq!(neck.pickup_stitches, 51);
        assert_eq!(neck.depth, Some(3.0));
        assert!((neck.area() - 14.857142857).abs() < 1e-6);
    }

    #[test]
    fn odd_goal_puts_marker_before_centre_stitch() {
        let neck = CrewNeck::make(&request(31, 3.0), &gauge());

        assert!(neck.marker_before_center_stitch);
        assert_eq!(neck.center_bindoffs, 15);
        assert_eq!(neck.bindoffs_before_marker, 8);
        assert_eq!(neck.stitches_across_neckline(), 31);
        assert_eq!(neck.pickup_stitches, 52);
    }

    #[test]
    fn shallow_goal_moves_decreases_to_neck_edge() {
        let neck = CrewNeck::make(&request(30, 1.0), &gauge());

        assert_eq!(neck.rs_edge_decreases, 0);
        assert_eq!(neck.neck_edge_decreases, 8);
        assert_eq!(neck.no_rs_decreases_two_stitch_bindoffs(), Some(2));
        assert_eq!(neck.no_rs_decreases_one_stitch_bindoffs(), Some(4));
        assert_eq!(neck.rows_in_pullover_shaping(), 9);
        assert!((neck.depth.unwrap() - 9.0 / 7.0).abs() < 1e-9);
        assert_eq!(neck.pickup_stitches, 35);
        assert!((neck.area() - 5.028571428).abs() < 1e-6);
    }

    #[test]
    fn cardigan_rows_depend_on_parity() {
        let neck = CrewNeck::make(&request(30, 3.0), &gauge());

        assert_eq!(neck.rows_in_cardigan_shaping(RowParity::RightSide), Some(13));
        assert_eq!(neck.rows_in_cardigan_shaping(RowParity::WrongSide), Some(12));
        assert_eq!(neck.center_bindoffs_cardigan(), 7);
    }

    #[test]
    fn tiny_goals() {
        let two = CrewNeck::make(&request(2, 3.0), &gauge());
        assert_eq!(two.center_bindoffs, 0);
        assert_eq!(two.neck_edge_decreases, 1);
        assert_eq!(two.rows_in_pullover_shaping(), 1);
        assert_eq!(two.pickup_stitches, 31);

        let empty = CrewNeck::make(&request(0, 3.0), &gauge());
        assert!(empty.is_empty());
        assert_eq!(empty.depth, None);
        assert_eq!(empty.pickup_stitches, 0);
    }
}
