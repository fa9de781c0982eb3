use serde::{Deserialize, Serialize};

use super::{pickup_count, Neckline, NecklineRequest, NecklineStyle};
use crate::domain::gauge::{rectangle_area, Gauge, RowParity};
use crate::domain::rounding::{round_count, RoundingDirection};

const SIDE_BINDOFF_RATIO: f64 = 0.1;

/// A boat neck: one wide bind-off and a few side decreases every other row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatNeck {
    pub bottom_bindoffs: u32,
    pub side_bindoffs: u32,
    pub neckline_depth: Option<f64>,
    pub pickup_stitches: u32,
    pub gauge: Gauge,
}

impl BoatNeck {
    pub fn make(request: &NecklineRequest, gauge: &Gauge) -> Self {
        let goal = request.stitches_goal;
        let side_bindoffs =
            round_count(f64::from(goal) * SIDE_BINDOFF_RATIO, RoundingDirection::Down).max(0) as u32;

        let mut neck = Self {
            bottom_bindoffs: goal - 2 * side_bindoffs,
            side_bindoffs,
            neckline_depth: None,
            pickup_stitches: 0,
            gauge: *gauge,
        };
        if neck.is_empty() {
            return neck;
        }

        let depth = request.depth_goal.max(neck.shaping_height());
        let edge = gauge.width_for_stitches(f64::from(goal)) + 2.0 * depth;
        neck.neckline_depth = Some(depth);
        neck.pickup_stitches = pickup_count(edge, gauge, request.pickup_rounding);
        neck
    }

    pub fn marker_before_center_stitch(&self) -> bool {
        self.bottom_bindoffs % 2 == 1
    }

    pub fn bindoff_stitches_before_marker(&self) -> u32 {
        self.bottom_bindoffs / 2
    }

    pub fn bottom_bindoffs_cardigan(&self) -> u32 {
        self.bottom_bindoffs / 2
    }

    fn shaping_height(&self) -> f64 {
        self.gauge.height_for_rows(f64::from(self.rows_in_pullover_shaping()))
    }

    fn rows_in_side_bindoffs(&self) -> u32 {
        (2 * self.side_bindoffs).saturating_sub(1)
    }
}

impl Neckline for BoatNeck {
    fn style(&self) -> NecklineStyle {
        NecklineStyle::Boat
    }

    fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    fn total_depth(&self) -> Option<f64> {
        self.neckline_depth
    }

    fn rows_in_pullover_shaping(&self) -> u32 {
        u32::from(self.bottom_bindoffs > 0) + self.rows_in_side_bindoffs()
    }

    fn rows_in_cardigan_shaping(&self, parity: RowParity) -> Option<u32> {
        let skip = self.side_bindoffs > 0 && parity == RowParity::RightSide;
        Some(u32::from(self.bottom_bindoffs > 0) + u32::from(skip) + self.rows_in_side_bindoffs())
    }

    fn stitches_across_neckline(&self) -> u32 {
        self.bottom_bindoffs + 2 * self.side_bindoffs
    }

    fn pickup_stitches(&self) -> u32 {
        self.pickup_stitches
    }

    fn area(&self) -> f64 {
        self.neckline_depth
            .map_or(0.0, |depth| rectangle_area(self.width(), depth))
    }

    fn is_empty(&self) -> bool {
        self.bottom_bindoffs == 0 && self.side_bindoffs == 0
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{gauge, request};
    use super::*;

    #[test]
    fn wide_bind_off_with_side_decreases() {
        let neck = BoatNeck::make(&request(30, 1.0), &gauge());

        assert_eq!(neck.side_bindoffs, 3);
        assert_eq!(neck.bottom_bindoffs, 24);
        assert_eq!(neck.rows_in_pullover_shaping(), 6);
        assert_eq!(neck.neckline_depth, Some(1.0));
        assert_eq!(neck.pickup_stitches, 40);
        assert!((neck.area() - 6.0).abs() < 1e-9);
        assert!(!neck.marker_before_center_stitch());
    }

    #[test]
    fn cardigan_adds_skip_row_on_right_side() {
        let neck = BoatNeck::make(&request(30, 1.0), &gauge());
        assert_eq!(neck.rows_in_cardigan_shaping(RowParity::RightSide), Some(7));
        assert_eq!(neck.rows_in_cardigan_shaping(RowParity::WrongSide), Some(6));
        assert_eq!(neck.bottom_bindoffs_cardigan(), 12);
    }

    #[test]
    fn narrow_goal_has_no_side_decreases() {
        let neck = BoatNeck::make(&request(8, 1.0), &gauge());
        assert_eq!(neck.side_bindoffs, 0);
        assert_eq!(neck.rows_in_pullover_shaping(), 1);
        assert_eq!(neck.pickup_stitches, 18);
    }

    #[test]
    fn zero_goal_is_empty() {
        let neck = BoatNeck::make(&request(0, 1.0), &gauge());
        assert!(neck.is_empty());
        assert_eq!(neck.neckline_depth, None);
        assert_eq!(neck.pickup_stitches, 0);
        assert_eq!(neck.depth_to_shaping_end(), None);
    }
}
