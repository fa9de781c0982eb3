use serde::{Deserialize, Serialize};

use super::{BoatNeck, Neckline, NecklineError, NecklineRequest, NecklineStyle};
use crate::domain::gauge::{rectangle_area, Gauge, RowParity};
use crate::domain::rounding::{round_to, RoundingDirection};

/// Depth of the boat neck above the lace panel, in inches
pub const BOAT_PORTION_DEPTH: f64 = 2.5;
pub const MINIMUM_DEPTH: f64 = 5.5;
pub const MINIMUM_STITCHES: u32 = 15;

const LACE_WIDTH_RATIO: f64 = 0.8;
const LACE_REPEAT: f64 = 12.0;

/// A 2.5 inch boat neck with a rectangular lace panel centred below it.
///
/// The reported depth reaches the bottom of the lace panel so the lace starts
/// on time, while the pickup count and removed area come from the boat neck
/// alone. Pullover only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurksAndCaicosNeck {
    #[serde(flatten)]
    pub boat: BoatNeck,
    /// Stitches across the lace panel, a whole number of repeats
    pub lace_stitches: u32,
}

impl TurksAndCaicosNeck {
    pub fn make(request: &NecklineRequest, gauge: &Gauge) -> Result<Self, NecklineError> {
        if request.depth_goal < MINIMUM_DEPTH {
            return Err(NecklineError::TooShallow {
                depth: request.depth_goal,
                minimum: MINIMUM_DEPTH,
            });
        }
        if request.stitches_goal < MINIMUM_STITCHES {
            return Err(NecklineError::TooNarrow {
                stitches: request.stitches_goal,
                minimum: MINIMUM_STITCHES,
            });
        }

        let boat_request = NecklineRequest {
            depth_goal: BOAT_PORTION_DEPTH,
            ..*request
        };
        let mut boat = BoatNeck::make(&boat_request, gauge);
        boat.neckline_depth = Some(request.depth_goal);

        let across = f64::from(boat.stitches_across_neckline()) * LACE_WIDTH_RATIO;
        let lace_stitches = round_to(across, RoundingDirection::Down, LACE_REPEAT, 0.0).max(0.0) as u32;
        tracing::debug!(lace_stitches, "lace panel sized");

        Ok(Self { boat, lace_stitches })
    }

    pub fn lace_height_in_inches(&self) -> f64 {
        self.total_depth().map_or(0.0, |depth| depth - BOAT_PORTION_DEPTH)
    }

    /// Always odd
    pub fn lace_height_in_rows(&self) -> u32 {
        let rows = self.boat.gauge.rows_in(self.lace_height_in_inches());
        round_to(rows, RoundingDirection::Down, 2.0, 1.0).max(0.0) as u32
    }
}

impl Neckline for TurksAndCaicosNeck {
    fn style(&self) -> NecklineStyle {
        NecklineStyle::TurksAndCaicos
    }

    fn gauge(&self) -> &Gauge {
        &self.boat.gauge
    }

    fn total_depth(&self) -> Option<f64> {
        self.boat.neckline_depth
    }

    fn rows_in_pullover_shaping(&self) -> u32 {
        self.boat.rows_in_pullover_shaping()
    }

    fn rows_in_cardigan_shaping(&self, _parity: RowParity) -> Option<u32> {
        None
    }

    fn stitches_across_neckline(&self) -> u32 {
        self.boat.stitches_across_neckline()
    }

    fn pickup_stitches(&self) -> u32 {
        self.boat.pickup_stitches
    }

    fn area(&self) -> f64 {
        rectangle_area(self.width(), BOAT_PORTION_DEPTH)
    }

    fn is_empty(&self) -> bool {
        self.boat.is_empty()
    }

    fn depth_to_shaping_end(&self) -> Option<f64> {
        let shaping = self
            .gauge()
            .height_for_rows(f64::from(self.rows_in_pullover_shaping()));
        Some(BOAT_PORTION_DEPTH - shaping)
    }
}
