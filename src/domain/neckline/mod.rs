//! Neckline shape library
//!
//! Each shape splits the stitches removed for the neck into its own fixed
//! sequence of bind-offs and decreases, then estimates the stitches to pick up
//! around the finished edge by walking its straight and diagonal segments.
//!
//! | Style | Stages |
//! |-------|--------|
//! | back  | bind-off, then two single decreases each side |
//! | vee   | optional centre stitch, then evenly spaced decreases |
//! | crew  | centre bind-off, neck-edge decreases, RS-edge decreases |
//! | scoop | centre bind-off, then `y`, `z` and `q` decreases at rising spacing |
//! | boat  | wide bind-off, then a few side decreases |
//! | turks-and-caicos | 2.5 inch boat neck over a centred lace panel |

mod back;
mod boat;
mod crew;
mod scoop;
mod turks_and_caicos;
mod vee;

pub use back::BackNeckline;
pub use boat::BoatNeck;
pub use crew::CrewNeck;
pub use scoop::ScoopNeck;
pub use turks_and_caicos::TurksAndCaicosNeck;
pub use vee::VeeNeck;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gauge::{trapezoid_area, Gauge, RowParity};
use super::rounding::{round_count, RoundingDirection};

#[derive(Debug, Error, PartialEq)]
pub enum NecklineError {
    #[error("A {0} neckline needs at least one stitch to remove")]
    ZeroStitches(NecklineStyle),

    #[error("Neckline depth must be positive, got {0}")]
    InvalidDepth(f64),

    #[error("No vee shaping for {stitches} stitches found below {depth:.2} inches")]
    DepthSearchExhausted { stitches: u32, depth: f64 },

    #[error("Neckline depth {depth:.2} is below the {minimum:.2} inch minimum for this style")]
    TooShallow { depth: f64, minimum: f64 },

    #[error("Neckline of {stitches} stitches is narrower than the {minimum} stitch minimum for this style")]
    TooNarrow { stitches: u32, minimum: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NecklineStyle {
    Back,
    Vee,
    Crew,
    Scoop,
    Boat,
    TurksAndCaicos,
}

impl NecklineStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NecklineStyle::Back => "back",
            NecklineStyle::Vee => "vee",
            NecklineStyle::Crew => "crew",
            NecklineStyle::Scoop => "scoop",
            NecklineStyle::Boat => "boat",
            NecklineStyle::TurksAndCaicos => "turks_and_caicos",
        }
    }
}

impl std::fmt::Display for NecklineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the garment asks of a neckline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NecklineRequest {
    /// Stitches the neck removes; the shape must remove exactly this many
    pub stitches_goal: u32,
    /// Inches from the lowest shaping row to the shoulders. The neck may end
    /// up deeper, never shallower.
    pub depth_goal: f64,
    #[serde(default)]
    pub pickup_rounding: RoundingDirection,
    /// Only back necklines use this
    #[serde(default)]
    pub shoulder_stitches: u32,
}

/// Behaviour shared by every neckline shape
pub trait Neckline {
    fn style(&self) -> NecklineStyle;

    fn gauge(&self) -> &Gauge;

    /// `None` for an empty neckline
    fn total_depth(&self) -> Option<f64>;

    /// Rows from the first neckline row through the last bind-off or
    /// decrease, inclusive
    fn rows_in_pullover_shaping(&self) -> u32;

    /// Like [`Neckline::rows_in_pullover_shaping`] for one cardigan front,
    /// whose first neckline row has the given parity. `None` where the
    /// piece is never a cardigan front.
    fn rows_in_cardigan_shaping(&self, parity: RowParity) -> Option<u32>;

    fn stitches_across_neckline(&self) -> u32;

    fn pickup_stitches(&self) -> u32;

    /// Square inches the neckline removes from the piece
    fn area(&self) -> f64;

    /// True when there is no neckline to work at all
    fn is_empty(&self) -> bool;

    fn depth_to_shaping_end(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let shaping = self.gauge().height_for_rows(f64::from(self.rows_in_pullover_shaping()));
        self.total_depth().map(|depth| depth - shaping)
    }

    fn width(&self) -> f64 {
        self.gauge().width_for_stitches(f64::from(self.stitches_across_neckline()))
    }
}

/// Any neckline shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum NecklineShape {
    Back(BackNeckline),
    Vee(VeeNeck),
    Crew(CrewNeck),
    Scoop(ScoopNeck),
    Boat(BoatNeck),
    TurksAndCaicos(TurksAndCaicosNeck),
}

impl NecklineShape {
    pub fn as_neckline(&self) -> &dyn Neckline {
        match self {
            NecklineShape::Back(n) => n,
            NecklineShape::Vee(n) => n,
            NecklineShape::Crew(n) => n,
            NecklineShape::Scoop(n) => n,
            NecklineShape::Boat(n) => n,
            NecklineShape::TurksAndCaicos(n) => n,
        }
    }

    pub fn summary(&self) -> NecklineSummary {
        NecklineSummary::of(self.as_neckline())
    }
}

/// Flat report of a neckline's measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NecklineSummary {
    pub style: NecklineStyle,
    pub empty: bool,
    pub total_depth: Option<f64>,
    pub depth_to_shaping_end: Option<f64>,
    pub rows_in_pullover_shaping: u32,
    pub rows_in_cardigan_shaping_rs: Option<u32>,
    pub rows_in_cardigan_shaping_ws: Option<u32>,
    pub stitches_across_neckline: u32,
    pub pickup_stitches: u32,
    pub area: f64,
}

impl NecklineSummary {
    pub fn of(neckline: &dyn Neckline) -> Self {
        Self {
            style: neckline.style(),
            empty: neckline.is_empty(),
            total_depth: neckline.total_depth(),
            depth_to_shaping_end: neckline.depth_to_shaping_end(),
            rows_in_pullover_shaping: neckline.rows_in_pullover_shaping(),
            rows_in_cardigan_shaping_rs: neckline.rows_in_cardigan_shaping(RowParity::RightSide),
            rows_in_cardigan_shaping_ws: neckline.rows_in_cardigan_shaping(RowParity::WrongSide),
            stitches_across_neckline: neckline.stitches_across_neckline(),
            pickup_stitches: neckline.pickup_stitches(),
            area: neckline.area(),
        }
    }
}

/// Builds a neckline of the given style
#[tracing::instrument(level = "debug", skip(request, gauge), fields(stitches = request.stitches_goal, depth = request.depth_goal))]
pub fn make_neckline(
    style: NecklineStyle,
    request: &NecklineRequest,
    gauge: &Gauge,
) -> Result<NecklineShape, NecklineError> {
    if !request.depth_goal.is_finite() || request.depth_goal < 0.0 {
        return Err(NecklineError::InvalidDepth(request.depth_goal));
    }

    let shape = match style {
        NecklineStyle::Back => NecklineShape::Back(BackNeckline::make(request, gauge)?),
        NecklineStyle::Vee => NecklineShape::Vee(VeeNeck::make(request, gauge)?),
        NecklineStyle::Crew => NecklineShape::Crew(CrewNeck::make(request, gauge)),
        NecklineStyle::Scoop => NecklineShape::Scoop(ScoopNeck::make(request, gauge)),
        NecklineStyle::Boat => NecklineShape::Boat(BoatNeck::make(request, gauge)),
        NecklineStyle::TurksAndCaicos => {
            NecklineShape::TurksAndCaicos(TurksAndCaicosNeck::make(request, gauge)?)
        }
    };
    tracing::debug!(
        pickup = shape.as_neckline().pickup_stitches(),
        rows = shape.as_neckline().rows_in_pullover_shaping(),
        "neckline made"
    );
    Ok(shape)
}

fn trapezoid_area_in_stitches(bottom: u32, top: u32, rows: u32, gauge: &Gauge) -> f64 {
    trapezoid_area(
        gauge.width_for_stitches(f64::from(bottom)),
        gauge.width_for_stitches(f64::from(top)),
        gauge.height_for_rows(f64::from(rows)),
    )
}

/// Rounds an edge length in inches to a stitch count
fn pickup_count(edge_length: f64, gauge: &Gauge, direction: RoundingDirection) -> u32 {
    round_count(gauge.stitches_for_width(edge_length), direction).max(0) as u32
}

fn round_up_half(stitches: u32) -> u32 {
    stitches.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn gauge() -> Gauge {
        Gauge::new(5.0, 7.0).unwrap()
    }

    pub(super) fn request(stitches_goal: u32, depth_goal: f64) -> NecklineRequest {
        NecklineRequest {
            stitches_goal,
            depth_goal,
            pickup_rounding: RoundingDirection::Nearest,
            shoulder_stitches: 20,
        }
    }

    #[test]
    fn dispatches_on_style() {
        let shape = make_neckline(NecklineStyle::Crew, &request(30, 3.0), &gauge()).unwrap();
        assert!(matches!(shape, NecklineShape::Crew(_)));
        assert_eq!(shape.as_neckline().style(), NecklineStyle::Crew);
    }

    #[test]
    fn summary_reports_both_cardigan_parities() {
        let summary = make_neckline(NecklineStyle::Crew, &request(30, 3.0), &gauge())
            .unwrap()
            .summary();
        assert_eq!(summary.rows_in_cardigan_shaping_rs, Some(13));
        assert_eq!(summary.rows_in_cardigan_shaping_ws, Some(12));
        assert_eq!(summary.pickup_stitches, 51);
    }

    #[test]
    fn back_has_no_cardigan_rows() {
        let summary = make_neckline(NecklineStyle::Back, &request(30, 1.0), &gauge())
            .unwrap()
            .summary();
        assert_eq!(summary.rows_in_cardigan_shaping_rs, None);
    }

    #[test]
    fn negative_depth_is_rejected() {
        let err = make_neckline(NecklineStyle::Boat, &request(30, -1.0), &gauge()).unwrap_err();
        assert_eq!(err, NecklineError::InvalidDepth(-1.0));
    }

    #[test]
    fn serializes_with_style_tag() {
        let shape = make_neckline(NecklineStyle::Boat, &request(30, 1.0), &gauge()).unwrap();
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["style"], "boat");
        assert_eq!(json["side_bindoffs"], 3);
    }

    #[test]
    fn turks_and_caicos_reports_full_depth() {
        let shape = make_neckline(NecklineStyle::TurksAndCaicos, &request(30, 7.0), &gauge()).unwrap();
        let summary = shape.summary();
        assert_eq!(summary.style, NecklineStyle::TurksAndCaicos);
        assert_eq!(summary.total_depth, Some(7.0));
        assert_eq!(summary.rows_in_cardigan_shaping_rs, None);

        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["style"], "turks_and_caicos");
        assert_eq!(json["lace_stitches"], 24);
        assert_eq!(json["side_bindoffs"], 3);
    }

    #[test]
    fn helpers() {
        assert_eq!(round_up_half(7), 4);
        assert_eq!(round_up_half(8), 4);
        assert!((trapezoid_area_in_stitches(10, 20, 7, &gauge()) - 3.0).abs() < 1e-12);
    }
}
