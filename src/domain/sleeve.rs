//! Sleeve shaping between cuff and cap
//!
//! Picks the schedule that carries the cast-ons up to the bicep: straight,
//! single-rate edge shaping, or compound shaping when a single rate leaves too
//! much plain knitting below the cap. When the rows run out the cast-ons move
//! to the nearest count the rows can reach.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::compound::{compute_compound_edge_shaping, CompoundEdgeShaping};
use super::edge::{compute_edge_shaping, EdgeShaping, EdgeShapingOptions, EdgeShapingResult};
use super::gauge::Gauge;
use super::limits::ShapingLimits;
use super::rounding::{round_to, RepeatConstraint, RoundingDirection};

#[derive(Debug, Error, PartialEq)]
pub enum SleeveError {
    #[error("Cast-ons ({cast_ons}) and bicep ({bicep}) differ in parity")]
    ParityMismatch { cast_ons: u32, bicep: u32 },

    #[error("Bicep of {bicep} stitches does not land on the cast-on repeat")]
    BicepOffRepeat { bicep: u32 },

    #[error("Adjusted cast-ons of {cast_ons} still cannot reach the bicep")]
    Unreachable { cast_ons: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SleeveConstruction {
    #[default]
    SetIn,
    DropShoulder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SleeveLength {
    Short,
    Elbow,
    ThreeQuarter,
    #[default]
    Full,
}

/// Plain knitting allowed between the last shaping row and the cap, in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleeveStraights {
    pub min: f64,
    pub max: f64,
}

impl SleeveStraights {
    pub fn for_sleeve(construction: SleeveConstruction, length: SleeveLength) -> Self {
        use SleeveConstruction::*;
        use SleeveLength::*;

        let (min, max) = match (construction, length) {
            (SetIn, Short | Elbow) => (0.25, 1.5),
            (SetIn, ThreeQuarter) => (1.0, 2.5),
            (SetIn, Full) => (2.0, 2.5),
            (DropShoulder, Short | Elbow) => (0.25, 0.5),
            (DropShoulder, ThreeQuarter | Full) => (0.25, 1.0),
        };
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleeveRequest {
    pub construction: SleeveConstruction,
    pub cast_ons: u32,
    pub bicep_stitches: u32,
    /// Cuff to the start of the cap, in inches
    pub to_cap_height: f64,
    pub edging_height: f64,
    pub straights: SleeveStraights,
    pub cast_on_repeat: Option<RepeatConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SleeveShaping {
    Straight,
    Edge(EdgeShaping),
    Compound(CompoundEdgeShaping),
}

impl SleeveShaping {
    pub fn num_shaping_rows(&self) -> u32 {
        match self {
            SleeveShaping::Straight => 0,
            SleeveShaping::Edge(edge) => edge.num_total_shaping_rows(),
            SleeveShaping::Compound(compound) => compound.num_total_shaping_rows(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleevePlan {
    /// May differ from the requested cast-ons when the rows ran out
    pub cast_ons: u32,
    pub bicep_stitches: u32,
    pub shaping: SleeveShaping,
    /// Height available for shaping, in inches
    pub shaping_distance: f64,
    pub vertical_play: Option<f64>,
    pub wrist_hem_height: f64,
}

impl SleevePlan {
    pub fn is_bell(&self) -> bool {
        self.cast_ons > self.bicep_stitches
    }

    pub fn cast_ons_adjusted_from(&self, request: &SleeveRequest) -> bool {
        self.cast_ons != request.cast_ons
    }
}

/// Plans the shaping from cuff to cap
#[tracing::instrument(level = "debug", skip_all, fields(cast_ons = request.cast_ons, bicep = request.bicep_stitches))]
pub fn plan_sleeve_shaping(
    request: &SleeveRequest,
    gauge: &Gauge,
    limits: &ShapingLimits,
) -> Result<SleevePlan, SleeveError> {
    let bicep = request.bicep_stitches;
    if request.cast_ons % 2 != bicep % 2 {
        return Err(SleeveError::ParityMismatch {
            cast_ons: request.cast_ons,
            bicep,
        });
    }

    let wrist_hem_height = if request.edging_height > request.to_cap_height {
        limits.minimum_wrist_edging_height
    } else {
        request.edging_height
    };
    let two_rows = gauge.height_for_rows(2.0);
    let distance = request.to_cap_height - request.straights.min - request.edging_height - two_rows;

    let straight = |cast_ons: u32| SleevePlan {
        cast_ons,
        bicep_stitches: bicep,
        shaping: SleeveShaping::Straight,
        shaping_distance: distance.max(0.0),
        vertical_play: None,
        wrist_hem_height,
    };

    if request.cast_ons == bicep {
        return Ok(straight(bicep));
    }
    if distance <= 0.0 {
        tracing::debug!(distance, "no room for sleeve shaping, knitting straight");
        return Ok(straight(bicep));
    }

    let bell = request.cast_ons > bicep;
    let endpoints = |cast_ons: u32| if bell { (cast_ons, bicep) } else { (bicep, cast_ons) };
    let (larger, smaller) = endpoints(request.cast_ons);

    let first = compute_edge_shaping(larger, smaller, distance, gauge, &EdgeShapingOptions::default());

    if let Some(play) = first.vertical_play() {
        let plan = |shaping: SleeveShaping, vertical_play: Option<f64>| SleevePlan {
            cast_ons: request.cast_ons,
            bicep_stitches: bicep,
            shaping,
            shaping_distance: distance,
            vertical_play,
            wrist_hem_height,
        };

        if play + two_rows > request.straights.max {
            tracing::debug!(play, "single rate leaves too much straight knitting, compounding");
            let compound = compute_compound_edge_shaping(larger, smaller, distance, gauge);
            let vertical_play = compound.vertical_play();
            return Ok(plan(SleeveShaping::Compound(compound.into_shaping()), vertical_play));
        }

        let chosen = if request.construction == SleeveConstruction::SetIn
            && !first.shaping().max_distance_constraint_hit
        {
            let options = EdgeShapingOptions {
                max_distance_between_shaping_rows: Some(limits.max_inches_between_sleeve_shaping_rows),
                ..Default::default()
            };
            let capped = compute_edge_shaping(larger, smaller, distance, gauge, &options);
            if capped.constraints_met() {
                capped
            } else {
                first
            }
        } else {
            first
        };
        let vertical_play = chosen.vertical_play();
        return Ok(plan(SleeveShaping::Edge(chosen.into_shaping()), vertical_play));
    }

    let cast_ons = adjusted_cast_ons(&first, bell, bicep, request.cast_on_repeat)?;
    tracing::debug!(requested = request.cast_ons, cast_ons, "sleeve shaping infeasible, moving cast-ons");

    let (larger, smaller) = endpoints(cast_ons);
    let adjusted = compute_edge_shaping(larger, smaller, distance, gauge, &EdgeShapingOptions::default());
    if !adjusted.constraints_met() {
        return Err(SleeveError::Unreachable { cast_ons });
    }

    Ok(SleevePlan {
        cast_ons,
        bicep_stitches: bicep,
        vertical_play: adjusted.vertical_play(),
        shaping: SleeveShaping::Edge(adjusted.into_shaping()),
        shaping_distance: distance,
        wrist_hem_height,
    })
}

/// Nearest reachable cast-on count, snapped to the repeat and the bicep parity
fn adjusted_cast_ons(
    infeasible: &EdgeShapingResult,
    bell: bool,
    bicep: u32,
    repeat: Option<RepeatConstraint>,
) -> Result<u32, SleeveError> {
    let best = if bell {
        infeasible.best_larger_stitches()
    } else {
        infeasible.best_smaller_stitches()
    }
    .unwrap_or(bicep);

    let Some(repeat) = repeat else {
        return Ok(best);
    };
    if !repeat.is_satisfied_by(bicep) {
        return Err(SleeveError::BicepOffRepeat { bicep });
    }

    let direction = if bell {
        RoundingDirection::Down
    } else {
        RoundingDirection::Up
    };
    let mut cast_ons = round_to(
        f64::from(best),
        direction,
        f64::from(repeat.mod_y),
        f64::from(repeat.x_mod),
    ) as i64;
    if cast_ons % 2 != i64::from(bicep % 2) {
        cast_ons += if bell {
            -i64::from(repeat.mod_y)
        } else {
            i64::from(repeat.mod_y)
        };
    }

    let reaches = if bell {
        cast_ons >= i64::from(bicep)
    } else {
        (0..=i64::from(bicep)).contains(&cast_ons)
    };
    if !reaches {
        return Err(SleeveError::Unreachable {
            cast_ons: cast_ons.max(0) as u32,
        });
    }
    Ok(cast_ons as u32)
}
