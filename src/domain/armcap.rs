//! Sleeve cap shaping
//!
//! The cap mirrors the armhole: bind off `x`, then `y`, then work `e` single
//! decreases (the "beads") spread over four rates, then bind off `d` twice
//! and the remaining `c` stitches across the top. The bead rows must cover
//! exactly the diagonal the armhole circumference leaves for them.
//!
//! Row accounting for a bead distribution:
//!
//! | Rate | Rows per bead |
//! |------|---------------|
//! | one  | 1             |
//! | two  | 2             |
//! | four | 4             |
//! | six  | 6             |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::armhole::ArmholeShaping;
use super::gauge::Gauge;
use super::limits::ShapingLimits;
use super::rounding::{round_count, round_to, RoundingDirection};

/// Upper bound on whole-cap retries before giving up
const MAX_CAP_ATTEMPTS: usize = 256;

/// Once `y` has no slack, the cap top may widen by at most this many inches
const MAX_CAP_TOP_ADJUSTMENT_INCHES: f64 = 2.0;

#[derive(Debug, Error, PartialEq)]
pub enum ArmcapShapingError {
    #[error("Bicep of {bicep} stitches is too narrow for the cap bind-offs")]
    NegativeResidual { bicep: u32 },

    #[error("No sleeve cap for {bicep} bicep stitches matches an armhole of {circumference:.2} inches")]
    NoSolution { bicep: u32, circumference: f64 },

    #[error("Sleeve cap search gave up after {0} attempts")]
    IterationLimit(usize),
}

/// Decreases at each rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeadCounts {
    pub one: u32,
    pub two: u32,
    pub four: u32,
    pub six: u32,
}

impl BeadCounts {
    pub fn rows(&self) -> u32 {
        self.one + 2 * self.two + 4 * self.four + 6 * self.six
    }

    pub fn decreases(&self) -> u32 {
        self.one + self.two + self.four + self.six
    }
}

/// Distributes `decreases` beads so they use exactly `rows` rows.
///
/// Starts with every bead at rate one and moves beads up a rate at a time.
/// At most one bead sits at rate four: a second one moves on to six.
pub fn play_beads(decreases: u32, rows: u32) -> Option<BeadCounts> {
    let mut beads = BeadCounts {
        one: decreases,
        ..Default::default()
    };

    loop {
        let used = beads.rows();
        if used == rows {
            return Some(beads);
        }
        // every move adds rows, so overshooting is final
        if used > rows {
            return None;
        }
        if beads.one > 0 {
            beads.one -= 1;
            beads.two += 1;
        } else if beads.four == 1 {
            beads.four = 0;
            beads.six += 1;
        } else if beads.two > 0 {
            beads.two -= 1;
            beads.four = 1;
        } else {
            return None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeadGameResult {
    pub armscye_x: u32,
    pub armscye_y: u32,
    /// Stitches bound off across the top of the cap
    pub armscye_c: u32,
    /// Bound off at each edge, twice, just below the top
    pub armscye_d: u32,
    /// Bead decreases at each edge
    pub armscye_e: u32,
    pub beads: BeadCounts,
    pub target_rows: u32,
    pub bicep_stitches: u32,
}

impl BeadGameResult {
    /// Every row of the cap, bind-off rows included
    pub fn rows_in_cap(&self) -> u32 {
        let mut rows = self.beads.rows();
        if self.armscye_x > 0 {
            rows += 1;
        }
        if self.armscye_y > 0 {
            rows += 2;
        }
        if self.armscye_d > 0 {
            rows += 4;
        }
        rows + 2
    }

    pub fn cap_height(&self, gauge: &Gauge) -> f64 {
        gauge.height_for_rows(f64::from(self.rows_in_cap()))
    }

    /// Stitches left once both initial bind-offs are done
    pub fn pre_bead_stitches(&self) -> u32 {
        self.bicep_stitches - 2 * self.armscye_x - 2 * self.armscye_y
    }

    pub fn post_bead_stitches(&self) -> u32 {
        self.pre_bead_stitches() - 2 * self.beads.decreases()
    }
}

struct CapFit {
    c: i64,
    e: i64,
    rows: i64,
}

/// Widens the cap top from `c_start` until the bead decreases fit in the rows
/// the diagonal leaves for them
fn fit_cap(
    gauge: &Gauge,
    bicep: i64,
    x: i64,
    y: i64,
    d: i64,
    c_start: f64,
    circumference: f64,
) -> Result<CapFit, ArmcapShapingError> {
    let bind_offs = 2 * x + 2 * y + 4 * d;
    let mut c = c_start;

    loop {
        let mut e = round_count((bicep as f64 - bind_offs as f64 - c) / 2.0, RoundingDirection::Up);
        let mut c_fit = bicep - bind_offs - 2 * e;
        // an odd residual under a zero-width top leaves c at -1; give one bead back
        if c_fit < 0 {
            e -= 1;
            c_fit += 2;
        }
        if e < 0 {
            return Err(ArmcapShapingError::NegativeResidual { bicep: bicep as u32 });
        }

        let flat = gauge.width_for_stitches((bind_offs + c_fit) as f64);
        let slope = (circumference - flat) / 2.0;
        let run = gauge.width_for_stitches(e as f64);
        let rise_squared = if slope > 0.0 { slope * slope - run * run } else { -1.0 };
        let rows = if rise_squared > 0.0 {
            round_to(gauge.rows_in(rise_squared.sqrt()), RoundingDirection::Down, 2.0, 0.0) as i64
        } else {
            0
        };

        if e <= rows {
            return Ok(CapFit { c: c_fit, e, rows });
        }
        c = (c_fit + 2) as f64;
    }
}

/// Solves the sleeve cap for an armhole.
///
/// `circumference` is the armhole edge over both sides.
#[tracing::instrument(level = "debug", skip(gauge, armhole, limits), fields(x = armhole.x, y = armhole.y))]
pub fn compute_armcap_shaping(
    gauge: &Gauge,
    armhole: &ArmholeShaping,
    circumference: f64,
    bicep_stitches: u32,
    limits: &ShapingLimits,
) -> Result<BeadGameResult, ArmcapShapingError> {
    let bicep = i64::from(bicep_stitches);
    let c_target = limits.armscye_c_ratio * f64::from(bicep_stitches);
    let d = round_count(limits.armscye_d_ratio * f64::from(bicep_stitches), RoundingDirection::Down).max(1);
    let max_y = limits.max_armscye_y * gauge.stitches_per_inch;
    let first_y = round_count(max_y.min(f64::from(armhole.y)), RoundingDirection::Down).max(0);
    let x = i64::from(armhole.x);

    let mut y = first_y;
    let mut adjustment = 0i64;

    for attempt in 0..MAX_CAP_ATTEMPTS {
        let c_start = (c_target - adjustment as f64).max(0.0);
        let fit = fit_cap(gauge, bicep, x, y, d, c_start, circumference)?;

        let count = |value: i64| {
            u32::try_from(value).map_err(|_| ArmcapShapingError::NegativeResidual { bicep: bicep_stitches })
        };
        let (c, e, rows) = (count(fit.c)?, count(fit.e)?, count(fit.rows)?);
        if let Some(beads) = play_beads(e, rows) {
            tracing::debug!(attempt, y, c, e, rows, "sleeve cap solved");
            return Ok(BeadGameResult {
                armscye_x: armhole.x,
                armscye_y: count(y)?,
                armscye_c: c,
                armscye_d: count(d)?,
                armscye_e: e,
                beads,
                target_rows: rows,
                bicep_stitches,
            });
        }

        if y < 2 && gauge.width_for_stitches(adjustment as f64) > MAX_CAP_TOP_ADJUSTMENT_INCHES {
            return Err(ArmcapShapingError::NoSolution {
                bicep: bicep_stitches,
                circumference,
            });
        }
        if y >= 2 {
            y -= 2;
            tracing::trace!(y, "beads do not fit, narrowing second bind-off");
        } else {
            y = first_y;
            adjustment += 2;
            tracing::trace!(adjustment, "beads do not fit, widening cap top");
        }
    }

    Err(ArmcapShapingError::IterationLimit(MAX_CAP_ATTEMPTS))
}
