//! Craft limits the solvers rely on
//!
//! The constants are the shipped defaults. [`ShapingLimits`] bundles them so
//! a project config can override individual values.

use serde::{Deserialize, Serialize};

/// Armhole shaping may use at most this fraction of the armhole depth
pub const MAX_ARMHOLE_SHAPING_HEIGHT_PERCENTAGE: f64 = 0.35;

/// Torso dart rows are never further apart than this many inches
pub const MAX_INCHES_BETWEEN_BODY_SHAPING_ROWS: f64 = 2.0;

/// Sleeve shaping rows are never further apart than this many inches
pub const MAX_INCHES_BETWEEN_SLEEVE_SHAPING_ROWS: f64 = 5.0;

pub const MINIMUM_WRIST_EDGING_HEIGHT: f64 = 0.5;

/// Flat top of the sleeve cap, as a fraction of bicep width
pub const ARMSCYE_C_RATIO: f64 = 0.2;

/// Second cap bind-off, as a fraction of bicep width
pub const ARMSCYE_D_RATIO: f64 = 0.04;

/// Largest second cap bind-off, in inches
pub const MAX_ARMSCYE_Y: f64 = 1.5;

/// Overridable set of the limits above
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingLimits {
    pub max_armhole_shaping_height_percentage: f64,
    pub max_inches_between_body_shaping_rows: f64,
    pub max_inches_between_sleeve_shaping_rows: f64,
    pub minimum_wrist_edging_height: f64,
    pub armscye_c_ratio: f64,
    pub armscye_d_ratio: f64,
    pub max_armscye_y: f64,
}

impl Default for ShapingLimits {
    fn default() -> Self {
        Self {
            max_armhole_shaping_height_percentage: MAX_ARMHOLE_SHAPING_HEIGHT_PERCENTAGE,
            max_inches_between_body_shaping_rows: MAX_INCHES_BETWEEN_BODY_SHAPING_ROWS,
            max_inches_between_sleeve_shaping_rows: MAX_INCHES_BETWEEN_SLEEVE_SHAPING_ROWS,
            minimum_wrist_edging_height: MINIMUM_WRIST_EDGING_HEIGHT,
            armscye_c_ratio: ARMSCYE_C_RATIO,
            armscye_d_ratio: ARMSCYE_D_RATIO,
            max_armscye_y: MAX_ARMSCYE_Y,
        }
    }
}

impl ShapingLimits {
    /// Returns the name of the first limit that is not a positive finite number
    pub fn first_invalid(&self) -> Option<&'static str> {
        let fields = [
            ("max_armhole_shaping_height_percentage", self.max_armhole_shaping_height_percentage),
            ("max_inches_between_body_shaping_rows", self.max_inches_between_body_shaping_rows),
            ("max_inches_between_sleeve_shaping_rows", self.max_inches_between_sleeve_shaping_rows),
            ("minimum_wrist_edging_height", self.minimum_wrist_edging_height),
            ("armscye_c_ratio", self.armscye_c_ratio),
            ("armscye_d_ratio", self.armscye_d_ratio),
            ("max_armscye_y", self.max_armscye_y),
        ];
        fields
            .iter()
            .find(|(_, value)| !(*value > 0.0 && value.is_finite()))
            .map(|(name, _)| *name)
    }
}
