//! knitshape - knitting shaping engine
//!
//! Turns garment measurements and gauge into row-by-row shaping: edge and
//! dart schedules, armholes, sleeve caps, sleeves and necklines. The solvers
//! live in [`domain`]; [`storage`] handles project config and plan files.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Gauge, RoundingDirection, ShapingLimits, ShapingOutcome};
