//! Gauge, row parity, and unit conversion
//!
//! A [`Gauge`] is immutable once built: solvers read it, never change it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rounding::{round_to, RoundingDirection};

pub const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Error, PartialEq)]
pub enum GaugeError {
    #[error("Gauge must be positive and finite: {0} {1} per inch")]
    NotPositive(f64, &'static str),

    #[error("Exactly two of length, count and gauge are needed, got {0}")]
    WrongArity(usize),

    #[error("Cannot solve for gauge with zero length")]
    ZeroLength,
}

/// Stitches and rows per inch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub stitches_per_inch: f64,
    pub rows_per_inch: f64,
}

impl Gauge {
    /// Creates a gauge, rejecting zero, negative and non-finite rates
    pub fn new(stitches_per_inch: f64, rows_per_inch: f64) -> Result<Self, GaugeError> {
        if !(stitches_per_inch > 0.0 && stitches_per_inch.is_finite()) {
            return Err(GaugeError::NotPositive(stitches_per_inch, "stitches"));
        }
        if !(rows_per_inch > 0.0 && rows_per_inch.is_finite()) {
            return Err(GaugeError::NotPositive(rows_per_inch, "rows"));
        }
        Ok(Self {
            stitches_per_inch,
            rows_per_inch,
        })
    }

    /// Builds a gauge from counts over 10 cm, the usual ball-band format
    pub fn from_per_ten_cm(stitches: f64, rows: f64) -> Result<Self, GaugeError> {
        let inches = cm_to_inches(10.0);
        Self::new(stitches / inches, rows / inches)
    }

    /// Stitches and rows over 10 cm
    pub fn per_ten_cm(&self) -> (f64, f64) {
        let inches = cm_to_inches(10.0);
        (self.stitches_per_inch * inches, self.rows_per_inch * inches)
    }

    pub fn stitches_for_width(&self, width: f64) -> f64 {
        width * self.stitches_per_inch
    }

    pub fn width_for_stitches(&self, stitches: f64) -> f64 {
        stitches / self.stitches_per_inch
    }

    /// Unrounded row count for a height
    pub fn rows_in(&self, height: f64) -> f64 {
        height * self.rows_per_inch
    }

    pub fn height_for_rows(&self, rows: f64) -> f64 {
        rows / self.rows_per_inch
    }

    /// Row count for a height, ending on the requested side of the fabric.
    ///
    /// Right-side endings round to the nearest odd count, wrong-side endings
    /// to the nearest even count.
    pub fn rows_for_height(&self, height: f64, parity: RowParity) -> i64 {
        let rows = self.rows_in(height);
        let (multiple, modulus) = match parity {
            RowParity::RightSide => (2.0, 1.0),
            RowParity::WrongSide => (2.0, 0.0),
            RowParity::Any => (1.0, 0.0),
        };
        round_to(rows, RoundingDirection::Nearest, multiple, modulus).round() as i64
    }
}

/// Which face of the fabric a row is worked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RowParity {
    #[default]
    RightSide,
    WrongSide,
    Any,
}

impl RowParity {
    /// The parity of the next row
    pub fn reverse(self) -> Self {
        match self {
            RowParity::RightSide => RowParity::WrongSide,
            RowParity::WrongSide => RowParity::RightSide,
            RowParity::Any => RowParity::Any,
        }
    }

    /// Parity `rows` rows after a row of this parity
    pub fn after_rows(self, rows: u32) -> Self {
        if rows % 2 == 0 {
            self
        } else {
            self.reverse()
        }
    }
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

pub fn hypotenuse(width: f64, height: f64) -> f64 {
    width.hypot(height)
}

pub fn rectangle_area(base: f64, height: f64) -> f64 {
    base * height
}

pub fn triangle_area(base: f64, height: f64) -> f64 {
    0.5 * base * height
}

pub fn trapezoid_area(bottom: f64, top: f64, height: f64) -> f64 {
    0.5 * (bottom + top) * height
}

/// What the gauge calculator solved for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "solved_for", rename_all = "snake_case")]
pub enum GaugeSolution {
    Length { inches: f64, cm: f64 },
    Count { count: i64 },
    Gauge { per_inch: f64, per_ten_cm: f64 },
}

/// Given any two of length (inches), count, and gauge (per inch), finds the third
pub fn solve_gauge(
    length: Option<f64>,
    count: Option<f64>,
    per_inch: Option<f64>,
) -> Result<GaugeSolution, GaugeError> {
    match (length, count, per_inch) {
        (Some(length), Some(count), None) => {
            if length == 0.0 {
                return Err(GaugeError::ZeroLength);
            }
            let per_inch = count / length;
            Ok(GaugeSolution::Gauge {
                per_inch: round_to(per_inch, RoundingDirection::Nearest, 0.25, 0.0),
                per_ten_cm: round_to(per_inch * cm_to_inches(10.0), RoundingDirection::Nearest, 0.5, 0.0),
            })
        }
        (Some(length), None, Some(per_inch)) => {
            check_rate(per_inch)?;
            Ok(GaugeSolution::Count {
                count: round_to(length * per_inch, RoundingDirection::Nearest, 1.0, 0.0).round() as i64,
            })
        }
        (None, Some(count), Some(per_inch)) => {
            check_rate(per_inch)?;
            let inches = count / per_inch;
            Ok(GaugeSolution::Length {
                inches,
                cm: inches_to_cm(inches),
            })
        }
        (l, c, g) => {
            let given = [l.is_some(), c.is_some(), g.is_some()]
                .iter()
                .filter(|x| **x)
                .count();
            Err(GaugeError::WrongArity(given))
        }
    }
}

fn check_rate(per_inch: f64) -> Result<(), GaugeError> {
    if per_inch > 0.0 && per_inch.is_finite() {
        Ok(())
    } else {
        Err(GaugeError::NotPositive(per_inch, "units"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_rejects_bad_rates() {
        assert!(Gauge::new(5.0, 7.0).is_ok());
        assert!(matches!(
            Gauge::new(0.0, 7.0),
            Err(GaugeError::NotPositive(_, "stitches"))
        ));
        assert!(matches!(
            Gauge::new(5.0, f64::NAN),
            Err(GaugeError::NotPositive(_, "rows"))
        ));
    }

    #[test]
    fn ten_cm_round_trip() {
        let gauge = Gauge::from_per_ten_cm(20.0, 28.0).unwrap();
        assert!(approx(gauge.stitches_per_inch, 5.08));
        let (sts, rows) = gauge.per_ten_cm();
        assert!(approx(sts, 20.0));
        assert!(approx(rows, 28.0));
    }

    #[test]
    fn rows_for_height_by_parity() {
        let gauge = Gauge::new(5.0, 7.0).unwrap();
        // 2in at 7 rows/in = 14 rows
        assert_eq!(gauge.rows_for_height(2.0, RowParity::Any), 14);
        assert_eq!(gauge.rows_for_height(2.0, RowParity::WrongSide), 14);
        assert_eq!(gauge.rows_for_height(2.0, RowParity::RightSide), 15);
        // 2.2in = 15.4 rows
        assert_eq!(gauge.rows_for_height(2.2, RowParity::Any), 15);
        assert_eq!(gauge.rows_for_height(2.2, RowParity::WrongSide), 16);
    }

    #[test]
    fn parity_reverses() {
        assert_eq!(RowParity::RightSide.reverse(), RowParity::WrongSide);
        assert_eq!(RowParity::WrongSide.reverse(), RowParity::RightSide);
        assert_eq!(RowParity::Any.reverse(), RowParity::Any);
        assert_eq!(RowParity::RightSide.after_rows(3), RowParity::WrongSide);
        assert_eq!(RowParity::RightSide.after_rows(4), RowParity::RightSide);
    }

    #[test]
    fn unit_conversions() {
        assert!(approx(inches_to_cm(1.0), 2.54));
        assert!(approx(cm_to_inches(25.4), 10.0));
    }

    #[test]
    fn areas() {
        assert!(approx(hypotenuse(3.0, 4.0), 5.0));
        assert!(approx(rectangle_area(2.0, 3.0), 6.0));
        assert!(approx(triangle_area(2.0, 3.0), 3.0));
        assert!(approx(trapezoid_area(2.0, 4.0, 3.0), 9.0));
    }

    #[test]
    fn gauge_calculator_solves_each_unknown() {
        assert_eq!(
            solve_gauge(Some(4.0), Some(22.0), None).unwrap(),
            GaugeSolution::Gauge {
                per_inch: 5.5,
                per_ten_cm: 21.5
            }
        );
        assert_eq!(
            solve_gauge(Some(4.0), None, Some(5.5)).unwrap(),
            GaugeSolution::Count { count: 22 }
        );
        match solve_gauge(None, Some(22.0), Some(5.5)).unwrap() {
            GaugeSolution::Length { inches, cm } => {
                assert!(approx(inches, 4.0));
                assert!(approx(cm, 10.16));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn gauge_calculator_needs_exactly_two() {
        assert_eq!(
            solve_gauge(Some(1.0), Some(1.0), Some(1.0)),
            Err(GaugeError::WrongArity(3))
        );
        assert_eq!(solve_gauge(None, Some(1.0), None), Err(GaugeError::WrongArity(1)));
        assert_eq!(solve_gauge(Some(0.0), Some(3.0), None), Err(GaugeError::ZeroLength));
    }
}
