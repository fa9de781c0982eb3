//! Per-invocation settings: the loaded config plus command-line overrides

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::domain::{check_counts, Gauge, ShapingLimits};
use crate::storage::{Config, Units};

/// Gauge flags shared by every solver command
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct GaugeArgs {
    /// Stitches per inch (per 10 cm with --units cm); defaults to the project gauge
    #[arg(id = "stitch_gauge", long = "stitch-gauge", short = 's')]
    pub stitches: Option<f64>,

    /// Rows per inch (per 10 cm with --units cm); defaults to the project gauge
    #[arg(id = "row_gauge", long = "row-gauge", short = 'r')]
    pub rows: Option<f64>,
}

pub struct Settings {
    pub config: Config,
    pub units: Units,
}

impl Settings {
    pub fn new(config: Config, units: Option<Units>) -> Self {
        let units = units.unwrap_or(config.project.units);
        Self { config, units }
    }

    /// The gauge from flags, falling back to the project config per rate
    pub fn gauge(&self, args: &GaugeArgs) -> Result<Gauge> {
        let configured = self.config.project.gauge;
        let stitches = args.stitches.or(configured.map(|g| g.stitches));
        let rows = args.rows.or(configured.map(|g| g.rows));
        match (stitches, rows) {
            (Some(stitches), Some(rows)) => self.units.gauge(stitches, rows),
            _ => bail!(
                "No gauge given. Pass --stitch-gauge and --row-gauge, or set [gauge] in {}/config.toml",
                crate::storage::PROJECT_DIR
            ),
        }
    }

    /// Converts a length typed on the command line to inches
    pub fn length(&self, value: f64, what: &str) -> Result<f64> {
        if !(value >= 0.0 && value.is_finite()) {
            bail!("{} must be zero or more, got {}", what, value);
        }
        Ok(self.units.to_inches(value))
    }

    pub fn limits(&self) -> &ShapingLimits {
        &self.config.project.limits
    }
}

/// Orders two counts for a solver, rejecting an odd difference
pub fn ordered_counts(a: u32, b: u32) -> Result<(u32, u32)> {
    let (larger, smaller) = (a.max(b), a.min(b));
    check_counts(larger, smaller).context("Cannot shape between these counts")?;
    Ok((larger, smaller))
}
