//! Knitting calculators (placer, buttons, pickup, gauge)

use anyhow::{bail, Context, Result};
use clap::Args;

use super::output::{opt, Output};
use super::settings::{GaugeArgs, Settings};
use crate::domain::gauge::cm_to_inches;
use crate::domain::{compute_button_spacing, estimate_pickup, place_shaping, solve_gauge, GaugeSolution, PickupEdge};
use crate::storage::Units;

#[derive(Args, Debug)]
pub struct PlacerArgs {
    #[arg(long)]
    pub start: u32,

    #[arg(long)]
    pub end: u32,

    /// Rows available
    #[arg(long)]
    pub rows: u32,

    /// Stitches each shaping row adds or removes (1 or 2)
    #[arg(long, default_value = "2")]
    pub per_row: u32,
}

#[derive(Args, Debug)]
pub struct ButtonsArgs {
    /// Stitches in the band
    #[arg(long)]
    pub stitches: u32,

    #[arg(long)]
    pub buttons: u32,

    #[arg(long, default_value = "2")]
    pub per_buttonhole: u32,
}

#[derive(Args, Debug)]
pub struct PickupArgs {
    /// Rows along the edge
    #[arg(long, conflicts_with = "length")]
    pub edge_rows: Option<u32>,

    /// Edge length
    #[arg(long, short = 'l')]
    pub length: Option<f64>,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

#[derive(Args, Debug)]
pub struct GaugeCalcArgs {
    /// Length measured
    #[arg(long, short = 'l')]
    pub length: Option<f64>,

    /// Stitches or rows counted
    #[arg(long)]
    pub count: Option<f64>,

    /// Stitches or rows per inch (per 10 cm with --units cm)
    #[arg(long)]
    pub gauge: Option<f64>,
}

pub fn placer(args: PlacerArgs, output: &Output) -> Result<()> {
    output.verbose_ctx("placer", &format!("{:?}", args));
    let placement = place_shaping(args.start, args.end, args.rows, args.per_row).context("Cannot place shaping")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "placement": placement,
            "num_shaping_repeats": placement.num_shaping_repeats(),
        }));
        return Ok(());
    }

    let word = placement.direction.as_str();
    output.heading("Shaping placement");
    output.field("Work even", format!("{} rows", placement.rows_before_first));
    if placement.num_shaping_rows > 0 {
        output.field(&format!("Then {} row", word), 1);
        if placement.num_shaping_repeats() > 0 {
            output.field(
                &format!("Then {} every", word),
                format!("{} rows, {} more times", placement.rows_between + 1, placement.num_shaping_repeats()),
            );
        }
        output.field("Then work even", format!("{} rows", placement.rows_after_last));
    }
    output.field("Shaping rows", placement.num_shaping_rows);
    Ok(())
}

pub fn buttons(args: ButtonsArgs, output: &Output) -> Result<()> {
    output.verbose_ctx("buttons", &format!("{:?}", args));
    let spacing = compute_button_spacing(args.stitches, args.per_buttonhole, args.buttons)
        .context("Cannot space buttonholes")?;

    if output.is_json() {
        output.data(&spacing);
        return Ok(());
    }

    output.heading("Buttonhole placement");
    output.field("Work before first hole", spacing.initial_stitches);
    output.field("Stitches per hole", spacing.stitches_per_buttonhole);
    output.field("Work between holes", opt(spacing.stitches_between_buttonholes));
    output.field("Repeats after first hole", spacing.number_of_repeats());
    output.field("Work after last hole", spacing.final_stitches);
    Ok(())
}

pub fn pickup(args: PickupArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let edge = match (args.edge_rows, args.length) {
        (Some(rows), _) => PickupEdge::Rows(rows),
        (None, Some(length)) => PickupEdge::Inches(settings.length(length, "Length")?),
        (None, None) => bail!("Give the edge as --edge-rows or --length"),
    };
    let estimate = estimate_pickup(&gauge, edge).context("Cannot estimate pickup")?;

    if output.is_json() {
        output.data(&estimate);
        return Ok(());
    }

    output.heading("Pickup");
    output.field("Rows on edge", estimate.rows_on_edge);
    output.field("Stitches to pick up", estimate.stitches_to_pick_up);
    output.field(
        "Rate",
        format!(
            "{} stitches for every {} rows",
            estimate.stitch_pickup_rate, estimate.row_pickup_rate
        ),
    );
    Ok(())
}

pub fn gauge(args: GaugeCalcArgs, settings: &Settings, output: &Output) -> Result<()> {
    let metric = settings.units == Units::Cm;
    let length = args.length.map(|l| settings.length(l, "Length")).transpose()?;
    // metric gauge is per 10 cm
    let per_inch = args.gauge.map(|g| if metric { g / cm_to_inches(10.0) } else { g });

    let solution = solve_gauge(length, args.count, per_inch).context("Cannot solve gauge")?;
    if output.is_json() {
        output.data(&solution);
        return Ok(());
    }

    match solution {
        GaugeSolution::Length { inches, cm } => {
            if metric {
                output.field("Length", format!("{:.1} cm", cm));
            } else {
                output.field("Length", format!("{:.2} in", inches));
            }
        }
        GaugeSolution::Count { count } => output.field("Count", count),
        GaugeSolution::Gauge { per_inch, per_ten_cm } => {
            output.field("Per inch", per_inch);
            output.field("Per 10 cm", per_ten_cm);
        }
    }
    Ok(())
}
