//! Core solver commands (approximate, edge, compound, marker)

use anyhow::{Context, Result};
use clap::Args;

use super::output::{inches, opt, Output};
use super::settings::{ordered_counts, GaugeArgs, Settings};
use crate::domain::plan::CountKind;
use crate::domain::{
    compute_compound_edge_shaping, compute_edge_shaping, compute_marker_shaping, find_best_approximation,
    EdgeShapingOptions, MarkerShapingOptions, RepeatConstraint, RoundingDirection, ShapingOutcome,
};

#[derive(Args, Debug)]
pub struct ApproximateArgs {
    /// Length to convert
    #[arg(long, short = 'l')]
    pub length: f64,

    /// Convert to stitches (width) or rows (height)
    #[arg(long, value_enum, default_value = "stitches")]
    pub count: CountKind,

    #[arg(long, value_enum, default_value = "nearest")]
    pub direction: RoundingDirection,

    /// Largest allowed error, in length units
    #[arg(long, default_value = "0.5")]
    pub tolerance: f64,

    /// Stitch-pattern repeat the count must land on
    #[arg(long)]
    pub repeat: Option<u32>,

    /// Extra stitches on top of the repeat
    #[arg(long, default_value = "0", requires = "repeat")]
    pub repeat_offset: u32,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

/// Counts and height shared by the shaping solvers
#[derive(Args, Debug)]
pub struct ShapingArgs {
    /// Stitch count at one end
    #[arg(long)]
    pub from: u32,

    /// Stitch count at the other end
    #[arg(long)]
    pub to: u32,

    /// Height available for the shaping
    #[arg(long)]
    pub height: f64,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

#[derive(Args, Debug)]
pub struct EdgeArgs {
    #[command(flatten)]
    pub shaping: ShapingArgs,

    /// Keep every shaping row on the same side of the fabric
    #[arg(long)]
    pub even_spacing: bool,

    /// Largest gap between shaping rows
    #[arg(long)]
    pub max_distance: Option<f64>,
}

#[derive(Args, Debug)]
pub struct MarkerArgs {
    #[command(flatten)]
    pub shaping: ShapingArgs,

    /// Standard darts only, for patterns graded across sizes
    #[arg(long)]
    pub graded: bool,

    /// Allow double darts but not triple darts
    #[arg(long, conflicts_with = "graded")]
    pub no_triple_darts: bool,
}

pub fn approximate(args: ApproximateArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let length = settings.length(args.length, "Length")?;
    let tolerance = settings.length(args.tolerance, "Tolerance")?;
    let repeat = args.repeat.map(|modulus| RepeatConstraint::new(args.repeat_offset, modulus));
    output.verbose_ctx("approximate", &format!("{} in at {:?}, repeat {:?}", length, gauge, repeat));

    let count = find_best_approximation(length, args.count.rate(&gauge), args.direction, tolerance, repeat)
        .context("No count fits")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "count": count,
            "kind": args.count,
            "length_inches": length,
        }));
    } else {
        let kind = match args.count {
            CountKind::Stitches => "Stitches",
            CountKind::Rows => "Rows",
        };
        output.field(kind, count);
    }
    Ok(())
}

pub fn edge(args: EdgeArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.shaping.gauge)?;
    let (larger, smaller) = ordered_counts(args.shaping.from, args.shaping.to)?;
    let height = settings.length(args.shaping.height, "Height")?;
    let options = EdgeShapingOptions {
        even_spacing: args.even_spacing,
        max_distance_between_shaping_rows: args
            .max_distance
            .map(|d| settings.length(d, "Max distance"))
            .transpose()?,
    };
    output.verbose_ctx("edge", &format!("{} -> {} over {} in", larger, smaller, height));

    let outcome = compute_edge_shaping(larger, smaller, height, &gauge, &options);
    if output.is_json() {
        output.data(&outcome);
        return Ok(());
    }

    let shaping = outcome.shaping();
    output.heading("Edge shaping");
    output.field("Shaping rows", shaping.num_standard_shaping_rows);
    output.field("Rows between shaping rows", opt(shaping.rows_between_standard_shaping_rows));
    output.field("Rows used", shaping.num_total_rows());
    if shaping.max_distance_constraint_hit {
        output.field("Max distance", "limited");
    }
    print_status(&outcome, output);
    Ok(())
}

pub fn compound(args: ShapingArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let (larger, smaller) = ordered_counts(args.from, args.to)?;
    let height = settings.length(args.height, "Height")?;
    output.verbose_ctx("compound", &format!("{} -> {} over {} in", larger, smaller, height));

    let outcome = compute_compound_edge_shaping(larger, smaller, height, &gauge);
    if output.is_json() {
        output.data(&outcome);
        return Ok(());
    }

    let shaping = outcome.shaping();
    output.heading("Compound edge shaping");
    output.field("Standard shaping rows", shaping.num_standard_shaping_rows);
    output.field("Rows after each standard row", opt(shaping.rows_between_standard_shaping_rows));
    output.field("Alternate shaping rows", shaping.num_alternate_shaping_rows);
    output.field("Rows after each alternate row", opt(shaping.rows_after_alternate_shaping_rows));
    output.field("Rows used", shaping.num_total_rows());
    print_status(&outcome, output);
    Ok(())
}

pub fn marker(args: MarkerArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.shaping.gauge)?;
    let (larger, smaller) = ordered_counts(args.shaping.from, args.shaping.to)?;
    let height = settings.length(args.shaping.height, "Height")?;
    let base = if args.graded {
        MarkerShapingOptions::graded()
    } else {
        MarkerShapingOptions {
            allow_triple_darts: !args.no_triple_darts,
            ..MarkerShapingOptions::default()
        }
    };
    let options = MarkerShapingOptions {
        max_distance_between_shaping_rows: settings.limits().max_inches_between_body_shaping_rows,
        ..base
    };
    output.verbose_ctx("marker", &format!("{} -> {} over {} in, {:?}", larger, smaller, height, options));

    let outcome = compute_marker_shaping(larger, smaller, height, &gauge, &options);
    if output.is_json() {
        output.data(&outcome);
        return Ok(());
    }

    let shaping = outcome.shaping();
    output.heading("Marker shaping");
    output.field("Standard dart rows", shaping.num_standard_shaping_rows);
    output.field("Rows between dart rows", opt(shaping.rows_between_standard_shaping_rows));
    output.field("Double dart rows", shaping.num_double_dart_shaping_rows);
    output.field("Triple dart rows", shaping.num_triple_dart_shaping_rows);
    output.field("Stitches shaped", shaping.stitches_shaped());
    output.field("Rows used", shaping.num_total_rows());
    print_status(&outcome, output);
    Ok(())
}

/// Text footer shared by the shaping solvers
pub(super) fn print_status<S>(outcome: &ShapingOutcome<S>, output: &Output) {
    match outcome {
        ShapingOutcome::Solved { vertical_play, .. } => {
            output.field("Constraints met", "yes");
            if let Some(play) = vertical_play {
                output.field("Vertical play", inches(*play));
            }
        }
        ShapingOutcome::Infeasible {
            best_larger_stitches,
            best_smaller_stitches,
            ..
        } => {
            output.field("Constraints met", "no");
            output.field("Best larger count", best_larger_stitches);
            output.field("Best smaller count", best_smaller_stitches);
        }
    }
}
