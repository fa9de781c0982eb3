//! Garment piece commands (armhole, armcap, sleeve, neckline)

use anyhow::{Context, Result};
use clap::Args;

use super::output::{inches, opt, Output};
use super::settings::{GaugeArgs, Settings};
use crate::domain::{
    calculate_armhole_shaping, compute_armcap_shaping, compute_armhole_circumference, make_neckline,
    plan_sleeve_shaping, NecklineRequest, NecklineShape, NecklineStyle, RepeatConstraint, RoundingDirection,
    SleeveConstruction, SleeveLength, SleeveRequest, SleeveShaping, SleeveStraights,
};

#[derive(Args, Debug)]
pub struct ArmholeArgs {
    /// Stitches to remove at one armhole edge
    #[arg(long)]
    pub stitches: u32,

    /// Armhole depth
    #[arg(long)]
    pub depth: f64,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

#[derive(Args, Debug)]
pub struct ArmcapArgs {
    /// Stitches removed at each armhole edge of the body
    #[arg(long)]
    pub armhole_stitches: u32,

    /// Armhole depth of the body
    #[arg(long)]
    pub armhole_depth: f64,

    /// Sleeve stitches at the bicep
    #[arg(long)]
    pub bicep: u32,

    /// Armhole edge over back and front; measured from the body when omitted
    #[arg(long)]
    pub circumference: Option<f64>,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

#[derive(Args, Debug)]
pub struct SleeveArgs {
    #[arg(long)]
    pub cast_ons: u32,

    #[arg(long)]
    pub bicep: u32,

    /// Cuff to the start of the cap (or the top, for drop shoulders)
    #[arg(long)]
    pub to_cap_height: f64,

    /// Height of the cuff edging
    #[arg(long, default_value = "1.0")]
    pub edging_height: f64,

    #[arg(long, value_enum, default_value = "set-in")]
    pub construction: SleeveConstruction,

    #[arg(long = "sleeve-length", value_enum, default_value = "full")]
    pub length: SleeveLength,

    /// Repeat the cast-ons must land on
    #[arg(long)]
    pub repeat: Option<u32>,

    #[arg(long, default_value = "0", requires = "repeat")]
    pub repeat_offset: u32,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

#[derive(Args, Debug)]
pub struct NecklineArgs {
    #[arg(value_enum)]
    pub style: NecklineStyle,

    /// Stitches the neckline removes
    #[arg(long)]
    pub stitches: u32,

    /// Neck depth goal
    #[arg(long)]
    pub depth: f64,

    /// Shoulder stitches each side (back necks only)
    #[arg(long, default_value = "0")]
    pub shoulder_stitches: u32,

    /// Rounding for the pickup estimate; defaults to the project setting
    #[arg(long, value_enum)]
    pub pickup_rounding: Option<RoundingDirection>,

    #[command(flatten)]
    pub gauge: GaugeArgs,
}

pub fn armhole(args: ArmholeArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let depth = settings.length(args.depth, "Depth")?;
    let max_pct = settings.limits().max_armhole_shaping_height_percentage;
    output.verbose_ctx("armhole", &format!("{} stitches, {} in deep, max {}", args.stitches, depth, max_pct));

    let shaping = calculate_armhole_shaping(args.stitches, depth, &gauge, max_pct)
        .context("Armhole shaping failed")?;
    let circumference = compute_armhole_circumference(&gauge, &shaping, depth);

    if output.is_json() {
        output.data(&serde_json::json!({
            "shaping": shaping,
            "shaping_rows": shaping.shaping_rows(),
            "shaping_height": shaping.shaping_height(&gauge),
            "circumference": circumference,
        }));
        return Ok(());
    }

    output.heading("Armhole shaping (each side)");
    output.field("First bind-off", shaping.x);
    output.field("Second bind-off", shaping.y);
    output.field("Decreases every other row", shaping.z);
    output.field("Shaping rows", shaping.shaping_rows());
    output.field("Shaping height", inches(shaping.shaping_height(&gauge)));
    output.field("Edge length", inches(circumference));
    Ok(())
}

pub fn armcap(args: ArmcapArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let depth = settings.length(args.armhole_depth, "Armhole depth")?;
    let limits = settings.limits();

    let armhole = calculate_armhole_shaping(args.armhole_stitches, depth, &gauge, limits.max_armhole_shaping_height_percentage)
        .context("Armhole shaping failed")?;
    let circumference = match args.circumference {
        Some(c) => settings.length(c, "Circumference")?,
        // back and front share the armhole shaping
        None => 2.0 * compute_armhole_circumference(&gauge, &armhole, depth),
    };
    output.verbose_ctx("armcap", &format!("armhole {:?}, circumference {:.3} in", armhole, circumference));

    let cap = compute_armcap_shaping(&gauge, &armhole, circumference, args.bicep, limits)
        .context("Sleeve cap shaping failed")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "cap": cap,
            "rows_in_cap": cap.rows_in_cap(),
            "cap_height": cap.cap_height(&gauge),
            "pre_bead_stitches": cap.pre_bead_stitches(),
            "post_bead_stitches": cap.post_bead_stitches(),
            "circumference": circumference,
        }));
        return Ok(());
    }

    output.heading("Sleeve cap");
    output.field("First bind-off (x)", cap.armscye_x);
    output.field("Second bind-off (y)", cap.armscye_y);
    output.field("Stitches after bind-offs", cap.pre_bead_stitches());
    output.field("Decreases every row", cap.beads.one);
    output.field("Decreases every 2nd row", cap.beads.two);
    output.field("Decreases every 4th row", cap.beads.four);
    output.field("Decreases every 6th row", cap.beads.six);
    output.field("Stitches after decreases", cap.post_bead_stitches());
    output.field("Final bind-offs each edge (d)", cap.armscye_d);
    output.field("Top bind-off (c)", cap.armscye_c);
    output.field("Rows in cap", cap.rows_in_cap());
    output.field("Cap height", inches(cap.cap_height(&gauge)));
    Ok(())
}

pub fn sleeve(args: SleeveArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let straights = settings
        .config
        .project
        .sleeve
        .apply(SleeveStraights::for_sleeve(args.construction, args.length));
    let request = SleeveRequest {
        construction: args.construction,
        cast_ons: args.cast_ons,
        bicep_stitches: args.bicep,
        to_cap_height: settings.length(args.to_cap_height, "Height to cap")?,
        edging_height: settings.length(args.edging_height, "Edging height")?,
        straights,
        cast_on_repeat: args.repeat.map(|modulus| RepeatConstraint::new(args.repeat_offset, modulus)),
    };
    output.verbose_ctx("sleeve", &format!("{:?}", request));

    let plan = plan_sleeve_shaping(&request, &gauge, settings.limits()).context("Sleeve shaping failed")?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "plan": plan,
            "bell": plan.is_bell(),
            "cast_ons_adjusted": plan.cast_ons_adjusted_from(&request),
        }));
        return Ok(());
    }

    output.heading("Sleeve shaping");
    output.field("Cast on", plan.cast_ons);
    if plan.cast_ons_adjusted_from(&request) {
        output.field("  (requested)", request.cast_ons);
    }
    output.field("Bicep", plan.bicep_stitches);
    output.field("Shaping", if plan.is_bell() { "decreases" } else { "increases" });
    output.field("Wrist edging", inches(plan.wrist_hem_height));
    match plan.shaping {
        SleeveShaping::Straight => output.field("Shaping rows", "none, work straight"),
        SleeveShaping::Edge(edge) => {
            output.field("Shaping rows", edge.num_standard_shaping_rows);
            output.field("Rows between shaping rows", opt(edge.rows_between_standard_shaping_rows));
        }
        SleeveShaping::Compound(compound) => {
            output.field("Standard shaping rows", compound.num_standard_shaping_rows);
            output.field("Rows after each standard row", opt(compound.rows_between_standard_shaping_rows));
            output.field("Alternate shaping rows", compound.num_alternate_shaping_rows);
            output.field("Rows after each alternate row", opt(compound.rows_after_alternate_shaping_rows));
        }
    }
    output.field("Height for shaping", inches(plan.shaping_distance));
    if let Some(play) = plan.vertical_play {
        output.field("Straight above shaping", inches(play));
    }
    Ok(())
}

pub fn neckline(args: NecklineArgs, settings: &Settings, output: &Output) -> Result<()> {
    let gauge = settings.gauge(&args.gauge)?;
    let request = NecklineRequest {
        stitches_goal: args.stitches,
        depth_goal: settings.length(args.depth, "Depth")?,
        pickup_rounding: args
            .pickup_rounding
            .unwrap_or(settings.config.project.neckline.pickup_rounding),
        shoulder_stitches: args.shoulder_stitches,
    };
    output.verbose_ctx("neckline", &format!("{} {:?}", args.style, request));

    let shape = make_neckline(args.style, &request, &gauge).context("Neckline failed")?;
    let summary = shape.summary();

    if output.is_json() {
        output.data(&serde_json::json!({
            "shape": shape,
            "summary": summary,
        }));
        return Ok(());
    }

    output.heading(&format!("{} neckline", summary.style));
    if summary.empty {
        output.field("Shaping", "none");
        return Ok(());
    }
    output.field("Stitches across", summary.stitches_across_neckline);
    output.field("Depth", opt(summary.total_depth.map(inches)));
    output.field("Depth above shaping", opt(summary.depth_to_shaping_end.map(inches)));
    output.field("Shaping rows (pullover)", summary.rows_in_pullover_shaping);
    if let (Some(rs), Some(ws)) = (summary.rows_in_cardigan_shaping_rs, summary.rows_in_cardigan_shaping_ws) {
        output.field("Shaping rows (cardigan, RS start)", rs);
        output.field("Shaping rows (cardigan, WS start)", ws);
    }
    output.field("Pick up", summary.pickup_stitches);
    if let NecklineShape::TurksAndCaicos(neck) = &shape {
        output.field("Lace stitches", neck.lace_stitches);
        output.field("Lace height (rows)", neck.lace_height_in_rows());
    }
    output.field("Area", format!("{:.2} sq in", summary.area));
    Ok(())
}
