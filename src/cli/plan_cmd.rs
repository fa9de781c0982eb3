//! Multi-size plan evaluation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::output::{opt, Output};
use super::settings::Settings;
use crate::domain::plan::EntryResult;
use crate::domain::{evaluate_plan, PlanEntry, ShapingOutcome, SleeveShaping, Solution};
use crate::storage::{load_plan, Project};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plan file (.toml, .yaml or .json); bare names are also looked up in .knitshape/plans/
    pub file: PathBuf,
}

pub fn run(args: PlanArgs, settings: &Settings, output: &Output) -> Result<()> {
    let path = match Project::open_current() {
        Ok(project) => project.resolve_plan(&args.file),
        Err(_) => args.file.clone(),
    };
    output.verbose_ctx("plan", &format!("Loading plan from: {}", path.display()));

    let mut plan = load_plan(&path)?;
    if plan.gauge.is_none() {
        // sizes without a gauge fall back to the project gauge
        plan.gauge = settings.config.project.default_gauge()?;
    }
    let entries = evaluate_plan(&plan, settings.limits()).context("Cannot evaluate plan")?;
    output.verbose_ctx("plan", &format!("Solved {} requests", entries.len()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": plan.name,
            "entries": entries,
        }));
        return Ok(());
    }

    if let Some(name) = &plan.name {
        println!("Plan: {}", name);
    }
    println!("{:<10} {:<16} {:<12} RESULT", "SIZE", "LABEL", "KIND");
    println!("{}", "-".repeat(70));
    for entry in &entries {
        println!("{:<10} {:<16} {}", entry.size, entry.label, describe(entry));
    }
    let failed = entries
        .iter()
        .filter(|e| !matches!(&e.result, EntryResult::Ok { solution } if solution.constraints_met()))
        .count();
    output.blank();
    println!("{} request(s), {} need attention", entries.len(), failed);
    Ok(())
}

/// One-line text summary of an entry
fn describe(entry: &PlanEntry) -> String {
    let solution = match &entry.result {
        EntryResult::Ok { solution } => solution,
        EntryResult::Error { message } => return format!("{:<12} error: {}", "-", message),
    };
    let (kind, text) = match solution {
        Solution::Approximate { count } => ("approximate", count.to_string()),
        Solution::Edge(outcome) => {
            let s = outcome.shaping();
            (
                "edge",
                format!(
                    "{} rows, {} between{}",
                    s.num_standard_shaping_rows,
                    opt(s.rows_between_standard_shaping_rows),
                    status(outcome)
                ),
            )
        }
        Solution::Compound(outcome) => {
            let s = outcome.shaping();
            (
                "compound",
                format!(
                    "{}+{} rows, {}/{} between{}",
                    s.num_standard_shaping_rows,
                    s.num_alternate_shaping_rows,
                    opt(s.rows_between_standard_shaping_rows),
                    opt(s.rows_after_alternate_shaping_rows),
                    status(outcome)
                ),
            )
        }
        Solution::Marker(outcome) => {
            let s = outcome.shaping();
            (
                "marker",
                format!(
                    "{} std, {} double, {} triple{}",
                    s.num_standard_shaping_rows,
                    s.num_double_dart_shaping_rows,
                    s.num_triple_dart_shaping_rows,
                    status(outcome)
                ),
            )
        }
        Solution::Armhole { shaping, .. } => ("armhole", format!("{}/{}/{}", shaping.x, shaping.y, shaping.z)),
        Solution::Armcap(cap) => (
            "armcap",
            format!(
                "x {} y {} c {} d {} e {}, {} rows",
                cap.armscye_x,
                cap.armscye_y,
                cap.armscye_c,
                cap.armscye_d,
                cap.armscye_e,
                cap.rows_in_cap()
            ),
        ),
        Solution::Sleeve(plan) => {
            let shaping = match plan.shaping {
                SleeveShaping::Straight => "straight".to_string(),
                SleeveShaping::Edge(edge) => format!("edge {} rows", edge.num_standard_shaping_rows),
                SleeveShaping::Compound(c) => {
                    format!("compound {}+{} rows", c.num_standard_shaping_rows, c.num_alternate_shaping_rows)
                }
            };
            ("sleeve", format!("cast on {}, {}", plan.cast_ons, shaping))
        }
        Solution::Neckline { shape, summary } => (
            "neckline",
            format!(
                "{}, {} rows, pick up {}",
                shape.as_neckline().style(),
                summary.rows_in_pullover_shaping,
                summary.pickup_stitches
            ),
        ),
    };
    format!("{:<12} {}", kind, text)
}

fn status<S>(outcome: &ShapingOutcome<S>) -> String {
    match outcome {
        ShapingOutcome::Solved { .. } => String::new(),
        ShapingOutcome::Infeasible {
            best_larger_stitches,
            best_smaller_stitches,
            ..
        } => format!(" (infeasible, best {}/{})", best_larger_stitches, best_smaller_stitches),
    }
}
