//! Multi-size plans
//!
//! A plan names a set of sizes and the shaping each size needs. Every
//! (size, request) pair is solved on its own, so the pairs run in parallel;
//! results come back in the order the plan lists them.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::armcap::{compute_armcap_shaping, BeadGameResult};
use super::armhole::{calculate_armhole_shaping, compute_armhole_circumference, ArmholeShaping};
use super::compound::{compute_compound_edge_shaping, CompoundEdgeShapingResult};
use super::edge::{compute_edge_shaping, EdgeShapingOptions, EdgeShapingResult};
use super::gauge::Gauge;
use super::limits::ShapingLimits;
use super::marker::{compute_marker_shaping, MarkerShapingOptions, TorsoShapingResult};
use super::neckline::{make_neckline, NecklineRequest, NecklineShape, NecklineStyle, NecklineSummary};
use super::rounding::{find_best_approximation, RepeatConstraint, RoundingDirection};
use super::shaping::check_counts;
use super::sleeve::{plan_sleeve_shaping, SleeveConstruction, SleeveLength, SleevePlan, SleeveRequest, SleeveStraights};

/// Length tolerance for approximations that do not give one, in inches
pub const DEFAULT_APPROXIMATION_TOLERANCE: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("Plan has no sizes")]
    NoSizes,

    #[error("Size '{0}' has no gauge and the plan sets none")]
    MissingGauge(String),

    #[error("Size '{0}' appears more than once")]
    DuplicateSize(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub name: Option<String>,
    /// Shared by every size that does not set its own
    #[serde(default)]
    pub gauge: Option<Gauge>,
    pub sizes: Vec<PlanSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSize {
    pub name: String,
    #[serde(default)]
    pub gauge: Option<Gauge>,
    #[serde(default)]
    pub requests: Vec<LabeledRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRequest {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(flatten)]
    pub request: ShapingRequest,
}

fn default_tolerance() -> f64 {
    DEFAULT_APPROXIMATION_TOLERANCE
}

/// Which gauge rate an approximation converts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CountKind {
    #[default]
    Stitches,
    Rows,
}

impl CountKind {
    pub fn rate(&self, gauge: &Gauge) -> f64 {
        match self {
            CountKind::Stitches => gauge.stitches_per_inch,
            CountKind::Rows => gauge.rows_per_inch,
        }
    }
}

/// One solver invocation; lengths are in inches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapingRequest {
    Approximate {
        length: f64,
        #[serde(default)]
        count: CountKind,
        #[serde(default)]
        direction: RoundingDirection,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
        #[serde(default)]
        repeat: Option<RepeatConstraint>,
    },
    Edge {
        larger: u32,
        smaller: u32,
        height: f64,
        #[serde(default)]
        even_spacing: bool,
        #[serde(default)]
        max_distance: Option<f64>,
    },
    Compound {
        larger: u32,
        smaller: u32,
        height: f64,
    },
    Marker {
        larger: u32,
        smaller: u32,
        height: f64,
        #[serde(default)]
        graded: bool,
    },
    Armhole {
        stitches: u32,
        depth: f64,
    },
    /// Solves the armhole first, then the cap for a sleeve of `bicep` stitches
    Armcap {
        armhole_stitches: u32,
        armhole_depth: f64,
        bicep: u32,
    },
    Sleeve {
        #[serde(default)]
        construction: SleeveConstruction,
        #[serde(default)]
        length: SleeveLength,
        cast_ons: u32,
        bicep: u32,
        to_cap_height: f64,
        edging_height: f64,
        #[serde(default)]
        cast_on_repeat: Option<RepeatConstraint>,
    },
    Neckline {
        style: NecklineStyle,
        #[serde(flatten)]
        request: NecklineRequest,
    },
}

impl ShapingRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ShapingRequest::Approximate { .. } => "approximate",
            ShapingRequest::Edge { .. } => "edge",
            ShapingRequest::Compound { .. } => "compound",
            ShapingRequest::Marker { .. } => "marker",
            ShapingRequest::Armhole { .. } => "armhole",
            ShapingRequest::Armcap { .. } => "armcap",
            ShapingRequest::Sleeve { .. } => "sleeve",
            ShapingRequest::Neckline { .. } => "neckline",
        }
    }

    /// Runs the request. Bad inputs come back as messages, never panics.
    pub fn solve(&self, gauge: &Gauge, limits: &ShapingLimits) -> Result<Solution, String> {
        let solution = match *self {
            ShapingRequest::Approximate {
                length,
                count,
                direction,
                tolerance,
                repeat,
            } => {
                let count = find_best_approximation(length, count.rate(gauge), direction, tolerance, repeat)
                    .map_err(|e| e.to_string())?;
                Solution::Approximate { count }
            }
            ShapingRequest::Edge {
                larger,
                smaller,
                height,
                even_spacing,
                max_distance,
            } => {
                check_counts(larger, smaller).map_err(|e| e.to_string())?;
                check_height(height)?;
                let options = EdgeShapingOptions {
                    even_spacing,
                    max_distance_between_shaping_rows: max_distance,
                };
                Solution::Edge(compute_edge_shaping(larger, smaller, height, gauge, &options))
            }
            ShapingRequest::Compound {
                larger,
                smaller,
                height,
            } => {
                check_counts(larger, smaller).map_err(|e| e.to_string())?;
                check_height(height)?;
                Solution::Compound(compute_compound_edge_shaping(larger, smaller, height, gauge))
            }
            ShapingRequest::Marker {
                larger,
                smaller,
                height,
                graded,
            } => {
                check_counts(larger, smaller).map_err(|e| e.to_string())?;
                check_height(height)?;
                let base = if graded {
                    MarkerShapingOptions::graded()
                } else {
                    MarkerShapingOptions::default()
                };
                let options = MarkerShapingOptions {
                    max_distance_between_shaping_rows: limits.max_inches_between_body_shaping_rows,
                    ..base
                };
                Solution::Marker(compute_marker_shaping(larger, smaller, height, gauge, &options))
            }
            ShapingRequest::Armhole { stitches, depth } => {
                let shaping = calculate_armhole_shaping(stitches, depth, gauge, limits.max_armhole_shaping_height_percentage)
                    .map_err(|e| e.to_string())?;
                Solution::Armhole {
                    shaping,
                    circumference: compute_armhole_circumference(gauge, &shaping, depth),
                }
            }
            ShapingRequest::Armcap {
                armhole_stitches,
                armhole_depth,
                bicep,
            } => {
                let armhole = calculate_armhole_shaping(
                    armhole_stitches,
                    armhole_depth,
                    gauge,
                    limits.max_armhole_shaping_height_percentage,
                )
                .map_err(|e| e.to_string())?;
                // back and front share the armhole shaping
                let circumference = 2.0 * compute_armhole_circumference(gauge, &armhole, armhole_depth);
                let cap = compute_armcap_shaping(gauge, &armhole, circumference, bicep, limits)
                    .map_err(|e| e.to_string())?;
                Solution::Armcap(cap)
            }
            ShapingRequest::Sleeve {
                construction,
                length,
                cast_ons,
                bicep,
                to_cap_height,
                edging_height,
                cast_on_repeat,
            } => {
                check_height(to_cap_height)?;
                let request = SleeveRequest {
                    construction,
                    cast_ons,
                    bicep_stitches: bicep,
                    to_cap_height,
                    edging_height,
                    straights: SleeveStraights::for_sleeve(construction, length),
                    cast_on_repeat,
                };
                Solution::Sleeve(plan_sleeve_shaping(&request, gauge, limits).map_err(|e| e.to_string())?)
            }
            ShapingRequest::Neckline { style, request } => {
                let shape = make_neckline(style, &request, gauge).map_err(|e| e.to_string())?;
                let summary = shape.summary();
                Solution::Neckline { shape, summary }
            }
        };
        Ok(solution)
    }
}

fn check_height(height: f64) -> Result<(), String> {
    if height >= 0.0 && height.is_finite() {
        Ok(())
    } else {
        Err(format!("Height must be zero or more inches, got {}", height))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Solution {
    Approximate { count: u32 },
    Edge(EdgeShapingResult),
    Compound(CompoundEdgeShapingResult),
    Marker(TorsoShapingResult),
    Armhole { shaping: ArmholeShaping, circumference: f64 },
    Armcap(BeadGameResult),
    Sleeve(SleevePlan),
    Neckline { shape: NecklineShape, summary: NecklineSummary },
}

impl Solution {
    /// False for shaping that ran out of rows
    pub fn constraints_met(&self) -> bool {
        match self {
            Solution::Edge(outcome) => outcome.constraints_met(),
            Solution::Compound(outcome) => outcome.constraints_met(),
            Solution::Marker(outcome) => outcome.constraints_met(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub size: String,
    pub label: String,
    #[serde(flatten)]
    pub result: EntryResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryResult {
    Ok { solution: Solution },
    Error { message: String },
}

/// Solves every request of every size.
///
/// A request that fails does not stop the others; its entry carries the
/// error message instead.
#[tracing::instrument(level = "debug", skip_all, fields(sizes = plan.sizes.len()))]
pub fn evaluate_plan(plan: &Plan, limits: &ShapingLimits) -> Result<Vec<PlanEntry>, PlanError> {
    if plan.sizes.is_empty() {
        return Err(PlanError::NoSizes);
    }

    let mut jobs = Vec::new();
    for (index, size) in plan.sizes.iter().enumerate() {
        if plan.sizes[..index].iter().any(|earlier| earlier.name == size.name) {
            return Err(PlanError::DuplicateSize(size.name.clone()));
        }
        let gauge = size
            .gauge
            .or(plan.gauge)
            .ok_or_else(|| PlanError::MissingGauge(size.name.clone()))?;
        for (position, labeled) in size.requests.iter().enumerate() {
            let label = labeled
                .label
                .clone()
                .unwrap_or_else(|| format!("{}-{}", labeled.request.kind(), position + 1));
            jobs.push((size.name.as_str(), label, gauge, &labeled.request));
        }
    }
    tracing::debug!(jobs = jobs.len(), "evaluating plan");

    let entries = jobs
        .into_par_iter()
        .map(|(size, label, gauge, request)| {
            // plan files can carry any numbers, so the gauge is checked here
            let result = Gauge::new(gauge.stitches_per_inch, gauge.rows_per_inch)
                .map_err(|e| e.to_string())
                .and_then(|gauge| request.solve(&gauge, limits));
            let result = match result {
                Ok(solution) => EntryResult::Ok { solution },
                Err(message) => {
                    tracing::debug!(size, %label, %message, "request failed");
                    EntryResult::Error { message }
                }
            };
            PlanEntry {
                size: size.to_string(),
                label,
                result,
            }
        })
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> Gauge {
        Gauge::new(5.0, 7.0).unwrap()
    }

    fn size(name: &str, requests: Vec<ShapingRequest>) -> PlanSize {
        PlanSize {
            name: name.to_string(),
            gauge: None,
            requests: requests
                .into_iter()
                .map(|request| LabeledRequest { label: None, request })
                .collect(),
        }
    }

    fn edge(larger: u32, smaller: u32, height: f64) -> ShapingRequest {
        ShapingRequest::Edge {
            larger,
            smaller,
            height,
            even_spacing: false,
            max_distance: None,
        }
    }

    #[test]
    fn entries_keep_plan_order() {
        let plan = Plan {
            name: None,
            gauge: Some(gauge()),
            sizes: vec![
                size("S", vec![edge(60, 40, 10.0), edge(50, 40, 5.0)]),
                size("M", vec![edge(70, 50, 10.0)]),
            ],
        };
        let entries = evaluate_plan(&plan, &ShapingLimits::default()).unwrap();

        let names: Vec<_> = entries.iter().map(|e| (e.size.as_str(), e.label.as_str())).collect();
        assert_eq!(names, vec![("S", "edge-1"), ("S", "edge-2"), ("M", "edge-1")]);
        for entry in &entries {
            match &entry.result {
                EntryResult::Ok { solution } => assert!(solution.constraints_met()),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn bad_request_does_not_stop_the_rest() {
        let plan = Plan {
            name: None,
            gauge: Some(gauge()),
            sizes: vec![size("S", vec![edge(61, 40, 10.0), edge(60, 40, 10.0)])],
        };
        let entries = evaluate_plan(&plan, &ShapingLimits::default()).unwrap();

        assert!(matches!(&entries[0].result, EntryResult::Error { message } if message.contains("odd")));
        assert!(matches!(&entries[1].result, EntryResult::Ok { .. }));
    }

    #[test]
    fn size_gauge_overrides_plan_gauge() {
        let mut small = size(
            "S",
            vec![ShapingRequest::Approximate {
                length: 10.0,
                count: CountKind::Stitches,
                direction: RoundingDirection::Nearest,
                tolerance: 0.5,
                repeat: None,
            }],
        );
        small.gauge = Some(Gauge::new(4.0, 6.0).unwrap());
        let plan = Plan {
            name: None,
            gauge: Some(gauge()),
            sizes: vec![small],
        };
        let entries = evaluate_plan(&plan, &ShapingLimits::default()).unwrap();
        assert_eq!(
            entries[0].result,
            EntryResult::Ok {
                solution: Solution::Approximate { count: 40 }
            }
        );
    }

    #[test]
    fn plan_level_errors() {
        let limits = ShapingLimits::default();
        let empty = Plan {
            name: None,
            gauge: None,
            sizes: vec![],
        };
        assert_eq!(evaluate_plan(&empty, &limits).unwrap_err(), PlanError::NoSizes);

        let no_gauge = Plan {
            name: None,
            gauge: None,
            sizes: vec![size("S", vec![])],
        };
        assert_eq!(
            evaluate_plan(&no_gauge, &limits).unwrap_err(),
            PlanError::MissingGauge("S".to_string())
        );

        let twice = Plan {
            name: None,
            gauge: Some(gauge()),
            sizes: vec![size("S", vec![]), size("S", vec![])],
        };
        assert_eq!(
            evaluate_plan(&twice, &limits).unwrap_err(),
            PlanError::DuplicateSize("S".to_string())
        );
    }

    #[test]
    fn requests_parse_from_tagged_json() {
        let json = r#"{
            "gauge": { "stitches_per_inch": 5.0, "rows_per_inch": 7.0 },
            "sizes": [{
                "name": "S",
                "requests": [
                    { "kind": "neckline", "label": "front", "style": "crew", "stitches_goal": 30, "depth_goal": 3.0 },
                    { "kind": "armhole", "stitches": 10, "depth": 8.0 }
                ]
            }]
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        let entries = evaluate_plan(&plan, &ShapingLimits::default()).unwrap();

        assert_eq!(entries[0].label, "front");
        match &entries[0].result {
            EntryResult::Ok {
                solution: Solution::Neckline { summary, .. },
            } => assert_eq!(summary.pickup_stitches, 51),
            other => panic!("unexpected {:?}", other),
        }
        match &entries[1].result {
            EntryResult::Ok {
                solution: Solution::Armhole { shaping, .. },
            } => assert_eq!((shaping.x, shaping.y, shaping.z), (4, 2, 4)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(entries[1].label, "armhole-2");
    }
}
