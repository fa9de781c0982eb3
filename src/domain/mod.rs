//! Shaping solvers and the value types they work on
//!
//! Pure computation; nothing in here touches the filesystem or the terminal.

pub mod armcap;
pub mod armhole;
pub mod compound;
pub mod edge;
pub mod gauge;
pub mod limits;
pub mod marker;
pub mod neckline;
pub mod pickup;
pub mod placer;
pub mod plan;
pub mod rounding;
pub mod shaping;
pub mod sleeve;
pub mod spacing;

pub use armcap::{compute_armcap_shaping, ArmcapShapingError, BeadCounts, BeadGameResult};
pub use armhole::{calculate_armhole_shaping, compute_armhole_circumference, ArmholeShaping, ArmholeShapingError};
pub use compound::{compute_compound_edge_shaping, CompoundEdgeShaping, CompoundEdgeShapingResult};
pub use edge::{compute_edge_shaping, compute_edge_shaping_in_rows, EdgeShaping, EdgeShapingOptions, EdgeShapingResult};
pub use gauge::{solve_gauge, Gauge, GaugeError, GaugeSolution, RowParity};
pub use limits::ShapingLimits;
pub use marker::{compute_marker_shaping, MarkerShapingOptions, TorsoShaping, TorsoShapingResult};
pub use neckline::{make_neckline, Neckline, NecklineError, NecklineRequest, NecklineShape, NecklineStyle, NecklineSummary};
pub use pickup::{estimate_pickup, PickupEdge, PickupError, PickupEstimate};
pub use placer::{place_shaping, PlacementError, ShapingDirection, ShapingPlacement};
pub use plan::{evaluate_plan, Plan, PlanEntry, PlanError, ShapingRequest, Solution};
pub use rounding::{find_best_approximation, round_to, ApproximationError, RepeatConstraint, RoundingDirection};
pub use shaping::{check_counts, CountError, ShapingOutcome};
pub use sleeve::{plan_sleeve_shaping, SleeveConstruction, SleeveError, SleeveLength, SleevePlan, SleeveRequest, SleeveShaping, SleeveStraights};
pub use spacing::{compute_button_spacing, ButtonSpacing, SpacingError};
