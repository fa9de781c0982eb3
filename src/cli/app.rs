//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::calc_cmd::{self, ButtonsArgs, GaugeCalcArgs, PickupArgs, PlacerArgs};
use super::garment_cmd::{self, ArmcapArgs, ArmholeArgs, NecklineArgs, SleeveArgs};
use super::logging::init_tracing;
use super::output::{Output, OutputFormat};
use super::plan_cmd::{self, PlanArgs};
use super::settings::Settings;
use super::shaping_cmd::{self, ApproximateArgs, EdgeArgs, MarkerArgs, ShapingArgs};
use crate::storage::{Config, Project, Units};

#[derive(Parser)]
#[command(name = "knitshape")]
#[command(author, version, about = "Row-by-row knitting shaping from measurements and gauge")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Units for lengths and gauge (defaults to the project config)
    #[arg(long, global = true, value_enum)]
    pub units: Option<Units>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new knitshape project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Convert a length to a stitch or row count
    Approximate(ApproximateArgs),

    /// Edge shaping at one rate
    Edge(EdgeArgs),

    /// Edge shaping with up to two interleaved rates
    Compound(ShapingArgs),

    /// Dart shaping with markers
    Marker(MarkerArgs),

    /// Armhole bind-offs and decreases
    Armhole(ArmholeArgs),

    /// Sleeve cap shaping for an armhole
    Armcap(ArmcapArgs),

    /// Sleeve shaping from cuff to cap
    Sleeve(SleeveArgs),

    /// Neckline shaping and pickup
    Neckline(NecklineArgs),

    /// Place shaping rows evenly within a row count
    Placer(PlacerArgs),

    /// Space buttonholes along a band
    Buttons(ButtonsArgs),

    /// Stitches to pick up along an edge
    Pickup(PickupArgs),

    /// Solve for length, count or gauge given the other two
    Gauge(GaugeCalcArgs),

    /// Solve every request in a multi-size plan file
    Plan(PlanArgs),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli.format.unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("knitshape starting");
    if let Some(root) = &config.project_root {
        output.verbose_ctx("config", &format!("Project at: {}", root.display()));
    }
    let settings = Settings::new(config, cli.units);
    output.verbose_ctx("config", &format!("Units: {}", settings.units.as_str()));

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx("init", &format!("Created directory at: {}", project.project_dir().display()));
            output.success(&format!("Initialized knitshape project at {}", project.root().display()));
        }

        Commands::Approximate(args) => shaping_cmd::approximate(args, &settings, &output)?,
        Commands::Edge(args) => shaping_cmd::edge(args, &settings, &output)?,
        Commands::Compound(args) => shaping_cmd::compound(args, &settings, &output)?,
        Commands::Marker(args) => shaping_cmd::marker(args, &settings, &output)?,

        Commands::Armhole(args) => garment_cmd::armhole(args, &settings, &output)?,
        Commands::Armcap(args) => garment_cmd::armcap(args, &settings, &output)?,
        Commands::Sleeve(args) => garment_cmd::sleeve(args, &settings, &output)?,
        Commands::Neckline(args) => garment_cmd::neckline(args, &settings, &output)?,

        Commands::Placer(args) => calc_cmd::placer(args, &output)?,
        Commands::Buttons(args) => calc_cmd::buttons(args, &output)?,
        Commands::Pickup(args) => calc_cmd::pickup(args, &settings, &output)?,
        Commands::Gauge(args) => calc_cmd::gauge(args, &settings, &output)?,

        Commands::Plan(args) => plan_cmd::run(args, &settings, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
