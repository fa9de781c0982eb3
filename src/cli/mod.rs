//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Shaping | Stitch counts and shaping schedules | `approximate`, `edge`, `compound`, `marker` |
//! | Garment | Piece-specific shaping | `armhole`, `armcap`, `sleeve`, `neckline` |
//! | Calculators | Standalone helpers | `placer`, `buttons`, `pickup`, `gauge` |
//! | Plans | Several sizes at once | `plan` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output and solver traces on stderr:
//! ```bash
//! knitshape --verbose edge --from 40 --to 60 --height 10 -s 5 -r 7
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod calc_cmd;
mod garment_cmd;
mod logging;
mod output;
mod plan_cmd;
mod settings;
mod shaping_cmd;

pub use app::{run, Cli, Commands};
pub use logging::init_tracing;
pub use output::{Output, OutputFormat};
