//! # Storage Layer
//!
//! Project directory, configuration, and plan files.
//!
//! ## Project Structure
//!
//! ```text
//! .knitshape/
//! ├── config.toml           # Project configuration
//! ├── plans/                # Multi-size plan files (toml, yaml, json)
//! └── .gitignore
//! ```
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for a knitshape project
//! - [`Config`] - Project and global configuration
//! - [`load_plan`] - Reads a plan file in any supported format

mod config;
mod plan;
mod project;

pub use config::{Config, ConfigError, GaugeConfig, GlobalConfig, OutputFormat, ProjectConfig, Units, PROJECT_DIR};
pub use plan::{load_plan, PlanFileError, PlanFormat};
pub use project::{Project, ProjectError};
