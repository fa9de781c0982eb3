//! Project management
//!
//! Handles project initialization and locating plan files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::PROJECT_DIR;
use super::Config;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a knitshape project. Run 'knitshape init' first.")]
    NotInProject,
}

const DEFAULT_CONFIG: &str = r#"# knitshape configuration

# Lengths on the command line: "inches", or "cm" (gauge then counts per 10 cm)
units = "inches"

# Default gauge for commands run without --stitch-gauge/--row-gauge
# [gauge]
# stitches = 5.0
# rows = 7.0

[neckline]
# Rounding for pickup estimates: up, down, nearest
pickup_rounding = "nearest"

# Overrides for the engine's craft limits
# [limits]
# max_armhole_shaping_height_percentage = 0.35
# max_inches_between_body_shaping_rows = 2.0
# max_inches_between_sleeve_shaping_rows = 5.0
# minimum_wrist_edging_height = 0.5

# Plain knitting below the sleeve cap, in inches
# [sleeve]
# min_straight = 2.0
# max_straight = 2.5
"#;

/// A knitshape project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path. Existing files are kept.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let project_dir = root.join(PROJECT_DIR);

        let plans_dir = project_dir.join("plans");
        fs::create_dir_all(&plans_dir)
            .with_context(|| format!("Failed to create plans directory: {}", plans_dir.display()))?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = project_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "# Plan results written by scripts\nplans/*.out.json\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .knitshape directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the plans directory
    pub fn plans_dir(&self) -> PathBuf {
        self.project_dir().join("plans")
    }

    /// Resolves a plan name: an existing path wins, then the plans directory
    pub fn resolve_plan(&self, name: &Path) -> PathBuf {
        if name.exists() {
            return name.to_path_buf();
        }
        let in_plans = self.plans_dir().join(name);
        if in_plans.exists() {
            in_plans
        } else {
            name.to_path_buf()
        }
    }
}
