//! Configuration handling for knitshape
//!
//! Configuration is stored in `.knitshape/config.toml` (project) and
//! `~/.config/knitshape/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::gauge::{cm_to_inches, Gauge};
use crate::domain::{RoundingDirection, ShapingLimits, SleeveStraights};

/// Name of the project directory
pub const PROJECT_DIR: &str = ".knitshape";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Unit for lengths typed on the command line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Inches,
    /// Lengths in centimetres, gauge per 10 cm
    Cm,
}

impl Units {
    pub fn as_str(&self) -> &str {
        match self {
            Units::Inches => "inches",
            Units::Cm => "cm",
        }
    }

    /// Converts a length in these units to inches
    pub fn to_inches(&self, length: f64) -> f64 {
        match self {
            Units::Inches => length,
            Units::Cm => cm_to_inches(length),
        }
    }

    /// Builds a gauge from counts per inch, or per 10 cm for metric
    pub fn gauge(&self, stitches: f64, rows: f64) -> Result<Gauge> {
        let gauge = match self {
            Units::Inches => Gauge::new(stitches, rows),
            Units::Cm => Gauge::from_per_ten_cm(stitches, rows),
        };
        gauge.context("Invalid gauge")
    }
}

/// Default gauge for commands that are not given one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GaugeConfig {
    pub stitches: f64,
    pub rows: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct NecklineConfig {
    /// Rounding for pickup stitch estimates
    pub pickup_rounding: RoundingDirection,
}

/// Overrides for the plain knitting allowed below a sleeve cap, in inches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SleeveConfig {
    pub min_straight: Option<f64>,
    pub max_straight: Option<f64>,
}

impl SleeveConfig {
    pub fn apply(&self, straights: SleeveStraights) -> SleeveStraights {
        SleeveStraights {
            min: self.min_straight.unwrap_or(straights.min),
            max: self.max_straight.unwrap_or(straights.max),
        }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    pub gauge: Option<GaugeConfig>,

    pub units: Units,

    /// Overrides for the engine's craft limits
    pub limits: ShapingLimits,

    pub neckline: NecklineConfig,

    pub sleeve: SleeveConfig,
}

impl ProjectConfig {
    /// Rejects values the solvers cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.limits.first_invalid() {
            return Err(ConfigError::Invalid(format!(
                "limits.{} must be a positive number",
                name
            )));
        }
        if let Some(gauge) = self.gauge {
            self.units
                .gauge(gauge.stitches, gauge.rows)
                .map_err(|e| ConfigError::Invalid(format!("gauge: {:#}", e)))?;
        }
        if let (Some(min), Some(max)) = (self.sleeve.min_straight, self.sleeve.max_straight) {
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "sleeve.min_straight ({}) is above sleeve.max_straight ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// The configured default gauge, if any
    pub fn default_gauge(&self) -> Result<Option<Gauge>> {
        self.gauge
            .map(|gauge| self.units.gauge(gauge.stitches, gauge.rows))
            .transpose()
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "knitshape", "knitshape").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;
        config
            .validate()
            .with_context(|| format!("Bad project config: {}", config_path.display()))?;
        Ok(config)
    }

    /// Finds the project root by looking for a `.knitshape/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a knitshape project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert_eq!(config.project.units, Units::Inches);
        assert_eq!(config.project.gauge, None);
        assert_eq!(config.project.limits, ShapingLimits::default());
        assert_eq!(config.global.default_format, OutputFormat::Text);
        assert!(!config.is_in_project());
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
units = "cm"

[gauge]
stitches = 20.0
rows = 28.0

[limits]
max_inches_between_sleeve_shaping_rows = 4.0

[neckline]
pickup_rounding = "down"

[sleeve]
max_straight = 3.0
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.units, Units::Cm);
        assert_eq!(config.limits.max_inches_between_sleeve_shaping_rows, 4.0);
        assert_eq!(config.limits.max_armscye_y, 1.5);
        assert_eq!(config.neckline.pickup_rounding, RoundingDirection::Down);
        assert_eq!(config.sleeve.max_straight, Some(3.0));
        assert!(config.validate().is_ok());

        let gauge = config.default_gauge().unwrap().unwrap();
        assert!((gauge.stitches_per_inch - 5.08).abs() < 1e-9);
        assert!((gauge.rows_per_inch - 7.112).abs() < 1e-9);
    }

    #[test]
    fn invalid_limits_are_rejected() {
        let config: ProjectConfig = toml::from_str("[limits]\narmscye_c_ratio = 0.0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("armscye_c_ratio"));
    }

    #[test]
    fn invalid_gauge_is_rejected() {
        let config: ProjectConfig = toml::from_str("[gauge]\nstitches = 5.0\nrows = -1.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn sleeve_overrides() {
        let sleeve = SleeveConfig {
            min_straight: None,
            max_straight: Some(4.0),
        };
        let straights = sleeve.apply(SleeveStraights { min: 2.0, max: 2.5 });
        assert_eq!(straights, SleeveStraights { min: 2.0, max: 4.0 });

        let backwards = ProjectConfig {
            sleeve: SleeveConfig {
                min_straight: Some(3.0),
                max_straight: Some(1.0),
            },
            ..ProjectConfig::default()
        };
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"\n").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn units_convert_lengths() {
        assert_eq!(Units::Inches.to_inches(3.0), 3.0);
        assert!((Units::Cm.to_inches(2.54) - 1.0).abs() < 1e-12);
        assert_eq!(Units::Cm.as_str(), "cm");
    }

    #[test]
    fn find_project_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(PROJECT_DIR)).unwrap();

        // Change to a subdirectory
        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();
        std::env::set_current_dir(&sub_dir).unwrap();

        let root = Config::find_project_root();
        // Canonicalize both paths to handle macOS /var -> /private/var symlinks
        let expected = dir.path().canonicalize().ok();
        let actual = root.and_then(|p| p.canonicalize().ok());
        assert_eq!(actual, expected);

        // Reset current dir to avoid affecting other tests
        std::env::set_current_dir(dir.path()).unwrap();
    }
}
