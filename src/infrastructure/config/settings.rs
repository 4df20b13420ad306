//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Every section is optional in the TOML file; command-line flags are
//! applied on top before validation.
//!
//! # Example
//!
//! ```no_run
//! use fadtrack::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("fadtrack.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::adapter::outbound::discovery::compile_pattern;
use crate::application::RunOptions;
use crate::error::{ConfigError, Result};

/// Where batch exports are found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for batch files.
    pub dir: PathBuf,
    /// File-name glob matched inside `dir`.
    pub pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            pattern: "buoys*.csv".into(),
        }
    }
}

/// Area polygon sheets. Relative paths resolve against `input.dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreasConfig {
    pub deployment: PathBuf,
    pub operational: PathBuf,
}

impl Default for AreasConfig {
    fn default() -> Self {
        Self {
            deployment: PathBuf::from("deployment-area.csv"),
            operational: PathBuf::from("operational-area.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the archive and every derived output.
    pub dir: PathBuf,
    /// Also write the GeoJSON layers.
    pub geojson: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("fad_tracks_output"),
            geojson: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// An entity is active when seen within this many days of the run.
    pub active_days: u32,
}

impl ActivityConfig {
    /// Longest accepted window, one century.
    pub const MAX_ACTIVE_DAYS: u32 = 36_500;
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self { active_days: 7 }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub areas: AreasConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub activity: ActivityConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` when given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values.
    ///
    /// Called again after command-line overrides are applied.
    pub fn validate(&self) -> Result<()> {
        if self.input.pattern.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "input.pattern",
            }
            .into());
        }
        compile_pattern(&self.input.pattern)?;

        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField { field: "output.dir" }.into());
        }
        if self.areas.deployment.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "areas.deployment",
            }
            .into());
        }
        if self.areas.operational.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "areas.operational",
            }
            .into());
        }

        if self.activity.active_days > ActivityConfig::MAX_ACTIVE_DAYS {
            return Err(ConfigError::InvalidValue {
                field: "activity.active_days",
                reason: format!(
                    "{} exceeds the maximum of {} days",
                    self.activity.active_days,
                    ActivityConfig::MAX_ACTIVE_DAYS
                ),
            }
            .into());
        }

        self.logging.validate()?;
        Ok(())
    }

    /// Deployment sheet path, resolved against the input directory.
    #[must_use]
    pub fn deployment_path(&self) -> PathBuf {
        self.input.dir.join(&self.areas.deployment)
    }

    /// Operational sheet path, resolved against the input directory.
    #[must_use]
    pub fn operational_path(&self) -> PathBuf {
        self.input.dir.join(&self.areas.operational)
    }

    /// Options for one run over `inputs` (empty to discover) ending at `now`.
    #[must_use]
    pub fn run_options(&self, inputs: Vec<PathBuf>, now: NaiveDateTime) -> RunOptions {
        RunOptions {
            inputs,
            input_dir: self.input.dir.clone(),
            pattern: self.input.pattern.clone(),
            deployment_csv: self.deployment_path(),
            operational_csv: self.operational_path(),
            out_dir: self.output.dir.clone(),
            active_days: self.activity.active_days,
            geojson: self.output.geojson,
            now,
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
