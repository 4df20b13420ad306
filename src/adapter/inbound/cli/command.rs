//! Command-line interface definitions.
//!
//! Defines the CLI structure for the fadtrack application using `clap`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::config::Config;

/// Build cumulative FAD archives, activity views and map tracks
#[derive(Parser, Debug)]
#[command(name = "fadtrack")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the fadtrack CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge new batch files into the archive and rebuild every output
    Run(Box<RunArgs>),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `fadtrack config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that only take a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
///
/// All optional fields override the corresponding configuration file values.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for batch files.
    #[arg(long)]
    pub in_dir: Option<PathBuf>,

    /// File-name glob for batch files (e.g. "buoys*.csv").
    #[arg(long)]
    pub glob: Option<String>,

    /// Directory for the archive and derived outputs.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Deployment area polygon sheet.
    #[arg(long)]
    pub deployment_csv: Option<PathBuf>,

    /// Operational area polygon sheet.
    #[arg(long)]
    pub operational_csv: Option<PathBuf>,

    /// Days since the last fix for an entity to count as active.
    #[arg(long)]
    pub active_days: Option<u32>,

    /// Skip the GeoJSON layers.
    #[arg(long)]
    pub no_geojson: bool,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Batch files to process instead of discovering them.
    pub files: Vec<PathBuf>,
}

impl RunArgs {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.in_dir {
            config.input.dir = dir.clone();
        }
        if let Some(glob) = &self.glob {
            config.input.pattern = glob.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
        if let Some(path) = &self.deployment_csv {
            config.areas.deployment = path.clone();
        }
        if let Some(path) = &self.operational_csv {
            config.areas.operational = path.clone();
        }
        if let Some(days) = self.active_days {
            config.activity.active_days = days;
        }
        if self.no_geojson {
            config.output.geojson = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.format = "json".into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_factory_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name_and_version() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "fadtrack");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["fadtrack", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.config.is_none());
        assert!(args.files.is_empty());
        assert!(!args.no_geojson);
        assert!(!cli.json);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "fadtrack",
            "run",
            "-c",
            "fadtrack.toml",
            "--in-dir",
            "exports",
            "--glob",
            "fad_*.csv",
            "--out-dir",
            "maps",
            "--active-days",
            "3",
            "--no-geojson",
            "--json-logs",
            "a.csv",
            "b.csv",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(args.config, Some(PathBuf::from("fadtrack.toml")));
        assert_eq!(args.files, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(config.input.dir, PathBuf::from("exports"));
        assert_eq!(config.input.pattern, "fad_*.csv");
        assert_eq!(config.output.dir, PathBuf::from("maps"));
        assert_eq!(config.activity.active_days, 3);
        assert!(!config.output.geojson);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_negative_active_days_rejected() {
        let result = Cli::try_parse_from(["fadtrack", "run", "--active-days", "-2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fadtrack", "run", "--json", "-vv", "--color", "never"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn test_parse_config_subcommands() {
        let cli = Cli::try_parse_from(["fadtrack", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Show(ConfigPathArg { config: None }))
        ));

        let cli =
            Cli::try_parse_from(["fadtrack", "config", "validate", "-c", "x.toml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Validate(ConfigPathArg { config: Some(_) }))
        ));
    }
}
