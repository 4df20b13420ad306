//! CLI module graph and dispatch.

pub mod command;
pub mod config;
pub mod diagnostic;
pub mod output;
pub mod run;

use std::path::Path;

use command::{Cli, Commands, ConfigCommand};
use output::OutputConfig;

use crate::error::Result;

impl Cli {
    /// Config file named on the command line, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        match &self.command {
            Commands::Run(args) => args.config.as_deref(),
            Commands::Config(ConfigCommand::Show(arg) | ConfigCommand::Validate(arg)) => {
                arg.config.as_deref()
            }
        }
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(args),
        Commands::Config(ConfigCommand::Show(arg)) => config::execute_show(arg.config.as_deref()),
        Commands::Config(ConfigCommand::Validate(arg)) => {
            config::execute_validate(arg.config.as_deref())
        }
    }
}

/// Run a parsed command line, returning the process exit code.
pub fn execute(cli: &Cli) -> i32 {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    output::configure_color(cli.color);

    match dispatch(cli) {
        Ok(()) => 0,
        Err(e) => {
            diagnostic::emit(&e, cli.config_path());
            e.exit_code()
        }
    }
}
