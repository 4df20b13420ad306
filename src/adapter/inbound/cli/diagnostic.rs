//! Miette-based error diagnostics for CLI error presentation.
//!
//! Fatal errors are converted into diagnostics with help text, and TOML
//! syntax errors point into the offending configuration file.

use std::fs;
use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::output;
use crate::error::{ConfigError, Error};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(fadtrack::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

/// Any other fatal run error.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(fadtrack::run))]
pub struct RunDiagnostic {
    pub message: String,

    #[help]
    pub help: Option<String>,
}

fn help_for(err: &Error) -> Option<String> {
    match err {
        Error::NoInputFiles { .. } => Some(
            "point --in-dir and --glob at the batch exports, or pass the files explicitly"
                .to_string(),
        ),
        Error::Config(ConfigError::InvalidValue { field, .. })
        | Error::Config(ConfigError::MissingField { field }) => {
            Some(format!("set `{field}` in the config file or on the command line"))
        }
        Error::Config(ConfigError::ReadFile(_)) => {
            Some("omit --config to run with built-in defaults".to_string())
        }
        _ => None,
    }
}

/// Build the diagnostic for `err`, reading `config_path` for TOML spans.
#[must_use]
pub fn diagnose(err: &Error, config_path: Option<&Path>) -> miette::Report {
    if let (Error::Config(ConfigError::Parse(parse)), Some(path)) = (err, config_path) {
        if let (Some(span), Ok(src)) = (parse.span(), fs::read_to_string(path)) {
            return miette::Report::new(ConfigDiagnostic {
                message: format!("failed to parse config: {}", parse.message()),
                src: NamedSource::new(path.display().to_string(), src),
                span: (span.start, span.end.saturating_sub(span.start)).into(),
                help: Some("see `fadtrack config show` for the expected layout".to_string()),
            });
        }
    }

    miette::Report::new(RunDiagnostic {
        message: err.to_string(),
        help: help_for(err),
    })
}

/// Print a fatal error: a JSON error line in `--json` mode, a diagnostic otherwise.
pub fn emit(err: &Error, config_path: Option<&Path>) {
    if output::is_json() {
        output::error(&err.to_string());
        return;
    }
    eprintln!("{:?}", diagnose(err, config_path));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_files_suggests_flags() {
        let err = Error::NoInputFiles {
            pattern: "./buoys*.csv".into(),
        };
        let report = diagnose(&err, None);
        assert_eq!(report.to_string(), "no FAD CSV files match: ./buoys*.csv");
        let help = report.help().map(|h| h.to_string()).unwrap();
        assert!(help.contains("--in-dir"));
    }

    #[test]
    fn parse_errors_point_into_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fadtrack.toml");
        let text = "[activity]\nactive_days = \"soon\"\n";
        fs::write(&path, text).unwrap();
        let parse = toml::from_str::<crate::infrastructure::config::Config>(text).unwrap_err();
        let err = Error::Config(ConfigError::Parse(parse));

        let report = diagnose(&err, Some(&path));

        assert!(report.to_string().starts_with("failed to parse config"));
        assert!(report.labels().is_some());
        assert!(report.source_code().is_some());
    }

    #[test]
    fn missing_field_names_the_setting() {
        let err = Error::Config(ConfigError::MissingField {
            field: "input.pattern",
        });
        let report = diagnose(&err, None);
        let help = report.help().map(|h| h.to_string()).unwrap();
        assert!(help.contains("input.pattern"));
    }
}
