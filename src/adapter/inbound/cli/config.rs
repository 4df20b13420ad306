//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute `config show`.
pub fn execute_show(path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "config": config,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    match path {
        Some(path) => output::field("Source", path.display()),
        None => output::field("Source", "built-in defaults"),
    }

    output::section("Input");
    output::field("Directory", config.input.dir.display());
    output::field("Pattern", &config.input.pattern);

    output::section("Areas");
    output::field("Deployment", config.deployment_path().display());
    output::field("Operational", config.operational_path().display());

    output::section("Output");
    output::field("Directory", config.output.dir.display());
    output::field("GeoJSON", config.output.geojson);

    output::section("Activity");
    output::field("Active days", config.activity.active_days);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    if output::verbosity() > 0 {
        output::section("TOML");
        output::lines(&config.to_toml()?);
    }
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: Option<&Path>) -> Result<()> {
    Config::load_or_default(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "path": path.map(|p| p.display().to_string()),
        }));
        return Ok(());
    }

    output::success("Configuration is valid");
    if let Some(path) = path {
        output::field("Path", path.display());
    } else {
        output::hint("no --config given; built-in defaults were checked");
    }
    Ok(())
}
