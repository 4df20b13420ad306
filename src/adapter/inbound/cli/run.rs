//! Handler for the `run` command.

use chrono::Local;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::tabular::archive::format_timestamp;
use crate::application::{Pipeline, RunReport};
use crate::domain::LastSeen;
use crate::error::Result;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct InactiveRow {
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

impl From<&LastSeen> for InactiveRow {
    fn from(entry: &LastSeen) -> Self {
        Self {
            entity: entry.entity_id.to_string(),
            last_seen: format_timestamp(&entry.last_seen),
        }
    }
}

/// Execute the run command.
pub fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);
    if output::is_quiet() && args.log_level.is_none() {
        config.logging.level = "warn".into();
    }
    if output::is_json() {
        config.logging.format = "json".into();
    }
    config.validate()?;
    config.init_logging();

    let options = config.run_options(args.files.clone(), Local::now().naive_local());
    let report = Pipeline::standard(&options).run(&options)?;

    print_report(&report);
    Ok(())
}

/// Print the run summary using Astral-style output.
fn print_report(report: &RunReport) {
    if output::is_json() {
        output::json_output(json!({
            "command": "run",
            "report": report,
        }));
        return;
    }

    output::header(env!("CARGO_PKG_VERSION"));

    output::section("Input");
    output::field("Files", report.files.len());
    if output::verbosity() > 0 {
        for file in &report.files {
            output::note(&file.display().to_string());
        }
    }
    output::field("Rows", report.rows_read);
    output::field("Dropped", report.rows_dropped);

    output::section("Archive");
    output::field("Path", report.archive_path.display());
    output::field("Outcome", report.archive.as_str());
    output::field("Records", report.total_records);
    output::field("In area", report.in_area_records);
    for area in &report.areas {
        let state = if area.available { "loaded" } else { "unavailable" };
        output::field(&format!("{} area", area.kind), state);
    }

    output::section("Activity");
    output::field("Cutoff", format_timestamp(&report.cutoff));
    output::field("Active", report.active.len());
    output::field("Inactive", report.inactive.len());
    if !report.inactive.is_empty() && !output::is_quiet() {
        let rows: Vec<InactiveRow> = report.inactive.iter().map(InactiveRow::from).collect();
        output::lines(&Table::new(rows).to_string());
    }

    output::section("Outputs");
    for path in &report.outputs {
        output::success(&path.display().to_string());
    }

    for warning in &report.warnings {
        output::warning(&warning.to_string());
    }
}
