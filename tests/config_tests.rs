use std::fs;
use std::path::PathBuf;

use fadtrack::error::{ConfigError, Error};
use fadtrack::infrastructure::config::settings::Config;

fn write_temp_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("fadtrack.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn config_loads_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[input]
dir = "exports"
pattern = "fad_*.csv"

[areas]
deployment = "zones/deploy.csv"
operational = "/srv/zones/ops.csv"

[output]
dir = "maps"
geojson = false

[activity]
active_days = 14

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.input.dir, PathBuf::from("exports"));
    assert_eq!(config.input.pattern, "fad_*.csv");
    assert_eq!(
        config.deployment_path(),
        PathBuf::from("exports/zones/deploy.csv")
    );
    assert_eq!(config.operational_path(), PathBuf::from("/srv/zones/ops.csv"));
    assert_eq!(config.output.dir, PathBuf::from("maps"));
    assert!(!config.output.geojson);
    assert_eq!(config.activity.active_days, 14);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn config_rejects_invalid_log_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[logging]\nformat = \"xml\"\n");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid format error, got {err}"),
        Ok(config) => panic!(
            "Expected format to be rejected, got {}",
            config.logging.format
        ),
    }
}

#[test]
fn config_rejects_empty_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[output]\ndir = \"\"\n");

    let result = Config::load(&path);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingField { field: "output.dir" }))
    ));
}

#[test]
fn config_rejects_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[input\npattern = 3\n");

    let result = Config::load(&path);
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn config_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn config_defaults_when_no_file_given() {
    let config = Config::load_or_default(None).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.input.dir, PathBuf::from("."));
    assert_eq!(
        config.operational_path(),
        PathBuf::from("./operational-area.csv")
    );
}
