//! End-to-end runs of the `aforo` binary against a Latin-1 export
//!
//! Each run points XDG_CONFIG_HOME at a temp dir so the user's own
//! config never leaks in.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("aforos_latin1.csv")
}

fn aforo(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aforo"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run aforo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn reshape_defaults_to_latin1() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let out = aforo(home.path(), &["reshape", input.to_str().unwrap()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "entity_id,period,category,count");
    assert!(lines.contains(&"Toll-5,2024-03-01,Automobile,1500"));
    assert!(lines.contains(&"Toll-5,2024-03-01,Bus 2 axles,12"));
    assert!(lines.contains(&"Toll-7,2023-12-01,Truck 2 axles,2"));
    // zero, empty and nan cells are dropped
    assert!(!text.contains("Toll-5,2024-03-01,Motorcycle"));
    assert!(!text.contains("Toll-5,2024-04-01,Truck 2 axles"));
    assert!(!text.contains("Toll-5,2024-05-01,Motorcycle"));
}

#[test]
fn reshape_year_to_file() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let target = home.path().join("tidy.csv");
    let out = aforo(
        home.path(),
        &[
            "reshape",
            input.to_str().unwrap(),
            "--year",
            "2023",
            "-o",
            target.to_str().unwrap(),
        ],
    );
    assert!(out.status.success());

    let written = std::fs::read_to_string(&target).unwrap();
    assert_eq!(
        written,
        "entity_id,period,category,count\n\
         Toll-7,2023-12-01,Automobile,900\n\
         Toll-7,2023-12-01,Motorcycle,5\n\
         Toll-7,2023-12-01,Bus 2 axles,6\n\
         Toll-7,2023-12-01,Truck 2 axles,2\n"
    );
}

#[test]
fn wrong_encoding_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let out = aforo(home.path(), &["reshape", input.to_str().unwrap(), "--encoding", "utf8"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
}

#[test]
fn missing_data_path_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let out = aforo(home.path(), &["summary"]);
    assert!(!out.status.success());
}

#[test]
fn columns_as_json() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let out = aforo(home.path(), &["columns", input.to_str().unwrap(), "--format", "json"]);
    assert!(out.status.success());

    let view: Value = serde_json::from_str(&stdout(&out)).unwrap();
    let resolved = view["resolved"].as_array().unwrap();
    assert!(resolved.contains(&serde_json::json!({
        "field": "Bus 2 axles",
        "column": "AUTOBUS",
        "source": "exact"
    })));
    assert!(resolved.contains(&serde_json::json!({
        "field": "YEAR",
        "column": "AÑO",
        "source": "exact"
    })));
    let unresolved = view["unresolved"].as_array().unwrap();
    assert!(unresolved.contains(&Value::from("Tricycle")));
}

#[test]
fn summary_for_one_year() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let out = aforo(
        home.path(),
        &["summary", input.to_str().unwrap(), "--year", "2024", "--format", "json"],
    );
    assert!(out.status.success());

    let view: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(view["year"], 2024);
    assert_eq!(view["totals"][0]["category"], "Automobile");
    assert_eq!(view["totals"][0]["total"], 4800.0);
    assert_eq!(view["extremes"]["busiest"]["category"], "Automobile");
    assert_eq!(view["by_entity"], serde_json::json!([{"entity_id": "Toll-5", "total": 4842.0}]));
    assert_eq!(view["quality"]["skipped_rows"].as_array().unwrap().len(), 1);
    assert_eq!(view["quality"]["skipped_rows"][0]["row"], 4);
}

#[test]
fn forecast_on_one_month_is_unavailable() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let out = aforo(
        home.path(),
        &["forecast", input.to_str().unwrap(), "--year", "2023", "--format", "json"],
    );
    assert!(out.status.success());

    let view: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(view["forecast"]["status"], "unavailable");
    assert_eq!(view["history"].as_array().unwrap().len(), 1);
}

#[test]
fn export_writes_xlsx() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();
    let target = home.path().join("aforo.xlsx");
    let out = aforo(
        home.path(),
        &["export", input.to_str().unwrap(), "-o", target.to_str().unwrap()],
    );
    assert!(out.status.success());
    assert!(target.exists());
}

#[test]
fn config_set_and_show() {
    let home = tempfile::tempdir().unwrap();
    let input = fixture();

    let out = aforo(
        home.path(),
        &["config", "--set-data", input.to_str().unwrap(), "--set-horizon", "6"],
    );
    assert!(out.status.success());
    assert!(home.path().join("aforo").join("config.json").exists());

    let out = aforo(home.path(), &["config", "--show"]);
    assert!(stdout(&out).contains("6 months"));

    // the stored data path is used when no input is given
    let out = aforo(home.path(), &["forecast", "--format", "json"]);
    assert!(out.status.success());
    let view: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(view["horizon"], 6);
}

#[test]
fn catalogue_dump_is_loadable() {
    let home = tempfile::tempdir().unwrap();
    let target = home.path().join("catalogue.toml");
    let out = aforo(home.path(), &["catalogue", "-o", target.to_str().unwrap()]);
    assert!(out.status.success());

    let input = fixture();
    let out = aforo(
        home.path(),
        &[
            "columns",
            input.to_str().unwrap(),
            "--catalogue",
            target.to_str().unwrap(),
            "--format",
            "json",
        ],
    );
    assert!(out.status.success());
}
