//! End-to-end tests for the `rtn` binary.
//!
//! Each test writes a catalog, a dataset and an empty config location to a
//! temp directory and drives the binary as a user would.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const CATALOG_TOML: &str = r#"
[[routines]]
id = "stale-orders"
name = "Stale orders"
category = "Purchasing"
columns = ["orderId", "plant", "orderDate"]
sort = [{ columnId = "orderDate", direction = "desc" }]

[[routines.filters]]
columnId = "orderDate"
condition = "lessThan"
dateExpression = "1 month ago"

[[routines.filters]]
columnId = "status"
values = ["open", "late"]

[[scopes]]
id = "plant-a"
name = "Plant A"
assignedUsers = ["ana"]
filters = [{ columnId = "plant", values = ["A"] }]
"#;

const BROKEN_CATALOG_JSON: &str = r#"{"routines": [{
    "id": "broken",
    "name": "Broken",
    "filters": [{"columnId": "orderDate", "dateExpression": "someday"}]
}]}"#;

const ROWS_JSON: &str = r#"[
    {"orderId": 1, "plant": "A", "status": "open",   "orderDate": "2024-04-02"},
    {"orderId": 2, "plant": "B", "status": "late",   "orderDate": "2024-05-10"},
    {"orderId": 3, "plant": "A", "status": "closed", "orderDate": "2024-03-15"},
    {"orderId": 4, "plant": "A", "status": "late",   "orderDate": "2024-06-01"}
]"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("catalog.toml"), CATALOG_TOML).unwrap();
        fs::write(dir.path().join("broken.json"), BROKEN_CATALOG_JSON).unwrap();
        fs::write(dir.path().join("rows.json"), ROWS_JSON).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn rtn(&self, catalog: Option<&str>, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rtn"));
        cmd.env("RTN_CONFIG", self.path("config.toml"))
            .env_remove("RTN_CATALOG")
            .env_remove("RTN_LOG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .current_dir(self.dir.path());
        if let Some(catalog) = catalog {
            cmd.arg("--catalog").arg(self.path(catalog));
        }
        cmd.args(args).output().expect("failed to run rtn")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn test_list_prints_routines_and_scopes() {
    let fx = Fixture::new();
    let output = fx.rtn(Some("catalog.toml"), &["list"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("stale-orders"));
    assert!(text.contains("plant-a"));
    assert!(text.contains("@ana"));
}

#[test]
fn test_list_json_routines_only() {
    let fx = Fixture::new();
    let output = fx.rtn(Some("catalog.toml"), &["--json", "list", "--routines"]);

    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["routines"][0]["id"], "stale-orders");
    assert_eq!(value["routines"][0]["filterCount"], 2);
    assert!(value.get("scopes").is_none());
}

#[test]
fn test_preview_counts_and_sorts_rows() {
    let fx = Fixture::new();
    let output = fx.rtn(
        Some("catalog.toml"),
        &["--json", "preview", "stale-orders", "--data", "rows.json", "--anchor", "2024-06-15"],
    );

    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["count"], 2);
    assert_eq!(value["anchor"], "2024-06-15");
    // Default sort is orderDate descending.
    assert_eq!(value["rows"][0]["orderId"], 2.0);
    assert_eq!(value["rows"][1]["orderId"], 1.0);
}

#[test]
fn test_preview_table_output() {
    let fx = Fixture::new();
    let output = fx.rtn(
        Some("catalog.toml"),
        &["preview", "plant-a", "--data", "rows.json", "--limit", "2"],
    );

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Plant A: 3 rows found\n"));
    assert!(text.contains("... 1 more row"));
}

#[test]
fn test_preview_unknown_id_suggests() {
    let fx = Fixture::new();
    let output = fx.rtn(
        Some("catalog.toml"),
        &["preview", "stale-order", "--data", "rows.json"],
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did you mean 'stale-orders'?"));
}

#[test]
fn test_missing_catalog_is_config_error() {
    let fx = Fixture::new();
    let output = fx.rtn(None, &["--json", "list"]);

    assert_eq!(output.status.code(), Some(5));
    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn test_catalog_from_config_file() {
    let fx = Fixture::new();
    write(
        &fx.path("config.toml"),
        &format!("catalog = {:?}\n", fx.path("catalog.toml").display().to_string()),
    );

    let output = fx.rtn(None, &["--json", "list", "--scopes"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["scopes"][0]["id"], "plant-a");
}

#[test]
fn test_customize_without_edits_applies_template() {
    let fx = Fixture::new();
    let output = fx.rtn(
        Some("catalog.toml"),
        &["--json", "customize", "stale-orders", "--anchor", "2024-06-15"],
    );

    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["action"], "applyTemplate");
    assert_eq!(value["sourceId"], "stale-orders");
}

#[test]
fn test_customize_reordered_filters_still_apply_template() {
    let fx = Fixture::new();
    write(
        &fx.path("edited.json"),
        r#"[
            {"columnId": "status", "values": ["open", "late"]},
            {"columnId": "orderDate", "condition": "lessThan", "dateExpression": "1 month ago"}
        ]"#,
    );

    let output = fx.rtn(
        Some("catalog.toml"),
        &["--json", "customize", "stale-orders", "--filters", "edited.json", "--anchor", "2024-06-15"],
    );

    assert!(output.status.success());
    assert_eq!(json(&output)["action"], "applyTemplate");
}

#[test]
fn test_customize_new_sort_saves_custom_routine() {
    let fx = Fixture::new();
    let output = fx.rtn(
        Some("catalog.toml"),
        &[
            "--json",
            "customize",
            "stale-orders",
            "--sort",
            "plant:asc",
            "--data",
            "rows.json",
            "--anchor",
            "2024-06-15",
            "--name",
            "My stale orders",
        ],
    );

    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["action"], "saveCustom");
    assert_eq!(value["basedOn"], "stale-orders");
    assert_eq!(value["count"], 2);
    assert_eq!(value["routine"]["name"], "My stale orders");
    assert_eq!(value["routine"]["sort"][0]["columnId"], "plant");
    assert_eq!(value["routine"]["filters"].as_array().unwrap().len(), 2);
}

#[test]
fn test_validate_clean_catalog() {
    let fx = Fixture::new();
    let output = fx.rtn(Some("catalog.toml"), &["validate"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("no filter problems"));
}

#[test]
fn test_validate_reports_problems() {
    let fx = Fixture::new();
    let output = fx.rtn(Some("broken.json"), &["--json", "validate"]);

    assert_eq!(output.status.code(), Some(1));
    let value = json(&output);
    assert_eq!(value["valid"], false);
    assert_eq!(value["issues"][0]["id"], "broken");
}

#[test]
fn test_config_init_then_set() {
    let fx = Fixture::new();

    let init = fx.rtn(None, &["config", "init"]);
    assert!(init.status.success());
    assert!(fx.path("config.toml").exists());

    let set = fx.rtn(None, &["config", "set", "preview.limit", "1"]);
    assert!(set.status.success());

    let show = fx.rtn(None, &["--json", "config", "show"]);
    assert_eq!(json(&show)["config"]["preview"]["limit"], 1);

    let preview = fx.rtn(
        Some("catalog.toml"),
        &["preview", "plant-a", "--data", "rows.json"],
    );
    assert!(stdout(&preview).contains("... 2 more rows"));
}

#[test]
fn test_config_path_honors_env() {
    let fx = Fixture::new();
    let output = fx.rtn(None, &["config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        fx.path("config.toml").display().to_string()
    );
}
