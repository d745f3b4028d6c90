//! Command line smoke tests against the mock backend

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run from an empty directory so no stray configuration is picked up
fn forge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("admin-forge").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("ADMIN_FORGE_CONFIG")
        .env_remove("ADMIN_FORGE_API_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("describe"));
}

#[test]
fn test_nav() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .arg("nav")
        .assert()
        .success()
        .stdout(predicate::str::contains("Categories"))
        .stdout(predicate::str::contains("/modules/:moduleId/lessons"));
}

#[test]
fn test_nav_json() {
    let dir = TempDir::new().unwrap();
    let output = forge(&dir).args(["nav", "--json"]).output().unwrap();
    assert!(output.status.success());

    let nav: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = nav.as_array().unwrap();
    assert_eq!(items.len(), 9);
    assert_eq!(items[0]["key"], "categories");
}

#[test]
fn test_list_categories() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["list", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Livres"))
        .stdout(predicate::str::contains("4 of 4 categories"));
}

#[test]
fn test_list_with_filter() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["list", "routes", "--filter", "active=false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paris - Lille"))
        .stdout(predicate::str::contains("Paris - Lyon").not());
}

#[test]
fn test_nested_list_needs_parent() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["list", "lessons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parent"));

    forge(&dir)
        .args(["list", "lessons", "--parent", "module-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Avant le départ"))
        .stdout(predicate::str::contains("Accueil des passagers").not());
}

#[test]
fn test_create_category() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["create", "categories", "--data", r#"{"name":"Jouets","slug":"jouets"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Categories created"))
        .stdout(predicate::str::contains("\"Jouets\""));
}

#[test]
fn test_create_invalid_category() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["create", "categories", "--data", r#"{"name":"J","slug":"Bad Slug"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid data"));
}

#[test]
fn test_booking_create_disabled() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["create", "bookings", "--data", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("create is disabled for Bookings"));
}

#[test]
fn test_delete_unknown_record() {
    let dir = TempDir::new().unwrap();
    forge(&dir)
        .args(["delete", "drivers", "driver-99"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("driver-99"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_file_page_size() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("admin-forge.toml"), "[ui]\npage_size = 2\n").unwrap();
    forge(&dir)
        .args(["list", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 4 categories (2 page(s))"));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[backend]\nmode = \"carrier-pigeon\"\n").unwrap();
    forge(&dir)
        .args(["--config", path.to_str().unwrap(), "nav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn test_describe_json() {
    let dir = TempDir::new().unwrap();
    let output = forge(&dir).args(["describe", "lessons", "--json"]).output().unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["queryKey"], "lessons");
    assert_eq!(doc["parent"]["key"], "moduleId");
    let form: Vec<_> = doc["formFields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(form, vec!["title", "durationMinutes", "content"]);
}
