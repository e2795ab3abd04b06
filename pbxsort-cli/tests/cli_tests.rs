use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const UNSORTED: &str = include_str!("../../pbxsort-core/tests/fixtures/unsorted.pbxproj");

/// `pbxsort` running in `dir`, isolated from the user's config and colours.
fn pbxsort(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pbxsort"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn add_project(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let bundle = dir.path().join(format!("{name}.xcodeproj"));
    fs::create_dir_all(&bundle).expect("create bundle");
    let path = bundle.join("project.pbxproj");
    fs::write(&path, text).expect("write pbxproj");
    path
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8")
}

// ---------------------------------------------------------------------------
// sort
// ---------------------------------------------------------------------------

#[test]
fn sort_rewrites_then_reports_already_sorted() {
    let dir = TempDir::new().expect("tmp");
    let path = add_project(&dir, "Demo", UNSORTED);

    pbxsort(dir.path())
        .arg("sort")
        .assert()
        .success()
        .stdout(contains("✎  Demo.xcodeproj/project.pbxproj"))
        .stdout(contains("4 section(s) reordered"))
        .stdout(contains("has no fileRef"));
    let sorted = fs::read_to_string(&path).expect("read");
    assert_ne!(sorted, UNSORTED);

    pbxsort(dir.path())
        .arg("sort")
        .assert()
        .success()
        .stdout(contains("already sorted"));
    assert_eq!(fs::read_to_string(&path).expect("read"), sorted);
}

#[test]
fn sort_dry_run_leaves_file_untouched() {
    let dir = TempDir::new().expect("tmp");
    let path = add_project(&dir, "Demo", UNSORTED);

    pbxsort(dir.path())
        .args(["sort", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry-run] ~  Demo.xcodeproj/project.pbxproj"));
    assert_eq!(fs::read_to_string(&path).expect("read"), UNSORTED);
}

#[test]
fn sort_continues_past_a_broken_project_and_fails() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Broken", "// !$*UTF8*$!\n{\n}\n");
    let good = add_project(&dir, "Good", UNSORTED);

    pbxsort(dir.path())
        .arg("sort")
        .assert()
        .failure()
        .stderr(contains("Broken.xcodeproj/project.pbxproj"))
        .stderr(contains("section PBXGroup not found"))
        .stderr(contains("1 of 2 project(s) could not be sorted"));
    assert_ne!(fs::read_to_string(&good).expect("read"), UNSORTED);
}

#[test]
fn sort_accepts_an_explicit_project_file() {
    let dir = TempDir::new().expect("tmp");
    let path = add_project(&dir, "Demo", UNSORTED);

    pbxsort(dir.path())
        .args(["sort", "Demo.xcodeproj/project.pbxproj"])
        .assert()
        .success();
    assert_ne!(fs::read_to_string(&path).expect("read"), UNSORTED);
}

#[test]
fn sort_finds_nested_projects_only_when_recursive() {
    let dir = TempDir::new().expect("tmp");
    fs::create_dir_all(dir.path().join("ios")).expect("mkdir");
    let bundle = dir.path().join("ios/App.xcodeproj");
    fs::create_dir_all(&bundle).expect("mkdir");
    fs::write(bundle.join("project.pbxproj"), UNSORTED).expect("write");

    pbxsort(dir.path())
        .arg("sort")
        .assert()
        .success()
        .stdout(contains("No Xcode projects found"));

    pbxsort(dir.path())
        .args(["sort", "--recursive"])
        .assert()
        .success()
        .stdout(contains("ios/App.xcodeproj/project.pbxproj"));
}

#[test]
fn local_config_limits_sections() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);
    fs::write(dir.path().join(".pbxsort.yaml"), "sections: [build_file]\n").expect("config");

    pbxsort(dir.path())
        .arg("sort")
        .assert()
        .success()
        .stdout(contains("1 section(s) reordered"));
}

#[test]
fn invalid_explicit_config_is_an_error() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);
    fs::write(dir.path().join("bad.yaml"), "sections: nope\n").expect("config");

    pbxsort(dir.path())
        .args(["sort", "--config", "bad.yaml"])
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
}

#[test]
fn verbose_flag_enables_debug_logs() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);

    pbxsort(dir.path())
        .args(["-vv", "sort", "--dry-run"])
        .assert()
        .success()
        .stderr(contains("derived canonical order"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_fails_until_sorted() {
    let dir = TempDir::new().expect("tmp");
    let path = add_project(&dir, "Demo", UNSORTED);

    pbxsort(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(contains("UNSORTED"))
        .stdout(contains("PBXBuildFile"))
        .stdout(contains("1 projects | 0 sorted | 1 unsorted | 0 failed"));
    assert_eq!(fs::read_to_string(&path).expect("read"), UNSORTED);

    pbxsort(dir.path()).arg("sort").assert().success();

    pbxsort(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(contains("SORTED"))
        .stdout(contains("UNSORTED").not());
}

#[test]
fn check_json_reports_sections_and_diagnostics() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);

    let assert = pbxsort(dir.path()).args(["check", "--json"]).assert().failure();
    let json: serde_json::Value = serde_json::from_str(&stdout_of(&assert)).expect("json");

    assert_eq!(json["summary"]["projects"], 1);
    assert_eq!(json["summary"]["unsorted"], 1);
    let project = &json["projects"][0];
    assert_eq!(project["name"], "Demo");
    assert_eq!(project["status"], "unsorted");
    assert_eq!(project["sections"][0], "build_file");
    assert_eq!(project["diagnostics"].as_array().map(Vec::len), Some(1));
    assert!(project.get("error").is_none());
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

#[test]
fn diff_shows_unified_diff_without_writing() {
    let dir = TempDir::new().expect("tmp");
    let path = add_project(&dir, "Demo", UNSORTED);

    let assert = pbxsort(dir.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("--- a/Demo.xcodeproj/project.pbxproj"))
        .stdout(contains("+++ b/Demo.xcodeproj/project.pbxproj"));
    let stdout = stdout_of(&assert);
    assert!(stdout.lines().any(|l| l.starts_with('+') && l.contains("AppDelegate.m")));
    assert_eq!(fs::read_to_string(&path).expect("read"), UNSORTED);

    pbxsort(dir.path()).arg("sort").assert().success();
    pbxsort(dir.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("No differences."));
}

// ---------------------------------------------------------------------------
// order
// ---------------------------------------------------------------------------

#[test]
fn order_prints_indented_tree() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);

    let assert = pbxsort(dir.path())
        .args(["order", "Demo.xcodeproj"])
        .assert()
        .success();
    let lines: Vec<String> = stdout_of(&assert).lines().map(str::to_string).collect();
    assert_eq!(lines[0], "(unnamed)  GR0000000000000000000001");
    assert_eq!(lines[1], "  Demo  GR0000000000000000000002");
    assert_eq!(lines[2], "    AppDelegate.h  FR0000000000000000000003");
    assert_eq!(
        lines[3],
        "    AppDelegate.m  FR0000000000000000000004  build BF0000000000000000000004"
    );
    assert_eq!(lines.len(), 13);
}

#[test]
fn order_json_is_a_nested_tree() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);

    let assert = pbxsort(dir.path())
        .args(["order", "--json", "Demo.xcodeproj/project.pbxproj"])
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_str(&stdout_of(&assert)).expect("json");
    assert_eq!(json[0]["children"][2]["name"], "Products");
    assert_eq!(json[0]["children"][2]["children"][0]["name"], "Demo.app");
}

#[test]
fn order_rejects_ambiguous_directory() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "One", UNSORTED);
    add_project(&dir, "Two", UNSORTED);

    pbxsort(dir.path())
        .args(["order", "."])
        .assert()
        .failure()
        .stderr(contains("holds 2 projects"));
}

#[test]
fn order_honours_local_config_exclusions() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);
    add_project(&dir, "Legacy", UNSORTED);
    fs::write(dir.path().join(".pbxsort.yaml"), "exclude: [Legacy.xcodeproj]\n").expect("config");

    pbxsort(dir.path())
        .args(["order", "."])
        .assert()
        .success()
        .stdout(contains("Demo  GR0000000000000000000002"));
}

#[test]
fn order_rejects_invalid_explicit_config() {
    let dir = TempDir::new().expect("tmp");
    add_project(&dir, "Demo", UNSORTED);
    fs::write(dir.path().join("bad.yaml"), "sections: nope\n").expect("config");

    pbxsort(dir.path())
        .args(["order", "--config", "bad.yaml", "Demo.xcodeproj"])
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
}
