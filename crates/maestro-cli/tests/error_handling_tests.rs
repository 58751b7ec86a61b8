//! Tests for error messages and exit codes.

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{add_site, created_project, maestro, project_root};

#[test]
fn test_no_subcommand_is_a_usage_error() {
    Command::cargo_bin("maestro").unwrap().assert().code(2);
}

#[test]
fn test_duplicate_project_is_rejected() {
    let dir = created_project();

    maestro(dir.path())
        .args(["project:create", "Other", "xyz789", "--type", "drupal"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_name_without_a_terminal() {
    let dir = project_root();

    maestro(dir.path())
        .arg("project:create")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing required value: NAME"));
    assert!(!dir.path().join("project/project.yml").exists());
}

#[test]
fn test_unknown_project_type() {
    let dir = project_root();

    maestro(dir.path())
        .args(["project:create", "Unity Sites", "abc123", "--type", "wordpress"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown project type 'wordpress'"));
}

#[test]
fn test_duplicate_site_is_rejected() {
    let dir = created_project();
    let root = dir.path();
    add_site(root, "NI Direct", "nidirect.gov.uk");

    maestro(root)
        .args(["site:add", "--name", "Again", "--url", "https://nidirect.gov.uk/"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "site ID 'nidirect_gov_uk' already exists",
        ));
}

#[test]
fn test_url_without_a_host_is_rejected() {
    let dir = created_project();
    let root = dir.path();

    maestro(root)
        .args(["site:add", "--name", "Dots", "--url", "..."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not produce a usable site ID"));
    assert!(!common::project_file(root).contains("name: Dots"));
}

#[test]
fn test_rename_onto_leftover_directory_is_refused() {
    let dir = created_project();
    let root = dir.path();
    add_site(root, "NI Direct", "nidirect.gov.uk");
    fs::create_dir_all(root.join("project/sites/nidirect_gov_uk")).unwrap();
    fs::create_dir_all(root.join("project/sites/nidirect_gov_uk_test")).unwrap();
    fs::write(root.join("project/sites/nidirect_gov_uk_test/keep.txt"), "keep").unwrap();

    maestro(root)
        .args(["site:edit", "nidirect_gov_uk", "--url", "nidirect.gov.uk.test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert!(common::project_file(root).contains("nidirect_gov_uk:"));
    assert!(root.join("project/sites/nidirect_gov_uk").is_dir());
    assert_eq!(
        fs::read_to_string(root.join("project/sites/nidirect_gov_uk_test/keep.txt")).unwrap(),
        "keep"
    );
}

#[test]
fn test_remove_unknown_site() {
    let dir = created_project();

    maestro(dir.path())
        .args(["site:remove", "nope_gov_uk"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_site_commands_need_a_project() {
    let dir = project_root();

    maestro(dir.path())
        .arg("project:info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("project file not found"));
}

#[test]
fn test_build_without_sites() {
    let dir = created_project();

    maestro(dir.path())
        .arg("project:build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not have any sites"));
    assert!(!dir.path().join(".lando.yml").exists());
}

#[test]
fn test_build_without_build_config() {
    let dir = created_project();
    let root = dir.path();
    add_site(root, "NI Direct", "nidirect.gov.uk");
    fs::remove_file(root.join("maestro.yml")).unwrap();

    maestro(root)
        .arg("project:build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("build configuration not found"));
}

#[test]
fn test_invalid_document_is_reported() {
    let dir = created_project();
    let root = dir.path();
    fs::write(
        root.join("project/project.yml"),
        "project_name: Unity Sites\nproject_id: abc123\n",
    )
    .unwrap();

    maestro(root)
        .arg("project:info")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn test_missing_config_file() {
    let dir = project_root();

    maestro(dir.path())
        .args(["--config", "does-not-exist.toml", "project:info"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    Command::cargo_bin("maestro")
        .unwrap()
        .args(["--quiet", "--verbose", "project:info"])
        .assert()
        .code(2);
}
