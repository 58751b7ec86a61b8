//! Shared fixtures for the CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

/// A project root with a build config and a Lando-enabled hosting package.
pub fn project_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("composer.json"), "{}\n").unwrap();
    fs::write(root.join("maestro.yml"), "hosting: {}\n").unwrap();

    let templates = root.join("vendor/dof-dss/maestro-hosting/resources/drupal/Lando/templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join(".lando.base.yml"),
        "recipe: drupal9\nconfig:\n  webroot: web\n",
    )
    .unwrap();
    fs::write(templates.join(".env.sample"), "DB_HOST=database\nHASH_SALT=\n").unwrap();

    dir
}

/// `maestro` pointed at `root`, isolated from the user's config.
pub fn maestro(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("maestro").unwrap();
    cmd.env("XDG_CONFIG_HOME", root.join(".config"))
        .env("HOME", root)
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root)
        .args(["--output-format", "plain"]);
    cmd
}

/// A root that already holds a `drupal` project.
pub fn created_project() -> TempDir {
    let dir = project_root();
    maestro(dir.path())
        .args(["project:create", "Unity Sites", "abc123", "--type", "drupal"])
        .assert()
        .success();
    dir
}

pub fn add_site(root: &Path, name: &str, url: &str) {
    maestro(root)
        .args(["site:add", "--name", name, "--url", url])
        .assert()
        .success();
}

pub fn project_file(root: &Path) -> String {
    fs::read_to_string(root.join("project/project.yml")).unwrap()
}
