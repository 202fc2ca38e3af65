//! CLI Integration Tests
//!
//! Runs the dirmarker binary against temporary trees.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Command with colors off and a config file that does not exist
fn dirmarker(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dirmarker").unwrap();
    cmd.env_remove("DIRMARKER_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never")
        .arg("--config")
        .arg(config_dir.join("missing.toml"));
    cmd
}

fn project(root: &Path) {
    fs::write(root.join(".gitignore"), "node_modules/\nbuild/\n.cache/\n").unwrap();
    fs::create_dir_all(root.join("src/node_modules")).unwrap();
    fs::create_dir_all(root.join("src/build")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
}

#[test]
fn test_mark_creates_markers() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);

    dirmarker(temp_dir.path())
        .arg("mark")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 markers created"))
        .stdout(predicate::str::contains("2 ignore markers, 1 cache tags"));

    assert!(root.join("src/node_modules/.deja-dup-ignore").exists());
    assert!(root.join("src/build/.deja-dup-ignore").exists());
    assert!(root.join(".cache/CACHEDIR.TAG").exists());
    assert!(!root.join("docs/.deja-dup-ignore").exists());

    dirmarker(temp_dir.path())
        .arg("mark")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 markers created"))
        .stdout(predicate::str::contains("3 directories were already marked"));
}

#[test]
fn test_mark_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);

    dirmarker(temp_dir.path())
        .args(["mark", "--dry-run"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("~"))
        .stdout(predicate::str::contains("3 markers would be created"));

    assert!(!root.join("src/node_modules/.deja-dup-ignore").exists());
    assert!(!root.join(".cache/CACHEDIR.TAG").exists());
}

#[test]
fn test_mark_quiet_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);

    dirmarker(temp_dir.path())
        .args(["--quiet", "mark"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(root.join("src/build/.deja-dup-ignore").exists());
}

#[test]
fn test_quiet_dry_run_still_lists_planned_markers() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);

    dirmarker(temp_dir.path())
        .args(["--quiet", "mark", "--dry-run"])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains(".deja-dup-ignore"))
        .stdout(predicate::str::contains("CACHEDIR.TAG"))
        .stdout(predicate::str::contains("would be created").not());

    assert!(!root.join("src/build/.deja-dup-ignore").exists());
}

#[test]
fn test_mark_exclude() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);

    dirmarker(temp_dir.path())
        .arg("mark")
        .arg(&root)
        .arg("--exclude")
        .arg(root.join("src"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 markers created"));

    assert!(!root.join("src/build/.deja-dup-ignore").exists());
}

#[test]
fn test_mark_reports_parse_warnings() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    fs::write(root.join(".gitignore"), "[unclosed\nbuild/\n").unwrap();
    fs::create_dir(root.join("build")).unwrap();

    dirmarker(temp_dir.path())
        .arg("mark")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("1 warnings"))
        .stderr(predicate::str::contains(".gitignore:1"));

    assert!(root.join("build/.deja-dup-ignore").exists());
}

#[test]
fn test_mark_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();

    dirmarker(temp_dir.path())
        .arg("mark")
        .arg(temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scan aborted"));
}

#[test]
fn test_mark_uses_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);
    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[markers]\nignore_marker_file = \".nobackup\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("dirmarker").unwrap();
    cmd.env_remove("DIRMARKER_CONFIG")
        .args(["--color", "never", "--config"])
        .arg(&config)
        .arg("mark")
        .arg(&root)
        .assert()
        .success();

    assert!(root.join("src/build/.nobackup").exists());
    assert!(!root.join("src/build/.deja-dup-ignore").exists());
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[markers]\nignore_marker_file = \"a/b\"\n").unwrap();

    let mut cmd = Command::cargo_bin("dirmarker").unwrap();
    cmd.env_remove("DIRMARKER_CONFIG")
        .args(["--color", "never", "--config"])
        .arg(&config)
        .args(["mark", "."])
        .assert()
        .failure();
}

#[test]
fn test_check_ignored_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();
    project(&root);

    dirmarker(temp_dir.path())
        .arg("check")
        .arg(root.join("src/build"))
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: ignored"))
        .stdout(predicate::str::contains(".gitignore:2:build/"))
        .stdout(predicate::str::contains(".deja-dup-ignore"));

    dirmarker(temp_dir.path())
        .arg("check")
        .arg(root.join("docs"))
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: not ignored"))
        .stdout(predicate::str::contains("Marker: none"));
}

#[test]
fn test_check_path_outside_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("project");
    fs::create_dir(&root).unwrap();

    dirmarker(temp_dir.path())
        .arg("check")
        .arg(temp_dir.path())
        .arg("--root")
        .arg(&root)
        .assert()
        .failure();
}

#[test]
fn test_config_shows_defaults() {
    let temp_dir = TempDir::new().unwrap();

    dirmarker(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("ignore_marker_file = \".deja-dup-ignore\""))
        .stdout(predicate::str::contains("node_modules"));

    dirmarker(temp_dir.path())
        .args(["config", "--show-origin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing.toml"))
        .stdout(predicate::str::contains("not created yet"));
}

#[test]
fn test_completion() {
    let temp_dir = TempDir::new().unwrap();

    dirmarker(temp_dir.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dirmarker"));
}

#[test]
fn test_help_and_version() {
    Command::cargo_bin("dirmarker")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mark"))
        .stdout(predicate::str::contains("check"));

    Command::cargo_bin("dirmarker")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
