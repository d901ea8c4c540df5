use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

const CREDENTIALS_ENV: &str = "APPS_CDN_SERVICE_ACCOUNT_CREDENTIALS";

const MANIFEST: &str = r#"[library]
title = "Toolkit modules"
description = "Modules shipped with the toolkit"

[packages.quickstart]
title = "Quickstart"
id = "dp:quickstart"
description = "Everything needed to get going"
modules = ["common/cdf_common"]
"#;

/// Command running in `dir` with an empty explicit config file.
fn modkit(dir: &Path) -> Command {
    let config = dir.join("test-config.toml");
    if !config.exists() {
        std::fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("modkit").unwrap();
    cmd.current_dir(dir)
        .env("MODKIT_CONFIG", &config)
        .env_remove(CREDENTIALS_ENV)
        .env_remove("MODKIT_CDN_CREDENTIALS_ENV")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn module_tree() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "modules/packages.toml", MANIFEST);
    write(
        dir.path(),
        "modules/common/cdf_common/module.toml",
        "[module]\nid = \"cdf_common\"\npackage_id = \"dp:quickstart\"\ntitle = \"Common\"\n",
    );
    write(
        dir.path(),
        "modules/common/cdf_common/data_models/space.yaml",
        "space: sp_common\n",
    );
    dir
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("modkit").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("modkit").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_validate_reports_counts() {
    let dir = module_tree();

    modkit(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Package 'quickstart'"))
        .stdout(predicate::str::contains("Module 'common/cdf_common'"))
        .stdout(predicate::str::contains("1 packages, 1 modules validated"));
}

#[test]
fn test_validate_empty_packages_fails() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "modules/packages.toml",
        "[library]\ntitle = \"t\"\ndescription = \"d\"\n\n[packages]\n",
    );

    modkit(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("ERROR: No packages defined"));
}

#[test]
fn test_validate_directory_without_descriptor_fails() {
    let dir = module_tree();
    std::fs::remove_file(dir.path().join("modules/common/cdf_common/module.toml")).unwrap();

    modkit(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("is not a valid module"));
}

#[test]
fn test_validate_missing_base_path_fails() {
    let dir = tempdir().unwrap();

    modkit(dir.path())
        .args(["validate", "--manifest", "nowhere/packages.toml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "ERROR: Base path 'nowhere' does not exist",
        ));
}

#[test]
fn test_validate_with_manifest_flag() {
    let dir = module_tree();
    let nested = dir.path().join("nested");
    std::fs::create_dir_all(&nested).unwrap();

    modkit(&nested)
        .args(["validate", "--manifest"])
        .arg(dir.path().join("modules/packages.toml"))
        .assert()
        .success();
}

#[test]
fn test_build_creates_archive() {
    let dir = module_tree();
    write(dir.path(), "modules/common/__pycache__/x.pyc", "junk");

    modkit(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding: common/cdf_common/module.toml"))
        .stdout(predicate::str::contains("Adding: packages.toml"))
        .stdout(predicate::str::contains("with 3 files"))
        .stdout(predicate::str::contains("Archive hash: sha256:"))
        .stdout(predicate::str::contains("bytes)"));

    assert!(dir.path().join("packages.zip").is_file());
}

#[test]
fn test_build_appends_zip_extension() {
    let dir = module_tree();

    modkit(dir.path())
        .args(["build", "--output", "release"])
        .assert()
        .success();

    assert!(dir.path().join("release.zip").is_file());
}

#[test]
fn test_build_missing_source_fails() {
    let dir = tempdir().unwrap();

    modkit(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("ERROR: "))
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_build_into_missing_directory_names_path() {
    let dir = module_tree();

    modkit(dir.path())
        .args(["build", "--output", "missing_dir/x"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR: create missing_dir/x.zip"))
        .stdout(predicate::str::contains("Config error").not());
}

#[test]
fn test_sync_without_credentials_names_variable() {
    let dir = tempdir().unwrap();

    modkit(dir.path())
        .arg("sync")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR: Missing required config"))
        .stdout(predicate::str::contains(CREDENTIALS_ENV));
}

#[test]
fn test_sync_credentials_variable_is_configurable() {
    let dir = tempdir().unwrap();

    modkit(dir.path())
        .env("MODKIT_CDN_CREDENTIALS_ENV", "MODKIT_TEST_UNSET_KEY")
        .env_remove("MODKIT_TEST_UNSET_KEY")
        .arg("sync")
        .assert()
        .failure()
        .stdout(predicate::str::contains("MODKIT_TEST_UNSET_KEY"));
}

#[test]
fn test_sync_missing_source_fails_before_authenticating() {
    let dir = tempdir().unwrap();
    // Nothing listens on the discard port, so reaching the token exchange would fail differently.
    let credentials = r#"{"type":"service_account","private_key":"k","client_email":"a@b","token_uri":"http://127.0.0.1:9/token"}"#;

    modkit(dir.path())
        .env(CREDENTIALS_ENV, credentials)
        .args(["sync", "--source", "no_such_dir"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Source directory 'no_such_dir'"));
}

#[test]
fn test_ls_without_credentials_fails() {
    let dir = tempdir().unwrap();

    modkit(dir.path())
        .arg("ls")
        .assert()
        .failure()
        .stdout(predicate::str::contains(CREDENTIALS_ENV));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = module_tree();
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[archive\n").unwrap();

    modkit(dir.path())
        .arg("--config")
        .arg(&bad)
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("parse config"));
}
