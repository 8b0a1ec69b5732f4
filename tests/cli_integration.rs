//! CLI integration tests for slipway.
//!
//! The probe engine only ever interprets the compiler's exit status, so
//! most tests pin `CC` to `true` or `false` for deterministic verdicts
//! without a real toolchain; one test runs against the host compiler
//! when it exists.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the slipway binary command, isolated from ambient overrides.
fn slipway() -> Command {
    let mut cmd = Command::cargo_bin("slipway").unwrap();
    cmd.env_remove("CC").env_remove("DESTDIR");
    cmd
}

/// Create a temporary project directory holding a manifest.
fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Slipway.toml"), manifest).unwrap();
    tmp
}

// ============================================================================
// slipway configure
// ============================================================================

#[test]
fn test_configure_writes_artifact() {
    let tmp = project(
        r#"
[environment]
CC = "true"

[parameters]
release = "1"

[[feature]]
name = "curses"
enabled = true
parameters = { keymap = "vi" }

[[feature]]
name = "legacy"
enabled = false
parameters = { compat = "on" }
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Configured"));

    let artifact = fs::read_to_string(tmp.path().join(".slipway/config.toml")).unwrap();
    assert!(artifact.contains("FEATURE_CURSES"));
    assert!(artifact.contains("keymap"));
    assert!(artifact.contains("release"));
    // Disabled feature contributes nothing.
    assert!(!artifact.contains("FEATURE_LEGACY"));
    assert!(!artifact.contains("compat"));
}

#[test]
fn test_configure_probes_report_yes() {
    let tmp = project(
        r#"
[environment]
CC = "true"

[checks]
headers = ["stdio.h"]
functions = ["printf"]
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Checking for header stdio.h ... yes",
        ))
        .stderr(predicate::str::contains(
            "Checking for function printf ... yes",
        ));

    let artifact = fs::read_to_string(tmp.path().join(".slipway/config.toml")).unwrap();
    assert!(artifact.contains("HAVE_HEADER_STDIO_H"));
    assert!(artifact.contains("HAVE_FUNC_PRINTF"));
}

#[test]
fn test_failed_header_check_is_soft() {
    let tmp = project(
        r#"
[environment]
CC = "false"

[checks]
headers = ["nonexistent.h"]
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Checking for header nonexistent.h ... no",
        ));

    let artifact = fs::read_to_string(tmp.path().join(".slipway/config.toml")).unwrap();
    assert!(!artifact.contains("HAVE_HEADER"));
}

#[test]
fn test_missing_macro_is_fatal() {
    let tmp = project(
        r#"
[environment]
CC = "false"

[checks]
macros = ["NDEBUG"]
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("macro not defined: NDEBUG"));

    assert!(!tmp.path().join(".slipway/config.toml").exists());
}

#[test]
fn test_missing_library_is_fatal() {
    let tmp = project(
        r#"
[environment]
CC = "false"

[checks]
libraries = ["doesnotexist12345"]
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "library missing: doesnotexist12345",
        ));
}

#[test]
fn test_configure_rejects_bad_manifest() {
    let tmp = project("[typo]\nx = 1\n");

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid manifest"));
}

#[test]
fn test_configure_with_host_compiler() {
    if which::which("cc").is_err() && which::which("gcc").is_err() {
        return;
    }

    let tmp = project(
        r#"
[checks]
headers = ["stdio.h"]
functions = ["printf"]
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Checking for header stdio.h ... yes",
        ));

    let artifact = fs::read_to_string(tmp.path().join(".slipway/config.toml")).unwrap();
    assert!(artifact.contains("stdio.h"));
}

// ============================================================================
// slipway show
// ============================================================================

#[test]
fn test_show_human_and_json() {
    let tmp = project(
        r#"
[environment]
CC = "true"

[parameters]
release = "1"
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success();

    slipway()
        .args(["show"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Parameters:"))
        .stdout(predicate::str::contains("release=1"));

    let output = slipway()
        .args(["show", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["parameters"]["release"], "1");
}

#[test]
fn test_show_without_artifact_fails() {
    let tmp = TempDir::new().unwrap();

    slipway()
        .args(["show"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// ============================================================================
// slipway install / uninstall
// ============================================================================

#[test]
fn test_install_uninstall_round_trip() {
    let stage = TempDir::new().unwrap();
    let manifest = format!(
        r#"
[environment]
CC = "true"

[directories]
prefix = "{}"

[[install]]
files = ["include/app.h"]
dest = "${{includedir}}"
"#,
        stage.path().display()
    );
    let tmp = project(&manifest);
    fs::create_dir_all(tmp.path().join("include")).unwrap();
    fs::write(tmp.path().join("include/app.h"), "#define APP 1\n").unwrap();

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success();

    slipway()
        .args(["install"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Installed"));

    let installed = stage.path().join("include/include/app.h");
    assert!(installed.is_file());

    slipway()
        .args(["uninstall"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed"));

    assert!(!installed.exists());
    assert!(!stage.path().join("include/include").exists());
}

#[test]
fn test_install_requires_declared_entries() {
    let tmp = project(
        r#"
[environment]
CC = "true"
"#,
    );

    slipway()
        .args(["configure"])
        .current_dir(tmp.path())
        .assert()
        .success();

    slipway()
        .args(["install"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no install entries"));
}

#[test]
fn test_install_requires_configuration() {
    let tmp = project(
        r#"
[[install]]
files = ["a"]
dest = "${prefix}"
"#,
    );

    slipway()
        .args(["install"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("slipway configure"));
}
