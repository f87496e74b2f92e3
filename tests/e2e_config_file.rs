/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the full flow from config file on disk through CLI invocation
/// to correct output, using `assert_cmd` and `tempfile` for isolated test environments.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a source tree to describe.
fn create_test_project(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/main.go"), "package main\n").unwrap();
    fs::write(dir.join("build.log"), "noise\n").unwrap();
}

/// Write a config file at the specified path.
fn write_config(path: &std::path::Path, content: &str) {
    fs::write(path, content).unwrap();
}

// ============================================================================
// Config File Auto-Discovery Tests
// ============================================================================

mod auto_discovery_tests {
    use super::*;

    #[test]
    fn test_auto_discovery_applies_settings() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        write_config(
            &dir.path().join("spdx-sbom.config.yml"),
            r#"
name: configured-project
namespace: https://example.com/configured
directories:
  - .
scan_licenses: false
ignore_patterns:
  - "*.log"
"#,
        );

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .arg("-q")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("DocumentName: configured-project"))
            .stdout(predicate::str::contains("FileName: src/main.go"))
            .stdout(predicate::str::contains("build.log").not());
    }

    #[test]
    fn test_no_config_file_is_fine() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", ".", "--no-license-scan", "-q"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("build.log"));
    }
}

// ============================================================================
// Explicit --config Tests
// ============================================================================

mod explicit_config_tests {
    use super::*;

    #[test]
    fn test_explicit_config_path() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        let config = dir.path().join("custom.yml");
        write_config(
            &config,
            "name: from-explicit\ndirectories:\n  - .\nscan_licenses: false\nformat: json\n",
        );

        let assert = cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .arg("--config")
            .arg(&config)
            .arg("-q")
            .assert()
            .code(0);

        let json: serde_json::Value =
            serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(json["name"], "from-explicit");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["--config", "does-not-exist.yml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to read config file"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("bad.yml");
        write_config(&config, "directories: [[[broken");

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .arg("--config")
            .arg(&config)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to parse config file"));
    }

    #[test]
    fn test_invalid_format_in_config() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        write_config(
            &dir.path().join("spdx-sbom.config.yml"),
            "directories:\n  - .\nformat: markdown\n",
        );

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid format"));
    }
}

// ============================================================================
// CLI / Config Merge Tests
// ============================================================================

mod merge_tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config_values() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        write_config(
            &dir.path().join("spdx-sbom.config.yml"),
            "name: from-config\ndirectories:\n  - .\nscan_licenses: false\nformat: json\n",
        );

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-n", "from-cli", "-f", "tag-value", "-q"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("DocumentName: from-cli"));
    }

    #[test]
    fn test_cli_ignore_patterns_replace_config() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        write_config(
            &dir.path().join("spdx-sbom.config.yml"),
            "directories:\n  - .\nscan_licenses: false\nignore_patterns:\n  - \"*.log\"\n",
        );

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-e", "src/", "-q"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("FileName: build.log"))
            .stdout(predicate::str::contains("src/main.go").not());
    }

    #[test]
    fn test_unknown_config_field_warns() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        write_config(
            &dir.path().join("spdx-sbom.config.yml"),
            "directories:\n  - .\nscan_licenses: false\ncheck_cve: true\n",
        );

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .arg("-q")
            .assert()
            .code(0)
            .stderr(predicate::str::contains(
                "Unknown config field 'check_cve' will be ignored",
            ));
    }
}
