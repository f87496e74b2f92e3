/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Create a small source tree with a uv.lock manifest.
fn create_test_project(dir: &std::path::Path) {
    let uv_lock = r#"version = 1
requires-python = ">=3.8"

[[package]]
name = "test-project"
version = "0.1.0"
source = { virtual = "." }
dependencies = [
    { name = "certifi" },
]

[[package]]
name = "certifi"
version = "2023.11.17"
source = { registry = "https://pypi.org/simple" }
"#;
    fs::write(dir.join("uv.lock"), uv_lock).unwrap();
    fs::write(dir.join("main.py"), "print('hello')\n").unwrap();
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - normal execution
    #[test]
    fn test_exit_code_success() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", ".", "--no-license-scan", "-q"])
            .assert()
            .code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("spdx-sbom").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("spdx-sbom").arg("--version").assert().code(0);
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("spdx-sbom")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("spdx-sbom")
            .args(["-f", "cyclonedx"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - non-existent directory
    #[test]
    fn test_exit_code_application_error_nonexistent_path() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", "/nonexistent/path/that/does/not/exist", "--no-license-scan"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("An error occurred"));
    }

    /// Exit code 3: Application error - path is a file, not a directory
    #[test]
    fn test_exit_code_application_error_file_not_directory() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", "main.py", "--no-license-scan"])
            .assert()
            .code(3);
    }

    /// Exit code 3: nothing to describe
    #[test]
    fn test_exit_code_no_inputs() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Nothing to describe"));
    }
}

mod output_tests {
    use super::*;

    #[test]
    fn test_tag_value_to_stdout() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args([
                "-d",
                ".",
                "-n",
                "test-project",
                "--namespace",
                "https://example.com/test-project",
                "--no-license-scan",
                "-q",
            ])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("SPDXVersion: SPDX-2.2"))
            .stdout(predicate::str::contains("DocumentName: test-project"))
            .stdout(predicate::str::contains(
                "DocumentNamespace: https://example.com/test-project",
            ))
            .stdout(predicate::str::contains("FileName: main.py"))
            .stdout(predicate::str::contains("pkg:pypi/certifi@2023.11.17"));
    }

    #[test]
    fn test_json_to_file() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        let output = dir.path().join("bom.spdx.json");

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", ".", "-f", "json", "--no-license-scan", "--no-dependencies", "-q"])
            .arg("-o")
            .arg(&output)
            .assert()
            .code(0)
            .stdout(predicate::str::is_empty());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["spdxVersion"], "SPDX-2.2");
        assert_eq!(json["dataLicense"], "CC0-1.0");
        assert_eq!(json["packages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_ignore_pattern_excludes_files() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());
        fs::write(dir.path().join("debug.log"), "noise").unwrap();

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", ".", "-e", "*.log", "--no-license-scan", "-q"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("FileName: main.py"))
            .stdout(predicate::str::contains("debug.log").not());
    }

    #[test]
    fn test_license_override() {
        let dir = TempDir::new().unwrap();
        create_test_project(dir.path());

        cargo_bin_cmd!("spdx-sbom")
            .current_dir(dir.path())
            .args(["-d", ".", "-l", "Apache-2.0", "--no-license-scan", "-q"])
            .assert()
            .code(0)
            .stdout(predicate::str::contains("PackageLicenseConcluded: Apache-2.0"));
    }
}
