//! Tests for error display formatting

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run charmkit command and capture output
fn charmkit_output(args: &[&str]) -> (String, String, Option<i32>) {
    let output = Command::new(env!("CARGO_BIN_EXE_charmkit"))
        .args(args)
        .env_remove("CHARMKIT_SERIES")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute charmkit");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (stdout, stderr, output.status.code())
}

fn create_test_charm(metadata: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("metadata.yaml"), metadata).unwrap();
    dir
}

mod series_errors {
    use super::*;

    #[test]
    fn test_unsupported_series_suggests_supported_ones() {
        let charm = create_test_charm("name: redis\nseries: [focal, jammy]\n");

        let (_, stderr, code) =
            charmkit_output(&["series", charm.path().to_str().unwrap(), "-s", "bionic"]);

        assert_eq!(code, Some(2));
        assert!(stderr.contains("charmkit::cli::series"), "Should carry diagnostic code");
        assert!(stderr.contains("\"bionic\""), "Should name the requested series");
        assert!(stderr.contains("focal,"), "Should list supported series");
        assert!(stderr.contains("deploy"), "Should suggest a supported series");
    }

    #[test]
    fn test_missing_series_suggests_flag() {
        let charm = create_test_charm("name: redis\n");

        let (_, stderr, code) = charmkit_output(&["series", charm.path().to_str().unwrap()]);

        assert_eq!(code, Some(2));
        assert!(stderr.contains("--series"), "Should point at --series");
    }
}

mod charm_errors {
    use super::*;

    #[test]
    fn test_invalid_metadata_display() {
        let charm = create_test_charm("summary: no name here\n");

        let (stdout, stderr, code) = charmkit_output(&["show", charm.path().to_str().unwrap()]);

        assert_eq!(code, Some(4));
        assert!(stdout.is_empty());
        assert!(stderr.contains("Charm error"));
        assert!(stderr.contains("charmkit::cli::charm"));
    }

    #[test]
    fn test_invalid_revision_display() {
        let charm = create_test_charm("name: redis\n");
        fs::write(charm.path().join("revision"), "seven\n").unwrap();

        let (_, stderr, code) = charmkit_output(&["show", charm.path().to_str().unwrap()]);

        assert_eq!(code, Some(4));
        assert!(stderr.contains("seven"));
    }

    #[test]
    fn test_bad_config_default_display() {
        let charm = create_test_charm("name: redis\n");
        fs::write(
            charm.path().join("config.yaml"),
            "options:\n  port:\n    type: int\n    default: six\n",
        )
        .unwrap();

        let (_, stderr, code) = charmkit_output(&["show", charm.path().to_str().unwrap()]);

        assert_eq!(code, Some(4));
        assert!(stderr.contains("port"));
    }
}

mod success_display {
    use super::*;

    #[test]
    fn test_show_legacy_charm() {
        let charm = create_test_charm("name: legacy\nsummary: Old style charm\n");

        let (stdout, _, code) = charmkit_output(&["show", charm.path().to_str().unwrap()]);

        assert_eq!(code, Some(0));
        assert!(stdout.contains("legacy"));
        assert!(stdout.contains("Old style charm"));
        assert!(stdout.contains("any (legacy charm)"));
        assert!(stdout.contains("Revision: 0"));
    }
}
