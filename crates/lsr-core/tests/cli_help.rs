//! CLI help output tests for lsr-core.
//!
//! These tests verify that all commands and subcommands correctly display
//! their help text without errors.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn lsr_core() -> Command {
    cargo_bin_cmd!("lsr-core")
}

mod top_level {
    use super::*;

    #[test]
    fn help_flag_works() {
        lsr_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Lymphoid Synoptic Reporter"));
    }

    #[test]
    fn version_flag_works() {
        lsr_core()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("lsr-core"));
    }

    #[test]
    fn help_shows_all_commands() {
        lsr_core()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("generate"))
            .stdout(predicate::str::contains("classify"))
            .stdout(predicate::str::contains("fields"))
            .stdout(predicate::str::contains("schema"))
            .stdout(predicate::str::contains("config"))
            .stdout(predicate::str::contains("completions"));
    }

    #[test]
    fn missing_subcommand_is_usage_error() {
        lsr_core().assert().failure().code(2);
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn generate_help_lists_options() {
        lsr_core()
            .args(["generate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--findings"))
            .stdout(predicate::str::contains("--set"))
            .stdout(predicate::str::contains("--output"));
    }

    #[test]
    fn classify_help_lists_markers() {
        lsr_core()
            .args(["classify", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--cd10"))
            .stdout(predicate::str::contains("--myc"));
    }

    #[test]
    fn config_help_lists_subcommands() {
        lsr_core()
            .args(["config", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("show"))
            .stdout(predicate::str::contains("validate"));
    }

    #[test]
    fn completions_bash() {
        lsr_core()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lsr-core"));
    }

    #[test]
    fn version_json() {
        lsr_core()
            .args(["--format", "json", "version"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"lsr_core_version\""));
    }
}
