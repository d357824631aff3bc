//! CLI conformance tests: help output and offline subcommand behavior.

use std::process::Command;

/// Helper to run testforge with args and capture output.
fn run_testforge(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_testforge"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute testforge");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn help_shows_usage_and_subcommands() {
    let (stdout, _, code) = run_testforge(&["--help"]);

    assert_eq!(code, 0, "Help should exit with code 0");
    assert!(stdout.contains("Usage:"), "Should contain usage section");

    for cmd in ["scrape", "testcases", "scripts", "run", "providers"] {
        assert!(
            stdout.contains(cmd),
            "Help should list '{}' subcommand",
            cmd
        );
    }
}

#[test]
fn help_shows_global_options() {
    let (stdout, _, _) = run_testforge(&["--help"]);

    assert!(
        stdout.contains("--config") || stdout.contains("-c"),
        "Should have --config/-c"
    );
    assert!(stdout.contains("--output-dir"), "Should have --output-dir");
    assert!(stdout.contains("--no-color"), "Should have --no-color");
}

#[test]
fn version_output() {
    let (stdout, _, code) = run_testforge(&["--version"]);

    assert_eq!(code, 0, "Version should exit with code 0");
    assert!(stdout.contains("testforge"), "Should contain app name");
    assert!(stdout.contains('.'), "Should contain version number");
}

#[test]
fn providers_lists_catalogue_offline() {
    let (stdout, _, code) = run_testforge(&["providers"]);

    assert_eq!(code, 0);
    for id in ["google", "openai", "ollama", "custom"] {
        assert!(stdout.contains(id), "Should list '{}' provider", id);
    }
    assert!(stdout.contains("GEMINI_API_KEY"));
}

#[test]
fn no_color_env_accepts_any_non_empty_value() {
    // Per the NO_COLOR convention the value is irrelevant; "yes" must not
    // trip argument parsing.
    let output = Command::new(env!("CARGO_BIN_EXE_testforge"))
        .args(["providers"])
        .env("NO_COLOR", "yes")
        .output()
        .expect("Failed to execute testforge");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("google"));
}

#[test]
fn unknown_subcommand_fails() {
    let (_, stderr, code) = run_testforge(&["frobnicate"]);

    assert_ne!(code, 0);
    assert!(!stderr.is_empty());
}

#[test]
fn testcases_without_listing_fails_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("empty");

    let (_, stderr, code) = run_testforge(&[
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--provider",
        "ollama",
        "testcases",
    ]);

    assert_ne!(code, 0);
    assert!(
        stderr.contains("scrape"),
        "Error should point at the missing scrape stage, got: {stderr}"
    );
}

#[test]
fn scripts_without_table_fails_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("empty");

    let (_, stderr, code) = run_testforge(&[
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--provider",
        "ollama",
        "scripts",
    ]);

    assert_ne!(code, 0);
    assert!(
        stderr.contains("testcases"),
        "Error should point at the missing testcase stage, got: {stderr}"
    );
}
