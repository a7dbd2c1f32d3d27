use rstest::rstest;

use crate::common::{TestRepo, repo, stderr, stdout};

#[rstest]
fn test_no_arguments_shows_help(repo: TestRepo) {
    let output = repo.forgectl(&[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage: forgectl"), "{}", stderr(&output));
}

#[rstest]
fn test_help_lists_global_options(repo: TestRepo) {
    let output = repo.forgectl(&["pr", "checkout", "--help"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let help = stdout(&output);
    assert!(help.contains("Global Options"), "{help}");
    assert!(help.contains("--recurse-submodules"), "{help}");
}

#[rstest]
fn test_version(repo: TestRepo) {
    let output = repo.forgectl(&["--version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("forgectl {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[rstest]
fn test_invalid_config_file(repo: TestRepo) {
    repo.write_config("gh-path = 3\n");

    let output = repo.forgectl(&["branch", "config"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to load config"), "{err}");
    assert!(err.contains("Invalid config file"), "{err}");
}

#[rstest]
fn test_missing_directory(repo: TestRepo) {
    let output = repo.forgectl(&["-C", "/nonexistent/forgectl-test", "branch", "config"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("Cannot change to /nonexistent/forgectl-test"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_config_flag_overrides_environment(repo: TestRepo) {
    let config = repo.outside_path().join("custom.toml");
    std::fs::write(&config, "default-host = \"\"\n").unwrap();

    let output = repo.forgectl(&["--config", config.to_str().unwrap(), "branch", "config"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load config"), "{}", stderr(&output));
}
