use insta_cmd::assert_cmd_snapshot;
use rstest::rstest;

use crate::common::{TestRepo, repo, setup_snapshot_settings, stderr, stdout};

#[rstest]
fn test_push_target_from_push_remote(repo: TestRepo) {
    repo.run_git(&["checkout", "-q", "-b", "feature"]);
    repo.run_git(&["config", "branch.feature.pushRemote", "fork"]);

    let output = repo.forgectl(&["branch", "push-target"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "fork/feature\n");
}

#[rstest]
fn test_push_target_unknown_without_configuration(repo: TestRepo) {
    repo.run_git(&["branch", "feature"]);

    let output = repo.forgectl(&["branch", "push-target", "feature"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "unknown\n");
}

#[rstest]
fn test_push_target_from_push_revision(repo: TestRepo) {
    repo.add_forge_remote("origin", "OWNER/REPO");
    repo.run_git(&["checkout", "-q", "-b", "feature"]);
    repo.run_git(&["push", "-q", "-u", "origin", "feature"]);

    let output = repo.forgectl(&["branch", "push-target"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "origin/feature\n");
}

#[rstest]
fn test_push_target_triangular_upstream_mode(repo: TestRepo) {
    repo.add_listed_remote("origin", "https://github.com/hubot/REPO.git");
    repo.add_listed_remote("upstream", "https://github.com/OWNER/REPO.git");
    repo.run_git(&["config", "push.default", "upstream"]);
    repo.run_git(&["branch", "feature"]);
    repo.run_git(&["config", "branch.feature.remote", "upstream"]);
    repo.run_git(&["config", "branch.feature.merge", "refs/heads/main"]);

    let output = repo.forgectl(&["branch", "push-target", "feature"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "upstream/main\n");
}

#[rstest]
fn test_push_target_upstream_on_primary_remote_is_not_triangular(repo: TestRepo) {
    repo.add_listed_remote("origin", "https://github.com/OWNER/REPO.git");
    repo.run_git(&["config", "push.default", "upstream"]);
    repo.run_git(&["branch", "feature"]);
    repo.run_git(&["config", "branch.feature.remote", "origin"]);
    repo.run_git(&["config", "branch.feature.merge", "refs/heads/main"]);

    // Falls through to @{push}, whatever that resolves to
    let output = repo.forgectl(&["-v", "branch", "push-target", "feature"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(
        !stderr(&output).contains("from push.default upstream"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_push_target_verbose_names_source(repo: TestRepo) {
    repo.run_git(&["config", "remote.pushDefault", "fork"]);

    let output = repo.forgectl(&["-v", "branch", "push-target"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "fork/main\n");
    assert!(
        stderr(&output).contains("main pushes to fork/main (from remote.pushDefault)"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_push_target_detached_head(repo: TestRepo) {
    repo.run_git(&["checkout", "-q", "--detach"]);

    let output = repo.forgectl(&["branch", "push-target"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not on any branch"), "{}", stderr(&output));
}

#[rstest]
fn test_branch_config_lists_tracking_keys(repo: TestRepo) {
    repo.run_git(&["branch", "feature"]);
    repo.run_git(&["config", "branch.feature.remote", "origin"]);
    repo.run_git(&["config", "branch.feature.merge", "refs/pull/13/head"]);
    repo.run_git(&["config", "branch.feature.pushRemote", "https://github.com/hubot/REPO.git"]);
    repo.run_git(&["config", "branch.feature.gh-merge-base", "main"]);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["branch", "config", "feature"]);
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        remote origin
        pushRemote https://github.com/hubot/REPO.git
        merge refs/pull/13/head
        gh-merge-base main

        ----- stderr -----
        ");
    });
}

#[rstest]
fn test_branch_config_dotted_branch_name(repo: TestRepo) {
    repo.run_git(&["branch", "release.v1"]);
    repo.run_git(&["config", "branch.release.v1.remote", "origin"]);
    repo.run_git(&["config", "branch.release.remote", "elsewhere"]);

    let output = repo.forgectl(&["branch", "config", "release.v1"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "remote origin\n");
}

#[rstest]
fn test_branch_config_empty(repo: TestRepo) {
    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["branch", "config"]);
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----

        ----- stderr -----
        ○ No tracking configuration for main
        ");
    });
}

#[rstest]
fn test_branch_commands_outside_repository(repo: TestRepo) {
    let outside = repo.outside_path();
    let output = repo
        .forgectl_command()
        .args(["-C", outside.to_str().unwrap(), "branch", "push-target"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("is not a git repository"),
        "{}",
        stderr(&output)
    );
}
