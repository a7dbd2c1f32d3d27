use insta_cmd::assert_cmd_snapshot;
use rstest::rstest;

use crate::common::{TestRepo, repo, setup_snapshot_settings, stderr, stdout};

fn with_fork_and_upstream(repo: &TestRepo) {
    repo.add_listed_remote("origin", "https://github.com/hubot/REPO.git");
    repo.add_listed_remote("upstream", "git@github.com:OWNER/REPO.git");
}

#[rstest]
fn test_remotes_listed_in_report_order(repo: TestRepo) {
    with_fork_and_upstream(&repo);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["repo", "remotes"]);
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        origin	hubot/REPO	https://github.com/hubot/REPO.git
        upstream	OWNER/REPO	ssh://git@github.com/OWNER/REPO.git

        ----- stderr -----
        ");
    });
}

#[rstest]
fn test_remotes_show_bare_repository_paths(repo: TestRepo) {
    repo.add_forge_remote("origin", "OWNER/REPO");

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["repo", "remotes"]);
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        origin	OWNER/REPO	file://[TEMP]/remotes/origin.git	(OWNER/REPO)

        ----- stderr -----
        ");
    });
}

#[rstest]
fn test_set_default_moves_remote_first(repo: TestRepo) {
    with_fork_and_upstream(&repo);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["repo", "set-default", "upstream"]);
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----

        ----- stderr -----
        ✓ Pull requests now resolve against OWNER/REPO via upstream
        ");
    });
    assert_eq!(
        repo.git_config("remote.upstream.gh-resolved").as_deref(),
        Some("base")
    );

    let output = repo.forgectl(&["repo", "remotes"]);
    let listing = stdout(&output);
    assert!(
        listing.starts_with("upstream\tOWNER/REPO\tssh://git@github.com/OWNER/REPO.git\t(base)\n"),
        "{listing}"
    );
}

#[rstest]
fn test_set_default_replaces_previous_mark(repo: TestRepo) {
    with_fork_and_upstream(&repo);
    repo.run_git(&["config", "remote.upstream.gh-resolved", "base"]);

    let output = repo.forgectl(&["repo", "set-default", "origin"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(repo.git_config("remote.upstream.gh-resolved"), None);
    assert_eq!(
        repo.git_config("remote.origin.gh-resolved").as_deref(),
        Some("base")
    );
}

#[rstest]
fn test_set_default_explicit_repository(repo: TestRepo) {
    with_fork_and_upstream(&repo);

    let output = repo.forgectl(&["repo", "set-default", "origin", "monalisa/octo-cat"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        repo.git_config("remote.origin.gh-resolved").as_deref(),
        Some("monalisa/octo-cat")
    );

    let output = repo.forgectl(&["repo", "remotes"]);
    assert!(
        stdout(&output).starts_with("origin\tmonalisa/octo-cat\t"),
        "{}",
        stdout(&output)
    );
}

#[rstest]
fn test_set_default_rejects_malformed_repository(repo: TestRepo) {
    with_fork_and_upstream(&repo);

    let output = repo.forgectl(&["repo", "set-default", "origin", "not-a-repo"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains(r#"expected the "[HOST/]OWNER/REPO" format, got "not-a-repo""#),
        "{}",
        stderr(&output)
    );
    assert_eq!(repo.git_config("remote.origin.gh-resolved"), None);
}

#[rstest]
fn test_set_default_unknown_remote(repo: TestRepo) {
    with_fork_and_upstream(&repo);

    let output = repo.forgectl(&["repo", "set-default", "nope"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("nope"), "{err}");
    assert!(err.contains("origin, upstream"), "{err}");
}

#[rstest]
fn test_set_default_unset(repo: TestRepo) {
    with_fork_and_upstream(&repo);
    repo.run_git(&["config", "remote.upstream.gh-resolved", "base"]);

    let output = repo.forgectl(&["repo", "set-default", "--unset"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(
        stderr(&output).contains("Unset the default repository"),
        "{}",
        stderr(&output)
    );
    assert_eq!(repo.git_config("remote.upstream.gh-resolved"), None);

    let output = repo.forgectl(&["repo", "set-default", "--unset"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(
        stderr(&output).contains("No remote was marked"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_ambiguous_base_repository_suggests_set_default(repo: TestRepo) {
    with_fork_and_upstream(&repo);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["pr", "view", "13"]);
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        ✗ Multiple repositories are reachable: hubot/REPO, OWNER/REPO
        ↳ Pick one with --repo OWNER/REPO, or run forgectl repo set-default '<remote>'
        ");
    });
    assert!(repo.gh_calls().is_empty());
}
