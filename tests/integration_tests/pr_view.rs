use insta_cmd::assert_cmd_snapshot;
use rstest::rstest;

use crate::common::{
    TestRepo, branch_search_response, pr_node, pull_request_response, repo,
    setup_snapshot_settings, stderr, stdout,
};

fn with_origin(repo: &TestRepo) {
    repo.add_listed_remote("origin", "https://github.com/OWNER/REPO.git");
}

#[rstest]
fn test_view_by_number_as_json(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[(
        "PullRequestByNumber",
        &pull_request_response(&pr_node(13, "OPEN", "blueberries", "OWNER")),
    )]);

    let output = repo.forgectl(&["pr", "view", "#13", "--json", "number,state,headRefName"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"number": 13, "state": "OPEN", "headRefName": "blueberries"})
    );

    let calls = repo.gh_calls();
    assert_eq!(calls.len(), 1, "{calls:?}");
    assert!(calls[0].starts_with("api graphql --hostname github.com"), "{}", calls[0]);
    assert!(calls[0].contains("-f owner=OWNER"), "{}", calls[0]);
    assert!(calls[0].contains("-F number=13"), "{}", calls[0]);
}

#[rstest]
fn test_view_url_outside_repository_without_api(repo: TestRepo) {
    repo.mock_gh(&[]);
    let outside = repo.outside_path();

    let output = repo
        .forgectl_command()
        .args([
            "-C",
            outside.to_str().unwrap(),
            "pr",
            "view",
            "https://github.com/OWNER/REPO/pull/13/files",
            "--json",
            "number",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json, serde_json::json!({"number": 13}));
    assert!(repo.gh_calls().is_empty());
}

#[rstest]
fn test_view_current_branch_prefers_open(repo: TestRepo) {
    with_origin(&repo);
    repo.run_git(&["checkout", "-q", "-b", "blueberries"]);
    repo.mock_gh(&[(
        "PullRequestForBranch",
        &branch_search_response(
            &[
                &pr_node(14, "CLOSED", "blueberries", "OWNER"),
                &pr_node(13, "OPEN", "blueberries", "OWNER"),
                &pr_node(12, "OPEN", "blueberries", "hubot"),
            ],
            "main",
        ),
    )]);

    let output = repo.forgectl(&["pr", "view", "--json", "number,isCrossRepository"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"number": 13, "isCrossRepository": false})
    );
    assert!(repo.gh_calls()[0].contains("-f headRefName=blueberries"));
}

#[rstest]
fn test_view_branch_checked_out_from_pull_request(repo: TestRepo) {
    with_origin(&repo);
    repo.run_git(&["checkout", "-q", "-b", "feature"]);
    repo.run_git(&["config", "branch.feature.merge", "refs/pull/13/head"]);
    repo.mock_gh(&[(
        "PullRequestByNumber",
        &pull_request_response(&pr_node(13, "OPEN", "feature", "hubot")),
    )]);

    let output = repo.forgectl(&["pr", "view", "--json", "number,headRepositoryOwner"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"number": 13, "headRepositoryOwner": {"login": "hubot"}})
    );
}

#[rstest]
fn test_view_owner_qualified_branch(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[(
        "PullRequestForBranch",
        &branch_search_response(
            &[
                &pr_node(13, "OPEN", "blueberries", "OWNER"),
                &pr_node(12, "OPEN", "blueberries", "hubot"),
            ],
            "main",
        ),
    )]);

    let output = repo.forgectl(&["pr", "view", "hubot:blueberries", "--json", "number"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stdout(&output)).unwrap(),
        serde_json::json!({"number": 12})
    );
}

#[rstest]
fn test_view_branch_not_found(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[(
        "PullRequestForBranch",
        &branch_search_response(&[&pr_node(14, "MERGED", "blueberries", "OWNER")], "main"),
    )]);

    let output = repo.forgectl(&["pr", "view", "blueberries"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains(r#"No pull request found for branch "blueberries""#),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_view_number_not_found(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[("PullRequestByNumber", &pull_request_response("null"))]);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["pr", "view", "999"]);
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        ✗ No pull request found for #999 in OWNER/REPO
        ");
    });
}

#[rstest]
fn test_view_unknown_json_field(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[]);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["pr", "view", "13", "--json", "number,colour"]);
        assert_cmd_snapshot!(cmd, @r"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        ✗ Unknown pull request field colour
        ↳ Available fields: id, number, title, state, isDraft, url, baseRefName, headRefName, headRepository, headRepositoryOwner, isCrossRepository, maintainerCanModify, projectItems
        ");
    });
    assert!(repo.gh_calls().is_empty());
}

#[rstest]
fn test_view_graphql_error(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[(
        "PullRequestByNumber",
        r#"{"data":null,"errors":[{"message":"Could not resolve to a Repository with the name 'OWNER/REPO'."}]}"#,
    )]);

    let output = repo.forgectl(&["pr", "view", "13"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("PullRequestByNumber failed on github.com"), "{err}");
    assert!(err.contains("GraphQL: Could not resolve to a Repository"), "{err}");
}

#[rstest]
fn test_view_unreachable_forge(repo: TestRepo) {
    with_origin(&repo);
    // No canned response: the mock fails like gh without network
    repo.mock_gh(&[]);

    let output = repo.forgectl(&["pr", "view", "13"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("error connecting to api.github.com"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
fn test_view_summary(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[(
        "PullRequestByNumber",
        &pull_request_response(&pr_node(13, "OPEN", "blueberries", "hubot")),
    )]);

    let settings = setup_snapshot_settings(&repo);
    settings.bind(|| {
        let mut cmd = repo.forgectl_command();
        cmd.args(["pr", "view", "13"]);
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Pull request 13 #13
        Open · main ← hubot:blueberries
        https://github.com/OWNER/REPO/pull/13

        ----- stderr -----
        ");
    });
}

#[rstest]
fn test_view_number_only_skips_api(repo: TestRepo) {
    with_origin(&repo);
    repo.mock_gh(&[]);

    let output = repo.forgectl(&["pr", "view", "13", "--json", "number"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stdout(&output)).unwrap(),
        serde_json::json!({"number": 13})
    );
    assert!(repo.gh_calls().is_empty());
}

#[rstest]
fn test_view_repo_override_skips_remotes(repo: TestRepo) {
    repo.mock_gh(&[(
        "PullRequestByNumber",
        &pull_request_response(&pr_node(13, "OPEN", "blueberries", "OWNER")),
    )]);

    let output = repo.forgectl(&[
        "-vv",
        "pr",
        "view",
        "13",
        "-R",
        "ghe.example.com/OWNER/REPO",
        "--json",
        "number,title",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stdout(&output)).unwrap(),
        serde_json::json!({"number": 13, "title": "Pull request 13"})
    );

    let calls = repo.gh_calls();
    assert_eq!(calls.len(), 1, "{calls:?}");
    assert!(
        calls[0].starts_with("api graphql --hostname ghe.example.com"),
        "{}",
        calls[0]
    );
    // The override is used as-is; remotes are never listed
    assert!(
        !stderr(&output).contains("$ git remote"),
        "{}",
        stderr(&output)
    );
}
