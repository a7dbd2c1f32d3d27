//! Forge GraphQL API access.
//!
//! The transport is a black box behind [`GraphQlClient`]: run a named query
//! against a host and get the `data` object back. [`GhCliClient`] delegates
//! to the `gh` CLI, which owns authentication. [`Api`] layers the typed
//! queries the resolution engine needs on top of any client.

use std::process::Command;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Value, json};

use super::RepoId;
use crate::styling::format_with_gutter;

/// Executes GraphQL queries against a forge host.
pub trait GraphQlClient {
    /// Run `query` (whose operation is named `operation`) and return the
    /// response's `data` object. GraphQL `errors` are reported as failures.
    fn query(&self, host: &str, operation: &str, query: &str, variables: &Value)
    -> anyhow::Result<Value>;
}

/// [`GraphQlClient`] backed by `gh api graphql`.
#[derive(Debug, Clone)]
pub struct GhCliClient {
    program: String,
}

impl GhCliClient {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl GraphQlClient for GhCliClient {
    fn query(
        &self,
        host: &str,
        operation: &str,
        query: &str,
        variables: &Value,
    ) -> anyhow::Result<Value> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["api", "graphql", "--hostname", host]);
        cmd.arg("-f").arg(format!("query={query}"));
        if let Some(vars) = variables.as_object() {
            for (key, value) in vars {
                match value {
                    Value::Null => {}
                    // -f sends strings verbatim; -F parses numbers and booleans
                    Value::String(s) => {
                        cmd.arg("-f").arg(format!("{key}={s}"));
                    }
                    other => {
                        cmd.arg("-F").arg(format!("{key}={other}"));
                    }
                }
            }
        }
        cmd.env("GH_PROMPT_DISABLED", "1");

        let output = crate::shell_exec::run(&mut cmd, None)
            .with_context(|| format!("Failed to run {} for {operation}", self.program))?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            // gh exits non-zero on GraphQL errors but still prints the body
            if stdout.trim_start().starts_with('{') {
                return parse_response(&stdout)
                    .with_context(|| format!("{operation} failed on {host}"));
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{operation} failed on {host}\n{}",
                format_with_gutter(stderr.trim())
            );
        }

        parse_response(&stdout).with_context(|| format!("{operation} failed on {host}"))
    }
}

/// Extract `data` from a GraphQL response body.
pub fn parse_response(body: &str) -> anyhow::Result<Value> {
    #[derive(Deserialize)]
    struct Response {
        data: Option<Value>,
        #[serde(default)]
        errors: Vec<GraphQlError>,
    }
    #[derive(Deserialize)]
    struct GraphQlError {
        message: String,
    }

    let response: Response = serde_json::from_str(body).context("Invalid GraphQL response")?;
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        anyhow::bail!("GraphQL: {}", messages.join("; "));
    }
    response
        .data
        .ok_or_else(|| anyhow::anyhow!("GraphQL response has no data"))
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Login {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryNode {
    pub name: String,
    pub owner: Login,
}

/// A pull request as returned by the API. Fields absent from the query's
/// selection deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestNode {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub is_draft: bool,
    pub base_ref_name: String,
    pub head_ref_name: String,
    /// `None` when the head repository was deleted
    pub head_repository: Option<RepositoryNode>,
    pub head_repository_owner: Option<Login>,
    pub maintainer_can_modify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemNode {
    pub id: String,
    pub project: ProjectNode,
    pub status: Option<ProjectStatusNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectNode {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusNode {
    pub option_id: Option<String>,
    pub name: Option<String>,
}

/// Candidates for a head branch, with the repository's default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchPullRequests {
    pub pull_requests: Vec<PullRequestNode>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paged<T> {
    nodes: Vec<T>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    name: String,
}

// ============================================================================
// Typed queries
// ============================================================================

/// Page size for the branch search; newest first.
const BRANCH_SEARCH_LIMIT: u32 = 30;

/// Typed queries over a [`GraphQlClient`].
pub struct Api<'a> {
    client: &'a dyn GraphQlClient,
}

impl<'a> Api<'a> {
    pub fn new(client: &'a dyn GraphQlClient) -> Self {
        Self { client }
    }

    fn run(
        &self,
        repo: &RepoId,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> anyhow::Result<Value> {
        log::debug!("GraphQL {operation} on {}/{}", repo.host(), repo.full_name());
        self.client
            .query(repo.host(), operation, query, &variables)
    }

    /// Look up one pull request. `selection` is the GraphQL field selection
    /// for the pull request object. `None` when the number does not exist.
    pub fn pull_request_by_number(
        &self,
        repo: &RepoId,
        number: u64,
        selection: &str,
    ) -> anyhow::Result<Option<PullRequestNode>> {
        let query = format!(
            "query PullRequestByNumber($owner: String!, $repo: String!, $number: Int!) {{ \
             repository(owner: $owner, name: $repo) {{ pullRequest(number: $number) {{ {selection} }} }} }}"
        );
        let data = self.run(
            repo,
            "PullRequestByNumber",
            &query,
            json!({ "owner": repo.owner(), "repo": repo.name(), "number": number }),
        )?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Repository {
            pull_request: Option<PullRequestNode>,
        }
        #[derive(Deserialize)]
        struct Data {
            repository: Option<Repository>,
        }

        let data: Data = serde_json::from_value(data).context("Unexpected PullRequestByNumber response")?;
        Ok(data.repository.and_then(|r| r.pull_request))
    }

    /// Recent pull requests whose head branch is `head_ref_name`, in any state.
    pub fn pull_requests_for_branch(
        &self,
        repo: &RepoId,
        head_ref_name: &str,
        selection: &str,
    ) -> anyhow::Result<BranchPullRequests> {
        let query = format!(
            "query PullRequestForBranch($owner: String!, $repo: String!, $headRefName: String!) {{ \
             repository(owner: $owner, name: $repo) {{ \
             pullRequests(headRefName: $headRefName, first: {BRANCH_SEARCH_LIMIT}, orderBy: {{ field: CREATED_AT, direction: DESC }}) {{ \
             nodes {{ {selection} }} }} \
             defaultBranchRef {{ name }} }} }}"
        );
        let data = self.run(
            repo,
            "PullRequestForBranch",
            &query,
            json!({ "owner": repo.owner(), "repo": repo.name(), "headRefName": head_ref_name }),
        )?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Repository {
            pull_requests: Nodes<PullRequestNode>,
            default_branch_ref: Option<BranchRef>,
        }
        #[derive(Deserialize)]
        struct Data {
            repository: Repository,
        }

        let data: Data = serde_json::from_value(data).context("Unexpected PullRequestForBranch response")?;
        Ok(BranchPullRequests {
            pull_requests: data.repository.pull_requests.nodes,
            default_branch: data.repository.default_branch_ref.map(|r| r.name),
        })
    }

    /// All project items of a pull request, following pagination cursors
    /// until the last page.
    pub fn project_items(&self, repo: &RepoId, number: u64) -> anyhow::Result<Vec<ProjectItemNode>> {
        const QUERY: &str = "query PullRequestProjectItems($owner: String!, $repo: String!, $number: Int!, $endCursor: String) { \
             repository(owner: $owner, name: $repo) { pullRequest(number: $number) { \
             projectItems(first: 100, after: $endCursor) { \
             nodes { id project { id title } status: fieldValueByName(name: \"Status\") { \
             ... on ProjectV2ItemFieldSingleSelectValue { optionId name } } } \
             pageInfo { hasNextPage endCursor } } } } }";

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct PullRequest {
            project_items: Paged<ProjectItemNode>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Repository {
            pull_request: PullRequest,
        }
        #[derive(Deserialize)]
        struct Data {
            repository: Repository,
        }

        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let data = self.run(
                repo,
                "PullRequestProjectItems",
                QUERY,
                json!({
                    "owner": repo.owner(),
                    "repo": repo.name(),
                    "number": number,
                    "endCursor": cursor,
                }),
            )?;
            let data: Data = serde_json::from_value(data)
                .context("Unexpected PullRequestProjectItems response")?;
            let page = data.repository.pull_request.project_items;
            items.extend(page.nodes);
            match page.page_info {
                PageInfo {
                    has_next_page: true,
                    end_cursor: Some(next),
                } => cursor = Some(next),
                _ => break,
            }
        }
        Ok(items)
    }

    /// Name of the repository's default branch.
    pub fn default_branch(&self, repo: &RepoId) -> anyhow::Result<String> {
        const QUERY: &str = "query RepositoryDefaultBranch($owner: String!, $repo: String!) { \
             repository(owner: $owner, name: $repo) { defaultBranchRef { name } } }";

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Repository {
            default_branch_ref: Option<BranchRef>,
        }
        #[derive(Deserialize)]
        struct Data {
            repository: Repository,
        }

        let data = self.run(
            repo,
            "RepositoryDefaultBranch",
            QUERY,
            json!({ "owner": repo.owner(), "repo": repo.name() }),
        )?;
        let data: Data = serde_json::from_value(data).context("Unexpected RepositoryDefaultBranch response")?;
        data.repository
            .default_branch_ref
            .map(|r| r.name)
            .ok_or_else(|| anyhow::anyhow!("{} has no default branch", repo.full_name()))
    }
}
