//! Pull request lookup from a selector and local repository state.
//!
//! One [`PullRequestFinder::find`] call resolves one selector:
//!
//! - a URL names the repository and number outright
//! - a number is looked up in the base repository
//! - no selector means the current branch, which either remembers the pull
//!   request it was checked out from (`branch.<name>.merge` of
//!   `refs/pull/<n>/head`) or is searched for like a named branch
//! - a branch is searched by head label in the base repository, after working
//!   out from push configuration which repository and remote branch name the
//!   local branch publishes to

use color_print::cformat;

use super::model::selection;
use super::{PrField, PrSelector, PrState, ProjectItem, PullRequest};
use crate::forge::api::PullRequestNode;
use crate::forge::{Api, ForgeRemotes, GraphQlClient, RepoId};
use crate::git::{ConfigAccessor, RemoteTarget, resolve_branch_push_target};
use crate::styling::{error_message, hint_message, suggest_command};

/// Failures specific to finding a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindError {
    /// The caller asked for no fields at all
    NoFields,
    UnknownField {
        name: String,
    },
    InvalidNumber {
        value: String,
    },
    /// An http(s) URL that is not a pull request URL
    InvalidUrl {
        url: String,
    },
    /// No usable pull request; `what` describes what was searched for
    NotFound {
        what: String,
    },
    /// The checked-out default branch only matches an already merged PR
    MergedDefaultBranch {
        branch: String,
        number: u64,
    },
    /// The branch pushes to a remote that is not configured
    NoRemoteForPushRevision {
        remote: String,
        known: Vec<String>,
    },
}

impl std::error::Error for FindError {}

impl std::fmt::Display for FindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindError::NoFields => write!(f, "{}", error_message("No pull request fields requested")),
            FindError::UnknownField { name } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("Unknown pull request field <bold>{name}</>")),
                hint_message(format!("Available fields: {}", PrField::names().join(", ")))
            ),
            FindError::InvalidNumber { value } => write!(
                f,
                "{}",
                error_message(cformat!("Invalid pull request number: <bold>{value}</>"))
            ),
            FindError::InvalidUrl { url } => write!(
                f,
                "{}",
                error_message(cformat!("Invalid pull request URL: <bold>{url}</>"))
            ),
            FindError::NotFound { what } => {
                write!(f, "{}", error_message(format!("No pull request found {what}")))
            }
            FindError::MergedDefaultBranch { branch, number } => {
                let cmd = suggest_command("pr view", &[&number.to_string()], &[]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Pull request <bold>#{number}</> for <bold>{branch}</> is merged, and <bold>{branch}</> is the default branch"
                    )),
                    hint_message(cformat!(
                        "To view it anyway, run <bright-black>{cmd}</>"
                    ))
                )
            }
            FindError::NoRemoteForPushRevision { remote, known } => write!(
                f,
                "{}\n{}",
                error_message(cformat!(
                    "The branch pushes to remote <bold>{remote}</>, which is not a known forge remote"
                )),
                hint_message(format!("Known remotes: {}", known.join(", ")))
            ),
        }
    }
}

/// Inputs to one lookup.
#[derive(Debug, Clone, Copy)]
pub struct FindOptions<'a> {
    /// Number, `#number`, URL, branch, `owner:branch`, or empty
    pub selector: &'a str,
    pub fields: &'a [PrField],
    /// Only match pull requests targeting this base branch
    pub base_branch: Option<&'a str>,
}

type BaseRepoFn<'a> = Box<dyn Fn() -> anyhow::Result<RepoId> + 'a>;
type BranchFn<'a> = Box<dyn Fn() -> anyhow::Result<String> + 'a>;

/// Resolves selectors to pull requests.
///
/// The base repository and current branch are supplied as callbacks so
/// that selectors which do not need them (URLs) work outside a repository.
pub struct PullRequestFinder<'a> {
    git: &'a dyn ConfigAccessor,
    api: Api<'a>,
    default_host: String,
    base_repo: BaseRepoFn<'a>,
    current_branch: BranchFn<'a>,
}

/// Where a local branch's pull request should be searched for.
struct HeadTarget {
    branch: String,
    /// `None` when the head lives in the base repository
    owner: Option<String>,
}

impl HeadTarget {
    fn label(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}:{}", self.branch),
            None => self.branch.clone(),
        }
    }

    fn matches(&self, pr: &PullRequest) -> bool {
        if pr.head_ref_name != self.branch {
            return false;
        }
        match &self.owner {
            None => !pr.is_cross_repository(),
            Some(owner) => {
                pr.is_cross_repository() && pr.head_repository_owner.eq_ignore_ascii_case(owner)
            }
        }
    }
}

impl<'a> PullRequestFinder<'a> {
    pub fn new(
        git: &'a dyn ConfigAccessor,
        client: &'a dyn GraphQlClient,
        default_host: impl Into<String>,
        base_repo: impl Fn() -> anyhow::Result<RepoId> + 'a,
        current_branch: impl Fn() -> anyhow::Result<String> + 'a,
    ) -> Self {
        Self {
            git,
            api: Api::new(client),
            default_host: default_host.into(),
            base_repo: Box::new(base_repo),
            current_branch: Box::new(current_branch),
        }
    }

    /// Find the pull request for `opts.selector`.
    ///
    /// Returns the pull request and its base repository.
    pub fn find(&self, opts: FindOptions<'_>) -> anyhow::Result<(PullRequest, RepoId)> {
        if opts.fields.is_empty() {
            return Err(FindError::NoFields.into());
        }
        let selector = PrSelector::parse(opts.selector, opts.base_branch)?;
        log::debug!("Finding pull request for {selector}");

        let (mut pr, repo) = match selector {
            PrSelector::Url { repo, number } => {
                let pr = self.find_by_number(&repo, number, opts.fields)?;
                (pr, repo)
            }
            PrSelector::Number(number) => {
                let repo = (self.base_repo)()?;
                let pr = self.find_by_number(&repo, number, opts.fields)?;
                (pr, repo)
            }
            PrSelector::Current => {
                let branch = (self.current_branch)()?;
                let config = self.git.read_branch_config(&branch)?;
                let repo = (self.base_repo)()?;
                match config.merge_ref.as_deref().and_then(pull_number_from_ref) {
                    Some(number) => {
                        log::debug!("{branch} was checked out from pull request #{number}");
                        let pr = self.find_by_number(&repo, number, opts.fields)?;
                        (pr, repo)
                    }
                    None => {
                        let pr = self.find_for_branch(&repo, None, &branch, true, &opts)?;
                        (pr, repo)
                    }
                }
            }
            PrSelector::Branch { owner, name } => {
                let repo = (self.base_repo)()?;
                let pr = self.find_for_branch(&repo, owner, &name, false, &opts)?;
                (pr, repo)
            }
        };

        if opts.fields.contains(&PrField::ProjectItems) {
            pr.project_items = self
                .api
                .project_items(&repo, pr.number)?
                .into_iter()
                .map(ProjectItem::from)
                .collect();
        }

        Ok((pr, repo))
    }

    fn find_by_number(
        &self,
        repo: &RepoId,
        number: u64,
        fields: &[PrField],
    ) -> anyhow::Result<PullRequest> {
        // Nothing to ask the API for
        if fields == [PrField::Number] {
            let node = PullRequestNode {
                number,
                ..Default::default()
            };
            return Ok(PullRequest::from_node(node, repo.clone()));
        }

        let node = self
            .api
            .pull_request_by_number(repo, number, &selection(fields))?
            .ok_or_else(|| FindError::NotFound {
                what: format!("for #{number} in {}", repo.full_name()),
            })?;
        Ok(PullRequest::from_node(node, repo.clone()))
    }

    /// Work out the head label for a local branch from its push target.
    fn head_target(
        &self,
        base: &RepoId,
        owner: Option<String>,
        branch: &str,
    ) -> anyhow::Result<HeadTarget> {
        if let Some(owner) = owner {
            let owner = (!owner.eq_ignore_ascii_case(base.owner())).then_some(owner);
            return Ok(HeadTarget {
                branch: branch.to_string(),
                owner,
            });
        }

        let set = self.git.remotes()?;
        let remotes = ForgeRemotes::from_remote_set(&set, &self.default_host);
        let primary = remotes
            .find_by_repo(base)
            .map(|r| r.name().to_string())
            .or_else(|| set.first().map(|r| r.name.clone()));
        let (_, target) = resolve_branch_push_target(self.git, branch, primary.as_deref())?;

        let Some(target) = target else {
            return Ok(HeadTarget {
                branch: branch.to_string(),
                owner: None,
            });
        };

        let head_repo = match &target.remote {
            RemoteTarget::Name(name) => match remotes.find_by_name(name) {
                Some(remote) => remote.repo.clone(),
                None => {
                    return Err(FindError::NoRemoteForPushRevision {
                        remote: name.clone(),
                        known: remotes.names(),
                    }
                    .into());
                }
            },
            RemoteTarget::Url(url) => RepoId::from_url(url).unwrap_or_else(|| {
                log::debug!("Push URL {url} does not name a forge repository");
                base.clone()
            }),
        };

        let owner = (&head_repo != base).then(|| head_repo.owner().to_string());
        Ok(HeadTarget {
            branch: target.branch,
            owner,
        })
    }

    fn find_for_branch(
        &self,
        base: &RepoId,
        owner: Option<String>,
        branch: &str,
        is_current: bool,
        opts: &FindOptions<'_>,
    ) -> anyhow::Result<PullRequest> {
        let head = self.head_target(base, owner, branch)?;
        let label = head.label();
        log::debug!("Searching {} for head {label}", base.full_name());

        let found = self
            .api
            .pull_requests_for_branch(base, &head.branch, &selection(opts.fields))?;
        let candidates: Vec<PullRequest> = found
            .pull_requests
            .into_iter()
            .map(|node| PullRequest::from_node(node, base.clone()))
            .filter(|pr| head.matches(pr))
            .filter(|pr| opts.base_branch.is_none_or(|b| pr.base_ref_name == b))
            .collect();

        if let Some(open) = candidates.iter().find(|pr| pr.state == PrState::Open) {
            return Ok(open.clone());
        }

        if is_current
            && found.default_branch.as_deref() == Some(head.branch.as_str())
            && let Some(merged) = candidates.iter().find(|pr| pr.state == PrState::Merged)
        {
            return Err(FindError::MergedDefaultBranch {
                branch: head.branch,
                number: merged.number,
            }
            .into());
        }

        if !candidates.is_empty() {
            log::debug!(
                "Ignoring {} closed or merged pull request(s) for {label}",
                candidates.len()
            );
        }
        Err(FindError::NotFound {
            what: format!("for branch \"{label}\""),
        }
        .into())
    }
}

/// `n` from `refs/pull/<n>/head`.
fn pull_number_from_ref(merge_ref: &str) -> Option<u64> {
    merge_ref
        .strip_prefix("refs/pull/")?
        .strip_suffix("/head")?
        .parse()
        .ok()
        .filter(|n| *n > 0)
}
