//! Checking out a pull request's head branch locally.
//!
//! Planning decides every git invocation up front from the pull request, the
//! configured remotes and working-copy state; execution then runs the steps
//! in order and stops at the first failure. Nothing is rolled back.
//!
//! Which steps are planned depends on whether a remote already points at the
//! head repository:
//!
//! - **Remote exists**: fetch the head branch into its remote-tracking ref,
//!   then create a tracking branch or fast-forward the existing one.
//! - **No remote** (typically a fork): fetch `refs/pull/<n>/head` straight
//!   into the local branch and write tracking configuration so that a plain
//!   `git pull` (and `git push`, when maintainers may modify the fork) works
//!   afterwards.

use std::fmt;

use crate::config::GitProtocol;
use crate::forge::{ForgeRemotes, RepoId};
use crate::git::{GitError, Repository, WorkingCopy, is_valid_branch_name};

use super::PullRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Local branch name; defaults to the head branch name
    pub branch_name: Option<String>,
    /// Reset an existing local branch instead of fast-forwarding it
    pub force: bool,
    /// Check out the head commit without creating a branch
    pub detach: bool,
    pub recurse_submodules: bool,
}

/// How a failing step is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnFailure {
    Abort,
    /// A fast-forward merge; failure means the branches diverged
    NotFastForward { branch: String, target: String },
    /// Post-checkout work; failure is reported but later steps still run
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutStep {
    pub args: Vec<String>,
    pub on_failure: OnFailure,
}

impl CheckoutStep {
    fn git(args: &[&str]) -> Self {
        Self {
            args: args.iter().map(|s| s.to_string()).collect(),
            on_failure: OnFailure::Abort,
        }
    }

    fn fast_forward(branch: &str, target: &str) -> Self {
        Self {
            args: vec!["merge".into(), "--ff-only".into(), target.to_string()],
            on_failure: OnFailure::NotFastForward {
                branch: branch.to_string(),
                target: target.to_string(),
            },
        }
    }

    fn warn(args: &[&str]) -> Self {
        Self {
            on_failure: OnFailure::Warn,
            ..Self::git(args)
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.args.join(" "))
    }
}

/// Ordered git invocations that materialize a pull request locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub steps: Vec<CheckoutStep>,
    /// Branch left checked out; `None` for a detached checkout
    pub branch: Option<String>,
}

impl CheckoutPlan {
    /// Argument vectors, for inspection.
    pub fn commands(&self) -> Vec<Vec<&str>> {
        self.steps
            .iter()
            .map(|s| s.args.iter().map(String::as_str).collect())
            .collect()
    }

    /// Run the plan in `repo`. Returns warnings from steps allowed to fail.
    pub fn execute(&self, repo: &Repository) -> anyhow::Result<Vec<String>> {
        self.execute_with(|args| repo.run_command(args))
    }

    /// Run the plan through `run`, stopping at the first step that fails
    /// with [`OnFailure::Abort`] or [`OnFailure::NotFastForward`].
    pub fn execute_with(
        &self,
        mut run: impl FnMut(&[&str]) -> anyhow::Result<String>,
    ) -> anyhow::Result<Vec<String>> {
        let mut warnings = Vec::new();
        for step in &self.steps {
            let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
            let Err(err) = run(&args) else {
                continue;
            };
            match &step.on_failure {
                OnFailure::Abort => return Err(err),
                OnFailure::NotFastForward { branch, target } => {
                    // Only a failed merge means divergence; a spawn error is itself
                    if err.downcast_ref::<GitError>().is_some() {
                        return Err(GitError::NotFastForward {
                            branch: branch.clone(),
                            target: target.clone(),
                        }
                        .into());
                    }
                    return Err(err);
                }
                OnFailure::Warn => {
                    let detail = match err.downcast_ref::<GitError>() {
                        Some(git_err) => git_err.plain_message(),
                        None => err.to_string(),
                    };
                    log::debug!("{step} failed after checkout: {detail}");
                    warnings.push(detail);
                }
            }
        }
        Ok(warnings)
    }
}

/// Everything needed to plan a checkout besides working-copy state.
pub struct Checkout<'a> {
    pub pr: &'a PullRequest,
    pub remotes: &'a ForgeRemotes,
    pub protocol: GitProtocol,
    pub options: &'a CheckoutOptions,
}

impl Checkout<'_> {
    /// Build the plan. `default_branch` is only consulted when a fork's head
    /// branch is fetched without a remote and no branch name was given.
    pub fn plan(
        &self,
        git: &dyn WorkingCopy,
        default_branch: impl FnOnce() -> anyhow::Result<String>,
    ) -> anyhow::Result<CheckoutPlan> {
        let head = self.pr.head_ref_name.as_str();
        for name in std::iter::once(head).chain(self.options.branch_name.as_deref()) {
            if !is_valid_branch_name(name) {
                return Err(GitError::InvalidBranchName {
                    branch: name.to_string(),
                }
                .into());
            }
        }

        let head_repo = if self.pr.is_cross_repository() {
            self.pr.head_repository.as_ref()
        } else {
            Some(&self.pr.base_repository)
        };
        let head_remote = head_repo.and_then(|repo| self.remotes.find_by_repo(repo));

        let mut plan = match head_remote {
            Some(remote) => {
                log::debug!("Checking out {head} from remote {}", remote.name());
                self.plan_existing_remote(git, remote.name())?
            }
            None => {
                log::debug!("No remote for the head of #{}; using its pull ref", self.pr.number);
                self.plan_pull_ref(git, default_branch)?
            }
        };

        if self.options.recurse_submodules {
            plan.steps
                .push(CheckoutStep::warn(&["submodule", "sync", "--recursive"]));
            plan.steps.push(CheckoutStep::warn(&[
                "submodule",
                "update",
                "--init",
                "--recursive",
            ]));
        }
        Ok(plan)
    }

    fn plan_existing_remote(
        &self,
        git: &dyn WorkingCopy,
        remote: &str,
    ) -> anyhow::Result<CheckoutPlan> {
        let head = &self.pr.head_ref_name;
        let remote_branch = format!("{remote}/{head}");
        let tracking_ref = format!("refs/remotes/{remote_branch}");

        if self.options.detach {
            return Ok(CheckoutPlan {
                steps: vec![
                    CheckoutStep::git(&["fetch", remote, &format!("+refs/heads/{head}"), "--no-tags"]),
                    CheckoutStep::git(&["checkout", "--detach", "FETCH_HEAD"]),
                ],
                branch: None,
            });
        }

        let local = self.options.branch_name.as_deref().unwrap_or(head);
        let mut steps = vec![CheckoutStep::git(&[
            "fetch",
            remote,
            &format!("+refs/heads/{head}:{tracking_ref}"),
            "--no-tags",
        ])];

        if git.has_local_branch(local)? {
            steps.push(CheckoutStep::git(&["checkout", local]));
            if self.options.force {
                steps.push(CheckoutStep::git(&["reset", "--hard", &tracking_ref]));
            } else {
                steps.push(CheckoutStep::fast_forward(local, &tracking_ref));
            }
        } else {
            steps.push(CheckoutStep::git(&[
                "checkout",
                "-b",
                local,
                "--track",
                &remote_branch,
            ]));
        }

        Ok(CheckoutPlan {
            steps,
            branch: Some(local.to_string()),
        })
    }

    fn plan_pull_ref(
        &self,
        git: &dyn WorkingCopy,
        default_branch: impl FnOnce() -> anyhow::Result<String>,
    ) -> anyhow::Result<CheckoutPlan> {
        let pr = self.pr;
        let pull_ref = format!("refs/pull/{}/head", pr.number);
        let base: &RepoId = &pr.base_repository;
        let source = match self.remotes.find_by_repo(base) {
            Some(remote) => remote.name().to_string(),
            None => base.clone_url(self.protocol),
        };

        if self.options.detach {
            return Ok(CheckoutPlan {
                steps: vec![
                    CheckoutStep::git(&["fetch", &source, &pull_ref, "--no-tags"]),
                    CheckoutStep::git(&["checkout", "--detach", "FETCH_HEAD"]),
                ],
                branch: None,
            });
        }

        let local = match &self.options.branch_name {
            Some(name) => name.clone(),
            None => {
                // A fork's default branch would collide with ours
                if pr.head_ref_name == default_branch()? {
                    format!("{}/{}", pr.head_repository_owner, pr.head_ref_name)
                } else {
                    pr.head_ref_name.clone()
                }
            }
        };
        if !is_valid_branch_name(&local) {
            return Err(GitError::InvalidBranchName { branch: local }.into());
        }

        let mut steps = Vec::new();
        if git.current_branch()?.as_deref() == Some(local.as_str()) {
            steps.push(CheckoutStep::git(&["fetch", &source, &pull_ref, "--no-tags"]));
            if self.options.force {
                steps.push(CheckoutStep::git(&["reset", "--hard", "FETCH_HEAD"]));
            } else {
                steps.push(CheckoutStep::fast_forward(&local, "FETCH_HEAD"));
            }
        } else {
            let refspec = format!("{pull_ref}:{local}");
            let mut fetch = vec!["fetch", source.as_str(), refspec.as_str(), "--no-tags"];
            if self.options.force {
                fetch.push("--force");
            }
            steps.push(CheckoutStep::git(&fetch));
            steps.push(CheckoutStep::git(&["checkout", &local]));
        }

        if !git.has_merge_config(&local)? {
            let (remote, merge) = match &pr.head_repository {
                Some(head_repo) if pr.maintainer_can_modify => (
                    head_repo.clone_url(self.protocol),
                    format!("refs/heads/{}", pr.head_ref_name),
                ),
                _ => (source.clone(), pull_ref.clone()),
            };
            for (key, value) in [("remote", &remote), ("pushRemote", &remote), ("merge", &merge)] {
                steps.push(CheckoutStep::git(&[
                    "config",
                    &format!("branch.{local}.{key}"),
                    value,
                ]));
            }
        }

        Ok(CheckoutPlan {
            steps,
            branch: Some(local),
        })
    }
}
