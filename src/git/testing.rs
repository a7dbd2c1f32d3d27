//! In-memory git state for unit tests of code above the accessor traits.

use std::collections::HashMap;

use super::{
    BranchConfig, ConfigAccessor, GitError, PushDefault, RemoteSet, RemoteTrackingRef,
    WorkingCopy, parse_remotes,
};

/// Configuration and working-copy state served without running git.
///
/// `*_error` flags make the corresponding read fail the way git would.
#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    pub branch_configs: HashMap<String, BranchConfig>,
    pub branch_config_error: bool,
    pub push_default: PushDefault,
    pub push_default_error: bool,
    pub remote_push_default: Option<String>,
    pub remote_push_default_error: bool,
    pub push_revisions: HashMap<String, RemoteTrackingRef>,
    pub remotes: RemoteSet,
    pub local_branches: Vec<String>,
    pub current_branch: Option<String>,
}

impl FakeGit {
    /// Remotes from `git remote -v` style lines plus `(remote, hint)` pairs.
    pub fn with_remotes(mut self, listing: &str, hints: &[(&str, &str)]) -> Self {
        let hints: Vec<(String, String)> = hints
            .iter()
            .map(|(name, hint)| (name.to_string(), hint.to_string()))
            .collect();
        self.remotes = RemoteSet::resolve(parse_remotes(listing), &hints);
        self
    }

    pub fn with_branch_config(mut self, branch: &str, config: BranchConfig) -> Self {
        self.branch_configs.insert(branch.to_string(), config);
        self
    }

    pub fn with_push_revision(mut self, branch: &str, remote: &str, remote_branch: &str) -> Self {
        self.push_revisions
            .insert(branch.to_string(), RemoteTrackingRef::new(remote, remote_branch));
        self
    }
}

fn config_failure(key: &str) -> anyhow::Error {
    GitError::CommandFailed {
        args: vec!["config".into(), key.into()],
        exit_code: Some(3),
        stderr: format!("fatal: bad config line 1 in file .git/config ({key})"),
    }
    .into()
}

impl ConfigAccessor for FakeGit {
    fn read_branch_config(&self, branch: &str) -> anyhow::Result<BranchConfig> {
        if self.branch_config_error {
            return Err(config_failure(&format!("branch.{branch}")));
        }
        Ok(self.branch_configs.get(branch).cloned().unwrap_or_default())
    }

    fn push_default(&self) -> anyhow::Result<PushDefault> {
        if self.push_default_error {
            return Err(config_failure("push.default"));
        }
        Ok(self.push_default)
    }

    fn remote_push_default(&self) -> anyhow::Result<Option<String>> {
        if self.remote_push_default_error {
            return Err(config_failure("remote.pushDefault"));
        }
        Ok(self.remote_push_default.clone())
    }

    fn push_revision(&self, branch: &str) -> anyhow::Result<RemoteTrackingRef> {
        self.push_revisions.get(branch).cloned().ok_or_else(|| {
            GitError::CommandFailed {
                args: vec!["rev-parse".into(), format!("{branch}@{{push}}")],
                exit_code: Some(128),
                stderr: format!("fatal: no such branch: '{branch}'"),
            }
            .into()
        })
    }

    fn remotes(&self) -> anyhow::Result<RemoteSet> {
        Ok(self.remotes.clone())
    }
}

impl WorkingCopy for FakeGit {
    fn has_local_branch(&self, branch: &str) -> anyhow::Result<bool> {
        Ok(self.local_branches.iter().any(|b| b == branch))
    }

    fn has_merge_config(&self, branch: &str) -> anyhow::Result<bool> {
        Ok(self
            .branch_configs
            .get(branch)
            .is_some_and(|c| c.merge_ref.is_some()))
    }

    fn current_branch(&self) -> anyhow::Result<Option<String>> {
        Ok(self.current_branch.clone())
    }
}
