//! Remotes paired with the forge repository they point at, and base
//! repository selection.

use color_print::cformat;

use super::RepoId;
use crate::git::{RESOLVED_BASE, Remote, RemoteSet};
use crate::styling::{error_message, hint_message, suggest_command};

/// Failures choosing a remote or base repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// No remote points at a forge repository
    NoRemotes,
    /// Several repositories are reachable and none is marked as the base
    AmbiguousBaseRepo { candidates: Vec<String> },
    NoSuchRemote { name: String, known: Vec<String> },
}

impl std::error::Error for RemoteError {}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::NoRemotes => write!(
                f,
                "{}\n{}",
                error_message("No git remotes point at a forge repository"),
                hint_message(cformat!(
                    "Add one with <bright-black>git remote add</>, or pass <bright-black>--repo OWNER/REPO</>"
                ))
            ),
            RemoteError::AmbiguousBaseRepo { candidates } => {
                let cmd = suggest_command("repo set-default", &["<remote>"], &[]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Multiple repositories are reachable: <bold>{}</>",
                        candidates.join(", ")
                    )),
                    hint_message(cformat!(
                        "Pick one with <bright-black>--repo OWNER/REPO</>, or run <bright-black>{cmd}</>"
                    ))
                )
            }
            RemoteError::NoSuchRemote { name, known } => {
                let known = if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                };
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!("No remote named <bold>{name}</>")),
                    hint_message(format!("Known remotes: {known}"))
                )
            }
        }
    }
}

/// A git remote that resolves to a forge repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeRemote {
    pub remote: Remote,
    pub repo: RepoId,
}

impl ForgeRemote {
    /// Pair a remote with its repository.
    ///
    /// An explicit `owner/repo` hint wins over the URLs; otherwise the fetch
    /// URL is used, then the push URL. Returns `None` when nothing names a
    /// forge repository.
    pub fn from_remote(remote: &Remote, default_host: &str) -> Option<Self> {
        let repo = explicit_hint(remote)
            .and_then(|hint| RepoId::from_full_name(hint, &url_host(remote, default_host)).ok())
            .or_else(|| remote.fetch_url.as_ref().and_then(RepoId::from_url))
            .or_else(|| remote.push_url.as_ref().and_then(RepoId::from_url))?;
        Some(Self {
            remote: remote.clone(),
            repo,
        })
    }

    pub fn name(&self) -> &str {
        &self.remote.name
    }
}

/// The hint if it names a repository rather than marking the base.
fn explicit_hint(remote: &Remote) -> Option<&str> {
    match remote.resolved.as_str() {
        "" | RESOLVED_BASE => None,
        hint => Some(hint),
    }
}

/// Host of a network remote URL, for hints that carry only `owner/repo`.
fn url_host(remote: &Remote, default_host: &str) -> String {
    remote
        .url()
        .filter(|url| !url.is_local())
        .map(|url| url.hostname())
        .unwrap_or_else(|| default_host.to_string())
}

/// Forge view of a [`RemoteSet`], preserving its precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgeRemotes {
    remotes: Vec<ForgeRemote>,
}

impl ForgeRemotes {
    /// Keep the remotes that point at a forge repository.
    pub fn from_remote_set(set: &RemoteSet, default_host: &str) -> Self {
        let remotes = set
            .iter()
            .filter_map(|remote| {
                let forge = ForgeRemote::from_remote(remote, default_host);
                if forge.is_none() {
                    log::debug!("Remote {} does not name a forge repository", remote.name);
                }
                forge
            })
            .collect();
        Self { remotes }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForgeRemote> {
        self.remotes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.remotes.iter().map(|r| r.name().to_string()).collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ForgeRemote> {
        self.remotes.iter().find(|r| r.name() == name)
    }

    /// First remote, in precedence order, pointing at `repo`.
    pub fn find_by_repo(&self, repo: &RepoId) -> Option<&ForgeRemote> {
        self.remotes.iter().find(|r| &r.repo == repo)
    }

    /// Choose the base repository for commands without a selector URL.
    ///
    /// An explicit `override_repo` (`--repo`) wins. Otherwise a remote hinted
    /// as `base`, then a remote with an explicit `owner/repo` hint, then the
    /// single repository all remotes agree on. Anything else is ambiguous.
    pub fn default_base_repo(&self, override_repo: Option<&RepoId>) -> anyhow::Result<RepoId> {
        if let Some(repo) = override_repo {
            return Ok(repo.clone());
        }
        if self.remotes.is_empty() {
            return Err(RemoteError::NoRemotes.into());
        }

        if let Some(remote) = self.remotes.iter().find(|r| !r.remote.resolved.is_empty()) {
            log::debug!(
                "Base repository {} from resolved remote {}",
                remote.repo,
                remote.name()
            );
            return Ok(remote.repo.clone());
        }

        let mut candidates: Vec<&RepoId> = Vec::new();
        for remote in &self.remotes {
            if !candidates.contains(&&remote.repo) {
                candidates.push(&remote.repo);
            }
        }
        match candidates.as_slice() {
            [only] => Ok((*only).clone()),
            _ => Err(RemoteError::AmbiguousBaseRepo {
                candidates: candidates.iter().map(|r| r.full_name()).collect(),
            }
            .into()),
        }
    }
}

impl<'a> IntoIterator for &'a ForgeRemotes {
    type Item = &'a ForgeRemote;
    type IntoIter = std::slice::Iter<'a, ForgeRemote>;

    fn into_iter(self) -> Self::IntoIter {
        self.remotes.iter()
    }
}
