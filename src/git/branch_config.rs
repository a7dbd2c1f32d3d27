//! Per-branch tracking configuration and push mode.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumString};

use super::url::is_filesystem_path;
use super::{GitError, GitUrl};

/// Where a `branch.<name>.remote` or `.pushRemote` value points.
///
/// git accepts either a configured remote name or a URL in these keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTarget {
    Name(String),
    Url(GitUrl),
}

impl RemoteTarget {
    /// Interpret a stored remote value.
    ///
    /// A value containing `:` is tried as a URL. Otherwise a value that is not a
    /// filesystem path is a remote name. Anything else (`.`, `./path`) is
    /// neither and yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.contains(':') {
            return GitUrl::parse(value).map(RemoteTarget::Url);
        }
        if is_filesystem_path(value) {
            return None;
        }
        Some(RemoteTarget::Name(value.to_string()))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RemoteTarget::Name(name) => Some(name),
            RemoteTarget::Url(_) => None,
        }
    }

    pub fn url(&self) -> Option<&GitUrl> {
        match self {
            RemoteTarget::Name(_) => None,
            RemoteTarget::Url(url) => Some(url),
        }
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteTarget::Name(name) => write!(f, "{name}"),
            RemoteTarget::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Stored tracking configuration for one local branch.
///
/// All fields absent means no tracking is configured, which is a valid state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchConfig {
    /// `branch.<name>.remote`
    pub remote: Option<RemoteTarget>,
    /// `branch.<name>.pushremote`
    pub push_remote: Option<RemoteTarget>,
    /// `branch.<name>.merge`, e.g. `refs/heads/main` or `refs/pull/123/head`
    pub merge_ref: Option<String>,
    /// `branch.<name>.gh-merge-base`
    pub merge_base: Option<String>,
}

impl BranchConfig {
    /// Parse `git config --get-regexp` output of `branch.<name>.<key> <value>` lines.
    ///
    /// Each line is dispatched on the final segment of its key, so branch names
    /// containing dots parse correctly. Keys are matched case-insensitively,
    /// as git itself reports them lowercased.
    pub fn parse(output: &str) -> Self {
        let mut config = Self::default();
        for line in output.lines() {
            let Some((key, value)) = line.trim().split_once(' ') else {
                continue;
            };
            let Some((_, field)) = key.rsplit_once('.') else {
                continue;
            };
            match field.to_ascii_lowercase().as_str() {
                "remote" => config.remote = RemoteTarget::parse(value),
                "pushremote" => config.push_remote = RemoteTarget::parse(value),
                "merge" => config.merge_ref = Some(value.trim().to_string()),
                "gh-merge-base" => config.merge_base = Some(value.trim().to_string()),
                _ => {}
            }
        }
        config
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The upstream branch name, when `merge` names a branch (`refs/heads/<b>`).
    pub fn merge_branch(&self) -> Option<&str> {
        self.merge_ref.as_deref()?.strip_prefix("refs/heads/")
    }
}

/// Repository-wide `push.default` mode.
///
/// Defaults to `simple`, git's own default since 2.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PushDefault {
    Nothing,
    Current,
    Upstream,
    Tracking,
    #[default]
    Simple,
    Matching,
}

impl PushDefault {
    /// Parse a `push.default` value, rejecting unknown modes.
    pub fn parse(value: &str) -> Result<Self, GitError> {
        PushDefault::from_str(value.trim()).map_err(|_| GitError::InvalidPushDefault {
            value: value.trim().to_string(),
        })
    }

    /// `upstream` and its deprecated alias `tracking` push to the merge ref.
    pub fn pushes_to_upstream(self) -> bool {
        matches!(self, PushDefault::Upstream | PushDefault::Tracking)
    }
}
