//! Remote-tracking ref decomposition (`refs/remotes/<remote>/<branch>`).
//!
//! The first path segment after `refs/remotes/` is always taken as the remote
//! name and everything after it as the branch. A remote whose name contains
//! `/` therefore parses with the wrong split; git itself cannot disambiguate
//! these either without consulting the remote list.

use std::fmt;

use super::GitError;

const REMOTES_PREFIX: &str = "refs/remotes/";

/// A remote-tracking ref split into remote and branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrackingRef {
    pub remote: String,
    pub branch: String,
}

impl RemoteTrackingRef {
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// Parse a fully-qualified remote-tracking ref.
    ///
    /// ```
    /// use forgectl::git::RemoteTrackingRef;
    ///
    /// let r = RemoteTrackingRef::parse("refs/remotes/origin/feature/x").unwrap();
    /// assert_eq!(r.remote, "origin");
    /// assert_eq!(r.branch, "feature/x");
    /// ```
    pub fn parse(value: &str) -> Result<Self, GitError> {
        let invalid = || GitError::InvalidRemoteTrackingRef {
            value: value.to_string(),
        };
        let rest = value.strip_prefix(REMOTES_PREFIX).ok_or_else(invalid)?;
        let (remote, branch) = rest.split_once('/').ok_or_else(invalid)?;
        if remote.is_empty() || branch.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(remote, branch))
    }
}

impl fmt::Display for RemoteTrackingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REMOTES_PREFIX}{}/{}", self.remote, self.branch)
    }
}
