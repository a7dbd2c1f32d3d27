//! Git operations and repository configuration

// Submodules
mod branch_config;
mod error;
mod push_target;
mod remote;
mod remote_ref;
mod repository;
mod url;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports from submodules
pub use branch_config::{BranchConfig, PushDefault, RemoteTarget};
pub use error::{
    // Typed error enum (Display produces styled output)
    GitError,
    // Error inspection
    git_exit_code,
};
pub use push_target::{
    PushTarget, PushTargetSource, PushTargetSources, resolve_branch_push_target,
    resolve_push_target,
};
pub use remote::{RESOLVED_BASE, Remote, RemoteSet, parse_remotes, parse_resolution_hints};
pub use remote_ref::RemoteTrackingRef;
pub use repository::{Repository, set_base_path};
pub use url::GitUrl;

/// Read access to the git configuration that drives push and pull targets.
///
/// [`Repository`] implements this by running git; tests substitute an
/// in-memory fake. Nothing behind this trait is cached: every call reads the
/// configuration as it is now.
pub trait ConfigAccessor {
    /// Tracking configuration for `branch`. Missing keys are not an error.
    fn read_branch_config(&self, branch: &str) -> anyhow::Result<BranchConfig>;

    /// `push.default`, or [`PushDefault::Simple`] when unset.
    fn push_default(&self) -> anyhow::Result<PushDefault>;

    /// `remote.pushDefault`, or `None` when unset.
    fn remote_push_default(&self) -> anyhow::Result<Option<String>>;

    /// Resolve `<branch>@{push}`.
    ///
    /// Failure is the normal outcome for branches without a push target and
    /// callers treat it as unknown.
    fn push_revision(&self, branch: &str) -> anyhow::Result<RemoteTrackingRef>;

    /// Configured remotes ordered by resolution precedence.
    fn remotes(&self) -> anyhow::Result<RemoteSet>;
}

/// Read access to working-copy state needed to plan a checkout.
pub trait WorkingCopy {
    fn has_local_branch(&self, branch: &str) -> anyhow::Result<bool>;

    /// Whether `branch.<name>.merge` is set.
    fn has_merge_config(&self, branch: &str) -> anyhow::Result<bool>;

    /// The checked-out branch, or `None` when HEAD is detached.
    fn current_branch(&self) -> anyhow::Result<Option<String>>;
}

/// Whether `name` is usable as a branch name.
///
/// Mirrors the subset of `git check-ref-format --branch` rules that matter
/// before running any git command: names that git would parse as an option
/// or that can never form a valid ref are rejected.
pub fn is_valid_branch_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.ends_with('.')
        && !name.ends_with(".lock")
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("@{")
        && name != "@"
        && !name
            .chars()
            .any(|c| c.is_ascii_control() || matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
}
