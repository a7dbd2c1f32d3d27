//! Branch push-target resolution.
//!
//! Decides which remote and remote branch a branch pushes to, reproducing
//! git's effective behavior from configuration rather than reimplementing
//! `git push`. Each source is a separate level that yields a target or
//! nothing; the first level with a target wins:
//!
//! 1. `branch.<name>.pushRemote` (name or URL)
//! 2. `push.default` of `upstream`/`tracking` with `branch.<name>.remote` set
//!    to something other than the primary remote; the branch comes from
//!    `branch.<name>.merge`
//! 3. `remote.pushDefault`
//! 4. `<branch>@{push}`
//!
//! When no level yields a target the push target is unknown. Callers must not
//! substitute a guess.

use std::fmt;

use super::{BranchConfig, ConfigAccessor, PushDefault, RemoteTarget, RemoteTrackingRef};

/// Which configuration produced a [`PushTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTargetSource {
    PushRemote,
    UpstreamMode,
    RemotePushDefault,
    PushRevision,
}

impl fmt::Display for PushTargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PushTargetSource::PushRemote => "branch pushRemote",
            PushTargetSource::UpstreamMode => "push.default upstream",
            PushTargetSource::RemotePushDefault => "remote.pushDefault",
            PushTargetSource::PushRevision => "@{push}",
        })
    }
}

/// Remote and branch that a push from a local branch lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub remote: RemoteTarget,
    pub branch: String,
    pub source: PushTargetSource,
}

impl fmt::Display for PushTarget {
    /// `<remote>/<branch>`, the form used for triangular workflows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// Configuration read for one branch, input to [`resolve_push_target`].
#[derive(Debug, Clone)]
pub struct PushTargetSources<'a> {
    pub branch: &'a str,
    pub config: &'a BranchConfig,
    pub push_default: PushDefault,
    pub remote_push_default: Option<&'a str>,
    /// Remote the repository treats as home; an upstream equal to it is not
    /// a triangular setup.
    pub primary_remote: Option<&'a str>,
}

impl PushTargetSources<'_> {
    /// Remote branch name for pushes that do not name one explicitly.
    ///
    /// In `upstream` mode git pushes to the merge branch; otherwise to a
    /// branch of the same name.
    fn remote_branch(&self) -> String {
        if self.push_default.pushes_to_upstream()
            && let Some(merge) = self.config.merge_branch()
        {
            return merge.to_string();
        }
        self.branch.to_string()
    }

    fn explicit_push_remote(&self) -> Option<PushTarget> {
        let remote = self.config.push_remote.clone()?;
        Some(PushTarget {
            remote,
            branch: self.remote_branch(),
            source: PushTargetSource::PushRemote,
        })
    }

    fn upstream_mode(&self) -> Option<PushTarget> {
        if !self.push_default.pushes_to_upstream() {
            return None;
        }
        let remote = self.config.remote.as_ref()?;
        if remote.name().is_some() && remote.name() == self.primary_remote {
            return None;
        }
        let branch = self.config.merge_branch()?;
        Some(PushTarget {
            remote: remote.clone(),
            branch: branch.to_string(),
            source: PushTargetSource::UpstreamMode,
        })
    }

    fn remote_push_default(&self) -> Option<PushTarget> {
        let name = self.remote_push_default.filter(|name| !name.is_empty())?;
        Some(PushTarget {
            remote: RemoteTarget::Name(name.to_string()),
            branch: self.remote_branch(),
            source: PushTargetSource::RemotePushDefault,
        })
    }
}

fn from_push_revision(revision: anyhow::Result<RemoteTrackingRef>) -> Option<PushTarget> {
    match revision {
        Ok(tracking) => Some(PushTarget {
            remote: RemoteTarget::Name(tracking.remote),
            branch: tracking.branch,
            source: PushTargetSource::PushRevision,
        }),
        Err(e) => {
            log::debug!("@{{push}} did not resolve: {}", first_line(&e));
            None
        }
    }
}

/// Resolve the push target from already-read configuration.
///
/// `push_revision` is only invoked when no configuration level applies.
pub fn resolve_push_target(
    sources: &PushTargetSources<'_>,
    push_revision: impl FnOnce() -> anyhow::Result<RemoteTrackingRef>,
) -> Option<PushTarget> {
    let target = sources
        .explicit_push_remote()
        .or_else(|| sources.upstream_mode())
        .or_else(|| sources.remote_push_default())
        .or_else(|| from_push_revision(push_revision()));

    match &target {
        Some(t) => log::debug!(
            "Push target for {}: {} (from {})",
            sources.branch,
            t,
            t.source
        ),
        None => log::debug!("Push target for {}: unknown", sources.branch),
    }
    target
}

/// Read configuration for `branch` through `git` and resolve its push target.
///
/// Returns the branch configuration alongside the target, since callers
/// usually need both. A failure to read the branch configuration is
/// propagated; failures reading `push.default` or `remote.pushDefault` fall
/// back to their unset values.
pub fn resolve_branch_push_target(
    git: &dyn ConfigAccessor,
    branch: &str,
    primary_remote: Option<&str>,
) -> anyhow::Result<(BranchConfig, Option<PushTarget>)> {
    let config = git.read_branch_config(branch)?;
    let push_default = git.push_default().unwrap_or_else(|e| {
        log::debug!("Ignoring unreadable push.default: {}", first_line(&e));
        PushDefault::default()
    });
    let remote_push_default = git.remote_push_default().unwrap_or_else(|e| {
        log::debug!("Ignoring unreadable remote.pushDefault: {}", first_line(&e));
        None
    });

    let sources = PushTargetSources {
        branch,
        config: &config,
        push_default,
        remote_push_default: remote_push_default.as_deref(),
        primary_remote,
    };
    let target = resolve_push_target(&sources, || git.push_revision(branch));
    Ok((config, target))
}

fn first_line(err: &anyhow::Error) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}
