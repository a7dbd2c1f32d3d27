use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use anyhow::Context;
use once_cell::sync::OnceCell;

// Import types and functions from parent module (mod.rs)
use super::{
    BranchConfig, ConfigAccessor, GitError, PushDefault, RemoteSet, RemoteTrackingRef,
    WorkingCopy, parse_remotes, parse_resolution_hints,
};

/// Global base path for repository operations, set by -C flag
static BASE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global base path for repository operations.
///
/// This should be called once at program startup from main().
/// If not called, defaults to "." (current directory).
pub fn set_base_path(path: PathBuf) {
    BASE_PATH.set(path).ok();
}

/// Get the base path for repository operations.
fn base_path() -> &'static PathBuf {
    static DEFAULT: OnceLock<PathBuf> = OnceLock::new();
    BASE_PATH
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(|| PathBuf::from(".")))
}

/// Per-invocation snapshot of the remote list.
///
/// Remotes are read once per command and treated as immutable afterwards.
/// Branch and push configuration is never cached here.
#[derive(Debug, Default)]
struct RepoCache {
    remotes: OnceCell<RemoteSet>,
}

/// Repository context for git operations.
///
/// # Examples
///
/// ```no_run
/// use forgectl::git::{ConfigAccessor, Repository};
///
/// let repo = Repository::current();
/// let config = repo.read_branch_config("main")?;
/// let mode = repo.push_default()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    cache: RepoCache,
}

impl Repository {
    /// Create a repository context at the specified path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RepoCache::default(),
        }
    }

    /// Create a repository context for the current directory.
    ///
    /// If the -C flag was used, this uses that path instead of the actual
    /// current directory.
    pub fn current() -> Self {
        Self::at(base_path().clone())
    }

    /// Get the base path this repository was created with.
    pub fn base_path(&self) -> &Path {
        &self.path
    }

    /// Whether the base path is inside a git work tree or git dir.
    ///
    /// git exits 128 outside a repository; any other failure is an error.
    pub fn is_git_repository(&self) -> anyhow::Result<bool> {
        match self.run_command(&["rev-parse", "--git-dir"]) {
            Ok(_) => Ok(true),
            Err(e) if super::git_exit_code(&e) == Some(128) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Error with [`GitError::NotARepository`] unless inside a repository.
    pub fn require_repository(&self) -> anyhow::Result<()> {
        if self.is_git_repository()? {
            Ok(())
        } else {
            Err(GitError::NotARepository {
                path: self.path.clone(),
            }
            .into())
        }
    }

    /// Name of the checked-out branch.
    ///
    /// Fails with [`GitError::NotOnAnyBranch`] when HEAD is detached.
    pub fn require_current_branch(&self) -> anyhow::Result<String> {
        self.current_branch()?
            .ok_or_else(|| GitError::NotOnAnyBranch.into())
    }

    /// Record a resolution hint (`base` or `owner/repo`) for a remote.
    pub fn set_remote_resolution(&self, remote: &str, resolution: &str) -> anyhow::Result<()> {
        self.run_command(&[
            "config",
            "--add",
            &format!("remote.{remote}.gh-resolved"),
            resolution,
        ])?;
        Ok(())
    }

    /// Remove every resolution hint from a remote.
    pub fn unset_remote_resolution(&self, remote: &str) -> anyhow::Result<()> {
        // Exit 5: the key was not set
        self.run_command_optional(
            &["config", "--unset-all", &format!("remote.{remote}.gh-resolved")],
            5,
        )?;
        Ok(())
    }

    /// Run a git command, mapping exit status `benign` to `Ok(None)`.
    ///
    /// Used for queries where a specific exit code means "nothing found",
    /// like `git config` exiting 1 for an unset key.
    pub fn run_command_optional(&self, args: &[&str], benign: i32) -> anyhow::Result<Option<String>> {
        match self.run_command(args) {
            Ok(stdout) => Ok(Some(stdout)),
            Err(e) if super::git_exit_code(&e) == Some(benign) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Name used to tag log lines for commands run in this repository.
    fn logging_context(&self) -> String {
        if self.path.to_str() == Some(".") {
            ".".to_string()
        } else {
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string()
        }
    }

    /// Run a git command in this repository's context.
    ///
    /// Executes the git command with this repository's path as the working
    /// directory and returns the stdout output. A non-zero exit becomes
    /// [`GitError::CommandFailed`] carrying the exit code and stderr.
    ///
    /// # Examples
    /// ```no_run
    /// use forgectl::git::Repository;
    ///
    /// let repo = Repository::current();
    /// let remotes = repo.run_command(&["remote", "-v"])?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        use crate::shell_exec::run;

        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.path);

        let output = run(&mut cmd, Some(&self.logging_context()))
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Git uses \r for progress updates
            let stderr = stderr.replace('\r', "\n");
            // Log errors with ! prefix
            for line in stderr.trim().lines() {
                log::debug!("  ! {}", line);
            }
            // Some git commands print errors to stdout
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(GitError::CommandFailed {
                args: args.iter().map(|s| s.to_string()).collect(),
                exit_code: output.status.code(),
                stderr: message,
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !stdout.is_empty() {
            // Log output indented
            for line in stdout.trim().lines() {
                log::debug!("  {}", line);
            }
        }
        Ok(stdout)
    }

    /// Run a git command and return whether it succeeded (exit code 0).
    ///
    /// This is useful for commands that use exit codes for boolean results,
    /// like `git rev-parse --verify`.
    pub fn run_command_check(&self, args: &[&str]) -> anyhow::Result<bool> {
        use crate::shell_exec::run;

        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.path);

        let output = run(&mut cmd, Some(&self.logging_context()))
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

        Ok(output.status.success())
    }
}

/// Regex matching the tracking keys of one branch, with the name escaped.
fn branch_config_pattern(branch: &str) -> String {
    format!(
        r"^branch\.{}\.(remote|merge|pushremote|gh-merge-base)$",
        regex::escape(branch)
    )
}

impl ConfigAccessor for Repository {
    fn read_branch_config(&self, branch: &str) -> anyhow::Result<BranchConfig> {
        // Exit 1: none of the keys are set
        let output = self.run_command_optional(
            &["config", "--get-regexp", &branch_config_pattern(branch)],
            1,
        )?;
        Ok(output
            .map(|out| BranchConfig::parse(&out))
            .unwrap_or_default())
    }

    fn push_default(&self) -> anyhow::Result<PushDefault> {
        match self.run_command_optional(&["config", "push.default"], 1)? {
            Some(value) => Ok(PushDefault::parse(&value)?),
            None => Ok(PushDefault::default()),
        }
    }

    fn remote_push_default(&self) -> anyhow::Result<Option<String>> {
        Ok(self
            .run_command_optional(&["config", "remote.pushDefault"], 1)?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    fn push_revision(&self, branch: &str) -> anyhow::Result<RemoteTrackingRef> {
        let output = self.run_command(&[
            "rev-parse",
            "--symbolic-full-name",
            &format!("{branch}@{{push}}"),
        ])?;
        RemoteTrackingRef::parse(output.trim())
            .map_err(anyhow::Error::from)
            .context("could not parse push revision")
    }

    fn remotes(&self) -> anyhow::Result<RemoteSet> {
        self.cache
            .remotes
            .get_or_try_init(|| {
                let listing = self.run_command(&["remote", "-v"])?;
                let raw = parse_remotes(&listing);
                // Exit 1: no remote carries a resolution hint
                let hints = self
                    .run_command_optional(
                        &["config", "--get-regexp", r"^remote\..*\.gh-resolved$"],
                        1,
                    )?
                    .map(|out| parse_resolution_hints(&out))
                    .unwrap_or_default();
                Ok(RemoteSet::resolve(raw, &hints))
            })
            .cloned()
    }
}

impl WorkingCopy for Repository {
    fn has_local_branch(&self, branch: &str) -> anyhow::Result<bool> {
        self.run_command_check(&["rev-parse", "--verify", &format!("refs/heads/{branch}")])
    }

    fn has_merge_config(&self, branch: &str) -> anyhow::Result<bool> {
        Ok(self
            .run_command_optional(&["config", &format!("branch.{branch}.merge")], 1)?
            .is_some())
    }

    fn current_branch(&self) -> anyhow::Result<Option<String>> {
        match self.run_command(&["symbolic-ref", "--quiet", "HEAD"]) {
            Ok(output) => {
                let full = output.trim();
                Ok(Some(
                    full.strip_prefix("refs/heads/").unwrap_or(full).to_string(),
                ))
            }
            // --quiet: detached HEAD exits non-zero without a message
            Err(e)
                if matches!(
                    e.downcast_ref::<GitError>(),
                    Some(GitError::CommandFailed { stderr, .. }) if stderr.is_empty()
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
