//! Git error types and formatting
//!
//! **`GitError`** is a typed enum for failures at the git boundary that can be
//! pattern-matched and tested. Use `.into()` to convert to `anyhow::Error`
//! while preserving the type for `downcast_ref`. Display produces styled
//! output for users; [`GitError::plain_message`] gives the unstyled headline.

use std::path::PathBuf;

use color_print::cformat;

use crate::styling::{error_message, format_with_gutter, hint_message, suggest_command};

/// Domain errors for git invocations and ref handling.
///
/// # Usage
///
/// ```ignore
/// // Return a typed error (Display produces styled output)
/// return Err(GitError::NotOnAnyBranch.into());
///
/// // Recognize a benign exit status
/// if let Some(GitError::CommandFailed { exit_code: Some(1), .. }) = err.downcast_ref() {
///     return Ok(None);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    /// git exited non-zero; exit code is `None` when killed by a signal
    CommandFailed {
        args: Vec<String>,
        exit_code: Option<i32>,
        stderr: String,
    },
    NotARepository {
        path: PathBuf,
    },
    /// HEAD does not point at a branch
    NotOnAnyBranch,
    InvalidRemoteTrackingRef {
        value: String,
    },
    InvalidPushDefault {
        value: String,
    },
    InvalidBranchName {
        branch: String,
    },
    /// Local branch has diverged from the ref it should fast-forward to
    NotFastForward {
        branch: String,
        target: String,
    },
}

impl GitError {
    /// Headline message without styling or hints.
    pub fn plain_message(&self) -> String {
        match self {
            GitError::CommandFailed {
                args, exit_code, ..
            } => match exit_code {
                Some(code) => format!("git {} failed with exit code {code}", args.join(" ")),
                None => format!("git {} was terminated by a signal", args.join(" ")),
            },
            GitError::NotARepository { path } => {
                format!("{} is not a git repository", path.display())
            }
            GitError::NotOnAnyBranch => "not on any branch".to_string(),
            GitError::InvalidRemoteTrackingRef { value } => format!(
                "remote tracking branch must have format refs/remotes/<remote>/<branch> but was: {value}"
            ),
            GitError::InvalidPushDefault { value } => {
                format!("unknown push.default value: {value}")
            }
            GitError::InvalidBranchName { branch } => format!("invalid branch name: {branch:?}"),
            GitError::NotFastForward { branch, target } => {
                format!("cannot fast-forward {branch} to {target}")
            }
        }
    }

    /// The exit code, if this is a failed git invocation.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::CommandFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

/// Exit code of a failed git invocation wrapped in an `anyhow::Error`.
///
/// Returns `None` for errors that did not come from running git.
pub fn git_exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<GitError>().and_then(GitError::exit_code)
}

impl std::error::Error for GitError {}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::CommandFailed {
                args,
                exit_code,
                stderr,
            } => {
                let cmd = args.join(" ");
                let header = match exit_code {
                    Some(code) => {
                        error_message(cformat!("<bold>git {cmd}</> failed with exit code {code}"))
                    }
                    None => error_message(cformat!("<bold>git {cmd}</> was terminated by a signal")),
                };
                let trimmed = stderr.trim();
                if trimmed.is_empty() {
                    write!(f, "{header}")
                } else {
                    write!(f, "{header}\n{}", format_with_gutter(trimmed))
                }
            }

            GitError::NotARepository { path } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("<bold>{}</> is not a git repository", path.display())),
                hint_message(cformat!(
                    "Run from inside a repository, or pass <bright-black>-C <<path>></>"
                ))
            ),

            GitError::NotOnAnyBranch => write!(
                f,
                "{}\n{}",
                error_message("Not on any branch (detached HEAD)"),
                hint_message(cformat!(
                    "Pass a branch or pull request explicitly, or run <bright-black>git switch <<branch>></>"
                ))
            ),

            GitError::InvalidRemoteTrackingRef { value } => write!(
                f,
                "{}",
                error_message(cformat!(
                    "Remote tracking branch must have format <bold>refs/remotes/<<remote>>/<<branch>></> but was: <bold>{value}</>"
                ))
            ),

            GitError::InvalidPushDefault { value } => write!(
                f,
                "{}\n{}",
                error_message(cformat!("Unknown <bold>push.default</> value: <bold>{value}</>")),
                hint_message(
                    "Expected one of nothing, current, upstream, tracking, simple, matching"
                )
            ),

            GitError::InvalidBranchName { branch } => {
                let quoted = format!("{branch:?}");
                write!(
                    f,
                    "{}",
                    error_message(cformat!("Invalid branch name: <bold>{quoted}</>"))
                )
            }

            GitError::NotFastForward { branch, target } => {
                let cmd = suggest_command("pr checkout", &[], &["--force"]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Cannot fast-forward <bold>{branch}</> to <bold>{target}</>; the branches have diverged"
                    )),
                    hint_message(cformat!(
                        "To discard local commits and reset to the pull request, run <bright-black>{cmd}</>"
                    ))
                )
            }
        }
    }
}
