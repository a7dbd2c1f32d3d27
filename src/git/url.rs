//! Git remote URL parsing.
//!
//! Parses the URL forms git accepts for a remote into a structured value.
//! Supports `scheme://` URLs, scp-like `user@host:path` shorthand and local
//! filesystem paths.

use std::fmt;

/// Parsed git remote URL.
///
/// # Supported URL formats
///
/// - `https://<host>/<owner>/<repo>.git`
/// - `http://<host>/<owner>/<repo>.git`
/// - `ssh://[user@]<host>[:port]/<owner>/<repo>.git`
/// - `git+ssh://...` and `ssh+git://...` (normalized to `ssh`)
/// - `git://<host>/<owner>/<repo>.git`
/// - `[user@]<host>:<owner>/<repo>.git` (scp-like, normalized to `ssh`)
/// - `/abs/path`, `./rel/path`, `../rel/path`, `file:///abs/path`
///
/// # Example
///
/// ```
/// use forgectl::git::GitUrl;
///
/// let url = GitUrl::parse("git@github.com:owner/repo.git").unwrap();
/// assert_eq!(url.scheme(), "ssh");
/// assert_eq!(url.host(), "github.com");
/// assert_eq!(url.to_string(), "ssh://git@github.com/owner/repo.git");
/// assert_eq!(url.owner_repo(), Some(("owner".into(), "repo".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitUrl {
    scheme: String,
    user: Option<String>,
    /// Host including any `:port` suffix; empty for `file` URLs.
    host: String,
    /// Always starts with `/`.
    path: String,
}

impl GitUrl {
    /// Parse a git remote URL.
    ///
    /// Returns `None` for values that are not URLs, such as bare remote names.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some((scheme, rest)) = raw.split_once("://") {
            return Self::parse_scheme_url(scheme, rest);
        }

        if is_filesystem_path(raw) {
            return Some(Self {
                scheme: "file".to_string(),
                user: None,
                host: String::new(),
                path: raw.to_string(),
            });
        }

        Self::parse_scp_like(raw)
    }

    fn parse_scheme_url(scheme: &str, rest: &str) -> Option<Self> {
        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "git+ssh" | "ssh+git" => "ssh".to_string(),
            "git+https" => "https".to_string(),
            s if s.is_empty()
                || !s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
            {
                return None;
            }
            s => s.to_string(),
        };

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        let (user, host) = match authority.rsplit_once('@') {
            Some((user, host)) => (Some(user.to_string()), host),
            None => (None, authority),
        };

        if host.is_empty() && scheme != "file" {
            return None;
        }

        Some(Self {
            scheme,
            user,
            host: host.to_string(),
            path: path.to_string(),
        })
    }

    /// `[user@]host:path`, the form `git clone` calls scp-like syntax.
    fn parse_scp_like(raw: &str) -> Option<Self> {
        let (before, path) = raw.split_once(':')?;
        // A slash before the colon means a relative path such as `dir/a:b`
        if before.contains('/') || path.is_empty() || path.starts_with("//") {
            return None;
        }
        let (user, host) = match before.rsplit_once('@') {
            Some((user, host)) => (Some(user.to_string()), host),
            None => (None, before),
        };
        if host.is_empty() {
            return None;
        }

        let path = path.trim_start_matches('/');
        Some(Self {
            scheme: "ssh".to_string(),
            user,
            host: host.to_string(),
            path: format!("/{path}"),
        })
    }

    /// URL scheme after normalization (`https`, `ssh`, `git`, `file`, ...).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// User part of the authority, if any (e.g. `git`).
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The host, including a `:port` suffix if present.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The hostname with any port removed, lowercased.
    pub fn hostname(&self) -> String {
        let host = match self.host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => self.host.as_str(),
        };
        host.to_ascii_lowercase()
    }

    /// The path component, starting with `/` for network URLs.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this URL points at a local repository.
    pub fn is_local(&self) -> bool {
        self.scheme == "file"
    }

    /// Extract `(owner, repo)` from the path, stripping a `.git` suffix.
    ///
    /// Only URLs whose path has exactly two segments name a forge repository;
    /// local paths never do.
    pub fn owner_repo(&self) -> Option<(String, String)> {
        if self.is_local() {
            return None;
        }
        let trimmed = self.path.trim_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let (owner, repo) = trimmed.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some((owner.to_string(), repo.to_string()))
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local() && self.host.is_empty() && !self.path.starts_with('/') {
            // Relative paths have no URL form
            return write!(f, "{}", self.path);
        }
        write!(f, "{}://", self.scheme)?;
        if let Some(user) = &self.user {
            write!(f, "{user}@")?;
        }
        write!(f, "{}{}", self.host, self.path)
    }
}

/// Whether a config value looks like a filesystem path rather than a remote name.
pub(crate) fn is_filesystem_path(value: &str) -> bool {
    value == "."
        || value == ".."
        || value.starts_with("./")
        || value.starts_with("../")
        || value.starts_with('/')
        || value.starts_with('~')
}
