//! Repository identity on a forge host.

use std::fmt;

use crate::config::GitProtocol;
use crate::git::GitUrl;

/// A repository on a forge host, compared case-insensitively.
///
/// ```
/// use forgectl::forge::RepoId;
///
/// let repo = RepoId::from_full_name("OWNER/REPO", "github.com").unwrap();
/// assert_eq!(repo.full_name(), "OWNER/REPO");
/// assert_eq!(repo, RepoId::new("GitHub.com", "owner", "repo"));
/// ```
#[derive(Debug, Clone)]
pub struct RepoId {
    host: String,
    owner: String,
    name: String,
}

impl RepoId {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: normalize_hostname(&host.into()),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `OWNER/REPO` or `HOST/OWNER/REPO`.
    ///
    /// A full URL is accepted too, so `--repo` can be pasted from a browser.
    pub fn from_full_name(value: &str, default_host: &str) -> anyhow::Result<Self> {
        let value = value.trim();
        if value.contains("://")
            && let Some(url) = GitUrl::parse(value)
            && let Some(repo) = Self::from_url(&url)
        {
            return Ok(repo);
        }

        let parts: Vec<&str> = value.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            anyhow::bail!(r#"expected the "[HOST/]OWNER/REPO" format, got "{value}""#);
        }
        match parts.as_slice() {
            [owner, name] => Ok(Self::new(default_host, *owner, *name)),
            [host, owner, name] => Ok(Self::new(*host, *owner, *name)),
            _ => anyhow::bail!(r#"expected the "[HOST/]OWNER/REPO" format, got "{value}""#),
        }
    }

    /// Repository named by a remote URL, or `None` for local paths and URLs
    /// whose path is not `owner/repo`.
    pub fn from_url(url: &GitUrl) -> Option<Self> {
        let (owner, name) = url.owner_repo()?;
        Some(Self::new(url.hostname(), owner, name))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `OWNER/REPO`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }

    /// Clone URL in the requested protocol.
    pub fn clone_url(&self, protocol: GitProtocol) -> String {
        match protocol {
            GitProtocol::Https => format!("https://{}/{}/{}.git", self.host, self.owner, self.name),
            GitProtocol::Ssh => format!("git@{}:{}/{}.git", self.host, self.owner, self.name),
        }
    }
}

impl PartialEq for RepoId {
    fn eq(&self, other: &Self) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
            && self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepoId {}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Lowercase, drop the port and `www.`, and map GitHub's ssh-over-443 host
/// back to the web host.
fn normalize_hostname(host: &str) -> String {
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    match host {
        "ssh.github.com" => "github.com".to_string(),
        other => other.to_string(),
    }
}
