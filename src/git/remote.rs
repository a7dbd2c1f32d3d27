//! Remote listing and resolution-hint ordering.
//!
//! `git remote -v` reports one line per remote and direction:
//!
//! ```text
//! origin	https://github.com/monalisa/octo-cat.git (fetch)
//! origin	https://github.com/monalisa/octo-cat-push.git (push)
//! ```
//!
//! Lines are merged by name into [`Remote`] values. Resolution hints stored in
//! `remote.<name>.gh-resolved` are applied afterwards and decide the order of
//! the final [`RemoteSet`].

use std::sync::LazyLock;

use regex::Regex;

use super::GitUrl;

/// Resolution hint marking a remote as the base repository.
pub const RESOLVED_BASE: &str = "base";

static REMOTE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+(.+)\s+\((push|fetch)\)$").unwrap());

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub fetch_url: Option<GitUrl>,
    pub push_url: Option<GitUrl>,
    /// Empty, `"base"`, or an explicit `owner/repo`.
    pub resolved: String,
}

impl Remote {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fetch_url: None,
            push_url: None,
            resolved: String::new(),
        }
    }

    /// The fetch URL, falling back to the push URL for push-only remotes.
    pub fn url(&self) -> Option<&GitUrl> {
        self.fetch_url.as_ref().or(self.push_url.as_ref())
    }

    fn precedence(&self) -> u8 {
        match self.resolved.as_str() {
            RESOLVED_BASE => 0,
            "" => 2,
            _ => 1,
        }
    }
}

/// Parse `git remote -v` output into remotes in report order.
///
/// Lines for the same remote are merged, keeping the first fetch URL and the
/// first push URL. Lines whose URL cannot be parsed are skipped.
pub fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();

    for line in output.lines() {
        let Some(caps) = REMOTE_LINE.captures(line.trim()) else {
            continue;
        };
        let name = caps[1].trim();
        let Some(url) = GitUrl::parse(&caps[2]) else {
            log::debug!("Skipping remote {name} with unparsable URL: {}", &caps[2]);
            continue;
        };

        let index = match remotes.iter().position(|r| r.name == name) {
            Some(index) => index,
            None => {
                remotes.push(Remote::new(name));
                remotes.len() - 1
            }
        };
        let remote = &mut remotes[index];
        let slot = match &caps[3] {
            "fetch" => &mut remote.fetch_url,
            _ => &mut remote.push_url,
        };
        if slot.is_none() {
            *slot = Some(url);
        }
    }

    remotes
}

/// Parse `git config --get-regexp '^remote\..*\.gh-resolved$'` output into
/// `(remote name, hint)` pairs.
pub fn parse_resolution_hints(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| {
            // ".gh-resolved " as delimiter handles remote names with dots
            let rest = line.trim().strip_prefix("remote.")?;
            let (name, value) = rest.split_once(".gh-resolved ")?;
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Remotes ordered by resolution precedence.
///
/// A remote hinted as `"base"` sorts first, remotes with any other hint next,
/// then unhinted remotes. Ties keep the order git reported them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSet {
    remotes: Vec<Remote>,
}

impl RemoteSet {
    /// Apply resolution hints to raw remotes and order the result.
    pub fn resolve(mut remotes: Vec<Remote>, hints: &[(String, String)]) -> Self {
        for (name, hint) in hints {
            if let Some(remote) = remotes.iter_mut().find(|r| &r.name == name) {
                remote.resolved = hint.clone();
            }
        }
        // sort_by_key is stable, preserving report order among equals
        remotes.sort_by_key(Remote::precedence);
        Self { remotes }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|r| r.name == name)
    }

    pub fn first(&self) -> Option<&Remote> {
        self.remotes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Remote> {
        self.remotes.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.remotes.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RemoteSet {
    type Item = &'a Remote;
    type IntoIter = std::slice::Iter<'a, Remote>;

    fn into_iter(self) -> Self::IntoIter {
        self.remotes.iter()
    }
}
