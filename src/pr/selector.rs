//! Pull request selector parsing.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::FindError;
use crate::forge::RepoId;

static PR_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://([^/]+)/([^/]+)/([^/]+)/pull/(\d+)(?:[/?#].*)?$").unwrap()
});

/// What the user asked for, parsed once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrSelector {
    /// No argument: the pull request for the checked-out branch
    Current,
    Number(u64),
    /// A pull request URL; the repository comes from the URL
    Url { repo: RepoId, number: u64 },
    /// A head branch name, optionally qualified by its owner (`owner:branch`)
    Branch { owner: Option<String>, name: String },
}

impl PrSelector {
    /// Parse a selector argument.
    ///
    /// A number combined with a base-branch filter is a branch name, since
    /// filtering an exact lookup by base makes no sense.
    pub fn parse(arg: &str, base_branch: Option<&str>) -> Result<Self, FindError> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Ok(PrSelector::Current);
        }

        if arg.starts_with("http://") || arg.starts_with("https://") {
            let caps = PR_URL
                .captures(arg)
                .ok_or_else(|| FindError::InvalidUrl { url: arg.to_string() })?;
            let number = parse_number(&caps[4])?;
            return Ok(PrSelector::Url {
                repo: RepoId::new(&caps[1], &caps[2], &caps[3]),
                number,
            });
        }

        if base_branch.is_none() {
            let digits = arg.strip_prefix('#').unwrap_or(arg);
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return Ok(PrSelector::Number(parse_number(digits)?));
            }
        }

        if let Some((owner, name)) = arg.split_once(':')
            && !owner.is_empty()
            && !name.is_empty()
        {
            return Ok(PrSelector::Branch {
                owner: Some(owner.to_string()),
                name: name.to_string(),
            });
        }

        Ok(PrSelector::Branch {
            owner: None,
            name: arg.to_string(),
        })
    }

    /// The pull request number, when the selector fixes it.
    pub fn number(&self) -> Option<u64> {
        match self {
            PrSelector::Number(n) | PrSelector::Url { number: n, .. } => Some(*n),
            _ => None,
        }
    }
}

fn parse_number(digits: &str) -> Result<u64, FindError> {
    match digits.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FindError::InvalidNumber {
            value: digits.to_string(),
        }),
    }
}

impl fmt::Display for PrSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrSelector::Current => write!(f, "current branch"),
            PrSelector::Number(n) => write!(f, "#{n}"),
            PrSelector::Url { repo, number } => write!(f, "{}#{number}", repo.full_name()),
            PrSelector::Branch {
                owner: Some(owner),
                name,
            } => write!(f, "{owner}:{name}"),
            PrSelector::Branch { owner: None, name } => write!(f, "{name}"),
        }
    }
}
