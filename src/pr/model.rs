//! Resolved pull request values and field selection.

use std::str::FromStr;

use serde_json::{Map, Value, json};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use super::FindError;
use crate::forge::RepoId;
use crate::forge::api::{ProjectItemNode, PullRequestNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum PrState {
    #[default]
    Open,
    Closed,
    Merged,
}

/// A pull request field a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum PrField {
    Id,
    Number,
    Title,
    State,
    IsDraft,
    Url,
    BaseRefName,
    HeadRefName,
    HeadRepository,
    HeadRepositoryOwner,
    IsCrossRepository,
    MaintainerCanModify,
    ProjectItems,
}

impl PrField {
    /// Parse a comma-separated field list such as `number,headRefName`.
    pub fn parse_list(value: &str) -> Result<Vec<PrField>, FindError> {
        let mut fields = Vec::new();
        for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let field = PrField::from_str(name).map_err(|_| FindError::UnknownField {
                name: name.to_string(),
            })?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Ok(fields)
    }

    /// All field names, for help and error messages.
    pub fn names() -> Vec<String> {
        PrField::iter().map(|f| f.to_string()).collect()
    }

    /// GraphQL selection for this field. `None` for fields computed locally
    /// or fetched by a separate query.
    fn graphql(self) -> Option<&'static str> {
        Some(match self {
            PrField::Id => "id",
            PrField::Number => "number",
            PrField::Title => "title",
            PrField::State => "state",
            PrField::IsDraft => "isDraft",
            PrField::Url => "url",
            PrField::BaseRefName => "baseRefName",
            PrField::HeadRefName => "headRefName",
            PrField::HeadRepository => "headRepository { name owner { login } }",
            PrField::HeadRepositoryOwner => "headRepositoryOwner { login }",
            PrField::MaintainerCanModify => "maintainerCanModify",
            PrField::IsCrossRepository | PrField::ProjectItems => return None,
        })
    }
}

/// Fields every lookup fetches, whatever the caller asked for: enough to
/// match a head label and derive cross-repository status.
const RESOLUTION_FIELDS: [PrField; 6] = [
    PrField::Number,
    PrField::State,
    PrField::BaseRefName,
    PrField::HeadRefName,
    PrField::HeadRepository,
    PrField::HeadRepositoryOwner,
];

/// GraphQL field selection covering `fields`.
pub fn selection(fields: &[PrField]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for field in RESOLUTION_FIELDS.iter().chain(fields) {
        if let Some(gql) = field.graphql()
            && !parts.contains(&gql)
        {
            parts.push(gql);
        }
    }
    parts.join(" ")
}

/// A project board entry for a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub id: String,
    pub project_id: String,
    pub project_title: String,
    pub status: Option<String>,
}

impl From<ProjectItemNode> for ProjectItem {
    fn from(node: ProjectItemNode) -> Self {
        Self {
            id: node.id,
            project_id: node.project.id,
            project_title: node.project.title,
            status: node.status.and_then(|s| s.name),
        }
    }
}

/// A pull request resolved against its base repository.
///
/// Fields that were not requested hold their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: PrState,
    pub is_draft: bool,
    pub base_ref_name: String,
    pub head_ref_name: String,
    pub head_repository_owner: String,
    /// `None` when the head repository no longer exists
    pub head_repository: Option<RepoId>,
    pub base_repository: RepoId,
    pub maintainer_can_modify: bool,
    pub project_items: Vec<ProjectItem>,
}

impl PullRequest {
    /// Build from an API node. The head repository lives on the base host.
    pub fn from_node(node: PullRequestNode, base_repository: RepoId) -> Self {
        let state = PrState::from_str(&node.state).unwrap_or_else(|_| {
            if !node.state.is_empty() {
                log::debug!("Unknown pull request state {}", node.state);
            }
            PrState::default()
        });
        let head_repository = node
            .head_repository
            .map(|r| RepoId::new(base_repository.host(), r.owner.login, r.name));
        let head_repository_owner = node
            .head_repository_owner
            .map(|o| o.login)
            .unwrap_or_default();

        Self {
            id: node.id,
            number: node.number,
            title: node.title,
            url: node.url,
            state,
            is_draft: node.is_draft,
            base_ref_name: node.base_ref_name,
            head_ref_name: node.head_ref_name,
            head_repository_owner,
            head_repository,
            base_repository,
            maintainer_can_modify: node.maintainer_can_modify,
            project_items: Vec::new(),
        }
    }

    /// Whether the head branch lives outside the base repository.
    ///
    /// A deleted head repository counts as a different repository.
    pub fn is_cross_repository(&self) -> bool {
        self.head_repository.as_ref() != Some(&self.base_repository)
    }

    /// `branch` for same-repository pull requests, `owner:branch` otherwise.
    pub fn head_label(&self) -> String {
        if self.is_cross_repository() {
            format!("{}:{}", self.head_repository_owner, self.head_ref_name)
        } else {
            self.head_ref_name.clone()
        }
    }

    /// JSON object containing exactly the requested fields.
    pub fn export(&self, fields: &[PrField]) -> Value {
        let mut map = Map::new();
        for field in fields {
            let value = match field {
                PrField::Id => json!(self.id),
                PrField::Number => json!(self.number),
                PrField::Title => json!(self.title),
                PrField::State => json!(self.state.to_string()),
                PrField::IsDraft => json!(self.is_draft),
                PrField::Url => json!(self.url),
                PrField::BaseRefName => json!(self.base_ref_name),
                PrField::HeadRefName => json!(self.head_ref_name),
                PrField::HeadRepository => match &self.head_repository {
                    Some(repo) => json!({ "name": repo.name(), "nameWithOwner": repo.full_name() }),
                    None => Value::Null,
                },
                PrField::HeadRepositoryOwner => json!({ "login": self.head_repository_owner }),
                PrField::IsCrossRepository => json!(self.is_cross_repository()),
                PrField::MaintainerCanModify => json!(self.maintainer_can_modify),
                PrField::ProjectItems => Value::Array(
                    self.project_items
                        .iter()
                        .map(|item| {
                            json!({
                                "title": item.project_title,
                                "status": { "name": item.status },
                            })
                        })
                        .collect(),
                ),
            };
            map.insert(field.to_string(), value);
        }
        Value::Object(map)
    }
}
