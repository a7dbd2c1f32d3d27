use anyhow::Context;
use forgectl::config::UserConfig;
use forgectl::forge::{ForgeRemotes, GhCliClient, RepoId};
use forgectl::git::{ConfigAccessor, Repository};

/// Shared execution context for command handlers.
///
/// Centralizes the "repo + config + base repository" setup. Nothing here
/// runs git until a handler asks for it, so commands given a full pull
/// request URL work outside a repository.
pub struct CommandEnv {
    pub repo: Repository,
    pub config: UserConfig,
    /// Parsed `--repo`, overriding remote-based resolution.
    pub repo_override: Option<RepoId>,
}

impl CommandEnv {
    pub fn load(repo_override: Option<&str>) -> anyhow::Result<Self> {
        let config = UserConfig::load().context("Failed to load config")?;
        let repo_override = repo_override
            .map(|value| RepoId::from_full_name(value, &config.default_host))
            .transpose()?;
        Ok(Self {
            repo: Repository::current(),
            config,
            repo_override,
        })
    }

    /// Client for the forge API, through the configured `gh` binary.
    pub fn client(&self) -> GhCliClient {
        GhCliClient::new(&self.config.gh_path)
    }

    /// Remotes that point at forge repositories, in resolution order.
    pub fn forge_remotes(&self) -> anyhow::Result<ForgeRemotes> {
        self.repo.require_repository()?;
        let remotes = self.repo.remotes()?;
        Ok(ForgeRemotes::from_remote_set(
            &remotes,
            &self.config.default_host,
        ))
    }

    /// The repository pull requests are looked up in.
    ///
    /// `--repo` wins without touching git.
    pub fn base_repo(&self) -> anyhow::Result<RepoId> {
        if let Some(repo) = &self.repo_override {
            return Ok(repo.clone());
        }
        self.forge_remotes()?.default_base_repo(None)
    }
}
