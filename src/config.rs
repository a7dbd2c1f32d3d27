//! User configuration.
//!
//! Loaded from `config.toml` in the platform config directory
//! (`~/.config/forgectl/config.toml` on Linux and macOS):
//!
//! ```toml
//! git-protocol = "ssh"
//! default-host = "github.example.com"
//! gh-path = "/opt/homebrew/bin/gh"
//! ```
//!
//! A missing file means defaults. The location can be overridden with
//! `--config` or the `FORGECTL_CONFIG_PATH` environment variable.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

/// Set by the `--config` flag.
static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Override the config path for this process. Call once from main().
pub fn set_config_path(path: PathBuf) {
    CONFIG_PATH.set(path).ok();
}

/// Protocol used when a clone URL has to be built from a repository name.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GitProtocol {
    #[default]
    Https,
    Ssh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct UserConfig {
    pub git_protocol: GitProtocol,
    /// Host assumed for `OWNER/REPO` names without an explicit host.
    pub default_host: String,
    /// Program used to reach the forge API.
    pub gh_path: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            git_protocol: GitProtocol::default(),
            default_host: "github.com".to_string(),
            gh_path: "gh".to_string(),
        }
    }
}

impl UserConfig {
    /// Load from the configured path, falling back to defaults when absent.
    pub fn load() -> anyhow::Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is
    /// an error naming the path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No user config at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn load_from_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.default_host.trim().is_empty() {
            anyhow::bail!("default-host must not be empty");
        }
        Ok(config)
    }
}

/// Resolve the user config path.
///
/// Priority: `--config` flag, `FORGECTL_CONFIG_PATH`, then the platform
/// config directory.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = CONFIG_PATH.get() {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("FORGECTL_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    // choose_base_strategy uses:
    // - XDG on Linux (respects XDG_CONFIG_HOME, falls back to ~/.config)
    // - XDG on macOS (~/.config instead of ~/Library/Application Support)
    // - Windows conventions on Windows (%APPDATA%)
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("forgectl").join("config.toml"))
}
