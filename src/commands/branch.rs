use color_print::cformat;
use forgectl::forge::ForgeRemotes;
use forgectl::git::{BranchConfig, ConfigAccessor, resolve_branch_push_target};
use forgectl::styling::{eprintln, info_message, println};

use super::context::CommandEnv;

fn branch_or_current(env: &CommandEnv, branch: Option<String>) -> anyhow::Result<String> {
    env.repo.require_repository()?;
    match branch {
        Some(branch) => Ok(branch),
        None => env.repo.require_current_branch(),
    }
}

/// The remote treated as home when deciding whether an upstream is
/// triangular: the one pointing at the base repository, else the first.
fn primary_remote(env: &CommandEnv, remotes: &ForgeRemotes) -> Option<String> {
    let from_base = match env.base_repo() {
        Ok(base) => remotes.find_by_repo(&base).map(|r| r.name().to_string()),
        Err(e) => {
            log::debug!("No base repository for primary remote: {e:#}");
            None
        }
    };
    from_base.or_else(|| remotes.names().into_iter().next())
}

pub fn handle_push_target(env: &CommandEnv, branch: Option<String>) -> anyhow::Result<()> {
    let branch = branch_or_current(env, branch)?;
    let remotes = env.forge_remotes()?;
    let primary = primary_remote(env, &remotes);

    let (_, target) = resolve_branch_push_target(&env.repo, &branch, primary.as_deref())?;
    match target {
        Some(target) => {
            log::info!("{branch} pushes to {target} (from {})", target.source);
            println!("{target}");
        }
        None => println!("unknown"),
    }
    Ok(())
}

pub fn handle_branch_config(env: &CommandEnv, branch: Option<String>) -> anyhow::Result<()> {
    let branch = branch_or_current(env, branch)?;
    let config = env.repo.read_branch_config(&branch)?;
    if config.is_empty() {
        eprintln!(
            "{}",
            info_message(cformat!("No tracking configuration for <bold>{branch}</>"))
        );
        return Ok(());
    }
    for line in config_lines(&config) {
        println!("{line}");
    }
    Ok(())
}

fn config_lines(config: &BranchConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(remote) = &config.remote {
        lines.push(format!("remote {remote}"));
    }
    if let Some(push_remote) = &config.push_remote {
        lines.push(format!("pushRemote {push_remote}"));
    }
    if let Some(merge) = &config.merge_ref {
        lines.push(format!("merge {merge}"));
    }
    if let Some(base) = &config.merge_base {
        lines.push(format!("gh-merge-base {base}"));
    }
    lines
}
