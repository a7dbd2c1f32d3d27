use color_print::cformat;
use forgectl::forge::{ForgeRemotes, RemoteError, RepoId};
use forgectl::git::{ConfigAccessor, RESOLVED_BASE, RemoteSet};
use forgectl::styling::{eprintln, info_message, println, success_message};

use super::context::CommandEnv;

pub fn handle_remotes(env: &CommandEnv) -> anyhow::Result<()> {
    env.repo.require_repository()?;
    let remotes = env.repo.remotes()?;
    let forge = ForgeRemotes::from_remote_set(&remotes, &env.config.default_host);
    for line in remote_lines(&remotes, &forge) {
        println!("{line}");
    }
    Ok(())
}

/// One tab-separated line per remote: name, forge repository (`-` when the
/// URL does not name one), fetch URL, and resolution hint if set.
fn remote_lines(remotes: &RemoteSet, forge: &ForgeRemotes) -> Vec<String> {
    remotes
        .iter()
        .map(|remote| {
            let repo = forge
                .find_by_name(&remote.name)
                .map(|r| r.repo.full_name())
                .unwrap_or_else(|| "-".to_string());
            let url = remote
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "-".to_string());
            let mut line = format!("{}\t{repo}\t{url}", remote.name);
            if !remote.resolved.is_empty() {
                line.push_str(&format!("\t({})", remote.resolved));
            }
            line
        })
        .collect()
}

pub fn handle_set_default(
    env: &CommandEnv,
    remote: Option<&str>,
    target: Option<&str>,
    unset: bool,
) -> anyhow::Result<()> {
    env.repo.require_repository()?;
    let remotes = env.repo.remotes()?;

    let Some(name) = remote.filter(|_| !unset) else {
        let message = if clear_resolutions(env, &remotes)? == 0 {
            info_message("No remote was marked as the default repository")
        } else {
            success_message("Unset the default repository")
        };
        eprintln!("{message}");
        return Ok(());
    };

    let forge = ForgeRemotes::from_remote_set(&remotes, &env.config.default_host);
    let Some(forge_remote) = forge.find_by_name(name) else {
        return Err(RemoteError::NoSuchRemote {
            name: name.to_string(),
            known: forge.names(),
        }
        .into());
    };
    let (resolution, repo) = match target {
        None | Some(RESOLVED_BASE) => (RESOLVED_BASE.to_string(), forge_remote.repo.full_name()),
        Some(value) => {
            let full_name = RepoId::from_full_name(value, forge_remote.repo.host())?.full_name();
            (full_name.clone(), full_name)
        }
    };

    clear_resolutions(env, &remotes)?;
    env.repo.set_remote_resolution(name, &resolution)?;
    eprintln!(
        "{}",
        success_message(cformat!(
            "Pull requests now resolve against <bold>{repo}</> via <bold>{name}</>"
        ))
    );
    Ok(())
}

/// Remove every resolution hint so at most one remote carries one.
fn clear_resolutions(env: &CommandEnv, remotes: &RemoteSet) -> anyhow::Result<usize> {
    let mut cleared = 0;
    for remote in remotes.iter().filter(|r| !r.resolved.is_empty()) {
        log::debug!("Clearing resolution {} from {}", remote.resolved, remote.name);
        env.repo.unset_remote_resolution(&remote.name)?;
        cleared += 1;
    }
    Ok(cleared)
}
