pub(crate) mod branch;
pub(crate) mod context;
pub(crate) mod pr;
pub(crate) mod repo;

pub(crate) use branch::{handle_branch_config, handle_push_target};
pub(crate) use context::CommandEnv;
pub(crate) use pr::{handle_pr_checkout, handle_pr_view};
pub(crate) use repo::{handle_remotes, handle_set_default};

use forgectl::pr::CheckoutOptions;

use crate::cli::{BranchCommand, Commands, PrCommand, RepoCommand};

/// Dispatch a parsed subcommand.
pub(crate) fn run(command: Commands, repo_override: Option<&str>) -> anyhow::Result<()> {
    let env = CommandEnv::load(repo_override)?;
    match command {
        Commands::Pr { action } => match action {
            PrCommand::Checkout {
                selector,
                branch,
                force,
                detach,
                recurse_submodules,
            } => handle_pr_checkout(
                &env,
                selector.as_deref(),
                CheckoutOptions {
                    branch_name: branch,
                    force,
                    detach,
                    recurse_submodules,
                },
            ),
            PrCommand::View {
                selector,
                base,
                json,
            } => handle_pr_view(&env, selector.as_deref(), base.as_deref(), json.as_deref()),
        },
        Commands::Branch { action } => match action {
            BranchCommand::PushTarget { branch } => handle_push_target(&env, branch),
            BranchCommand::Config { branch } => handle_branch_config(&env, branch),
        },
        Commands::Repo { action } => match action {
            RepoCommand::Remotes => handle_remotes(&env),
            RepoCommand::SetDefault {
                remote,
                target,
                unset,
            } => handle_set_default(&env, remote.as_deref(), target.as_deref(), unset),
        },
    }
}
