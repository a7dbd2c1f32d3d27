use color_print::cformat;
use forgectl::forge::Api;
use forgectl::pr::{
    Checkout, CheckoutOptions, FindOptions, PrField, PrState, PullRequest, PullRequestFinder,
};
use forgectl::styling::{eprintln, println, success_message, warning_message};

use super::context::CommandEnv;

/// Fields `pr checkout` needs to plan fetches and tracking configuration.
const CHECKOUT_FIELDS: [PrField; 6] = [
    PrField::Number,
    PrField::HeadRefName,
    PrField::HeadRepository,
    PrField::HeadRepositoryOwner,
    PrField::IsCrossRepository,
    PrField::MaintainerCanModify,
];

/// Fields shown by `pr view` without `--json`.
const VIEW_FIELDS: [PrField; 7] = [
    PrField::Number,
    PrField::Title,
    PrField::State,
    PrField::IsDraft,
    PrField::Url,
    PrField::BaseRefName,
    PrField::HeadRefName,
];

fn finder<'a>(
    env: &'a CommandEnv,
    client: &'a forgectl::forge::GhCliClient,
) -> PullRequestFinder<'a> {
    PullRequestFinder::new(
        &env.repo,
        client,
        env.config.default_host.clone(),
        move || env.base_repo(),
        move || {
            env.repo.require_repository()?;
            env.repo.require_current_branch()
        },
    )
}

pub fn handle_pr_checkout(
    env: &CommandEnv,
    selector: Option<&str>,
    options: CheckoutOptions,
) -> anyhow::Result<()> {
    let client = env.client();
    let (pr, base_repo) = finder(env, &client).find(FindOptions {
        selector: selector.unwrap_or_default(),
        fields: &CHECKOUT_FIELDS,
        base_branch: None,
    })?;

    env.repo.require_repository()?;
    let remotes = env.forge_remotes()?;
    let checkout = Checkout {
        pr: &pr,
        remotes: &remotes,
        protocol: env.config.git_protocol,
        options: &options,
    };
    let plan = checkout.plan(&env.repo, || Api::new(&client).default_branch(&base_repo))?;

    for step in &plan.steps {
        log::info!("{step}");
    }
    let warnings = plan.execute(&env.repo)?;
    for warning in warnings {
        eprintln!("{}", warning_message(warning));
    }

    let message = match &plan.branch {
        Some(branch) => cformat!(
            "Checked out <bold>{branch}</> for pull request <bold>#{}</>",
            pr.number
        ),
        None => cformat!(
            "Checked out pull request <bold>#{}</> at a detached HEAD",
            pr.number
        ),
    };
    eprintln!("{}", success_message(message));
    Ok(())
}

pub fn handle_pr_view(
    env: &CommandEnv,
    selector: Option<&str>,
    base_branch: Option<&str>,
    json: Option<&str>,
) -> anyhow::Result<()> {
    let fields = match json {
        Some(list) => PrField::parse_list(list)?,
        None => VIEW_FIELDS.to_vec(),
    };

    let client = env.client();
    let (pr, _) = finder(env, &client).find(FindOptions {
        selector: selector.unwrap_or_default(),
        fields: &fields,
        base_branch,
    })?;

    if json.is_some() {
        println!("{}", serde_json::to_string_pretty(&pr.export(&fields))?);
    } else {
        println!("{}", render_summary(&pr));
    }
    Ok(())
}

fn render_summary(pr: &PullRequest) -> String {
    let state = match (pr.state, pr.is_draft) {
        (PrState::Open, true) => cformat!("<dim>Draft</>"),
        (PrState::Open, false) => cformat!("<green>Open</>"),
        (PrState::Closed, _) => cformat!("<red>Closed</>"),
        (PrState::Merged, _) => cformat!("<magenta>Merged</>"),
    };
    cformat!(
        "<bold>{}</> <dim>#{}</>\n{state} · {} ← {}\n{}",
        pr.title,
        pr.number,
        pr.base_ref_name,
        pr.head_label(),
        pr.url
    )
}
