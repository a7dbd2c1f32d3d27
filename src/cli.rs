use clap::builder::styling::{AnsiColor, Color, Styles};
use clap::{Parser, Subcommand};

/// Custom styles for help output - matches forgectl's color scheme
fn help_styles() -> Styles {
    Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .placeholder(anstyle::Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
}

#[derive(Parser)]
#[command(name = "forgectl")]
#[command(about = "Resolve which remote, branch and pull request a git operation targets", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
#[command(styles = help_styles())]
#[command(arg_required_else_help = true)]
#[command(after_long_help = "\
Examples

  forgectl pr checkout 123              # Check out pull request #123
  forgectl pr view --json number,state  # Pull request for the current branch
  forgectl branch push-target           # Where `git push` would go
  forgectl repo set-default upstream    # Resolve PRs against upstream")]
pub(crate) struct Cli {
    /// Working directory for this command
    #[arg(
        short = 'C',
        global = true,
        value_name = "path",
        display_order = 100,
        help_heading = "Global Options"
    )]
    pub directory: Option<std::path::PathBuf>,

    /// User config file path
    #[arg(
        long,
        global = true,
        value_name = "path",
        display_order = 101,
        help_heading = "Global Options"
    )]
    pub config: Option<std::path::PathBuf>,

    /// Base repository, overriding remote resolution
    #[arg(
        short = 'R',
        long,
        global = true,
        value_name = "[HOST/]OWNER/REPO",
        display_order = 102,
        help_heading = "Global Options"
    )]
    pub repo: Option<String>,

    /// Show progress (-v), or every command run (-vv)
    #[arg(
        long,
        short = 'v',
        global = true,
        action = clap::ArgAction::Count,
        display_order = 103,
        help_heading = "Global Options"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Find and check out pull requests
    Pr {
        #[command(subcommand)]
        action: PrCommand,
    },

    /// Inspect branch tracking and push targets
    Branch {
        #[command(subcommand)]
        action: BranchCommand,
    },

    /// Inspect remotes and choose the base repository
    Repo {
        #[command(subcommand)]
        action: RepoCommand,
    },
}

#[derive(Subcommand)]
pub(crate) enum PrCommand {
    /// Check out a pull request locally
    ///
    /// Fetches the head branch from an existing remote when one points at the
    /// head repository; otherwise fetches the pull request ref from the base
    /// repository and configures the branch to pull from it.
    Checkout {
        /// Number, URL, branch, or owner:branch; defaults to the current branch
        #[arg(value_name = "SELECTOR")]
        selector: Option<String>,

        /// Local branch name to use
        #[arg(short = 'b', long = "branch", value_name = "name")]
        branch: Option<String>,

        /// Reset the local branch to the pull request, discarding local commits
        #[arg(short, long)]
        force: bool,

        /// Check out in detached HEAD mode
        #[arg(long, conflicts_with = "branch")]
        detach: bool,

        /// Update all submodules after checkout
        #[arg(long)]
        recurse_submodules: bool,
    },

    /// Show a pull request
    View {
        /// Number, URL, branch, or owner:branch; defaults to the current branch
        #[arg(value_name = "SELECTOR")]
        selector: Option<String>,

        /// Only match pull requests targeting this base branch
        #[arg(short = 'B', long = "base", value_name = "branch")]
        base: Option<String>,

        /// Print the given comma-separated fields as JSON
        #[arg(long, value_name = "fields")]
        json: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum BranchCommand {
    /// Print where pushes from a branch go, as <remote>/<branch>
    ///
    /// Prints `unknown` when no configuration decides it.
    PushTarget {
        /// Branch to inspect; defaults to the current branch
        branch: Option<String>,
    },

    /// Print a branch's tracking configuration
    Config {
        /// Branch to inspect; defaults to the current branch
        branch: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum RepoCommand {
    /// List remotes in resolution order
    Remotes,

    /// Mark the remote whose repository pull requests are resolved against
    SetDefault {
        /// Remote to mark
        #[arg(required_unless_present = "unset")]
        remote: Option<String>,

        /// `base`, or OWNER/REPO to name the repository explicitly
        #[arg(value_name = "OWNER/REPO|base")]
        target: Option<String>,

        /// Remove all resolution marks
        #[arg(long, conflicts_with_all = ["remote", "target"])]
        unset: bool,
    },
}
