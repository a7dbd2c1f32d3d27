use std::io::Write;
use std::process;

use clap::Parser;
use forgectl::forge::RemoteError;
use forgectl::git::GitError;
use forgectl::pr::FindError;
use forgectl::styling::{eprintln, error_message, format_with_gutter};

mod cli;
mod commands;

use cli::Cli;

/// Route `log` output to stderr: `-v` shows progress, `-vv` every command
/// run. `RUST_LOG` overrides both.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

/// Whether an error renders its own styled message and hints.
fn is_styled(err: &(dyn std::error::Error + 'static)) -> bool {
    err.downcast_ref::<GitError>().is_some()
        || err.downcast_ref::<FindError>().is_some()
        || err.downcast_ref::<RemoteError>().is_some()
}

fn print_error(err: &anyhow::Error) {
    let mut chain = err.chain();
    let Some(top) = chain.next() else {
        return;
    };
    if is_styled(top) {
        eprintln!("{top}");
        return;
    }
    eprintln!("{}", error_message(top.to_string()));
    for cause in chain {
        if is_styled(cause) {
            eprintln!("{cause}");
            break;
        }
        eprintln!("{}", format_with_gutter(&cause.to_string()));
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(path) = &cli.directory {
        match dunce::canonicalize(path) {
            Ok(path) => forgectl::git::set_base_path(path),
            Err(e) => {
                eprintln!(
                    "{}",
                    error_message(format!("Cannot change to {}: {e}", path.display()))
                );
                process::exit(1);
            }
        }
    }
    if let Some(path) = cli.config {
        forgectl::config::set_config_path(path);
    }

    if let Err(e) = commands::run(cli.command, cli.repo.as_deref()) {
        print_error(&e);
        process::exit(1);
    }
}
