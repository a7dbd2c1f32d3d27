//! External process execution with timing and debug logging.
//!
//! Every git and forge CLI invocation goes through [`run`] so that `-vv`
//! output shows each command, its duration and its outcome in one place.

use std::process::{Command, Output};
use std::time::Instant;

/// Execute a command with timing and debug logging.
///
/// This is the **only** way to run external commands in forgectl.
///
/// ```text
/// $ git remote -v [repo]                 # with context
/// $ gh api graphql ...                   # without context
/// [fc-trace] context=repo cmd="..." dur=12.3ms ok=true
/// ```
///
/// The `context` parameter is typically the repository directory name for git
/// commands, or `None` for standalone CLI tools like `gh`.
pub fn run(cmd: &mut Command, context: Option<&str>) -> std::io::Result<Output> {
    let cmd_str = command_string(cmd);

    // Log command with optional context
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }

    let t0 = Instant::now();
    let result = cmd.output();
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

    let context_field = context.map(|ctx| format!("context={ctx} ")).unwrap_or_default();
    match &result {
        Ok(output) => log::debug!(
            "[fc-trace] {}cmd=\"{}\" dur={:.1}ms ok={}",
            context_field,
            cmd_str,
            duration_ms,
            output.status.success()
        ),
        Err(e) => log::debug!(
            "[fc-trace] {}cmd=\"{}\" dur={:.1}ms err=\"{}\"",
            context_field,
            cmd_str,
            duration_ms,
            e
        ),
    }

    result
}

/// Program and arguments joined for logging.
fn command_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
