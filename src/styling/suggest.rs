//! Command suggestion helpers for hint messages.
//!
//! Build copy-pasteable commands for user suggestions:
//!
//! ```
//! use forgectl::styling::{suggest_command, hint_message};
//! use color_print::cformat;
//!
//! let cmd = suggest_command("pr checkout", &["13"], &["--force"]);
//! println!("{}", hint_message(cformat!("To reset, run <bright-black>{cmd}</>")));
//! // → ↳ To reset, run forgectl pr checkout 13 --force
//! ```
//!
//! Handles shell escaping and `--` separator for args starting with `-`:
//!
//! ```
//! use forgectl::styling::suggest_command;
//!
//! // Branch starting with dash gets -- separator
//! let cmd = suggest_command("branch push-target", &["-bugfix"], &[]);
//! assert_eq!(cmd, "forgectl branch push-target -- -bugfix");
//!
//! // Spaces are quoted
//! let cmd = suggest_command("pr view", &["my feature"], &[]);
//! assert_eq!(cmd, "forgectl pr view 'my feature'");
//! ```

use shell_escape::escape;
use std::borrow::Cow;

/// Build a suggested command string for hints.
///
/// `subcommand` may contain spaces for nested commands (`"pr checkout"`) and
/// is not escaped. Positional `args` are shell-escaped, with a `--` separator
/// inserted before the first one starting with `-`. `flags` are appended as-is.
///
/// Global flags like `-C` are intentionally not included: suggestions show the
/// operation, not the invocation context.
pub fn suggest_command(subcommand: &str, args: &[&str], flags: &[&str]) -> String {
    let mut parts = vec!["forgectl".to_string(), subcommand.to_string()];

    // Check if any arg starts with dash (needs -- separator)
    let needs_separator = args.iter().any(|arg| arg.starts_with('-'));
    let mut separator_inserted = false;

    for arg in args {
        // Insert -- before the first dash-prefixed arg
        if needs_separator && arg.starts_with('-') && !separator_inserted {
            parts.push("--".to_string());
            separator_inserted = true;
        }
        parts.push(escape(Cow::Borrowed(*arg)).into_owned());
    }

    parts.extend(flags.iter().map(|s| s.to_string()));
    parts.join(" ")
}
