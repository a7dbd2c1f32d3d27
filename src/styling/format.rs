//! Gutter formatting for quoted content.

use super::GUTTER;

/// Format multi-line content with a gutter on each line.
///
/// Used for quoting output from external commands (git stderr, `gh` errors)
/// beneath an error headline:
///
/// ```text
/// ✗ git fetch origin failed with exit code 128
///   fatal: could not read from remote repository
/// ```
pub fn format_with_gutter(content: &str) -> String {
    content
        .lines()
        .map(|line| format!("{GUTTER} {GUTTER:#} {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
