//! Consolidated styling module for terminal output.
//!
//! This module uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//! - color-print for tag-based message formatting
//!
//! ## stdout vs stderr principle
//!
//! - **stdout**: Primary data output (push targets, remote lists, JSON)
//! - **stderr**: Status messages (success, errors, hints, warnings)
//!
//! This separation allows piping (`forgectl pr view --json number | jq`)
//! without status messages interfering.

mod constants;
mod format;
mod suggest;

// Re-exports from anstream (auto-detecting output)
pub use anstream::{eprint, eprintln, print, println};

// Re-export our public types
pub use constants::*;
pub use format::format_with_gutter;
pub use suggest::suggest_command;
