//! Resolve which remote, branch and pull request a git operation targets.
//!
//! forgectl is a CLI tool; the library exposes the pieces it is built from:
//! remote and ref parsing in [`git`], forge repository identity and the
//! GraphQL client in [`forge`], and pull request lookup and checkout in
//! [`pr`].
//!
//! The library API is not stable.

pub mod config;
pub mod forge;
pub mod git;
pub mod pr;
pub mod shell_exec;
pub mod styling;
