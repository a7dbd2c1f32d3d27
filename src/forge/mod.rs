//! Forge-side identity and API access: which hosted repository a remote
//! points at, and how to ask the forge about pull requests.

pub mod api;
mod remotes;
mod repo;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{Api, GhCliClient, GraphQlClient};
pub use remotes::{ForgeRemote, ForgeRemotes, RemoteError};
pub use repo::RepoId;
