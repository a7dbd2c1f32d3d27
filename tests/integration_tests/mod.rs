pub mod branch;
pub mod cli;
pub mod pr_view;
pub mod repo;
