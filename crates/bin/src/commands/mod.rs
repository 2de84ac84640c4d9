//! Subcommand implementations.

pub mod about;
pub mod info;
pub mod projects;
pub mod upload;
