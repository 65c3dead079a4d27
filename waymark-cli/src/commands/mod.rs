//! Subcommand implementations.

pub mod common;
pub mod play;
pub mod route;
pub mod simulate;
