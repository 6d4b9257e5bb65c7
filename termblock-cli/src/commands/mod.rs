//! Subcommand handlers.

pub mod demo;
pub mod fetch;
pub mod tree;
