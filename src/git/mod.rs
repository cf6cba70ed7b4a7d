//! Git operations, using the system `git` binary like the toolchains do.

mod command_builder;

pub use command_builder::{GitCommand, GitCommandOutput};
