//! Command-line interface module.
//!
//! Each command returns an [`Outcome`] line; `main` prints it, or the error
//! chain when the command failed.

mod args;
mod article;
mod author;
mod check;
pub mod common;
mod fork;
mod workflow;

pub use args::{AuthorCommand, Cli, Commands};
pub use article::new_article;
pub use author::{list_authors, new_author};
pub use check::check_credentials;
pub use common::Context;
pub use fork::prepare_fork;
pub use workflow::{commit_changes, push_branch, switch_branch};

use std::fmt;

/// Final status of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    /// Completed, but the user should act on something.
    Warning(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(msg) | Self::Warning(msg) => f.write_str(msg),
        }
    }
}
