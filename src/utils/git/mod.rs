//! Local git transport for the working copy.
//!
//! Mutating operations (clone, checkout, add, commit, fetch, push) shell out
//! to the system `git` binary; read-only inspection (is this a repository,
//! which branch is active, where does `origin` point) goes through `gix`.

mod command;
mod remote;
mod repo;

pub use command::{Git, GitError, ensure_git_available};
pub use remote::full_name_from_url;
pub use repo::{active_branch, is_repository, remote_url};
