//! Error taxonomy of the publishing core.
//!
//! Each component returns its own error type; none of them is fatal to the
//! process and none leaves the working copy in a state that blocks a retry.

use crate::{host::HostError, utils::git::GitError};
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or missing token")]
    InvalidToken,

    #[error("permission lookup failed: {0}")]
    LookupFailed(#[source] HostError),
}

#[derive(Debug, Error)]
pub enum ForkError {
    #[error("could not list repositories of `{user}`: {source}")]
    ListFailed {
        user: String,
        #[source]
        source: HostError,
    },

    #[error("`{full_name}` already exists and is not a fork; refusing to publish into it")]
    NameTaken { full_name: String },

    #[error("creating fork `{name}` was rejected: {reason}")]
    CreateFailed { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("clone failed: {stderr}")]
    CloneFailed { stderr: String },

    #[error("clone did not finish within {secs}s")]
    CloneTimedOut { secs: u64 },

    #[error("`{}` exists but is not a git repository; recreate the working copy", path.display())]
    NotARepository { path: PathBuf },

    #[error("no working copy at `{}`; acquire the session first", path.display())]
    NotAcquired { path: PathBuf },

    #[error(transparent)]
    Fork(#[from] ForkError),

    #[error("could not prepare `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not inspect working copy: {0}")]
    Inspect(String),

    #[error(transparent)]
    Git(#[from] GitError),
}

#[derive(Debug, Error)]
pub enum BranchError {
    #[error("base branch `{base}` exists neither locally nor on origin")]
    BaseBranchMissing { base: String },

    #[error("`{0}` is not a valid branch name")]
    InvalidName(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Git(#[from] GitError),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("path `{}` does not exist in the working copy", path.display())]
    PathNotFound { path: PathBuf },

    #[error("commit message cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Git(#[from] GitError),
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push rejected: {reason}")]
    Rejected { reason: String },

    #[error("no `origin` remote configured; was the session acquired?")]
    NoRemote,

    #[error("HEAD is detached; check out a branch before pushing")]
    DetachedHead,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Git(#[from] GitError),
}
