//! Staging caller-supplied paths and recording one commit.

use super::{CommitError, RepositorySession, Transcript};
use std::{
    ffi::OsString,
    fmt,
    path::PathBuf,
};

/// Name and email recorded as author and committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorIdentity {
    pub name: String,
    pub email: String,
}

impl AuthorIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for AuthorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Paths to stage plus the message and optional author of the commit.
///
/// Paths keep insertion order; duplicates are dropped.
#[derive(Debug, Clone, Default)]
pub struct ContentChange {
    paths: Vec<PathBuf>,
    message: String,
    author: Option<AuthorIdentity>,
}

impl ContentChange {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
        self
    }

    pub fn with_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().fold(self, Self::with_path)
    }

    pub fn with_author(mut self, author: AuthorIdentity) -> Self {
        self.author = Some(author);
        self
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitResult {
    Created { sha: String },
    /// Nothing differed from HEAD; no commit object was written.
    NoOp,
}

impl fmt::Display for CommitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { sha } => write!(f, "committed {}", short_sha(sha)),
            Self::NoOp => f.write_str("nothing to commit"),
        }
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

pub struct StagingCommitter<'s> {
    session: &'s RepositorySession,
    default_author: AuthorIdentity,
}

impl<'s> StagingCommitter<'s> {
    pub fn new(session: &'s RepositorySession, default_author: AuthorIdentity) -> Self {
        Self {
            session,
            default_author,
        }
    }

    /// Stage every path of `change` and commit them.
    ///
    /// All paths are checked before anything is staged; a missing one aborts
    /// with the index untouched.
    pub fn commit(&self, change: &ContentChange, log: &Transcript) -> Result<CommitResult, CommitError> {
        let message = change.message.trim();
        if message.is_empty() {
            return Err(CommitError::EmptyMessage);
        }
        let author = change.author.as_ref().unwrap_or(&self.default_author);

        self.session.with_working_copy(|copy| {
            let relative = change
                .paths
                .iter()
                .map(|path| {
                    copy.relative(path)
                        .ok_or_else(|| CommitError::PathNotFound { path: path.clone() })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let git = copy.git();
            if !relative.is_empty() {
                git.run(add_args(&relative))?;
                log.record("git", format!("staged {} path(s)", relative.len()));
            }

            if git.probe(["diff", "--cached", "--quiet"])? {
                log.record("git", "no changes to commit");
                return Ok(CommitResult::NoOp);
            }

            let name = format!("user.name={}", author.name);
            let email = format!("user.email={}", author.email);
            let author_arg = author.to_string();
            git.run([
                "-c",
                name.as_str(),
                "-c",
                email.as_str(),
                "commit",
                "--quiet",
                "-m",
                message,
                "--author",
                author_arg.as_str(),
            ])?;

            let sha = git.run(["rev-parse", "HEAD"])?;
            log.record("git", format!("commit {} by {author}", short_sha(&sha)));
            Ok(CommitResult::Created { sha })
        })
    }
}

fn add_args(paths: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["add".into(), "--".into()];
    args.extend(paths.iter().map(|p| p.as_os_str().to_owned()));
    args
}
