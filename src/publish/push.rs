//! Reconciling the active branch with its remote counterpart.

use super::{Credential, CredentialValidator, PushError, RepositorySession, Transcript};
use crate::{
    host::{RemoteHost, RepoSlug},
    utils::git::{Git, GitError, full_name_from_url},
};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushResult {
    Pushed { branch: String },
    /// The remote branch already points at HEAD.
    UpToDate { branch: String },
}

impl fmt::Display for PushResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pushed { branch } => write!(f, "pushed {branch} to origin"),
            Self::UpToDate { branch } => write!(f, "{branch} is already up to date on origin"),
        }
    }
}

pub struct PushSynchronizer<'s> {
    session: &'s RepositorySession,
    host: &'s dyn RemoteHost,
}

impl<'s> PushSynchronizer<'s> {
    pub fn new(session: &'s RepositorySession, host: &'s dyn RemoteHost) -> Self {
        Self { session, host }
    }

    /// Push the active branch to `origin` under the same name.
    ///
    /// Permission on the origin repository is queried again on every call.
    /// A remote branch that is not an ancestor of HEAD is refused here,
    /// before git is asked to push; the push itself is never forced.
    pub fn push(&self, credential: &Credential, log: &Transcript) -> Result<PushResult, PushError> {
        self.session.with_working_copy(|copy| {
            let branch = copy.active_branch()?.ok_or(PushError::DetachedHead)?;
            let origin = copy.origin_url()?.ok_or(PushError::NoRemote)?;
            let repo = origin_repo(&origin)?;

            let level = CredentialValidator::new(self.host).check_permission(credential, &repo, log)?;
            if !level.can_publish() {
                return Err(PushError::Rejected {
                    reason: format!("{level} permission on {repo} does not allow pushing"),
                });
            }

            let git = copy.git();
            let head = git.run(["rev-parse", "HEAD"])?;
            if let Some(remote) = remote_head(git, &branch)? {
                if remote == head {
                    log.record("git", format!("{branch} is up to date"));
                    return Ok(PushResult::UpToDate { branch });
                }
                ensure_fast_forward(git, &branch, &remote)?;
            }

            let refspec = format!("{branch}:{branch}");
            match git.run(["push", "--quiet", "origin", refspec.as_str()]) {
                Ok(_) => {}
                Err(GitError::Failed { stderr, .. }) => {
                    return Err(PushError::Rejected { reason: stderr });
                }
                Err(err) => return Err(err.into()),
            }
            log.record("git", format!("push origin {refspec}"));

            Ok(PushResult::Pushed { branch })
        })
    }
}

fn origin_repo(url: &str) -> Result<RepoSlug, PushError> {
    full_name_from_url(url)
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| PushError::Rejected {
            reason: format!("cannot tell which repository `{url}` refers to"),
        })
}

/// Commit the remote branch points at, `None` if it does not exist yet.
fn remote_head(git: &Git, branch: &str) -> Result<Option<String>, PushError> {
    let reference = format!("refs/heads/{branch}");
    let listing = git.run(["ls-remote", "--heads", "origin", reference.as_str()])?;
    Ok(listing
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .find(|(_, name)| *name == reference)
        .map(|(sha, _)| sha.to_string()))
}

fn ensure_fast_forward(git: &Git, branch: &str, remote: &str) -> Result<(), PushError> {
    git.run(["fetch", "--quiet", "origin", branch])?;
    if git.probe(["merge-base", "--is-ancestor", remote, "HEAD"])? {
        Ok(())
    } else {
        Err(PushError::Rejected {
            reason: format!(
                "origin/{branch} has commits that are not in the local branch (non-fast-forward)"
            ),
        })
    }
}
