//! One branch per content item, rooted at the base branch.

use super::{BranchError, RepositorySession, Transcript};
use crate::utils::{
    git::Git,
    slug::{SlugSeparator, slugify},
};
use std::fmt;

/// Prefix of branches created for articles.
const ARTICLE_PREFIX: &str = "article/";

/// A branch name git will accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(String);

impl BranchName {
    pub fn new(name: &str) -> Result<Self, BranchError> {
        let name = name.trim();
        if is_valid_ref_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(BranchError::InvalidName(name.to_string()))
        }
    }

    /// `article/<title slug with underscores>`.
    pub fn for_article(title: &str) -> Result<Self, BranchError> {
        let slug = slugify(title, SlugSeparator::Underscore);
        if slug.is_empty() {
            return Err(BranchError::InvalidName(title.to_string()));
        }
        Ok(Self(format!("{ARTICLE_PREFIX}{slug}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subset of `git check-ref-format --branch` rules.
fn is_valid_ref_name(name: &str) -> bool {
    const FORBIDDEN: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

    !name.is_empty()
        && name != "@"
        && !name.starts_with(['-', '/', '.'])
        && !name.ends_with(['/', '.'])
        && !name.ends_with(".lock")
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("@{")
        && !name.contains("/.")
        && !name.chars().any(|c| c.is_control() || FORBIDDEN.contains(&c))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    Created { name: String },
    /// The branch already existed and is now checked out.
    Resumed { name: String },
}

impl fmt::Display for BranchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { name } => write!(f, "created branch {name}"),
            Self::Resumed { name } => write!(f, "switched to existing branch {name}"),
        }
    }
}

pub struct BranchController<'s> {
    session: &'s RepositorySession,
}

impl<'s> BranchController<'s> {
    pub fn new(session: &'s RepositorySession) -> Self {
        Self { session }
    }

    /// Check out `name`, creating it from `base` when it does not exist.
    ///
    /// Never deletes or resets an existing branch, so calling this again
    /// for the same content item resumes where the author left off.
    pub fn start_branch(
        &self,
        base: &str,
        name: &BranchName,
        log: &Transcript,
    ) -> Result<BranchOutcome, BranchError> {
        self.session.with_working_copy(|copy| {
            let git = copy.git();

            if !has_branch(git, base)? && !has_remote_branch(git, base)? {
                return Err(BranchError::BaseBranchMissing {
                    base: base.to_string(),
                });
            }

            let name = name.as_str();
            if has_branch(git, name)? {
                git.run(["checkout", "--quiet", name])?;
                log.record("git", format!("checkout {name}"));
                return Ok(BranchOutcome::Resumed {
                    name: name.to_string(),
                });
            }

            git.run(["checkout", "--quiet", base])?;
            log.record("git", format!("checkout {base}"));
            git.run(["checkout", "--quiet", "-b", name])?;
            log.record("git", format!("checkout -b {name}"));

            Ok(BranchOutcome::Created {
                name: name.to_string(),
            })
        })
    }
}

fn has_branch(git: &Git, name: &str) -> Result<bool, BranchError> {
    let reference = format!("refs/heads/{name}");
    Ok(git.probe(["show-ref", "--verify", "--quiet", reference.as_str()])?)
}

fn has_remote_branch(git: &Git, name: &str) -> Result<bool, BranchError> {
    let reference = format!("refs/remotes/origin/{name}");
    Ok(git.probe(["show-ref", "--verify", "--quiet", reference.as_str()])?)
}
