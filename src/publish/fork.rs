//! Personal fork resolution.
//!
//! Fork names follow `{base}_{user}_{YYYY-MM-DD}`: one fork per user per
//! day, traceable to the session that created it.

use super::{Credential, ForkError, Transcript};
use crate::{
    host::{CloneProtocol, RemoteHost, RepoSlug},
    utils::{
        date::DateTimeUtc,
        slug::{SlugSeparator, slugify},
    },
};
use std::fmt;

/// A personal fork ready to be cloned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fork {
    pub owner: String,
    pub name: String,
    pub clone_url: String,
    /// Created by this resolution rather than reused.
    pub is_new: bool,
}

impl Fork {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_new {
            write!(f, "created new fork {}", self.full_name())
        } else {
            write!(f, "using existing fork {}", self.full_name())
        }
    }
}

/// Deterministic fork name for `upstream`, `username` and `date`.
///
/// ```ignore
/// fork_name(&"org/site".parse()?, "alice", DateTimeUtc::from_ymd(2024, 3, 1))
///     == "site_alice_2024-03-01"
/// ```
pub fn fork_name(upstream: &RepoSlug, username: &str, date: DateTimeUtc) -> String {
    let base = slugify(&upstream.name, SlugSeparator::Underscore);
    format!("{base}_{username}_{}", date.ymd())
}

pub struct ForkResolver<'h> {
    host: &'h dyn RemoteHost,
    upstream: &'h RepoSlug,
    protocol: CloneProtocol,
}

impl<'h> ForkResolver<'h> {
    pub fn new(host: &'h dyn RemoteHost, upstream: &'h RepoSlug, protocol: CloneProtocol) -> Self {
        Self {
            host,
            upstream,
            protocol,
        }
    }

    /// Find or create today's fork.
    pub fn resolve(&self, credential: &Credential, log: &Transcript) -> Result<Fork, ForkError> {
        self.resolve_on(credential, DateTimeUtc::now(), log)
    }

    /// Find or create the fork named for `date`.
    ///
    /// A same-named repository that is not a fork is never reused.
    pub fn resolve_on(
        &self,
        credential: &Credential,
        date: DateTimeUtc,
        log: &Transcript,
    ) -> Result<Fork, ForkError> {
        let name = fork_name(self.upstream, &credential.username, date);
        let token = credential.token();

        let repos = self
            .host
            .list_user_repositories(token)
            .map_err(|source| ForkError::ListFailed {
                user: credential.username.clone(),
                source,
            })?;

        if let Some(existing) = repos.iter().find(|r| r.name == name) {
            if !existing.fork {
                return Err(ForkError::NameTaken {
                    full_name: existing.full_name(),
                });
            }
            let fork = Fork {
                owner: existing.owner.clone(),
                name: existing.name.clone(),
                clone_url: existing.url(self.protocol).to_string(),
                is_new: false,
            };
            log.record("fork", fork.to_string());
            return Ok(fork);
        }

        let created = self
            .host
            .create_fork(token, self.upstream, &name)
            .map_err(|e| ForkError::CreateFailed {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        let fork = Fork {
            owner: created.owner.clone(),
            name: created.name.clone(),
            clone_url: created.url(self.protocol).to_string(),
            is_new: true,
        };
        log.record("fork", fork.to_string());
        Ok(fork)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{host::mock::MockHost, publish::CredentialValidator};

    fn upstream() -> RepoSlug {
        RepoSlug::new("org", "site")
    }

    fn credential(host: &MockHost) -> Credential {
        CredentialValidator::new(host)
            .validate(Some("T1"), None, &Transcript::new())
            .unwrap()
    }

    #[test]
    fn test_fork_name_policy() {
        let day = DateTimeUtc::from_ymd(2024, 3, 1);
        assert_eq!(fork_name(&upstream(), "alice", day), "site_alice_2024-03-01");

        let portal = RepoSlug::new("espressif", "developer-portal");
        assert_eq!(
            fork_name(&portal, "bob", day),
            "developer_portal_bob_2024-03-01"
        );
    }

    #[test]
    fn test_fork_name_is_per_day() {
        let a = fork_name(&upstream(), "alice", DateTimeUtc::from_ymd(2024, 3, 1));
        let b = fork_name(&upstream(), "alice", DateTimeUtc::from_ymd(2024, 3, 1));
        let c = fork_name(&upstream(), "alice", DateTimeUtc::from_ymd(2024, 3, 2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_creates_then_reuses() {
        let host = MockHost::new("T1", "alice");
        let cred = credential(&host);
        let up = upstream();
        let resolver = ForkResolver::new(&host, &up, CloneProtocol::Ssh);
        let day = DateTimeUtc::from_ymd(2024, 3, 1);
        let log = Transcript::new();

        let first = resolver.resolve_on(&cred, day, &log).unwrap();
        assert!(first.is_new);
        assert_eq!(first.full_name(), "alice/site_alice_2024-03-01");

        let second = resolver.resolve_on(&cred, day, &log).unwrap();
        assert!(!second.is_new);
        assert_eq!(second.name, first.name);
        assert_eq!(host.repos().len(), 1);
        assert!(log.contains("using existing fork"));
    }

    #[test]
    fn test_non_fork_with_same_name_is_refused() {
        let host = MockHost::new("T1", "alice");
        host.add_repo("site_alice_2024-03-01", false);
        let cred = credential(&host);
        let up = upstream();

        let err = ForkResolver::new(&host, &up, CloneProtocol::Ssh)
            .resolve_on(&cred, DateTimeUtc::from_ymd(2024, 3, 1), &Transcript::new())
            .unwrap_err();
        assert!(matches!(err, ForkError::NameTaken { .. }));
        assert_eq!(host.repos().len(), 1);
    }

    #[test]
    fn test_older_fork_is_not_reused() {
        let host = MockHost::new("T1", "alice");
        host.add_repo("site_alice_2024-02-29", true);
        let cred = credential(&host);
        let up = upstream();

        let fork = ForkResolver::new(&host, &up, CloneProtocol::Ssh)
            .resolve_on(&cred, DateTimeUtc::from_ymd(2024, 3, 1), &Transcript::new())
            .unwrap();
        assert!(fork.is_new);
        assert_eq!(fork.name, "site_alice_2024-03-01");
    }

    #[test]
    fn test_create_failure_is_distinct() {
        let host = MockHost::new("T1", "alice").rejecting_forks();
        let cred = credential(&host);
        let up = upstream();

        let err = ForkResolver::new(&host, &up, CloneProtocol::Ssh)
            .resolve_on(&cred, DateTimeUtc::from_ymd(2024, 3, 1), &Transcript::new())
            .unwrap_err();
        match err {
            ForkError::CreateFailed { name, reason } => {
                assert_eq!(name, "site_alice_2024-03-01");
                assert!(reason.contains("quota"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
