//! Remote forge capability.
//!
//! The publishing core never speaks HTTP itself; it asks a [`RemoteHost`]
//! who a token belongs to, what it may do on a repository, which
//! repositories the user owns, and to create forks.
//!
//! ```text
//! RemoteHost (trait)
//!     |
//!     +-- GitHubHost   REST v3 over a blocking reqwest client
//!     |
//!     +-- MockHost     in-memory double for tests (cfg(test))
//! ```

mod github;
#[cfg(test)]
pub mod mock;

pub use github::GitHubHost;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

// ============================================================================
// Permission
// ============================================================================

/// Effective permission of a user on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    #[default]
    None,
    Read,
    Write,
    Admin,
}

impl PermissionLevel {
    /// Map the forge's permission strings.
    ///
    /// `maintain` and `triage` are GitHub role names that sit between the
    /// classic levels.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "write" | "maintain" | "push" => Self::Write,
            "read" | "triage" | "pull" => Self::Read,
            _ => Self::None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }

    /// Whether branches may be created and pushed.
    pub fn can_publish(self) -> bool {
        self >= Self::Write
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Repository identifiers
// ============================================================================

/// `owner/name` of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not an `owner/name` repository identifier")]
pub struct InvalidRepoSlug(pub String);

impl FromStr for RepoSlug {
    type Err = InvalidRepoSlug;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(".git");
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(InvalidRepoSlug(s.to_string())),
        }
    }
}

/// URL scheme used to clone and push the fork.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneProtocol {
    /// `git@host:owner/repo.git` (default, uses the user's SSH keys).
    #[default]
    Ssh,
    /// `https://host/owner/repo.git` (uses the user's credential helper).
    Https,
}

/// A repository as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    pub owner: String,
    pub name: String,
    /// Whether the host flags this repository as a fork.
    pub fork: bool,
    pub ssh_url: String,
    pub clone_url: String,
}

impl RepoDescriptor {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn url(&self, protocol: CloneProtocol) -> &str {
        match protocol {
            CloneProtocol::Ssh => &self.ssh_url,
            CloneProtocol::Https => &self.clone_url,
        }
    }
}

/// The user a token authenticates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub login: String,
    /// Public profile email, when the user exposes one.
    pub email: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum HostError {
    #[error("token was rejected by the host")]
    Unauthorized,

    #[error("host returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request to host failed: {0}")]
    Transport(String),

    #[error("unexpected response from host: {0}")]
    Decode(String),
}

// ============================================================================
// Trait
// ============================================================================

/// Operations the publishing core needs from the forge.
///
/// Implementations are blocking; the core issues one call at a time.
pub trait RemoteHost: Send + Sync {
    /// Resolve the identity behind `token`.
    fn authenticate(&self, token: &SecretString) -> Result<Identity, HostError>;

    /// Permission of `username` on `repo`.
    fn permission(
        &self,
        token: &SecretString,
        username: &str,
        repo: &RepoSlug,
    ) -> Result<PermissionLevel, HostError>;

    /// Repositories owned by the authenticated user.
    fn list_user_repositories(&self, token: &SecretString) -> Result<Vec<RepoDescriptor>, HostError>;

    /// Fork `base` into the authenticated user's account as `name`.
    fn create_fork(
        &self,
        token: &SecretString,
        base: &RepoSlug,
        name: &str,
    ) -> Result<RepoDescriptor, HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_ordering() {
        assert!(PermissionLevel::None < PermissionLevel::Read);
        assert!(PermissionLevel::Read < PermissionLevel::Write);
        assert!(PermissionLevel::Write < PermissionLevel::Admin);
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!(PermissionLevel::parse("admin"), PermissionLevel::Admin);
        assert_eq!(PermissionLevel::parse("WRITE"), PermissionLevel::Write);
        assert_eq!(PermissionLevel::parse("maintain"), PermissionLevel::Write);
        assert_eq!(PermissionLevel::parse("triage"), PermissionLevel::Read);
        assert_eq!(PermissionLevel::parse("read"), PermissionLevel::Read);
        assert_eq!(PermissionLevel::parse("none"), PermissionLevel::None);
        assert_eq!(PermissionLevel::parse("bogus"), PermissionLevel::None);
    }

    #[test]
    fn test_can_publish() {
        assert!(PermissionLevel::Admin.can_publish());
        assert!(PermissionLevel::Write.can_publish());
        assert!(!PermissionLevel::Read.can_publish());
        assert!(!PermissionLevel::None.can_publish());
    }

    #[test]
    fn test_repo_slug_parse() {
        let slug: RepoSlug = "espressif/developer-portal".parse().unwrap();
        assert_eq!(slug, RepoSlug::new("espressif", "developer-portal"));
        assert_eq!(slug.to_string(), "espressif/developer-portal");

        assert!("org/site.git".parse::<RepoSlug>().is_ok());
        assert!("site".parse::<RepoSlug>().is_err());
        assert!("/site".parse::<RepoSlug>().is_err());
        assert!("a/b/c".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn test_descriptor_url_by_protocol() {
        let repo = RepoDescriptor {
            owner: "alice".into(),
            name: "site".into(),
            fork: true,
            ssh_url: "git@github.com:alice/site.git".into(),
            clone_url: "https://github.com/alice/site.git".into(),
        };
        assert_eq!(repo.url(CloneProtocol::Ssh), "git@github.com:alice/site.git");
        assert_eq!(repo.url(CloneProtocol::Https), "https://github.com/alice/site.git");
        assert_eq!(repo.full_name(), "alice/site");
    }
}
