//! In-memory [`RemoteHost`] for tests.
//!
//! Forks are materialised as bare repositories on disk (cloned from a local
//! "upstream" bare repository) so the session can clone and push to them
//! without network access.

use super::{HostError, Identity, PermissionLevel, RemoteHost, RepoDescriptor, RepoSlug};
use crate::utils::git::Git;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use std::{
    collections::HashMap,
    ffi::OsStr,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

pub struct MockHost {
    token: String,
    identity: Identity,
    permissions: Mutex<HashMap<String, PermissionLevel>>,
    default_permission: PermissionLevel,
    repos: Mutex<Vec<RepoDescriptor>>,
    /// Local bare repository forks are cloned from.
    upstream: Option<PathBuf>,
    /// Directory receiving `<owner>/<name>.git` fork repositories.
    forks_dir: Option<PathBuf>,
    reject_forks: bool,
    calls: AtomicUsize,
}

impl MockHost {
    /// Host accepting `token` for user `login` with `admin` everywhere.
    pub fn new(token: &str, login: &str) -> Self {
        Self {
            token: token.to_string(),
            identity: Identity {
                login: login.to_string(),
                email: None,
            },
            permissions: Mutex::new(HashMap::new()),
            default_permission: PermissionLevel::Admin,
            repos: Mutex::new(Vec::new()),
            upstream: None,
            forks_dir: None,
            reject_forks: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.identity.email = Some(email.to_string());
        self
    }

    pub fn with_default_permission(mut self, level: PermissionLevel) -> Self {
        self.default_permission = level;
        self
    }

    /// Back created forks with bare clones of `upstream` under `forks_dir`.
    pub fn with_git_backing(mut self, upstream: PathBuf, forks_dir: PathBuf) -> Self {
        self.upstream = Some(upstream);
        self.forks_dir = Some(forks_dir);
        self
    }

    pub fn rejecting_forks(mut self) -> Self {
        self.reject_forks = true;
        self
    }

    pub fn set_permission(&self, full_name: &str, level: PermissionLevel) {
        self.permissions.lock().insert(full_name.to_string(), level);
    }

    /// Pre-populate the user's repository list.
    pub fn add_repo(&self, name: &str, fork: bool) {
        let repo = self.descriptor(name, fork);
        self.repos.lock().push(repo);
    }

    pub fn repos(&self) -> Vec<RepoDescriptor> {
        self.repos.lock().clone()
    }

    /// Total number of host calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn descriptor(&self, name: &str, fork: bool) -> RepoDescriptor {
        let owner = &self.identity.login;
        let url = match &self.forks_dir {
            Some(dir) => dir.join(owner).join(format!("{name}.git")).display().to_string(),
            None => format!("git@example.test:{owner}/{name}.git"),
        };
        RepoDescriptor {
            owner: owner.clone(),
            name: name.to_string(),
            fork,
            ssh_url: url.clone(),
            clone_url: url,
        }
    }

    fn check(&self, token: &SecretString) -> Result<(), HostError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token.expose_secret() == self.token {
            Ok(())
        } else {
            Err(HostError::Unauthorized)
        }
    }
}

impl RemoteHost for MockHost {
    fn authenticate(&self, token: &SecretString) -> Result<Identity, HostError> {
        self.check(token)?;
        Ok(self.identity.clone())
    }

    fn permission(
        &self,
        token: &SecretString,
        _username: &str,
        repo: &RepoSlug,
    ) -> Result<PermissionLevel, HostError> {
        self.check(token)?;
        let level = self
            .permissions
            .lock()
            .get(&repo.to_string())
            .copied()
            .unwrap_or(self.default_permission);
        Ok(level)
    }

    fn list_user_repositories(&self, token: &SecretString) -> Result<Vec<RepoDescriptor>, HostError> {
        self.check(token)?;
        Ok(self.repos())
    }

    fn create_fork(
        &self,
        token: &SecretString,
        _base: &RepoSlug,
        name: &str,
    ) -> Result<RepoDescriptor, HostError> {
        self.check(token)?;
        if self.reject_forks {
            return Err(HostError::Http {
                status: 403,
                message: "fork quota exceeded".to_string(),
            });
        }

        let repo = self.descriptor(name, true);
        if let (Some(upstream), Some(_)) = (&self.upstream, &self.forks_dir) {
            let dest = PathBuf::from(&repo.clone_url);
            std::fs::create_dir_all(dest.parent().unwrap_or(&dest))
                .map_err(|e| HostError::Transport(e.to_string()))?;
            Git::new(upstream)
                .run([
                    OsStr::new("clone"),
                    OsStr::new("--bare"),
                    OsStr::new("--quiet"),
                    upstream.as_os_str(),
                    dest.as_os_str(),
                ])
                .map_err(|e| HostError::Transport(e.to_string()))?;
        }

        self.repos.lock().push(repo.clone());
        Ok(repo)
    }
}
