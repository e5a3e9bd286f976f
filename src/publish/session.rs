//! The single local working copy and its lock.
//!
//! A [`RepositorySession`] owns one directory on disk. It clones the user's
//! fork into it on first use and afterwards only ever opens it. Every
//! operation that touches the directory runs under [`SessionLock`]: an
//! in-process mutex plus an advisory `flock` on a sibling file, so two CLI
//! invocations against the same copy also serialize.
//!
//! ```text
//! acquire()
//!    |
//!    +-- valid repository at local_path --> open (no network)
//!    |
//!    +-- non-repository content ---------> NotARepository
//!    |
//!    +-- absent / empty -----------------> ForkResolver -> git clone
//! ```

use super::{Credential, Fork, ForkResolver, SessionError, Transcript};
use crate::{
    host::{CloneProtocol, RemoteHost, RepoSlug},
    utils::{
        date::DateTimeUtc,
        git::{Git, GitError, active_branch, full_name_from_url, is_repository, remote_url},
    },
};
use parking_lot::{Mutex, MutexGuard};
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    time::Duration,
};

/// Where the working copy lives and what it is a copy of.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub local_path: PathBuf,
    pub upstream: RepoSlug,
    pub protocol: CloneProtocol,
    pub clone_timeout: Duration,
}

/// Observable state of the working copy after the last locked operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub local_path: PathBuf,
    /// `owner/name` parsed from the `origin` remote.
    pub remote_full_name: Option<String>,
    /// `None` when HEAD is detached.
    pub active_branch: Option<String>,
}

pub struct RepositorySession {
    options: SessionOptions,
    state: Mutex<Option<SessionHandle>>,
}

impl RepositorySession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: Mutex::new(None),
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.options.local_path
    }

    /// Handle recorded by the last locked operation, if any.
    pub fn snapshot(&self) -> Option<SessionHandle> {
        self.state.lock().clone()
    }

    /// Open the working copy, cloning today's fork when there is none.
    pub fn acquire(
        &self,
        host: &dyn RemoteHost,
        credential: &Credential,
        log: &Transcript,
    ) -> Result<SessionHandle, SessionError> {
        self.acquire_on(host, credential, DateTimeUtc::now(), log)
    }

    /// Like [`acquire`](Self::acquire), naming a new fork after `date`.
    pub fn acquire_on(
        &self,
        host: &dyn RemoteHost,
        credential: &Credential,
        date: DateTimeUtc,
        log: &Transcript,
    ) -> Result<SessionHandle, SessionError> {
        let mut lock = self.lock()?;
        let path = self.local_path();

        if is_repository(path) {
            let handle = inspect(path)?;
            log.record("git", format!("opened working copy at {}", path.display()));
            *lock.state = Some(handle.clone());
            return Ok(handle);
        }
        if has_content(path) {
            return Err(SessionError::NotARepository {
                path: path.to_path_buf(),
            });
        }

        let fork = self.resolver(host).resolve_on(credential, date, log)?;
        let handle = self.clone_fork(&fork, log)?;
        *lock.state = Some(handle.clone());
        Ok(handle)
    }

    /// Delete the working copy and clone today's fork again.
    ///
    /// The fork is resolved before anything is removed, so a host failure
    /// leaves the existing copy untouched.
    pub fn destroy_and_recreate(
        &self,
        host: &dyn RemoteHost,
        credential: &Credential,
        log: &Transcript,
    ) -> Result<SessionHandle, SessionError> {
        let mut lock = self.lock()?;
        *lock.state = None;

        let fork = self.resolver(host).resolve(credential, log)?;
        let path = self.local_path();
        if path.exists() {
            fs::remove_dir_all(path).map_err(|source| SessionError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log.record("git", format!("removed {}", path.display()));
        }

        let handle = self.clone_fork(&fork, log)?;
        *lock.state = Some(handle.clone());
        Ok(handle)
    }

    /// Run `f` against the working copy while holding the session lock.
    ///
    /// The [`WorkingCopy`] cannot outlive the call. The recorded handle is
    /// refreshed afterwards whether `f` succeeded or not.
    pub fn with_working_copy<T, E>(
        &self,
        f: impl FnOnce(&WorkingCopy<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<SessionError>,
    {
        let mut lock = self.lock()?;
        let path = self.local_path();

        if !is_repository(path) {
            let err = if has_content(path) {
                SessionError::NotARepository {
                    path: path.to_path_buf(),
                }
            } else {
                SessionError::NotAcquired {
                    path: path.to_path_buf(),
                }
            };
            return Err(err.into());
        }

        let copy = WorkingCopy {
            root: path,
            git: Git::new(path),
        };
        let result = f(&copy);
        *lock.state = inspect(path).ok();
        result
    }

    fn resolver<'h>(&'h self, host: &'h dyn RemoteHost) -> ForkResolver<'h> {
        ForkResolver::new(host, &self.options.upstream, self.options.protocol)
    }

    fn clone_fork(&self, fork: &Fork, log: &Transcript) -> Result<SessionHandle, SessionError> {
        let path = self.local_path();
        log.record(
            "clone",
            format!("cloning {} into {}", fork.full_name(), path.display()),
        );

        match Git::clone_repo(&fork.clone_url, path, self.options.clone_timeout) {
            Ok(()) => {}
            Err(GitError::TimedOut { secs, .. }) => {
                remove_partial(path);
                return Err(SessionError::CloneTimedOut { secs });
            }
            Err(GitError::Failed { stderr, .. }) => {
                remove_partial(path);
                return Err(SessionError::CloneFailed { stderr });
            }
            Err(err) => return Err(err.into()),
        }

        log.record("clone", format!("cloned {}", fork.full_name()));
        inspect(path)
    }

    fn lock(&self) -> Result<SessionLock<'_>, SessionError> {
        let state = self.state.lock();
        let lock_path = lock_file_path(self.local_path());
        let io_err = |source: io::Error| SessionError::Io {
            path: lock_path.clone(),
            source,
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(io_err)?;
        flock_exclusive(&file).map_err(io_err)?;

        Ok(SessionLock { state, _file: file })
    }
}

/// Held for the duration of one operation; the `flock` is released when the
/// file is closed on drop.
struct SessionLock<'a> {
    state: MutexGuard<'a, Option<SessionHandle>>,
    _file: File,
}

/// Borrowed view of the working copy inside a locked operation.
pub struct WorkingCopy<'a> {
    root: &'a Path,
    git: Git,
}

impl WorkingCopy<'_> {
    pub fn root(&self) -> &Path {
        self.root
    }

    pub fn git(&self) -> &Git {
        &self.git
    }

    pub fn active_branch(&self) -> Result<Option<String>, SessionError> {
        active_branch(self.root).map_err(|e| SessionError::Inspect(e.to_string()))
    }

    pub fn origin_url(&self) -> Result<Option<String>, SessionError> {
        remote_url(self.root, "origin").map_err(|e| SessionError::Inspect(e.to_string()))
    }

    /// `path` relative to the root, if it exists inside the working copy.
    ///
    /// Relative paths are taken from the root; absolute paths must point
    /// into it.
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let root = self.root.canonicalize().ok()?;
        let candidate = candidate.canonicalize().ok()?;
        let rel = candidate.strip_prefix(&root).ok()?;

        if rel.as_os_str().is_empty() {
            Some(PathBuf::from("."))
        } else {
            Some(rel.to_path_buf())
        }
    }
}

fn inspect(path: &Path) -> Result<SessionHandle, SessionError> {
    let inspect_err = |e: anyhow::Error| SessionError::Inspect(e.to_string());
    let branch = active_branch(path).map_err(inspect_err)?;
    let origin = remote_url(path, "origin").map_err(inspect_err)?;

    Ok(SessionHandle {
        local_path: path.to_path_buf(),
        remote_full_name: origin.as_deref().and_then(full_name_from_url),
        active_branch: branch,
    })
}

/// Anything other than a missing path or an empty directory.
fn has_content(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => path.exists(),
    }
}

fn remove_partial(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// Block until an exclusive `flock` is held on `file`.
fn flock_exclusive(file: &File) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::io::AsRawFd;
        // SAFETY: the descriptor is owned by `file` and stays open for the call.
        #[allow(unsafe_code)]
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    #[cfg(not(unix))]
    let _ = file;
    Ok(())
}

/// `.<dirname>.lock` next to the working copy.
fn lock_file_path(local_path: &Path) -> PathBuf {
    let name = local_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quillpost".to_string());
    let parent = local_path.parent().unwrap_or(Path::new("."));
    parent.join(format!(".{name}.lock"))
}
