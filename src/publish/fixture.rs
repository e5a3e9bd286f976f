//! On-disk git fixtures for publishing tests.
//!
//! Layout under one temporary directory:
//!
//! ```text
//! upstream/org/site.git     bare "canonical" repository, branch main
//! forks/alice/<fork>.git    bare forks created by MockHost
//! work/site                 the session's working copy
//! ```

use super::{
    Credential, CredentialValidator, RepositorySession, SessionError, SessionOptions, Transcript,
};
use crate::{
    host::{CloneProtocol, RepoSlug, mock::MockHost},
    utils::git::Git,
};
use std::{ffi::OsStr, fs, path::PathBuf, time::Duration};
use tempfile::TempDir;

pub const TOKEN: &str = "T1";
pub const USER: &str = "alice";

const IDENTITY: [&str; 4] = [
    "-c",
    "user.name=Fixture",
    "-c",
    "user.email=fixture@example.test",
];

pub struct Fixture {
    pub dir: TempDir,
    pub host: MockHost,
    pub session: RepositorySession,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let upstream = build_upstream(&dir);
        let host = MockHost::new(TOKEN, USER)
            .with_git_backing(upstream, dir.path().join("forks"));
        let session = RepositorySession::new(SessionOptions {
            local_path: dir.path().join("work").join("site"),
            upstream: RepoSlug::new("org", "site"),
            protocol: CloneProtocol::Ssh,
            clone_timeout: Duration::from_secs(60),
        });

        Self {
            dir,
            host,
            session,
        }
    }

    /// A host that accepts the fixture token but refuses to create forks.
    pub fn host_rejecting_forks() -> MockHost {
        MockHost::new(TOKEN, USER).rejecting_forks()
    }

    pub fn credential(&self) -> Credential {
        CredentialValidator::new(&self.host)
            .validate(Some(TOKEN), None, &Transcript::new())
            .unwrap()
    }

    /// Write `name` in the working copy and commit it on the current branch.
    pub fn commit_file(&self, name: &str, contents: &str) {
        self.session
            .with_working_copy(|copy| {
                fs::write(copy.root().join(name), contents).unwrap();
                let git = copy.git();
                git.run(["add", "--", name])?;
                git.run(IDENTITY.into_iter().chain(["commit", "--quiet", "-m", name]))?;
                Ok::<_, SessionError>(())
            })
            .unwrap();
    }

    /// Bare repository path of a fork created by the mock host.
    pub fn fork_path(&self, full_name: &str) -> PathBuf {
        self.dir.path().join("forks").join(format!("{full_name}.git"))
    }

    pub fn fork_has_branch(&self, full_name: &str, branch: &str) -> bool {
        let reference = format!("refs/heads/{branch}");
        Git::new(self.fork_path(full_name))
            .probe(["show-ref", "--verify", "--quiet", reference.as_str()])
            .unwrap()
    }

    /// Advance `branch` of the fork from a second clone.
    pub fn push_foreign_commit(&self, full_name: &str, branch: &str, file: &str) {
        let other = self.dir.path().join("other");
        let fork = self.fork_path(full_name);
        Git::new(self.dir.path())
            .run([
                OsStr::new("clone"),
                OsStr::new("--quiet"),
                fork.as_os_str(),
                other.as_os_str(),
            ])
            .unwrap();

        let git = Git::new(&other);
        git.run(["checkout", "--quiet", branch]).unwrap();
        fs::write(other.join(file), "foreign").unwrap();
        git.run(["add", "--", file]).unwrap();
        git.run(IDENTITY.into_iter().chain(["commit", "--quiet", "-m", file]))
            .unwrap();
        git.run(["push", "--quiet", "origin", branch]).unwrap();
    }
}

/// `upstream/org/site.git` with one commit on `main`.
fn build_upstream(dir: &TempDir) -> PathBuf {
    let seed = dir.path().join("seed");
    fs::create_dir_all(&seed).unwrap();
    let git = Git::new(&seed);
    git.run(["init", "--quiet"]).unwrap();
    git.run(["checkout", "--quiet", "-b", "main"]).unwrap();
    fs::write(seed.join("README.md"), "# site\n").unwrap();
    git.run(["add", "--", "README.md"]).unwrap();
    git.run(IDENTITY.into_iter().chain(["commit", "--quiet", "-m", "init"]))
        .unwrap();

    let upstream = dir.path().join("upstream").join("org").join("site.git");
    fs::create_dir_all(upstream.parent().unwrap()).unwrap();
    git.run([
        OsStr::new("clone"),
        OsStr::new("--bare"),
        OsStr::new("--quiet"),
        seed.as_os_str(),
        upstream.as_os_str(),
    ])
    .unwrap();
    upstream
}
