//! `[repo]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [repo]
//! upstream = "espressif/developer-portal"   # canonical repository (owner/name)
//! base_branch = "main"                      # new article branches start here
//! local_path = "~/quillpost/site"           # the single working copy
//! protocol = "ssh"                          # ssh | https
//! clone_timeout = 600                       # seconds
//! ```

use crate::{
    config::{ConfigDiagnostics, FieldPath},
    host::{CloneProtocol, RepoSlug},
    publish::BranchName,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// `owner/name` of the canonical repository.
    pub upstream: String,

    pub base_branch: String,

    /// Working copy location, relative to the config file's directory.
    pub local_path: PathBuf,

    pub protocol: CloneProtocol,

    /// Seconds before a clone is abandoned.
    pub clone_timeout: u64,
}

impl RepoConfig {
    pub const UPSTREAM: FieldPath = FieldPath::new("repo.upstream");
    pub const BASE_BRANCH: FieldPath = FieldPath::new("repo.base_branch");
    pub const LOCAL_PATH: FieldPath = FieldPath::new("repo.local_path");
    pub const CLONE_TIMEOUT: FieldPath = FieldPath::new("repo.clone_timeout");

    /// Parsed `upstream`; only valid after [`validate`](Self::validate) passed.
    pub fn upstream_slug(&self) -> Option<RepoSlug> {
        self.upstream.parse().ok()
    }

    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout)
    }

    /// Expand `~` and anchor a relative path at `root`.
    pub fn normalize(&mut self, root: &Path) {
        let raw = self.local_path.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        self.local_path = if expanded.is_relative() {
            root.join(expanded)
        } else {
            expanded
        };
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.upstream.trim().is_empty() {
            diag.error_with_hint(
                Self::UPSTREAM,
                "no upstream repository configured",
                "set `upstream = \"owner/name\"` under [repo]",
            );
        } else if self.upstream_slug().is_none() {
            diag.error(
                Self::UPSTREAM,
                format!("`{}` is not an owner/name pair", self.upstream),
            );
        }

        if BranchName::new(&self.base_branch).is_err() {
            diag.error(
                Self::BASE_BRANCH,
                format!("`{}` is not a valid branch name", self.base_branch),
            );
        }

        if self.local_path.as_os_str().is_empty() {
            diag.error(Self::LOCAL_PATH, "working copy path cannot be empty");
        }

        if self.clone_timeout == 0 {
            diag.error_with_hint(
                Self::CLONE_TIMEOUT,
                "timeout must be at least one second",
                "large sites with submodules may need 600 or more",
            );
        }
    }
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            upstream: String::new(),
            base_branch: "main".to_string(),
            local_path: PathBuf::from("site"),
            protocol: CloneProtocol::Ssh,
            clone_timeout: 600,
        }
    }
}
