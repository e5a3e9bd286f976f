//! Configuration management for `quillpost.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── repo       # [repo]
//! │   ├── host       # [host]
//! │   ├── content    # [content]
//! │   └── commit     # [commit]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # PublishConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                              |
//! |-------------|------------------------------------------------------|
//! | `[repo]`    | Upstream repo, base branch, working copy, protocol   |
//! | `[host]`    | Forge API URL and user agent                         |
//! | `[content]` | Blog/author directories, front matter defaults       |
//! | `[commit]`  | Default commit identity and message templates        |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{CommitConfig, ContentConfig, HostConfig, RepoConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{log, publish::SessionOptions, settings::SETTINGS_FILE};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "quillpost.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing quillpost.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory holding the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub repo: RepoConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub commit: CommitConfig,
}

impl PublishConfig {
    /// Find `config_name` upward from cwd, parse, normalize and validate it.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(config_name, &cwd)
            .ok_or_else(|| ConfigError::NotFound(config_name.to_path_buf()))?;

        let mut config = Self::from_path(&config_path)?;
        config.finalize(&config_path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Anchor paths at the config file's directory.
    fn finalize(&mut self, config_path: &Path) {
        self.config_path = config_path.to_path_buf();
        self.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.repo.normalize(&self.root);
    }

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.repo.validate(&mut diag);
        self.host.validate(&mut diag);
        self.content.validate(&mut diag);
        self.commit.validate(&mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Caller settings file next to the config.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn session_options(&self) -> Result<SessionOptions> {
        let upstream = self
            .repo
            .upstream_slug()
            .ok_or_else(|| anyhow!("invalid upstream `{}`", self.repo.upstream))?;
        Ok(SessionOptions {
            local_path: self.repo.local_path.clone(),
            upstream,
            protocol: self.repo.protocol,
            clone_timeout: self.repo.clone_timeout(),
        })
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with a valid `[repo]` upstream prepended.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> PublishConfig {
    let config = if extra.contains("[repo]") {
        extra.to_string()
    } else {
        format!("[repo]\nupstream = \"org/site\"\n{extra}")
    };
    let (parsed, ignored) = PublishConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
