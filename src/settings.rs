//! Values remembered between invocations.
//!
//! Stored as TOML in `.quillpost-state.toml` next to the config file. Only the
//! CLI reads or writes it; the publishing core takes everything as
//! parameters.
//!
//! ```toml
//! token = "ghp_..."
//! email = "jane@example.com"
//! article_dir = "/home/jane/site-work/content/blog/2024/03/my-first-post"
//! article_title = "My First Post"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

pub const SETTINGS_FILE: &str = ".quillpost-state.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub token: Option<String>,
    pub email: Option<String>,
    /// Directory of the last article written.
    pub article_dir: Option<PathBuf>,
    pub article_title: Option<String>,
}

impl Settings {
    /// Load from `path`; a missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Write to `path`, readable by the owner only on unix.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string(self).context("failed to encode settings")?;
        write_private(path, content.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Remember non-blank `token` and `email`; returns whether anything changed.
    pub fn remember_credentials(&mut self, token: Option<&str>, email: Option<&str>) -> bool {
        let before = (self.token.clone(), self.email.clone());
        if let Some(token) = non_blank(token) {
            self.token = Some(token);
        }
        if let Some(email) = non_blank(email) {
            self.email = Some(email);
        }
        before != (self.token.clone(), self.email.clone())
    }

    pub fn remember_article(&mut self, dir: &Path, title: &str) {
        self.article_dir = Some(dir.to_path_buf());
        self.article_title = Some(title.to_string());
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Write `bytes` to a file only the owner can read.
///
/// A new file is created with mode 0600; an existing one is narrowed to
/// 0600 before it is truncated and rewritten.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        write_all_truncated(file, bytes)
    }
    #[cfg(not(unix))]
    {
        write_all_truncated(options.open(path)?, bytes)
    }
}

fn write_all_truncated(mut file: fs::File, bytes: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.write_all(bytes)?;
    file.sync_all()
}
