//! Article and author files of a Hugo-style site.
//!
//! Everything here writes plain files under a [`ContentLayout`]; staging and
//! committing them is the publishing session's job.
//!
//! ```text
//! <root>/
//! ├── content/blog/<YYYY>/<MM>/<slug>/index.md   article
//! ├── content/authors/<name>/_index.md           author page
//! └── data/authors/<name>.json                   author record
//! ```

mod article;
mod author;

pub use article::{ArticleTemplate, ArticleWriter};
pub use author::AuthorStore;

use crate::utils::slug::author_key;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("title cannot be empty")]
    BlankTitle,

    #[error("author name cannot be empty")]
    BlankAuthor,

    #[error("`{0}` is not a usable author name (no path separators or leading dots)")]
    InvalidAuthor(String),

    #[error("`{0}` does not produce a usable slug")]
    EmptySlug(String),

    #[error("could not write `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode author record")]
    Json(#[from] serde_json::Error),
}

/// Where content lives, relative to the site root.
#[derive(Debug, Clone)]
pub struct ContentLayout {
    root: PathBuf,
    pub blog_dir: PathBuf,
    pub authors_dir: PathBuf,
    pub authors_data_dir: PathBuf,
}

impl ContentLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            blog_dir: PathBuf::from("content/blog"),
            authors_dir: PathBuf::from("content/authors"),
            authors_data_dir: PathBuf::from("data/authors"),
        }
    }

    pub fn blog(&self) -> PathBuf {
        self.root.join(&self.blog_dir)
    }

    pub fn authors(&self) -> PathBuf {
        self.root.join(&self.authors_dir)
    }

    pub fn authors_data(&self) -> PathBuf {
        self.root.join(&self.authors_data_dir)
    }
}

/// Author key that is safe to use as a single path component.
fn author_component(name: &str) -> Result<String, ContentError> {
    let key = author_key(name);
    if key.is_empty() {
        return Err(ContentError::BlankAuthor);
    }
    if key.starts_with('.') || key.contains(['/', '\\']) {
        return Err(ContentError::InvalidAuthor(name.trim().to_string()));
    }
    Ok(key)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ContentError> {
    let io_err = |source: io::Error| ContentError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}

/// Double-quoted YAML scalar.
///
/// JSON string syntax is a subset of YAML's double-quoted style.
fn yaml_quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
