//! `[content]` section configuration.
//!
//! ```toml
//! [content]
//! blog_dir = "content/blog"
//! authors_dir = "content/authors"
//! authors_data_dir = "data/authors"
//! summary = "This article explains many useful things."
//! tags = ["ESP-IDF"]
//! default_author = "espressif"
//! ```

use crate::{
    config::{ConfigDiagnostics, FieldPath},
    content::{ArticleTemplate, ContentLayout},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directories below are relative to the working copy root.
    pub blog_dir: PathBuf,
    pub authors_dir: PathBuf,
    pub authors_data_dir: PathBuf,

    /// Front matter `summary` of new articles.
    pub summary: String,
    /// Front matter `tags` of new articles.
    pub tags: Vec<String>,

    /// Author preselected by `author list` when present.
    pub default_author: String,
}

impl ContentConfig {
    pub const BLOG_DIR: FieldPath = FieldPath::new("content.blog_dir");
    pub const AUTHORS_DIR: FieldPath = FieldPath::new("content.authors_dir");
    pub const AUTHORS_DATA_DIR: FieldPath = FieldPath::new("content.authors_data_dir");

    /// Layout of content inside the working copy at `root`.
    pub fn layout(&self, root: &Path) -> ContentLayout {
        let mut layout = ContentLayout::new(root);
        layout.blog_dir = self.blog_dir.clone();
        layout.authors_dir = self.authors_dir.clone();
        layout.authors_data_dir = self.authors_data_dir.clone();
        layout
    }

    pub fn template(&self) -> ArticleTemplate {
        ArticleTemplate {
            summary: self.summary.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Content directories must stay inside the working copy.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, path) in [
            (Self::BLOG_DIR, &self.blog_dir),
            (Self::AUTHORS_DIR, &self.authors_dir),
            (Self::AUTHORS_DATA_DIR, &self.authors_data_dir),
        ] {
            if path.is_absolute() || path.components().any(|c| c.as_os_str() == "..") {
                diag.error_with_hint(
                    field,
                    format!("`{}` must be relative to the repository root", path.display()),
                    "use a path like \"content/blog\"",
                );
            } else if path.as_os_str().is_empty() {
                diag.error(field, "directory cannot be empty");
            }
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        let template = ArticleTemplate::default();
        Self {
            blog_dir: PathBuf::from("content/blog"),
            authors_dir: PathBuf::from("content/authors"),
            authors_data_dir: PathBuf::from("data/authors"),
            summary: template.summary,
            tags: template.tags,
            default_author: "espressif".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};
    use std::path::{Path, PathBuf};

    #[test]
    fn test_content_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.content.blog_dir, PathBuf::from("content/blog"));
        assert_eq!(config.content.tags, vec!["ESP-IDF"]);
        assert_eq!(config.content.default_author, "espressif");
    }

    #[test]
    fn test_layout_uses_configured_dirs() {
        let config = test_parse_config("[content]\nblog_dir = \"posts\"\ntags = []");
        let layout = config.content.layout(Path::new("/copy"));
        assert_eq!(layout.blog(), PathBuf::from("/copy/posts"));
        assert_eq!(layout.authors(), PathBuf::from("/copy/content/authors"));
        assert!(config.content.template().tags.is_empty());
    }

    #[test]
    fn test_escaping_dirs_rejected() {
        let config = test_parse_config(
            "[content]\nblog_dir = \"/etc\"\nauthors_dir = \"../outside\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.content.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
