//! `[commit]` section configuration.
//!
//! ```toml
//! [commit]
//! author_name = "Jane Doe"                  # default: token owner's login
//! author_email = "jane@example.com"         # default: resolved commit email
//! article_message = "{title} first commit"
//! default_message = "Add authors/articles"
//! ```

use crate::{
    config::{ConfigDiagnostics, FieldPath},
    publish::AuthorIdentity,
};
use serde::{Deserialize, Serialize};

const TITLE_PLACEHOLDER: &str = "{title}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    pub author_name: Option<String>,
    pub author_email: Option<String>,

    /// Message of the commit created by `article`; `{title}` is replaced.
    pub article_message: String,

    /// Message used by `commit` when `-m` is not given.
    pub default_message: String,
}

impl CommitConfig {
    pub const ARTICLE_MESSAGE: FieldPath = FieldPath::new("commit.article_message");
    pub const DEFAULT_MESSAGE: FieldPath = FieldPath::new("commit.default_message");

    pub fn article_message(&self, title: &str) -> String {
        self.article_message.replace(TITLE_PLACEHOLDER, title)
    }

    /// Configured identity, filling gaps from the credential's.
    pub fn author(&self, login: &str, email: &str) -> AuthorIdentity {
        AuthorIdentity::new(
            self.author_name.as_deref().unwrap_or(login),
            self.author_email.as_deref().unwrap_or(email),
        )
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.article_message.trim().is_empty() {
            diag.error(Self::ARTICLE_MESSAGE, "message template cannot be empty");
        } else if !self.article_message.contains(TITLE_PLACEHOLDER) {
            diag.warn(
                Self::ARTICLE_MESSAGE,
                "template has no {title}; every article commit will read the same",
            );
        }
        if self.default_message.trim().is_empty() {
            diag.error(Self::DEFAULT_MESSAGE, "message cannot be empty");
        }
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            author_name: None,
            author_email: None,
            article_message: format!("{TITLE_PLACEHOLDER} first commit"),
            default_message: "Add authors/articles".to_string(),
        }
    }
}
