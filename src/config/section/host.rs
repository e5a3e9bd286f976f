//! `[host]` section configuration.
//!
//! ```toml
//! [host]
//! api_url = "https://api.github.com"
//! user_agent = "quillpost"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// REST API root; GitHub Enterprise uses `https://<host>/api/v3`.
    pub api_url: String,
    pub user_agent: String,
}

impl HostConfig {
    pub const API_URL: FieldPath = FieldPath::new("host.api_url");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            diag.error(
                Self::API_URL,
                format!("`{}` is not an http(s) URL", self.api_url),
            );
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            user_agent: concat!("quillpost/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_host_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.host.api_url, "https://api.github.com");
        assert!(config.host.user_agent.starts_with("quillpost/"));
    }

    #[test]
    fn test_enterprise_url() {
        let config = test_parse_config("[host]\napi_url = \"https://git.corp.example/api/v3\"");
        let mut diag = ConfigDiagnostics::new();
        config.host.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_invalid_url() {
        let config = test_parse_config("[host]\napi_url = \"api.github.com\"");
        let mut diag = ConfigDiagnostics::new();
        config.host.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
