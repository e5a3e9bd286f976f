//! GitHub REST v3 backend.

use super::{HostError, Identity, PermissionLevel, RemoteHost, RepoDescriptor, RepoSlug};
use reqwest::{
    StatusCode,
    blocking::{Client, RequestBuilder, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{
    Deserialize,
    de::{DeserializeOwned, IgnoredAny},
};
use std::time::Duration;

/// Repositories requested per page when listing.
const PAGE_SIZE: usize = 100;

/// Upper bound on pages fetched when listing repositories.
const MAX_PAGES: usize = 50;

/// Polls made while a new fork is still being copied.
const FORK_READY_ATTEMPTS: u32 = 30;

const FORK_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct GitHubHost {
    api_url: String,
    client: Client,
}

impl GitHubHost {
    /// Build a client for `api_url` (e.g. `https://api.github.com`).
    pub fn new(api_url: &str, user_agent: &str) -> Result<Self, HostError> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder, token: &SecretString) -> RequestBuilder {
        request
            .bearer_auth(token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, HostError> {
        let response = request
            .send()
            .map_err(|e| HostError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(HostError::Unauthorized);
        }
        let message = response
            .json::<ApiMessage>()
            .map(|m| m.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
        Err(HostError::Http {
            status: status.as_u16(),
            message,
        })
    }

    fn decode<T: DeserializeOwned>(response: Response) -> Result<T, HostError> {
        response
            .json()
            .map_err(|e| HostError::Decode(e.to_string()))
    }

    /// Whether the fork's git data is there yet, judged by it having a branch.
    fn fork_has_branches(&self, token: &SecretString, repo: &RepoDescriptor) -> Result<bool, HostError> {
        let path = format!("repos/{}/{}/branches", repo.owner, repo.name);
        let request = self
            .client
            .get(self.endpoint(&path))
            .query(&[("per_page", "1")]);
        match self.send(self.authorized(request, token)) {
            Ok(response) => Ok(!Self::decode::<Vec<IgnoredAny>>(response)?.is_empty()),
            Err(HostError::Http {
                status: 404 | 409, ..
            }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Call `ready` up to `attempts` times, sleeping `interval` between calls.
///
/// Returns whether `ready` ever answered `true`.
fn poll_until(
    attempts: u32,
    interval: Duration,
    mut ready: impl FnMut() -> Result<bool, HostError>,
) -> Result<bool, HostError> {
    for attempt in 0..attempts {
        if attempt > 0 {
            std::thread::sleep(interval);
        }
        if ready()? {
            return Ok(true);
        }
    }
    Ok(false)
}

impl RemoteHost for GitHubHost {
    fn authenticate(&self, token: &SecretString) -> Result<Identity, HostError> {
        let request = self.authorized(self.client.get(self.endpoint("user")), token);
        let user: ApiUser = Self::decode(self.send(request)?)?;
        Ok(Identity {
            login: user.login,
            email: user.email.filter(|e| !e.trim().is_empty()),
        })
    }

    fn permission(
        &self,
        token: &SecretString,
        username: &str,
        repo: &RepoSlug,
    ) -> Result<PermissionLevel, HostError> {
        let path = format!(
            "repos/{}/{}/collaborators/{username}/permission",
            repo.owner, repo.name
        );
        let request = self.authorized(self.client.get(self.endpoint(&path)), token);

        match self.send(request) {
            Ok(response) => {
                let body: ApiPermission = Self::decode(response)?;
                Ok(PermissionLevel::parse(&body.permission))
            }
            // Viewing collaborator permissions needs push access; a 403 means
            // the repository is visible to the user but not writable.
            Err(HostError::Http { status: 403, .. }) => Ok(PermissionLevel::Read),
            Err(e) => Err(e),
        }
    }

    fn list_user_repositories(&self, token: &SecretString) -> Result<Vec<RepoDescriptor>, HostError> {
        let mut repos = Vec::new();

        for page in 1..=MAX_PAGES {
            let request = self
                .client
                .get(self.endpoint("user/repos"))
                .query(&[
                    ("affiliation", "owner".to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                ]);
            let batch: Vec<ApiRepo> = Self::decode(self.send(self.authorized(request, token))?)?;
            let last = batch.len() < PAGE_SIZE;
            repos.extend(batch.into_iter().map(RepoDescriptor::from));
            if last {
                break;
            }
        }

        Ok(repos)
    }

    fn create_fork(
        &self,
        token: &SecretString,
        base: &RepoSlug,
        name: &str,
    ) -> Result<RepoDescriptor, HostError> {
        let path = format!("repos/{}/{}/forks", base.owner, base.name);
        let request = self
            .client
            .post(self.endpoint(&path))
            .json(&serde_json::json!({ "name": name, "default_branch_only": false }));
        let repo: RepoDescriptor =
            Self::decode::<ApiRepo>(self.send(self.authorized(request, token))?)?.into();

        // GitHub answers 202 and copies the repository in the background. A
        // fork that is still empty after the last poll is returned anyway;
        // cloning it then fails with git's own message.
        poll_until(FORK_READY_ATTEMPTS, FORK_POLL_INTERVAL, || {
            self.fork_has_branches(token, &repo)
        })?;
        Ok(repo)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPermission {
    permission: String,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    owner: ApiOwner,
    #[serde(default)]
    fork: bool,
    ssh_url: String,
    clone_url: String,
}

impl From<ApiRepo> for RepoDescriptor {
    fn from(repo: ApiRepo) -> Self {
        Self {
            owner: repo.owner.login,
            name: repo.name,
            fork: repo.fork,
            ssh_url: repo.ssh_url,
            clone_url: repo.clone_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let host = GitHubHost::new("https://api.github.com/", "quillpost-test").unwrap();
        assert_eq!(host.endpoint("user"), "https://api.github.com/user");
        assert_eq!(host.endpoint("/user/repos"), "https://api.github.com/user/repos");
    }

    #[test]
    fn test_repo_payload_decodes() {
        let json = r#"{
            "name": "site_alice_2024-03-01",
            "full_name": "alice/site_alice_2024-03-01",
            "owner": { "login": "alice", "id": 1 },
            "fork": true,
            "ssh_url": "git@github.com:alice/site_alice_2024-03-01.git",
            "clone_url": "https://github.com/alice/site_alice_2024-03-01.git",
            "private": false
        }"#;
        let repo: RepoDescriptor = serde_json::from_str::<ApiRepo>(json).unwrap().into();
        assert_eq!(repo.full_name(), "alice/site_alice_2024-03-01");
        assert!(repo.fork);
    }

    #[test]
    fn test_poll_until_stops_when_ready() {
        let mut calls = 0;
        let ready = poll_until(5, Duration::ZERO, || {
            calls += 1;
            Ok(calls == 3)
        })
        .unwrap();
        assert!(ready);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_poll_until_gives_up() {
        let mut calls = 0;
        let ready = poll_until(4, Duration::ZERO, || {
            calls += 1;
            Ok(false)
        })
        .unwrap();
        assert!(!ready);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_poll_until_propagates_errors() {
        let err = poll_until(3, Duration::ZERO, || Err(HostError::Unauthorized)).unwrap_err();
        assert!(matches!(err, HostError::Unauthorized));
    }

    #[test]
    fn test_user_payload_without_email() {
        let user: ApiUser = serde_json::from_str(r#"{"login": "alice", "email": null}"#).unwrap();
        assert_eq!(user.login, "alice");
        assert!(user.email.is_none());
    }
}
