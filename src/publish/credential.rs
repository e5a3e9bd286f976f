//! Token validation and permission lookup.

use super::{AuthError, Transcript};
use crate::host::{HostError, PermissionLevel, RemoteHost, RepoSlug};
use secrecy::SecretString;

/// A validated token and who it belongs to.
///
/// `permission` is the last level observed by [`CredentialValidator::inspect`];
/// it is informational only. Gated operations query the host again.
#[derive(Debug)]
pub struct Credential {
    token: SecretString,
    pub username: String,
    pub email: String,
    pub permission: PermissionLevel,
}

impl Credential {
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

pub struct CredentialValidator<'h> {
    host: &'h dyn RemoteHost,
}

impl<'h> CredentialValidator<'h> {
    pub fn new(host: &'h dyn RemoteHost) -> Self {
        Self { host }
    }

    /// Resolve the identity behind `token`.
    ///
    /// A missing or blank token fails before the host is contacted. The
    /// commit email falls back to the profile email, then to the host's
    /// no-reply address.
    pub fn validate(
        &self,
        token: Option<&str>,
        email: Option<&str>,
        log: &Transcript,
    ) -> Result<Credential, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidToken)?;
        let token = SecretString::from(token.to_string());

        let identity = self.host.authenticate(&token).map_err(|e| match e {
            HostError::Unauthorized => AuthError::InvalidToken,
            other => AuthError::LookupFailed(other),
        })?;
        log.record("auth", format!("authenticated as {}", identity.login));

        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .or(identity.email)
            .unwrap_or_else(|| format!("{}@users.noreply.github.com", identity.login));

        Ok(Credential {
            token,
            username: identity.login,
            email,
            permission: PermissionLevel::None,
        })
    }

    /// Current permission of `credential` on `repo`.
    ///
    /// `read`/`none` are returned as values, not errors; callers decide.
    pub fn check_permission(
        &self,
        credential: &Credential,
        repo: &RepoSlug,
        log: &Transcript,
    ) -> Result<PermissionLevel, AuthError> {
        let level = self
            .host
            .permission(credential.token(), &credential.username, repo)
            .map_err(AuthError::LookupFailed)?;
        log.record("auth", format!("{repo}: {level} permission"));
        Ok(level)
    }

    /// Validate and look up permission on `repo` in one step.
    pub fn inspect(
        &self,
        token: Option<&str>,
        email: Option<&str>,
        repo: &RepoSlug,
        log: &Transcript,
    ) -> Result<Credential, AuthError> {
        let mut credential = self.validate(token, email, log)?;
        credential.permission = self.check_permission(&credential, repo, log)?;
        Ok(credential)
    }
}

/// Status line for a permission check.
pub fn describe_permission(repo: &RepoSlug, level: PermissionLevel) -> String {
    if level.can_publish() {
        format!("credentials valid: branch creation and push allowed on {repo} ({level})")
    } else {
        format!("credentials valid but push and branch creation not allowed on {repo} ({level})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::MockHost;

    fn repo() -> RepoSlug {
        RepoSlug::new("org", "site")
    }

    #[test]
    fn test_missing_token_fails_without_host_call() {
        let host = MockHost::new("T1", "alice");
        let validator = CredentialValidator::new(&host);
        let log = Transcript::new();

        assert!(matches!(validator.validate(None, None, &log), Err(AuthError::InvalidToken)));
        assert!(matches!(
            validator.validate(Some("   "), None, &log),
            Err(AuthError::InvalidToken)
        ));
        assert_eq!(host.calls(), 0);
    }

    #[test]
    fn test_rejected_token() {
        let host = MockHost::new("T1", "alice");
        let err = CredentialValidator::new(&host)
            .validate(Some("wrong"), None, &Transcript::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn test_email_fallbacks() {
        let log = Transcript::new();

        let host = MockHost::new("T1", "alice");
        let cred = CredentialValidator::new(&host).validate(Some("T1"), None, &log).unwrap();
        assert_eq!(cred.email, "alice@users.noreply.github.com");

        let host = MockHost::new("T1", "alice").with_email("alice@profile.test");
        let validator = CredentialValidator::new(&host);
        let cred = validator.validate(Some("T1"), None, &log).unwrap();
        assert_eq!(cred.email, "alice@profile.test");

        let cred = validator.validate(Some("T1"), Some("a@ui.test"), &log).unwrap();
        assert_eq!(cred.email, "a@ui.test");
        assert_eq!(cred.username, "alice");
    }

    #[test]
    fn test_read_permission_is_not_an_error() {
        let host = MockHost::new("T1", "alice").with_default_permission(PermissionLevel::Read);
        let cred = CredentialValidator::new(&host)
            .inspect(Some("T1"), None, &repo(), &Transcript::new())
            .unwrap();
        assert_eq!(cred.permission, PermissionLevel::Read);
        assert!(!cred.permission.can_publish());
        assert!(describe_permission(&repo(), cred.permission).contains("not allowed"));
    }

    #[test]
    fn test_permission_is_queried_every_time() {
        let host = MockHost::new("T1", "alice");
        let validator = CredentialValidator::new(&host);
        let log = Transcript::new();
        let cred = validator.validate(Some("T1"), None, &log).unwrap();

        assert_eq!(validator.check_permission(&cred, &repo(), &log).unwrap(), PermissionLevel::Admin);
        host.set_permission("org/site", PermissionLevel::Read);
        assert_eq!(validator.check_permission(&cred, &repo(), &log).unwrap(), PermissionLevel::Read);
        assert_eq!(host.calls(), 3);
    }

    #[test]
    fn test_token_never_logged() {
        let host = MockHost::new("secret-token-value", "alice");
        let log = Transcript::new();
        let cred = CredentialValidator::new(&host)
            .validate(Some("secret-token-value"), None, &log)
            .unwrap();
        assert!(!log.contains("secret-token-value"));
        assert!(!format!("{cred:?}").contains("secret-token-value"));
    }
}
