//! State shared by every command: config, saved settings, the forge client
//! and the working copy session.

use crate::{
    cli::Cli,
    config::PublishConfig,
    host::{GitHubHost, RepoSlug},
    publish::{AuthError, AuthorIdentity, Credential, CredentialValidator, RepositorySession, Transcript},
    settings::Settings,
};
use anyhow::{Context as _, Result};

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "GITHUB_PAT";
/// Environment variable holding the commit email.
pub const EMAIL_ENV: &str = "USER_EMAIL";

pub struct Context<'a> {
    pub cli: &'a Cli,
    pub config: PublishConfig,
    pub settings: Settings,
    pub host: GitHubHost,
    pub session: RepositorySession,
    pub log: Transcript,
}

impl<'a> Context<'a> {
    pub fn load(cli: &'a Cli) -> Result<Self> {
        let config = PublishConfig::load(&cli.config)?;
        let settings = Settings::load(&config.settings_path())?;
        let host = GitHubHost::new(&config.host.api_url, &config.host.user_agent)
            .context("failed to set up the API client")?;
        let session = RepositorySession::new(config.session_options()?);
        let log = Transcript::with_sink(crate::logger::log);

        Ok(Self {
            cli,
            config,
            settings,
            host,
            session,
            log,
        })
    }

    /// `--token`, then `$GITHUB_PAT`, then the saved token.
    pub fn token(&self) -> Option<String> {
        pick(
            self.cli.token.clone(),
            std::env::var(TOKEN_ENV).ok(),
            self.settings.token.clone(),
        )
    }

    /// `--email`, then `$USER_EMAIL`, then the saved email.
    pub fn email(&self) -> Option<String> {
        pick(
            self.cli.email.clone(),
            std::env::var(EMAIL_ENV).ok(),
            self.settings.email.clone(),
        )
    }

    pub fn upstream(&self) -> Result<RepoSlug> {
        Ok(self.config.session_options()?.upstream)
    }

    pub fn credential(&self) -> Result<Credential> {
        let credential = CredentialValidator::new(&self.host)
            .validate(self.token().as_deref(), self.email().as_deref(), &self.log)
            .map_err(|err| match err {
                AuthError::InvalidToken => anyhow::Error::new(err).context(format!(
                    "no usable token; pass --token, set ${TOKEN_ENV}, or save one with `quillpost check --token ...`"
                )),
                other => other.into(),
            })?;
        crate::debug!("auth"; "commit email {}", credential.email);
        Ok(credential)
    }

    pub fn author_identity(&self, credential: &Credential) -> AuthorIdentity {
        self.config
            .commit
            .author(&credential.username, &credential.email)
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.config.settings_path())
    }
}

/// First non-blank value in precedence order.
fn pick(flag: Option<String>, env: Option<String>, saved: Option<String>) -> Option<String> {
    [flag, env, saved]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_precedence() {
        let s = |v: &str| Some(v.to_string());
        assert_eq!(pick(s("flag"), s("env"), s("saved")), s("flag"));
        assert_eq!(pick(None, s("env"), s("saved")), s("env"));
        assert_eq!(pick(s(" "), None, s("saved")), s("saved"));
        assert_eq!(pick(None, None, None), None);
    }
}
