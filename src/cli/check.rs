use super::{Context, Outcome};
use crate::{
    log,
    publish::{CredentialValidator, describe_permission},
};
use anyhow::Result;

/// Validate the token, report permission on upstream, and save credentials
/// given on the command line.
pub fn check_credentials(ctx: &mut Context<'_>) -> Result<Outcome> {
    let upstream = ctx.upstream()?;
    let credential = CredentialValidator::new(&ctx.host).inspect(
        ctx.token().as_deref(),
        ctx.email().as_deref(),
        &upstream,
        &ctx.log,
    )?;
    crate::debug!("auth"; "commit email {}", credential.email);

    if ctx
        .settings
        .remember_credentials(ctx.cli.token.as_deref(), ctx.cli.email.as_deref())
    {
        ctx.save_settings()?;
        log!("settings"; "saved to {}", ctx.config.settings_path().display());
    }

    let status = describe_permission(&upstream, credential.permission);
    Ok(if credential.permission.can_publish() {
        Outcome::Success(status)
    } else {
        Outcome::Warning(status)
    })
}
