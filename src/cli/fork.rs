use super::{Context, Outcome};
use anyhow::Result;

/// Open the working copy, cloning today's fork if needed.
///
/// With `fresh`, the existing copy is deleted first.
pub fn prepare_fork(ctx: &Context<'_>, fresh: bool) -> Result<Outcome> {
    let credential = ctx.credential()?;
    let handle = if fresh {
        ctx.session.destroy_and_recreate(&ctx.host, &credential, &ctx.log)?
    } else {
        ctx.session.acquire(&ctx.host, &credential, &ctx.log)?
    };

    let remote = handle.remote_full_name.as_deref().unwrap_or("no origin");
    let branch = handle.active_branch.as_deref().unwrap_or("detached HEAD");
    Ok(Outcome::Success(format!(
        "working copy at {} ({remote}, on {branch})",
        handle.local_path.display()
    )))
}
