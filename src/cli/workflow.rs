//! `branch`, `commit` and `push`: the individual publishing steps.

use super::{Context, Outcome, article::author_dirs};
use crate::publish::{BranchController, BranchName, ContentChange, PushSynchronizer, StagingCommitter};
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

pub fn switch_branch(ctx: &Context<'_>, name: &str) -> Result<Outcome> {
    let name = BranchName::new(name)?;
    ctx.credential()?;
    let outcome = BranchController::new(&ctx.session).start_branch(
        &ctx.config.repo.base_branch,
        &name,
        &ctx.log,
    )?;
    Ok(Outcome::Success(outcome.to_string()))
}

/// Commit `paths`, or the last article plus author directories when none
/// are given.
pub fn commit_changes(ctx: &Context<'_>, message: Option<&str>, paths: &[PathBuf]) -> Result<Outcome> {
    let credential = ctx.credential()?;
    let paths = if paths.is_empty() {
        default_paths(ctx)?
    } else {
        let cwd = std::env::current_dir()?;
        paths.iter().map(|p| resolve_arg(&cwd, p)).collect()
    };

    let message = message.unwrap_or(&ctx.config.commit.default_message);
    let change = ContentChange::new(message).with_paths(paths);
    let result = StagingCommitter::new(&ctx.session, ctx.author_identity(&credential))
        .commit(&change, &ctx.log)?;
    Ok(Outcome::Success(result.to_string()))
}

pub fn push_branch(ctx: &Context<'_>) -> Result<Outcome> {
    let credential = ctx.credential()?;
    let result = PushSynchronizer::new(&ctx.session, &ctx.host)
        .push(&credential, &ctx.log)?;
    Ok(Outcome::Success(result.to_string()))
}

fn default_paths(ctx: &Context<'_>) -> Result<Vec<PathBuf>> {
    let Some(article) = &ctx.settings.article_dir else {
        bail!("no article recorded yet; pass the paths to commit");
    };
    let mut paths = vec![article.clone()];
    let authors = ctx
        .session
        .with_working_copy(|copy| Ok::<_, anyhow::Error>(author_dirs(&ctx.config.content.layout(copy.root()))))?;
    paths.extend(authors);
    Ok(paths)
}

/// Paths on the command line are relative to the current directory when
/// they exist there, otherwise to the working copy.
fn resolve_arg(cwd: &Path, path: &Path) -> PathBuf {
    let joined = cwd.join(path);
    if path.is_relative() && !joined.exists() {
        path.to_path_buf()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_arg() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("here.md"), "").unwrap();

        assert_eq!(
            resolve_arg(dir.path(), Path::new("here.md")),
            dir.path().join("here.md")
        );
        assert_eq!(
            resolve_arg(dir.path(), Path::new("content/blog")),
            PathBuf::from("content/blog")
        );
        assert_eq!(resolve_arg(dir.path(), Path::new("/abs")), PathBuf::from("/abs"));
    }
}
