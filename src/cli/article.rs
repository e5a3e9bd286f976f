//! `article`: the whole first-post flow in one command.
//!
//! validate input → credential → working copy → branch → files → commit

use super::{Context, Outcome};
use crate::{
    content::{ArticleWriter, AuthorStore, ContentError, ContentLayout},
    log,
    publish::{BranchController, BranchName, ContentChange, StagingCommitter},
    utils::date::DateTimeUtc,
};
use anyhow::{Result, anyhow};
use std::path::PathBuf;

pub fn new_article(ctx: &mut Context<'_>, title: &str, author: Option<&str>) -> Result<Outcome> {
    if title.trim().is_empty() {
        return Err(ContentError::BlankTitle.into());
    }
    if author.is_some_and(|a| a.trim().is_empty()) {
        return Err(ContentError::BlankAuthor.into());
    }

    let credential = ctx.credential()?;
    ctx.session.acquire(&ctx.host, &credential, &ctx.log)?;

    let author = match author {
        Some(name) => name.trim().to_string(),
        None => ctx.session.with_working_copy(|copy| -> Result<String> {
            AuthorStore::new(&ctx.config.content.layout(copy.root()))
                .preferred(&ctx.config.content.default_author)?
                .ok_or_else(|| anyhow!("no authors yet; pass --author or run `quillpost author new`"))
        })?,
    };

    // Branch before writing so nothing lands on the base branch.
    let branch = BranchName::for_article(title)?;
    let outcome = BranchController::new(&ctx.session).start_branch(
        &ctx.config.repo.base_branch,
        &branch,
        &ctx.log,
    )?;
    log!("branch"; "{outcome}");

    let template = ctx.config.content.template();
    let (article, authors) = ctx.session.with_working_copy(|copy| {
        let layout = ctx.config.content.layout(copy.root());
        let article = ArticleWriter::new(&layout, &template).write(title, &author, DateTimeUtc::now())?;
        Ok::<_, anyhow::Error>((article, author_dirs(&layout)))
    })?;
    if article.existing {
        log!("article"; "keeping existing {}", article.index.display());
    }

    let change = ContentChange::new(ctx.config.commit.article_message(&article.title))
        .with_path(&article.dir)
        .with_paths(authors);
    let result = StagingCommitter::new(&ctx.session, ctx.author_identity(&credential))
        .commit(&change, &ctx.log)?;
    log!("commit"; "{result}");

    ctx.settings.remember_article(&article.dir, &article.title);
    ctx.save_settings()?;

    log!("preview"; "{}", article.preview_path());
    Ok(Outcome::Success(format!(
        "article '{}' by {} ready on {branch}",
        article.title, article.author
    )))
}

/// Author directories that exist in the working copy.
pub(super) fn author_dirs(layout: &ContentLayout) -> Vec<PathBuf> {
    [layout.authors(), layout.authors_data()]
        .into_iter()
        .filter(|dir| dir.is_dir())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_author_dirs_skips_missing() {
        let dir = TempDir::new().unwrap();
        let layout = ContentLayout::new(dir.path());
        assert!(author_dirs(&layout).is_empty());

        fs::create_dir_all(layout.authors()).unwrap();
        assert_eq!(author_dirs(&layout), vec![layout.authors()]);
    }
}
