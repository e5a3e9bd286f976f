//! `author new` / `author list`.
//!
//! Authors live inside the working copy, so both commands need it to exist
//! but never contact the host.

use super::{Context, Outcome};
use crate::content::AuthorStore;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn new_author(ctx: &Context<'_>, name: &str) -> Result<Outcome> {
    let (author, total) = ctx
        .session
        .with_working_copy(|copy| {
            let layout = ctx.config.content.layout(copy.root());
            let store = AuthorStore::new(&layout);
            let author = store.create(name)?;
            let total = store.list()?.len();
            Ok::<_, anyhow::Error>((author, total))
        })?;

    crate::debug!("content"; "wrote {}", author.page.display());
    crate::debug!("content"; "wrote {}", author.record.display());
    Ok(Outcome::Success(format!(
        "author '{}' created ({total} total)",
        author.name
    )))
}

pub fn list_authors(ctx: &Context<'_>) -> Result<Outcome> {
    let default = &ctx.config.content.default_author;
    let (authors, preferred) = ctx
        .session
        .with_working_copy(|copy| {
            let layout = ctx.config.content.layout(copy.root());
            let store = AuthorStore::new(&layout);
            Ok::<_, anyhow::Error>((store.list()?, store.preferred(default)?))
        })?;

    for author in &authors {
        if Some(author) == preferred.as_ref() {
            println!("{} {}", author.bold(), "(default)".dimmed());
        } else {
            println!("{author}");
        }
    }
    Ok(Outcome::Success(format!("{} author(s)", authors.len())))
}
