//! New article scaffolding.

use super::{ContentError, ContentLayout, author_component, write_file, yaml_quote};
use crate::utils::{
    date::DateTimeUtc,
    slug::{SlugSeparator, slugify},
};
use std::{fmt::Write as _, path::PathBuf};

/// Front matter defaults for new articles.
#[derive(Debug, Clone)]
pub struct ArticleTemplate {
    pub summary: String,
    pub tags: Vec<String>,
}

impl Default for ArticleTemplate {
    fn default() -> Self {
        Self {
            summary: "This article explains many useful things.".to_string(),
            tags: vec!["ESP-IDF".to_string()],
        }
    }
}

/// A written article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub slug: String,
    pub author: String,
    pub date: DateTimeUtc,
    /// Absolute path of the article directory.
    pub dir: PathBuf,
    /// Absolute path of `index.md`.
    pub index: PathBuf,
    /// `index.md` was already there and was left as it is.
    pub existing: bool,
}

impl Article {
    /// Site path the article is served at, e.g. `/blog/2024/03/my-first-post/`.
    pub fn preview_path(&self) -> String {
        let (year, month) = self.date.year_month();
        format!("/blog/{year}/{month}/{}/", self.slug)
    }
}

pub struct ArticleWriter<'a> {
    layout: &'a ContentLayout,
    template: &'a ArticleTemplate,
}

impl<'a> ArticleWriter<'a> {
    pub fn new(layout: &'a ContentLayout, template: &'a ArticleTemplate) -> Self {
        Self { layout, template }
    }

    /// Write `<blog>/<YYYY>/<MM>/<slug>/index.md` for `title`.
    ///
    /// Inputs are checked before anything touches the disk. An existing
    /// `index.md` is never overwritten: it may already hold the author's work.
    pub fn write(&self, title: &str, author: &str, date: DateTimeUtc) -> Result<Article, ContentError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ContentError::BlankTitle);
        }
        let author = author_component(author)?;
        let slug = slugify(title, SlugSeparator::Dash);
        if slug.is_empty() {
            return Err(ContentError::EmptySlug(title.to_string()));
        }

        let (year, month) = date.year_month();
        let dir = self.layout.blog().join(year).join(month).join(&slug);
        let index = dir.join("index.md");
        let existing = index.is_file();
        if !existing {
            write_file(&index, &self.front_matter(title, &author, date))?;
        }

        Ok(Article {
            title: title.to_string(),
            slug,
            author,
            date,
            dir,
            index,
            existing,
        })
    }

    fn front_matter(&self, title: &str, author: &str, date: DateTimeUtc) -> String {
        let tags = self
            .template
            .tags
            .iter()
            .map(|t| yaml_quote(t))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::from("---\n");
        let _ = writeln!(out, "title: {}", yaml_quote(title));
        let _ = writeln!(out, "date: {}", yaml_quote(&date.ymd()));
        let _ = writeln!(out, "summary: {}", yaml_quote(&self.template.summary));
        out.push_str("authors:\n");
        let _ = writeln!(out, "  - {}", yaml_quote(author));
        let _ = writeln!(out, "tags: [{tags}]");
        out.push_str("---\n");
        out
    }
}
