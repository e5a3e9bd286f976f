//! Author pages and records.

use super::{ContentError, ContentLayout, author_component, write_file};
use crate::utils::slug::author_key;
use serde::Serialize;
use std::{fs, path::PathBuf};

/// Body of `data/authors/<name>.json`.
#[derive(Debug, Serialize)]
struct AuthorRecord<'a> {
    name: &'a str,
    bio: &'a str,
    image: &'a str,
}

/// Files written for one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub page: PathBuf,
    pub record: PathBuf,
}

pub struct AuthorStore<'a> {
    layout: &'a ContentLayout,
}

impl<'a> AuthorStore<'a> {
    pub fn new(layout: &'a ContentLayout) -> Self {
        Self { layout }
    }

    /// Write the author page and record, overwriting existing ones.
    ///
    /// The name becomes a directory and a file name, so it must be a single
    /// path component.
    pub fn create(&self, name: &str) -> Result<Author, ContentError> {
        let name = author_component(name)?;

        let page = self.layout.authors().join(&name).join("_index.md");
        write_file(&page, &format!("---\ntitle: {name}\n---\n"))?;

        let record = self.layout.authors_data().join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(&AuthorRecord {
            name: &name,
            bio: "",
            image: "",
        })?;
        write_file(&record, &json)?;

        Ok(Author { name, page, record })
    }

    /// Sorted author directory names; empty when the directory is missing.
    pub fn list(&self) -> Result<Vec<String>, ContentError> {
        let dir = self.layout.authors();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(ContentError::Io { path: dir, source }),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// `default` when it is a known author, else the first one listed.
    pub fn preferred(&self, default: &str) -> Result<Option<String>, ContentError> {
        let authors = self.list()?;
        let default = author_key(default);
        if authors.contains(&default) {
            return Ok(Some(default));
        }
        Ok(authors.into_iter().next())
    }
}
