//! Slug generation for titles and names.
//!
//! Unicode is transliterated to ASCII (`deunicode`), lowercased, and every
//! run of non-alphanumeric characters collapses into a single separator.

use deunicode::deunicode;

/// Separator character for slugs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlugSeparator {
    /// Dash separator (`-`) (default).
    #[default]
    Dash,
    /// Underscore separator (`_`).
    Underscore,
}

impl SlugSeparator {
    /// Get the character representation.
    pub const fn as_char(self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
        }
    }
}

/// Slugify `text` with the given separator.
///
/// Returns an empty string when `text` has no alphanumeric content.
pub fn slugify(text: &str, separator: SlugSeparator) -> String {
    let sep = separator.as_char();
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push(sep);
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Author directory name: trimmed, spaces to dashes, lowercased.
///
/// Unlike [`slugify`] this keeps non-ASCII letters, so an author's chosen
/// spelling survives.
pub fn author_key(name: &str) -> String {
    name.trim().replace(' ', "-").to_lowercase()
}
