//! Shared helpers: process execution, dates, slugs and git.

pub mod date;
pub mod exec;
pub mod git;
pub mod slug;
