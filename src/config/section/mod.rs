//! Configuration section definitions.
//!
//! Each module corresponds to a section in `quillpost.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `repo`    | `[repo]`     | Upstream repository and working copy     |
//! | `host`    | `[host]`     | Forge API endpoint                       |
//! | `content` | `[content]`  | Article/author layout and front matter   |
//! | `commit`  | `[commit]`   | Commit identity and message templates    |

mod commit;
mod content;
mod host;
mod repo;

pub use commit::CommitConfig;
pub use content::ContentConfig;
pub use host::HostConfig;
pub use repo::RepoConfig;
