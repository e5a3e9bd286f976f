//! Command-line interface definitions.

use crate::config::CONFIG_FILE;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Publish blog posts into a git-hosted site without touching git
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Personal access token (default: $GITHUB_PAT, then the saved token)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Commit email (default: $USER_EMAIL, then the saved email)
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the token and show permission on the upstream repository
    Check,

    /// Find or create today's fork and clone it
    #[command(visible_alias = "f")]
    Fork {
        /// Delete the local working copy and clone again
        #[arg(long)]
        fresh: bool,
    },

    /// Manage authors
    Author {
        #[command(subcommand)]
        action: AuthorCommand,
    },

    /// Create an article, its branch and its first commit
    #[command(visible_alias = "a")]
    Article {
        /// Article title
        title: String,

        /// Author name (default: configured default author, if present)
        #[arg(short, long)]
        author: Option<String>,
    },

    /// Create or switch to a branch based on the configured base branch
    #[command(visible_alias = "b")]
    Branch {
        /// Branch name, e.g. article/my_post
        name: String,
    },

    /// Stage paths and commit them
    #[command(visible_alias = "c")]
    Commit {
        /// Commit message (default: [commit].default_message)
        #[arg(short, long)]
        message: Option<String>,

        /// Paths to stage (default: the last article plus author directories)
        #[arg(value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,
    },

    /// Push the current branch to the fork
    #[command(visible_alias = "p")]
    Push,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthorCommand {
    /// Create author page and data record
    New {
        /// Display name; stored lowercased with dashes
        name: String,
    },

    /// List known authors
    List,
}
