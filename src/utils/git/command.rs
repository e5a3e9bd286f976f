//! `git` invocations with typed failures.

use crate::utils::exec::{Cmd, describe_status};
use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
    process::Output,
    time::Duration,
};
use thiserror::Error;

/// Never let git block on an interactive credential prompt.
const NO_PROMPT: [(&str, &str); 1] = [("GIT_TERMINAL_PROMPT", "0")];

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run `git {command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`git {command}` timed out after {secs}s")]
    TimedOut { command: String, secs: u64 },

    #[error("`git {command}` failed with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// `git` bound to a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Run git and return trimmed stdout; any non-zero exit is an error.
    pub fn run<I, S>(&self, args: I) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (command, output) = self.invoke(args, None)?;
        check(&command, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a yes/no query: exit 0 is `true`, exit 1 is `false`.
    ///
    /// Used for `diff --quiet`, `show-ref --verify --quiet` and
    /// `merge-base --is-ancestor`, which all signal "no" with status 1.
    pub fn probe<I, S>(&self, args: I) -> Result<bool, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (command, output) = self.invoke(args, None)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => check(&command, &output).map(|()| false),
        }
    }

    /// `git clone --recursive --shallow-submodules <url> <dest>`.
    ///
    /// Runs from `dest`'s parent; the process is killed after `timeout`.
    pub fn clone_repo(url: &str, dest: &Path, timeout: Duration) -> Result<(), GitError> {
        let parent = dest.parent().unwrap_or(Path::new("."));
        let git = Self::new(parent);
        let args = [
            OsStr::new("clone"),
            OsStr::new("--recursive"),
            OsStr::new("--shallow-submodules"),
            OsStr::new(url),
            dest.as_os_str(),
        ];
        let (command, output) = git.invoke(args, Some(timeout))?;
        check(&command, &output)
    }

    fn invoke<I, S>(&self, args: I, timeout: Option<Duration>) -> Result<(String, Output), GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let command = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");

        let mut cmd = Cmd::new("git").args(&args).cwd(&self.root).envs(NO_PROMPT);
        if let Some(limit) = timeout {
            cmd = cmd.timeout(limit);
        }

        match cmd.output() {
            Ok(output) => Ok((command, output)),
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Err(GitError::TimedOut {
                command,
                secs: timeout.map(|t| t.as_secs()).unwrap_or_default(),
            }),
            Err(source) => Err(GitError::Spawn { command, source }),
        }
    }
}

fn check(command: &str, output: &Output) -> Result<(), GitError> {
    if output.status.success() {
        return Ok(());
    }
    Err(GitError::Failed {
        command: command.to_string(),
        status: describe_status(&output.status),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Fail early with a readable message when `git` is not installed.
pub fn ensure_git_available() -> anyhow::Result<PathBuf> {
    which::which("git").map_err(|_| anyhow::anyhow!("`git` was not found in PATH; install git first"))
}
