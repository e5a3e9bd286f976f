use anyhow::Result;
use std::path::Path;

/// Whether `path` is the root of a git working copy.
pub fn is_repository(path: &Path) -> bool {
    gix::open(path).is_ok_and(|repo| repo.workdir().is_some())
}

/// Short name of the checked-out branch, `None` when HEAD is detached.
pub fn active_branch(root: &Path) -> Result<Option<String>> {
    let repo = gix::open(root)?;
    let name = repo
        .head_name()?
        .map(|name| name.shorten().to_string());
    Ok(name)
}

/// Push URL of the named remote, if configured.
pub fn remote_url(root: &Path, remote: &str) -> Result<Option<String>> {
    let repo = gix::open(root)?;
    let Ok(remote) = repo.find_remote(remote) else {
        return Ok(None);
    };
    let url = remote
        .url(gix::remote::Direction::Push)
        .map(|url| url.to_bstring().to_string());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::git::Git;
    use tempfile::TempDir;

    #[test]
    fn test_plain_directory_is_not_repository() {
        let dir = TempDir::new().unwrap();
        assert!(!is_repository(dir.path()));
        assert!(!is_repository(&dir.path().join("missing")));
    }

    #[test]
    fn test_branch_and_remote() {
        let dir = TempDir::new().unwrap();
        let git = Git::new(dir.path());
        git.run(["init", "--quiet"]).unwrap();
        git.run(["checkout", "--quiet", "-b", "article/hello"]).unwrap();
        git.run(["remote", "add", "origin", "git@github.com:alice/site.git"]).unwrap();

        assert!(is_repository(dir.path()));
        assert_eq!(active_branch(dir.path()).unwrap().as_deref(), Some("article/hello"));
        assert_eq!(
            remote_url(dir.path(), "origin").unwrap().as_deref(),
            Some("git@github.com:alice/site.git")
        );
        assert_eq!(remote_url(dir.path(), "upstream").unwrap(), None);
    }
}
