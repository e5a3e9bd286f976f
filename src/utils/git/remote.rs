use regex::Regex;
use std::sync::OnceLock;

/// Extract `owner/repo` from a remote URL.
///
/// Accepts scp-like (`git@host:owner/repo.git`), `ssh://`, `https://` and
/// plain filesystem paths; the last two path segments are taken.
///
/// # Examples
/// ```ignore
/// full_name_from_url("git@github.com:alice/site.git")    -> Some("alice/site")
/// full_name_from_url("https://github.com/alice/site")    -> Some("alice/site")
/// full_name_from_url("/srv/git/alice/site.git")          -> Some("alice/site")
/// full_name_from_url("site")                             -> None
/// ```
pub fn full_name_from_url(url: &str) -> Option<String> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"([^/:[:space:]]+)[/:]([^/:[:space:]]+?)(?:\.git)?/*$").ok())
        .as_ref()?;
    let caps = re.captures(url.trim())?;
    Some(format!("{}/{}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_from_url() {
        for (url, expected) in [
            ("git@github.com:alice/site.git", "alice/site"),
            ("ssh://git@github.com/alice/site.git", "alice/site"),
            ("https://github.com/alice/site", "alice/site"),
            ("https://github.com/alice/site.git/", "alice/site"),
            ("/tmp/remotes/alice/site_alice_2024-03-01.git", "alice/site_alice_2024-03-01"),
        ] {
            assert_eq!(full_name_from_url(url).as_deref(), Some(expected), "{url}");
        }
    }

    #[test]
    fn test_full_name_from_url_trims_whitespace() {
        assert_eq!(
            full_name_from_url("  git@github.com:alice/site.git\n").as_deref(),
            Some("alice/site")
        );
        assert_eq!(full_name_from_url("alice /site"), None);
    }

    #[test]
    fn test_full_name_from_url_rejects_bare_names() {
        assert_eq!(full_name_from_url("site"), None);
        assert_eq!(full_name_from_url(""), None);
    }
}
