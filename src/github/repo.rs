//! Owner/repository parsing for GitHub web URLs.

use std::fmt;

use url::Url;

use super::error::GithubError;

/// An `owner/repo` pair taken from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization that owns the repository.
    pub owner: String,
    /// Repository name, without a `.git` suffix.
    pub repo: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parses the owner and repository out of a GitHub web URL.
///
/// The first two non-empty path segments are used; anything after them
/// (`/releases`, `/tree/main`, ...) is ignored. A trailing `.git` is stripped
/// from the repository name. A URL without a scheme is read as `https://`.
///
/// # Errors
///
/// Returns [`GithubError::InvalidRepoUrl`] if the URL does not parse or has
/// fewer than two path segments.
pub fn parse_repo_url(repo_url: &str) -> Result<RepoRef, GithubError> {
    let trimmed = repo_url.trim();
    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{trimmed}"))
    }
    .map_err(|_| GithubError::invalid_repo_url(repo_url))?;

    let mut segments = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty());
    let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
        return Err(GithubError::invalid_repo_url(repo_url));
    };

    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(GithubError::invalid_repo_url(repo_url));
    }

    Ok(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_url_plain() {
        let repo = parse_repo_url("https://github.com/hemzaz/lsweb").unwrap();
        assert_eq!(repo.owner, "hemzaz");
        assert_eq!(repo.repo, "lsweb");
        assert_eq!(repo.to_string(), "hemzaz/lsweb");
    }

    #[test]
    fn test_parse_repo_url_strips_git_suffix_and_trailing_path() {
        let repo = parse_repo_url("https://github.com/owner/tool.git").unwrap();
        assert_eq!(repo.repo, "tool");

        let repo = parse_repo_url("https://github.com/owner/tool/releases/latest").unwrap();
        assert_eq!(repo.repo, "tool");
    }

    #[test]
    fn test_parse_repo_url_ignores_empty_segments() {
        let repo = parse_repo_url("https://github.com//owner//tool/").unwrap();
        assert_eq!(repo.owner, "owner");
        assert_eq!(repo.repo, "tool");
    }

    #[test]
    fn test_parse_repo_url_without_scheme() {
        let repo = parse_repo_url("github.com/owner/tool").unwrap();
        assert_eq!(repo.owner, "owner");
        assert_eq!(repo.repo, "tool");
    }

    #[test]
    fn test_parse_repo_url_too_few_segments_is_error() {
        for input in [
            "https://github.com/",
            "https://github.com/owner",
            "https://github.com/owner/.git",
        ] {
            let err = parse_repo_url(input).unwrap_err();
            assert!(
                matches!(err, GithubError::InvalidRepoUrl { .. }),
                "{input}: {err:?}"
            );
        }
    }
}
