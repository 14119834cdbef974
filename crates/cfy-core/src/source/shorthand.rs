//! Hosted repository shorthand (`organization/repository[:ref]`).

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Default ref used when a shorthand does not name one.
pub const DEFAULT_REF: &str = "master";

/// A parsed `organization/repository[:ref]` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoShorthand {
    pub organization: String,
    pub repository: String,
    /// Tag or branch
    pub reference: Option<String>,
}

impl RepoShorthand {
    pub fn new(organization: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            repository: repository.into(),
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Parse `org/repo` or `org/repo:ref`.
    ///
    /// Returns `None` when the input does not have exactly one `/` between two
    /// valid name segments.
    pub fn parse(input: &str) -> Option<Self> {
        let (repo_part, reference) = match input.split_once(':') {
            Some((repo_part, reference)) => (repo_part, Some(reference)),
            None => (input, None),
        };

        let (organization, repository) = repo_part.split_once('/')?;
        if !is_valid_segment(organization) || !is_valid_segment(repository) {
            return None;
        }

        let reference = match reference {
            Some(r) if is_valid_segment(r) => Some(r.to_string()),
            Some(_) => return None,
            None => None,
        };

        Some(Self {
            organization: organization.to_string(),
            repository: repository.to_string(),
            reference,
        })
    }

    /// The ref to download, falling back to [`DEFAULT_REF`].
    pub fn reference_or_default(&self) -> &str {
        self.reference.as_deref().unwrap_or(DEFAULT_REF)
    }
}

impl std::fmt::Display for RepoShorthand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.repository)?;
        if let Some(reference) = &self.reference {
            write!(f, ":{reference}")?;
        }
        Ok(())
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Maps a repository shorthand to a downloadable archive URL.
pub trait ShorthandResolver: std::fmt::Debug {
    fn archive_url(&self, shorthand: &RepoShorthand) -> Result<String, SourceError>;
}

/// Resolves shorthands against GitHub's archive endpoint.
#[derive(Debug, Clone)]
pub struct GitHubResolver {
    base_url: String,
}

impl GitHubResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for GitHubResolver {
    fn default() -> Self {
        Self::new("https://github.com")
    }
}

impl ShorthandResolver for GitHubResolver {
    fn archive_url(&self, shorthand: &RepoShorthand) -> Result<String, SourceError> {
        // https://github.com/org/repo/archive/master.tar.gz
        Ok(format!(
            "{}/{}/{}/archive/{}.tar.gz",
            self.base_url.trim_end_matches('/'),
            shorthand.organization,
            shorthand.repository,
            shorthand.reference_or_default()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_reference() {
        let shorthand = RepoShorthand::parse("cloudify-cosmo/hello-world").unwrap();
        assert_eq!(shorthand.organization, "cloudify-cosmo");
        assert_eq!(shorthand.repository, "hello-world");
        assert_eq!(shorthand.reference, None);
        assert_eq!(shorthand.reference_or_default(), "master");
    }

    #[test]
    fn parse_with_reference() {
        let shorthand = RepoShorthand::parse("org/repo:3.4.1").unwrap();
        assert_eq!(shorthand, RepoShorthand::new("org", "repo").with_reference("3.4.1"));
        assert_eq!(shorthand.to_string(), "org/repo:3.4.1");
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert_eq!(RepoShorthand::parse("repo"), None);
        assert_eq!(RepoShorthand::parse("a/b/c"), None);
        assert_eq!(RepoShorthand::parse("/abs"), None);
        assert_eq!(RepoShorthand::parse("org/"), None);
        assert_eq!(RepoShorthand::parse("org/repo:"), None);
        assert_eq!(RepoShorthand::parse("org/repo:feature/x"), None);
        assert_eq!(RepoShorthand::parse("../repo"), None);
        assert_eq!(RepoShorthand::parse("org name/repo"), None);
    }

    #[test]
    fn github_archive_url() {
        let resolver = GitHubResolver::default();
        let url = resolver
            .archive_url(&RepoShorthand::new("org", "repo"))
            .unwrap();
        assert_eq!(url, "https://github.com/org/repo/archive/master.tar.gz");

        let url = resolver
            .archive_url(&RepoShorthand::new("org", "repo").with_reference("v1"))
            .unwrap();
        assert_eq!(url, "https://github.com/org/repo/archive/v1.tar.gz");
    }

    #[test]
    fn github_base_url_trailing_slash() {
        let resolver = GitHubResolver::new("http://localhost:8080/");
        let url = resolver
            .archive_url(&RepoShorthand::new("o", "r"))
            .unwrap();
        assert_eq!(url, "http://localhost:8080/o/r/archive/master.tar.gz");
    }
}
