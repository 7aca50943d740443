// file: src/repository/locator.rs
// description: Path grammar parsing into organization, repository, ref and subdirectory
// reference: github://org/repo/ref[/subdir], org/repo:ref and org/repo forms

use crate::error::{CrawlError, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_REF: &str = "main";
pub const GITHUB_SCHEME: &str = "github://";

/// What to crawl, parsed once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    pub organization: String,
    pub repository: String,
    pub reference: String,
    pub subdirectory: String,
}

impl RepositoryLocator {
    /// Accepts three grammars:
    ///
    /// - `github://org/repo/ref[/subdir...]`: the third segment is the ref and
    ///   everything after it is the subdirectory, so a ref containing `/`
    ///   cannot be written this way.
    /// - `org/repo:ref`: everything after the first colon is the ref, slashes included.
    /// - `org/repo`: the ref defaults to `main`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let (organization, repository, reference, subdirectory) =
            if let Some(rest) = input.strip_prefix(GITHUB_SCHEME) {
                let segments: Vec<&str> = rest.split('/').collect();
                if segments.len() < 2 {
                    return Err(format_error(input));
                }

                let reference = segments
                    .get(2)
                    .copied()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_REF);

                let subdirectory = segments
                    .iter()
                    .skip(3)
                    .filter(|s| !s.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join("/");

                (segments[0], segments[1], reference, subdirectory)
            } else {
                let (repo_part, reference) = match input.split_once(':') {
                    Some((repo_part, reference)) => {
                        if reference.is_empty() {
                            return Err(CrawlError::usage(format!(
                                "Invalid repository path '{}': ref after ':' must not be empty",
                                input
                            )));
                        }
                        (repo_part, reference)
                    }
                    None => (input, DEFAULT_REF),
                };

                let segments: Vec<&str> = repo_part.split('/').collect();
                if segments.len() != 2 {
                    return Err(format_error(input));
                }

                (segments[0], segments[1], reference, String::new())
            };

        if organization.is_empty() || repository.is_empty() {
            return Err(format_error(input));
        }

        Ok(Self {
            organization: organization.to_string(),
            repository: repository.to_string(),
            reference: reference.to_string(),
            subdirectory,
        })
    }

    /// Recursive glob handed to the filesystem: `<subdir>/**`, or `**` at the root.
    /// The subdirectory is matched literally, so `docs[v1]` or `a{b` name real
    /// directories rather than glob syntax.
    pub fn listing_pattern(&self) -> String {
        if self.subdirectory.is_empty() {
            "**".to_string()
        } else {
            format!("{}/**", globset::escape(&self.subdirectory))
        }
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.organization, self.repository)
    }
}

impl FromStr for RepositoryLocator {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}/{}/{}",
            GITHUB_SCHEME, self.organization, self.repository, self.reference
        )?;
        if !self.subdirectory.is_empty() {
            write!(f, "/{}", self.subdirectory)?;
        }
        Ok(())
    }
}

fn format_error(input: &str) -> CrawlError {
    CrawlError::usage(format!(
        "Invalid repository path '{}': must be in format 'org/repo'",
        input
    ))
}
