// file: src/filesystem/mod.rs
// description: Remote filesystem abstraction consumed by the crawler
// reference: https://docs.rs/globset

pub mod github;
pub mod memory;

pub use github::GitHubFileSystem;
pub use memory::MemoryFileSystem;

use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use globset::{GlobBuilder, GlobMatcher};
use tokio::io::AsyncBufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
}

impl EntryInfo {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

pub type EntryReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Listing, metadata and reads for one repository snapshot.
#[async_trait]
pub trait RemoteFileSystem: Send + Sync {
    /// Every path matching `pattern`, in whatever order the backend enumerates them.
    async fn list_recursive(&self, pattern: &str) -> Result<Vec<String>>;

    async fn stat(&self, path: &str) -> Result<EntryInfo>;

    async fn open_read(&self, path: &str) -> Result<EntryReader>;
}

/// Glob matcher where `**` crosses directory boundaries.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    matcher: GlobMatcher,
}

impl PathMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                CrawlError::usage(format!("Invalid listing pattern '{}': {}", pattern, e))
            })?;

        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_star_matches_everything() {
        let matcher = PathMatcher::new("**").unwrap();
        assert!(matcher.is_match("README.md"));
        assert!(matcher.is_match("src/deep/nested/lib.rs"));
    }

    #[test]
    fn test_subdirectory_pattern() {
        let matcher = PathMatcher::new("src/core/**").unwrap();
        assert!(matcher.is_match("src/core/mod.rs"));
        assert!(matcher.is_match("src/core/io/reader.rs"));
        assert!(!matcher.is_match("src/lib.rs"));
        assert!(!matcher.is_match("docs/src/core/x.md"));
    }

    #[test]
    fn test_escaped_subdirectory_matches_literally() {
        let matcher = PathMatcher::new(&format!("{}/**", globset::escape("docs[v1]"))).unwrap();
        assert!(matcher.is_match("docs[v1]/a.md"));
        assert!(!matcher.is_match("docsv/a.md"));

        let matcher = PathMatcher::new(&format!("{}/**", globset::escape("a{b"))).unwrap();
        assert!(matcher.is_match("a{b/c.txt"));
    }

    #[test]
    fn test_invalid_pattern_is_usage_error() {
        let err = PathMatcher::new("src/[oops/**").unwrap_err();
        assert!(err.is_usage());
    }
}
