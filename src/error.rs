// file: src/error.rs
// description: Crawl error taxonomy and result type alias
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrawlError>;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Branch '{reference}' does not exist in repository '{organization}/{repository}'.")]
    RefNotFound {
        organization: String,
        repository: String,
        reference: String,
    },

    #[error(
        "Failed to access branch '{reference}' in repository '{organization}/{repository}'. \
         Please verify that the branch exists. ({detail})"
    )]
    ListingFailed {
        organization: String,
        repository: String,
        reference: String,
        detail: String,
    },

    /// Raised for an empty listing. GitHub gives the same answer for an empty
    /// branch and for one it cannot resolve, so the message names both.
    #[error(
        "No files found in repository '{organization}/{repository}' for branch '{reference}'. \
         This may be because the branch does not exist or is empty."
    )]
    EmptyListing {
        organization: String,
        repository: String,
        reference: String,
    },

    /// A single remote call that failed; rendered inline for per-entry failures.
    #[error("{0}")]
    Remote(String),

    #[error("Output file error for {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CrawlError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Process exit code for this error: 2 for usage mistakes, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() { 2 } else { 1 }
    }
}
