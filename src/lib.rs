// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns

//! Crawl a remote repository and render every file as a line-numbered transcript.
//!
//! ```text
//! # src/lib.rs
//! 00001| pub mod config;
//! 00002| pub mod error;
//!
//! # README.md
//! ...
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod exporter;
pub mod filesystem;
pub mod repository;
pub mod utils;

pub use config::{Config, CrawlConfig, GitHubConfig};
pub use crawler::{CrawlRequest, CrawlStats, Crawler, FilterSpec, crawl_repository};
pub use error::{CrawlError, Result};
pub use exporter::{OutputSink, OutputTarget};
pub use filesystem::{
    EntryInfo, EntryKind, GitHubFileSystem, MemoryFileSystem, RemoteFileSystem,
};
pub use repository::{
    Credentials, GitHubRefVerifier, RefVerifier, RepositoryLocator, SkipRefCheck,
};
pub use utils::Validator;
