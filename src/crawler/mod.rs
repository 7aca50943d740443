// file: src/crawler/mod.rs
// description: crawl pipeline module exports
// reference: internal module structure

pub mod engine;
pub mod filter;
pub mod progress;
pub mod render;

pub use engine::{CrawlRequest, Crawler, crawl_repository};
pub use filter::FilterSpec;
pub use progress::{CrawlProgress, CrawlStats};
pub use render::{BodyOutcome, TranscriptWriter};
