// file: src/crawler/engine.rs
// description: crawl orchestration from a parsed request to a rendered transcript
// reference: sequential list, stat, filter, render loop with per-entry soft failures

use crate::crawler::filter::FilterSpec;
use crate::crawler::progress::{CrawlProgress, CrawlStats};
use crate::crawler::render::{BodyOutcome, TranscriptWriter};
use crate::error::{CrawlError, Result};
use crate::filesystem::{PathMatcher, RemoteFileSystem};
use crate::repository::{Credentials, RefVerifier, RepositoryLocator};
use std::future::Future;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Everything needed for one run, validated before any I/O.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub locator: RepositoryLocator,
    pub filters: FilterSpec,
    pub credentials: Option<Credentials>,
    pub show_progress: bool,
}

impl CrawlRequest {
    pub fn new(path: &str, filters: FilterSpec, credentials: Option<Credentials>) -> Result<Self> {
        let locator = RepositoryLocator::parse(path)?;
        debug!("Parsed {} into {:?}", path, locator);
        PathMatcher::new(&locator.listing_pattern())?;

        Ok(Self {
            locator,
            filters,
            credentials,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

pub struct Crawler<'a> {
    fs: &'a dyn RemoteFileSystem,
    filters: &'a FilterSpec,
    show_progress: bool,
}

impl<'a> Crawler<'a> {
    pub fn new(fs: &'a dyn RemoteFileSystem, filters: &'a FilterSpec) -> Self {
        Self {
            fs,
            filters,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Lists everything under the locator's subdirectory and renders each
    /// accepted file in listing order. Listing problems abort the run; a
    /// failed stat or read only costs that entry a diagnostic line.
    pub async fn crawl<W>(&self, locator: &RepositoryLocator, out: &mut W) -> Result<CrawlStats>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let paths = self.list(locator).await?;
        self.render(locator, &paths, out).await
    }

    /// Every path under the locator's subdirectory. Fails with
    /// `ListingFailed` when the backend errors and `EmptyListing` when
    /// nothing matched.
    pub async fn list(&self, locator: &RepositoryLocator) -> Result<Vec<String>> {
        let pattern = locator.listing_pattern();
        info!("Crawling {} with pattern '{}'", locator, pattern);

        let paths = match self.fs.list_recursive(&pattern).await {
            Ok(paths) => paths,
            Err(e) if e.is_usage() => return Err(e),
            Err(e) => {
                return Err(CrawlError::ListingFailed {
                    organization: locator.organization.clone(),
                    repository: locator.repository.clone(),
                    reference: locator.reference.clone(),
                    detail: e.to_string(),
                });
            }
        };

        if paths.is_empty() {
            return Err(CrawlError::EmptyListing {
                organization: locator.organization.clone(),
                repository: locator.repository.clone(),
                reference: locator.reference.clone(),
            });
        }

        Ok(paths)
    }

    pub async fn render<W>(
        &self,
        locator: &RepositoryLocator,
        paths: &[String],
        out: &mut W,
    ) -> Result<CrawlStats>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let progress = CrawlProgress::new(self.show_progress);
        progress.set_total(paths.len());

        let mut writer = TranscriptWriter::new(out);
        let mut stats = CrawlStats {
            entries_listed: paths.len(),
            ..CrawlStats::default()
        };

        for path in paths {
            progress.entry(path);

            let info = match self.fs.stat(path).await {
                Ok(info) => info,
                Err(e) => {
                    warn!("Could not get info for {}: {}", path, e);
                    writer.metadata_failure(path, &e).await?;
                    stats.metadata_failures += 1;
                    continue;
                }
            };

            if !info.is_file() {
                stats.non_files += 1;
                continue;
            }

            if !self.filters.accepts(path) {
                debug!("Filtered out {}", path);
                stats.entries_filtered += 1;
                continue;
            }

            let reader = match self.fs.open_read(path).await {
                Ok(reader) => reader,
                Err(e) => {
                    warn!("Error reading {}: {}", path, e);
                    writer.read_failure(path, &e).await?;
                    stats.read_failures += 1;
                    continue;
                }
            };

            writer.header(path).await?;
            match writer.body(path, reader).await? {
                BodyOutcome::Complete { lines } => {
                    stats.files_rendered += 1;
                    stats.lines_written += lines;
                }
                BodyOutcome::Interrupted { lines, detail } => {
                    warn!("Error reading {} after {} lines: {}", path, lines, detail);
                    stats.read_failures += 1;
                    stats.lines_written += lines;
                }
            }
        }

        progress.finish();
        info!(
            "Crawled {} in {:.2}s: {}",
            locator,
            progress.elapsed().as_secs_f64(),
            stats.summary()
        );

        Ok(stats)
    }
}

/// Runs one crawl: verify the ref, connect a filesystem for the locator, list,
/// then open the sink and render into it. The sink is only opened once the
/// listing succeeded, so a missing branch or empty listing leaves an existing
/// output file untouched. Once opened it is flushed whether or not rendering
/// succeeds.
pub async fn crawl_repository<W, F, O, Fut>(
    request: &CrawlRequest,
    verifier: &dyn RefVerifier,
    connect: F,
    open: O,
) -> Result<CrawlStats>
where
    W: AsyncWrite + Unpin + Send,
    F: FnOnce(&CrawlRequest) -> Result<Box<dyn RemoteFileSystem>>,
    O: FnOnce() -> Fut,
    Fut: Future<Output = Result<W>>,
{
    verifier
        .verify(&request.locator, request.credentials.as_ref())
        .await?;

    let fs = connect(request)?;
    let crawler = Crawler::new(fs.as_ref(), &request.filters).with_progress(request.show_progress);
    let paths = crawler.list(&request.locator).await?;

    let mut out = open().await?;
    let rendered = crawler.render(&request.locator, &paths, &mut out).await;

    let flushed = out.flush().await;
    let stats = rendered?;
    flushed?;
    Ok(stats)
}
