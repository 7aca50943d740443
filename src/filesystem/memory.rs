// file: src/filesystem/memory.rs
// description: In-memory filesystem with scripted failures, for tests and embedding

use crate::error::{CrawlError, Result};
use crate::filesystem::{EntryInfo, EntryKind, EntryReader, PathMatcher, RemoteFileSystem};
use async_trait::async_trait;
use std::io::Cursor;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
struct MemoryEntry {
    path: String,
    kind: EntryKind,
    content: Vec<u8>,
    stat_error: Option<String>,
    read_error: Option<String>,
}

/// Entries are listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    entries: Vec<MemoryEntry>,
    listing_error: Option<String>,
    patterns: Mutex<Vec<String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, path: &str, kind: EntryKind, content: Vec<u8>) -> Self {
        self.entries.push(MemoryEntry {
            path: path.to_string(),
            kind,
            content,
            stat_error: None,
            read_error: None,
        });
        self
    }

    pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.push(path, EntryKind::File, content.into())
    }

    pub fn with_directory(self, path: &str) -> Self {
        self.push(path, EntryKind::Directory, Vec::new())
    }

    pub fn with_other(self, path: &str) -> Self {
        self.push(path, EntryKind::Other, Vec::new())
    }

    /// Listed, but every metadata lookup fails with `message`.
    pub fn with_broken_metadata(mut self, path: &str, message: &str) -> Self {
        self = self.push(path, EntryKind::File, Vec::new());
        if let Some(entry) = self.entries.last_mut() {
            entry.stat_error = Some(message.to_string());
        }
        self
    }

    /// A file whose open fails with `message`.
    pub fn with_unreadable_file(mut self, path: &str, message: &str) -> Self {
        self = self.push(path, EntryKind::File, Vec::new());
        if let Some(entry) = self.entries.last_mut() {
            entry.read_error = Some(message.to_string());
        }
        self
    }

    /// Every `list_recursive` call fails with `message`.
    pub fn with_listing_error(mut self, message: &str) -> Self {
        self.listing_error = Some(message.to_string());
        self
    }

    /// Patterns passed to `list_recursive`, oldest first.
    pub fn requested_patterns(&self) -> Vec<String> {
        self.patterns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn find(&self, path: &str) -> Result<&MemoryEntry> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .ok_or_else(|| CrawlError::Remote(format!("No such file: {}", path)))
    }
}

#[async_trait]
impl RemoteFileSystem for MemoryFileSystem {
    async fn list_recursive(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = PathMatcher::new(pattern)?;
        self.patterns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(pattern.to_string());

        if let Some(message) = &self.listing_error {
            return Err(CrawlError::Remote(message.clone()));
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| matcher.is_match(&e.path))
            .map(|e| e.path.clone())
            .collect())
    }

    async fn stat(&self, path: &str) -> Result<EntryInfo> {
        let entry = self.find(path)?;
        if let Some(message) = &entry.stat_error {
            return Err(CrawlError::Remote(message.clone()));
        }

        Ok(EntryInfo {
            path: entry.path.clone(),
            kind: entry.kind,
            size: Some(entry.content.len() as u64),
        })
    }

    async fn open_read(&self, path: &str) -> Result<EntryReader> {
        let entry = self.find(path)?;
        if let Some(message) = &entry.read_error {
            return Err(CrawlError::Remote(message.clone()));
        }
        if entry.kind != EntryKind::File {
            return Err(CrawlError::Remote(format!("Not a file: {}", path)));
        }

        Ok(Box::new(Cursor::new(entry.content.clone())))
    }
}
