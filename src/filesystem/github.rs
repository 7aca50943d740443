// file: src/filesystem/github.rs
// description: GitHub-backed filesystem using the git trees, contents and raw endpoints
// reference: https://docs.github.com/en/rest/git/trees

use crate::config::GitHubConfig;
use crate::error::{CrawlError, Result};
use crate::filesystem::{EntryInfo, EntryKind, EntryReader, PathMatcher, RemoteFileSystem};
use crate::repository::{Credentials, RepositoryLocator};
use crate::utils::http::{endpoint, error_message};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Directory(Vec<IgnoredAny>),
    Item(ContentsItem),
}

#[derive(Debug, Deserialize)]
struct ContentsItem {
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

pub struct GitHubFileSystem {
    client: Client,
    api_url: String,
    raw_url: String,
    locator: RepositoryLocator,
    credentials: Option<Credentials>,
    // Filled by the trees listing so stat rarely needs a second request.
    known: Mutex<HashMap<String, EntryInfo>>,
}

impl GitHubFileSystem {
    pub fn new(
        client: Client,
        config: &GitHubConfig,
        locator: RepositoryLocator,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            raw_url: config.raw_url.clone(),
            locator,
            credentials,
            known: Mutex::new(HashMap::new()),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(c) => request.basic_auth(&c.username, Some(&c.token)),
            None => request,
        }
    }

    fn repo_segments(&self) -> [&str; 3] {
        [
            "repos",
            self.locator.organization.as_str(),
            self.locator.repository.as_str(),
        ]
    }

    async fn failure(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);
        if message.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, message)
        }
    }

    fn kind_from_tree(kind: &str) -> EntryKind {
        match kind {
            "blob" => EntryKind::File,
            "tree" => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }

    fn kind_from_contents(kind: &str) -> EntryKind {
        match kind {
            "file" => EntryKind::File,
            "dir" => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }

    async fn fetch_tree(&self) -> Result<TreeResponse> {
        let mut url = endpoint(
            &self.api_url,
            self.repo_segments()
                .into_iter()
                .chain(["git", "trees"])
                .chain(self.locator.reference.split('/')),
        )?;
        url.query_pairs_mut().append_pair("recursive", "1");

        debug!("Listing tree at {}", url);

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| CrawlError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CrawlError::Remote(Self::failure(response).await));
        }

        response
            .json::<TreeResponse>()
            .await
            .map_err(|e| CrawlError::Remote(format!("Malformed tree response: {}", e)))
    }

    async fn fetch_contents(&self, path: &str) -> Result<EntryInfo> {
        let mut url = endpoint(
            &self.api_url,
            self.repo_segments()
                .into_iter()
                .chain(["contents"])
                .chain(path.split('/')),
        )?;
        url.query_pairs_mut().append_pair("ref", &self.locator.reference);

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| CrawlError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CrawlError::Remote(Self::failure(response).await));
        }

        let contents = response
            .json::<ContentsResponse>()
            .await
            .map_err(|e| CrawlError::Remote(format!("Malformed contents response: {}", e)))?;

        let (kind, size) = match contents {
            ContentsResponse::Directory(children) => {
                debug!("{} is a directory with {} entries", path, children.len());
                (EntryKind::Directory, None)
            }
            ContentsResponse::Item(item) => (Self::kind_from_contents(&item.kind), item.size),
        };

        Ok(EntryInfo {
            path: path.to_string(),
            kind,
            size,
        })
    }
}

#[async_trait]
impl RemoteFileSystem for GitHubFileSystem {
    async fn list_recursive(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = PathMatcher::new(pattern)?;
        let tree = self.fetch_tree().await?;

        if tree.truncated {
            warn!(
                "Tree listing for {} was truncated by the API; some entries will be missing",
                self.locator
            );
        }

        let mut known = self.known.lock().unwrap_or_else(PoisonError::into_inner);
        let mut paths = Vec::new();

        for item in tree.tree {
            let info = EntryInfo {
                path: item.path.clone(),
                kind: Self::kind_from_tree(&item.kind),
                size: item.size,
            };
            known.insert(item.path.clone(), info);

            if matcher.is_match(&item.path) {
                paths.push(item.path);
            }
        }

        info!(
            "Listed {} of {} entries in {} matching '{}'",
            paths.len(),
            known.len(),
            self.locator,
            pattern
        );
        Ok(paths)
    }

    async fn stat(&self, path: &str) -> Result<EntryInfo> {
        let cached = self
            .known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned();

        match cached {
            Some(info) => Ok(info),
            None => {
                debug!("No cached metadata for {}, asking contents API", path);
                self.fetch_contents(path).await
            }
        }
    }

    async fn open_read(&self, path: &str) -> Result<EntryReader> {
        let url = endpoint(
            &self.raw_url,
            [
                self.locator.organization.as_str(),
                self.locator.repository.as_str(),
            ]
            .into_iter()
            .chain(self.locator.reference.split('/'))
            .chain(path.split('/')),
        )?;

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| CrawlError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CrawlError::Remote(Self::failure(response).await));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CrawlError::Remote(e.to_string()))?;

        Ok(Box::new(Cursor::new(bytes.to_vec())))
    }
}
