// file: src/exporter/sink.rs
// description: console or file destination for the transcript
// reference: https://docs.rs/tokio/latest/tokio/fs/

use crate::error::{CrawlError, Result};
use crate::utils::validation::Validator;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, BufWriter};
use tracing::info;

pub type OutputSink = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Console,
    File(PathBuf),
}

impl OutputTarget {
    /// Validates an optional `--output` value without touching the filesystem
    /// beyond a directory check.
    pub fn from_arg(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                Validator::validate_output_path(path)?;
                Ok(Self::File(path.to_path_buf()))
            }
            None => Ok(Self::Console),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub async fn open(&self) -> Result<OutputSink> {
        let writer: Box<dyn AsyncWrite + Send + Unpin> = match self {
            Self::Console => Box::new(tokio::io::stdout()),
            Self::File(path) => {
                if let Some(parent) = path.parent() {
                    create_missing_dirs(parent).await?;
                }

                info!("Writing transcript to {}", path.display());
                let file = fs::File::create(path)
                    .await
                    .map_err(|source| CrawlError::Output {
                        path: path.clone(),
                        source,
                    })?;
                Box::new(file)
            }
        };

        Ok(BufWriter::new(writer))
    }
}

/// Creates each missing ancestor of `dir`, outermost first, logging every one.
pub async fn create_missing_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut missing = Vec::new();
    let mut current = Some(dir);

    while let Some(path) = current {
        if path.as_os_str().is_empty() || fs::try_exists(path).await.unwrap_or(false) {
            break;
        }
        missing.push(path.to_path_buf());
        current = path.parent();
    }

    missing.reverse();
    for path in &missing {
        info!("Creating directory: {}", path.display());
        fs::create_dir(path)
            .await
            .map_err(|source| CrawlError::Output {
                path: path.clone(),
                source,
            })?;
    }

    Ok(missing)
}
