//! Streaming asset downloads into local files

use crate::config::HttpSettings;
use crate::http::{self, RetryPolicy};
use crate::humanize::ByteSize;
use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Download produced no data")]
    Empty,

    #[error("Download truncated: expected {expected} bytes, got {written}")]
    Truncated { expected: u64, written: u64 },
}

pub type Result<T> = std::result::Result<T, DownloadError>;

/// Downloads a URL into a file, never leaving an empty or partial file behind
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl AssetFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = http::build_client(settings).map_err(DownloadError::Transport)?;
        Ok(Self::with_client(client, RetryPolicy::from(settings)))
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Download `url` into `destination`, returning the number of bytes written.
    ///
    /// The GET is retried on transport errors; nothing is created on disk until
    /// a response with a success status arrives.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        debug!(url, path = %destination.display(), "Starting download");

        let mut response = self
            .retry
            .send(url, || self.client.get(url))
            .await
            .map_err(|e| {
                if e.is_builder() {
                    DownloadError::InvalidUrl {
                        url: url.to_string(),
                        source: e,
                    }
                } else {
                    DownloadError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let expected = response.content_length();

        let file = File::create(destination)
            .await
            .map_err(|source| DownloadError::Io {
                path: destination.to_path_buf(),
                source,
            })?;
        let mut writer = BufWriter::new(file);

        let written = match copy_body(&mut response, &mut writer, destination).await {
            Ok(written) => written,
            Err(e) => {
                drop(writer);
                discard(destination).await;
                return Err(e);
            }
        };
        drop(writer);

        if written == 0 {
            warn!(url, path = %destination.display(), "Download produced no data");
            discard(destination).await;
            return Err(DownloadError::Empty);
        }

        if let Some(expected) = expected {
            if written < expected {
                warn!(url, expected, written, "Download shorter than declared length");
                discard(destination).await;
                return Err(DownloadError::Truncated { expected, written });
            }
        }

        debug!(url, size = %ByteSize(written), "Download completed");
        Ok(written)
    }
}

async fn copy_body(
    response: &mut reqwest::Response,
    writer: &mut BufWriter<File>,
    destination: &Path,
) -> Result<u64> {
    let io_error = |source: std::io::Error| DownloadError::Io {
        path: destination.to_path_buf(),
        source,
    };

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(DownloadError::Body)? {
        writer.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
    }
    writer.flush().await.map_err(io_error)?;

    Ok(written)
}

/// Remove a file this fetch created; a failure here is only logged.
async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove incomplete download");
    }
}
