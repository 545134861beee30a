use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::data::{ChunkFile, RangeSpec};
use crate::effects::http::{BodyResponse, HttpClient};
use crate::effects::progress::ProgressAggregator;
use crate::error::{Error, Result};

const PARTIAL_CONTENT: u16 = 206;

/// Streams one byte range into its own chunk file.
///
/// Cheap to clone; every fetch task of a download holds one.
pub struct RangeFetcher<C: HttpClient> {
    client: Arc<C>,
    url: Arc<str>,
    headers: Arc<[(String, String)]>,
    progress: Arc<ProgressAggregator>,
}

impl<C: HttpClient> Clone for RangeFetcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            url: Arc::clone(&self.url),
            headers: Arc::clone(&self.headers),
            progress: Arc::clone(&self.progress),
        }
    }
}

impl<C: HttpClient> RangeFetcher<C> {
    pub fn new(
        client: Arc<C>,
        url: impl Into<Arc<str>>,
        headers: Arc<[(String, String)]>,
        progress: Arc<ProgressAggregator>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            headers,
            progress,
        }
    }

    /// Fetch `range` into `path`.
    ///
    /// The server must answer `206 Partial Content` with exactly
    /// `range.len()` bytes. A `200` means the range was ignored and the body
    /// is the whole resource, which is rejected.
    pub async fn fetch(&self, index: usize, range: RangeSpec, path: PathBuf) -> Result<ChunkFile> {
        tracing::debug!(index, %range, "fetching range");

        let response = self
            .client
            .get(&self.url, Some(range), &self.headers)
            .await
            .map_err(Error::transport)?;

        if response.head.status != PARTIAL_CONTENT {
            return Err(Error::Status {
                status: response.head.status,
                url: self.url.to_string(),
            });
        }

        let byte_count = stream_to_file(response, &path, &self.progress).await?;
        if byte_count != range.len() {
            return Err(Error::ChunkLength {
                index,
                expected: range.len(),
                actual: byte_count,
            });
        }

        tracing::debug!(index, byte_count, "range complete");
        Ok(ChunkFile {
            index,
            path,
            byte_count,
        })
    }
}

/// Plain whole-resource `GET`, used when ranges are not available.
pub struct SequentialFetcher<'a, C: HttpClient> {
    client: &'a C,
    headers: &'a [(String, String)],
    progress: &'a ProgressAggregator,
}

impl<'a, C: HttpClient> SequentialFetcher<'a, C> {
    pub fn new(
        client: &'a C,
        headers: &'a [(String, String)],
        progress: &'a ProgressAggregator,
    ) -> Self {
        Self {
            client,
            headers,
            progress,
        }
    }

    /// Stream the body of `url` into `destination`.
    ///
    /// A partially written destination is removed on failure.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        let result = self.fetch_inner(url, destination).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(destination).await;
        }
        result
    }

    async fn fetch_inner(&self, url: &str, destination: &Path) -> Result<u64> {
        let response = self
            .client
            .get(url, None, self.headers)
            .await
            .map_err(Error::transport)?;

        if !response.head.is_success() {
            return Err(Error::Status {
                status: response.head.status,
                url: url.to_string(),
            });
        }

        stream_to_file(response, destination, self.progress).await
    }
}

async fn stream_to_file<E: std::error::Error + Send>(
    response: BodyResponse<E>,
    path: &Path,
    progress: &ProgressAggregator,
) -> Result<u64> {
    let mut body = response.body;
    let mut file = File::create(path).await?;
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Error::transport)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        progress.add(chunk.len() as u64);
    }

    file.flush().await?;
    Ok(written)
}
