use url::Url;

use crate::core::filename;
use crate::error::{Error, Result};

/// The resource being downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: Url,
    /// Name derived from the URL path, used when the server suggests none.
    pub fallback_filename: String,
}

impl DownloadTarget {
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::RequestConstruction(format!("{url}: {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::RequestConstruction(format!(
                    "unsupported scheme `{other}`"
                )));
            }
        }
        let fallback_filename = filename::from_url(&url);
        Ok(Self {
            url,
            fallback_filename,
        })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// What the capability probe learned about the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMetadata {
    pub content_length: u64,
    /// Filename suggested through `Content-Disposition`, already sanitised.
    pub filename: Option<String>,
    pub ranges_supported: bool,
}

impl ContentMetadata {
    /// Server suggestion first, then the URL-derived name.
    pub fn resolve_filename(&self, target: &DownloadTarget) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| target.fallback_filename.clone())
    }

    /// Fails with [`Error::UnsupportedRange`] when the parallel path is not
    /// available for this resource.
    pub fn require_ranges(&self) -> Result<()> {
        if self.ranges_supported {
            Ok(())
        } else {
            Err(Error::UnsupportedRange)
        }
    }
}
