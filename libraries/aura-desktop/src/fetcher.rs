//! Track fetcher for remote URLs and local files

use async_trait::async_trait;
use aura_core::{CoreError, Result, TrackFetcher};
use std::path::Path;
use tracing::debug;

/// [`TrackFetcher`] that GETs `http(s)://` URLs and reads everything else
/// from the local filesystem (`file://` prefix optional)
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CoreError::fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Whether `url` needs the network
pub fn is_remote(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Filesystem path for a non-remote track URL
pub fn local_path(url: &str) -> &Path {
    Path::new(url.strip_prefix("file://").unwrap_or(url))
}

#[async_trait]
impl TrackFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching {}", url);
        if is_remote(url) {
            self.fetch_remote(url).await
        } else {
            Ok(tokio::fs::read(local_path(url)).await?)
        }
    }
}
