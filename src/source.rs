//! Bulk sources the pool is (re)populated from.

use crate::error::LoadError;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// A line-oriented list of proxy addresses.
#[async_trait]
pub trait ProxySource: Send + Sync {
    /// Read the whole list. Lines come back trimmed and non-empty, in source order.
    async fn load(&self) -> Result<Vec<String>, LoadError>;
}

/// Proxy list stored in a local file, one address per line.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProxySource for FileSource {
    async fn load(&self) -> Result<Vec<String>, LoadError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(parse_proxy_list(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(LoadError::NotFound(self.path.display().to_string()))
            }
            Err(e) => Err(LoadError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Proxy list served over HTTP(S).
///
/// The list is fetched directly; `HTTP_PROXY` and friends are ignored.
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
}

impl UrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ProxySource for UrlSource {
    async fn load(&self) -> Result<Vec<String>, LoadError> {
        let client = Client::builder().no_proxy().build()?;
        let response = client.get(&self.url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound(self.url.clone()));
        }
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                status,
            });
        }
        let content = response.text().await?;
        Ok(parse_proxy_list(&content))
    }
}

/// Pick a source implementation from a location string: http(s) URLs are
/// fetched, anything else is treated as a file path.
pub fn source_for(location: &str) -> Arc<dyn ProxySource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(UrlSource::new(location))
    } else {
        Arc::new(FileSource::new(location))
    }
}

/// Split list content into trimmed, non-empty address lines.
pub fn parse_proxy_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
