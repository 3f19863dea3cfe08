//! Error types for the proxy-manager crate.

use http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned when a proxy cannot be handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The pool was empty at selection time.
    #[error("no proxies available")]
    NoProxiesAvailable,
    /// No candidate among the attempted set passed the liveness check.
    #[error("proxy validation failed")]
    ValidationFailed,
}

impl SelectError {
    /// HTTP status a front end should answer with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SelectError::NoProxiesAvailable => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned when a proxy list cannot be loaded from its source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source does not exist.
    #[error("proxy source not found: {0}")]
    NotFound(String),
    /// The source exists but could not be read.
    #[error("failed to read proxy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The remote list could not be fetched.
    #[error("failed to fetch proxy list: {0}")]
    Fetch(#[from] reqwest::Error),
    /// The remote list answered with a non-success status.
    #[error("proxy list {url} answered with status {status}")]
    Status { url: String, status: StatusCode },
}

impl LoadError {
    /// Whether the source was simply absent, as opposed to broken.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}
