//! Image cache collaborator
//!
//! Resolves an image identifier (remote URL or local path) to a file that can
//! be handed straight to the image renderer. The progressive image primitive
//! only talks to the [`ImageCache`] trait; [`DiskCache`] is the implementation
//! the application ships with.

mod disk;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

pub use disk::{CacheStats, ClearResult, DiskCache};

/// Something that can turn an image identifier into a local file
///
/// Implementations are shared by every primitive in the application, so
/// `resolve` must be cheap and must not block: all I/O belongs inside the
/// returned [`Resolution`].
pub trait ImageCache: Send + Sync + fmt::Debug {
    /// Start resolving `uri`
    fn resolve(&self, uri: &str) -> Resolution;
}

/// Pending resolution of one identifier
pub struct Resolution {
    uri: String,
    future: BoxFuture<'static, Result<PathBuf, CacheError>>,
}

impl Resolution {
    /// Wrap a future that materializes `uri` on disk
    pub fn new<F>(uri: impl Into<String>, future: F) -> Self
    where
        F: Future<Output = Result<PathBuf, CacheError>> + Send + 'static,
    {
        Self {
            uri: uri.into(),
            future: future.boxed(),
        }
    }

    /// A resolution whose outcome is already known
    pub fn ready(uri: impl Into<String>, result: Result<PathBuf, CacheError>) -> Self {
        Self::new(uri, futures_util::future::ready(result))
    }

    /// Wait until the content is available locally and return its path
    pub async fn local_path(self) -> Result<PathBuf, CacheError> {
        self.future.await
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("uri", &self.uri)
            .field("future", &"<pending>")
            .finish()
    }
}

/// Cache operation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Filesystem failure while reading or persisting the image
    Io(String),
    /// Transport failure while downloading
    Http(String),
    /// Server answered with a non-success status
    Status(u16),
    /// Identifier is neither a URL nor an absolute path
    InvalidUri(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "Cache IO error: {}", e),
            CacheError::Http(e) => write!(f, "Download failed: {}", e),
            CacheError::Status(code) => write!(f, "Server responded with status {}", code),
            CacheError::InvalidUri(uri) => write!(f, "Unsupported image identifier: {}", uri),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => CacheError::Status(status.as_u16()),
            None => CacheError::Http(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_resolution() {
        let resolution = Resolution::ready("a", Ok(PathBuf::from("/tmp/a.jpg")));
        assert!(format!("{:?}", resolution).contains("\"a\""));
        assert_eq!(
            resolution.local_path().await,
            Ok(PathBuf::from("/tmp/a.jpg"))
        );
    }

    #[tokio::test]
    async fn test_failed_resolution_keeps_error() {
        let resolution = Resolution::ready("b", Err(CacheError::Status(404)));
        assert_eq!(resolution.local_path().await, Err(CacheError::Status(404)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CacheError::Status(503).to_string(),
            "Server responded with status 503"
        );
        assert!(CacheError::InvalidUri("x".into()).to_string().contains('x'));
    }
}
