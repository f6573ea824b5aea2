//! Disk-backed image cache
//!
//! Remote images are downloaded once into the cache directory and reused on
//! every later resolution. Concurrent resolutions of the same URL share a
//! single download.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{CacheError, ImageCache, Resolution};
use crate::utils::{cache_stem, detect_image_format, find_cached_image};

const USER_AGENT: &str = concat!("progressive-image/", env!("CARGO_PKG_VERSION"));

type SharedFetch = Shared<BoxFuture<'static, Result<PathBuf, CacheError>>>;

/// Where an identifier points to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Locator {
    Local(PathBuf),
    Remote(String),
}

fn locate(uri: &str) -> Result<Locator, CacheError> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(Locator::Local(PathBuf::from(path)));
    }
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(Locator::Remote(uri.to_string()));
    }
    if Path::new(uri).is_absolute() {
        return Ok(Locator::Local(PathBuf::from(uri)));
    }
    Err(CacheError::InvalidUri(uri.to_string()))
}

/// Disk cache manager
#[derive(Debug, Clone)]
pub struct DiskCache {
    inner: Arc<Inner>,
}

struct Inner {
    cache_dir: PathBuf,
    client: reqwest::Client,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner")
            .field("cache_dir", &self.cache_dir)
            .field("client", &"<HttpClient>")
            .field("in_flight", &self.in_flight.lock().len())
            .finish()
    }
}

impl DiskCache {
    /// Create a new disk cache rooted at `cache_dir`
    pub fn new(cache_dir: PathBuf, timeout: Duration) -> Result<Self> {
        fs::create_dir_all(&cache_dir).context("Failed to create image cache directory")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                cache_dir,
                client,
                in_flight: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.inner.cache_dir
    }

    /// Number of downloads currently running
    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.inner.in_flight.lock().len()
    }

    fn resolve_remote(&self, url: String) -> Resolution {
        let mut in_flight = self.inner.in_flight.lock();

        if let Some(pending) = in_flight.get(&url) {
            debug!("Joining in-flight download for {}", url);
            return Resolution::new(url, pending.clone());
        }

        let inner = self.inner.clone();
        let key = url.clone();
        let fetch = async move {
            let result = inner.fetch(&key).await;
            inner.in_flight.lock().remove(&key);
            result
        }
        .boxed()
        .shared();

        in_flight.insert(url.clone(), fetch.clone());
        Resolution::new(url, fetch)
    }

    /// Calculate cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for (_, size) in collect_entries(self.cache_dir()) {
            stats.total_bytes += size;
            stats.file_count += 1;
        }
        stats
    }

    /// Remove every cached file
    pub fn clear(&self) -> ClearResult {
        let mut result = ClearResult::default();

        for (path, size) in collect_entries(self.cache_dir()) {
            match fs::remove_file(&path) {
                Ok(_) => {
                    result.files_deleted += 1;
                    result.bytes_freed += size;
                }
                Err(e) => {
                    warn!("Failed to delete cache file {:?}: {}", path, e);
                    result.errors += 1;
                }
            }
        }

        info!(
            "Image cache cleared: {} files deleted, {} MB freed, {} errors",
            result.files_deleted,
            result.mb_freed(),
            result.errors
        );

        result
    }

    /// Clean up orphan .tmp files from interrupted downloads
    ///
    /// Should run at startup, before any resolution is issued.
    pub fn cleanup_temp_files(&self) -> ClearResult {
        let mut result = ClearResult::default();

        for (path, size) in collect_entries(self.cache_dir()) {
            if path.extension().map(|e| e != "tmp").unwrap_or(true) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(_) => {
                    info!("Cleaned up orphan temp file: {:?} ({} bytes)", path, size);
                    result.files_deleted += 1;
                    result.bytes_freed += size;
                }
                Err(e) => {
                    warn!("Failed to delete temp file {:?}: {}", path, e);
                    result.errors += 1;
                }
            }
        }

        result
    }
}

impl Inner {
    /// Download `url` into the cache unless a copy already exists
    async fn fetch(&self, url: &str) -> Result<PathBuf, CacheError> {
        let stem = cache_stem(url);

        let (dir, lookup) = (self.cache_dir.clone(), stem.clone());
        let existing = tokio::task::spawn_blocking(move || find_cached_image(&dir, &lookup))
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?;
        if let Some(existing) = existing {
            debug!("Cache hit for {} at {}", url, existing.display());
            return Ok(existing);
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Download of {} failed with status {}", url, status);
            return Err(CacheError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;

        // Write to a temp name first so a half-written file is never served
        let temp_path = self.cache_dir.join(format!("{}.tmp", stem));
        if let Err(e) = tokio::fs::write(&temp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let ext = detect_image_format(&bytes);
        let final_path = self.cache_dir.join(format!("{}.{}", stem, ext));

        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            warn!("Failed to rename temp file {:?}: {}", temp_path, e);
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        info!(
            "Cached {} ({} KB) at {}",
            url,
            bytes.len() / 1024,
            final_path.display()
        );
        Ok(final_path)
    }
}

impl ImageCache for DiskCache {
    fn resolve(&self, uri: &str) -> Resolution {
        match locate(uri) {
            Ok(Locator::Remote(url)) => self.resolve_remote(url),
            Ok(Locator::Local(path)) => Resolution::new(uri, async move {
                let metadata = tokio::fs::metadata(&path).await?;
                if metadata.is_file() {
                    Ok(path)
                } else {
                    Err(CacheError::Io(format!("{} is not a file", path.display())))
                }
            }),
            Err(e) => Resolution::ready(uri, Err(e)),
        }
    }
}

/// Collect (path, size) for every file directly inside `dir`
fn collect_entries(dir: &Path) -> Vec<(PathBuf, u64)> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("Failed to read cache directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    read_dir
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if !path.is_file() {
                return None;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            Some((path, size))
        })
        .collect()
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Total size in bytes
    pub total_bytes: u64,
    /// Number of files
    pub file_count: usize,
}

impl CacheStats {
    /// Get total size in megabytes
    pub fn total_mb(&self) -> u64 {
        self.total_bytes / (1024 * 1024)
    }
}

/// Result of a cache clear operation
#[derive(Debug, Clone, Default)]
pub struct ClearResult {
    pub files_deleted: usize,
    pub bytes_freed: u64,
    pub errors: usize,
}

impl ClearResult {
    /// Get bytes freed in megabytes
    pub fn mb_freed(&self) -> u64 {
        self.bytes_freed / (1024 * 1024)
    }
}
