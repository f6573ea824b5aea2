//! Load controller
//!
//! Tracks which identifier is active and whether it has been resolved to a
//! local path. Every resolution is issued with a [`Ticket`] carrying a
//! generation number; completions are only committed when their generation is
//! still current and the image has not been torn down.

use std::path::{Path, PathBuf};

/// One issued resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub uri: String,
}

/// Result of syncing the loader with the owner's identifier
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Activation {
    /// Identifier differs from the one seen in the previous cycle
    pub uri_changed: bool,
    /// Resolution to issue, if any
    pub ticket: Option<Ticket>,
}

/// How a completion relates to the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Belongs to the active generation and was applied
    Current,
    /// A newer identifier was requested since
    Stale,
    /// The image was torn down
    Unmounted,
}

#[derive(Debug)]
pub struct Loader {
    /// Last synced identifier; `None` until the first activation
    synced: Option<Option<String>>,
    generation: u64,
    pending: Option<u64>,
    resolved: Option<PathBuf>,
    mounted: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self {
            synced: None,
            generation: 0,
            pending: None,
            resolved: None,
            mounted: true,
        }
    }

    /// Compare `uri` with the previous cycle and decide whether to resolve
    ///
    /// A changed identifier clears the resolved path and starts a new
    /// generation. A ticket is returned only for a non-empty identifier, so an
    /// unchanged or absent identifier never reaches the cache.
    pub fn sync(&mut self, uri: Option<&str>) -> Activation {
        if !self.mounted {
            return Activation::default();
        }

        let uri = uri.filter(|u| !u.is_empty());
        if self.synced.as_ref().map(|s| s.as_deref()) == Some(uri) {
            return Activation::default();
        }

        self.synced = Some(uri.map(String::from));
        self.generation += 1;
        self.resolved = None;
        self.pending = None;

        let ticket = uri.map(|uri| {
            self.pending = Some(self.generation);
            Ticket {
                generation: self.generation,
                uri: uri.to_string(),
            }
        });

        Activation {
            uri_changed: true,
            ticket,
        }
    }

    /// Classify a completion for `generation` without applying anything
    pub fn settle(&mut self, generation: u64) -> Settlement {
        if !self.mounted {
            Settlement::Unmounted
        } else if generation != self.generation {
            Settlement::Stale
        } else {
            self.pending = None;
            Settlement::Current
        }
    }

    /// Apply a successful resolution if it is still wanted
    pub fn commit(&mut self, generation: u64, path: PathBuf) -> Settlement {
        let settlement = self.settle(generation);
        if settlement == Settlement::Current {
            self.resolved = Some(path);
        }
        settlement
    }

    /// Stop accepting completions
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.pending = None;
    }

    pub fn resolved(&self) -> Option<&Path> {
        self.resolved.as_deref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// A resolution for the active generation is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, ImageCache, Resolution};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use tokio::sync::oneshot;

    /// Cache whose resolutions complete only when the test says so
    #[derive(Debug, Default)]
    struct ManualCache {
        calls: Mutex<Vec<String>>,
        senders: Mutex<HashMap<String, oneshot::Sender<Result<PathBuf, CacheError>>>>,
    }

    impl ManualCache {
        fn complete(&self, uri: &str, result: Result<PathBuf, CacheError>) {
            let sender = self.senders.lock().remove(uri).unwrap();
            sender.send(result).unwrap();
        }
    }

    impl ImageCache for ManualCache {
        fn resolve(&self, uri: &str) -> Resolution {
            let (tx, rx) = oneshot::channel();
            self.calls.lock().push(uri.to_string());
            self.senders.lock().insert(uri.to_string(), tx);
            Resolution::new(uri, async move {
                rx.await
                    .unwrap_or_else(|_| Err(CacheError::Io("cache dropped".into())))
            })
        }
    }

    #[test]
    fn test_absent_uri_never_issues() {
        let mut loader = Loader::new();
        let activation = loader.sync(None);
        assert!(activation.uri_changed);
        assert_eq!(activation.ticket, None);

        assert_eq!(loader.sync(None), Activation::default());
        assert_eq!(loader.sync(Some("")), Activation::default());
        assert_eq!(loader.resolved(), None);
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_one_ticket_per_uri() {
        let mut loader = Loader::new();
        let ticket = loader.sync(Some("a")).ticket.unwrap();
        assert_eq!(ticket.uri, "a");
        assert!(loader.is_loading());

        for _ in 0..5 {
            assert_eq!(loader.sync(Some("a")), Activation::default());
        }
    }

    #[test]
    fn test_commit_current() {
        let mut loader = Loader::new();
        let ticket = loader.sync(Some("a")).ticket.unwrap();
        assert_eq!(
            loader.commit(ticket.generation, PathBuf::from("/c/a.jpg")),
            Settlement::Current
        );
        assert_eq!(loader.resolved(), Some(Path::new("/c/a.jpg")));
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_uri_change_resets_resolution() {
        let mut loader = Loader::new();
        let a = loader.sync(Some("a")).ticket.unwrap();
        loader.commit(a.generation, PathBuf::from("/c/a.jpg"));

        let b = loader.sync(Some("b")).ticket.unwrap();
        assert_eq!(b.generation, a.generation + 1);
        assert_eq!(loader.resolved(), None);
    }

    #[test]
    fn test_superseded_completion_is_discarded() {
        let mut loader = Loader::new();
        let a = loader.sync(Some("a")).ticket.unwrap();
        let b = loader.sync(Some("b")).ticket.unwrap();

        assert_eq!(
            loader.commit(a.generation, PathBuf::from("/c/a.jpg")),
            Settlement::Stale
        );
        assert_eq!(loader.resolved(), None);
        assert!(loader.is_loading());

        loader.commit(b.generation, PathBuf::from("/c/b.jpg"));
        assert_eq!(loader.resolved(), Some(Path::new("/c/b.jpg")));
    }

    #[test]
    fn test_teardown_discards_everything() {
        let mut loader = Loader::new();
        let a = loader.sync(Some("a")).ticket.unwrap();
        loader.teardown();

        assert_eq!(
            loader.commit(a.generation, PathBuf::from("/c/a.jpg")),
            Settlement::Unmounted
        );
        assert_eq!(loader.resolved(), None);
        assert_eq!(loader.sync(Some("b")), Activation::default());
        assert!(!loader.is_mounted());
    }

    #[tokio::test]
    async fn test_out_of_order_arrivals() {
        let cache = std::sync::Arc::new(ManualCache::default());
        let mut loader = Loader::new();

        let a = loader.sync(Some("a")).ticket.unwrap();
        let pending_a = tokio::spawn(cache.resolve(&a.uri).local_path());
        let b = loader.sync(Some("b")).ticket.unwrap();
        let pending_b = tokio::spawn(cache.resolve(&b.uri).local_path());
        assert_eq!(*cache.calls.lock(), vec!["a".to_string(), "b".to_string()]);

        // b settles first, a arrives late
        cache.complete("b", Ok(PathBuf::from("/c/b.jpg")));
        let path_b = pending_b.await.unwrap().unwrap();
        assert_eq!(loader.commit(b.generation, path_b), Settlement::Current);

        cache.complete("a", Ok(PathBuf::from("/c/a.jpg")));
        let path_a = pending_a.await.unwrap().unwrap();
        assert_eq!(loader.commit(a.generation, path_a), Settlement::Stale);

        assert_eq!(loader.resolved(), Some(Path::new("/c/b.jpg")));
    }

    #[tokio::test]
    async fn test_failure_after_teardown_is_silent() {
        let cache = ManualCache::default();
        let mut loader = Loader::new();

        let a = loader.sync(Some("a")).ticket.unwrap();
        let pending = tokio::spawn(cache.resolve(&a.uri).local_path());
        loader.teardown();

        cache.complete("a", Err(CacheError::Status(500)));
        assert!(pending.await.unwrap().is_err());
        assert_eq!(loader.settle(a.generation), Settlement::Unmounted);
        assert_eq!(loader.resolved(), None);
    }
}
