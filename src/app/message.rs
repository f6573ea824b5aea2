//! Application messages

use std::sync::Arc;

use crate::cache::{CacheStats, ClearResult, DiskCache};
use crate::ui::primitives::progressive_image;

/// Application messages
#[derive(Clone)]
pub enum Message {
    // ============ Cache ============
    /// Disk cache initialized
    CacheReady(Arc<DiskCache>),
    /// Disk cache could not be created
    CacheFailed(String),
    /// Clear all cached files
    ClearCache,
    /// Cache clear finished
    CacheCleared(Result<ClearResult, String>),
    /// Cache statistics scanned
    CacheStatsLoaded(Result<CacheStats, String>),

    // ============ Gallery ============
    /// Completion for the image of a gallery card
    Image(usize, progressive_image::Message),
    /// Show the next identifier in a card
    CycleItem(usize),
    /// Remove a card
    RemoveItem(usize),
    /// Add a card showing the next identifier
    AddItem,
    /// Recreate every card from scratch
    ReloadAll,

    // ============ Appearance ============
    ToggleOverlay,
    ToggleTint,
    TogglePreviews,
    CycleRenderTarget,
    ToggleDarkMode,

    /// Animation frame
    AnimationTick,
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        macro_rules! simple {
            ($name:literal) => { write!(f, $name) };
            ($name:literal, $($arg:tt)*) => { write!(f, concat!($name, "({})"), format_args!($($arg)*)) };
        }

        match self {
            // High-frequency
            Self::AnimationTick => simple!("AnimationTick"),

            Self::CacheReady(cache) => simple!("CacheReady", "{}", cache.cache_dir().display()),
            Self::CacheFailed(e) => simple!("CacheFailed", "{}", e),
            Self::ClearCache => simple!("ClearCache"),
            Self::CacheCleared(Ok(r)) => simple!("CacheCleared", "{} files", r.files_deleted),
            Self::CacheCleared(Err(e)) => simple!("CacheCleared", "error: {}", e),
            Self::CacheStatsLoaded(Ok(s)) => simple!("CacheStatsLoaded", "{} files", s.file_count),
            Self::CacheStatsLoaded(Err(e)) => simple!("CacheStatsLoaded", "error: {}", e),

            Self::Image(id, progressive_image::Message::Resolved { generation, result, .. }) => {
                simple!(
                    "Image",
                    "id={}, generation={}, ok={}",
                    id,
                    generation,
                    result.is_ok()
                )
            }
            Self::Image(id, progressive_image::Message::PreviewBlurred { result, .. }) => {
                simple!("Image", "id={}, blurred={}", id, result.is_ok())
            }
            Self::CycleItem(id) => simple!("CycleItem", "{}", id),
            Self::RemoveItem(id) => simple!("RemoveItem", "{}", id),
            Self::AddItem => simple!("AddItem"),
            Self::ReloadAll => simple!("ReloadAll"),

            Self::ToggleOverlay => simple!("ToggleOverlay"),
            Self::ToggleTint => simple!("ToggleTint"),
            Self::TogglePreviews => simple!("TogglePreviews"),
            Self::CycleRenderTarget => simple!("CycleRenderTarget"),
            Self::ToggleDarkMode => simple!("ToggleDarkMode"),
        }
    }
}
