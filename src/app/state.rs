//! Application state definitions

use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{CacheStats, DiskCache};
use crate::features::Settings;
use crate::ui::primitives::{ImageRequest, ImageSource, ProgressiveImage, RenderTarget};
use crate::ui::theme;

use super::helpers;

/// Main application state
pub struct App {
    pub settings: Settings,
    /// Where settings changes are saved; `None` keeps them in memory
    pub settings_path: Option<PathBuf>,
    /// Shared by every gallery image once initialized
    pub cache: Option<Arc<DiskCache>>,
    pub cache_error: Option<String>,
    pub cache_stats: Option<CacheStats>,
    /// Overlay backend derived from the display settings
    pub target: RenderTarget,
    pub placeholder: ImageSource,
    /// Whether cards get a preview; without one the placeholder shows instead
    pub show_previews: bool,
    pub items: Vec<GalleryItem>,
    pub next_id: usize,
    pub status: Option<Status>,
}

/// One card of the gallery
pub struct GalleryItem {
    pub id: usize,
    /// Index into the gallery identifier list
    pub slot: usize,
    pub preview: ImageSource,
    pub image: ProgressiveImage,
    pub error: Option<String>,
}

/// Status line content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl App {
    pub fn with_settings(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        Self {
            settings_path,
            target: RenderTarget::from_identifier(&settings.display.render_target),
            placeholder: helpers::placeholder_for(&settings.image),
            settings,
            cache: None,
            cache_error: None,
            cache_stats: None,
            show_previews: true,
            items: Vec::new(),
            next_id: 0,
            status: None,
        }
    }

    /// Identifier shown in `slot`, wrapping around the configured list
    pub fn uri_at(&self, slot: usize) -> Option<&str> {
        let images = &self.settings.gallery.images;
        if images.is_empty() {
            None
        } else {
            Some(images[slot % images.len()].as_str())
        }
    }

    /// Request for a card showing `slot`
    pub fn request_for(&self, slot: usize, preview: &ImageSource) -> ImageRequest {
        let uri = self.uri_at(slot).unwrap_or_default();
        let border = theme::border_color(&self.theme());
        helpers::build_request(
            &self.settings.image,
            uri,
            self.show_previews.then_some(preview),
            &self.placeholder,
            border,
        )
    }

    pub fn has_active_animations(&self) -> bool {
        self.items.iter().any(|item| item.image.is_animating())
    }

    /// Save settings after a change made from the UI
    pub fn persist_settings(&self) {
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save_to_file(path) {
            tracing::warn!("Failed to save settings: {}", e);
        }
    }

    pub fn set_status(&mut self, status: Status) {
        match &status {
            Status::Info(msg) => tracing::info!("{}", msg),
            Status::Error(msg) => tracing::error!("{}", msg),
        }
        self.status = Some(status);
    }
}
