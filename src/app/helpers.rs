//! Helper functions for app initialization and gallery setup

use std::sync::Arc;

use iced::{Color, ContentFit, Length};
use xxhash_rust::xxh3::xxh3_64;

use crate::cache::{CacheStats, ClearResult, DiskCache};
use crate::features::settings::{CacheSettings, ImageSettings};
use crate::ui::primitives::{ImageRequest, ImageSource, ImageStyle, RenderTarget};
use crate::utils::default_cache_dir;

/// Height of a gallery card image
pub const CARD_HEIGHT: f32 = 220.0;
/// Corner radius of a gallery card image
pub const CARD_RADIUS: f32 = 16.0;
/// Border around a gallery card image
pub const CARD_BORDER: f32 = 3.0;

/// Side of the generated preview, in pixels
const PREVIEW_SIZE: u32 = 6;

/// Initialize the disk cache
///
/// Removes partial downloads of a previous run first, so no resolution ever
/// sees a stale temp file.
pub async fn init_cache(settings: CacheSettings) -> anyhow::Result<DiskCache> {
    let cache_dir = settings
        .cache_dir
        .clone()
        .map(Into::into)
        .unwrap_or_else(default_cache_dir);

    tokio::task::spawn_blocking(move || -> anyhow::Result<DiskCache> {
        let cache = DiskCache::new(cache_dir, settings.request_timeout())?;
        if settings.cleanup_temp_on_start {
            let cleaned = cache.cleanup_temp_files();
            if cleaned.files_deleted > 0 {
                tracing::info!("Removed {} orphan temp files", cleaned.files_deleted);
            }
        }
        tracing::info!("Image cache ready at {}", cache.cache_dir().display());
        Ok(cache)
    })
    .await?
}

/// Remove every cached file on a worker thread
pub async fn clear_cache(cache: Arc<DiskCache>) -> anyhow::Result<ClearResult> {
    Ok(tokio::task::spawn_blocking(move || cache.clear()).await?)
}

/// Scan the cache directory on a worker thread
pub async fn cache_stats(cache: Arc<DiskCache>) -> anyhow::Result<CacheStats> {
    Ok(tokio::task::spawn_blocking(move || cache.stats()).await?)
}

/// Tiny gradient derived from the identifier, standing in for a low-res thumbnail
pub fn preview_for(uri: &str) -> ImageSource {
    let hash = xxh3_64(uri.as_bytes()).to_le_bytes();
    let from = [hash[0], hash[1], hash[2]];
    let to = [hash[3], hash[4], hash[5]];

    let last = (PREVIEW_SIZE * 2 - 2) as f32;
    let mut pixels = Vec::with_capacity((PREVIEW_SIZE * PREVIEW_SIZE * 4) as usize);
    for y in 0..PREVIEW_SIZE {
        for x in 0..PREVIEW_SIZE {
            let t = (x + y) as f32 / last;
            for c in 0..3 {
                let value = from[c] as f32 + (to[c] as f32 - from[c] as f32) * t;
                pixels.push(value.round() as u8);
            }
            pixels.push(255);
        }
    }

    ImageSource::from_rgba(PREVIEW_SIZE, PREVIEW_SIZE, pixels)
}

/// Single-color placeholder
pub fn solid_placeholder(rgb: [u8; 3]) -> ImageSource {
    ImageSource::from_rgba(1, 1, vec![rgb[0], rgb[1], rgb[2], 255])
}

/// Placeholder from the configured image file, or the solid color
pub fn placeholder_for(settings: &ImageSettings) -> ImageSource {
    match &settings.placeholder_path {
        Some(path) => ImageSource::from_path(path),
        None => solid_placeholder(settings.placeholder_color),
    }
}

/// Request for one gallery card
pub fn build_request(
    settings: &ImageSettings,
    uri: &str,
    preview: Option<&ImageSource>,
    placeholder: &ImageSource,
    border: Color,
) -> ImageRequest {
    let [r, g, b] = settings.placeholder_color;
    let style = ImageStyle::default()
        .size(Length::Fill, CARD_HEIGHT)
        .background(Color::from_rgb8(r, g, b))
        .border(CARD_BORDER, border)
        .radius(CARD_RADIUS);

    let request = ImageRequest::new()
        .uri(uri)
        .placeholder(placeholder.clone())
        .transition_duration(settings.transition_duration())
        .tint(settings.tint)
        .overlay_hidden(settings.overlay_hidden)
        .style(style)
        .content_fit(ContentFit::Cover);

    match preview {
        Some(preview) => request.preview(preview.clone()),
        None => request,
    }
}

/// Identifier of the render target after `target`, wrapping around
pub fn next_target(target: &RenderTarget) -> &'static str {
    match target {
        RenderTarget::FlatTint => "ios",
        RenderTarget::NativeBlur => "none",
        RenderTarget::Unsupported(_) => "android",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::primitives::progressive_image::Tint;

    #[test]
    fn test_preview_is_deterministic_per_uri() {
        let a = preview_for("https://example.com/a.jpg").decode().unwrap().to_rgba8();
        let b = preview_for("https://example.com/a.jpg").decode().unwrap().to_rgba8();
        let c = preview_for("https://example.com/c.jpg").decode().unwrap().to_rgba8();
        assert_eq!(a.dimensions(), (PREVIEW_SIZE, PREVIEW_SIZE));
        assert_eq!(a.as_raw(), b.as_raw());
        assert_ne!(a.as_raw(), c.as_raw());
        assert!(a.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_build_request_carries_settings() {
        let settings = ImageSettings {
            transition_duration_ms: 900,
            tint: Tint::Light,
            overlay_hidden: true,
            ..Default::default()
        };
        let placeholder = solid_placeholder([1, 2, 3]);
        let preview = preview_for("a");

        let request = build_request(&settings, "a", Some(&preview), &placeholder, Color::WHITE);
        assert_eq!(request.uri_key(), Some("a"));
        assert_eq!(request.transition_duration, std::time::Duration::from_millis(900));
        assert_eq!(request.tint, Tint::Light);
        assert!(request.overlay_hidden);
        assert_eq!(request.preview.as_ref(), Some(&preview));
        assert_eq!(request.style.layer_style().border_radius, Some(CARD_RADIUS - CARD_BORDER));
        assert_eq!(request.style.background, Some(Color::from_rgb8(42, 42, 48)));
        assert_eq!(request.content_fit, ContentFit::Cover);

        let bare = build_request(&settings, "a", None, &placeholder, Color::WHITE);
        assert!(bare.preview.is_none());
    }

    #[test]
    fn test_placeholder_source_follows_settings() {
        let solid = placeholder_for(&ImageSettings::default());
        let pixel = solid.decode().unwrap().to_rgba8();
        assert_eq!(pixel.get_pixel(0, 0).0, [42, 42, 48, 255]);

        let dir = std::env::temp_dir().join(format!("pi-placeholder-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("placeholder.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]))
            .save(&file)
            .unwrap();

        let settings = ImageSettings {
            placeholder_path: Some(file.to_string_lossy().to_string()),
            ..Default::default()
        };
        let decoded = placeholder_for(&settings).decode().unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_target_cycle() {
        let mut target = RenderTarget::FlatTint;
        let mut seen = Vec::new();
        for _ in 0..3 {
            target = RenderTarget::from_identifier(next_target(&target));
            seen.push(target.clone());
        }
        assert_eq!(
            seen,
            vec![
                RenderTarget::NativeBlur,
                RenderTarget::Unsupported("none".into()),
                RenderTarget::FlatTint,
            ]
        );
    }
}
