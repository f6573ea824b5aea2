//! Owner-facing configuration of a progressive image

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use iced::widget::image::Handle;
use iced::{Color, ContentFit};
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageError, RgbaImage};
use serde::{Deserialize, Serialize};

use super::style::ImageStyle;

/// Default cross-fade duration
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Color family of the preview overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    #[default]
    Dark,
    Light,
}

impl Tint {
    /// Base color of the overlay
    pub fn color(self) -> Color {
        match self {
            Tint::Dark => Color::BLACK,
            Tint::Light => Color::WHITE,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Tint::Dark => Tint::Light,
            Tint::Light => Tint::Dark,
        }
    }
}

impl std::fmt::Display for Tint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tint::Dark => write!(f, "dark"),
            Tint::Light => write!(f, "light"),
        }
    }
}

/// An image that is available without going through the cache
///
/// Used for previews and placeholders. The render handle is created once so
/// the renderer can keep the uploaded texture across frames.
#[derive(Debug, Clone)]
pub struct ImageSource {
    handle: Handle,
    origin: Origin,
}

#[derive(Debug, Clone)]
enum Origin {
    Path(PathBuf),
    Encoded(Arc<Vec<u8>>),
    Rgba {
        width: u32,
        height: u32,
        pixels: Arc<Vec<u8>>,
    },
}

impl ImageSource {
    /// Image file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            handle: Handle::from_path(&path),
            origin: Origin::Path(path),
        }
    }

    /// Encoded image data (png, jpeg, ...)
    #[allow(dead_code)]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            handle: Handle::from_bytes(bytes.clone()),
            origin: Origin::Encoded(Arc::new(bytes)),
        }
    }

    /// Raw RGBA pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            handle: Handle::from_rgba(width, height, pixels.clone()),
            origin: Origin::Rgba {
                width,
                height,
                pixels: Arc::new(pixels),
            },
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Decode the image into memory
    ///
    /// Blocking; call from a worker thread.
    pub fn decode(&self) -> Result<DynamicImage, ImageError> {
        match &self.origin {
            Origin::Path(path) => image::open(path),
            Origin::Encoded(bytes) => image::load_from_memory(bytes),
            Origin::Rgba {
                width,
                height,
                pixels,
            } => RgbaImage::from_raw(*width, *height, pixels.to_vec())
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(|| {
                    ImageError::Parameter(ParameterError::from_kind(
                        ParameterErrorKind::DimensionMismatch,
                    ))
                }),
        }
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.handle.id() == other.handle.id()
    }
}

/// Everything the owner supplies for one progressive image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Identifier of the full-resolution image; nothing loads without it
    pub uri: Option<String>,
    /// Low-fidelity image shown immediately and faded out
    pub preview: Option<ImageSource>,
    /// Shown only when there is no preview and nothing is resolved yet
    pub placeholder: Option<ImageSource>,
    pub transition_duration: Duration,
    pub tint: Tint,
    pub overlay_hidden: bool,
    pub style: ImageStyle,
    pub content_fit: ContentFit,
}

impl Default for ImageRequest {
    fn default() -> Self {
        Self {
            uri: None,
            preview: None,
            placeholder: None,
            transition_duration: DEFAULT_TRANSITION,
            tint: Tint::Dark,
            overlay_hidden: false,
            style: ImageStyle::default(),
            content_fit: ContentFit::Cover,
        }
    }
}

impl ImageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn preview(mut self, preview: ImageSource) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn placeholder(mut self, placeholder: ImageSource) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition_duration = duration;
        self
    }

    pub fn tint(mut self, tint: Tint) -> Self {
        self.tint = tint;
        self
    }

    pub fn overlay_hidden(mut self, hidden: bool) -> Self {
        self.overlay_hidden = hidden;
        self
    }

    pub fn style(mut self, style: ImageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn content_fit(mut self, fit: ContentFit) -> Self {
        self.content_fit = fit;
        self
    }

    /// The identifier to load, with an empty string treated as absent
    pub fn uri_key(&self) -> Option<&str> {
        self.uri.as_deref().filter(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ImageRequest::new();
        assert_eq!(request.transition_duration, Duration::from_millis(300));
        assert_eq!(request.tint, Tint::Dark);
        assert!(!request.overlay_hidden);
        assert_eq!(request.uri_key(), None);
    }

    #[test]
    fn test_empty_uri_is_absent() {
        assert_eq!(ImageRequest::new().uri("").uri_key(), None);
        assert_eq!(ImageRequest::new().uri("a").uri_key(), Some("a"));
    }

    #[test]
    fn test_source_identity() {
        let a = ImageSource::from_rgba(1, 1, vec![0, 0, 0, 255]);
        let b = ImageSource::from_rgba(1, 1, vec![0, 0, 0, 255]);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_rgba_source_decodes() {
        let source = ImageSource::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]);
        let img = source.decode().unwrap();
        assert_eq!((img.width(), img.height()), (2, 1));

        let broken = ImageSource::from_rgba(4, 4, vec![0; 3]);
        assert!(broken.decode().is_err());
    }

    #[test]
    fn test_encoded_source_decodes() {
        let mut png = Vec::new();
        RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let img = ImageSource::from_bytes(png).decode().unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert!(ImageSource::from_bytes(b"garbage".to_vec()).decode().is_err());
    }

    #[test]
    fn test_tint_serde() {
        assert_eq!(serde_json::to_string(&Tint::Light).unwrap(), "\"light\"");
        assert_eq!(Tint::Dark.toggled(), Tint::Light);
        assert_eq!(Tint::Dark.color(), Color::BLACK);
    }
}
