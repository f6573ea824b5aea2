//! Application settings persistence
//!
//! Handles saving and loading user preferences.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ui::primitives::progressive_image::Tint;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Defaults applied to every progressive image
    #[serde(default)]
    pub image: ImageSettings,
    /// Display and interface settings
    #[serde(default)]
    pub display: DisplaySettings,
    /// Disk cache settings
    #[serde(default)]
    pub cache: CacheSettings,
    /// Images shown in the gallery
    #[serde(default)]
    pub gallery: GallerySettings,
}

/// Progressive image defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Preview to final image cross-fade, in milliseconds
    pub transition_duration_ms: u64,
    /// Overlay color family
    pub tint: Tint,
    /// Show previews without the overlay
    pub overlay_hidden: bool,
    /// RGB of the generated placeholder
    #[serde(default = "default_placeholder_color")]
    pub placeholder_color: [u8; 3],
    /// Image file used as placeholder instead of the solid color
    #[serde(default)]
    pub placeholder_path: Option<String>,
}

fn default_placeholder_color() -> [u8; 3] {
    [42, 42, 48]
}

/// Display and interface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Dark mode enabled
    pub dark_mode: bool,
    /// Overlay backend: "ios" (blur), "android" (flat tint), anything else none
    #[serde(default = "default_render_target")]
    pub render_target: String,
}

fn default_render_target() -> String {
    "android".to_string()
}

/// Disk cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Cache directory path, platform cache dir when unset
    pub cache_dir: Option<String>,
    /// Per-request download timeout in seconds
    pub request_timeout_secs: u64,
    /// Remove partial downloads left by a previous run
    #[serde(default = "default_true")]
    pub cleanup_temp_on_start: bool,
}

fn default_true() -> bool {
    true
}

/// Gallery contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GallerySettings {
    /// Image identifiers, remote URLs or local paths
    pub images: Vec<String>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            transition_duration_ms: 300,
            tint: Tint::Dark,
            overlay_hidden: false,
            placeholder_color: default_placeholder_color(),
            placeholder_path: None,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            render_target: default_render_target(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            request_timeout_secs: 30,
            cleanup_temp_on_start: true,
        }
    }
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            images: vec![
                "https://picsum.photos/id/1015/1200/800".to_string(),
                "https://picsum.photos/id/1025/1200/800".to_string(),
                "https://picsum.photos/id/1043/1200/800".to_string(),
                "https://picsum.photos/id/1069/1200/800".to_string(),
                "https://picsum.photos/id/1084/1200/800".to_string(),
                "https://picsum.photos/id/110/1200/800".to_string(),
            ],
        }
    }
}

impl ImageSettings {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }
}

impl CacheSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Settings {
    /// Get the settings file path
    pub fn file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "progressive-image", "ProgressiveImage")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return defaults if not found
    pub fn load() -> Self {
        Self::file_path()
            .and_then(|path| Self::load_from_file(&path).ok())
            .unwrap_or_default()
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Save settings to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SettingsError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur with settings
#[derive(Debug, Clone)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("progressive-image-{}-{}", name, std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.image.transition_duration(), Duration::from_millis(300));
        assert_eq!(settings.image.tint, Tint::Dark);
        assert!(!settings.image.overlay_hidden);
        assert_eq!(settings.display.render_target, "android");
        assert_eq!(settings.cache.request_timeout(), Duration::from_secs(30));
        assert!(!settings.gallery.images.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_file("roundtrip");
        let mut settings = Settings::default();
        settings.image.tint = Tint::Light;
        settings.display.render_target = "ios".into();
        settings.gallery.images = vec!["/tmp/a.png".into()];

        settings.save_to_file(&path).unwrap();
        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"image":{"transition_duration_ms":800,"tint":"light","overlay_hidden":true}}"#)
                .unwrap();
        assert_eq!(settings.image.transition_duration_ms, 800);
        assert_eq!(settings.image.placeholder_color, [42, 42, 48]);
        assert_eq!(settings.image.placeholder_path, None);
        assert_eq!(settings.display, DisplaySettings::default());
        assert_eq!(settings.cache, CacheSettings::default());
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            Settings::load_from_file(&scratch_file("missing")),
            Err(SettingsError::Io(_))
        ));

        let path = scratch_file("broken");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_from_file(&path),
            Err(SettingsError::Parse(_))
        ));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
