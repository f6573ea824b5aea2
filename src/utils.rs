//! Utility functions

use std::path::{Path, PathBuf};

use xxhash_rust::xxh3::xxh3_64;

// ============================================================================
// Image Extensions
// ============================================================================

/// Common image file extensions for cache lookup
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "webp", "bmp"];

/// Find an existing cached image file with any common extension
///
/// # Arguments
/// * `dir` - The directory to search in
/// * `stem` - The filename without extension (e.g., "img_00ff")
pub fn find_cached_image(dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|p| p.exists())
}

/// Cache file stem for a remote identifier
pub fn cache_stem(uri: &str) -> String {
    format!("img_{:016x}", xxh3_64(uri.as_bytes()))
}

/// Detect image format from magic bytes
/// Returns the correct file extension (without dot)
pub fn detect_image_format(bytes: &[u8]) -> &'static str {
    if bytes.len() < 8 {
        return "jpg";
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "png";
    }

    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "jpg";
    }

    // GIF: 47 49 46 38
    if bytes.starts_with(b"GIF8") {
        return "gif";
    }

    // WebP: RIFF ... WEBP
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return "webp";
    }

    // BMP: 42 4D
    if bytes.starts_with(b"BM") {
        return "bmp";
    }

    "jpg"
}

// ============================================================================
// Directories
// ============================================================================

/// Get the default image cache directory
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "progressive-image", "ProgressiveImage")
        .map(|dirs| dirs.cache_dir().join("images"))
        .unwrap_or_else(|| PathBuf::from(".cache/images"))
}
