//! Box blur for preview overlays
//!
//! Produces the softened copy of a preview image that the blur overlay draws
//! on top of the preview while the final image fades in. Multi-pass box blur
//! approximates a gaussian at a fraction of the cost; the image is shrunk
//! first since a heavily blurred image carries no fine detail anyway.

use iced::widget::image::Handle;
use image::DynamicImage;

/// Long edge of the image the blur runs on
pub const BLUR_MAX_EDGE: u32 = 64;
/// Box radius in pixels (of the shrunk image)
pub const BLUR_RADIUS: usize = 4;
/// Number of box passes
pub const BLUR_PASSES: usize = 3;

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Blur RGBA pixel data in place
///
/// Buffers that do not hold exactly `width * height * 4` bytes are left
/// untouched. Edges are clamped, so a uniform image stays uniform.
pub fn box_blur(data: &mut [u8], width: usize, height: usize, radius: usize, passes: usize) {
    if radius == 0 || passes == 0 || width == 0 || height == 0 {
        return;
    }
    if width.checked_mul(height).and_then(|n| n.checked_mul(4)) != Some(data.len()) {
        tracing::warn!(
            "Skipping blur: {} bytes for a {}x{} image",
            data.len(),
            width,
            height
        );
        return;
    }

    let mut scratch = vec![0u8; data.len()];
    for _ in 0..passes {
        blur_lines(data, &mut scratch, width, height, radius, Axis::Horizontal);
        blur_lines(&scratch, data, width, height, radius, Axis::Vertical);
    }
}

/// One sliding-window pass along every row or column
fn blur_lines(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    radius: usize,
    axis: Axis,
) {
    let (lines, len) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let index = |line: usize, pos: usize| match axis {
        Axis::Horizontal => (line * width + pos) * 4,
        Axis::Vertical => (pos * width + line) * 4,
    };
    let window = (2 * radius + 1) as u32;
    let last = len - 1;

    for line in 0..lines {
        let mut sum = [0u32; 4];
        for offset in 0..=2 * radius {
            // Before the line start the edge pixel repeats
            let i = index(line, offset.saturating_sub(radius).min(last));
            for c in 0..4 {
                sum[c] += src[i + c] as u32;
            }
        }

        for pos in 0..len {
            let out = index(line, pos);
            for c in 0..4 {
                dst[out + c] = ((sum[c] + window / 2) / window) as u8;
            }

            let leaving = index(line, pos.saturating_sub(radius));
            let entering = index(line, (pos + radius + 1).min(last));
            for c in 0..4 {
                sum[c] = sum[c] + src[entering + c] as u32 - src[leaving + c] as u32;
            }
        }
    }
}

/// Shrink and blur `img`, returning (width, height, rgba)
pub fn soften(img: &DynamicImage, max_edge: u32, radius: usize, passes: usize) -> (u32, u32, Vec<u8>) {
    let small = img.thumbnail(max_edge, max_edge).to_rgba8();
    let (width, height) = small.dimensions();
    let mut pixels = small.into_raw();
    box_blur(&mut pixels, width as usize, height as usize, radius, passes);
    (width, height, pixels)
}

/// Shrink and blur `img` with the default overlay parameters
pub fn blurred_handle(img: &DynamicImage) -> Handle {
    let (width, height, pixels) = soften(img, BLUR_MAX_EDGE, BLUR_RADIUS, BLUR_PASSES);
    Handle::from_rgba(width, height, pixels)
}

/// Errors while preparing a blurred preview
#[derive(Debug, Clone)]
pub enum BlurError {
    Decode(String),
    Task(String),
}

impl std::fmt::Display for BlurError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlurError::Decode(e) => write!(f, "Failed to decode preview: {}", e),
            BlurError::Task(e) => write!(f, "Blur task failed: {}", e),
        }
    }
}

impl std::error::Error for BlurError {}

impl From<image::ImageError> for BlurError {
    fn from(e: image::ImageError) -> Self {
        BlurError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_uniform_image_is_unchanged() {
        let mut data = [10u8, 20, 30, 255].repeat(5 * 4);
        let original = data.clone();
        box_blur(&mut data, 5, 4, 2, 3);
        assert_eq!(data, original);
    }

    #[test]
    fn test_bright_pixel_spreads() {
        let (w, h) = (7, 7);
        let mut data = vec![0u8; w * h * 4];
        let center = (3 * w + 3) * 4;
        data[center] = 255;

        box_blur(&mut data, w, h, 1, 1);

        // 255 / 3 per axis, so the center ends at 28
        assert_eq!(data[center], 28);
        assert!(data[(3 * w + 4) * 4] > 0);
        assert!(data[(4 * w + 3) * 4] > 0);
        assert_eq!(data[0], 0);
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8];
        box_blur(&mut data, 2, 1, 0, 3);
        assert_eq!(data, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_mismatched_buffer_is_left_alone() {
        let mut short = vec![255u8; 3 * 3 * 4 - 1];
        short[0] = 0;
        let original = short.clone();
        box_blur(&mut short, 3, 3, 1, 2);
        assert_eq!(short, original);

        let mut long = vec![9u8; 2 * 2 * 4 + 4];
        box_blur(&mut long, 2, 2, 1, 1);
        assert_eq!(long, vec![9u8; 20]);
    }

    #[test]
    fn test_soften_shrinks_keeping_aspect() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(256, 128, Rgba([200, 0, 0, 255])));
        let (width, height, pixels) = soften(&img, 64, 2, 2);
        assert_eq!((width, height), (64, 32));
        assert_eq!(pixels.len(), 64 * 32 * 4);
        assert!((199..=201).contains(&pixels[0]));
        assert_eq!(pixels[3], 255);
    }
}
