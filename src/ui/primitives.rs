//! Primitive UI elements - atomic building blocks
//!
//! # Design Principles
//!
//! - **No business logic**: Primitives must not import from `crate::app`
//! - **Self-contained**: Each primitive owns its state and its messages
//!
//! # Contents
//!
//! - [`ProgressiveImage`] - Cached image with preview cross-fade

pub mod progressive_image;

pub use progressive_image::{ImageRequest, ImageSource, ImageStyle, ProgressiveImage, RenderTarget};
