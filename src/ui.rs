//! UI module for the progressive image gallery
//!
//! # Architecture
//!
//! - **Primitives** (`primitives`): Self-contained widgets with their own state
//! - **Animation** (`animation`): Animated values driven by window frames
//! - **Effects** (`effects`): CPU-side image processing for overlays

pub mod animation;
pub mod effects;
pub mod primitives;
pub mod theme;
