//! Image effects
//!
//! - Box blur for the preview overlay

pub mod blur;
