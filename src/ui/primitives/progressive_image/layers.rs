//! Layer selection
//!
//! Decides which of the stacked visuals are present, bottom to top:
//! placeholder, preview, final image, overlay.

use super::overlay::OverlayKind;

/// Facts the selection depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerInputs {
    pub has_placeholder: bool,
    pub has_preview: bool,
    pub is_resolved: bool,
    pub overlay_hidden: bool,
    /// Overlay the render target can draw, if any
    pub overlay: Option<OverlayKind>,
}

/// Visuals to compose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layers {
    pub placeholder: bool,
    pub preview: bool,
    pub final_image: bool,
    pub overlay: Option<OverlayKind>,
}

impl Layers {
    pub fn select(inputs: LayerInputs) -> Self {
        let LayerInputs {
            has_placeholder,
            has_preview,
            is_resolved,
            overlay_hidden,
            overlay,
        } = inputs;

        Self {
            placeholder: has_placeholder && !has_preview && !is_resolved,
            // The preview stays mounted under the final image
            preview: has_preview,
            final_image: is_resolved,
            overlay: overlay.filter(|_| !overlay_hidden && has_preview),
        }
    }
}
