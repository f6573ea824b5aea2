//! Preview overlay renderers
//!
//! The overlay masks the low-fidelity preview and fades out together with it.
//! Which variant is drawn depends on the render target; both consume the same
//! fade value.

use iced::border::Radius;
use iced::widget::image::Handle;
use iced::widget::{Space, container, image, stack};
use iced::{Background, Border, Color, ContentFit, Element, Fill};

use super::request::{ImageSource, Tint};
use crate::ui::animation::FadeTransition;
use crate::ui::effects::blur::{self, BlurError};

/// Strength of the tint wash drawn over the blurred preview
const BLUR_TINT_ALPHA: f32 = 0.3;

/// Kind of overlay a render target can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Blurred copy of the preview with a tint wash
    Blur,
    /// Solid black or white rectangle
    FlatTint,
}

/// Rendering backend the primitive runs on
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderTarget {
    NativeBlur,
    #[default]
    FlatTint,
    /// Unknown target; previews are shown without an overlay
    Unsupported(String),
}

impl RenderTarget {
    /// Map a platform identifier ("ios", "android", ...) to a target
    pub fn from_identifier(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "ios" => RenderTarget::NativeBlur,
            "android" => RenderTarget::FlatTint,
            _ => RenderTarget::Unsupported(id.to_string()),
        }
    }

    /// Overlay capability, `None` when the target has none
    pub fn overlay(&self) -> Option<OverlayKind> {
        match self {
            RenderTarget::NativeBlur => Some(OverlayKind::Blur),
            RenderTarget::FlatTint => Some(OverlayKind::FlatTint),
            RenderTarget::Unsupported(_) => None,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            RenderTarget::NativeBlur => "ios",
            RenderTarget::FlatTint => "android",
            RenderTarget::Unsupported(id) => id,
        }
    }
}

/// Tinted rectangle with the given alpha
fn wash<'a, Message: 'a>(tint: Tint, alpha: f32, radius: Radius) -> Element<'a, Message> {
    let color = Color {
        a: alpha,
        ..tint.color()
    };

    container(Space::new().width(Fill).height(Fill))
        .width(Fill)
        .height(Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius,
                ..Default::default()
            },
            ..Default::default()
        })
        .into()
}

/// Build the overlay layer for the current fade value
///
/// `blurred` is the softened preview; the blur variant degrades to the tint
/// wash alone until it is available.
pub fn view<'a, Message: 'a>(
    kind: OverlayKind,
    fade: &FadeTransition,
    tint: Tint,
    radius: Radius,
    blurred: Option<&Handle>,
    fit: ContentFit,
) -> Element<'a, Message> {
    match kind {
        OverlayKind::FlatTint => wash(tint, fade.opacity(), radius),
        OverlayKind::Blur => {
            let progress = fade.progress();
            let tinted = wash(tint, progress * BLUR_TINT_ALPHA, radius);

            match blurred {
                Some(handle) => stack![
                    image(handle.clone())
                        .width(Fill)
                        .height(Fill)
                        .content_fit(fit)
                        .border_radius(radius)
                        .opacity(progress),
                    tinted,
                ]
                .width(Fill)
                .height(Fill)
                .into(),
                None => tinted,
            }
        }
    }
}

/// Produce the blurred copy of a preview on a worker thread
pub async fn blur_preview(preview: ImageSource) -> Result<Handle, BlurError> {
    tokio::task::spawn_blocking(move || {
        let img = preview.decode()?;
        Ok(blur::blurred_handle(&img))
    })
    .await
    .map_err(|e| BlurError::Task(e.to_string()))?
}
