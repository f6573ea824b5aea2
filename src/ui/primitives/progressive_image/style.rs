//! Style passthrough for the image stack
//!
//! The owner's style applies to the outer frame. The inner layers sit inside
//! the frame's border, so their corner radii are shrunk by the border width to
//! stay concentric with the frame.

use iced::border::Radius;
use iced::widget::container;
use iced::{Background, Border, Color, Length};

/// Style supplied by the owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStyle {
    pub width: Length,
    pub height: Length,
    pub background: Option<Color>,
    pub border_color: Color,
    pub border_width: Option<f32>,
    pub border_radius: Option<f32>,
    pub border_top_left_radius: Option<f32>,
    pub border_top_right_radius: Option<f32>,
    pub border_bottom_right_radius: Option<f32>,
    pub border_bottom_left_radius: Option<f32>,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            width: Length::Fill,
            height: Length::Fill,
            background: None,
            border_color: Color::TRANSPARENT,
            border_width: None,
            border_radius: None,
            border_top_left_radius: None,
            border_top_right_radius: None,
            border_bottom_right_radius: None,
            border_bottom_left_radius: None,
        }
    }
}

impl ImageStyle {
    pub fn size(mut self, width: impl Into<Length>, height: impl Into<Length>) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn border(mut self, width: f32, color: Color) -> Self {
        self.border_width = Some(width);
        self.border_color = color;
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.border_radius = Some(radius);
        self
    }

    /// Border width, unset meaning none
    pub fn inset(&self) -> f32 {
        self.border_width.unwrap_or(0.0)
    }

    /// Radius fields copied for the inner layers, each reduced by the border width
    pub fn layer_style(&self) -> LayerStyle {
        let inset = self.inset();
        let shrink = |radius: Option<f32>| radius.map(|r| r - inset);

        LayerStyle {
            border_radius: shrink(self.border_radius),
            border_top_left_radius: shrink(self.border_top_left_radius),
            border_top_right_radius: shrink(self.border_top_right_radius),
            border_bottom_right_radius: shrink(self.border_bottom_right_radius),
            border_bottom_left_radius: shrink(self.border_bottom_left_radius),
        }
    }

    /// Radius of the outer frame
    pub fn frame_radius(&self) -> Radius {
        LayerStyle {
            border_radius: self.border_radius,
            border_top_left_radius: self.border_top_left_radius,
            border_top_right_radius: self.border_top_right_radius,
            border_bottom_right_radius: self.border_bottom_right_radius,
            border_bottom_left_radius: self.border_bottom_left_radius,
        }
        .radius()
    }

    /// Container style of the outer frame
    pub fn frame(&self) -> container::Style {
        container::Style {
            background: self.background.map(Background::Color),
            border: Border {
                color: self.border_color,
                width: self.inset(),
                radius: self.frame_radius(),
            },
            ..Default::default()
        }
    }
}

/// Geometry shared by every inner layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerStyle {
    pub border_radius: Option<f32>,
    pub border_top_left_radius: Option<f32>,
    pub border_top_right_radius: Option<f32>,
    pub border_bottom_right_radius: Option<f32>,
    pub border_bottom_left_radius: Option<f32>,
}

impl LayerStyle {
    /// Renderer radius; corner values win over the shared one, negatives clamp to 0
    pub fn radius(&self) -> Radius {
        let corner = |specific: Option<f32>| {
            specific.or(self.border_radius).unwrap_or(0.0).max(0.0)
        };

        Radius {
            top_left: corner(self.border_top_left_radius),
            top_right: corner(self.border_top_right_radius),
            bottom_right: corner(self.border_bottom_right_radius),
            bottom_left: corner(self.border_bottom_left_radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_reduced_by_border_width() {
        let style = ImageStyle::default().border(4.0, Color::WHITE).radius(10.0);
        let layer = style.layer_style();
        assert_eq!(layer.border_radius, Some(6.0));
        assert_eq!(layer.border_top_left_radius, None);
        assert_eq!(layer.radius().top_left, 6.0);
        assert_eq!(layer.radius().bottom_right, 6.0);
    }

    #[test]
    fn test_corner_fields_reduced_independently() {
        let style = ImageStyle {
            border_top_left_radius: Some(12.0),
            border_top_right_radius: Some(8.0),
            border_bottom_right_radius: Some(4.0),
            border_bottom_left_radius: Some(1.0),
            ..ImageStyle::default().border(2.0, Color::BLACK)
        };
        let layer = style.layer_style();
        assert_eq!(layer.border_top_left_radius, Some(10.0));
        assert_eq!(layer.border_top_right_radius, Some(6.0));
        assert_eq!(layer.border_bottom_right_radius, Some(2.0));
        // Exact difference is kept, the renderer clamps
        assert_eq!(layer.border_bottom_left_radius, Some(-1.0));
        assert_eq!(layer.radius().bottom_left, 0.0);
    }

    #[test]
    fn test_unset_border_width_is_zero() {
        let style = ImageStyle::default().radius(10.0);
        assert_eq!(style.layer_style().border_radius, Some(10.0));
    }

    #[test]
    fn test_non_radius_fields_excluded() {
        let style = ImageStyle::default()
            .size(120, 80)
            .background(Color::WHITE)
            .border(3.0, Color::BLACK);
        assert_eq!(style.layer_style(), LayerStyle::default());
        // Outer frame keeps the whole style
        let frame = style.frame();
        assert_eq!(frame.border.width, 3.0);
        assert_eq!(frame.background, Some(Background::Color(Color::WHITE)));
        assert_eq!(style.width, Length::Fixed(120.0));
    }
}
