//! Theme system for the gallery
//! Supports both dark and light modes with consistent color palette

use iced::color;
use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme, Vector};

// ============================================================================
// Color Palette - Dynamic based on theme
// ============================================================================

/// Check if theme is dark mode
fn is_dark(theme: &Theme) -> bool {
    matches!(
        theme,
        Theme::Dark
            | Theme::Dracula
            | Theme::Nord
            | Theme::SolarizedDark
            | Theme::GruvboxDark
            | Theme::CatppuccinMocha
            | Theme::TokyoNight
            | Theme::TokyoNightStorm
            | Theme::KanagawaWave
            | Theme::KanagawaDragon
            | Theme::Moonfly
            | Theme::Nightfly
            | Theme::Oxocarbon
    )
}

// Dark mode colors
mod dark {
    use super::*;
    pub const BACKGROUND: Color = color!(0x000000);
    pub const SURFACE: Color = color!(0x1a1a1a);
    pub const BORDER: Color = color!(0x282828);
    pub const TEXT_MUTED: Color = color!(0x888888);
    pub const TEXT_PRIMARY: Color = color!(0xffffff);
}

// Light mode colors
mod light {
    use super::*;
    pub const BACKGROUND: Color = color!(0xffffff);
    pub const SURFACE: Color = color!(0xeeeeee);
    pub const BORDER: Color = color!(0xdddddd);
    pub const TEXT_MUTED: Color = color!(0x777777);
    pub const TEXT_PRIMARY: Color = color!(0x1a1a1a);
}

/// Get background color based on theme
pub fn background(theme: &Theme) -> Color {
    if is_dark(theme) {
        dark::BACKGROUND
    } else {
        light::BACKGROUND
    }
}

/// Get surface color based on theme
pub fn surface(theme: &Theme) -> Color {
    if is_dark(theme) {
        dark::SURFACE
    } else {
        light::SURFACE
    }
}

/// Get border color based on theme
pub fn border_color(theme: &Theme) -> Color {
    if is_dark(theme) {
        dark::BORDER
    } else {
        light::BORDER
    }
}

/// Get muted text color based on theme
pub fn text_muted(theme: &Theme) -> Color {
    if is_dark(theme) {
        dark::TEXT_MUTED
    } else {
        light::TEXT_MUTED
    }
}

/// Get primary text color based on theme
pub fn text_primary(theme: &Theme) -> Color {
    if is_dark(theme) {
        dark::TEXT_PRIMARY
    } else {
        light::TEXT_PRIMARY
    }
}

/// Primary accent color
pub const ACCENT: Color = color!(0x1e90ff);

/// Hover state for primary accent
pub const ACCENT_HOVER: Color = color!(0x4169e1);

pub fn danger(theme: &Theme) -> Color {
    if is_dark(theme) {
        color!(0xff5c5c)
    } else {
        color!(0xd32f2f)
    }
}

// ============================================================================
// Container Styles
// ============================================================================

/// Main content area background
pub fn main_content(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(background(theme))),
        text_color: Some(text_primary(theme)),
        ..Default::default()
    }
}

/// Top toolbar
pub fn toolbar(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(surface(theme))),
        border: Border {
            color: border_color(theme),
            width: 1.0,
            radius: 0.0.into(),
        },
        ..Default::default()
    }
}

/// Gallery card
pub fn card(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(surface(theme))),
        border: Border {
            radius: 20.0.into(),
            ..Default::default()
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
            offset: Vector::new(0.0, 6.0),
            blur_radius: 18.0,
        },
        ..Default::default()
    }
}

// ============================================================================
// Button Styles
// ============================================================================

/// Primary button - accent background
pub fn primary_button(_theme: &Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        background: Some(Background::Color(ACCENT)),
        text_color: Color::WHITE,
        border: Border {
            radius: 24.0.into(),
            ..Default::default()
        },
        ..Default::default()
    };

    match status {
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(ACCENT_HOVER)),
            ..base
        },
        _ => base,
    }
}

/// Secondary button - transparent with border
pub fn secondary_button(theme: &Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color: text_primary(theme),
        border: Border {
            radius: 24.0.into(),
            width: 1.0,
            color: border_color(theme),
        },
        ..Default::default()
    };

    match status {
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(surface(theme))),
            border: Border {
                color: text_muted(theme),
                ..base.border
            },
            ..base
        },
        _ => base,
    }
}

/// Text button (no background, just text color change on hover)
pub fn text_button(theme: &Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        background: Some(Background::Color(Color::TRANSPARENT)),
        text_color: text_muted(theme),
        border: Border::default(),
        ..Default::default()
    };

    match status {
        button::Status::Hovered => button::Style {
            text_color: text_primary(theme),
            ..base
        },
        _ => base,
    }
}
