//! Main application module

pub mod helpers;
mod message;
mod state;
mod update;
mod view;

use std::sync::Arc;

use iced::{Task, Theme};

use crate::features::Settings;
pub use message::Message;
pub use state::App;

impl App {
    /// Create new application instance
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let cache_settings = settings.cache.clone();
        let app = Self::with_settings(settings, Settings::file_path());

        tracing::info!(
            "Starting gallery with {} images, render target {}",
            app.settings.gallery.images.len(),
            app.target.identifier()
        );

        let init_task = Task::perform(helpers::init_cache(cache_settings), |result| match result {
            Ok(cache) => Message::CacheReady(Arc::new(cache)),
            Err(e) => Message::CacheFailed(format!("{:#}", e)),
        });

        (app, init_task)
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        if self.settings.display.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn title(&self) -> String {
        let loading = self.items.iter().filter(|item| item.image.is_loading()).count();
        if loading > 0 {
            format!("Progressive Image - loading {}", loading)
        } else {
            "Progressive Image".to_string()
        }
    }

    /// Animation frames are only requested while some image is fading
    pub fn subscription(&self) -> iced::Subscription<Message> {
        if self.has_active_animations() {
            iced::window::frames().map(|_| Message::AnimationTick)
        } else {
            iced::Subscription::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::primitives::RenderTarget;

    #[test]
    fn test_idle_app_needs_no_frames() {
        let app = App::with_settings(Settings::default(), None);
        assert!(!app.has_active_animations());
        assert_eq!(app.theme(), Theme::Dark);
    }

    #[test]
    fn test_settings_drive_initial_state() {
        let mut settings = Settings::default();
        settings.display.render_target = "ios".into();
        settings.display.dark_mode = false;

        let app = App::with_settings(settings, None);
        assert_eq!(app.target, RenderTarget::NativeBlur);
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(app.title(), "Progressive Image");
        assert!(app.items.is_empty());
    }
}
