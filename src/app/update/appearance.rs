//! Overlay and theme message handlers

use iced::Task;

use crate::app::helpers;
use crate::app::{App, Message};
use crate::ui::primitives::RenderTarget;

impl App {
    pub(super) fn handle_appearance(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::ToggleOverlay => {
                self.settings.image.overlay_hidden = !self.settings.image.overlay_hidden;
                self.persist_settings();
                Some(self.apply_requests())
            }
            Message::ToggleTint => {
                self.settings.image.tint = self.settings.image.tint.toggled();
                self.persist_settings();
                Some(self.apply_requests())
            }
            Message::TogglePreviews => {
                self.show_previews = !self.show_previews;
                Some(self.apply_requests())
            }
            Message::ToggleDarkMode => {
                self.settings.display.dark_mode = !self.settings.display.dark_mode;
                self.persist_settings();
                // Card borders follow the theme
                Some(self.apply_requests())
            }
            Message::CycleRenderTarget => {
                let next = helpers::next_target(&self.target);
                self.settings.display.render_target = next.to_string();
                self.target = RenderTarget::from_identifier(next);
                self.persist_settings();
                tracing::info!("Render target: {}", self.target.identifier());

                let target = self.target.clone();
                Some(Task::batch(self.items.iter_mut().map(|item| {
                    let id = item.id;
                    item.image
                        .set_target(target.clone())
                        .map(move |m| Message::Image(id, m))
                })))
            }
            _ => None,
        }
    }
}
