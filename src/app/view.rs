//! Application view rendering

use iced::widget::{Column, Row, Space, button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Fill};

use super::App;
use super::message::Message;
use super::state::{GalleryItem, Status};
use crate::ui::theme;

/// Cards per gallery row
const COLUMNS: usize = 3;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let content = column![self.toolbar(), self.status_line(), self.gallery()]
            .spacing(12)
            .width(Fill)
            .height(Fill);

        container(content)
            .width(Fill)
            .height(Fill)
            .style(theme::main_content)
            .into()
    }

    fn toolbar(&self) -> Element<'_, Message> {
        let image = &self.settings.image;
        let stats = match &self.cache_stats {
            Some(stats) => format!("{} cached, {} MB", stats.file_count, stats.total_mb()),
            None => String::new(),
        };

        let toggle = |label: String, message: Message| {
            button(text(label).size(13))
                .padding([6, 14])
                .style(theme::secondary_button)
                .on_press(message)
        };

        let controls = row![
            toggle(
                format!("Overlay: {}", if image.overlay_hidden { "off" } else { "on" }),
                Message::ToggleOverlay
            ),
            toggle(format!("Tint: {}", image.tint), Message::ToggleTint),
            toggle(
                format!("Previews: {}", if self.show_previews { "on" } else { "off" }),
                Message::TogglePreviews
            ),
            toggle(
                format!("Target: {}", self.target.identifier()),
                Message::CycleRenderTarget
            ),
            toggle(
                if self.settings.display.dark_mode { "Light mode" } else { "Dark mode" }.to_string(),
                Message::ToggleDarkMode
            ),
        ]
        .spacing(8);

        let actions = row![
            button(text("Add").size(13))
                .padding([6, 14])
                .style(theme::primary_button)
                .on_press(Message::AddItem),
            button(text("Reload").size(13))
                .padding([6, 14])
                .style(theme::secondary_button)
                .on_press(Message::ReloadAll),
            button(text("Clear cache").size(13))
                .padding([6, 14])
                .style(theme::secondary_button)
                .on_press_maybe(self.cache.as_ref().map(|_| Message::ClearCache)),
        ]
        .spacing(8);

        let bar = row![
            text("Progressive Image").size(18),
            Space::new().width(16),
            controls,
            Space::new().width(Fill),
            text(stats).size(12).style(|theme| text::Style {
                color: Some(theme::text_muted(theme)),
            }),
            Space::new().width(16),
            actions,
        ]
        .align_y(Alignment::Center);

        container(bar)
            .padding([12, 20])
            .width(Fill)
            .style(theme::toolbar)
            .into()
    }

    fn status_line(&self) -> Element<'_, Message> {
        let Some(status) = &self.status else {
            return Space::new().height(0).into();
        };

        let (label, is_error) = match status {
            Status::Info(msg) => (msg.as_str(), false),
            Status::Error(msg) => (msg.as_str(), true),
        };

        container(text(label).size(13).style(move |theme| text::Style {
            color: Some(if is_error {
                theme::danger(theme)
            } else {
                theme::text_muted(theme)
            }),
        }))
        .padding([0, 20])
        .into()
    }

    fn gallery(&self) -> Element<'_, Message> {
        if let Some(e) = &self.cache_error {
            return centered(format!("Image cache unavailable: {}", e));
        }
        if self.cache.is_none() {
            return centered("Preparing image cache...".to_string());
        }
        if self.items.is_empty() {
            return centered("No images. Press Add to show one.".to_string());
        }

        let rows = self.items.chunks(COLUMNS).map(|chunk| -> Element<'_, Message> {
            let mut cards = Row::new().spacing(16);
            for item in chunk {
                cards = cards.push(card(item));
            }
            for _ in chunk.len()..COLUMNS {
                cards = cards.push(Space::new().width(Fill));
            }
            cards.into()
        });

        scrollable(Column::with_children(rows).spacing(16).padding([8, 20]))
            .height(Fill)
            .into()
    }
}

fn card(item: &GalleryItem) -> Element<'_, Message> {
    let id = item.id;
    let request = item.image.request();
    let label = request.uri_key().unwrap_or("(none)");

    let caption = match &item.error {
        Some(e) => text(e.clone()).size(12).style(|theme| text::Style {
            color: Some(theme::danger(theme)),
        }),
        None if item.image.is_loading() => text("Loading...").size(12),
        None => text(label.rsplit('/').next().unwrap_or(label).to_string()).size(12),
    };

    let footer = row![
        caption,
        Space::new().width(Fill),
        button(text("Next").size(12))
            .style(theme::text_button)
            .on_press(Message::CycleItem(id)),
        button(text("Remove").size(12))
            .style(theme::text_button)
            .on_press(Message::RemoveItem(id)),
    ]
    .align_y(Alignment::Center);

    let body = column![
        item.image.view().map(move |m| Message::Image(id, m)),
        footer,
    ]
    .spacing(8);

    container(body)
        .padding(12)
        .width(Fill)
        .style(theme::card)
        .into()
}

fn centered<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(14))
        .center_x(Fill)
        .center_y(Fill)
        .into()
}
