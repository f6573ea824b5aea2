//! Gallery message handlers

use std::time::Instant;

use iced::Task;

use crate::app::helpers;
use crate::app::state::{GalleryItem, Status};
use crate::app::{App, Message};
use crate::ui::primitives::{ProgressiveImage, progressive_image};

impl App {
    pub(super) fn handle_gallery(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::Image(id, msg) => Some(self.route_image(*id, msg.clone())),
            Message::CycleItem(id) => Some(self.cycle_item(*id)),
            Message::RemoveItem(id) => {
                self.remove_item(*id);
                Some(Task::none())
            }
            Message::AddItem => {
                let slot = self.items.last().map(|item| item.slot + 1).unwrap_or(0);
                Some(self.spawn_item(slot))
            }
            Message::ReloadAll => Some(self.reload_all()),
            Message::AnimationTick => {
                let now = Instant::now();
                for item in &mut self.items {
                    item.image.tick(now);
                }
                Some(Task::none())
            }
            _ => None,
        }
    }

    /// Mount a new card showing `slot`
    pub(super) fn spawn_item(&mut self, slot: usize) -> Task<Message> {
        let Some(cache) = self.cache.clone() else {
            return Task::none();
        };
        let Some(uri) = self.uri_at(slot) else {
            return Task::none();
        };

        let preview = helpers::preview_for(uri);
        let request = self.request_for(slot, &preview);
        let (image, task) = ProgressiveImage::new(request, cache, self.target.clone());

        let id = self.next_id;
        self.next_id += 1;
        self.items.push(GalleryItem {
            id,
            slot,
            preview,
            image,
            error: None,
        });

        task.map(move |m| Message::Image(id, m))
    }

    fn route_image(&mut self, id: usize, message: progressive_image::Message) -> Task<Message> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            tracing::debug!("Dropping image message for removed card {}", id);
            return Task::none();
        };

        let was_resolved = item.image.resolved_path().is_some();
        match item.image.update(message) {
            Ok(task) => {
                let task = task.map(move |m| Message::Image(id, m));
                if !was_resolved && item.image.resolved_path().is_some() {
                    item.error = None;
                    return Task::batch([task, self.refresh_stats()]);
                }
                task
            }
            Err(e) => {
                item.error = Some(e.source.to_string());
                self.set_status(Status::Error(e.to_string()));
                Task::none()
            }
        }
    }

    fn cycle_item(&mut self, id: usize) -> Task<Message> {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return Task::none();
        };
        let slot = self.items[index].slot + 1;
        let Some(uri) = self.uri_at(slot) else {
            return Task::none();
        };

        let preview = helpers::preview_for(uri);
        let request = self.request_for(slot, &preview);

        let item = &mut self.items[index];
        item.slot = slot;
        item.preview = preview;
        item.error = None;
        item.image.set_request(request).map(move |m| Message::Image(id, m))
    }

    fn remove_item(&mut self, id: usize) {
        if let Some(index) = self.items.iter().position(|item| item.id == id) {
            let mut item = self.items.remove(index);
            item.image.teardown();
            tracing::debug!("Removed card {} (loading: {})", id, item.image.is_loading());
        }
    }

    /// Tear down every card and mount fresh ones for the same slots
    fn reload_all(&mut self) -> Task<Message> {
        let slots: Vec<usize> = self.items.iter().map(|item| item.slot).collect();
        for mut item in self.items.drain(..) {
            item.image.teardown();
        }

        let tasks: Vec<_> = slots.into_iter().map(|slot| self.spawn_item(slot)).collect();
        Task::batch(tasks)
    }

    /// Push the current settings into every mounted image
    pub(super) fn apply_requests(&mut self) -> Task<Message> {
        let requests: Vec<_> = self
            .items
            .iter()
            .map(|item| self.request_for(item.slot, &item.preview))
            .collect();

        Task::batch(self.items.iter_mut().zip(requests).map(|(item, request)| {
            let id = item.id;
            item.image.set_request(request).map(move |m| Message::Image(id, m))
        }))
    }
}
