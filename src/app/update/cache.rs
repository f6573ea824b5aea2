//! Disk cache message handlers

use iced::Task;

use crate::app::helpers;
use crate::app::state::Status;
use crate::app::{App, Message};

impl App {
    pub(super) fn handle_cache(&mut self, message: &Message) -> Option<Task<Message>> {
        match message {
            Message::CacheReady(cache) => {
                self.cache = Some(cache.clone());
                self.cache_error = None;

                let count = self.settings.gallery.images.len();
                let mut tasks: Vec<_> = (0..count).map(|slot| self.spawn_item(slot)).collect();
                tasks.push(self.refresh_stats());
                Some(Task::batch(tasks))
            }
            Message::CacheFailed(e) => {
                self.cache_error = Some(e.clone());
                self.set_status(Status::Error(format!("Image cache unavailable: {}", e)));
                Some(Task::none())
            }
            Message::ClearCache => {
                let Some(cache) = self.cache.clone() else {
                    return Some(Task::none());
                };
                Some(Task::perform(helpers::clear_cache(cache), |result| {
                    Message::CacheCleared(result.map_err(|e| e.to_string()))
                }))
            }
            Message::CacheCleared(Ok(result)) => {
                let mut status = format!(
                    "Cleared {} cached images ({} MB)",
                    result.files_deleted,
                    result.mb_freed()
                );
                if result.errors > 0 {
                    status.push_str(&format!(", {} could not be deleted", result.errors));
                }
                self.set_status(Status::Info(status));
                Some(self.refresh_stats())
            }
            Message::CacheCleared(Err(e)) => {
                self.set_status(Status::Error(format!("Failed to clear cache: {}", e)));
                Some(Task::none())
            }
            Message::CacheStatsLoaded(Ok(stats)) => {
                self.cache_stats = Some(stats.clone());
                Some(Task::none())
            }
            Message::CacheStatsLoaded(Err(e)) => {
                tracing::warn!("Failed to scan image cache: {}", e);
                Some(Task::none())
            }
            _ => None,
        }
    }

    pub(super) fn refresh_stats(&self) -> Task<Message> {
        match &self.cache {
            Some(cache) => Task::perform(helpers::cache_stats(cache.clone()), |result| {
                Message::CacheStatsLoaded(result.map_err(|e| e.to_string()))
            }),
            None => Task::none(),
        }
    }
}
