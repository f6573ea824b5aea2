//! Message update handlers - thin dispatcher delegating to submodules

mod appearance;
mod cache;
mod gallery;

use iced::Task;

use super::{App, Message};

impl App {
    /// Handle messages by delegating to appropriate submodule handlers
    pub fn update(&mut self, message: Message) -> Task<Message> {
        if let Some(task) = self.handle_gallery(&message) {
            return task;
        }
        if let Some(task) = self.handle_cache(&message) {
            return task;
        }
        if let Some(task) = self.handle_appearance(&message) {
            return task;
        }

        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::app::state::Status;
    use crate::app::{App, Message};
    use crate::cache::{CacheError, DiskCache};
    use crate::features::Settings;
    use crate::ui::primitives::progressive_image;
    use crate::ui::primitives::RenderTarget;
    use crate::ui::primitives::progressive_image::Tint;

    fn ready_app(name: &str) -> App {
        let mut settings = Settings::default();
        settings.gallery.images = vec![
            "https://example.invalid/a.jpg".into(),
            "https://example.invalid/b.jpg".into(),
            "https://example.invalid/c.jpg".into(),
        ];
        let dir = std::env::temp_dir().join(format!("pi-app-{}-{}", name, std::process::id()));
        let cache = DiskCache::new(dir, Duration::from_secs(1)).unwrap();

        let mut app = App::with_settings(settings, None);
        let _ = app.update(Message::CacheReady(Arc::new(cache)));
        app
    }

    #[test]
    fn test_cache_ready_fills_gallery() {
        let app = ready_app("fill");
        assert_eq!(app.items.len(), 3);
        let uris: Vec<_> = app
            .items
            .iter()
            .map(|item| item.image.request().uri_key().unwrap().to_string())
            .collect();
        assert_eq!(uris, app.settings.gallery.images);
        assert!(app.items.iter().all(|item| item.image.is_loading()));
    }

    #[test]
    fn test_cycle_changes_identifier() {
        let mut app = ready_app("cycle");
        let id = app.items[2].id;
        let before = app.items[2].image.generation();

        let _ = app.update(Message::CycleItem(id));
        let item = &app.items[2];
        assert_eq!(item.slot, 3);
        // Wraps to the first identifier
        assert_eq!(item.image.request().uri_key(), Some("https://example.invalid/a.jpg"));
        assert_eq!(item.image.generation(), before + 1);
        assert_eq!(item.image.resolved_path(), None);
    }

    #[test]
    fn test_completion_for_removed_item_is_dropped() {
        let mut app = ready_app("remove");
        let id = app.items[0].id;
        let _ = app.update(Message::RemoveItem(id));
        assert_eq!(app.items.len(), 2);

        let _ = app.update(Message::Image(
            id,
            progressive_image::Message::Resolved {
                generation: 1,
                uri: "https://example.invalid/a.jpg".into(),
                result: Err(CacheError::Status(500)),
            },
        ));
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_resolution_and_failure_routing() {
        let mut app = ready_app("routing");
        let (ok_id, ok_generation) = (app.items[0].id, app.items[0].image.generation());
        let (bad_id, bad_generation) = (app.items[1].id, app.items[1].image.generation());

        let _ = app.update(Message::Image(
            ok_id,
            progressive_image::Message::Resolved {
                generation: ok_generation,
                uri: "https://example.invalid/a.jpg".into(),
                result: Ok(PathBuf::from("/cache/a.jpg")),
            },
        ));
        assert!(app.items[0].image.resolved_path().is_some());
        assert!(app.has_active_animations());

        let _ = app.update(Message::Image(
            bad_id,
            progressive_image::Message::Resolved {
                generation: bad_generation,
                uri: "https://example.invalid/b.jpg".into(),
                result: Err(CacheError::Status(404)),
            },
        ));
        assert!(app.items[1].error.is_some());
        assert!(matches!(app.status, Some(Status::Error(_))));
    }

    #[test]
    fn test_appearance_toggles_reach_every_image() {
        let mut app = ready_app("toggles");

        let _ = app.update(Message::ToggleOverlay);
        assert!(app.items.iter().all(|item| item.image.request().overlay_hidden));

        let _ = app.update(Message::ToggleTint);
        assert!(app.items.iter().all(|item| item.image.request().tint == Tint::Light));

        let _ = app.update(Message::TogglePreviews);
        assert!(app.items.iter().all(|item| item.image.request().preview.is_none()));
        assert!(app.items.iter().all(|item| item.image.layers().placeholder));

        let _ = app.update(Message::CycleRenderTarget);
        assert_eq!(app.target, RenderTarget::NativeBlur);
        assert_eq!(app.settings.display.render_target, "ios");
        assert!(app.items.iter().all(|item| *item.image.target() == RenderTarget::NativeBlur));

        // Identifiers never changed, so nothing reloaded
        assert!(app.items.iter().all(|item| item.image.generation() == 1));
    }

    #[test]
    fn test_reload_recreates_images() {
        let mut app = ready_app("reload");
        let ids: Vec<_> = app.items.iter().map(|item| item.id).collect();

        let _ = app.update(Message::ReloadAll);
        assert_eq!(app.items.len(), ids.len());
        assert!(app.items.iter().all(|item| !ids.contains(&item.id)));
    }
}
