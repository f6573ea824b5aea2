//! Progressive image primitive
//!
//! Shows a placeholder or a low-fidelity preview right away, resolves the
//! full-resolution image through the shared [`ImageCache`], and cross-fades
//! from the preview to the final image once the file is available locally.
//!
//! # Update cycle
//!
//! The owner drives the primitive the same way it drives any other state:
//! [`ProgressiveImage::new`] is the first activation, [`set_request`] is an
//! owner update, completions come back through [`update`], and animation
//! frames go to [`tick`]. Every cycle
//!
//! 1. syncs the [`Loader`] with the requested identifier, issuing at most one
//!    cache resolution per identifier,
//! 2. feeds the [`FadeTransition`] whether the identifier changed and whether
//!    a resolved path is present.
//!
//! [`set_request`]: ProgressiveImage::set_request
//! [`update`]: ProgressiveImage::update
//! [`tick`]: ProgressiveImage::tick

mod layers;
mod loader;
mod overlay;
mod request;
mod style;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use iced::border::Radius;
use iced::widget::image::Handle;
use iced::widget::{Stack, container, image};
use iced::{ContentFit, Element, Fill, Task};
use tracing::{debug, warn};

use crate::cache::{CacheError, ImageCache};
use crate::ui::animation::{FadeCycle, FadeTransition};
use crate::ui::effects::blur::BlurError;

pub use layers::{LayerInputs, Layers};
pub use loader::{Activation, Loader, Settlement, Ticket};
pub use overlay::{OverlayKind, RenderTarget};
pub use request::{ImageRequest, ImageSource, Tint};
pub use style::ImageStyle;

/// Completions delivered back to the primitive
#[derive(Debug, Clone)]
pub enum Message {
    Resolved {
        generation: u64,
        uri: String,
        result: Result<PathBuf, CacheError>,
    },
    PreviewBlurred {
        preview: ImageSource,
        result: Result<Handle, BlurError>,
    },
}

/// Resolution failure of the active identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub uri: String,
    pub source: CacheError,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.uri, self.source)
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug)]
pub struct ProgressiveImage {
    request: ImageRequest,
    cache: Arc<dyn ImageCache>,
    target: RenderTarget,
    loader: Loader,
    fade: FadeTransition,
    /// Render handle of the resolved file, created once per resolution
    final_image: Option<Handle>,
    /// Softened preview for the blur overlay, keyed by the preview it came from
    blurred: Option<(ImageSource, Handle)>,
    blur_pending: Option<ImageSource>,
}

impl ProgressiveImage {
    /// First activation
    pub fn new(
        request: ImageRequest,
        cache: Arc<dyn ImageCache>,
        target: RenderTarget,
    ) -> (Self, Task<Message>) {
        let mut this = Self {
            fade: FadeTransition::new(request.transition_duration),
            request,
            cache,
            target,
            loader: Loader::new(),
            final_image: None,
            blurred: None,
            blur_pending: None,
        };
        let task = this.cycle();
        (this, task)
    }

    /// Owner update with a possibly changed request
    pub fn set_request(&mut self, request: ImageRequest) -> Task<Message> {
        if !self.loader.is_mounted() {
            return Task::none();
        }
        self.request = request;
        self.cycle()
    }

    /// Switch the render target; a new target may need a blurred preview
    pub fn set_target(&mut self, target: RenderTarget) -> Task<Message> {
        if !self.loader.is_mounted() || self.target == target {
            return Task::none();
        }
        self.target = target;
        self.prepare_blur()
    }

    /// Apply a completion
    ///
    /// Failures of the active identifier are handed back to the owner.
    /// Completions that arrive after the identifier changed or after
    /// teardown are dropped without touching any state.
    pub fn update(&mut self, message: Message) -> Result<Task<Message>, LoadError> {
        match message {
            Message::Resolved {
                generation,
                uri,
                result: Ok(path),
            } => match self.loader.commit(generation, path) {
                Settlement::Current => {
                    self.final_image = self.loader.resolved().map(Handle::from_path);
                    self.observe(false);
                    debug!("Resolved {}", uri);
                }
                Settlement::Stale => debug!("Discarding superseded resolution of {}", uri),
                Settlement::Unmounted => debug!("Discarding resolution of {} after teardown", uri),
            },
            Message::Resolved {
                generation,
                uri,
                result: Err(source),
            } => match self.loader.settle(generation) {
                Settlement::Current => return Err(LoadError { uri, source }),
                _ => debug!("Ignoring failure for inactive {}: {}", uri, source),
            },
            Message::PreviewBlurred { preview, result } => {
                if self.blur_pending.as_ref() == Some(&preview) {
                    self.blur_pending = None;
                }
                if !self.loader.is_mounted() || self.request.preview.as_ref() != Some(&preview) {
                    return Ok(Task::none());
                }
                match result {
                    Ok(handle) => self.blurred = Some((preview, handle)),
                    Err(e) => warn!("Preview blur failed, using tint only: {}", e),
                }
            }
        }

        Ok(Task::none())
    }

    /// Advance the fade
    pub fn tick(&mut self, now: Instant) {
        self.fade.tick(now);
    }

    pub fn is_animating(&self) -> bool {
        self.fade.is_animating()
    }

    /// The owner discarded this image; late completions become no-ops
    pub fn teardown(&mut self) {
        self.loader.teardown();
        self.blur_pending = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Generation of the active identifier; completions carry the one they were issued for
    #[allow(dead_code)]
    pub fn generation(&self) -> u64 {
        self.loader.generation()
    }

    pub fn request(&self) -> &ImageRequest {
        &self.request
    }

    #[allow(dead_code)]
    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        self.loader.resolved()
    }

    pub fn layers(&self) -> Layers {
        Layers::select(LayerInputs {
            has_placeholder: self.request.placeholder.is_some(),
            has_preview: self.request.preview.is_some(),
            is_resolved: self.loader.resolved().is_some(),
            overlay_hidden: self.request.overlay_hidden,
            overlay: self.target.overlay(),
        })
    }

    pub fn view(&self) -> Element<'_, Message> {
        let layers = self.layers();
        let style = &self.request.style;
        let radius = style.layer_style().radius();
        let fit = self.request.content_fit;

        let mut content = Stack::new().width(Fill).height(Fill);

        if let Some(placeholder) = self.request.placeholder.as_ref().filter(|_| layers.placeholder) {
            content = content.push(picture(placeholder.handle(), radius, fit));
        }
        if let Some(preview) = self.request.preview.as_ref().filter(|_| layers.preview) {
            content = content.push(picture(preview.handle(), radius, fit));
        }
        if let Some(handle) = self.final_image.as_ref().filter(|_| layers.final_image) {
            content = content.push(picture(handle, radius, fit));
        }
        if let Some(kind) = layers.overlay {
            content = content.push(overlay::view(
                kind,
                &self.fade,
                self.request.tint,
                radius,
                self.blurred_preview(),
                fit,
            ));
        }

        let style = *style;
        container(content)
            .width(style.width)
            .height(style.height)
            .padding(style.inset())
            .style(move |_theme| style.frame())
            .into()
    }

    fn cycle(&mut self) -> Task<Message> {
        self.fade.set_duration(self.request.transition_duration);

        let Activation { uri_changed, ticket } = self.loader.sync(self.request.uri_key());
        if uri_changed {
            self.final_image = None;
            self.fade.reset();
        }
        self.observe(uri_changed);

        let load = match ticket {
            Some(ticket) => self.load(ticket),
            None => Task::none(),
        };
        Task::batch([load, self.prepare_blur()])
    }

    fn observe(&mut self, uri_changed: bool) {
        self.fade.observe(FadeCycle {
            uri_changed,
            resolved: self.loader.resolved().is_some(),
            has_preview: self.request.preview.is_some(),
        });
    }

    fn load(&self, ticket: Ticket) -> Task<Message> {
        let Ticket { generation, uri } = ticket;
        debug!("Resolving {} (generation {})", uri, generation);

        let resolution = self.cache.resolve(&uri);
        Task::perform(resolution.local_path(), move |result| Message::Resolved {
            generation,
            uri,
            result,
        })
    }

    /// Blurred copy of the configured preview, if one is ready
    fn blurred_preview(&self) -> Option<&Handle> {
        self.blurred
            .as_ref()
            .filter(|(source, _)| self.request.preview.as_ref() == Some(source))
            .map(|(_, handle)| handle)
    }

    /// Start blurring the configured preview if the blur overlay will need it
    fn prepare_blur(&mut self) -> Task<Message> {
        if self.blurred_preview().is_none() {
            self.blurred = None;
        }
        if self.target.overlay() != Some(OverlayKind::Blur) || self.request.overlay_hidden {
            return Task::none();
        }
        let Some(preview) = self.request.preview.clone() else {
            return Task::none();
        };

        if self.blurred.is_some() || self.blur_pending.as_ref() == Some(&preview) {
            return Task::none();
        }

        self.blur_pending = Some(preview.clone());
        Task::perform(overlay::blur_preview(preview.clone()), move |result| {
            Message::PreviewBlurred { preview, result }
        })
    }
}

fn picture<'a>(handle: &Handle, radius: Radius, fit: ContentFit) -> Element<'a, Message> {
    image(handle.clone())
        .width(Fill)
        .height(Fill)
        .content_fit(fit)
        .border_radius(radius)
        .into()
}
