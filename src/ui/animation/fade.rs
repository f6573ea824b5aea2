//! Cross-fade transition from preview to final image
//!
//! Holds a single animated scalar that starts at [`FADE_START`] and runs to
//! [`FADE_END`] once, the first time the final image becomes available while
//! a preview is on screen.

use std::time::{Duration, Instant};

use super::prelude::{Animated, linear};

/// Scalar value while the preview is fully masked
pub const FADE_START: f32 = 100.0;
/// Scalar value once the hand-off is complete
pub const FADE_END: f32 = 0.0;

/// Highest overlay opacity, reached at [`FADE_START`]
const MAX_OPACITY: f32 = 0.5;

/// What the owner observed during one update cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FadeCycle {
    /// The image identifier differs from the previous cycle
    pub uri_changed: bool,
    /// A resolved path is present now
    pub resolved: bool,
    /// A preview image is configured
    pub has_preview: bool,
}

/// Transition controller for the preview overlay
#[derive(Debug)]
pub struct FadeTransition {
    value: Animated<f32>,
    duration: Duration,
    /// Resolution state seen in the previous cycle
    was_resolved: bool,
}

impl FadeTransition {
    pub fn new(duration: Duration) -> Self {
        Self {
            value: Animated::transition(FADE_START, linear(duration)),
            duration,
            was_resolved: false,
        }
    }

    /// Feed one update cycle; returns true if the fade started in this cycle
    ///
    /// The fade starts only when the identifier is unchanged, the image just
    /// went from unresolved to resolved, and a preview is configured. Later
    /// cycles with the same resolved state never restart it.
    pub fn observe(&mut self, cycle: FadeCycle) -> bool {
        let start = !cycle.uri_changed
            && cycle.resolved
            && cycle.has_preview
            && !self.was_resolved;
        self.was_resolved = cycle.resolved;

        if start {
            // Rebuild so the duration configured right now applies
            let current = self.value();
            self.value = Animated::transition(current, linear(self.duration));
            self.value.update(FADE_END.into());
            tracing::debug!("Preview fade started ({:?})", self.duration);
        }

        start
    }

    /// Put the overlay back to fully masking, for a new image generation
    pub fn reset(&mut self) {
        self.value = Animated::transition(FADE_START, linear(self.duration));
    }

    /// Change the duration used by the next fade
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Current scalar, always within `[FADE_END, FADE_START]`
    pub fn value(&self) -> f32 {
        self.value.value().clamp(FADE_END, FADE_START)
    }

    /// Scalar mapped from `[0, 100]` to `[0, 0.5]` for the flat tint overlay
    pub fn opacity(&self) -> f32 {
        self.value() / FADE_START * MAX_OPACITY
    }

    /// Scalar mapped to `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.value() / FADE_START
    }

    pub fn is_animating(&self) -> bool {
        self.value.is_animating()
    }

    /// Tick the animation forward in time
    /// Must be called on each animation frame to update values
    pub fn tick(&mut self, now: Instant) {
        self.value.tick(now);
    }
}

impl Default for FadeTransition {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
