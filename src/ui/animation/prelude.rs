//! Animation prelude - commonly used types re-exported for convenience
//!
//! # Usage
//!
//! ```rust
//! use crate::ui::animation::prelude::*;
//! ```

use std::time::Duration;

pub use iced_anim::Animated;
pub use iced_anim::transition::Easing;

/// Linear easing running over `duration`
pub fn linear(duration: Duration) -> Easing {
    Easing::LINEAR.with_duration(duration)
}
