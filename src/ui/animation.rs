//! Animation support for the progressive image
//!
//! Animated values are driven by `iced_anim` transitions and advanced from
//! the application's frame subscription.
//!
//! # Usage
//!
//! ```rust
//! use crate::ui::animation::prelude::*;
//!
//! let value: Animated<f32> = Animated::transition(100.0, Easing::LINEAR);
//! ```

mod fade;
pub mod prelude;

pub use fade::{FadeCycle, FadeTransition};
