//! Feature modules - application logic separated from UI
//!
//! Each feature module contains the core logic for a specific functionality.

pub mod settings;

pub use settings::Settings;
