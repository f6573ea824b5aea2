//! Progressive Image - cached image loading with preview cross-fade
//! Built with iced, demonstrated through a small gallery

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cache;
mod features;
mod ui;
mod utils;

fn main() -> iced::Result {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    iced::application(app::App::new, app::App::update, app::App::view)
        .title(app::App::title)
        .theme(app::App::theme)
        .subscription(app::App::subscription)
        .window_size((1280.0, 860.0))
        .antialiasing(true)
        .run()
}
