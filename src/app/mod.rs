mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::cache::ReadState;
use crate::config::AppConfig;
use crate::fixture::FixtureSource;
use iced::{Size, window};

/// Helper to launch the app for one discussion.
pub fn run_app(
    source: FixtureSource,
    config: AppConfig,
    cache_key: std::path::PathBuf,
    read_state: Option<ReadState>,
) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        ..window::Settings::default()
    };

    iced::application("Post Stream Viewer", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(App::theme)
        .run_with(move || App::bootstrap(source, config, cache_key, read_state))
}
