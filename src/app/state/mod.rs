mod constants;
mod layout;
mod ui;

use crate::cache::ReadState;
use crate::config::{AppConfig, ThemeMode};
use crate::fixture::FixtureSource;
use iced::{Task, Theme};
use poststream_core::{ContentRegistry, Geometry, PostStream, StreamView};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::messages::Message;

pub(crate) use constants::*;
pub(in crate::app) use layout::{ViewportMetrics, build_geometry, item_height};
pub(in crate::app) use ui::{JumpState, ScrollState, ScrubberState};

/// Core application state composed of sub-models.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) stream: StreamView,
    pub(super) source: Arc<FixtureSource>,
    pub(super) title: String,
    pub(super) cache_key: PathBuf,
    pub(super) read_state: ReadState,
    pub(super) scroll: ScrollState,
    pub(super) scrubber: ScrubberState,
    pub(super) jump: JumpState,
    /// Last reported `(start, end)` post numbers in view.
    pub(super) position: Option<(u64, u64)>,
    pub(super) load_error: Option<String>,
}

impl App {
    pub(super) fn bootstrap(
        source: FixtureSource,
        config: AppConfig,
        cache_key: PathBuf,
        read_state: Option<ReadState>,
    ) -> (App, Task<Message>) {
        let config = config.clamped();
        let source = Arc::new(source.with_simulation(
            Duration::from_millis(config.load_latency_ms),
            config.fail_every_nth,
        ));

        let cached = read_state.unwrap_or_default();
        let mut meta = source.meta();
        meta.last_read_post_number = meta.last_read_post_number.max(cached.last_read_post_number);
        let near = (cached.near > 0).then_some(cached.near);
        let initial = source.initial_page(near, config.stream.page_size);
        info!(
            count = meta.post_ids.len(),
            near = ?near,
            initial_offset = initial.offset,
            initial_posts = initial.posts.len(),
            "Bootstrapping post stream"
        );

        let stream = PostStream::new(meta, initial, &config.stream);
        let view = StreamView::new(stream, ContentRegistry::with_defaults(), &config.stream);
        let mut app = App {
            title: source.title(),
            scroll: ScrollState {
                viewport: ViewportMetrics::from_window(config.window_width, config.window_height),
                tween: None,
            },
            read_state: cached,
            config,
            stream: view,
            source,
            cache_key,
            scrubber: ScrubberState::default(),
            jump: JumpState::default(),
            position: None,
            load_error: None,
        };
        let task = app.start(near);
        (app, task)
    }

    /// Geometry of the frame the view renders for the current state.
    pub(super) fn geometry(&self) -> Geometry {
        let items = self.stream.items();
        build_geometry(&items, self.scroll.viewport, self.config.font_size)
    }

    pub(super) fn theme(&self) -> Theme {
        if matches!(self.config.theme, ThemeMode::Night) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}
