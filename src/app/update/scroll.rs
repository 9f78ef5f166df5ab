use super::super::state::{App, ViewportMetrics};
use super::Effect;
use std::time::Instant;
use tracing::debug;

impl App {
    pub(super) fn handle_scrolled(
        &mut self,
        offset_y: f32,
        viewport_width: f32,
        viewport_height: f32,
        effects: &mut Vec<Effect>,
    ) {
        if viewport_width.is_finite() && viewport_width > 0.0 {
            self.scroll.viewport.width = viewport_width;
        }
        if viewport_height.is_finite() && viewport_height > 0.0 {
            self.scroll.viewport.height = viewport_height;
        }
        // The tween owns scroll_top; echoes of its own scroll_to tasks would
        // otherwise lag it by a frame.
        if !self.scroll.is_animating() && offset_y.is_finite() {
            self.scroll.viewport.scroll_top = offset_y.max(0.0);
        }
        self.notify_scroll(Instant::now(), effects);
    }

    pub(super) fn handle_window_resized(
        &mut self,
        width: f32,
        height: f32,
        effects: &mut Vec<Effect>,
    ) {
        self.config.window_width = width;
        self.config.window_height = height;
        let scroll_top = self.scroll.viewport.scroll_top;
        self.scroll.viewport = ViewportMetrics {
            scroll_top,
            ..ViewportMetrics::from_window(width, height)
        };
        debug!(width, height, "Window resized");
        self.notify_scroll(Instant::now(), effects);
    }

    pub(super) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if let Some(tween) = self.scroll.tween {
            let offset = tween.sample(now);
            self.scroll.viewport.scroll_top = offset;
            effects.push(Effect::ScrollTo(offset));
            if tween.is_done(now) {
                self.scroll.tween = None;
                self.stream.scroll_animation_finished();
            }
            self.notify_scroll(now, effects);
        }

        let geometry = self.geometry();
        let mut engine = Vec::new();
        self.stream.poll(&geometry, now, &mut engine);
        self.apply_stream_effects(engine, effects);
    }

    fn notify_scroll(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let geometry = self.geometry();
        let mut engine = Vec::new();
        self.stream.on_scroll(&geometry, now, &mut engine);
        self.apply_stream_effects(engine, effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::fixture::FixtureSource;
    use std::path::PathBuf;

    fn app(count: usize) -> App {
        let config = AppConfig {
            load_latency_ms: 0,
            ..AppConfig::default()
        };
        App::bootstrap(
            FixtureSource::synthetic(count),
            config,
            PathBuf::from("scroll-test"),
            None,
        )
        .0
    }

    #[test]
    fn scroll_events_update_viewport() {
        let mut app = app(40);
        let mut effects = Vec::new();
        app.handle_scrolled(120.0, 640.0, 500.0, &mut effects);
        assert_eq!(app.scroll.viewport.scroll_top, 120.0);
        assert_eq!(app.scroll.viewport.width, 640.0);
        assert_eq!(app.scroll.viewport.height, 500.0);
    }

    #[test]
    fn degenerate_scroll_values_are_ignored() {
        let mut app = app(40);
        let before = app.scroll.viewport;
        let mut effects = Vec::new();
        app.handle_scrolled(f32::NAN, 0.0, f32::INFINITY, &mut effects);
        assert_eq!(app.scroll.viewport, before);
    }

    #[test]
    fn resize_keeps_scroll_offset() {
        let mut app = app(40);
        let mut effects = Vec::new();
        app.handle_scrolled(80.0, 640.0, 500.0, &mut effects);
        app.handle_window_resized(1200.0, 900.0, &mut effects);
        assert_eq!(app.scroll.viewport.scroll_top, 80.0);
        assert_eq!(
            app.scroll.viewport.height,
            ViewportMetrics::from_window(1200.0, 900.0).height
        );
    }

    #[test]
    fn finished_tween_emits_final_offset() {
        let mut app = app(40);
        let mut effects = Vec::new();
        app.begin_scroll(300.0, true, &mut effects);
        assert!(app.scroll.is_animating());

        let mut effects = Vec::new();
        app.handle_tick(Instant::now() + std::time::Duration::from_secs(5), &mut effects);
        assert!(!app.scroll.is_animating());
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, Effect::ScrollTo(offset) if *offset == 300.0))
        );
    }
}
