use super::super::state::App;
use super::Effect;
use tracing::debug;

impl App {
    pub(super) fn handle_scrubber_moved(&mut self, pointer_y: f32) {
        if !pointer_y.is_finite() {
            return;
        }
        self.scrubber.pointer_y = pointer_y;
        if self.scrubber.dragging {
            self.stream.scrubber_drag(pointer_y);
        }
    }

    pub(super) fn handle_scrubber_pressed(&mut self, effects: &mut Vec<Effect>) {
        let pointer_y = self.scrubber.pointer_y;
        if self.pointer_on_handle(pointer_y) {
            self.scrubber.dragging = self.stream.scrubber_press(pointer_y);
            debug!(pointer_y, dragging = self.scrubber.dragging, "Scrubber drag started");
            return;
        }
        let mut engine = Vec::new();
        self.stream.scrubber_click(pointer_y, &mut engine);
        self.apply_stream_effects(engine, effects);
    }

    pub(super) fn handle_scrubber_released(&mut self, effects: &mut Vec<Effect>) {
        if !std::mem::take(&mut self.scrubber.dragging) {
            return;
        }
        let mut engine = Vec::new();
        self.stream.scrubber_release(&mut engine);
        self.apply_stream_effects(engine, effects);
    }

    fn pointer_on_handle(&self, pointer_y: f32) -> bool {
        let Some(layout) = self.stream.scrubber_layout() else {
            return false;
        };
        let track = f64::from(self.scroll.viewport.track_height());
        if track <= 0.0 {
            return false;
        }
        let top = layout.before / 100.0 * track;
        let bottom = (layout.before + layout.handle) / 100.0 * track;
        (top..=bottom).contains(&f64::from(pointer_y))
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
            PathBuf::from("scrubber-test"),
            None,
        )
        .0
    }

    #[test]
    fn release_without_drag_is_a_no_op() {
        let mut app = app(100);
        let mut effects = Vec::new();
        app.handle_scrubber_released(&mut effects);
        assert!(effects.is_empty());
        assert!(!app.stream.stream().paused());
    }

    #[test]
    fn pressing_the_handle_starts_a_drag() {
        let mut app = app(100);
        app.handle_scrubber_moved(1.0);
        let mut effects = Vec::new();
        app.handle_scrubber_pressed(&mut effects);
        assert!(app.scrubber.dragging);

        app.handle_scrubber_moved(200.0);
        app.handle_scrubber_released(&mut effects);
        assert!(!app.scrubber.dragging);
        assert!(app.stream.stream().paused());
    }

    #[test]
    fn clicking_the_track_navigates() {
        let mut app = app(400);
        let track = app.scroll.viewport.track_height();
        app.handle_scrubber_moved(track - 1.0);
        let mut effects = Vec::new();
        app.handle_scrubber_pressed(&mut effects);
        assert!(!app.scrubber.dragging);
        assert!(app.stream.stream().paused());
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, Effect::FetchPage(_)))
        );
    }
}
