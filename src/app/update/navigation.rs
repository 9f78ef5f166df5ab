use super::super::state::App;
use super::Effect;
use tracing::{info, warn};

impl App {
    pub(super) fn handle_go_to_first(&mut self, effects: &mut Vec<Effect>) {
        let mut engine = Vec::new();
        self.stream.go_to_first(&mut engine);
        self.apply_stream_effects(engine, effects);
    }

    pub(super) fn handle_go_to_last(&mut self, effects: &mut Vec<Effect>) {
        let mut engine = Vec::new();
        self.stream.go_to_last(&mut engine);
        self.apply_stream_effects(engine, effects);
    }

    pub(super) fn handle_go_to_reply(&mut self, effects: &mut Vec<Effect>) {
        if !self.stream.stream().discussion().can_reply() {
            info!("Reply is not available in this discussion");
            return;
        }
        let mut engine = Vec::new();
        self.stream.go_to_reply(&mut engine);
        self.apply_stream_effects(engine, effects);
    }

    pub(super) fn handle_step_post(&mut self, step: i64, effects: &mut Vec<Effect>) {
        if self.stream.stream().count() == 0 {
            return;
        }
        let index = self.stream.step_index(step);
        let mut engine = Vec::new();
        self.stream.go_to_index(index, true, false, &mut engine);
        self.apply_stream_effects(engine, effects);
    }

    pub(super) fn handle_jump_input_changed(&mut self, input: String) {
        self.jump.input = input.chars().filter(char::is_ascii_digit).collect();
        self.jump.error = None;
    }

    pub(super) fn handle_jump_submitted(&mut self, effects: &mut Vec<Effect>) {
        let input = std::mem::take(&mut self.jump.input);
        match input.parse::<u64>() {
            Ok(number) if number > 0 => {
                self.jump.error = None;
                let mut engine = Vec::new();
                self.stream.go_to_number(number, true, &mut engine);
                self.apply_stream_effects(engine, effects);
            }
            _ => {
                warn!(input = %input, "Ignoring invalid post number");
                self.jump.error = Some("Enter a post number".to_string());
            }
        }
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
            PathBuf::from("navigation-test"),
            None,
        )
        .0
    }

    #[test]
    fn empty_jump_sets_an_error() {
        let mut app = app(30);
        let mut effects = Vec::new();
        app.handle_jump_submitted(&mut effects);
        assert!(app.jump.error.is_some());
        assert!(effects.is_empty());
    }

    #[test]
    fn typing_clears_the_previous_error() {
        let mut app = app(30);
        app.jump.error = Some("Enter a post number".to_string());
        app.handle_jump_input_changed("7".to_string());
        assert!(app.jump.error.is_none());
    }

    #[test]
    fn stepping_forward_moves_the_index() {
        let mut app = app(30);
        let before = app.stream.stream().index();
        let mut effects = Vec::new();
        app.handle_step_post(1, &mut effects);
        assert!(app.stream.stream().index() > before);
    }
}
