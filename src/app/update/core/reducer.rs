use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use tracing::info;

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::GoToFirst => self.handle_go_to_first(&mut effects),
            Message::GoToLast => self.handle_go_to_last(&mut effects),
            Message::GoToReply => self.handle_go_to_reply(&mut effects),
            Message::NextPost => self.handle_step_post(1, &mut effects),
            Message::PreviousPost => self.handle_step_post(-1, &mut effects),
            Message::JumpInputChanged(input) => self.handle_jump_input_changed(input),
            Message::JumpSubmitted => self.handle_jump_submitted(&mut effects),
            Message::SimulateNewPost => self.handle_simulate_new_post(&mut effects),
            Message::ToggleTheme => self.handle_toggle_theme(),
            Message::SafeQuit => effects.push(Effect::QuitSafely),
            Message::ScrubberMoved(y) => self.handle_scrubber_moved(y),
            Message::ScrubberPressed => self.handle_scrubber_pressed(&mut effects),
            Message::ScrubberReleased => self.handle_scrubber_released(&mut effects),
            Message::PageLoaded { ticket, result } => {
                self.handle_page_loaded(ticket, result, &mut effects);
            }
            Message::FlashExpired(target) => self.handle_flash_expired(target),
            Message::WindowResized { width, height } => {
                self.handle_window_resized(width, height, &mut effects);
            }
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::Scrolled {
                offset_y,
                viewport_width,
                viewport_height,
            } => self.handle_scrolled(offset_y, viewport_width, viewport_height, &mut effects),
            Message::Tick(now) => self.handle_tick(now, &mut effects),
            Message::PollSystemSignals => self.handle_poll_system_signals(&mut effects),
        }

        self.render_pass(&mut effects);
        effects
    }

    fn handle_toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        info!(theme = %self.config.theme, "Toggled theme");
    }

    fn handle_poll_system_signals(&mut self, effects: &mut Vec<Effect>) {
        if crate::take_sigint_requested() {
            info!("Received Ctrl+C; saving read state before exit");
            effects.push(Effect::QuitSafely);
        }
    }
}
