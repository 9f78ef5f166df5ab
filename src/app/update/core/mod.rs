mod reducer;
mod runtime;
mod shortcuts;

use super::super::messages::Message;
use super::super::state::{App, SIGNAL_POLL_INTERVAL_MS, TICK_INTERVAL_MS};
use iced::event;
use iced::time;
use iced::{Subscription, Task};
use std::time::{Duration, Instant};

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> = vec![
            event::listen_with(runtime::runtime_event_to_message),
            time::every(Duration::from_millis(SIGNAL_POLL_INTERVAL_MS))
                .map(|_| Message::PollSystemSignals),
        ];

        if app.scroll.is_animating() || app.stream.next_deadline().is_some() {
            subscriptions
                .push(time::every(Duration::from_millis(TICK_INTERVAL_MS)).map(Message::Tick));
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        self.run_effects(effects)
    }

    /// Mount the stream view and, when resuming, navigate to the cached
    /// position.
    pub(in crate::app) fn start(&mut self, near: Option<u64>) -> Task<Message> {
        let mut effects = Vec::new();
        self.mount_stream(Instant::now(), near, &mut effects);
        self.render_pass(&mut effects);
        self.run_effects(effects)
    }

    fn run_effects(&mut self, effects: Vec<super::Effect>) -> Task<Message> {
        if effects.is_empty() {
            Task::none()
        } else {
            Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
        }
    }
}
