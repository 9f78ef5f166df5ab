use super::super::super::messages::Message;
use super::super::super::state::{App, STREAM_SCROLL_ID};
use super::super::Effect;
use crate::cache::save_read_state;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::mouse;
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::window;
use tracing::{debug, info};

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::FetchPage(request) => {
                let source = self.source.clone();
                let ticket = request.ticket;
                debug!(
                    %ticket,
                    direction = %request.direction,
                    anchor = ?request.anchor,
                    limit = request.limit,
                    delay_ms = request.delay.as_millis() as u64,
                    "Dispatching page load task"
                );
                Task::perform(crate::fixture::fetch(source, request), move |result| {
                    Message::PageLoaded { ticket, result }
                })
            }
            Effect::ScrollTo(offset) => {
                scrollable::scroll_to(STREAM_SCROLL_ID.clone(), AbsoluteOffset { x: 0.0, y: offset })
            }
            Effect::ExpireFlash { target, after } => Task::perform(
                async move {
                    tokio::time::sleep(after).await;
                    target
                },
                Message::FlashExpired,
            ),
            Effect::SaveReadState => {
                save_read_state(&self.cache_key, &self.read_state);
                Task::none()
            }
            Effect::QuitSafely => {
                self.stream.unmount();
                save_read_state(&self.cache_key, &self.read_state);
                info!(
                    near = self.read_state.near,
                    last_read = self.read_state.last_read_post_number,
                    "Saved read state; exiting"
                );
                iced::exit()
            }
        }
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(iced::window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::ScrubberReleased)
        }
        _ => None,
    }
}
