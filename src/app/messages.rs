use iced::keyboard::{Key, Modifiers};
use poststream_core::{FlashTarget, LoadError, Page, PageTicket};
use std::time::Instant;

/// Messages emitted by the UI.
#[derive(Debug, Clone)]
pub enum Message {
    GoToFirst,
    GoToLast,
    GoToReply,
    NextPost,
    PreviousPost,
    JumpInputChanged(String),
    JumpSubmitted,
    SimulateNewPost,
    ToggleTheme,
    SafeQuit,
    ScrubberMoved(f32),
    ScrubberPressed,
    ScrubberReleased,
    PageLoaded {
        ticket: PageTicket,
        result: Result<Page, LoadError>,
    },
    FlashExpired(FlashTarget),
    WindowResized {
        width: f32,
        height: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    Scrolled {
        offset_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    },
    Tick(Instant),
    PollSystemSignals,
}
