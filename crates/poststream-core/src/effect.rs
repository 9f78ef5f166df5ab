use crate::loader::PageRequest;
use crate::stream::NavigationTicket;

/// Item to briefly highlight after a programmatic scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashTarget {
    Number(u64),
    Reply,
}

/// Work the host must perform on the engine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch a page and report back through `page_loaded`.
    LoadPage(PageRequest),
    /// Move the scroll container. Animated scrolls must report completion
    /// through `scroll_animation_finished`.
    ScrollTo { offset: f32, animate: bool },
    /// Debounced position report for the URL / mark-as-read sink.
    PositionChanged { start: u64, end: u64 },
    /// The read watermark moved forward.
    ReadAdvanced { last_read_post_number: u64 },
    /// Start a flash; the host clears it via `flash_finished`.
    Flash(FlashTarget),
    /// A navigation finished scrolling and loading.
    NavigationSettled(NavigationTicket),
}
