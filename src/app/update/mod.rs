use poststream_core::{FlashTarget, PageRequest};
use std::time::Duration;

mod core;
mod navigation;
mod scroll;
mod scrubber;
mod stream;

/// Describes work that must be performed outside the pure reducer.
pub(super) enum Effect {
    FetchPage(PageRequest),
    ScrollTo(f32),
    ExpireFlash { target: FlashTarget, after: Duration },
    SaveReadState,
    QuitSafely,
}
