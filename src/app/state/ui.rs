use super::layout::ViewportMetrics;
use poststream_core::ScrollTween;

pub struct ScrollState {
    pub(in crate::app) viewport: ViewportMetrics,
    /// Animated scroll in progress; owns `viewport.scroll_top` while set.
    pub(in crate::app) tween: Option<ScrollTween>,
}

impl ScrollState {
    pub(in crate::app) fn is_animating(&self) -> bool {
        self.tween.is_some()
    }
}

#[derive(Default)]
pub struct ScrubberState {
    /// Last pointer position relative to the top of the track.
    pub(in crate::app) pointer_y: f32,
    pub(in crate::app) dragging: bool,
}

#[derive(Default)]
pub struct JumpState {
    pub(in crate::app) input: String,
    pub(in crate::app) error: Option<String>,
}
