//! Scrubber mapper.
//!
//! Maps the stream's read position onto a three-segment bar
//! (`before` / `handle` / `after`, in percent of track height) plus an unread
//! band, and maps pointer interaction on that bar back to sequence offsets.
//! Drag indices are 0-based offsets; the stream's read position is the
//! same value plus one.

use crate::config::StreamConfig;
use crate::effect::Effect;
use crate::stream::{NavigationTicket, PostStream};
use tracing::debug;

/// Percent of track owed to each post on screen (`visible`) and to each
/// post off screen (`index`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentPerPost {
    pub index: f64,
    pub visible: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnreadBand {
    pub top: f64,
    pub height: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrubberLayout {
    pub before: f64,
    pub handle: f64,
    pub after: f64,
    pub unread: UnreadBand,
    /// Whether the host should animate from the previous layout.
    pub animate: bool,
    pub index_label: usize,
    pub count: usize,
    pub description: String,
    pub disabled: bool,
}

impl ScrubberLayout {
    pub fn label(&self) -> String {
        format!("{} of {}", self.index_label, self.count)
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    mouse_start: f64,
    index_start: f64,
    index: f64,
}

#[derive(Debug)]
pub struct ScrubberMapper {
    attached: bool,
    track_height: f64,
    min_handle_px: f64,
    drag: Option<Drag>,
    layout: Option<ScrubberLayout>,
}

impl ScrubberMapper {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            attached: false,
            track_height: 0.0,
            min_handle_px: f64::from(config.min_handle_px),
            drag: None,
            layout: None,
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.drag = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn layout(&self) -> Option<&ScrubberLayout> {
        self.layout.as_ref()
    }

    pub fn track_height(&self) -> f64 {
        self.track_height
    }

    pub fn set_track_height(&mut self, height: f32) {
        let height = f64::from(height);
        self.track_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
    }

    pub fn percent_per_post(&self, count: usize, visible: f64) -> PercentPerPost {
        if count == 0 {
            return PercentPerPost {
                index: 0.0,
                visible: 0.0,
            };
        }
        let count = count as f64;
        let visible = if visible.is_finite() {
            visible.clamp(0.0, count)
        } else {
            0.0
        };
        let min_percent_visible = if self.track_height > 0.0 {
            self.min_handle_px * 100.0 / self.track_height
        } else {
            0.0
        };
        let floor = if visible > 0.0 {
            min_percent_visible / visible
        } else {
            0.0
        };
        let per_visible = (100.0 / count).max(floor);
        let per_index = if count - visible <= 0.0 {
            0.0
        } else {
            (100.0 - per_visible * visible).max(0.0) / (count - visible)
        };
        PercentPerPost {
            index: per_index,
            visible: per_visible,
        }
    }

    /// `(before, handle, after)` in percent of track height.
    pub fn heights(&self, count: usize, index: f64, visible: f64) -> (f64, f64, f64) {
        if count == 0 {
            return (0.0, 100.0, 0.0);
        }
        let per_post = self.percent_per_post(count, visible);
        let count = count as f64;
        let visible = visible.clamp(0.0, count);
        let before = (per_post.index * (index - 1.0).min(count - visible))
            .clamp(0.0, 100.0);
        let handle = (100.0 - before).min(per_post.visible * visible).max(0.0);
        let after = (100.0 - before - handle).max(0.0);
        (before, handle, after)
    }

    pub fn unread_band(&self, count: usize, index: f64, unread: usize) -> UnreadBand {
        if count == 0 {
            return UnreadBand::default();
        }
        let count = count as f64;
        let remaining = (count - index).max(0.0).min(unread as f64);
        let height = remaining / count * 100.0;
        UnreadBand {
            top: 100.0 - height,
            height,
            opacity: if height > 0.0 { 1.0 } else { 0.0 },
        }
    }

    /// Recompute the layout from the stream's current read position.
    pub fn update(&mut self, stream: &PostStream, animate: bool) -> &ScrubberLayout {
        let count = stream.count();
        let index = stream.index();
        let (before, handle, after) = self.heights(count, index, stream.visible());
        let layout = ScrubberLayout {
            before,
            handle,
            after,
            unread: self.unread_band(count, index, stream.unread_count()),
            animate,
            index_label: stream.sanitize_index(index.max(1.0)),
            count,
            description: stream.description().to_string(),
            disabled: stream.disabled(),
        };
        self.layout.insert(layout)
    }

    /// Begin a drag at `pointer_y` (track-relative pixels).
    pub fn press(&mut self, stream: &PostStream, pointer_y: f32) -> bool {
        if !self.attached || stream.disabled() {
            return false;
        }
        let index_start = (stream.index() - 1.0).max(0.0);
        self.drag = Some(Drag {
            mouse_start: f64::from(pointer_y),
            index_start,
            index: index_start,
        });
        true
    }

    /// Move the live index. Never triggers a load.
    pub fn drag_to(&mut self, stream: &mut PostStream, pointer_y: f32) -> Option<f64> {
        let drag = self.drag?;
        let per_post = self.percent_per_post(stream.count(), stream.visible());
        let delta_percent = if self.track_height > 0.0 {
            (f64::from(pointer_y) - drag.mouse_start) * 100.0 / self.track_height
        } else {
            0.0
        };
        let mut delta_index = delta_percent / per_post.index;
        if !delta_index.is_finite() {
            delta_index = 0.0;
        }
        let last = stream.count().saturating_sub(1) as f64;
        let index = (drag.index_start + delta_index).clamp(0.0, last);
        self.drag = Some(Drag { index, ..drag });
        stream.scrub_to(index + 1.0);
        Some(index)
    }

    /// End the drag and navigate to the offset under the handle.
    pub fn release(
        &mut self,
        stream: &mut PostStream,
        effects: &mut Vec<Effect>,
    ) -> Option<NavigationTicket> {
        let drag = self.drag.take()?;
        debug!(index = drag.index, "Scrubber released");
        Some(stream.go_to_index(drag.index.floor(), true, false, effects))
    }

    /// Seek so the clicked point becomes the handle's center.
    pub fn click(
        &mut self,
        stream: &mut PostStream,
        pointer_y: f32,
        effects: &mut Vec<Effect>,
    ) -> Option<NavigationTicket> {
        if !self.attached || stream.disabled() || self.track_height <= 0.0 {
            return None;
        }
        let count = stream.count();
        let per_post = self.percent_per_post(count, stream.visible());
        let (_, handle, _) = self.heights(count, stream.index(), stream.visible());
        let offset_percent = f64::from(pointer_y) / self.track_height * 100.0 - handle / 2.0;
        let mut index = offset_percent / per_post.index;
        if !index.is_finite() {
            index = 0.0;
        }
        let index = index.clamp(0.0, count.saturating_sub(1) as f64).floor();
        debug!(pointer_y, index, "Scrubber clicked");
        Some(stream.go_to_index(index, true, false, effects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::NavigationTarget;
    use crate::stream::tests::stream;

    fn mapper(track: f32) -> ScrubberMapper {
        let mut mapper = ScrubberMapper::new(&StreamConfig::default());
        mapper.attach();
        mapper.set_track_height(track);
        mapper
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn single_post_fills_the_track() {
        let mapper = mapper(500.0);
        assert_eq!(mapper.heights(1, 1.0, 1.0), (0.0, 100.0, 0.0));
    }

    #[test]
    fn first_page_of_long_stream() {
        let mapper = mapper(500.0);
        let (before, handle, after) = mapper.heights(200, 1.0, 20.0);
        assert!(close(before, 0.0));
        assert!(close(handle, 10.0));
        assert!(close(after, 90.0));
    }

    #[test]
    fn handle_respects_minimum_pixels() {
        let mapper = mapper(500.0);
        let per_post = mapper.percent_per_post(10_000, 5.0);
        assert!(per_post.visible * 5.0 >= 10.0 - 1e-9);

        for index in [1.0, 2_500.0, 9_996.0, 10_000.0] {
            let (before, handle, after) = mapper.heights(10_000, index, 5.0);
            assert!(handle >= 10.0 - 1e-9);
            assert!(close(before + handle + after, 100.0));
        }
    }

    #[test]
    fn unread_band_tracks_remaining_posts() {
        let mapper = mapper(500.0);
        let band = mapper.unread_band(100, 70.0, 50);
        assert!(close(band.height, 30.0));
        assert!(close(band.top, 70.0));
        assert_eq!(band.opacity, 1.0);

        let band = mapper.unread_band(100, 100.0, 50);
        assert_eq!(band.height, 0.0);
        assert_eq!(band.opacity, 0.0);
    }

    #[test]
    fn empty_stream_is_inert() {
        let mut mapper = mapper(500.0);
        let stream = stream(0, 0, 0);
        let layout = mapper.update(&stream, false).clone();
        assert!(layout.disabled);
        assert_eq!(layout.label(), "0 of 0");
        assert!(!mapper.press(&stream, 10.0));
    }

    #[test]
    fn drag_moves_index_without_loading() {
        let mut mapper = mapper(500.0);
        let mut stream = stream(100, 0, 20);
        stream.update_read_position(51.0, 10.0, None);

        assert!(mapper.press(&stream, 100.0));
        let mut effects = Vec::new();
        assert_eq!(mapper.drag_to(&mut stream, 110.0), Some(52.0));
        assert_eq!(stream.index(), 53.0);
        assert!(effects.is_empty());

        let ticket = mapper.release(&mut stream, &mut effects);
        assert!(ticket.is_some());
        assert!(!mapper.is_dragging());
        assert_eq!(
            stream.target(),
            Some(NavigationTarget::Index {
                index: 52,
                reply: false
            })
        );
        assert_eq!(mapper.release(&mut stream, &mut effects), None);
    }

    #[test]
    fn drag_clamps_to_last_post() {
        let mut mapper = mapper(500.0);
        let mut stream = stream(100, 0, 20);
        stream.update_read_position(51.0, 10.0, None);
        mapper.press(&stream, 100.0);
        assert_eq!(mapper.drag_to(&mut stream, 5_000.0), Some(99.0));
        assert_eq!(mapper.drag_to(&mut stream, -5_000.0), Some(0.0));
    }

    #[test]
    fn click_centers_handle_on_pointer() {
        let mut mapper = mapper(500.0);
        let mut stream = stream(100, 0, 20);
        stream.update_read_position(1.0, 10.0, None);
        let mut effects = Vec::new();

        assert!(mapper.click(&mut stream, 250.0, &mut effects).is_some());
        assert_eq!(
            stream.target(),
            Some(NavigationTarget::Index {
                index: 45,
                reply: false
            })
        );
    }

    #[test]
    fn layout_label_uses_read_position() {
        let mut mapper = mapper(500.0);
        let mut stream = stream(100, 0, 20);
        stream.update_read_position(12.6, 10.0, Some("May 2023".to_string()));
        let layout = mapper.update(&stream, true);
        assert_eq!(layout.label(), "12 of 100");
        assert_eq!(layout.description, "May 2023");
        assert!(layout.animate);
    }
}
