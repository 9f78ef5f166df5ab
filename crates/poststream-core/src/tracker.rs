//! Viewport tracker: turns a geometry snapshot into load-more requests, a
//! fractional read position and debounced `(start, end)` position reports.

use crate::config::StreamConfig;
use crate::effect::Effect;
use crate::geometry::Geometry;
use crate::stream::PostStream;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Fractional position derived from one geometry frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPosition {
    /// 1-based fractional index of the item at the viewport top.
    pub index: f64,
    pub visible: f64,
    /// Timestamp of the last visible dated item.
    pub period: Option<DateTime<Utc>>,
}

impl ReadPosition {
    pub fn description(&self) -> Option<String> {
        self.period.map(|time| time.format("%B %Y").to_string())
    }
}

#[derive(Debug)]
pub struct ViewportTracker {
    attached: bool,
    lookahead_px: f32,
    debounce: Duration,
    start_scrolled_past_max: f32,
    start_viewport_cover_min: f32,
    deadline: Option<Instant>,
    last_reported: Option<(u64, u64)>,
}

impl ViewportTracker {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            attached: false,
            lookahead_px: config.lookahead_px,
            debounce: config.position_debounce(),
            start_scrolled_past_max: config.start_scrolled_past_max,
            start_viewport_cover_min: config.start_viewport_cover_min,
            deadline: None,
            last_reported: None,
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
        self.last_reported = None;
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.deadline = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Edge-load check. Runs on every scroll tick; the stream's per-direction
    /// guards make repeated calls harmless.
    pub fn load_posts_if_needed(
        &self,
        stream: &mut PostStream,
        geometry: &Geometry,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if !self.attached {
            return false;
        }
        let top = geometry.viewport_top();
        let bottom = geometry.viewport_bottom();
        let mut requested = false;

        if stream.visible_start() > 0 {
            if let Some(item) = geometry.item_at_index(stream.visible_start()) {
                if item.top > top - self.lookahead_px {
                    requested |= stream.load_previous(effects);
                }
            }
        }

        // An empty window has no bottom item; gap retry below refills it.
        if stream.visible_end() < stream.count() && stream.visible_end() > stream.visible_start() {
            if let Some(item) = geometry.item_at_index(stream.visible_end() - 1) {
                if item.bottom() < bottom + self.lookahead_px {
                    requested |= stream.load_next(effects);
                }
            }
        }

        if !requested {
            requested = stream.retry_window_gaps(effects);
        }
        requested
    }

    /// Fractional index and visible count for the current frame.
    pub fn read_position(&self, stream: &PostStream, geometry: &Geometry) -> ReadPosition {
        let top = geometry.viewport_top();
        let height = geometry.visible_height();
        let mut index = geometry
            .items
            .iter()
            .find_map(|item| item.index)
            .unwrap_or(stream.visible_start()) as f64;
        let mut visible = 0.0_f64;
        let mut period = None;

        for item in &geometry.items {
            if item.bottom() < top {
                continue;
            }
            if item.top > top + height {
                break;
            }
            let Some(offset) = item.index else {
                continue;
            };
            if item.height <= 0.0 {
                continue;
            }
            let visible_top = (top - item.top).max(0.0);
            let visible_bottom = item.height.min(top + height - item.top);
            if item.top <= top {
                index = offset as f64 + f64::from(visible_top / item.height);
            }
            let visible_part = visible_bottom - visible_top;
            if visible_part > 0.0 {
                visible += f64::from(visible_part / item.height);
            }
            if item.time.is_some() {
                period = item.time;
            }
        }

        ReadPosition {
            index: index + 1.0,
            visible,
            period,
        }
    }

    /// Start and end post numbers currently in view.
    pub fn calculate_position(&self, geometry: &Geometry) -> Option<(u64, u64)> {
        let top = geometry.viewport_top();
        let bottom = geometry.viewport_bottom();
        let viewport = geometry.visible_height();
        let mut start = None;
        let mut end = None;

        for item in geometry.items.iter().filter(|item| item.is_numbered()) {
            if item.bottom() <= top {
                continue;
            }
            if item.top >= bottom {
                break;
            }
            let Some(number) = item.number else {
                continue;
            };
            if start.is_none() && item.height > 0.0 {
                let scrolled_past = (top - item.top).max(0.0);
                let past_fraction = scrolled_past / item.height;
                let cover = if viewport > 0.0 {
                    (item.height - scrolled_past) / viewport
                } else {
                    0.0
                };
                if past_fraction < self.start_scrolled_past_max
                    || cover > self.start_viewport_cover_min
                {
                    start = Some(number);
                }
            }
            end = Some(number);
        }

        let end = end?;
        Some((start.unwrap_or(end), end))
    }

    /// Restart the trailing debounce for position reports.
    pub fn schedule_position_update(&mut self, now: Instant) {
        if self.attached {
            self.deadline = Some(now + self.debounce);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Emit a position report if the debounce window elapsed. Unchanged
    /// positions are not reported twice.
    pub fn poll(
        &mut self,
        geometry: &Geometry,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) -> Option<(u64, u64)> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.deadline = None,
            _ => return None,
        }
        self.report_position(geometry, effects)
    }

    /// Emit a position report now, bypassing the debounce.
    pub fn report_position(
        &mut self,
        geometry: &Geometry,
        effects: &mut Vec<Effect>,
    ) -> Option<(u64, u64)> {
        let position = self.calculate_position(geometry)?;
        if self.last_reported == Some(position) {
            trace!(?position, "Position unchanged");
            return None;
        }
        self.last_reported = Some(position);
        let (start, end) = position;
        debug!(start, end, "Position changed");
        effects.push(Effect::PositionChanged { start, end });
        Some(position)
    }
}
