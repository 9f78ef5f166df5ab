//! Tuning knobs for the stream engine.
//!
//! Deserializable from the `[stream]` table of the host's TOML config. Every
//! field is optional; [`StreamConfig::clamped`] keeps values in a usable range
//! regardless of where they came from.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Posts requested per load-more page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Distance from a viewport edge at which the next page is requested.
    #[serde(default = "default_lookahead_px")]
    pub lookahead_px: f32,
    #[serde(default = "default_position_debounce_ms")]
    pub position_debounce_ms: u64,
    /// Smallest scrubber handle, in track pixels.
    #[serde(default = "default_min_handle_px")]
    pub min_handle_px: f32,
    /// Start-number heuristic: an item counts as the start while less than
    /// this fraction of it is scrolled past...
    #[serde(default = "default_start_scrolled_past_max")]
    pub start_scrolled_past_max: f32,
    /// ...or while its remaining height covers more than this fraction of
    /// the viewport.
    #[serde(default = "default_start_viewport_cover_min")]
    pub start_viewport_cover_min: f32,
    #[serde(default = "default_time_gap_days")]
    pub time_gap_days: i64,
    #[serde(default = "default_concurrent_load_delay_ms")]
    pub concurrent_load_delay_ms: u64,
    #[serde(default = "default_scroll_animation_ms")]
    pub scroll_animation_ms: u64,
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            page_size: default_page_size(),
            lookahead_px: default_lookahead_px(),
            position_debounce_ms: default_position_debounce_ms(),
            min_handle_px: default_min_handle_px(),
            start_scrolled_past_max: default_start_scrolled_past_max(),
            start_viewport_cover_min: default_start_viewport_cover_min(),
            time_gap_days: default_time_gap_days(),
            concurrent_load_delay_ms: default_concurrent_load_delay_ms(),
            scroll_animation_ms: default_scroll_animation_ms(),
            flash_duration_ms: default_flash_duration_ms(),
        }
    }
}

impl StreamConfig {
    pub fn clamped(mut self) -> Self {
        self.page_size = self.page_size.clamp(1, 500);
        self.lookahead_px = finite_or(self.lookahead_px, default_lookahead_px()).clamp(0.0, 10_000.0);
        self.position_debounce_ms = self.position_debounce_ms.min(5_000);
        self.min_handle_px = finite_or(self.min_handle_px, default_min_handle_px()).clamp(0.0, 500.0);
        self.start_scrolled_past_max =
            finite_or(self.start_scrolled_past_max, default_start_scrolled_past_max()).clamp(0.0, 1.0);
        self.start_viewport_cover_min =
            finite_or(self.start_viewport_cover_min, default_start_viewport_cover_min())
                .clamp(0.0, 1.0);
        self.time_gap_days = self.time_gap_days.clamp(0, 3650);
        self.concurrent_load_delay_ms = self.concurrent_load_delay_ms.min(60_000);
        self.scroll_animation_ms = self.scroll_animation_ms.min(5_000);
        self.flash_duration_ms = self.flash_duration_ms.min(10_000);
        self
    }

    pub fn position_debounce(&self) -> Duration {
        Duration::from_millis(self.position_debounce_ms)
    }

    pub fn concurrent_load_delay(&self) -> Duration {
        Duration::from_millis(self.concurrent_load_delay_ms)
    }

    pub fn scroll_animation(&self) -> Duration {
        Duration::from_millis(self.scroll_animation_ms)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }

    pub fn time_gap(&self) -> chrono::Duration {
        chrono::Duration::days(self.time_gap_days)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

fn default_page_size() -> usize {
    20
}

fn default_lookahead_px() -> f32 {
    300.0
}

fn default_position_debounce_ms() -> u64 {
    100
}

fn default_min_handle_px() -> f32 {
    50.0
}

fn default_start_scrolled_past_max() -> f32 {
    0.75
}

fn default_start_viewport_cover_min() -> f32 {
    0.25
}

fn default_time_gap_days() -> i64 {
    4
}

fn default_concurrent_load_delay_ms() -> u64 {
    1000
}

fn default_scroll_animation_ms() -> u64 {
    200
}

fn default_flash_duration_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_table_keeps_defaults() {
        let config: StreamConfig = toml::from_str("page_size = 5\nlookahead_px = 120.0\n")
            .expect("stream config toml");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.lookahead_px, 120.0);
        assert_eq!(config.min_handle_px, 50.0);
        assert_eq!(config.time_gap_days, 4);
    }

    #[test]
    fn clamping_repairs_out_of_range_values() {
        let config = StreamConfig {
            page_size: 0,
            lookahead_px: f32::NAN,
            start_scrolled_past_max: 4.0,
            ..StreamConfig::default()
        }
        .clamped();
        assert_eq!(config.page_size, 1);
        assert_eq!(config.lookahead_px, 300.0);
        assert_eq!(config.start_scrolled_past_max, 1.0);
    }
}
