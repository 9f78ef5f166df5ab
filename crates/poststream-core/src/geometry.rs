//! Per-frame geometry snapshot shared by the tracker, the scrubber and the
//! scroll-target resolver.
//!
//! Item `top` values are in content coordinates (0 is the top of the
//! scrollable content, not of the viewport). Nothing here reads a live
//! surface; the host measures once and hands the value object around.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Post,
    Placeholder,
    TimeGap,
    Reply,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemGeometry {
    /// 0-based sequence offset. `None` for time-gap separators.
    pub index: Option<usize>,
    pub number: Option<u64>,
    pub time: Option<DateTime<Utc>>,
    pub kind: ItemKind,
    pub top: f32,
    pub height: f32,
}

impl ItemGeometry {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn is_numbered(&self) -> bool {
        self.number.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub scroll_top: f32,
    /// Height of the scroll container, header included.
    pub viewport_height: f32,
    /// Height of the fixed header occluding the top of the container.
    pub margin_top: f32,
    pub content_height: f32,
    pub track_height: f32,
    pub composer_height: f32,
    pub items: Vec<ItemGeometry>,
}

impl Geometry {
    pub fn viewport_top(&self) -> f32 {
        self.scroll_top + self.margin_top
    }

    pub fn viewport_bottom(&self) -> f32 {
        self.scroll_top + self.viewport_height
    }

    /// Unoccluded viewport height.
    pub fn visible_height(&self) -> f32 {
        (self.viewport_height - self.margin_top).max(0.0)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn clamp_scroll(&self, offset: f32) -> f32 {
        if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            0.0
        }
    }

    pub fn item_at_index(&self, index: usize) -> Option<&ItemGeometry> {
        self.items
            .iter()
            .find(|item| item.index == Some(index) && item.kind != ItemKind::TimeGap)
    }

    pub fn item_for_number(&self, number: u64) -> Option<&ItemGeometry> {
        self.items.iter().find(|item| item.number == Some(number))
    }

    pub fn reply_item(&self) -> Option<&ItemGeometry> {
        self.items.iter().find(|item| item.kind == ItemKind::Reply)
    }

    /// True when the item sits entirely inside the unoccluded viewport.
    pub fn fully_visible(&self, item: &ItemGeometry) -> bool {
        item.top >= self.viewport_top() && item.bottom() <= self.viewport_bottom()
    }

    /// The same frame after scrolling to `offset`.
    pub fn scrolled_to(&self, offset: f32) -> Geometry {
        Geometry {
            scroll_top: self.clamp_scroll(offset),
            ..self.clone()
        }
    }

    /// Replace non-finite or negative measurements with zero.
    pub fn sanitized(mut self) -> Geometry {
        self.scroll_top = non_negative(self.scroll_top);
        self.viewport_height = non_negative(self.viewport_height);
        self.margin_top = non_negative(self.margin_top);
        self.content_height = non_negative(self.content_height);
        self.track_height = non_negative(self.track_height);
        self.composer_height = non_negative(self.composer_height);
        for item in &mut self.items {
            item.top = if item.top.is_finite() { item.top } else { 0.0 };
            item.height = non_negative(item.height);
        }
        self
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Stacks item heights top to bottom into a [`Geometry`].
#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    cursor: f32,
    items: Vec<ItemGeometry>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start stacking below `offset` (e.g. a header spacer).
    pub fn starting_at(offset: f32) -> Self {
        Self {
            cursor: non_negative(offset),
            items: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        kind: ItemKind,
        index: Option<usize>,
        number: Option<u64>,
        time: Option<DateTime<Utc>>,
        height: f32,
    ) -> &mut Self {
        let height = non_negative(height);
        self.items.push(ItemGeometry {
            index,
            number,
            time,
            kind,
            top: self.cursor,
            height,
        });
        self.cursor += height;
        self
    }

    pub fn gap(&mut self, height: f32) -> &mut Self {
        self.cursor += non_negative(height);
        self
    }

    pub fn height(&self) -> f32 {
        self.cursor
    }

    pub fn finish(self, scroll_top: f32, viewport_height: f32, margin_top: f32) -> Geometry {
        Geometry {
            scroll_top,
            viewport_height,
            margin_top,
            content_height: self.cursor,
            track_height: 0.0,
            composer_height: 0.0,
            items: self.items,
        }
        .sanitized()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// `n` numbered posts of `height` each, offsets starting at `first`.
    pub(crate) fn uniform(first: usize, n: usize, height: f32) -> GeometryBuilder {
        let mut builder = GeometryBuilder::new();
        for i in first..first + n {
            builder.push(ItemKind::Post, Some(i), Some(i as u64 + 1), None, height);
        }
        builder
    }

    #[test]
    fn builder_stacks_items() {
        let geometry = uniform(0, 3, 100.0).finish(0.0, 250.0, 0.0);
        assert_eq!(geometry.content_height, 300.0);
        assert_eq!(geometry.items[2].top, 200.0);
        assert_eq!(geometry.max_scroll(), 50.0);
    }

    #[test]
    fn margin_shifts_viewport_top() {
        let geometry = uniform(0, 10, 100.0).finish(200.0, 400.0, 60.0);
        assert_eq!(geometry.viewport_top(), 260.0);
        assert_eq!(geometry.viewport_bottom(), 600.0);
        assert!(!geometry.fully_visible(&geometry.items[2]));
        assert!(geometry.fully_visible(&geometry.items[3]));
    }

    #[test]
    fn sanitizing_zeroes_bad_measurements() {
        let geometry = Geometry {
            scroll_top: f32::NAN,
            viewport_height: -3.0,
            ..Geometry::default()
        }
        .sanitized();
        assert_eq!(geometry.scroll_top, 0.0);
        assert_eq!(geometry.viewport_height, 0.0);
        assert_eq!(geometry.clamp_scroll(f32::INFINITY), 0.0);
    }
}
