//! Item height estimation and geometry assembly.
//!
//! The view renders every stream item inside a fixed-height clipped
//! container using the same numbers, so the geometry handed to the engine
//! matches what is on screen without a measurement pass.

use super::constants::*;
use poststream_core::{Geometry, GeometryBuilder, ItemKind, StreamItem};

/// Width available to post body text for a given scroll viewport width.
pub(crate) fn text_width(viewport_width: f32) -> f32 {
    (viewport_width - SCROLLBAR_ALLOWANCE_PX - 2.0 * STREAM_PADDING_X_PX - 2.0 * POST_PADDING_PX)
        .max(80.0)
}

pub(crate) fn body_lines(text: &str, width: f32, font_size: u32) -> usize {
    let glyph = (font_size as f32 * GLYPH_WIDTH_RATIO).max(1.0);
    let per_line = ((width / glyph).floor() as usize).max(8);
    text.split('\n')
        .map(|paragraph| paragraph.chars().count().div_ceil(per_line).max(1))
        .sum()
}

pub(crate) fn item_height(item: &StreamItem<'_>, viewport_width: f32, font_size: u32) -> f32 {
    match item {
        StreamItem::Post { post, kind, .. } => match kind {
            Some(kind) if kind.is_event() => EVENT_HEIGHT_PX,
            Some(_) => {
                let lines = body_lines(&post.content, text_width(viewport_width), font_size);
                2.0 * POST_PADDING_PX
                    + POST_META_HEIGHT_PX
                    + lines as f32 * font_size as f32 * BODY_LINE_HEIGHT
            }
            None => 2.0 * POST_PADDING_PX + POST_META_HEIGHT_PX,
        },
        StreamItem::Placeholder { .. } => PLACEHOLDER_HEIGHT_PX,
        StreamItem::TimeGap(_) => TIME_GAP_HEIGHT_PX,
        StreamItem::Reply { .. } => REPLY_HEIGHT_PX,
    }
}

/// Stack the items between the header spacer and the composer spacer.
pub(crate) fn build_geometry(
    items: &[StreamItem<'_>],
    viewport: ViewportMetrics,
    font_size: u32,
) -> Geometry {
    let mut builder = GeometryBuilder::starting_at(HEADER_HEIGHT_PX);
    for item in items {
        let height = item_height(item, viewport.width, font_size);
        match item {
            StreamItem::Post { index, post, .. } => builder.push(
                ItemKind::Post,
                Some(*index),
                Some(post.number),
                Some(post.created_at),
                height,
            ),
            StreamItem::Placeholder { index, .. } => {
                builder.push(ItemKind::Placeholder, Some(*index), None, None, height)
            }
            StreamItem::TimeGap(_) => builder.push(ItemKind::TimeGap, None, None, None, height),
            StreamItem::Reply { index } => {
                builder.push(ItemKind::Reply, Some(*index), None, None, height)
            }
        };
    }
    builder.gap(COMPOSER_HEIGHT_PX);
    let mut geometry = builder.finish(viewport.scroll_top, viewport.height, HEADER_HEIGHT_PX);
    geometry.track_height = viewport.track_height();
    geometry.composer_height = COMPOSER_HEIGHT_PX;
    geometry
}

/// Scroll viewport measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ViewportMetrics {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) scroll_top: f32,
}

impl ViewportMetrics {
    /// Estimate from the window size until the scrollable reports its bounds.
    pub(crate) fn from_window(width: f32, height: f32) -> Self {
        Self {
            width: (width - 2.0 * OUTER_PADDING_PX - COLUMN_SPACING_PX - SCRUBBER_WIDTH_PX)
                .max(0.0),
            height: (height - 2.0 * OUTER_PADDING_PX).max(0.0),
            scroll_top: 0.0,
        }
    }

    pub(crate) fn track_height(&self) -> f32 {
        (self.height - SCRUBBER_CHROME_PX).max(0.0)
    }
}
