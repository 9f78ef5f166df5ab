use iced::widget::scrollable::Id as ScrollId;
use once_cell::sync::Lazy;

/// Fixed chrome around the stream. Items are rendered at exactly their
/// estimated heights, so these values double as geometry inputs.
pub(crate) const OUTER_PADDING_PX: f32 = 12.0;
pub(crate) const COLUMN_SPACING_PX: f32 = 12.0;
pub(crate) const HEADER_HEIGHT_PX: f32 = 56.0;
pub(crate) const COMPOSER_HEIGHT_PX: f32 = 72.0;
pub(crate) const SCRUBBER_WIDTH_PX: f32 = 170.0;
pub(crate) const SCRUBBER_BUTTON_HEIGHT_PX: f32 = 36.0;
pub(crate) const SCRUBBER_INFO_HEIGHT_PX: f32 = 78.0;
pub(crate) const SCRUBBER_CHROME_PX: f32 =
    2.0 * SCRUBBER_BUTTON_HEIGHT_PX + SCRUBBER_INFO_HEIGHT_PX;
pub(crate) const SCROLLBAR_ALLOWANCE_PX: f32 = 12.0;
pub(crate) const STREAM_PADDING_X_PX: f32 = 24.0;

pub(crate) const POST_PADDING_PX: f32 = 12.0;
pub(crate) const POST_META_HEIGHT_PX: f32 = 22.0;
pub(crate) const POST_META_FONT_SIZE_PX: f32 = 13.0;
pub(crate) const BODY_LINE_HEIGHT: f32 = 1.4;
pub(crate) const GLYPH_WIDTH_RATIO: f32 = 0.55;
pub(crate) const EVENT_HEIGHT_PX: f32 = 44.0;
pub(crate) const PLACEHOLDER_HEIGHT_PX: f32 = 96.0;
pub(crate) const TIME_GAP_HEIGHT_PX: f32 = 36.0;
pub(crate) const REPLY_HEIGHT_PX: f32 = 96.0;

pub(crate) const TICK_INTERVAL_MS: u64 = 16;
pub(crate) const SIGNAL_POLL_INTERVAL_MS: u64 = 200;
/// Upper bound on back-to-back settle passes after one message.
pub(crate) const MAX_RENDER_PASSES: usize = 4;

pub(crate) static STREAM_SCROLL_ID: Lazy<ScrollId> = Lazy::new(|| ScrollId::new("post-stream"));
