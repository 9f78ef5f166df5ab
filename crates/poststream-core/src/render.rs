//! Stream renderer glue.
//!
//! [`StreamView`] owns one discussion's [`PostStream`] together with its
//! [`ViewportTracker`] and [`ScrubberMapper`], materializes the window into
//! [`StreamItem`]s and resolves navigation targets into scroll offsets. The
//! host calls [`StreamView::after_render`] with fresh geometry after every
//! render; navigation settles there once both the scroll animation and the
//! navigation load are done.

use crate::config::StreamConfig;
use crate::content::{ContentRegistry, PostKind};
use crate::discussion::DiscussionMeta;
use crate::effect::{Effect, FlashTarget};
use crate::geometry::{Geometry, ItemGeometry};
use crate::loader::{LoadError, Page, PageTicket};
use crate::post::{Post, PostId};
use crate::scrubber::ScrubberLayout;
use crate::scrubber::ScrubberMapper;
use crate::stream::{LoadOutcome, NavigationTarget, NavigationTicket, PostStream, ScrollRequest};
use crate::tracker::ViewportTracker;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, info};

/// "Time elapsed" separator between two loaded posts.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGap {
    /// Sequence offset of the post the separator precedes.
    pub before: usize,
    pub elapsed: chrono::Duration,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem<'a> {
    Post {
        index: usize,
        post: &'a Post,
        /// `None` when the content type is not registered.
        kind: Option<PostKind>,
    },
    Placeholder {
        index: usize,
        id: Option<PostId>,
    },
    TimeGap(TimeGap),
    Reply {
        index: usize,
    },
}

/// Separator for two consecutive post timestamps, if they are further
/// apart than `threshold`.
pub fn time_gap(
    previous: DateTime<Utc>,
    next: DateTime<Utc>,
    before: usize,
    threshold: chrono::Duration,
) -> Option<TimeGap> {
    let elapsed = next.signed_duration_since(previous);
    (elapsed > threshold).then(|| TimeGap {
        before,
        elapsed,
        label: format!("{} later", humanize(elapsed)),
    })
}

fn humanize(elapsed: chrono::Duration) -> String {
    let days = elapsed.num_days();
    if days < 1 {
        return "a few hours".to_string();
    }
    if days == 1 {
        return "a day".to_string();
    }
    if days < 26 {
        return format!("{days} days");
    }
    if days < 320 {
        let months = ((days as f64) / 30.44).round().max(1.0) as i64;
        return if months == 1 {
            "a month".to_string()
        } else {
            format!("{months} months")
        };
    }
    let years = ((days as f64) / 365.25).round().max(1.0) as i64;
    if years == 1 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

/// Materialize the window in order: loaded posts, loading placeholders,
/// time-gap separators and, at the end, the reply slot.
pub fn materialize<'a>(
    stream: &'a PostStream,
    registry: &ContentRegistry,
    gap_threshold: chrono::Duration,
) -> Vec<StreamItem<'a>> {
    let slots = stream.window_slots();
    let mut items = Vec::with_capacity(slots.len() + 1);
    let mut last_time: Option<DateTime<Utc>> = None;

    for (i, post) in stream.posts().into_iter().enumerate() {
        let index = stream.visible_start() + i;
        match post {
            Some(post) => {
                if let Some(gap) = last_time
                    .and_then(|previous| time_gap(previous, post.created_at, index, gap_threshold))
                {
                    items.push(StreamItem::TimeGap(gap));
                }
                last_time = Some(post.created_at);
                items.push(StreamItem::Post {
                    index,
                    post,
                    kind: registry.resolve(&post.content_type),
                });
            }
            None => items.push(StreamItem::Placeholder {
                index,
                id: slots.get(i).copied().flatten(),
            }),
        }
    }

    if stream.viewing_end() && stream.discussion().can_reply() {
        items.push(StreamItem::Reply {
            index: stream.count(),
        });
    }
    items
}

#[derive(Debug, Default)]
struct FlashState {
    active: Option<FlashTarget>,
}

impl FlashState {
    /// Re-flashing the active target while it is still showing is a no-op.
    fn start(&mut self, target: FlashTarget, effects: &mut Vec<Effect>) {
        if self.active == Some(target) {
            return;
        }
        self.active = Some(target);
        effects.push(Effect::Flash(target));
    }

    fn finish(&mut self, target: FlashTarget) -> bool {
        if self.active == Some(target) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingScroll {
    target: NavigationTarget,
    highlight: bool,
    animating: bool,
}

pub struct StreamView {
    stream: PostStream,
    tracker: ViewportTracker,
    scrubber: ScrubberMapper,
    registry: ContentRegistry,
    config: StreamConfig,
    mounted: bool,
    pending: Option<PendingScroll>,
    flash: FlashState,
    last_geometry: Option<Geometry>,
    prepend_anchor: Option<(usize, f32)>,
}

impl StreamView {
    pub fn new(stream: PostStream, registry: ContentRegistry, config: &StreamConfig) -> Self {
        Self {
            tracker: ViewportTracker::new(config),
            scrubber: ScrubberMapper::new(config),
            stream,
            registry,
            config: config.clone(),
            mounted: false,
            pending: None,
            flash: FlashState::default(),
            last_geometry: None,
            prepend_anchor: None,
        }
    }

    pub fn stream(&self) -> &PostStream {
        &self.stream
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn scrubber_layout(&self) -> Option<&ScrubberLayout> {
        self.scrubber.layout()
    }

    pub fn flash(&self) -> Option<FlashTarget> {
        self.flash.active
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }

    pub fn items(&self) -> Vec<StreamItem<'_>> {
        materialize(&self.stream, &self.registry, self.config.time_gap())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tracker.next_deadline()
    }

    /// Attach listeners and run the initial scroll pass.
    pub fn mount(&mut self, geometry: &Geometry, now: Instant, effects: &mut Vec<Effect>) {
        self.tracker.attach();
        self.scrubber.attach();
        self.mounted = true;
        info!(
            discussion = %self.stream.discussion().id,
            count = self.stream.count(),
            "Stream view mounted"
        );
        self.on_scroll(geometry, now, effects);
    }

    pub fn unmount(&mut self) {
        self.tracker.detach();
        self.scrubber.detach();
        self.mounted = false;
        self.pending = None;
        self.last_geometry = None;
        self.prepend_anchor = None;
        info!(discussion = %self.stream.discussion().id, "Stream view unmounted");
    }

    /// Scroll event. Edge loads always run; read-position work is skipped
    /// while a programmatic scroll is in progress.
    pub fn on_scroll(&mut self, geometry: &Geometry, now: Instant, effects: &mut Vec<Effect>) {
        if !self.mounted {
            return;
        }
        self.scrubber.set_track_height(geometry.track_height);
        self.tracker
            .load_posts_if_needed(&mut self.stream, geometry, effects);
        if !self.stream.paused() {
            self.update_scrubber(geometry, false);
            self.tracker.schedule_position_update(now);
        }
        self.last_geometry = Some(geometry.clone());
    }

    /// Fire the debounced position report when due.
    pub fn poll(&mut self, geometry: &Geometry, now: Instant, effects: &mut Vec<Effect>) {
        if self.stream.paused() {
            return;
        }
        if let Some((_, end)) = self.tracker.poll(geometry, now, effects) {
            self.advance_read(end, effects);
        }
    }

    /// Called after each render with geometry of what was drawn.
    pub fn after_render(&mut self, geometry: &Geometry, effects: &mut Vec<Effect>) {
        if !self.mounted {
            return;
        }
        self.scrubber.set_track_height(geometry.track_height);
        let mut frame = geometry.clone();

        if let Some((index, relative_top)) = self.prepend_anchor.take() {
            if let Some(item) = frame.item_at_index(index) {
                let offset = frame.clamp_scroll(item.top - relative_top);
                if (offset - frame.scroll_top).abs() > 0.5 {
                    debug!(index, offset, "Keeping viewport anchored after prepend");
                    effects.push(Effect::ScrollTo {
                        offset,
                        animate: false,
                    });
                    frame = frame.scrolled_to(offset);
                }
            }
        }

        if let Some(request) = self.stream.take_scroll_request() {
            self.scroll_to_target(request, &frame, effects);
        }
        self.try_settle(&frame, effects);

        if !self.stream.paused() && self.stream.take_force_update_scrubber() {
            self.update_scrubber(&frame, true);
        }
        self.last_geometry = Some(frame);
    }

    /// The host's scroll animation reached its target.
    pub fn scroll_animation_finished(&mut self) -> bool {
        match self.pending.as_mut() {
            Some(pending) if pending.animating => {
                pending.animating = false;
                true
            }
            _ => false,
        }
    }

    pub fn page_loaded(
        &mut self,
        ticket: PageTicket,
        result: Result<Page, LoadError>,
    ) -> Result<LoadOutcome, LoadError> {
        let start = self.stream.visible_start();
        let outcome = self.stream.page_loaded(ticket, result)?;
        if outcome == LoadOutcome::Extended && self.stream.visible_start() < start {
            self.prepend_anchor = self.last_geometry.as_ref().and_then(|geometry| {
                geometry
                    .item_at_index(start)
                    .map(|item| (start, item.top - geometry.scroll_top))
            });
        }
        Ok(outcome)
    }

    pub fn flash_finished(&mut self, target: FlashTarget) -> bool {
        self.flash.finish(target)
    }

    pub fn sync_discussion(&mut self, meta: DiscussionMeta, effects: &mut Vec<Effect>) {
        self.stream.sync_discussion(meta, effects);
        self.stream.request_scrubber_refresh();
    }

    pub fn go_to_first(&mut self, effects: &mut Vec<Effect>) -> NavigationTicket {
        self.stream.go_to_first(effects)
    }

    pub fn go_to_last(&mut self, effects: &mut Vec<Effect>) -> NavigationTicket {
        self.stream.go_to_last(effects)
    }

    pub fn go_to_reply(&mut self, effects: &mut Vec<Effect>) -> NavigationTicket {
        self.stream.go_to_reply(effects)
    }

    pub fn go_to_number(
        &mut self,
        number: u64,
        highlight: bool,
        effects: &mut Vec<Effect>,
    ) -> NavigationTicket {
        self.stream.go_to_number(number, highlight, effects)
    }

    pub fn go_to_index(
        &mut self,
        index: f64,
        animate: bool,
        reply: bool,
        effects: &mut Vec<Effect>,
    ) -> NavigationTicket {
        self.stream.go_to_index(index, animate, reply, effects)
    }

    pub fn load_next(&mut self, effects: &mut Vec<Effect>) -> bool {
        self.stream.load_next(effects)
    }

    pub fn load_previous(&mut self, effects: &mut Vec<Effect>) -> bool {
        self.stream.load_previous(effects)
    }

    pub fn scrubber_press(&mut self, pointer_y: f32) -> bool {
        self.scrubber.press(&self.stream, pointer_y)
    }

    pub fn scrubber_drag(&mut self, pointer_y: f32) -> Option<f64> {
        let index = self.scrubber.drag_to(&mut self.stream, pointer_y)?;
        self.scrubber.update(&self.stream, false);
        Some(index)
    }

    pub fn scrubber_release(&mut self, effects: &mut Vec<Effect>) -> Option<NavigationTicket> {
        self.scrubber.release(&mut self.stream, effects)
    }

    pub fn scrubber_click(
        &mut self,
        pointer_y: f32,
        effects: &mut Vec<Effect>,
    ) -> Option<NavigationTicket> {
        self.scrubber.click(&mut self.stream, pointer_y, effects)
    }

    /// Offset of the post after (`step > 0`) or before the one at the top of
    /// the viewport, for keyboard navigation.
    pub fn step_index(&self, step: i64) -> f64 {
        let current = (self.stream.index() - 1.0).floor().max(0.0);
        current + step as f64
    }

    fn update_scrubber(&mut self, geometry: &Geometry, animate: bool) {
        let position = self.tracker.read_position(&self.stream, geometry);
        self.stream
            .update_read_position(position.index, position.visible, position.description());
        self.scrubber.update(&self.stream, animate);
    }

    fn advance_read(&mut self, end: u64, effects: &mut Vec<Effect>) {
        if let Some(last_read_post_number) = self.stream.mark_read(end) {
            info!(last_read_post_number, "Read watermark advanced");
            effects.push(Effect::ReadAdvanced {
                last_read_post_number,
            });
        }
    }

    fn locate<'g>(&self, target: NavigationTarget, geometry: &'g Geometry) -> Option<&'g ItemGeometry> {
        match target {
            NavigationTarget::Number { number } => geometry.item_for_number(number),
            NavigationTarget::Index { index, reply: true } => geometry
                .reply_item()
                .or_else(|| geometry.item_at_index(index.saturating_sub(1))),
            NavigationTarget::Index { index, .. } => geometry.item_at_index(index),
        }
    }

    fn target_offset(&self, item: &ItemGeometry, geometry: &Geometry, reply: bool) -> f32 {
        let offset = if reply {
            item.bottom() - geometry.viewport_height + geometry.composer_height
        } else if item.index == Some(0) {
            0.0
        } else {
            item.top - geometry.margin_top
        };
        geometry.clamp_scroll(offset)
    }

    fn scroll_to_target(
        &mut self,
        request: ScrollRequest,
        geometry: &Geometry,
        effects: &mut Vec<Effect>,
    ) {
        let (force, reply) = match request.target {
            NavigationTarget::Number { .. } => (false, false),
            NavigationTarget::Index { reply, .. } => (true, reply),
        };
        let item = self.locate(request.target, geometry);
        let offset = item
            .filter(|item| force || !geometry.fully_visible(item))
            .map(|item| self.target_offset(item, geometry, reply));
        let item_index = item.and_then(|item| item.index);

        let projected = offset.map_or_else(|| geometry.clone(), |offset| geometry.scrolled_to(offset));
        let position = self.tracker.read_position(&self.stream, &projected);
        self.stream
            .update_read_position(position.index, position.visible, position.description());
        if let Some(index) = item_index {
            self.stream.focus_index(index);
        }
        self.scrubber.update(&self.stream, request.animate);
        self.stream.request_scrubber_refresh();

        let mut animating = false;
        if let Some(offset) = offset {
            if (offset - geometry.scroll_top).abs() > 0.5 {
                animating = request.animate;
                effects.push(Effect::ScrollTo {
                    offset,
                    animate: request.animate,
                });
            }
        }
        debug!(
            target = ?request.target,
            ?offset,
            found = item_index.is_some(),
            animating,
            "Scrolling to navigation target"
        );

        if reply {
            self.flash.start(FlashTarget::Reply, effects);
        }
        self.pending = Some(PendingScroll {
            target: request.target,
            highlight: request.highlight,
            animating,
        });
    }

    fn try_settle(&mut self, geometry: &Geometry, effects: &mut Vec<Effect>) {
        match self.pending {
            Some(pending) if !pending.animating && !self.stream.navigation_pending() => {}
            _ => return,
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        let reply = matches!(pending.target, NavigationTarget::Index { reply: true, .. });
        let item = self.locate(pending.target, geometry);
        let correction = item.map(|item| self.target_offset(item, geometry, reply));
        let item_index = item.and_then(|item| item.index);
        let settled = match correction {
            Some(offset) => {
                if (offset - geometry.scroll_top).abs() > 0.5 {
                    effects.push(Effect::ScrollTo {
                        offset,
                        animate: false,
                    });
                }
                geometry.scrolled_to(offset)
            }
            None => geometry.clone(),
        };

        let position = self.tracker.read_position(&self.stream, &settled);
        self.stream
            .update_read_position(position.index, position.visible, position.description());
        if let Some(index) = item_index {
            self.stream.focus_index(index);
        }
        self.scrubber.update(&self.stream, true);
        self.stream.take_force_update_scrubber();

        if let Some((_, end)) = self.tracker.report_position(&settled, effects) {
            self.advance_read(end, effects);
        }

        let tickets = self.stream.finish_navigation();
        info!(
            target = ?pending.target,
            tickets = tickets.len(),
            index = self.stream.index(),
            "Navigation settled"
        );
        effects.extend(tickets.into_iter().map(Effect::NavigationSettled));

        if let NavigationTarget::Number { number } = pending.target {
            if pending.highlight && item.is_some() {
                self.flash.start(FlashTarget::Number(number), effects);
            }
        }

        self.tracker
            .load_posts_if_needed(&mut self.stream, &settled, effects);
        self.last_geometry = Some(settled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::{DiscussionId, DiscussionMeta};
    use crate::geometry::{GeometryBuilder, ItemKind};
    use crate::post::test_post;
    use crate::stream::tests::{page, requests, stream};

    fn stream_view(count: u64, start: usize, end: usize) -> StreamView {
        StreamView::new(
            stream(count, start, end),
            ContentRegistry::with_defaults(),
            &StreamConfig::default(),
        )
    }

    fn frame(view: &StreamView, scroll_top: f32) -> Geometry {
        let mut builder = GeometryBuilder::new();
        for item in view.items() {
            match item {
                StreamItem::Post { index, post, .. } => builder.push(
                    ItemKind::Post,
                    Some(index),
                    Some(post.number),
                    Some(post.created_at),
                    100.0,
                ),
                StreamItem::Placeholder { index, .. } => {
                    builder.push(ItemKind::Placeholder, Some(index), None, None, 100.0)
                }
                StreamItem::TimeGap(_) => builder.push(ItemKind::TimeGap, None, None, None, 30.0),
                StreamItem::Reply { index } => {
                    builder.push(ItemKind::Reply, Some(index), None, None, 80.0)
                }
            };
        }
        let mut geometry = builder.finish(scroll_top, 600.0, 0.0);
        geometry.track_height = 500.0;
        geometry
    }

    #[test]
    fn unmounted_view_ignores_scroll_and_render_events() {
        let mut view = stream_view(100, 0, 20);
        let now = Instant::now();
        let mut effects = Vec::new();
        view.mount(&frame(&view, 0.0), now, &mut effects);
        assert!(view.is_mounted());
        assert!(view.next_deadline().is_some());

        view.unmount();
        assert!(!view.is_mounted());
        assert_eq!(view.next_deadline(), None);

        effects.clear();
        let near_bottom = frame(&view, 1400.0);
        view.on_scroll(&near_bottom, now, &mut effects);
        view.after_render(&near_bottom, &mut effects);
        view.poll(&near_bottom, now + std::time::Duration::from_secs(1), &mut effects);
        assert!(effects.is_empty());
        assert_eq!(view.stream().pages_loading(), 0);
        assert!(!view.scrubber_press(10.0));
    }

    fn gap_count(items: &[StreamItem<'_>]) -> usize {
        items
            .iter()
            .filter(|item| matches!(item, StreamItem::TimeGap(_)))
            .count()
    }

    fn timed_stream(hours: &[i64]) -> PostStream {
        let count = hours.len() as u64;
        let meta = DiscussionMeta {
            id: DiscussionId(3),
            title: "Gaps".to_string(),
            post_ids: (1..=count).map(|id| Some(PostId(id))).collect(),
            last_post_number: count,
            last_read_post_number: 0,
            can_reply: false,
        };
        let posts = hours
            .iter()
            .enumerate()
            .map(|(i, hours)| test_post(i as u64 + 1, i as u64 + 1, *hours))
            .collect();
        PostStream::new(meta, Page { offset: 0, posts }, &StreamConfig::default())
    }

    #[test]
    fn five_day_gap_gets_one_separator() {
        let stream = timed_stream(&[0, 120, 123]);
        let items = materialize(
            &stream,
            &ContentRegistry::with_defaults(),
            chrono::Duration::days(4),
        );
        assert_eq!(gap_count(&items), 1);
        assert!(matches!(&items[1], StreamItem::TimeGap(gap) if gap.before == 1 && gap.label == "5 days later"));
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn hours_apart_get_no_separator() {
        let stream = timed_stream(&[0, 3, 6]);
        let items = materialize(
            &stream,
            &ContentRegistry::with_defaults(),
            chrono::Duration::days(4),
        );
        assert_eq!(gap_count(&items), 0);
    }

    #[test]
    fn placeholders_do_not_reset_gap_clock() {
        let meta = DiscussionMeta {
            id: DiscussionId(3),
            title: "Sparse".to_string(),
            post_ids: (1..=3).map(|id| Some(PostId(id))).collect(),
            last_post_number: 3,
            last_read_post_number: 0,
            can_reply: false,
        };
        let first = Page {
            offset: 0,
            posts: vec![test_post(1, 1, 0)],
        };
        let mut stream = PostStream::new(meta, first, &StreamConfig::default());
        let mut effects = Vec::new();
        stream.load_next(&mut effects);
        let ticket = requests(&effects)[0].ticket;
        let last = Page {
            offset: 2,
            posts: vec![test_post(3, 3, 120)],
        };
        stream.page_loaded(ticket, Ok(last)).expect("page");

        let items = materialize(
            &stream,
            &ContentRegistry::with_defaults(),
            chrono::Duration::days(4),
        );
        assert!(matches!(items[1], StreamItem::Placeholder { index: 1, .. }));
        assert!(matches!(&items[2], StreamItem::TimeGap(gap) if gap.before == 2));
    }

    #[test]
    fn gap_labels_scale_with_elapsed_time() {
        let base = DateTime::<Utc>::from_timestamp(0, 0).expect("epoch");
        let label = |days: i64| {
            time_gap(base, base + chrono::Duration::days(days), 0, chrono::Duration::days(4))
                .map(|gap| gap.label)
        };
        assert_eq!(label(4), None);
        assert_eq!(label(9).as_deref(), Some("9 days later"));
        assert_eq!(label(31).as_deref(), Some("a month later"));
        assert_eq!(label(800).as_deref(), Some("2 years later"));
    }

    #[test]
    fn reply_slot_only_at_end() {
        let view = stream_view(30, 0, 20);
        assert!(!view.items().iter().any(|item| matches!(item, StreamItem::Reply { .. })));
        let view = stream_view(20, 0, 20);
        assert!(matches!(view.items().last(), Some(StreamItem::Reply { index: 20 })));
    }

    #[test]
    fn go_to_number_scrolls_and_settles_after_load() {
        let mut view = stream_view(100, 0, 20);
        let start = Instant::now();
        let mut effects = Vec::new();
        view.mount(&frame(&view, 0.0), start, &mut effects);
        assert!(effects.is_empty());

        let ticket = view.go_to_number(42, true, &mut effects);
        let request = requests(&effects)[0].clone();
        view.after_render(&frame(&view, 0.0), &mut effects);
        assert!(!effects.iter().any(|e| matches!(e, Effect::ScrollTo { .. })));

        view.page_loaded(request.ticket, Ok(page(31, 51)))
            .expect("page loads");
        effects.clear();
        view.after_render(&frame(&view, 0.0), &mut effects);
        assert_eq!(
            effects,
            vec![Effect::ScrollTo {
                offset: 1000.0,
                animate: true
            }]
        );
        assert!(view.is_settling());

        assert!(view.scroll_animation_finished());
        effects.clear();
        view.after_render(&frame(&view, 1000.0), &mut effects);
        assert!(effects.contains(&Effect::NavigationSettled(ticket)));
        assert!(effects.contains(&Effect::Flash(FlashTarget::Number(42))));
        assert!(effects.contains(&Effect::PositionChanged { start: 42, end: 47 }));
        assert!(effects.contains(&Effect::ReadAdvanced {
            last_read_post_number: 47
        }));
        assert!(!view.stream().paused());
        assert!(view.stream().visible_start() <= 41 && 41 < view.stream().visible_end());
        assert_eq!(view.stream().index(), 42.0);
    }

    #[test]
    fn reply_navigation_flashes_immediately() {
        let mut view = stream_view(100, 0, 20);
        let mut effects = Vec::new();
        view.mount(&frame(&view, 0.0), Instant::now(), &mut effects);

        view.go_to_reply(&mut effects);
        view.after_render(&frame(&view, 0.0), &mut effects);
        assert!(effects.contains(&Effect::Flash(FlashTarget::Reply)));
        assert!(effects.contains(&Effect::ScrollTo {
            offset: 1480.0,
            animate: true
        }));
        assert!(!effects.iter().any(|e| matches!(e, Effect::NavigationSettled(_))));
    }

    #[test]
    fn flash_is_idempotent_until_cleared() {
        let mut flash = FlashState::default();
        let mut effects = Vec::new();
        flash.start(FlashTarget::Number(7), &mut effects);
        flash.start(FlashTarget::Number(7), &mut effects);
        assert_eq!(effects.len(), 1);
        assert!(!flash.finish(FlashTarget::Reply));
        assert!(flash.finish(FlashTarget::Number(7)));
        flash.start(FlashTarget::Number(7), &mut effects);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn prepended_page_keeps_viewport_anchored() {
        let mut view = stream_view(100, 40, 60);
        let now = Instant::now();
        let mut effects = Vec::new();
        view.mount(&frame(&view, 500.0), now, &mut effects);
        assert!(effects.is_empty());

        view.on_scroll(&frame(&view, 100.0), now, &mut effects);
        let request = requests(&effects)[0].clone();
        effects.clear();

        let outcome = view.page_loaded(request.ticket, Ok(page(20, 40)));
        assert_eq!(outcome, Ok(LoadOutcome::Extended));
        view.after_render(&frame(&view, 100.0), &mut effects);
        assert_eq!(
            effects,
            vec![Effect::ScrollTo {
                offset: 2100.0,
                animate: false
            }]
        );
    }

    #[test]
    fn paused_stream_ignores_passive_scroll() {
        let mut view = stream_view(100, 0, 20);
        let now = Instant::now();
        let mut effects = Vec::new();
        view.mount(&frame(&view, 0.0), now, &mut effects);

        let deadline = view.next_deadline();
        assert!(deadline.is_some());

        view.go_to_index(50.0, true, false, &mut effects);
        assert_eq!(view.stream().index(), 51.0);
        view.on_scroll(
            &frame(&view, 0.0),
            now + std::time::Duration::from_millis(50),
            &mut effects,
        );
        assert_eq!(view.stream().index(), 51.0);
        assert_eq!(view.next_deadline(), deadline);
    }

    #[test]
    fn never_mounted_view_ignores_events() {
        let mut view = stream_view(100, 0, 20);
        let mut effects = Vec::new();
        view.on_scroll(&frame(&view, 1500.0), Instant::now(), &mut effects);
        assert!(effects.is_empty());
        assert!(view.scrubber_layout().is_none());
    }
}
