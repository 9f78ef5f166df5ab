//! Window store for one discussion.
//!
//! Owns the materialized window `[visible_start, visible_end)` over the
//! sequence index, the fractional read position, the pending navigation
//! target and in-flight load bookkeeping. Everything else reads this state
//! and changes it only through the commands below.

use crate::config::StreamConfig;
use crate::discussion::{Discussion, DiscussionMeta};
use crate::effect::Effect;
use crate::loader::{LoadDirection, LoadError, Page, PageAnchor, PageRequest, PageTicket};
use crate::post::{Post, PostId, PostStore};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle for one `go_to_*` call, reported back in
/// [`Effect::NavigationSettled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    Number { number: u64 },
    /// 0-based sequence offset; `reply` targets the trailing reply slot.
    Index { index: usize, reply: bool },
}

/// A navigation ready for the renderer to scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NavigationTarget,
    pub animate: bool,
    pub highlight: bool,
}

/// What a completed load did to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Extended,
    Reanchored,
    /// Posts were cached; window bounds did not move.
    Cached,
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    direction: LoadDirection,
    anchor: PageAnchor,
    start: usize,
    end: usize,
}

pub struct PostStream {
    discussion: Discussion,
    posts: PostStore,
    page_size: usize,
    concurrent_load_delay: Duration,
    visible_start: usize,
    visible_end: usize,
    index: f64,
    visible: f64,
    number: u64,
    description: String,
    target: Option<NavigationTarget>,
    needs_scroll: bool,
    animate_scroll: bool,
    highlight: bool,
    paused: bool,
    force_update_scrubber: bool,
    in_flight: BTreeMap<PageTicket, InFlight>,
    navigation_load: Option<PageTicket>,
    waiting: Vec<NavigationTicket>,
    next_ticket: u64,
    next_navigation: u64,
}

impl PostStream {
    /// Build a stream from discussion metadata and the page the discussion
    /// was first delivered with.
    pub fn new(meta: DiscussionMeta, initial: Page, config: &StreamConfig) -> Self {
        let mut stream = Self {
            discussion: Discussion::from_meta(meta),
            posts: PostStore::new(),
            page_size: config.page_size.max(1),
            concurrent_load_delay: config.concurrent_load_delay(),
            visible_start: 0,
            visible_end: 0,
            index: 0.0,
            visible: 1.0,
            number: 1,
            description: String::new(),
            target: None,
            needs_scroll: false,
            animate_scroll: false,
            highlight: false,
            paused: false,
            force_update_scrubber: false,
            in_flight: BTreeMap::new(),
            navigation_load: None,
            waiting: Vec::new(),
            next_ticket: 0,
            next_navigation: 0,
        };
        stream.show(initial);
        info!(
            discussion = %stream.discussion.id,
            count = stream.count(),
            start = stream.visible_start,
            end = stream.visible_end,
            "Post stream created"
        );
        stream
    }

    pub fn discussion(&self) -> &Discussion {
        &self.discussion
    }

    pub fn store(&self) -> &PostStore {
        &self.posts
    }

    pub fn count(&self) -> usize {
        self.discussion.count()
    }

    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    pub fn visible_end(&self) -> usize {
        self.visible_end
    }

    /// Fractional 1-based read position.
    pub fn index(&self) -> f64 {
        self.index
    }

    /// Fractional number of posts on screen.
    pub fn visible(&self) -> f64 {
        self.visible
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target(&self) -> Option<NavigationTarget> {
        self.target
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn pages_loading(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_loading(&self, direction: LoadDirection) -> bool {
        self.in_flight
            .values()
            .any(|pending| pending.direction == direction)
    }

    pub fn navigation_pending(&self) -> bool {
        self.navigation_load.is_some()
    }

    pub fn unread_count(&self) -> usize {
        self.discussion.unread_count()
    }

    pub fn viewing_end(&self) -> bool {
        self.visible_end == self.count()
    }

    pub fn disabled(&self) -> bool {
        let count = self.count();
        count == 0 || self.visible >= count as f64 || self.navigation_load.is_some()
    }

    /// Clamp an externally supplied, possibly stale index to `[0, count]`.
    pub fn sanitize_index(&self, index: f64) -> usize {
        if index.is_nan() {
            return 0;
        }
        index.floor().clamp(0.0, self.count() as f64) as usize
    }

    /// Posts aligned to the window; `None` renders as a loading placeholder.
    pub fn posts(&self) -> Vec<Option<&Post>> {
        self.window_slots()
            .iter()
            .map(|slot| slot.and_then(|id| self.posts.get(id)))
            .collect()
    }

    pub fn window_slots(&self) -> &[Option<PostId>] {
        self.discussion
            .sequence()
            .slots(self.visible_start..self.visible_end)
    }

    pub fn window_contains(&self, position: usize) -> bool {
        position >= self.visible_start && position < self.visible_end
    }

    /// Sequence offset of a loaded post number.
    pub fn position_of_number(&self, number: u64) -> Option<usize> {
        let id = self.posts.id_for_number(number)?;
        self.discussion.sequence().position_of(id)
    }

    pub fn window_contains_number(&self, number: u64) -> bool {
        self.posts().iter().flatten().any(|post| post.number == number)
    }

    pub fn go_to_first(&mut self, effects: &mut Vec<Effect>) -> NavigationTicket {
        self.go_to_index(0.0, true, false, effects)
    }

    pub fn go_to_last(&mut self, effects: &mut Vec<Effect>) -> NavigationTicket {
        let last = self.count().saturating_sub(1);
        self.go_to_index(last as f64, true, false, effects)
    }

    pub fn go_to_reply(&mut self, effects: &mut Vec<Effect>) -> NavigationTicket {
        let count = self.count();
        self.go_to_index(count as f64, true, true, effects)
    }

    /// Navigate to the post with `number`, loading around it if needed.
    pub fn go_to_number(
        &mut self,
        number: u64,
        highlight: bool,
        effects: &mut Vec<Effect>,
    ) -> NavigationTicket {
        let ticket = self.begin_navigation(NavigationTarget::Number { number }, true, highlight);
        self.number = number;
        info!(number, highlight, "Navigating to post number");

        if self.window_contains_number(number) {
            self.navigation_load = None;
        } else if let Some(position) = self.position_of_number(number) {
            self.load_near_index(position, effects);
        } else {
            let request = self.issue_load(
                LoadDirection::Near,
                PageAnchor::Near { number },
                self.visible_start,
                self.visible_end,
                effects,
            );
            self.navigation_load = Some(request);
        }
        self.check_invariants();
        ticket
    }

    /// Navigate to a raw sequence offset, or to the reply slot.
    pub fn go_to_index(
        &mut self,
        index: f64,
        animate: bool,
        reply: bool,
        effects: &mut Vec<Effect>,
    ) -> NavigationTicket {
        let count = self.count();
        let index = if reply {
            count
        } else {
            self.sanitize_index(index).min(count.saturating_sub(1))
        };
        let ticket = self.begin_navigation(NavigationTarget::Index { index, reply }, animate, false);
        self.index = ((index + 1).min(count)) as f64;
        info!(index, animate, reply, "Navigating to index");

        let anchor = if reply { count.saturating_sub(1) } else { index };
        self.load_near_index(anchor, effects);
        self.check_invariants();
        ticket
    }

    /// Extend the window downward by one page.
    pub fn load_next(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.is_loading(LoadDirection::Next) || self.visible_end >= self.count() {
            return false;
        }
        let start = self.visible_end;
        let end = self.clamp_edge(start + self.page_size);
        if self.range_is_loaded(start, end) {
            debug!(start, end, "Next page already cached");
            self.visible_end = end;
        } else {
            self.issue_load(
                LoadDirection::Next,
                PageAnchor::Offset { start },
                start,
                end,
                effects,
            );
        }
        self.check_invariants();
        true
    }

    /// Extend the window upward by one page.
    pub fn load_previous(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.is_loading(LoadDirection::Previous) || self.visible_start == 0 {
            return false;
        }
        let end = self.visible_start;
        let start = end.saturating_sub(self.page_size);
        if self.range_is_loaded(start, end) {
            debug!(start, end, "Previous page already cached");
            self.visible_start = start;
        } else {
            self.issue_load(
                LoadDirection::Previous,
                PageAnchor::Offset { start },
                start,
                end,
                effects,
            );
        }
        self.check_invariants();
        true
    }

    /// Re-request the window when it holds unloaded slots and nothing is in
    /// flight, e.g. after a failed re-anchor load.
    pub fn retry_window_gaps(&mut self, effects: &mut Vec<Effect>) -> bool {
        if !self.in_flight.is_empty() {
            return false;
        }
        if self.visible_start == self.visible_end {
            return self.count() > 0 && self.load_next(effects);
        }
        let (start, end) = (self.visible_start, self.visible_end);
        if self.range_is_loaded(start, end) {
            return false;
        }
        debug!(start, end, "Retrying unloaded window slots");
        self.issue_load(
            LoadDirection::Near,
            PageAnchor::Offset { start },
            start,
            end,
            effects,
        );
        true
    }

    /// Apply the result of a page request. Failures leave window bounds
    /// untouched so the next scroll tick can retry.
    pub fn page_loaded(
        &mut self,
        ticket: PageTicket,
        result: Result<Page, LoadError>,
    ) -> Result<LoadOutcome, LoadError> {
        let Some(pending) = self.in_flight.remove(&ticket) else {
            warn!(%ticket, "Ignoring result for unknown page request");
            return Ok(LoadOutcome::Ignored);
        };
        let is_navigation = self.navigation_load == Some(ticket);
        if is_navigation {
            self.navigation_load = None;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!(%ticket, direction = %pending.direction, "{err}");
                if is_navigation {
                    self.resolve_missing_number();
                }
                self.check_invariants();
                return Err(err);
            }
        };

        let (offset, len) = self.absorb(page);
        let outcome = match (pending.direction, pending.anchor) {
            (LoadDirection::Next, _) if pending.start == self.visible_end => {
                self.visible_end = self.clamp_edge(pending.end.max(self.visible_end));
                LoadOutcome::Extended
            }
            (LoadDirection::Previous, _) if pending.end == self.visible_start => {
                self.visible_start = pending.start.min(self.visible_start);
                LoadOutcome::Extended
            }
            (LoadDirection::Near, PageAnchor::Near { .. }) if is_navigation && len > 0 => {
                self.visible_start = offset;
                self.visible_end = self.clamp_edge(offset + len);
                LoadOutcome::Reanchored
            }
            (direction, _) => {
                if direction == LoadDirection::Near && !is_navigation {
                    self.force_update_scrubber = true;
                }
                LoadOutcome::Cached
            }
        };
        if is_navigation {
            self.resolve_missing_number();
        }

        debug!(
            %ticket,
            direction = %pending.direction,
            ?outcome,
            start = self.visible_start,
            end = self.visible_end,
            pages_loading = self.in_flight.len(),
            "Page settled"
        );
        self.check_invariants();
        Ok(outcome)
    }

    /// Replace discussion metadata. When the reader is at the end, the
    /// window follows new posts.
    pub fn sync_discussion(&mut self, meta: DiscussionMeta, effects: &mut Vec<Effect>) {
        let was_viewing_end = self.viewing_end();
        self.discussion.apply_meta(meta);
        let count = self.count();
        self.visible_end = self.visible_end.min(count);
        self.visible_start = self.visible_start.min(self.visible_end);

        if was_viewing_end && self.visible_end < count {
            let start = self.visible_end;
            self.visible_end = count;
            if !self.range_is_loaded(start, count) {
                self.issue_load(
                    LoadDirection::Near,
                    PageAnchor::Offset { start },
                    start,
                    count,
                    effects,
                );
            }
            info!(start, count, "Following new posts at end of discussion");
        }
        self.index = self.index.clamp(0.0, count as f64);
        self.visible = self.visible.clamp(0.0, count as f64);
        self.check_invariants();
    }

    /// Store geometry-derived read position.
    pub fn update_read_position(&mut self, index: f64, visible: f64, description: Option<String>) {
        let count = self.count() as f64;
        self.index = if index.is_finite() {
            index.clamp(0.0, count)
        } else {
            count
        };
        self.visible = if visible.is_finite() {
            visible.clamp(0.0, count)
        } else {
            0.0
        };
        if let Some(description) = description {
            self.description = description;
        }
    }

    /// Move the read position without loading anything (scrubber drag).
    pub fn scrub_to(&mut self, index: f64) {
        if index.is_finite() {
            self.index = index.clamp(0.0, self.count() as f64);
        }
    }

    /// Point the read position at a rendered item's sequence offset.
    pub fn focus_index(&mut self, offset: usize) {
        self.index = ((offset + 1).min(self.count())) as f64;
    }

    /// Advance the read watermark; returns the new watermark if it moved.
    pub fn mark_read(&mut self, number: u64) -> Option<u64> {
        self.discussion
            .mark_read(number)
            .then(|| self.discussion.last_read_post_number())
    }

    /// Hand the pending navigation to the renderer once it can be resolved.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        if !self.needs_scroll {
            return None;
        }
        if let Some(NavigationTarget::Number { number }) = self.target {
            if self.navigation_load.is_some() {
                return None;
            }
            if !self.window_contains_number(number) {
                self.resolve_missing_number();
            }
        }
        let target = self.target?;
        self.needs_scroll = false;
        Some(ScrollRequest {
            target,
            animate: self.animate_scroll,
            highlight: self.highlight,
        })
    }

    /// Close the current navigation: resumes passive tracking and returns
    /// every ticket that was waiting on it.
    pub fn finish_navigation(&mut self) -> Vec<NavigationTicket> {
        if self.needs_scroll {
            return Vec::new();
        }
        self.target = None;
        self.paused = false;
        std::mem::take(&mut self.waiting)
    }

    pub fn take_force_update_scrubber(&mut self) -> bool {
        if self.navigation_load.is_some() {
            return false;
        }
        std::mem::take(&mut self.force_update_scrubber)
    }

    pub fn request_scrubber_refresh(&mut self) {
        self.force_update_scrubber = true;
    }

    /// `0 <= visible_start <= visible_end <= count` and `index` finite
    /// within `[0, count]`.
    pub fn invariants_hold(&self) -> bool {
        let count = self.count();
        self.visible_start <= self.visible_end
            && self.visible_end <= count
            && self.index.is_finite()
            && self.index >= 0.0
            && self.index <= count as f64
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.invariants_hold(),
            "stream invariants violated: start={} end={} count={} index={}",
            self.visible_start,
            self.visible_end,
            self.count(),
            self.index
        );
    }

    fn begin_navigation(
        &mut self,
        target: NavigationTarget,
        animate: bool,
        highlight: bool,
    ) -> NavigationTicket {
        self.next_navigation += 1;
        let ticket = NavigationTicket(self.next_navigation);
        if let Some(previous) = self.target.replace(target) {
            debug!(?previous, ?target, "Replacing pending navigation target");
        }
        self.paused = true;
        self.needs_scroll = true;
        self.animate_scroll = animate;
        self.highlight = highlight;
        self.waiting.push(ticket);
        ticket
    }

    /// Move the window to a page centered on `position`. Both bounds move;
    /// posts outside the new window stay in the loaded-post cache, which is
    /// the part that never evicts.
    fn load_near_index(&mut self, position: usize, effects: &mut Vec<Effect>) {
        self.navigation_load = None;
        let count = self.count();
        if count == 0 || self.window_contains(position) {
            return;
        }
        let start = position.saturating_sub(self.page_size / 2).min(count);
        let end = self.clamp_edge(start + self.page_size);
        let start = start.min(end.saturating_sub(self.page_size));
        info!(position, start, end, "Re-anchoring window");
        self.visible_start = start;
        self.visible_end = end;
        if self.range_is_loaded(start, end) {
            return;
        }
        let ticket = self.issue_load(
            LoadDirection::Near,
            PageAnchor::Offset { start },
            start,
            end,
            effects,
        );
        self.navigation_load = Some(ticket);
    }

    fn issue_load(
        &mut self,
        direction: LoadDirection,
        anchor: PageAnchor,
        start: usize,
        end: usize,
        effects: &mut Vec<Effect>,
    ) -> PageTicket {
        self.next_ticket += 1;
        let ticket = PageTicket(self.next_ticket);
        let delay = if self.in_flight.is_empty() {
            Duration::ZERO
        } else {
            self.concurrent_load_delay
        };
        let limit = match anchor {
            PageAnchor::Near { .. } => self.page_size,
            PageAnchor::Offset { .. } => end.saturating_sub(start).max(1),
        };
        self.in_flight.insert(
            ticket,
            InFlight {
                direction,
                anchor,
                start,
                end,
            },
        );
        debug!(
            %ticket,
            %direction,
            start,
            end,
            delay_ms = delay.as_millis() as u64,
            pages_loading = self.in_flight.len(),
            "Requesting page"
        );
        effects.push(Effect::LoadPage(PageRequest {
            ticket,
            discussion: self.discussion.id,
            direction,
            anchor,
            limit,
            delay,
        }));
        ticket
    }

    fn show(&mut self, page: Page) {
        let (offset, len) = self.absorb(page);
        if len > 0 {
            self.visible_start = offset;
            self.visible_end = self.clamp_edge(offset + len);
        }
    }

    /// Cache a page's posts and record their ids in the sequence. Returns
    /// the page's resolved offset and length.
    fn absorb(&mut self, page: Page) -> (usize, usize) {
        let count = self.count();
        let mut offset = page.offset;
        if let Some(position) = page
            .posts
            .first()
            .and_then(|first| self.discussion.sequence().position_of(first.id))
        {
            offset = position;
        }
        let len = page.posts.len();
        for (i, post) in page.posts.into_iter().enumerate() {
            let position = offset + i;
            if position < count {
                self.discussion.sequence_mut().assign(position, post.id);
            } else {
                warn!(position, count, id = %post.id, "Post lies past the end of the sequence");
            }
            self.posts.insert(post);
        }
        let offset = offset.min(count);
        (offset, len.min(count - offset))
    }

    fn range_is_loaded(&self, start: usize, end: usize) -> bool {
        self.discussion
            .sequence()
            .slots(start..end)
            .iter()
            .all(|slot| slot.is_some_and(|id| self.posts.contains(id)))
    }

    fn clamp_edge(&self, edge: usize) -> usize {
        edge.min(self.count())
    }

    /// Target-not-found policy: a number that is not in the window becomes
    /// the closest loaded position inside it.
    fn resolve_missing_number(&mut self) {
        let Some(NavigationTarget::Number { number }) = self.target else {
            return;
        };
        if self.window_contains_number(number) {
            return;
        }
        let index = self.nearest_index_for_number(number);
        info!(number, index, "Post number not in window; using nearest position");
        self.target = Some(NavigationTarget::Index {
            index,
            reply: false,
        });
    }

    fn nearest_index_for_number(&self, number: u64) -> usize {
        let nearest = self
            .posts()
            .iter()
            .enumerate()
            .filter_map(|(i, post)| post.map(|post| (i, post.number.abs_diff(number))))
            .min_by_key(|(_, distance)| *distance)
            .map(|(i, _)| self.visible_start + i);
        if let Some(position) = nearest {
            return position;
        }

        let count = self.count();
        let last_number = self.discussion.last_post_number().max(1);
        let estimate = number as f64 / last_number as f64 * count as f64;
        let position = self.sanitize_index(estimate).min(count.saturating_sub(1));
        if self.visible_end > self.visible_start {
            position.clamp(self.visible_start, self.visible_end - 1)
        } else {
            position
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::discussion::DiscussionId;
    use crate::post::test_post;

    pub(crate) fn meta(count: u64) -> DiscussionMeta {
        DiscussionMeta {
            id: DiscussionId(9),
            title: "Thread".to_string(),
            post_ids: (1..=count).map(|id| Some(PostId(id))).collect(),
            last_post_number: count,
            last_read_post_number: 0,
            can_reply: true,
        }
    }

    /// Posts for 0-based offsets `start..end`; id and number are offset + 1.
    pub(crate) fn page(start: usize, end: usize) -> Page {
        Page {
            offset: start,
            posts: (start..end)
                .map(|i| test_post(i as u64 + 1, i as u64 + 1, i as i64))
                .collect(),
        }
    }

    pub(crate) fn stream(count: u64, start: usize, end: usize) -> PostStream {
        PostStream::new(meta(count), page(start, end), &StreamConfig::default())
    }

    pub(crate) fn requests(effects: &[Effect]) -> Vec<PageRequest> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::LoadPage(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn sanitize_index_clamps_to_count() {
        let stream = stream(100, 0, 20);
        assert_eq!(stream.sanitize_index(-5.0), 0);
        assert_eq!(stream.sanitize_index(500.0), 100);
        assert_eq!(stream.sanitize_index(41.7), 41);
        assert_eq!(stream.sanitize_index(f64::NAN), 0);
        assert_eq!(stream.sanitize_index(f64::INFINITY), 100);
    }

    #[test]
    fn load_next_twice_issues_one_fetch() {
        let mut stream = stream(100, 0, 20);
        let mut effects = Vec::new();
        assert!(stream.load_next(&mut effects));
        assert!(!stream.load_next(&mut effects));

        let issued = requests(&effects);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].anchor, PageAnchor::Offset { start: 20 });
        assert_eq!(issued[0].limit, 20);
        assert_eq!(stream.pages_loading(), 1);
        assert_eq!(stream.visible_end(), 20);
    }

    #[test]
    fn successful_next_page_extends_the_window() {
        let mut stream = stream(100, 0, 20);
        let mut effects = Vec::new();
        stream.load_next(&mut effects);
        let ticket = requests(&effects)[0].ticket;

        let outcome = stream.page_loaded(ticket, Ok(page(20, 40)));
        assert_eq!(outcome, Ok(LoadOutcome::Extended));
        assert_eq!((stream.visible_start(), stream.visible_end()), (0, 40));
        assert_eq!(stream.pages_loading(), 0);
        assert!(stream.posts().iter().all(Option::is_some));
    }

    #[test]
    fn failed_page_leaves_edge_and_allows_retry() {
        let mut stream = stream(100, 40, 60);
        let mut effects = Vec::new();
        stream.load_previous(&mut effects);
        let ticket = requests(&effects)[0].ticket;

        let outcome = stream.page_loaded(ticket, Err(LoadError::new("offline")));
        assert!(outcome.is_err());
        assert_eq!((stream.visible_start(), stream.visible_end()), (40, 60));
        assert_eq!(stream.pages_loading(), 0);

        let mut retry = Vec::new();
        assert!(stream.load_previous(&mut retry));
        assert_eq!(requests(&retry).len(), 1);
    }

    #[test]
    fn edges_at_bounds_are_no_ops() {
        let mut stream = stream(20, 0, 20);
        let mut effects = Vec::new();
        assert!(!stream.load_previous(&mut effects));
        assert!(!stream.load_next(&mut effects));
        assert!(effects.is_empty());
    }

    #[test]
    fn concurrent_load_is_staggered() {
        let mut stream = stream(100, 40, 60);
        let mut effects = Vec::new();
        stream.load_previous(&mut effects);
        stream.load_next(&mut effects);
        let issued = requests(&effects);
        assert_eq!(issued[0].delay, Duration::ZERO);
        assert_eq!(issued[1].delay, Duration::from_millis(1000));
        assert_eq!(stream.pages_loading(), 2);
    }

    #[test]
    fn go_to_number_outside_window_loads_near_it() {
        let mut stream = stream(100, 0, 20);
        let mut effects = Vec::new();
        stream.go_to_number(42, true, &mut effects);

        let issued = requests(&effects);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].anchor, PageAnchor::Near { number: 42 });
        assert!(stream.paused());
        assert!(stream.disabled());
        assert_eq!(stream.take_scroll_request(), None);

        let outcome = stream.page_loaded(issued[0].ticket, Ok(page(31, 51)));
        assert_eq!(outcome, Ok(LoadOutcome::Reanchored));
        assert!(stream.visible_start() <= 41 && 41 < stream.visible_end());

        let request = stream.take_scroll_request().expect("scroll request");
        assert_eq!(request.target, NavigationTarget::Number { number: 42 });
        assert!(request.highlight);
    }

    #[test]
    fn missing_number_falls_back_to_nearest_position() {
        let mut stream = stream(100, 0, 20);
        let mut effects = Vec::new();
        stream.go_to_number(500, false, &mut effects);
        let ticket = requests(&effects)[0].ticket;
        stream
            .page_loaded(ticket, Ok(page(80, 100)))
            .expect("page loads");

        let request = stream.take_scroll_request().expect("scroll request");
        assert_eq!(
            request.target,
            NavigationTarget::Index {
                index: 99,
                reply: false
            }
        );
    }

    #[test]
    fn go_to_index_reanchors_and_renders_placeholders() {
        let mut stream = stream(1000, 0, 20);
        let mut effects = Vec::new();
        stream.go_to_index(500.0, true, false, &mut effects);

        assert_eq!((stream.visible_start(), stream.visible_end()), (490, 510));
        assert!(stream.posts().iter().all(Option::is_none));
        assert!(stream.navigation_pending());
        assert_eq!(stream.index(), 501.0);

        let request = stream.take_scroll_request().expect("index targets scroll at once");
        assert_eq!(
            request.target,
            NavigationTarget::Index {
                index: 500,
                reply: false
            }
        );
    }

    #[test]
    fn reply_targets_trailing_slot() {
        let mut stream = stream(100, 0, 20);
        let mut effects = Vec::new();
        stream.go_to_reply(&mut effects);
        assert_eq!(
            stream.target(),
            Some(NavigationTarget::Index {
                index: 100,
                reply: true
            })
        );
        assert_eq!(stream.visible_end(), 100);
        assert!(stream.viewing_end());
    }

    #[test]
    fn cached_range_needs_no_fetch() {
        let mut stream = stream(100, 0, 40);
        let mut effects = Vec::new();
        stream.go_to_index(90.0, false, false, &mut effects);
        let ticket = requests(&effects)[0].ticket;
        stream.page_loaded(ticket, Ok(page(80, 100))).expect("page");

        let mut again = Vec::new();
        stream.go_to_index(5.0, false, false, &mut again);
        assert!(requests(&again).is_empty());
        assert!(!stream.navigation_pending());
        assert_eq!((stream.visible_start(), stream.visible_end()), (0, 20));
    }

    #[test]
    fn replaced_navigation_keeps_current_target() {
        let mut stream = stream(1000, 0, 20);
        let mut effects = Vec::new();
        stream.go_to_index(300.0, true, false, &mut effects);
        let first = requests(&effects)[0].ticket;
        stream.go_to_index(800.0, true, false, &mut effects);

        stream.page_loaded(first, Ok(page(290, 310))).expect("old page");
        assert_eq!((stream.visible_start(), stream.visible_end()), (790, 810));
        assert!(stream.navigation_pending());
        assert_eq!(
            stream.target(),
            Some(NavigationTarget::Index {
                index: 800,
                reply: false
            })
        );
        assert!(stream.store().contains(PostId(300)));
    }

    #[test]
    fn stale_edge_load_does_not_move_bounds() {
        let mut stream = stream(1000, 0, 20);
        let mut effects = Vec::new();
        stream.load_next(&mut effects);
        let next = requests(&effects)[0].ticket;
        stream.go_to_index(600.0, false, false, &mut effects);

        let outcome = stream.page_loaded(next, Ok(page(20, 40)));
        assert_eq!(outcome, Ok(LoadOutcome::Cached));
        assert_eq!((stream.visible_start(), stream.visible_end()), (590, 610));
    }

    #[test]
    fn finishing_navigation_resumes_tracking() {
        let mut stream = stream(100, 0, 20);
        let mut effects = Vec::new();
        let first = stream.go_to_index(3.0, true, false, &mut effects);
        let second = stream.go_to_index(5.0, true, false, &mut effects);
        assert!(stream.take_scroll_request().is_some());

        assert_eq!(stream.finish_navigation(), vec![first, second]);
        assert!(!stream.paused());
        assert_eq!(stream.target(), None);
    }

    #[test]
    fn sync_discussion_follows_new_posts_at_end() {
        let mut stream = stream(20, 0, 20);
        let mut effects = Vec::new();
        stream.sync_discussion(meta(23), &mut effects);

        assert_eq!(stream.count(), 23);
        assert_eq!(stream.visible_end(), 23);
        let issued = requests(&effects);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].anchor, PageAnchor::Offset { start: 20 });
        assert_eq!(issued[0].limit, 3);
    }

    #[test]
    fn gap_retry_reissues_failed_reanchor() {
        let mut stream = stream(1000, 0, 20);
        let mut effects = Vec::new();
        stream.go_to_index(500.0, false, false, &mut effects);
        let ticket = requests(&effects)[0].ticket;
        assert!(stream.page_loaded(ticket, Err(LoadError::new("timeout"))).is_err());

        let mut retry = Vec::new();
        assert!(stream.retry_window_gaps(&mut retry));
        assert_eq!(requests(&retry)[0].anchor, PageAnchor::Offset { start: 490 });
        assert!(!stream.retry_window_gaps(&mut retry));
    }

    #[test]
    fn read_watermark_only_advances() {
        let mut stream = stream(100, 0, 20);
        assert_eq!(stream.mark_read(12), Some(12));
        assert_eq!(stream.mark_read(7), None);
        assert_eq!(stream.unread_count(), 88);
    }
}
