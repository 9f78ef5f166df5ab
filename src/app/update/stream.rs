use super::super::state::{App, MAX_RENDER_PASSES};
use super::Effect;
use poststream_core::{
    Effect as StreamEffect, FlashTarget, LoadError, LoadOutcome, Page, PageTicket, ScrollTween,
};
use std::time::Instant;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn mount_stream(
        &mut self,
        now: Instant,
        near: Option<u64>,
        effects: &mut Vec<Effect>,
    ) {
        let geometry = self.geometry();
        let mut engine = Vec::new();
        self.stream.mount(&geometry, now, &mut engine);
        if let Some(number) = near {
            info!(number, "Resuming near cached post");
            self.stream.go_to_number(number, false, &mut engine);
        }
        self.apply_stream_effects(engine, effects);
    }

    /// Report the frame about to be drawn until the engine stops moving the
    /// viewport.
    pub(super) fn render_pass(&mut self, effects: &mut Vec<Effect>) {
        for _ in 0..MAX_RENDER_PASSES {
            let geometry = self.geometry();
            let mut engine = Vec::new();
            self.stream.after_render(&geometry, &mut engine);
            if !self.apply_stream_effects(engine, effects) {
                return;
            }
        }
        debug!("Render pass limit reached");
    }

    /// Translate engine effects into host effects. Returns whether the
    /// viewport moved.
    pub(super) fn apply_stream_effects(
        &mut self,
        engine: Vec<StreamEffect>,
        effects: &mut Vec<Effect>,
    ) -> bool {
        let mut moved = false;
        for effect in engine {
            match effect {
                StreamEffect::LoadPage(request) => effects.push(Effect::FetchPage(request)),
                StreamEffect::ScrollTo { offset, animate } => {
                    moved |= self.begin_scroll(offset, animate, effects);
                }
                StreamEffect::PositionChanged { start, end } => {
                    if self.position != Some((start, end)) {
                        self.position = Some((start, end));
                        if self.read_state.near != start {
                            self.read_state.near = start;
                            effects.push(Effect::SaveReadState);
                        }
                    }
                }
                StreamEffect::ReadAdvanced {
                    last_read_post_number,
                } => {
                    if last_read_post_number > self.read_state.last_read_post_number {
                        self.read_state.last_read_post_number = last_read_post_number;
                        effects.push(Effect::SaveReadState);
                    }
                }
                StreamEffect::Flash(target) => effects.push(Effect::ExpireFlash {
                    target,
                    after: self.config.stream.flash_duration(),
                }),
                StreamEffect::NavigationSettled(ticket) => {
                    debug!(ticket = ticket.0, "Navigation settled");
                }
            }
        }
        moved
    }

    /// Start, retarget or snap a scroll. Returns whether a render pass must
    /// follow, which is the case when `scroll_top` changed immediately or an
    /// animation was cut short.
    pub(super) fn begin_scroll(
        &mut self,
        offset: f32,
        animate: bool,
        effects: &mut Vec<Effect>,
    ) -> bool {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        let duration = self.config.stream.scroll_animation();

        if animate && !duration.is_zero() {
            let now = Instant::now();
            match self.scroll.tween.as_mut() {
                Some(tween) => tween.retarget(now, offset, duration),
                None => {
                    self.scroll.tween = Some(ScrollTween::new(
                        self.scroll.viewport.scroll_top,
                        offset,
                        now,
                        duration,
                    ));
                }
            }
            debug!(offset, "Animating scroll");
            return false;
        }

        let interrupted = self.scroll.tween.take().is_some();
        self.scroll.viewport.scroll_top = offset;
        effects.push(Effect::ScrollTo(offset));
        if interrupted || animate {
            self.stream.scroll_animation_finished();
        }
        true
    }

    pub(super) fn handle_page_loaded(
        &mut self,
        ticket: PageTicket,
        result: Result<Page, LoadError>,
        effects: &mut Vec<Effect>,
    ) {
        match self.stream.page_loaded(ticket, result) {
            Ok(LoadOutcome::Ignored) => {
                debug!(%ticket, "Ignored page result");
            }
            Ok(outcome) => {
                debug!(%ticket, ?outcome, "Applied page");
                self.load_error = None;
                self.render_pass(effects);
                let geometry = self.geometry();
                let mut engine = Vec::new();
                self.stream.on_scroll(&geometry, Instant::now(), &mut engine);
                self.apply_stream_effects(engine, effects);
            }
            Err(err) => {
                warn!(%ticket, error = %err, "Page load failed");
                self.load_error = Some(format!("Could not load posts: {err}"));
            }
        }
    }

    pub(super) fn handle_flash_expired(&mut self, target: FlashTarget) {
        if self.stream.flash_finished(target) {
            debug!(?target, "Flash cleared");
        }
    }

    pub(super) fn handle_simulate_new_post(&mut self, effects: &mut Vec<Effect>) {
        let meta = self.source.append_post();
        info!(count = meta.post_ids.len(), "Simulated a new post");
        let mut engine = Vec::new();
        self.stream.sync_discussion(meta, &mut engine);
        self.apply_stream_effects(engine, effects);
    }
}
