//! Windowed post stream engine.
//!
//! Renders an arbitrarily long, sparsely loaded discussion inside a single
//! scrollable viewport. The engine is host-agnostic: a GUI layer feeds it
//! per-frame [`Geometry`] and scroll events, executes the [`Effect`]s it
//! returns (page loads, scrolls, flashes) and reports completions back.
//!
//! - [`PostStream`] owns the loaded window, the read position, pending
//!   navigation and in-flight load state.
//! - [`ViewportTracker`] turns geometry into read position, edge loads and
//!   debounced position reports.
//! - [`ScrubberMapper`] maps the stream onto a proportional minimap and back.
//! - [`StreamView`] ties the three together and resolves scroll targets.

pub mod config;
pub mod content;
pub mod discussion;
mod effect;
pub mod geometry;
pub mod loader;
pub mod post;
pub mod render;
pub mod scrubber;
pub mod stream;
pub mod tracker;
pub mod tween;

pub use config::StreamConfig;
pub use content::{ContentRegistry, PostKind, RegistryError};
pub use discussion::{Discussion, DiscussionId, DiscussionMeta, SequenceIndex};
pub use effect::{Effect, FlashTarget};
pub use geometry::{Geometry, GeometryBuilder, ItemGeometry, ItemKind};
pub use loader::{LoadDirection, LoadError, Page, PageAnchor, PageRequest, PageSource, PageTicket};
pub use post::{Post, PostId, PostStore};
pub use render::{StreamItem, StreamView, TimeGap, materialize, time_gap};
pub use scrubber::{PercentPerPost, ScrubberLayout, ScrubberMapper, UnreadBand};
pub use stream::{LoadOutcome, NavigationTarget, NavigationTicket, PostStream, ScrollRequest};
pub use tracker::{ReadPosition, ViewportTracker};
pub use tween::ScrollTween;
