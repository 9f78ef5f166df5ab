//! Page-loading seam between the stream and the resource collaborator.
//!
//! The stream never fetches anything itself. It emits a [`PageRequest`]
//! inside [`crate::Effect::LoadPage`]; the host runs it against a
//! [`PageSource`] (usually off the UI thread) and hands the result back with
//! [`crate::StreamView::page_loaded`].

use crate::discussion::DiscussionId;
use crate::post::Post;
use std::time::Duration;

/// Correlates a load request with its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageTicket(pub u64);

impl std::fmt::Display for PageTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadDirection {
    Previous,
    Next,
    /// Re-anchoring load issued by navigation.
    Near,
}

impl std::fmt::Display for LoadDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoadDirection::Previous => "previous",
            LoadDirection::Next => "next",
            LoadDirection::Near => "near",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAnchor {
    /// A page centered on the post with this number.
    Near { number: u64 },
    /// A page starting at this 0-based sequence offset.
    Offset { start: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub ticket: PageTicket,
    pub discussion: DiscussionId,
    pub direction: LoadDirection,
    pub anchor: PageAnchor,
    pub limit: usize,
    /// How long the host should wait before fetching.
    pub delay: Duration,
}

/// A contiguous run of posts starting at sequence offset `offset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub offset: usize,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page load failed: {}", self.message)
    }
}

impl std::error::Error for LoadError {}

/// Resource collaborator able to serve page requests.
pub trait PageSource {
    fn load_page(&self, request: &PageRequest) -> Result<Page, LoadError>;
}
