//! Discussion fixture and the page source that serves it.
//!
//! A fixture is either a JSON file or a deterministic synthetic discussion.
//! [`FixtureSource`] answers page requests from memory, with optional
//! simulated latency and injected failures so the retry paths of the stream
//! engine can be exercised by hand.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use poststream_core::{
    DiscussionId, DiscussionMeta, LoadError, Page, PageAnchor, PageRequest, PageSource, Post,
    PostId,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, serde::Deserialize)]
struct FixtureFile {
    id: DiscussionId,
    #[serde(default)]
    title: String,
    #[serde(default = "default_can_reply")]
    can_reply: bool,
    #[serde(default)]
    last_read_post_number: u64,
    posts: Vec<Post>,
}

fn default_can_reply() -> bool {
    true
}

#[derive(Debug)]
struct FixtureData {
    id: DiscussionId,
    title: String,
    can_reply: bool,
    last_read_post_number: u64,
    posts: Vec<Post>,
}

#[derive(Debug)]
pub struct FixtureSource {
    data: Mutex<FixtureData>,
    latency: Duration,
    fail_every_nth: u64,
    requests: AtomicU64,
}

impl FixtureSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let source = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(path = %path.display(), posts = source.post_count(), "Loaded discussion fixture");
        Ok(source)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let mut file: FixtureFile = serde_json::from_str(contents)?;
        file.posts.sort_by_key(|post| post.number);
        if let Some(pair) = file
            .posts
            .windows(2)
            .find(|pair| pair[0].number == pair[1].number)
        {
            return Err(anyhow!("Duplicate post number {}", pair[0].number));
        }
        Ok(Self::new(FixtureData {
            id: file.id,
            title: file.title,
            can_reply: file.can_reply,
            last_read_post_number: file.last_read_post_number,
            posts: file.posts,
        }))
    }

    /// Deterministic discussion with varied post lengths, a few event posts
    /// and occasional multi-day pauses.
    pub fn synthetic(count: usize) -> Self {
        let base = DateTime::<Utc>::from_timestamp(1_614_556_800, 0).unwrap_or_default();
        let mut created_at = base;
        let posts = (0..count)
            .map(|i| {
                created_at += ChronoDuration::hours(1 + (i as i64 * 7) % 11);
                if i > 0 && i % 40 == 0 {
                    created_at += ChronoDuration::days(5);
                }
                if i > 0 && i % 150 == 0 {
                    created_at += ChronoDuration::days(60);
                }
                synthetic_post(i, created_at)
            })
            .collect();
        Self::new(FixtureData {
            id: DiscussionId(1),
            title: format!("Synthetic discussion ({count} posts)"),
            can_reply: true,
            last_read_post_number: 0,
            posts,
        })
    }

    fn new(data: FixtureData) -> Self {
        Self {
            data: Mutex::new(data),
            latency: Duration::ZERO,
            fail_every_nth: 0,
            requests: AtomicU64::new(0),
        }
    }

    pub fn with_simulation(mut self, latency: Duration, fail_every_nth: u64) -> Self {
        self.latency = latency;
        self.fail_every_nth = fail_every_nth;
        self
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    pub fn meta(&self) -> DiscussionMeta {
        let data = self.lock();
        DiscussionMeta {
            id: data.id,
            title: data.title.clone(),
            post_ids: data.posts.iter().map(|post| Some(post.id)).collect(),
            last_post_number: data.posts.last().map_or(0, |post| post.number),
            last_read_post_number: data.last_read_post_number,
            can_reply: data.can_reply,
        }
    }

    /// First page, served synchronously: centered on `near` when given.
    pub fn initial_page(&self, near: Option<u64>, limit: usize) -> Page {
        let anchor = match near {
            Some(number) if number > 0 => PageAnchor::Near { number },
            _ => PageAnchor::Offset { start: 0 },
        };
        serve(&self.lock().posts, anchor, limit)
    }

    /// Append a reply at the end of the discussion, as if another user just
    /// posted. Returns the refreshed metadata.
    pub fn append_post(&self) -> DiscussionMeta {
        {
            let mut data = self.lock();
            let i = data.posts.len();
            let created_at = data
                .posts
                .last()
                .map_or_else(Utc::now, |post| post.created_at + ChronoDuration::minutes(3));
            let mut post = synthetic_post(i, created_at);
            post.content_type = "comment".to_string();
            post.number = data.posts.last().map_or(1, |last| last.number + 1);
            post.id = PostId(data.posts.iter().map(|post| post.id.0).max().unwrap_or(999) + 1);
            info!(number = post.number, id = %post.id, "Simulated new post");
            data.posts.push(post);
        }
        self.meta()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FixtureData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageSource for FixtureSource {
    fn load_page(&self, request: &PageRequest) -> Result<Page, LoadError> {
        let served = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_every_nth > 0 && served % self.fail_every_nth == 0 {
            warn!(ticket = %request.ticket, served, "Injecting page load failure");
            return Err(LoadError::new(format!(
                "injected failure on request {served}"
            )));
        }
        let data = self.lock();
        if request.discussion != data.id {
            return Err(LoadError::new(format!(
                "unknown discussion {}",
                request.discussion
            )));
        }
        let page = serve(&data.posts, request.anchor, request.limit);
        debug!(
            ticket = %request.ticket,
            offset = page.offset,
            posts = page.posts.len(),
            "Served page"
        );
        Ok(page)
    }
}

/// Run a request on the async runtime, honoring the request's stagger delay
/// and the simulated latency.
pub async fn fetch(source: Arc<FixtureSource>, request: PageRequest) -> Result<Page, LoadError> {
    let wait = request.delay + source.latency;
    if !wait.is_zero() {
        tokio::time::sleep(wait).await;
    }
    source.load_page(&request)
}

fn serve(posts: &[Post], anchor: PageAnchor, limit: usize) -> Page {
    if posts.is_empty() {
        return Page::default();
    }
    let limit = limit.max(1);
    let start = match anchor {
        PageAnchor::Offset { start } => start.min(posts.len()),
        PageAnchor::Near { number } => {
            let position = posts
                .partition_point(|post| post.number < number)
                .min(posts.len() - 1);
            position
                .saturating_sub(limit / 2)
                .min(posts.len().saturating_sub(limit))
        }
    };
    let end = (start + limit).min(posts.len());
    Page {
        offset: start,
        posts: posts[start..end].to_vec(),
    }
}

const AUTHORS: [&str; 6] = ["ada", "brook", "cyrus", "dmitri", "elif", "farah"];

const SENTENCES: [&str; 9] = [
    "I tried the patch from the previous reply and it fixes the crash on startup.",
    "Could you share the exact version you are running?",
    "The logs show the request timing out after roughly thirty seconds.",
    "This also happens on a fresh install with default settings.",
    "Thanks, that workaround is good enough for now.",
    "I think the real issue is the cache never being invalidated after an update.",
    "Marking this as something to revisit once the next release lands.",
    "Here is a longer explanation of what I observed while reproducing it, step by step.",
    "Same here.",
];

fn synthetic_post(i: usize, created_at: DateTime<Utc>) -> Post {
    let content_type = match i {
        0 => "comment",
        i if i % 211 == 0 => "discussionStickied",
        i if i % 97 == 0 => "discussionRenamed",
        i if i % 333 == 0 => "poll",
        _ => "comment",
    };
    let sentences = 1 + (i * 13) % 9;
    let content = (0..sentences)
        .map(|s| SENTENCES[(i + s * 5) % SENTENCES.len()])
        .collect::<Vec<_>>()
        .join(" ");
    Post {
        id: PostId(1000 + i as u64),
        number: i as u64 + 1,
        created_at,
        content_type: content_type.to_string(),
        author: AUTHORS[i % AUTHORS.len()].to_string(),
        content,
    }
}
