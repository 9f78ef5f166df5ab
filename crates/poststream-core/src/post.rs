use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Stable identifier of a post within the resource store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fetched post. `number` is its stable logical position in the
/// discussion and is never reassigned once seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub number: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

fn default_content_type() -> String {
    "comment".to_string()
}

/// Cache of every post loaded during the session. Never evicts.
#[derive(Debug, Default, Clone)]
pub struct PostStore {
    posts: HashMap<PostId, Post>,
    by_number: HashMap<u64, PostId>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    pub fn contains(&self, id: PostId) -> bool {
        self.posts.contains_key(&id)
    }

    pub fn id_for_number(&self, number: u64) -> Option<PostId> {
        self.by_number.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Insert or refresh a post. A refreshed post keeps the number it was
    /// first seen with.
    pub fn insert(&mut self, mut post: Post) {
        if let Some(existing) = self.posts.get(&post.id) {
            if existing.number != post.number {
                warn!(
                    id = %post.id,
                    kept = existing.number,
                    incoming = post.number,
                    "Ignoring post number change"
                );
                post.number = existing.number;
            }
        }
        self.by_number.insert(post.number, post.id);
        self.posts.insert(post.id, post);
    }
}

#[cfg(test)]
pub(crate) fn test_post(id: u64, number: u64, hours: i64) -> Post {
    let base = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap_or_default();
    Post {
        id: PostId(id),
        number,
        created_at: base + chrono::Duration::hours(hours),
        content_type: default_content_type(),
        author: format!("user{}", id % 7),
        content: format!("Post body {number}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_survives_refresh() {
        let mut store = PostStore::new();
        store.insert(test_post(10, 3, 0));
        store.insert(test_post(10, 9, 0));

        assert_eq!(store.get(PostId(10)).map(|p| p.number), Some(3));
        assert_eq!(store.id_for_number(3), Some(PostId(10)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn content_type_defaults_to_comment() {
        let post: Post = serde_json::from_str(
            r#"{"id": 4, "number": 2, "created_at": "2020-09-13T12:26:40Z"}"#,
        )
        .expect("post json");
        assert_eq!(post.content_type, "comment");
        assert_eq!(post.id, PostId(4));
    }
}
