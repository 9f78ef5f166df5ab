//! Content-type registry.
//!
//! Posts carry a free-form content-type string. Hosts resolve it to a closed
//! [`PostKind`] once, through a registry validated when entries are added.

use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostKind {
    Comment,
    DiscussionRenamed,
    DiscussionStickied,
    DiscussionLocked,
    DiscussionTagged,
}

impl PostKind {
    pub const ALL: [PostKind; 5] = [
        PostKind::Comment,
        PostKind::DiscussionRenamed,
        PostKind::DiscussionStickied,
        PostKind::DiscussionLocked,
        PostKind::DiscussionTagged,
    ];

    pub fn content_type(self) -> &'static str {
        match self {
            PostKind::Comment => "comment",
            PostKind::DiscussionRenamed => "discussionRenamed",
            PostKind::DiscussionStickied => "discussionStickied",
            PostKind::DiscussionLocked => "discussionLocked",
            PostKind::DiscussionTagged => "discussionTagged",
        }
    }

    /// Event posts render as a single compact line.
    pub fn is_event(self) -> bool {
        !matches!(self, PostKind::Comment)
    }
}

impl std::fmt::Display for PostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PostKind::Comment => "Comment",
            PostKind::DiscussionRenamed => "Renamed",
            PostKind::DiscussionStickied => "Stickied",
            PostKind::DiscussionLocked => "Locked",
            PostKind::DiscussionTagged => "Tagged",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    EmptyContentType,
    InvalidContentType(String),
    Duplicate {
        content_type: String,
        existing: PostKind,
    },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::EmptyContentType => write!(f, "content type must not be empty"),
            RegistryError::InvalidContentType(name) => {
                write!(f, "content type {name:?} contains unsupported characters")
            }
            RegistryError::Duplicate {
                content_type,
                existing,
            } => write!(
                f,
                "content type {content_type:?} is already registered as {existing}"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    kinds: HashMap<String, PostKind>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in kind under its default name.
    pub fn with_defaults() -> Self {
        let kinds = PostKind::ALL
            .into_iter()
            .map(|kind| (kind.content_type().to_string(), kind))
            .collect();
        Self { kinds }
    }

    pub fn register(&mut self, content_type: &str, kind: PostKind) -> Result<(), RegistryError> {
        if content_type.is_empty() {
            return Err(RegistryError::EmptyContentType);
        }
        if !content_type
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            return Err(RegistryError::InvalidContentType(content_type.to_string()));
        }
        if let Some(existing) = self.kinds.get(content_type) {
            return Err(RegistryError::Duplicate {
                content_type: content_type.to_string(),
                existing: *existing,
            });
        }
        debug!(content_type, %kind, "Registered content type");
        self.kinds.insert(content_type.to_string(), kind);
        Ok(())
    }

    /// `None` for unknown types; hosts render those with an empty body.
    pub fn resolve(&self, content_type: &str) -> Option<PostKind> {
        self.kinds.get(content_type).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_builtin_kinds() {
        let registry = ContentRegistry::with_defaults();
        assert_eq!(registry.len(), PostKind::ALL.len());
        assert_eq!(registry.resolve("comment"), Some(PostKind::Comment));
        assert_eq!(
            registry.resolve("discussionLocked"),
            Some(PostKind::DiscussionLocked)
        );
        assert_eq!(registry.resolve("poll"), None);
    }

    #[test]
    fn registration_is_validated() {
        let mut registry = ContentRegistry::with_defaults();
        assert_eq!(
            registry.register("", PostKind::Comment),
            Err(RegistryError::EmptyContentType)
        );
        assert!(matches!(
            registry.register("has space", PostKind::Comment),
            Err(RegistryError::InvalidContentType(_))
        ));
        assert!(matches!(
            registry.register("comment", PostKind::DiscussionTagged),
            Err(RegistryError::Duplicate { existing: PostKind::Comment, .. })
        ));
        assert_eq!(registry.register("legacy_comment", PostKind::Comment), Ok(()));
        assert_eq!(registry.resolve("legacy_comment"), Some(PostKind::Comment));
    }

    #[test]
    fn error_messages_name_the_type() {
        let err = RegistryError::Duplicate {
            content_type: "comment".to_string(),
            existing: PostKind::Comment,
        };
        assert_eq!(
            err.to_string(),
            "content type \"comment\" is already registered as Comment"
        );
    }
}
