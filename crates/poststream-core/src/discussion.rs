use crate::post::PostId;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscussionId(pub u64);

impl std::fmt::Display for DiscussionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered, gap-tolerant map from 0-based sequence offset to post id.
///
/// A slot is `None` until its identifier is known. Once assigned, a slot is
/// never reassigned to a different id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceIndex {
    slots: Vec<Option<PostId>>,
}

impl SequenceIndex {
    pub fn new(slots: Vec<Option<PostId>>) -> Self {
        Self { slots }
    }

    pub fn from_ids(ids: impl IntoIterator<Item = PostId>) -> Self {
        Self {
            slots: ids.into_iter().map(Some).collect(),
        }
    }

    /// A sequence of `len` unknown slots.
    pub fn unknown(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<PostId> {
        self.slots.get(offset).copied().flatten()
    }

    pub fn position_of(&self, id: PostId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(id))
    }

    pub fn slots(&self, range: Range<usize>) -> &[Option<PostId>] {
        let end = range.end.min(self.slots.len());
        let start = range.start.min(end);
        &self.slots[start..end]
    }

    /// Record `id` at `offset`. Returns false when the slot already holds a
    /// different id or lies past the end.
    pub fn assign(&mut self, offset: usize, id: PostId) -> bool {
        let Some(slot) = self.slots.get_mut(offset) else {
            return false;
        };
        match *slot {
            None => {
                *slot = Some(id);
                true
            }
            Some(existing) if existing == id => true,
            Some(existing) => {
                warn!(offset, %id, existing = %existing, "Sequence slot already assigned");
                false
            }
        }
    }

    /// Replace with an authoritative sequence, keeping ids this index already
    /// knows for slots the new one leaves empty.
    pub fn merge_from(&mut self, incoming: SequenceIndex) {
        let mut slots = incoming.slots;
        for (offset, slot) in slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = self.get(offset);
            }
        }
        debug!(old = self.slots.len(), new = slots.len(), "Merged sequence index");
        self.slots = slots;
    }
}

/// Authoritative metadata snapshot delivered by the discussion collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionMeta {
    pub id: DiscussionId,
    #[serde(default)]
    pub title: String,
    pub post_ids: Vec<Option<PostId>>,
    #[serde(default)]
    pub last_post_number: u64,
    #[serde(default)]
    pub last_read_post_number: u64,
    #[serde(default = "default_can_reply")]
    pub can_reply: bool,
}

fn default_can_reply() -> bool {
    true
}

/// Discussion state owned by one stream.
#[derive(Debug, Clone)]
pub struct Discussion {
    pub id: DiscussionId,
    pub title: String,
    sequence: SequenceIndex,
    last_post_number: u64,
    last_read_post_number: u64,
    can_reply: bool,
}

impl Discussion {
    pub fn from_meta(meta: DiscussionMeta) -> Self {
        Self {
            id: meta.id,
            title: meta.title,
            sequence: SequenceIndex::new(meta.post_ids),
            last_post_number: meta.last_post_number,
            last_read_post_number: meta.last_read_post_number,
            can_reply: meta.can_reply,
        }
    }

    pub fn count(&self) -> usize {
        self.sequence.len()
    }

    pub fn sequence(&self) -> &SequenceIndex {
        &self.sequence
    }

    pub(crate) fn sequence_mut(&mut self) -> &mut SequenceIndex {
        &mut self.sequence
    }

    pub fn can_reply(&self) -> bool {
        self.can_reply
    }

    pub fn last_post_number(&self) -> u64 {
        self.last_post_number
    }

    pub fn last_read_post_number(&self) -> u64 {
        self.last_read_post_number
    }

    pub fn unread_count(&self) -> usize {
        let unread = self
            .last_post_number
            .saturating_sub(self.last_read_post_number);
        (unread as usize).min(self.count())
    }

    /// Advance the read watermark. Returns true if it moved.
    pub fn mark_read(&mut self, number: u64) -> bool {
        if number <= self.last_read_post_number {
            return false;
        }
        self.last_read_post_number = number;
        true
    }

    pub(crate) fn apply_meta(&mut self, meta: DiscussionMeta) {
        self.title = meta.title;
        self.sequence.merge_from(SequenceIndex::new(meta.post_ids));
        self.last_post_number = meta.last_post_number;
        self.last_read_post_number = self.last_read_post_number.max(meta.last_read_post_number);
        self.can_reply = meta.can_reply;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(count: u64) -> DiscussionMeta {
        DiscussionMeta {
            id: DiscussionId(1),
            title: "Thread".to_string(),
            post_ids: (1..=count).map(|id| Some(PostId(id))).collect(),
            last_post_number: count,
            last_read_post_number: 0,
            can_reply: true,
        }
    }

    #[test]
    fn slot_is_assigned_once() {
        let mut sequence = SequenceIndex::unknown(3);
        assert!(sequence.assign(1, PostId(7)));
        assert!(sequence.assign(1, PostId(7)));
        assert!(!sequence.assign(1, PostId(8)));
        assert!(!sequence.assign(5, PostId(9)));
        assert_eq!(sequence.get(1), Some(PostId(7)));
        assert_eq!(sequence.position_of(PostId(7)), Some(1));
    }

    #[test]
    fn merge_keeps_known_ids() {
        let mut sequence = SequenceIndex::new(vec![Some(PostId(1)), None]);
        sequence.assign(1, PostId(2));
        sequence.merge_from(SequenceIndex::new(vec![Some(PostId(1)), None, Some(PostId(3))]));
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.get(1), Some(PostId(2)));
        assert_eq!(sequence.get(2), Some(PostId(3)));
    }

    #[test]
    fn slots_clamp_out_of_range() {
        let sequence = SequenceIndex::from_ids([PostId(1), PostId(2)]);
        assert_eq!(sequence.slots(1..10).len(), 1);
        assert!(sequence.slots(5..10).is_empty());
    }

    #[test]
    fn unread_count_is_bounded_by_count() {
        let mut discussion = Discussion::from_meta(meta(10));
        assert_eq!(discussion.unread_count(), 10);
        assert!(discussion.mark_read(4));
        assert!(!discussion.mark_read(2));
        assert_eq!(discussion.unread_count(), 6);
    }
}
