//! Identifiers and simple allocators for deck entities.

use serde::{Deserialize, Serialize};

/// Identity of one card view. A card keeps its id while it is re-bound to
/// new content; ids are never reused by the allocator that produced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u32);

/// Handle returned by an [`AnimationEngine`](crate::animation::AnimationEngine)
/// for one in-flight property animation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

/// Monotonic allocator for CardId and AnimationId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_card: u32,
    next_anim: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_card(&mut self) -> CardId {
        let id = CardId(self.next_card);
        self.next_card = self.next_card.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_anim(&mut self) -> AnimationId {
        let id = AnimationId(self.next_anim);
        self.next_anim = self.next_anim.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_card(), CardId(0));
        assert_eq!(alloc.alloc_card(), CardId(1));
        assert_eq!(alloc.alloc_anim(), AnimationId(0));
        assert_eq!(alloc.alloc_anim(), AnimationId(1));
        assert_eq!(alloc.alloc_card(), CardId(2));
    }
}
