use bevy::prelude::*;
use swipe_deck_core::CardId;

/// Sprite entity mirroring one deck card. Spawned and despawned by
/// `sync_card_sprites_system`; do not add it by hand.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckCard {
    pub id: CardId,
}
