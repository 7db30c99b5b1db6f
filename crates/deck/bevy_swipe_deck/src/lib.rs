use bevy::prelude::*;
use swipe_deck_core::{
    CardStackController, DeckConfig, DeckDelegate, DeckEvent, DeckFlags, Size, SwipeDirection,
    TweenEngine,
};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::DeckCard;
pub use resources::{CardFace, DeckEventQueue, DeckLayout, PointerDrag, SpriteDeckSource};

pub type SpriteDeck = CardStackController<SpriteDeckSource, TweenEngine>;

#[derive(Resource)]
pub struct DeckResource(pub SpriteDeck);

/// Core deck events re-sent as Bevy events.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DeckNotification(pub DeckEvent);

/// Programmatic deck actions.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum DeckCommand {
    Swipe(SwipeDirection),
    Revert,
    Reload,
    ResetToStart,
    /// New container size in logical pixels.
    Resize(Vec2),
}

pub struct SwipeDeckPlugin {
    pub config: DeckConfig,
    pub flags: DeckFlags,
    pub layout: DeckLayout,
    pub faces: Vec<CardFace>,
}

impl Default for SwipeDeckPlugin {
    fn default() -> Self {
        Self {
            config: DeckConfig::default(),
            flags: DeckFlags::default(),
            layout: DeckLayout::default(),
            faces: Vec::new(),
        }
    }
}

impl Plugin for SwipeDeckPlugin {
    fn build(&self, app: &mut App) {
        let (delegate, events) = DeckDelegate::queued(self.flags);
        let core = match CardStackController::new(self.config.clone(), TweenEngine::new()) {
            Ok(core) => core,
            Err(e) => {
                error!("swipe deck disabled: {e}");
                return;
            }
        };
        let mut core = core
            .with_delegate(delegate)
            .with_container_size(Size::new(self.layout.size.x, self.layout.size.y));
        core.set_data_source(SpriteDeckSource {
            faces: self.faces.clone(),
        });

        app.insert_resource(DeckResource(core))
            .insert_resource(DeckEventQueue(events))
            .insert_resource(self.layout)
            .insert_resource(PointerDrag::default())
            .add_event::<DeckCommand>()
            .add_event::<DeckNotification>()
            .add_systems(
                Update,
                (
                    systems::apply_deck_commands_system,
                    systems::pointer_input_system,
                    systems::tick_deck_system,
                    systems::forward_deck_events_system,
                    systems::sync_card_sprites_system,
                )
                    .chain()
                    .run_if(resource_exists::<DeckResource>),
            );
    }
}
