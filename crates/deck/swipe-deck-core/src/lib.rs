//! Swipe Deck Core (toolkit-agnostic)
//!
//! Logic for a stack of swipeable cards: stacked-slot geometry, a per-card
//! drag state machine, and a controller that virtualizes host content into
//! a small visible window. Rendering, gesture recognition and animation
//! playback belong to the host; adapters (Bevy/WASM) bridge them in through
//! [`DeckDataSource`], [`AnimationEngine`] and [`Renderable`].

pub mod animation;
pub mod card;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod host;
pub mod ids;
pub mod overlay;
pub mod tween;

// Re-exports for consumers (adapters)
pub use animation::{
    AnimProperty, AnimTarget, AnimValue, AnimationEngine, AnimationRequest, AnimationSpec,
    SpringParams, TickingEngine, Timing,
};
pub use card::{drag_pose, CardSignal, DragPhase, DragPose, DraggableCard, SwipeDirection};
pub use config::{DeckConfig, DragConfig};
pub use controller::CardStackController;
pub use error::DeckError;
pub use geometry::{drag_progress, Frame, Point, Size, StackGeometry};
pub use host::{
    CardRender, CardSnapshot, DeckDataSource, DeckDelegate, DeckEvent, DeckFlags, DeckState,
    EventQueue, Renderable, SnapshotRenderer,
};
pub use ids::{AnimationId, CardId};
pub use overlay::OverlayMode;
pub use tween::TweenEngine;
