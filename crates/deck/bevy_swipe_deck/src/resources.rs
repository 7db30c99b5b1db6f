use bevy::prelude::*;
use swipe_deck_core::{DeckDataSource, EventQueue};

/// One card face: a solid color plus an optional tint shown while dragged.
#[derive(Clone, Debug, PartialEq)]
pub struct CardFace {
    pub color: Color,
    pub overlay: Option<Color>,
}

impl CardFace {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: Color) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

/// Vector-backed data source. Edit `faces` through `DeckResource` and send
/// `DeckCommand::Reload` to pick the change up.
#[derive(Clone, Debug, Default)]
pub struct SpriteDeckSource {
    pub faces: Vec<CardFace>,
}

impl DeckDataSource for SpriteDeckSource {
    type Content = Color;
    type Overlay = Color;

    fn card_count(&self) -> usize {
        self.faces.len()
    }

    fn content_for_index(&mut self, index: usize) -> Color {
        self.faces.get(index).map_or(Color::NONE, |f| f.color)
    }

    fn overlay_for_index(&mut self, index: usize) -> Option<Color> {
        self.faces.get(index).and_then(|f| f.overlay)
    }
}

/// Where the deck container sits: its size in logical pixels (centered in
/// the primary window and on the world origin) and the base z of its sprites.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DeckLayout {
    pub size: Vec2,
    pub z: f32,
}

impl Default for DeckLayout {
    fn default() -> Self {
        Self {
            size: Vec2::new(320.0, 480.0),
            z: 0.0,
        }
    }
}

/// Mouse press being tracked as a card drag.
#[derive(Resource, Debug, Default)]
pub struct PointerDrag {
    /// Cursor position (window coordinates) at the press.
    pub start: Option<Vec2>,
    /// Set once the pointer left the tap slop.
    pub moved: bool,
}

/// Events emitted by the core, drained into Bevy events every frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct DeckEventQueue(pub EventQueue);
