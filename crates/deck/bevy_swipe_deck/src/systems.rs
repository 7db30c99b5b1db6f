use bevy::color::Srgba;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use swipe_deck_core::{CardId, CardRender, DeckState, OverlayMode, Point, Renderable, Size};

use crate::components::DeckCard;
use crate::resources::{DeckEventQueue, DeckLayout, PointerDrag};
use crate::{DeckCommand, DeckNotification, DeckResource, SpriteDeck};

/// Depth step between stacked sprites.
const Z_STEP: f32 = 0.01;

/// Window cursor (top-left origin, y down) to deck container coordinates,
/// with the container centered in the window.
pub fn window_to_container(cursor: Vec2, window: Vec2, container: Vec2) -> Vec2 {
    cursor - (window - container) / 2.0
}

/// Deck container point to a world position for a camera centered on the
/// container (y up).
pub fn container_to_world(p: Point, container: Vec2) -> Vec2 {
    Vec2::new(p.x - container.x / 2.0, container.y / 2.0 - p.y)
}

/// Card color with the drag overlay blended in by its opacity.
fn card_color(card: &CardRender<'_, Color, Color>, deck: &DeckState) -> Color {
    let base = card.content.to_srgba();
    let tinted = match (card.overlay_mode, card.overlay) {
        (OverlayMode::None, _) | (_, None) => base,
        (_, Some(overlay)) => {
            let o = overlay.to_srgba();
            let t = card.overlay_opacity.clamp(0.0, 1.0);
            Srgba::new(
                base.red + (o.red - base.red) * t,
                base.green + (o.green - base.green) * t,
                base.blue + (o.blue - base.blue) * t,
                base.alpha,
            )
        }
    };
    Color::srgba(
        tinted.red,
        tinted.green,
        tinted.blue,
        tinted.alpha * card.opacity * deck.opacity,
    )
}

#[derive(Debug, Clone, Copy)]
struct SpritePose {
    id: CardId,
    transform: Transform,
    size: Vec2,
    color: Color,
    hidden: bool,
}

/// Collects one pose per card in draw order (back to front).
struct SpriteCollector {
    layout: DeckLayout,
    deck: DeckState,
    poses: Vec<SpritePose>,
}

impl SpriteCollector {
    fn new(layout: DeckLayout) -> Self {
        Self {
            layout,
            deck: DeckState::default(),
            poses: Vec::new(),
        }
    }
}

impl Renderable<Color, Color> for SpriteCollector {
    fn render_deck(&mut self, deck: &DeckState) {
        self.deck = *deck;
    }

    fn render_card(&mut self, card: &CardRender<'_, Color, Color>) {
        let world = container_to_world(card.center, self.layout.size) * self.deck.scale;
        let z = self.layout.z + self.poses.len() as f32 * Z_STEP;
        let scale = card.scale * self.deck.scale;
        self.poses.push(SpritePose {
            id: card.id,
            transform: Transform {
                translation: world.extend(z),
                // y flips between container and world, so does the turn
                rotation: Quat::from_rotation_z(-card.rotation),
                scale: Vec3::new(scale, scale, 1.0),
            },
            size: Vec2::new(card.frame.width(), card.frame.height()),
            color: card_color(card, &self.deck),
            hidden: card.hidden,
        });
    }
}

fn visibility(hidden: bool) -> Visibility {
    if hidden {
        Visibility::Hidden
    } else {
        Visibility::Inherited
    }
}

pub fn apply_deck_commands_system(
    mut commands: EventReader<DeckCommand>,
    mut deck: ResMut<DeckResource>,
    mut layout: ResMut<DeckLayout>,
) {
    for command in commands.read() {
        match command {
            DeckCommand::Swipe(direction) => deck.0.swipe(*direction),
            DeckCommand::Revert => deck.0.revert(),
            DeckCommand::Reload => deck.0.reload(),
            DeckCommand::ResetToStart => deck.0.reset_to_start(),
            DeckCommand::Resize(size) => {
                layout.size = *size;
                deck.0.on_container_resized(Size::new(size.x, size.y));
            }
        }
    }
}

/// Press at `cursor` (window coordinates), `point` being the same position in
/// container coordinates. Presses outside the front card are ignored.
pub fn pointer_pressed(deck: &mut SpriteDeck, drag: &mut PointerDrag, cursor: Vec2, point: Vec2) {
    let point = Point::new(point.x, point.y);
    let on_front = deck
        .visible_cards()
        .first()
        .is_some_and(|card| card.frame().with_center(card.center()).contains(point));
    if on_front && deck.drag_began(point) {
        drag.start = Some(cursor);
        drag.moved = false;
    }
}

/// Pointer still down at `cursor`. Movement inside the tap slop is ignored.
pub fn pointer_held(deck: &mut SpriteDeck, drag: &mut PointerDrag, cursor: Vec2) {
    let Some(start) = drag.start else {
        return;
    };
    let delta = cursor - start;
    if !drag.moved && delta.length() > deck.config().drag.tap_slop {
        drag.moved = true;
    }
    if drag.moved {
        deck.drag_moved(delta.x, delta.y);
    }
}

/// Pointer up: end the drag, and report a tap if it never left the slop.
pub fn pointer_released(deck: &mut SpriteDeck, drag: &mut PointerDrag) {
    if drag.start.take().is_none() {
        return;
    }
    let tapped = !std::mem::take(&mut drag.moved);
    deck.drag_ended();
    if tapped {
        deck.tap();
    }
}

/// Left mouse button drives the front card. Skipped when no input plugin
/// or primary window is present.
pub fn pointer_input_system(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<DeckLayout>,
    mut deck: ResMut<DeckResource>,
    mut drag: ResMut<PointerDrag>,
) {
    let Some(buttons) = buttons else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    let cursor = window.cursor_position();

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(cursor) = cursor {
            let window_size = Vec2::new(window.width(), window.height());
            let point = window_to_container(cursor, window_size, layout.size);
            pointer_pressed(&mut deck.0, &mut drag, cursor, point);
        }
    } else if buttons.pressed(MouseButton::Left) {
        if let Some(cursor) = cursor {
            pointer_held(&mut deck.0, &mut drag, cursor);
        }
    } else {
        pointer_released(&mut deck.0, &mut drag);
    }
}

pub fn tick_deck_system(mut deck: ResMut<DeckResource>, time: Res<Time>) {
    deck.0.tick(time.delta_seconds());
}

pub fn forward_deck_events_system(
    queue: Res<DeckEventQueue>,
    mut notifications: EventWriter<DeckNotification>,
) {
    for event in queue.0.drain() {
        notifications.send(DeckNotification(event));
    }
}

/// Mirror the deck into sprites: update existing ones, spawn new cards and
/// despawn cards that left the deck.
pub fn sync_card_sprites_system(
    mut commands: Commands,
    deck: Res<DeckResource>,
    layout: Res<DeckLayout>,
    mut sprites: Query<(
        Entity,
        &DeckCard,
        &mut Transform,
        &mut Sprite,
        &mut Visibility,
    )>,
) {
    let mut collector = SpriteCollector::new(*layout);
    deck.0.render(&mut collector);

    let mut present: Vec<CardId> = Vec::with_capacity(collector.poses.len());
    for (entity, card, mut transform, mut sprite, mut vis) in &mut sprites {
        let Some(pose) = collector.poses.iter().find(|p| p.id == card.id) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };
        *transform = pose.transform;
        sprite.color = pose.color;
        sprite.custom_size = Some(pose.size);
        *vis = visibility(pose.hidden);
        present.push(card.id);
    }

    for pose in collector.poses.iter().filter(|p| !present.contains(&p.id)) {
        commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: pose.color,
                    custom_size: Some(pose.size),
                    ..default()
                },
                transform: pose.transform,
                visibility: visibility(pose.hidden),
                ..default()
            },
            DeckCard { id: pose.id },
        ));
    }
}
