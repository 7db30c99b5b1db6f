//! DraggableCard: one card's live drag state.
//!
//! `Idle -> Dragging -> {Committing, Resetting} -> Idle`
//!
//! The card owns its transient [`DragSession`] and a model of its visual
//! properties. Animated properties are written to the model at their end
//! value as soon as the animation is requested; renderers overlay the
//! engine's presentation values while an animation is in flight.

use serde::{Deserialize, Serialize};

use crate::animation::{
    AnimProperty, AnimTarget, AnimValue, AnimationEngine, AnimationRequest, AnimationSpec,
};
use crate::config::{DeckConfig, DragConfig};
use crate::geometry::{drag_progress, Frame, Point};
use crate::ids::{AnimationId, CardId};
use crate::overlay::OverlayMode;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }

    /// Direction of a horizontal displacement; zero counts as left.
    #[inline]
    pub fn from_dx(dx: f32) -> Self {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DragPhase {
    Idle,
    Dragging,
    Committing(SwipeDirection),
    Resetting,
}

/// State of one press-drag-release cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSession {
    pub origin_center: Point,
    pub translation: Point,
    /// +1 pivots as if held by the top half, -1 by the bottom half.
    pub rotation_direction: f32,
}

/// Signals a card reports to the deck.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CardSignal {
    Dragged {
        percent: f32,
        direction: SwipeDirection,
    },
    Swiped(SwipeDirection),
    Reset,
    Tapped,
}

/// What a finished card animation means for the card.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CardCompletion {
    /// The fling off-screen ended; the card can be detached.
    SwipedOff,
    /// The spring back to the anchor ended.
    ResetSettled,
}

/// Result of a card operation: an optional signal for the deck and an
/// optional animation whose completion must be routed back via
/// [`DraggableCard::finish`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CardReaction {
    pub signal: Option<CardSignal>,
    pub completion: Option<(AnimationId, CardCompletion)>,
}

/// Transform derived from a horizontal displacement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragPose {
    pub rotation: f32,
    pub scale: f32,
    pub overlay_mode: OverlayMode,
    pub overlay_opacity: f32,
    pub percent: f32,
    pub direction: SwipeDirection,
}

/// Pure mapping from displacement to pose.
pub fn drag_pose(dx: f32, width: f32, rotation_direction: f32, cfg: &DragConfig) -> DragPose {
    let ratio = if width > 0.0 { dx / width } else { 0.0 };
    let strength = ratio.clamp(-1.0, 1.0);
    let scale = (1.0 - (1.0 - cfg.min_scale) * strength.abs()).max(cfg.min_scale);
    DragPose {
        rotation: rotation_direction * cfg.max_rotation * strength,
        scale,
        overlay_mode: if dx > 0.0 {
            OverlayMode::Right
        } else {
            OverlayMode::Left
        },
        // fully visible at half-width displacement
        overlay_opacity: (2.0 * ratio.abs()).clamp(0.0, 1.0),
        percent: drag_progress(dx, width),
        direction: SwipeDirection::from_dx(dx),
    }
}

#[derive(Debug)]
pub struct DraggableCard<C, O> {
    id: CardId,
    content: C,
    overlay: Option<O>,

    frame: Frame,
    center: Point,
    rotation: f32,
    scale: f32,
    opacity: f32,
    overlay_opacity: f32,
    overlay_mode: OverlayMode,
    hidden: bool,
    interactive: bool,

    anchor: Option<Point>,
    phase: DragPhase,
    session: Option<DragSession>,
}

impl<C, O> DraggableCard<C, O> {
    pub fn new(id: CardId, content: C, overlay: Option<O>, frame: Frame) -> Self {
        Self {
            id,
            content,
            overlay,
            frame,
            center: frame.center(),
            rotation: 0.0,
            scale: 1.0,
            opacity: 1.0,
            overlay_opacity: 0.0,
            overlay_mode: OverlayMode::None,
            hidden: false,
            interactive: true,
            anchor: None,
            phase: DragPhase::Idle,
            session: None,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn overlay(&self) -> Option<&O> {
        self.overlay.as_ref()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.overlay_opacity
    }

    pub fn overlay_mode(&self) -> OverlayMode {
        self.overlay_mode
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Drag anchor, captured on the first drag after the last layout.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Half the card width; releases beyond it commit.
    pub fn action_margin(&self) -> f32 {
        self.frame.width() / 2.0
    }

    /// Re-bind to new host content; the overlay starts hidden.
    pub fn configure(&mut self, content: C, overlay: Option<O>) {
        self.content = content;
        self.overlay = overlay;
        self.overlay_opacity = 0.0;
        self.overlay_mode = OverlayMode::None;
    }

    /// Place the card at `frame` immediately. Idle cards are re-anchored.
    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
        self.center = frame.center();
        if self.phase == DragPhase::Idle {
            self.anchor = None;
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    fn target(&self) -> AnimTarget {
        AnimTarget::Card(self.id)
    }

    fn animate<E: AnimationEngine + ?Sized>(
        &self,
        engine: &mut E,
        property: AnimProperty,
        from: AnimValue,
        to: AnimValue,
        spec: AnimationSpec,
    ) -> AnimationId {
        engine.animate(AnimationRequest {
            target: self.target(),
            property,
            from,
            to,
            spec,
        })
    }

    /// Animate the layout frame to `frame` (center follows).
    pub fn animate_frame<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        frame: Frame,
        spec: AnimationSpec,
    ) -> AnimationId {
        let id = self.animate(
            engine,
            AnimProperty::Frame,
            AnimValue::Frame(self.frame),
            AnimValue::Frame(frame),
            spec,
        );
        self.set_frame(frame);
        id
    }

    pub fn animate_opacity<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        from: f32,
        to: f32,
        spec: AnimationSpec,
    ) -> AnimationId {
        let id = self.animate(
            engine,
            AnimProperty::Opacity,
            AnimValue::Scalar(from),
            AnimValue::Scalar(to),
            spec,
        );
        self.opacity = to;
        id
    }

    /// Press on the card. `touch` is in container coordinates.
    ///
    /// Returns `false` when the press is ignored (already dragging or flying
    /// off). A press during a reset freezes the card at its presented pose
    /// and cancels the reset animations.
    pub fn drag_began<E: AnimationEngine + ?Sized>(&mut self, engine: &mut E, touch: Point) -> bool {
        match self.phase {
            DragPhase::Dragging | DragPhase::Committing(_) => return false,
            DragPhase::Resetting => {
                self.adopt_presentation(engine);
                engine.cancel(self.target());
            }
            DragPhase::Idle => {}
        }
        let anchor = *self.anchor.get_or_insert(self.center);
        let local_y = touch.y - (self.center.y - self.frame.height() / 2.0);
        let rotation_direction = if local_y >= self.frame.height() / 2.0 {
            -1.0
        } else {
            1.0
        };
        self.session = Some(DragSession {
            origin_center: anchor,
            translation: Point::ZERO,
            rotation_direction,
        });
        self.phase = DragPhase::Dragging;
        log::trace!("card {:?} drag began (direction {rotation_direction})", self.id);
        true
    }

    /// Copy in-flight values into the model so cancelling does not snap.
    fn adopt_presentation<E: AnimationEngine + ?Sized>(&mut self, engine: &E) {
        let target = self.target();
        let scalar = |property| {
            engine
                .presentation(target, property)
                .and_then(|v| v.as_scalar())
        };
        if let Some(center) = engine
            .presentation(target, AnimProperty::Center)
            .and_then(|v| v.as_point())
        {
            self.center = center;
        }
        if let Some(rotation) = scalar(AnimProperty::Rotation) {
            self.rotation = rotation;
        }
        if let Some(scale) = scalar(AnimProperty::Scale) {
            self.scale = scale;
        }
        if let Some(opacity) = scalar(AnimProperty::OverlayOpacity) {
            self.overlay_opacity = opacity;
        }
    }

    /// Pointer moved by (dx, dy) since the press.
    pub fn drag_moved(&mut self, dx: f32, dy: f32, cfg: &DragConfig) -> Option<CardSignal> {
        let session = self.session.as_mut()?;
        if self.phase != DragPhase::Dragging {
            return None;
        }
        session.translation = Point::new(dx, dy);
        let pose = drag_pose(dx, self.frame.width(), session.rotation_direction, cfg);
        self.center = session.origin_center.offset(dx, dy);
        self.rotation = pose.rotation;
        self.scale = pose.scale;
        if self.overlay.is_some() {
            self.overlay_mode = pose.overlay_mode;
            self.overlay_opacity = pose.overlay_opacity;
        }
        Some(CardSignal::Dragged {
            percent: pose.percent,
            direction: pose.direction,
        })
    }

    /// Pointer released: commit beyond the action margin, otherwise reset.
    pub fn drag_ended<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        cfg: &DeckConfig,
        screen_width: f32,
    ) -> CardReaction {
        if self.phase != DragPhase::Dragging {
            return CardReaction::default();
        }
        let Some(session) = self.session.take() else {
            return CardReaction::default();
        };
        let dx = session.translation.x;
        let margin = self.action_margin();
        if dx > margin {
            self.commit(engine, SwipeDirection::Right, session, cfg, screen_width)
        } else if dx < -margin {
            self.commit(engine, SwipeDirection::Left, session, cfg, screen_width)
        } else {
            self.reset(engine, session.origin_center, &cfg.drag)
        }
    }

    fn commit<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        direction: SwipeDirection,
        session: DragSession,
        cfg: &DeckConfig,
        screen_width: f32,
    ) -> CardReaction {
        let finish = Point::new(
            direction.sign() * 2.0 * screen_width,
            session.origin_center.y + session.translation.y,
        );
        self.overlay_mode = match direction {
            SwipeDirection::Left => OverlayMode::Left,
            SwipeDirection::Right => OverlayMode::Right,
        };
        self.overlay_opacity = 1.0;
        let id = self.fly_to(engine, finish, AnimationSpec::linear(cfg.swipe_duration));
        self.phase = DragPhase::Committing(direction);
        log::debug!("card {:?} committed {direction:?}", self.id);
        CardReaction {
            signal: Some(CardSignal::Swiped(direction)),
            completion: Some((id, CardCompletion::SwipedOff)),
        }
    }

    fn fly_to<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        finish: Point,
        spec: AnimationSpec,
    ) -> AnimationId {
        let id = self.animate(
            engine,
            AnimProperty::Center,
            AnimValue::Point(self.center),
            AnimValue::Point(finish),
            spec,
        );
        self.center = finish;
        id
    }

    fn reset<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        anchor: Point,
        cfg: &DragConfig,
    ) -> CardReaction {
        let settle = AnimationSpec::spring(cfg.reset_spring, cfg.reset_duration);
        let id = self.fly_to(engine, anchor, settle);

        let linear = AnimationSpec::linear(cfg.reset_duration);
        self.animate(
            engine,
            AnimProperty::Rotation,
            AnimValue::Scalar(self.rotation),
            AnimValue::Scalar(0.0),
            linear,
        );
        self.animate(
            engine,
            AnimProperty::Scale,
            AnimValue::Scalar(self.scale),
            AnimValue::Scalar(1.0),
            linear,
        );
        if self.overlay.is_some() {
            self.animate(
                engine,
                AnimProperty::OverlayOpacity,
                AnimValue::Scalar(self.overlay_opacity),
                AnimValue::Scalar(0.0),
                linear,
            );
        }
        self.rotation = 0.0;
        self.scale = 1.0;
        self.overlay_opacity = 0.0;
        self.phase = DragPhase::Resetting;
        log::trace!("card {:?} resetting", self.id);
        CardReaction {
            signal: Some(CardSignal::Reset),
            completion: Some((id, CardCompletion::ResetSettled)),
        }
    }

    /// Programmatic swipe; only honoured while idle.
    pub fn swipe<E: AnimationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        direction: SwipeDirection,
        cfg: &DeckConfig,
        screen_width: f32,
    ) -> Option<CardReaction> {
        if self.phase != DragPhase::Idle {
            return None;
        }
        let finish = Point::new(direction.sign() * 2.0 * screen_width, self.center.y);
        let spec = AnimationSpec::linear(cfg.swipe_duration);
        let id = self.fly_to(engine, finish, spec);
        let angle = direction.sign() * cfg.drag.programmatic_rotation;
        self.animate(
            engine,
            AnimProperty::Rotation,
            AnimValue::Scalar(self.rotation),
            AnimValue::Scalar(angle),
            spec,
        );
        self.rotation = angle;
        self.phase = DragPhase::Committing(direction);
        log::debug!("card {:?} swiped {direction:?} programmatically", self.id);
        Some(CardReaction {
            signal: Some(CardSignal::Swiped(direction)),
            completion: Some((id, CardCompletion::SwipedOff)),
        })
    }

    pub fn tap(&self) -> CardSignal {
        CardSignal::Tapped
    }

    /// Route a finished animation back to the card.
    pub fn finish(&mut self, completion: CardCompletion) {
        match completion {
            CardCompletion::SwipedOff => {
                self.phase = DragPhase::Idle;
            }
            CardCompletion::ResetSettled => {
                if self.phase == DragPhase::Resetting {
                    self.phase = DragPhase::Idle;
                }
            }
        }
    }
}
