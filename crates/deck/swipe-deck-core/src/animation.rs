//! Animation capability consumed by the deck.
//!
//! The core only *requests* property animations and reacts to their
//! completion; interpolation is the engine's business. Hosts wire in their
//! toolkit's animator, or use [`TweenEngine`](crate::tween::TweenEngine).
//!
//! Completion is reported back through
//! [`CardStackController::animation_finished`](crate::controller::CardStackController::animation_finished).

use serde::{Deserialize, Serialize};

use crate::geometry::{lerp_f32, Frame, Point};
use crate::ids::{AnimationId, CardId};

/// What an animation acts on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum AnimTarget {
    Card(CardId),
    /// The deck container itself (appear animation).
    Deck,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AnimProperty {
    Center,
    Frame,
    Rotation,
    Scale,
    Opacity,
    OverlayOpacity,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AnimValue {
    Scalar(f32),
    Point(Point),
    Frame(Frame),
}

impl AnimValue {
    /// Blend towards `to`. Mismatched kinds snap to `to`.
    pub fn lerp(&self, to: &AnimValue, t: f32) -> AnimValue {
        match (self, to) {
            (AnimValue::Scalar(a), AnimValue::Scalar(b)) => AnimValue::Scalar(lerp_f32(*a, *b, t)),
            (AnimValue::Point(a), AnimValue::Point(b)) => AnimValue::Point(a.lerp(*b, t)),
            (AnimValue::Frame(a), AnimValue::Frame(b)) => AnimValue::Frame(a.lerp(b, t)),
            _ => *to,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            AnimValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            AnimValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<Frame> {
        match self {
            AnimValue::Frame(f) => Some(*f),
            _ => None,
        }
    }
}

/// Spring tuning in the bounciness/speed vocabulary used by popular UI
/// spring engines.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub bounciness: f32,
    pub speed: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Timing {
    Linear,
    Spring(SpringParams),
}

/// Duration/delay/curve of one animation. Engines without spring support
/// treat `duration` as the fallback length of a spring.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub duration: f32,
    #[serde(default)]
    pub delay: f32,
    pub timing: Timing,
}

impl AnimationSpec {
    pub fn linear(duration: f32) -> Self {
        Self {
            duration,
            delay: 0.0,
            timing: Timing::Linear,
        }
    }

    pub fn spring(params: SpringParams, fallback_duration: f32) -> Self {
        Self {
            duration: fallback_duration,
            delay: 0.0,
            timing: Timing::Spring(params),
        }
    }

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Animate `property` of `target` from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub target: AnimTarget,
    pub property: AnimProperty,
    pub from: AnimValue,
    pub to: AnimValue,
    pub spec: AnimationSpec,
}

/// Host-provided animation executor.
pub trait AnimationEngine {
    /// Start an animation. Starting a new animation on the same
    /// (target, property) supersedes the older one, whose id must then never
    /// be reported as finished.
    fn animate(&mut self, request: AnimationRequest) -> AnimationId;

    /// Drop every in-flight animation on `target` without completing it.
    fn cancel(&mut self, target: AnimTarget);

    /// Current in-flight value, if the property is being animated.
    fn presentation(&self, _target: AnimTarget, _property: AnimProperty) -> Option<AnimValue> {
        None
    }
}

/// Engines the deck can step itself (see
/// [`CardStackController::tick`](crate::controller::CardStackController::tick)).
pub trait TickingEngine: AnimationEngine {
    /// Advance time by `dt` seconds and return the ids that finished.
    fn advance(&mut self, dt: f32) -> Vec<AnimationId>;
}
