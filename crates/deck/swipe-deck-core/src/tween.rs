//! Reference [`AnimationEngine`]: a fixed-step tween runner for hosts
//! without an animation library of their own.
//!
//! Timing functions:
//! - linear: straight blend over the duration
//! - spring: damped harmonic response derived from bounciness/speed,
//!   corrected so it lands exactly on the target at the duration

use crate::animation::{
    AnimProperty, AnimTarget, AnimValue, AnimationEngine, AnimationRequest, SpringParams,
    TickingEngine, Timing,
};
use crate::ids::{AnimationId, IdAllocator};

#[derive(Debug, Clone)]
struct Tween {
    id: AnimationId,
    request: AnimationRequest,
    elapsed: f32,
}

impl Tween {
    /// Normalized progress in [0, 1]; `None` while still inside the delay.
    fn progress(&self) -> Option<f32> {
        let local = self.elapsed - self.request.spec.delay;
        if local < 0.0 {
            return None;
        }
        let duration = self.request.spec.duration;
        if duration <= 0.0 {
            return Some(1.0);
        }
        Some((local / duration).min(1.0))
    }

    fn value(&self) -> AnimValue {
        let Some(p) = self.progress() else {
            return self.request.from;
        };
        let eased = match self.request.spec.timing {
            Timing::Linear => p,
            Timing::Spring(params) => spring_response(params, p, self.request.spec.duration),
        };
        self.request.from.lerp(&self.request.to, eased)
    }
}

/// Damped spring step response at normalized time `p`, scaled so that
/// `spring_response(_, 0, _) == 0` and `spring_response(_, 1, _) == 1`.
pub fn spring_response(params: SpringParams, p: f32, duration: f32) -> f32 {
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 || duration <= 0.0 {
        return 1.0;
    }
    let raw = |tau: f32| -> f32 {
        // bounciness 0 => critically damped, 20 => zeta 0.3
        let zeta = 1.0 - (params.bounciness / 20.0).clamp(0.0, 1.0) * 0.7;
        let wn = (4.0 + params.speed.max(0.0) / 2.0) / duration;
        if zeta >= 1.0 {
            1.0 - (-wn * tau).exp() * (1.0 + wn * tau)
        } else {
            let wd = wn * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * wn * tau).exp();
            1.0 - decay * ((wd * tau).cos() + zeta * wn / wd * (wd * tau).sin())
        }
    };
    let end_error = 1.0 - raw(duration);
    raw(p * duration) + end_error * p
}

/// Runs tweens in start order; advance with [`TickingEngine::advance`].
#[derive(Debug, Default)]
pub struct TweenEngine {
    ids: IdAllocator,
    tweens: Vec<Tween>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tweens still running (including delayed ones).
    pub fn active(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl AnimationEngine for TweenEngine {
    fn animate(&mut self, request: AnimationRequest) -> AnimationId {
        self.tweens
            .retain(|t| !(t.request.target == request.target && t.request.property == request.property));
        let id = self.ids.alloc_anim();
        self.tweens.push(Tween {
            id,
            request,
            elapsed: 0.0,
        });
        id
    }

    fn cancel(&mut self, target: AnimTarget) {
        self.tweens.retain(|t| t.request.target != target);
    }

    fn presentation(&self, target: AnimTarget, property: AnimProperty) -> Option<AnimValue> {
        self.tweens
            .iter()
            .rev()
            .find(|t| t.request.target == target && t.request.property == property)
            .map(Tween::value)
    }
}

impl TickingEngine for TweenEngine {
    fn advance(&mut self, dt: f32) -> Vec<AnimationId> {
        let dt = dt.max(0.0);
        let mut finished = Vec::new();
        self.tweens.retain_mut(|t| {
            t.elapsed += dt;
            if t.progress().is_some_and(|p| p >= 1.0) {
                finished.push(t.id);
                false
            } else {
                true
            }
        });
        finished
    }
}
