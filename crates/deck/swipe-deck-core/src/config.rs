//! Deck configuration: stacking geometry, opacities, durations and drag tuning.

use serde::{Deserialize, Serialize};

use crate::animation::SpringParams;
use crate::error::{DeckError, Result};

/// Tuning for a single draggable card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Rotation (radians) reached at a full card-width displacement.
    pub max_rotation: f32,
    /// Smallest scale a card shrinks to while dragged.
    pub min_scale: f32,
    /// Fixed rotation (radians) applied to programmatic swipes.
    pub programmatic_rotation: f32,
    /// Spring used to return a released card to its anchor.
    pub reset_spring: SpringParams,
    /// Duration of the rotation/scale/overlay reset, and the fallback for
    /// engines without spring support.
    pub reset_duration: f32,
    /// Pointer travel (px) under which a press-release is treated as a tap.
    pub tap_slop: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            max_rotation: std::f32::consts::PI / 10.0,
            min_scale: 0.8,
            programmatic_rotation: std::f32::consts::FRAC_PI_4,
            reset_spring: SpringParams {
                bounciness: 10.0,
                speed: 20.0,
            },
            reset_duration: 0.2,
            tap_slop: 4.0,
        }
    }
}

/// Configuration for the whole deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Number of cards kept in the visible window.
    pub visible_capacity: usize,
    /// Vertical step between stacked card bottoms.
    pub background_top_margin: f32,
    /// Size ratio between a slot and the slot in front of it.
    pub background_scale: f32,

    pub alpha_opaque: f32,
    pub alpha_transparent: f32,
    pub alpha_semi_transparent: f32,

    /// Background re-layout after advance, reset or revert (seconds).
    pub background_frame_duration: f32,
    /// Fling-off duration for committed and programmatic swipes (seconds).
    pub swipe_duration: f32,
    /// Fade-in of a card restored by revert (seconds).
    pub revert_duration: f32,
    /// Deck appear animation duration (seconds).
    pub appear_duration: f32,
    /// Starting scale of the deck appear animation.
    pub appear_scale_from: f32,

    /// Overrides the width used for off-screen fling targets. Defaults to the
    /// container width.
    pub screen_width: Option<f32>,

    pub drag: DragConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            visible_capacity: 3,
            background_top_margin: 4.0,
            background_scale: 0.95,
            alpha_opaque: 1.0,
            alpha_transparent: 0.0,
            alpha_semi_transparent: 0.7,
            background_frame_duration: 0.2,
            swipe_duration: 0.4,
            revert_duration: 1.0,
            appear_duration: 0.8,
            appear_scale_from: 0.1,
            screen_width: None,
            drag: DragConfig::default(),
        }
    }
}

fn check_unit(field: &'static str, v: f32) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(DeckError::invalid(field, format!("{v} is outside [0, 1]")))
    }
}

fn check_duration(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(DeckError::invalid(field, format!("{v} is not a non-negative duration")))
    }
}

impl DeckConfig {
    /// Parse a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: DeckConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.visible_capacity == 0 {
            return Err(DeckError::invalid("visible_capacity", "must be at least 1"));
        }
        if !(self.background_scale > 0.0 && self.background_scale <= 1.0) {
            return Err(DeckError::invalid(
                "background_scale",
                format!("{} is outside (0, 1]", self.background_scale),
            ));
        }
        if !self.background_top_margin.is_finite() || self.background_top_margin < 0.0 {
            return Err(DeckError::invalid(
                "background_top_margin",
                "must be a non-negative number",
            ));
        }
        check_unit("alpha_opaque", self.alpha_opaque)?;
        check_unit("alpha_transparent", self.alpha_transparent)?;
        check_unit("alpha_semi_transparent", self.alpha_semi_transparent)?;
        check_duration("background_frame_duration", self.background_frame_duration)?;
        check_duration("swipe_duration", self.swipe_duration)?;
        check_duration("revert_duration", self.revert_duration)?;
        check_duration("appear_duration", self.appear_duration)?;
        check_duration("drag.reset_duration", self.drag.reset_duration)?;
        if !(self.drag.min_scale > 0.0 && self.drag.min_scale <= 1.0) {
            return Err(DeckError::invalid(
                "drag.min_scale",
                format!("{} is outside (0, 1]", self.drag.min_scale),
            ));
        }
        if let Some(w) = self.screen_width {
            if !(w.is_finite() && w > 0.0) {
                return Err(DeckError::invalid("screen_width", "must be positive"));
            }
        }
        Ok(())
    }
}
