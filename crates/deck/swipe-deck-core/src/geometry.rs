//! Pure geometry for the stacked card layout.
//!
//! Coordinates follow the host container: origin at the top-left corner,
//! y growing downwards. Every function here is deterministic so callers can
//! use the results directly as animation targets.

use serde::{Deserialize, Serialize};

use crate::config::DeckConfig;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point::new(lerp_f32(self.x, to.x, t), lerp_f32(self.y, to.y, t))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle: origin (top-left) plus size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub origin: Point,
    pub size: Size,
}

impl Frame {
    pub const ZERO: Frame = Frame {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Same size, moved so that its center sits at `center`.
    #[inline]
    pub fn with_center(&self, center: Point) -> Frame {
        Frame::new(
            center.x - self.size.width / 2.0,
            center.y - self.size.height / 2.0,
            self.size.width,
            self.size.height,
        )
    }

    /// Inclusive of the top/left edges, exclusive of the bottom/right ones.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.width
            && p.y < self.origin.y + self.size.height
    }

    /// Component-wise linear interpolation of origin and size.
    pub fn lerp(&self, to: &Frame, t: f32) -> Frame {
        Frame::new(
            lerp_f32(self.origin.x, to.origin.x, t),
            lerp_f32(self.origin.y, to.origin.y, t),
            lerp_f32(self.size.width, to.size.width, t),
            lerp_f32(self.size.height, to.size.height, t),
        )
    }
}

#[inline]
/// Exact at both endpoints.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Inputs of the stacking layout. Cheap to copy; rebuilt whenever the
/// container resizes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackGeometry {
    pub container: Size,
    pub visible_capacity: usize,
    pub top_margin: f32,
    pub scale: f32,
}

impl StackGeometry {
    pub fn new(container: Size, visible_capacity: usize, top_margin: f32, scale: f32) -> Self {
        Self {
            container,
            visible_capacity,
            top_margin,
            scale,
        }
    }

    pub fn from_config(cfg: &DeckConfig, container: Size) -> Self {
        Self::new(
            container,
            cfg.visible_capacity,
            cfg.background_top_margin,
            cfg.background_scale,
        )
    }

    /// Static frame of the slot at `position` (0 = front).
    ///
    /// Slot 0 spans the container width and its height minus the space
    /// reserved for the cards peeking out below it. Each further slot is
    /// `scale` times the one in front of it, centred horizontally, with its
    /// bottom edge `top_margin` below the previous slot's bottom edge.
    pub fn frame_for_slot(&self, position: usize) -> Frame {
        let reserved = self.top_margin * self.visible_capacity.saturating_sub(1) as f32;
        let mut width = self.container.width;
        let mut height = (self.container.height - reserved).max(0.0);
        let mut y = 0.0f32;
        // Iterative on purpose: each slot is derived from the exact values of
        // the previous one, so frame(n + 1).size == frame(n).size * scale.
        for _ in 0..position {
            let next_width = width * self.scale;
            let next_height = height * self.scale;
            y = y + (height - next_height) + self.top_margin;
            width = next_width;
            height = next_height;
        }
        let x = (self.container.width - width) / 2.0;
        Frame::new(x, y, width, height)
    }

    /// Linear blend between two slots' static frames, `t` clamped to [0, 1].
    pub fn interpolate_slot(&self, from_position: usize, to_position: usize, t: f32) -> Frame {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let from = self.frame_for_slot(from_position);
        let to = self.frame_for_slot(to_position);
        from.lerp(&to, t)
    }
}

/// Drag completion in percent of the card width, clamped to [0, 100].
#[inline]
pub fn drag_progress(dx: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    (dx.abs() * 100.0 / width).clamp(0.0, 100.0)
}
