//! Axis-aligned rectangles and overlap testing
//!
//! Every interaction in the arena (enemy contact, pickups, the exit door) is a
//! plain AABB overlap. Coordinates are screen pixels, origin top-left, y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// Top-left position that keeps a box of `size` at `pos` fully inside `self`
    ///
    /// The left/top edge wins if the box is larger than the container.
    pub fn clamp_inside(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let max_x = self.x + self.w - size.x;
        let max_y = self.y + self.h - size.y;
        Vec2::new(pos.x.min(max_x).max(self.x), pos.y.min(max_y).max(self.y))
    }
}

/// Open-interval overlap on both axes; touching edges do not count
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}
