//! Directional input sampled once per tick
//!
//! Key handlers only flip axis values here; the tick turns the axes into a
//! velocity using the player's current speed.

use glam::Vec2;

/// One of the four movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Held-direction state, each axis in {-1, 0, 1}
///
/// Pressing a key points its axis that way (the newest press wins); releasing
/// either key on an axis stops that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub horizontal: f32,
    pub vertical: f32,
}

impl InputState {
    pub fn press(&mut self, dir: Direction) {
        match dir {
            Direction::Left => self.horizontal = -1.0,
            Direction::Right => self.horizontal = 1.0,
            Direction::Up => self.vertical = -1.0,
            Direction::Down => self.vertical = 1.0,
        }
    }

    pub fn release(&mut self, dir: Direction) {
        match dir {
            Direction::Left | Direction::Right => self.horizontal = 0.0,
            Direction::Up | Direction::Down => self.vertical = 0.0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Velocity for a mover with the given per-axis speed
    pub fn velocity(&self, speed: f32) -> Vec2 {
        Vec2::new(self.horizontal, self.vertical) * speed
    }
}
