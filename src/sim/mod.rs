//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies; side effects leave as `GameEvent`s

pub mod geometry;
pub mod input;
pub mod level;
pub mod machine;
pub mod particles;
pub mod state;
pub mod tick;

pub use geometry::{Rect, overlaps};
pub use input::{Direction, InputState};
pub use level::{LEVELS, LevelConfig, load_level};
pub use state::{
    Door, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Outcome, Particle, Player, Powerup,
    PowerupKind, SpeedBoost, Treasure, MAX_PARTICLES,
};
pub use tick::tick;
