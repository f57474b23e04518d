//! Warrior Arena - a single-screen arcade treasure hunt
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, level loading, tick, phase machine)
//! - `game`: Session driver that feeds sim events to audio and HUD
//! - `assets`: Image manifest, decoding and placeholder substitution
//! - `audio`: Cue player with a global enable flag
//! - `hud`: Status readouts and overlay screens
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod hud;
pub mod palette;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AssetError, AudioError, TransitionError};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate; every tick-based duration below assumes it
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 400.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;

    /// Enemy tuning
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 60.0;
    /// Enemies closer than this chase the player instead of patrolling
    pub const CHASE_RADIUS: f32 = 200.0;
    /// Patrolling enemies turn around this far from either side wall
    pub const PATROL_MARGIN: f32 = 100.0;
    pub const ENEMY_DAMAGE: i32 = 10;
    pub const KNOCKBACK_DISTANCE: f32 = 20.0;

    /// Pickups
    pub const TREASURE_SIZE: f32 = 30.0;
    pub const POWERUP_SIZE: f32 = 30.0;
    pub const TREASURE_SCORE: u64 = 100;
    pub const HEAL_AMOUNT: i32 = 30;
    pub const SPEED_BOOST: f32 = 2.0;
    /// 10 seconds
    pub const SPEED_BOOST_TICKS: u32 = 10 * TICK_RATE;
    /// 5 seconds
    pub const INVINCIBILITY_TICKS: u32 = 5 * TICK_RATE;

    /// Exit door, reset here on every level load
    pub const DOOR_X: f32 = 750.0;
    pub const DOOR_Y: f32 = 380.0;
    pub const DOOR_WIDTH: f32 = 50.0;
    pub const DOOR_HEIGHT: f32 = 100.0;

    /// Spawn insets keeping randomized entities away from the walls
    pub const SPAWN_MARGIN: f32 = 100.0;
    pub const TREASURE_SPAWN_MARGIN: f32 = 150.0;

    /// Level completion: bonus points per 10 health left
    pub const HEALTH_BONUS_STEP: i32 = 10;
    pub const HEALTH_BONUS_POINTS: u64 = 50;
    /// Level-complete screen hold (2 seconds)
    pub const LEVEL_COMPLETE_TICKS: u32 = 2 * TICK_RATE;

    /// Particle bursts
    pub const HIT_PARTICLES: usize = 10;
    pub const PICKUP_PARTICLES: usize = 15;

    /// Background music volume at game start
    pub const MUSIC_VOLUME: f32 = 0.3;
}

/// Convert a real-time duration to whole simulation ticks
#[inline]
pub fn seconds_to_ticks(seconds: f32) -> u32 {
    (seconds * consts::TICK_RATE as f32).round().max(0.0) as u32
}
