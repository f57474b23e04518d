//! Game state and core simulation types
//!
//! One `GameState` owns every entity list plus the phase, RNG and pending
//! events. Nothing in here reaches outside the simulation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::level::{LEVELS, LevelConfig};
use crate::consts::*;
use crate::palette::{self, Rgba};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the asset barrier
    Loading,
    /// Title menu, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Door reached; holding the level-complete screen
    LevelComplete,
    /// Run ended, either by death or by clearing the last level
    GameOver(Outcome),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Defeat,
    Victory,
}

/// Enemy flavours. Purely cosmetic: all kinds share the same AI and stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Big,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Fast, EnemyKind::Big];

    /// Hue shift applied to the enemy sprite tint
    pub fn hue_degrees(&self) -> f32 {
        match self {
            EnemyKind::Normal => 0.0,
            EnemyKind::Fast => 200.0,
            EnemyKind::Big => 60.0,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Speed,
    Invincibility,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::Health,
        PowerupKind::Speed,
        PowerupKind::Invincibility,
    ];

    /// Particle colour for the pickup burst
    pub fn spark_color(&self) -> Rgba {
        match self {
            PowerupKind::Health => palette::HEALTH_SPARK,
            PowerupKind::Speed => palette::SPEED_SPARK,
            PowerupKind::Invincibility => palette::INVINCIBLE_SPARK,
        }
    }
}

/// A pending speed reversion from one speed pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedBoost {
    pub remaining_ticks: u32,
}

/// The player's warrior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Movement speed in pixels per tick (base plus active boosts)
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub score: u64,
    /// Treasures collected on the current level
    pub treasures: u32,
    pub invincible: bool,
    pub invincibility_ticks: u32,
    pub speed_boosts: Vec<SpeedBoost>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            score: 0,
            treasures: 0,
            invincible: false,
            invincibility_ticks: 0,
            speed_boosts: Vec::new(),
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Health as a 0..=1 fraction of max
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Apply damage, clamped at zero. Returns the new health.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.health = (self.health - amount).clamp(0, self.max_health);
        self.health
    }

    /// Heal, clamped at max health
    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }

    pub fn grant_invincibility(&mut self, ticks: u32) {
        self.invincible = true;
        self.invincibility_ticks = ticks;
    }

    pub fn grant_speed_boost(&mut self, amount: f32, ticks: u32) {
        self.speed += amount;
        self.speed_boosts.push(SpeedBoost {
            remaining_ticks: ticks,
        });
    }

    /// Back to the level entrance; score and health carry over
    pub fn reset_for_level(&mut self) {
        self.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.vel = Vec2::ZERO;
        self.treasures = 0;
    }
}

/// An enemy; patrols horizontally, chases when the player comes close
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Patrol facing, +1 right or -1 left
    pub dir: f32,
    pub speed: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A treasure chest; counts toward the level quota
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treasure {
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
    /// Bobs up and down when drawn
    pub floating: bool,
}

impl Treasure {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A one-shot power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerupKind,
    pub active: bool,
}

impl Powerup {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// The level exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Default for Door {
    fn default() -> Self {
        Self {
            pos: Vec2::new(DOOR_X, DOOR_Y),
            size: Vec2::new(DOOR_WIDTH, DOOR_HEIGHT),
        }
    }
}

impl Door {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Rgba,
    /// Remaining life in ticks
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Fade factor, 1 when fresh and 0 when expired
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// Things that happened during a tick or transition, drained by the driver
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Asset barrier passed, menu is up
    AssetsReady,
    /// New run started from the menu
    GameStarted,
    LevelLoaded { level: usize, quota: u32 },
    PlayerHit { health: i32 },
    TreasureCollected { collected: u32, quota: u32 },
    PowerupCollected { kind: PowerupKind },
    SpeedBoostExpired,
    DoorEntered,
    LevelComplete { bonus: u64, next_level: usize },
    GameOver { score: u64, outcome: Outcome },
    ReturnedToMenu,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "unseeded_rng")]
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Set once every asset is loaded or substituted
    pub assets_ready: bool,
    /// Current level index (0-based)
    pub level: usize,
    /// Difficulty table, one entry per level
    pub levels: Vec<LevelConfig>,
    /// Ticks spent in Playing, drives cosmetic animation
    pub time_ticks: u64,
    /// Countdown for timed phases (loading grace, level-complete screen)
    pub hold_ticks: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub treasures: Vec<Treasure>,
    pub powerups: Vec<Powerup>,
    pub door: Door,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Create a new game state with the given seed, using the standard level table
    pub fn new(seed: u64) -> Self {
        Self::with_levels(seed, LEVELS.to_vec())
    }

    /// Create a state with a custom level table
    pub fn with_levels(seed: u64, levels: Vec<LevelConfig>) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Loading,
            assets_ready: false,
            level: 0,
            levels,
            time_ticks: 0,
            hold_ticks: 0,
            player: Player::default(),
            enemies: Vec::new(),
            treasures: Vec::new(),
            powerups: Vec::new(),
            door: Door::default(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            events: Vec::new(),
        }
    }

    /// Config for the level being played
    pub fn current_config(&self) -> Option<&LevelConfig> {
        self.levels.get(self.level)
    }

    /// Treasures needed to unlock the door on this level
    pub fn quota(&self) -> u32 {
        self.current_config().map_or(0, |c| c.treasure_count)
    }

    pub fn is_last_level(&self) -> bool {
        self.level + 1 >= self.levels.len()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Loading);
        assert_eq!(state.level, 0);
        assert_eq!(state.player.health, 100);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.player.treasures, 0);
        assert_eq!(state.levels.len(), 5);
        assert_eq!(state.quota(), 3);
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut player = Player::default();
        player.health = 5;
        assert_eq!(player.take_damage(10), 0);
        assert!(player.is_dead());

        player.health = 90;
        player.heal(30);
        assert_eq!(player.health, 100);
        assert_eq!(player.health_fraction(), 1.0);
    }

    #[test]
    fn test_reset_for_level_keeps_score_and_health() {
        let mut player = Player::default();
        player.pos = Vec2::new(700.0, 100.0);
        player.score = 450;
        player.health = 60;
        player.treasures = 3;
        player.reset_for_level();
        assert_eq!(player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(player.treasures, 0);
        assert_eq!(player.score, 450);
        assert_eq!(player.health, 60);
    }

    #[test]
    fn test_particle_alpha() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 2.0,
            color: palette::HIT,
            life: 10.0,
            max_life: 40.0,
        };
        assert!((p.alpha() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1);
        state.emit(GameEvent::DoorEntered);
        assert_eq!(state.drain_events(), vec![GameEvent::DoorEntered]);
        assert!(state.pending_events().is_empty());
    }
}
