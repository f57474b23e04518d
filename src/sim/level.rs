//! Level table and level loading
//!
//! Each level is rebuilt from scratch: enemies, treasures and powerups are
//! scattered uniformly over a margin-inset part of the arena.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Door, Enemy, EnemyKind, GameEvent, GameState, Powerup, PowerupKind, Treasure};
use crate::consts::*;

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub enemy_count: u32,
    /// Also the door quota
    pub treasure_count: u32,
    pub powerup_count: u32,
    /// Enemy speed in pixels per tick
    pub enemy_speed: f32,
}

/// The campaign, easiest first
pub const LEVELS: [LevelConfig; 5] = [
    LevelConfig { enemy_count: 2, treasure_count: 3, powerup_count: 1, enemy_speed: 1.5 },
    LevelConfig { enemy_count: 3, treasure_count: 4, powerup_count: 2, enemy_speed: 1.5 },
    LevelConfig { enemy_count: 4, treasure_count: 5, powerup_count: 2, enemy_speed: 2.0 },
    LevelConfig { enemy_count: 5, treasure_count: 6, powerup_count: 3, enemy_speed: 2.1 },
    LevelConfig { enemy_count: 6, treasure_count: 7, powerup_count: 3, enemy_speed: 2.2 },
];

/// Uniform point in the arena inset by `margin` on every side
fn spawn_point(rng: &mut Pcg32, margin: f32) -> Vec2 {
    let x = margin + rng.random::<f32>() * (ARENA_WIDTH - 2.0 * margin);
    let y = margin + rng.random::<f32>() * (ARENA_HEIGHT - 2.0 * margin);
    Vec2::new(x, y)
}

/// Populate `state` with a fresh copy of level `index`
///
/// # Panics
///
/// Panics if `index` is past the end of the level table. Running out of
/// levels is a victory, which the phase machine handles before calling this.
pub fn load_level(state: &mut GameState, index: usize) {
    let config = state.levels[index];
    let rng = &mut state.rng;

    state.enemies = (0..config.enemy_count)
        .map(|_| {
            let pos = spawn_point(rng, SPAWN_MARGIN);
            let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let kind = EnemyKind::ALL[rng.random_range(0..EnemyKind::ALL.len())];
            Enemy {
                pos,
                size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
                dir,
                speed: config.enemy_speed,
                kind,
            }
        })
        .collect();

    state.treasures = (0..config.treasure_count)
        .map(|_| Treasure {
            pos: spawn_point(rng, TREASURE_SPAWN_MARGIN),
            size: Vec2::splat(TREASURE_SIZE),
            collected: false,
            floating: true,
        })
        .collect();

    state.powerups = (0..config.powerup_count)
        .map(|_| {
            let pos = spawn_point(rng, SPAWN_MARGIN);
            let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
            Powerup {
                pos,
                size: Vec2::splat(POWERUP_SIZE),
                kind,
                active: true,
            }
        })
        .collect();

    state.door = Door::default();
    state.level = index;

    log::info!(
        "Level {} loaded: {} enemies (speed {}), {} treasures, {} powerups",
        index + 1,
        config.enemy_count,
        config.enemy_speed,
        config.treasure_count,
        config.powerup_count
    );

    state.emit(GameEvent::LevelLoaded {
        level: index,
        quota: config.treasure_count,
    });
}
