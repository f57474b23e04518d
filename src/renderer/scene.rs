//! Draw list for one frame
//!
//! Layer order: background, door, treasures, powerups, enemies, player,
//! particles, then the dimming overlay for the end-of-level and game-over
//! screens. Sprites are quads tinted with their image's representative colour.

use super::shapes;
use super::vertex::Vertex;
use crate::assets::{Assets, Sprite};
use crate::consts::*;
use crate::palette;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Rect};

const PARTICLE_SEGMENTS: u32 = 10;
const DOOR_FRAME: f32 = 4.0;

/// Vertical bob of a floating treasure
pub fn treasure_bob(time_ticks: u64) -> f32 {
    (time_ticks as f32 / 10.0).sin() * 5.0
}

/// Vertical bob of a powerup
pub fn powerup_bob(time_ticks: u64) -> f32 {
    (time_ticks as f32 / 8.0).sin() * 5.0
}

/// Player alpha: half-transparent on alternating 5-tick windows while invincible
pub fn player_alpha(invincible: bool, time_ticks: u64) -> f32 {
    if invincible && (time_ticks / 5) % 2 == 0 {
        0.5
    } else {
        1.0
    }
}

fn offset(r: Rect, dy: f32) -> Rect {
    Rect::new(r.x, r.y + dy, r.w, r.h)
}

pub fn build_scene(state: &GameState, assets: &Assets, settings: &Settings) -> Vec<Vertex> {
    let t = state.time_ticks;
    let animate = !settings.reduced_motion;
    let mut v = Vec::with_capacity(256 + state.particles.len() * PARTICLE_SEGMENTS as usize * 3);

    let arena = Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT);
    let background = if matches!(state.phase, GamePhase::Loading | GamePhase::Menu) {
        palette::BACKGROUND
    } else {
        assets.background_tint(state.level)
    };
    v.extend(shapes::rect(&arena, background));

    if matches!(state.phase, GamePhase::Loading | GamePhase::Menu) {
        return v;
    }

    let door = state.door.bounds();
    let door_tint = assets.sprite_tint(Sprite::Door);
    v.extend(shapes::rect(&door, door_tint));
    let frame = if state.player.treasures >= state.quota() {
        palette::WHITE
    } else {
        palette::with_alpha(palette::WHITE, 0.3)
    };
    v.extend(shapes::rect_outline(&door, DOOR_FRAME, frame));

    let bob = if animate { treasure_bob(t) } else { 0.0 };
    let treasure_tint = assets.sprite_tint(Sprite::Treasure);
    for treasure in state.treasures.iter().filter(|tr| !tr.collected) {
        let dy = if treasure.floating { bob } else { 0.0 };
        v.extend(shapes::rect(&offset(treasure.bounds(), dy), treasure_tint));
    }

    let bob = if animate { powerup_bob(t) } else { 0.0 };
    for powerup in state.powerups.iter().filter(|p| p.active) {
        let tint = assets.sprite_tint(Sprite::for_powerup(powerup.kind));
        let r = offset(powerup.bounds(), bob);
        v.extend(shapes::circle(r.center(), r.w / 2.0, tint, 16));
    }

    let enemy_tint = assets.sprite_tint(Sprite::Enemy);
    for enemy in &state.enemies {
        let tint = palette::hue_rotate(enemy_tint, enemy.kind.hue_degrees());
        v.extend(shapes::rect(&enemy.bounds(), tint));
    }

    let player = &state.player;
    let alpha = if animate {
        player_alpha(player.invincible, t)
    } else if player.invincible {
        0.75
    } else {
        1.0
    };
    let player_tint = palette::with_alpha(assets.sprite_tint(Sprite::Warrior), alpha);
    v.extend(shapes::rect(&player.bounds(), player_tint));

    for p in &state.particles {
        let color = palette::with_alpha(p.color, p.color[3] * p.alpha());
        v.extend(shapes::circle(p.pos, p.size, color, PARTICLE_SEGMENTS));
    }

    if matches!(state.phase, GamePhase::GameOver(_) | GamePhase::LevelComplete) {
        v.extend(shapes::rect(&arena, palette::OVERLAY));
    }

    v
}
