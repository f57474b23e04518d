//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::geometry::Rect;
use super::input::InputState;
use super::particles::{spawn_burst, update_particles};
use super::state::{GameEvent, GamePhase, GameState, Outcome, PowerupKind};
use crate::consts::*;
use crate::palette;

const ARENA: Rect = Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT);

/// Advance the game state by one fixed tick
///
/// Only `Playing` runs the simulation. `Loading` and `LevelComplete` count
/// down their hold timers, and speed boosts keep expiring during the
/// `LevelComplete` hold. `Menu` and `GameOver` do nothing.
pub fn tick(state: &mut GameState, input: &InputState) {
    match state.phase {
        GamePhase::Loading => {
            if state.assets_ready && state.hold_ticks > 0 {
                state.hold_ticks -= 1;
                if state.hold_ticks == 0 {
                    state.enter_menu();
                }
            }
        }
        GamePhase::Playing => step(state, input),
        GamePhase::LevelComplete => {
            tick_speed_boosts(state);
            state.hold_ticks = state.hold_ticks.saturating_sub(1);
            if state.hold_ticks == 0 {
                if let Err(e) = state.advance_level() {
                    log::warn!("Level advance failed: {}", e);
                }
            }
        }
        GamePhase::Menu | GamePhase::GameOver(_) => {}
    }
}

fn step(state: &mut GameState, input: &InputState) {
    state.time_ticks += 1;

    // Player movement
    let player = &mut state.player;
    player.vel = input.velocity(player.speed);
    player.pos = ARENA.clamp_inside(player.pos + player.vel, player.size);

    update_timers(state);

    if update_enemies(state) {
        // Dead: nothing else happens this tick
        return;
    }

    collect_treasures(state);
    collect_powerups(state);

    // Door opens only once the quota is met
    if state.player.treasures >= state.quota()
        && state.player.bounds().overlaps(&state.door.bounds())
    {
        state.emit(GameEvent::DoorEntered);
        state.complete_level();
    }

    update_particles(&mut state.particles);
}

/// Invincibility countdown and speed-boost expiry
fn update_timers(state: &mut GameState) {
    let player = &mut state.player;
    if player.invincible {
        player.invincibility_ticks = player.invincibility_ticks.saturating_sub(1);
        if player.invincibility_ticks == 0 {
            player.invincible = false;
        }
    }
    tick_speed_boosts(state);
}

/// Speed boosts run on wall time, so this also ticks between levels
fn tick_speed_boosts(state: &mut GameState) {
    let player = &mut state.player;
    let mut expired = 0;
    for boost in player.speed_boosts.iter_mut() {
        boost.remaining_ticks = boost.remaining_ticks.saturating_sub(1);
        if boost.remaining_ticks == 0 {
            expired += 1;
        }
    }
    if expired > 0 {
        player.speed_boosts.retain(|b| b.remaining_ticks > 0);
        // Each pickup takes back exactly what it gave
        player.speed -= SPEED_BOOST * expired as f32;
        for _ in 0..expired {
            state.emit(GameEvent::SpeedBoostExpired);
        }
    }
}

fn update_enemies(state: &mut GameState) -> bool {
    for i in 0..state.enemies.len() {
        let player_pos = state.player.pos;
        let enemy = &mut state.enemies[i];

        let delta = player_pos - enemy.pos;
        let dist = delta.length();

        if dist < CHASE_RADIUS {
            if dist > 0.0 {
                enemy.pos += delta / dist * enemy.speed;
            }
        } else {
            enemy.pos.x += enemy.dir * enemy.speed;
            if enemy.pos.x < PATROL_MARGIN || enemy.pos.x > ARENA_WIDTH - PATROL_MARGIN {
                enemy.dir = -enemy.dir;
            }
        }

        let enemy_bounds = enemy.bounds();
        if state.player.invincible || !state.player.bounds().overlaps(&enemy_bounds) {
            continue;
        }

        let health = state.player.take_damage(ENEMY_DAMAGE);
        log::debug!("Player hit by enemy {}, health {}", i, health);
        state.emit(GameEvent::PlayerHit { health });

        let center = state.player.bounds().center();
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            center,
            palette::HIT,
            HIT_PARTICLES,
            state.particle_cap,
        );

        // Knock the player straight away from the enemy
        if dist > 0.0 {
            let pushed = state.player.pos + delta / dist * KNOCKBACK_DISTANCE;
            state.player.pos = ARENA.clamp_inside(pushed, state.player.size);
        }

        if state.player.is_dead() {
            state.end_run(Outcome::Defeat);
            return true;
        }
    }
    false
}

fn collect_treasures(state: &mut GameState) {
    let player_bounds = state.player.bounds();
    let quota = state.quota();

    for i in 0..state.treasures.len() {
        let treasure = &mut state.treasures[i];
        if treasure.collected || !player_bounds.overlaps(&treasure.bounds()) {
            continue;
        }
        treasure.collected = true;
        let center = treasure.bounds().center();

        state.player.treasures += 1;
        state.player.score += TREASURE_SCORE;
        state.emit(GameEvent::TreasureCollected {
            collected: state.player.treasures,
            quota,
        });
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            center,
            palette::TREASURE_SPARK,
            PICKUP_PARTICLES,
            state.particle_cap,
        );
    }
}

fn collect_powerups(state: &mut GameState) {
    let player_bounds = state.player.bounds();

    for i in 0..state.powerups.len() {
        let powerup = &mut state.powerups[i];
        if !powerup.active || !player_bounds.overlaps(&powerup.bounds()) {
            continue;
        }
        powerup.active = false;
        let kind = powerup.kind;
        let center = powerup.bounds().center();

        state.emit(GameEvent::PowerupCollected { kind });
        spawn_burst(
            &mut state.particles,
            &mut state.rng,
            center,
            kind.spark_color(),
            PICKUP_PARTICLES,
            state.particle_cap,
        );

        match kind {
            PowerupKind::Health => state.player.heal(HEAL_AMOUNT),
            PowerupKind::Speed => state.player.grant_speed_boost(SPEED_BOOST, SPEED_BOOST_TICKS),
            PowerupKind::Invincibility => state.player.grant_invincibility(INVINCIBILITY_TICKS),
        }
        log::debug!("Powerup {:?} collected", kind);
    }
}
