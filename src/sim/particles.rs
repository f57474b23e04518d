//! Particle bursts for hits and pickups

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Particle;
use crate::palette::Rgba;

/// Spawn `count` particles flying outward from `center` in random directions
///
/// Speed is 1..4 px/tick, radius 2..6 px, life 20..50 ticks. Spawning stops
/// silently once `cap` particles are alive.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    center: Vec2,
    color: Rgba,
    count: usize,
    cap: usize,
) {
    let room = cap.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = 1.0 + rng.random::<f32>() * 3.0;
        let size = 2.0 + rng.random::<f32>() * 4.0;
        let life = 20.0 + rng.random::<f32>() * 30.0;

        particles.push(Particle {
            pos: center,
            vel: Vec2::from_angle(angle) * speed,
            size,
            color,
            life,
            max_life: life,
        });
    }
}

/// Advance particles one tick and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= 1.0;
    }
    particles.retain(|p| p.life > 0.0);
}
