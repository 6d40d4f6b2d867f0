//! Ball trail particles
//!
//! Each ball owns one emitter (see [`super::registry::BallRegistry`]). The
//! emitter keeps a fixed pool and recycles dead particles, so a trail never
//! allocates after creation. Rendering the pool is up to the frontend.

use glam::{Vec2, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Ball;

/// Alpha lost per second by a live particle
const FADE_RATE: f32 = 2.5;
/// Fraction of the ball velocity a particle inherits
const VELOCITY_INHERIT: f32 = 0.1;

/// A single trail particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Vec4,
    /// Seconds left to live; dead at or below zero
    pub life: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Vec4::ONE,
            life: 0.0,
        }
    }
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Fixed-size particle pool trailing one ball
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    particles: Vec<Particle>,
    last_used: usize,
    rng: Pcg32,
}

impl ParticleEmitter {
    pub fn new(amount: usize, seed: u64) -> Self {
        Self {
            particles: vec![Particle::default(); amount],
            last_used: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Respawn `new_particles` particles at the ball and age the rest
    ///
    /// `offset` shifts spawns from the ball's top-left corner toward its
    /// center; the random jitter scales with it.
    pub fn update(&mut self, dt: f32, ball: &Ball, new_particles: usize, offset: Vec2) {
        for _ in 0..new_particles {
            if let Some(index) = self.first_unused() {
                self.respawn(index, ball, offset);
            }
        }

        for particle in self.particles.iter_mut() {
            particle.life -= dt;
            if particle.is_alive() {
                particle.pos -= particle.vel * dt;
                particle.color.w -= dt * FADE_RATE;
            }
        }
    }

    /// Kill every particle
    pub fn reset(&mut self) {
        for particle in self.particles.iter_mut() {
            *particle = Particle::default();
        }
        self.last_used = 0;
    }

    /// The whole pool, dead particles included
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    /// Find a dead particle, searching from the last one handed out. When
    /// every particle is alive the first one is overwritten.
    fn first_unused(&mut self) -> Option<usize> {
        let len = self.particles.len();
        if len == 0 {
            return None;
        }
        let found = (self.last_used..len)
            .chain(0..self.last_used)
            .find(|&i| !self.particles[i].is_alive())
            .unwrap_or(0);
        self.last_used = found;
        Some(found)
    }

    fn respawn(&mut self, index: usize, ball: &Ball, offset: Vec2) {
        let spread = offset.max_element().max(1.0);
        let jitter = Vec2::new(
            self.rng.random_range(-spread..=spread),
            self.rng.random_range(-spread..=spread),
        );
        let shade = self.rng.random_range(0.5..1.5);

        self.particles[index] = Particle {
            pos: ball.pos + jitter + offset,
            vel: ball.vel * VELOCITY_INHERIT,
            color: Vec4::new(shade, shade, shade, 1.0),
            life: 1.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::BallId;

    fn ball() -> Ball {
        let mut ball = Ball::new(BallId(1), Vec2::new(50.0, 50.0), 10.0, Vec2::new(100.0, -200.0));
        ball.stuck = false;
        ball
    }

    #[test]
    fn test_update_spawns_requested_count() {
        let mut emitter = ParticleEmitter::new(16, 7);
        let ball = ball();
        emitter.update(0.01, &ball, 2, Vec2::splat(5.0));
        assert_eq!(emitter.live_count(), 2);
        emitter.update(0.01, &ball, 2, Vec2::splat(5.0));
        assert_eq!(emitter.live_count(), 4);
    }

    #[test]
    fn test_particles_die_after_lifetime() {
        let mut emitter = ParticleEmitter::new(8, 7);
        let ball = ball();
        emitter.update(0.0, &ball, 3, Vec2::splat(5.0));
        assert_eq!(emitter.live_count(), 3);
        emitter.update(1.5, &ball, 0, Vec2::ZERO);
        assert_eq!(emitter.live_count(), 0);
    }

    #[test]
    fn test_spawn_near_ball_and_trail_backwards() {
        let mut emitter = ParticleEmitter::new(4, 3);
        let ball = ball();
        let offset = Vec2::splat(5.0);
        emitter.update(0.0, &ball, 1, offset);
        let p = emitter.particles().iter().find(|p| p.is_alive()).copied().unwrap();
        let from_anchor = p.pos - (ball.pos + offset);
        assert!(from_anchor.x.abs() <= 5.0 && from_anchor.y.abs() <= 5.0);
        assert_eq!(p.vel, ball.vel * VELOCITY_INHERIT);

        emitter.update(0.1, &ball, 0, Vec2::ZERO);
        let moved = emitter.particles().iter().find(|p| p.is_alive()).copied().unwrap();
        assert!(moved.pos.x < p.pos.x);
        assert!(moved.color.w < 1.0);
    }

    #[test]
    fn test_full_pool_recycles() {
        let mut emitter = ParticleEmitter::new(2, 1);
        let ball = ball();
        emitter.update(0.0, &ball, 5, Vec2::ONE);
        assert_eq!(emitter.live_count(), 2);
    }

    #[test]
    fn test_reset_kills_everything() {
        let mut emitter = ParticleEmitter::new(8, 2);
        let ball = ball();
        emitter.update(0.0, &ball, 4, Vec2::ONE);
        emitter.reset();
        assert_eq!(emitter.live_count(), 0);
    }
}
