//! Active ball set and per-ball particle emitters
//!
//! The registry is the only owner of balls and their trail emitters. Every
//! registered ball has exactly one emitter, created on add and dropped on
//! remove, so no emitter can outlive its ball.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particles::ParticleEmitter;
use super::state::Ball;

/// Stable identifier of a ball, never reused within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Owning registry of active balls
#[derive(Debug, Clone)]
pub struct BallRegistry {
    /// Active balls in insertion order
    balls: Vec<Ball>,
    emitters: HashMap<BallId, ParticleEmitter>,
    next_id: u32,
    particle_amount: usize,
    seed: u64,
}

impl BallRegistry {
    pub fn new(particle_amount: usize, seed: u64) -> Self {
        Self {
            balls: Vec::new(),
            emitters: HashMap::new(),
            next_id: 1,
            particle_amount,
            seed,
        }
    }

    /// Allocate a fresh ball ID
    pub fn next_id(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a ball stuck at `pos` and register it
    pub fn spawn(&mut self, pos: Vec2, radius: f32, vel: Vec2) -> BallId {
        let id = self.next_id();
        self.add(Ball::new(id, pos, radius, vel));
        id
    }

    /// Register a ball. A ball whose ID is already known replaces the old
    /// entry and has its existing emitter reset instead of recreated.
    /// IDs handed out afterwards are always above `ball.id`.
    pub fn add(&mut self, ball: Ball) {
        let id = ball.id;
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        match self.balls.iter_mut().find(|b| b.id == id) {
            Some(existing) => *existing = ball,
            None => self.balls.push(ball),
        }

        if let Some(emitter) = self.emitters.get_mut(&id) {
            emitter.reset();
        } else {
            let seed = self.seed ^ (u64::from(id.0) << 32);
            self.emitters
                .insert(id, ParticleEmitter::new(self.particle_amount, seed));
        }
        log::debug!("Ball {:?} added ({} active)", id, self.balls.len());
    }

    /// Unregister a ball and drop its emitter
    ///
    /// # Panics
    /// If `id` is not registered; callers only remove balls they just read
    /// from this registry.
    pub fn remove(&mut self, id: BallId) -> Ball {
        self.emitters.remove(&id);
        let Some(index) = self.balls.iter().position(|b| b.id == id) else {
            panic!("removing unregistered ball {id:?}");
        };
        let ball = self.balls.remove(index);
        log::debug!("Ball {:?} removed ({} active)", id, self.balls.len());
        ball
    }

    /// Remove every ball matching `pred`, in order, returning how many went
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Ball) -> bool) -> usize {
        let doomed: Vec<BallId> = self
            .balls
            .iter()
            .filter(|&b| pred(b))
            .map(|b| b.id)
            .collect();
        for &id in &doomed {
            self.remove(id);
        }
        doomed.len()
    }

    /// Remove every ball
    pub fn clear(&mut self) {
        self.remove_where(|_| true);
    }

    /// Copy `source` into a new unstuck ball at `pos`, mirrored horizontally
    /// and heading up. Returns `None` if `source` is not registered.
    pub fn clone_ball(&mut self, source: BallId, pos: Vec2) -> Option<BallId> {
        let mut ball = self.get(source)?.clone();
        let id = self.next_id();
        ball.id = id;
        ball.stuck = false;
        ball.pos = pos;
        ball.vel = Vec2::new(-ball.vel.x, -ball.vel.y.abs());
        self.add(ball);
        Some(id)
    }

    /// Reset every emitter without touching the balls
    pub fn reset_emitters(&mut self) {
        for emitter in self.emitters.values_mut() {
            emitter.reset();
        }
    }

    /// Advance the trail of every ball that is not stuck to the paddle
    pub fn update_trails(&mut self, dt: f32, new_particles: usize) {
        for ball in self.balls.iter().filter(|b| !b.stuck) {
            if let Some(emitter) = self.emitters.get_mut(&ball.id) {
                emitter.update(dt, ball, new_particles, Vec2::splat(ball.radius() / 2.0));
            }
        }
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn emitter(&self, id: BallId) -> Option<&ParticleEmitter> {
        self.emitters.get(&id)
    }

    /// The oldest active ball
    pub fn first(&self) -> Option<&Ball> {
        self.balls.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }
}
