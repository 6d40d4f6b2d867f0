//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so it can be
//! tweaked from JSON without recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddle ===
    /// Default paddle size (restored on reset and when size effects expire)
    pub paddle_size: Vec2,
    /// Paddle horizontal speed (pixels/s)
    pub paddle_speed: f32,

    // === Ball ===
    /// Base ball radius
    pub ball_radius: f32,
    /// Velocity given to a freshly spawned ball
    pub initial_ball_velocity: Vec2,
    /// How strongly the impact offset steers a paddle bounce
    pub paddle_steering: f32,

    // === Scoring / feedback ===
    /// Score awarded per destroyed brick
    pub brick_score: u64,
    /// Screen shake duration after hitting a solid brick (seconds)
    pub shake_duration: f32,
    /// Lives at the start of a level
    pub starting_lives: u32,

    // === Powerups ===
    /// Powerup box size
    pub powerup_size: Vec2,
    /// Base falling velocity of a powerup (scaled per kind)
    pub powerup_velocity: Vec2,
    /// Ball velocity multiplier of the speed powerup
    pub speed_multiplier: f32,
    /// Paddle width change of the pad-size powerups
    pub paddle_size_delta: f32,
    /// Narrowest paddle the pad-size-decrease powerup can produce
    pub paddle_min_width: f32,
    /// Radius multiplier of the ball-big powerup
    pub big_ball_factor: f32,

    // === Particles ===
    /// Particle pool size per ball trail
    pub particle_amount: usize,
    /// Particles respawned per ball per frame
    pub particles_per_frame: usize,

    // === Levels ===
    /// Fraction of the window height used by the brick field
    pub level_height_fraction: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_size: PLAYER_SIZE,
            paddle_speed: PLAYER_VELOCITY,

            ball_radius: BALL_RADIUS,
            initial_ball_velocity: INITIAL_BALL_VELOCITY,
            paddle_steering: PADDLE_STEERING,

            brick_score: 3,
            shake_duration: 0.05,
            starting_lives: 3,

            powerup_size: POWERUP_SIZE,
            powerup_velocity: POWERUP_VELOCITY,
            speed_multiplier: 1.2,
            paddle_size_delta: 50.0,
            paddle_min_width: 50.0,
            big_ball_factor: 2.0,

            particle_amount: PARTICLE_AMOUNT,
            particles_per_frame: 2,

            level_height_fraction: 0.5,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize tuning to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
