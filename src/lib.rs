//! Breakout - A ball-and-paddle brick breaker simulation core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (collisions, balls, powerups, game state)
//! - `settings`: Window/seed configuration, loadable from JSON
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio playback and input polling live outside this crate. The
//! simulation exposes its state and a queue of [`sim::GameEvent`]s for them.

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed frame timestep used by the native runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Default window dimensions
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PLAYER_SIZE: Vec2 = Vec2::new(100.0, 20.0);
    pub const PLAYER_VELOCITY: f32 = 500.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.5;
    pub const INITIAL_BALL_VELOCITY: Vec2 = Vec2::new(100.0, -350.0);
    /// Horizontal steering applied by paddle bounces
    pub const PADDLE_STEERING: f32 = 2.0;

    /// Particles per ball trail
    pub const PARTICLE_AMOUNT: usize = 500;

    /// Powerup defaults
    pub const POWERUP_SIZE: Vec2 = Vec2::new(60.0, 20.0);
    pub const POWERUP_VELOCITY: Vec2 = Vec2::new(0.0, 150.0);

    /// Below this length a vector has no usable direction
    pub const DIRECTION_EPSILON: f32 = 1e-6;
}

/// Normalize `v`, or return `None` if it is too short to have a direction
#[inline]
pub fn try_direction(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    (len > consts::DIRECTION_EPSILON).then(|| v / len)
}

