//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Single-threaded, one `update` per frame
//! - Seeded RNG only
//! - Balls and powerups are visited in insertion order
//! - No rendering or audio dependencies; frontends drain events

pub mod collision;
pub mod level;
pub mod particles;
pub mod powerup;
pub mod registry;
pub mod resolve;
pub mod state;
pub mod tick;

pub use collision::{
    Aabb, Contact, Direction, check_box_box, check_circle_box, circle_box_contact,
};
pub use level::{Brick, Level, builtin_levels};
pub use particles::{Particle, ParticleEmitter};
pub use powerup::{EffectTargets, PowerUp, PowerUpController, PowerUpKind};
pub use registry::{BallId, BallRegistry};
pub use state::{Ball, Effects, GameEvent, GamePhase, GameState, Paddle, SoundCue};
pub use tick::{TickInput, apply_input, tick, update};
