//! Game state and core simulation types
//!
//! Everything the per-frame update touches lives in [`GameState`]; there is
//! no global state. Renderers and audio read the public fields and drain
//! [`GameEvent`]s after each update.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level::{Level, builtin_levels};
use super::powerup::{PowerUpController, PowerUpKind};
use super::registry::{BallId, BallRegistry};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level select, waiting for start
    Menu,
    /// Active gameplay
    Active,
    /// Level cleared
    Win,
}

/// Sound cues for the audio frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Background music
    Music,
    /// Breakable brick destroyed
    BrickBreak,
    /// Ball bounced off a solid brick
    SolidHit,
    /// Ball bounced off the paddle
    PaddleBounce,
    /// Powerup caught
    PowerUpPickup,
}

/// Fire-and-forget signals for frontends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound { cue: SoundCue, looped: bool },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    LifeLost { lives_left: u32 },
    PhaseChanged(GamePhase),
}

impl GameEvent {
    /// A one-shot sound
    pub fn sound(cue: SoundCue) -> Self {
        GameEvent::Sound { cue, looped: false }
    }
}

/// A ball
///
/// `pos` is the top-left corner of the ball's bounding square. The square
/// is always `2 * radius` wide, so radius only changes through
/// [`Ball::resize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    size: Vec2,
    /// Riding the paddle, waiting for launch
    pub stuck: bool,
    /// Sticks to the paddle on the next bounce
    pub sticky: bool,
    /// Tunnels through breakable bricks
    pub pass_through: bool,
    pub color: Vec3,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, radius: f32, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            size: Vec2::splat(radius * 2.0),
            stuck: true,
            sticky: false,
            pass_through: false,
            color: Vec3::ONE,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }

    pub fn resize(&mut self, radius: f32) {
        self.radius = radius;
        self.size = Vec2::splat(radius * 2.0);
    }

    /// Integrate one step and bounce off the left, right and top walls.
    /// Stuck balls ride the paddle and do not move on their own.
    pub fn advance(&mut self, dt: f32, window_width: f32) {
        if self.stuck {
            return;
        }
        self.pos += self.vel * dt;

        if self.pos.x <= 0.0 {
            self.vel.x = -self.vel.x;
            self.pos.x = 0.0;
        } else if self.pos.x + self.size.x >= window_width {
            self.vel.x = -self.vel.x;
            self.pos.x = window_width - self.size.x;
        }
        if self.pos.y <= 0.0 {
            self.vel.y = -self.vel.y;
            self.pos.y = 0.0;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Vec3,
}

impl Paddle {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            color: Vec3::ONE,
        }
    }

    /// Default paddle centered at the bottom of the window
    pub fn centered(window: Vec2, size: Vec2) -> Self {
        Self::new(Vec2::new(window.x / 2.0 - size.x / 2.0, window.y - size.y), size)
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Top-left position of a ball of `radius` resting on top of the paddle
    pub fn ball_spawn_point(&self, radius: f32) -> Vec2 {
        self.pos + Vec2::new(self.size.x / 2.0 - radius, -radius * 2.0)
    }
}

/// Post-processing flags read by the renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub shake: bool,
    pub confuse: bool,
    pub chaos: bool,
    /// Seconds of shake left
    pub shake_time: f32,
}

impl Effects {
    pub fn start_shake(&mut self, duration: f32) {
        self.shake_time = duration;
        self.shake = true;
    }

    /// Run down the shake timer
    pub fn update(&mut self, dt: f32) {
        if self.shake_time > 0.0 {
            self.shake_time -= dt;
            if self.shake_time <= 0.0 {
                self.shake = false;
            }
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Window width (left/right walls)
    pub width: f32,
    /// Window height (bottom edge)
    pub height: f32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub lives: u32,
    pub score: u64,
    pub levels: Vec<Level>,
    /// Index of the current level
    pub level: usize,
    /// Breakable bricks left in the current level
    pub bricks_left: usize,
    pub paddle: Paddle,
    pub balls: BallRegistry,
    pub powerups: PowerUpController,
    pub effects: Effects,
    /// RNG for powerup drops
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New game on the built-in levels
    pub fn new(settings: &Settings) -> Self {
        let field_height = settings.height * settings.tuning.level_height_fraction;
        Self::with_levels(settings, builtin_levels(settings.width, field_height))
    }

    /// New game on custom levels
    ///
    /// # Panics
    /// If `levels` is empty.
    pub fn with_levels(settings: &Settings, levels: Vec<Level>) -> Self {
        assert!(!levels.is_empty(), "a game needs at least one level");
        let tuning = settings.tuning.clone();
        let window = Vec2::new(settings.width, settings.height);
        let level = settings.start_level % levels.len();

        let mut state = Self {
            width: settings.width,
            height: settings.height,
            phase: GamePhase::Menu,
            lives: tuning.starting_lives,
            score: 0,
            bricks_left: levels[level].count_remaining(false),
            levels,
            level,
            paddle: Paddle::centered(window, tuning.paddle_size),
            balls: BallRegistry::new(tuning.particle_amount, settings.seed),
            powerups: PowerUpController::new(),
            effects: Effects::default(),
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
            tuning,
        };

        state.spawn_ball_on_paddle();
        state.emit(GameEvent::Sound {
            cue: SoundCue::Music,
            looped: true,
        });
        state
    }

    /// Spawn a ball stuck on top of the paddle
    pub fn spawn_ball_on_paddle(&mut self) -> BallId {
        let radius = self.tuning.ball_radius;
        let pos = self.paddle.ball_spawn_point(radius);
        self.balls.spawn(pos, radius, self.tuning.initial_ball_velocity)
    }

    pub fn current_level(&self) -> &Level {
        &self.levels[self.level]
    }

    pub fn current_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.level]
    }

    /// Select a level by index (wrapping) and recount its bricks
    pub fn select_level(&mut self, index: usize) {
        self.level = index % self.levels.len();
        self.bricks_left = self.current_level().count_remaining(false);
        log::info!("Level {} selected", self.level + 1);
    }

    /// Restore all bricks of the current level and refill lives
    pub fn reset_level(&mut self) {
        self.current_level_mut().reset();
        self.lives = self.tuning.starting_lives;
        self.bricks_left = self.current_level().count_remaining(false);
    }

    /// Put the paddle back, replace all balls with one fresh ball and clear
    /// every powerup and screen effect
    pub fn reset_player(&mut self) {
        let window = Vec2::new(self.width, self.height);
        self.paddle = Paddle::centered(window, self.tuning.paddle_size);

        self.balls.clear();
        self.spawn_ball_on_paddle();

        self.effects.chaos = false;
        self.effects.confuse = false;
        self.powerups.clear();
        self.balls.reset_emitters();
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            self.phase = phase;
            self.emit(GameEvent::PhaseChanged(phase));
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
