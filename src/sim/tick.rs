//! Per-frame simulation step
//!
//! Input is applied first, then the world advances in a fixed order:
//! integrate, collide, trails, powerup timers, effects, ball loss, level
//! completion.

use super::powerup::EffectTargets;
use super::resolve::{collide_bricks, collide_paddle};
use super::state::{GameEvent, GamePhase, GameState, SoundCue};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Release balls stuck to the paddle
    pub launch: bool,
    /// Start from the menu, or leave the win screen
    pub confirm: bool,
    /// Menu level selection
    pub next_level: bool,
    pub prev_level: bool,
}

/// Apply input, then advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    apply_input(state, input, dt);
    update(state, dt);
}

/// Handle input for the current phase
pub fn apply_input(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Menu => {
            if input.confirm {
                state.score = 0;
                state.set_phase(GamePhase::Active);
                return;
            }
            let count = state.levels.len();
            if input.next_level {
                state.select_level(state.level + 1);
            } else if input.prev_level {
                state.select_level(state.level + count - 1);
            }
        }
        GamePhase::Win => {
            if input.confirm {
                state.effects.chaos = false;
                state.set_phase(GamePhase::Menu);
            }
        }
        GamePhase::Active => {
            let step = state.tuning.paddle_speed * dt;
            let mut dx = 0.0;
            if input.move_left {
                dx -= step;
            }
            if input.move_right {
                dx += step;
            }
            if dx != 0.0 {
                move_paddle(state, dx);
            }

            if input.launch {
                for ball in state.balls.iter_mut() {
                    ball.stuck = false;
                }
            }
        }
    }
}

/// Slide the paddle horizontally, keeping it inside the window. Stuck balls
/// ride along.
fn move_paddle(state: &mut GameState, dx: f32) {
    let max_x = (state.width - state.paddle.size.x).max(0.0);
    let old_x = state.paddle.pos.x;
    state.paddle.pos.x = (old_x + dx).clamp(0.0, max_x);

    let moved = state.paddle.pos.x - old_x;
    for ball in state.balls.iter_mut().filter(|b| b.stuck) {
        ball.pos.x += moved;
    }
}

/// Advance the world by one frame
pub fn update(state: &mut GameState, dt: f32) {
    // Integrate
    let width = state.width;
    for ball in state.balls.iter_mut() {
        ball.advance(dt, width);
    }

    // Collide
    collide_bricks(state);
    collide_powerups(state);
    collide_paddle(state);

    // Trails
    state
        .balls
        .update_trails(dt, state.tuning.particles_per_frame);

    update_powerups(state, dt);
    state.effects.update(dt);

    handle_lost_balls(state);

    if state.phase == GamePhase::Active && state.current_level().is_completed() {
        state.reset_level();
        state.reset_player();
        state.effects.chaos = true;
        log::info!("Level {} cleared, score {}", state.level + 1, state.score);
        state.set_phase(GamePhase::Win);
    }
}

/// Catch falling powerups with the paddle
fn collide_powerups(state: &mut GameState) {
    let caught = {
        let mut targets = EffectTargets {
            balls: &mut state.balls,
            paddle: &mut state.paddle,
            effects: &mut state.effects,
            tuning: &state.tuning,
        };
        state.powerups.collect(state.height, &mut targets)
    };

    for kind in caught {
        state.emit(GameEvent::sound(SoundCue::PowerUpPickup));
        state.emit(GameEvent::PowerUpActivated(kind));
    }
}

/// Move powerups and revert effects whose time ran out
fn update_powerups(state: &mut GameState, dt: f32) {
    let expired = {
        let mut targets = EffectTargets {
            balls: &mut state.balls,
            paddle: &mut state.paddle,
            effects: &mut state.effects,
            tuning: &state.tuning,
        };
        state.powerups.update(dt, &mut targets)
    };

    for kind in expired {
        state.emit(GameEvent::PowerUpExpired(kind));
    }
}

/// Drop balls that fell past the bottom edge. Losing the last one costs a
/// life; losing the last life sends the game back to the menu.
fn handle_lost_balls(state: &mut GameState) {
    let bottom = state.height;
    let lost = state.balls.remove_where(|b| b.pos.y >= bottom);
    if lost == 0 || !state.balls.is_empty() {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    log::info!("Ball lost, {} lives left", state.lives);
    state.emit(GameEvent::LifeLost {
        lives_left: state.lives,
    });

    if state.lives == 0 {
        log::info!("Game over, final score {}", state.score);
        state.reset_level();
        state.set_phase(GamePhase::Menu);
    }
    state.reset_player();
}
