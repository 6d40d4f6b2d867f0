//! Collision response
//!
//! Turns contacts from [`super::collision`] into state changes: bricks break
//! and drop powerups, balls reflect and get pushed out of what they hit, and
//! paddle bounces steer the ball by where it landed.

use glam::Vec2;

use super::collision::{Contact, check_circle_box};
use super::state::{Ball, GameEvent, GameState, Paddle, SoundCue};
use crate::try_direction;
use crate::tuning::Tuning;

/// Reflect and push a ball out of a brick it touched
///
/// Only the axis of the contact side is touched. Pass-through balls are not
/// deflected by breakable bricks; solid bricks always deflect. Returns
/// whether the ball was moved.
pub fn resolve_brick_contact(ball: &mut Ball, contact: &Contact, solid: bool) -> bool {
    if ball.pass_through && !solid {
        return false;
    }

    if contact.direction.is_horizontal() {
        ball.vel.x = -ball.vel.x;
    } else {
        ball.vel.y = -ball.vel.y;
    }
    ball.pos += contact.correction(ball.radius());
    true
}

/// Steer a ball off the paddle
///
/// The horizontal velocity follows how far from the paddle center the ball
/// landed; the total speed is kept and the ball always leaves upward.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, tuning: &Tuning) {
    let distance = ball.center().x - paddle.center_x();
    let percentage = distance / (paddle.size.x / 2.0);
    let speed = ball.vel.length();

    let steered = Vec2::new(
        tuning.initial_ball_velocity.x * percentage * tuning.paddle_steering,
        ball.vel.y,
    );
    let dir = try_direction(steered).unwrap_or_else(|| {
        log::warn!("Ball {:?} bounced with no direction, sending it straight up", ball.id);
        Vec2::new(0.0, -1.0)
    });

    ball.vel = dir * speed;
    ball.vel.y = -ball.vel.y.abs();
    if ball.sticky {
        ball.stuck = true;
    }
}

/// Test every ball against every standing brick of the current level
pub fn collide_bricks(state: &mut GameState) {
    let mut events = Vec::new();
    let level = state.level;

    for brick in state.levels[level].bricks.iter_mut() {
        for ball in state.balls.iter_mut() {
            // A brick broken by an earlier ball this frame is already inert
            if brick.destroyed {
                break;
            }
            let Some(contact) = check_circle_box(ball, &brick.aabb()) else {
                continue;
            };

            if brick.solid {
                state.effects.start_shake(state.tuning.shake_duration);
                events.push(GameEvent::sound(SoundCue::SolidHit));
            } else {
                brick.destroyed = true;
                state.powerups.spawn(brick.pos, &mut state.rng, &state.tuning);
                state.bricks_left = state.bricks_left.saturating_sub(1);
                state.score += state.tuning.brick_score;
                events.push(GameEvent::sound(SoundCue::BrickBreak));
            }

            resolve_brick_contact(ball, &contact, brick.solid);
        }
    }

    for event in events {
        state.emit(event);
    }
}

/// Bounce free balls off the paddle
pub fn collide_paddle(state: &mut GameState) {
    let paddle_box = state.paddle.aabb();
    let mut bounces = 0;

    for ball in state.balls.iter_mut().filter(|b| !b.stuck) {
        if check_circle_box(ball, &paddle_box).is_some() {
            bounce_off_paddle(ball, &state.paddle, &state.tuning);
            bounces += 1;
        }
    }

    for _ in 0..bounces {
        state.emit(GameEvent::sound(SoundCue::PaddleBounce));
    }
}
