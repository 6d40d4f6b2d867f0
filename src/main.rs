//! Breakout headless runner
//!
//! Plays the simulation at a fixed 60 Hz with a simple autopilot and logs
//! what happens. Usage: `breakout [settings.json] [seconds]`.

use breakout::consts::FRAME_DT;
use breakout::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Seconds of play when none are given
const DEFAULT_SECONDS: u32 = 120;

/// Paddle deadzone around the tracked ball, in pixels
const AUTOPILOT_DEADZONE: f32 = 8.0;

fn main() {
    use breakout::Settings;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(std::path::Path::new(&path)),
        None => Settings::default(),
    };
    let seconds = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(s)) => s,
        Some(Err(e)) => {
            log::warn!("Invalid duration ({e}), using {DEFAULT_SECONDS}s");
            DEFAULT_SECONDS
        }
        None => DEFAULT_SECONDS,
    };

    log::info!(
        "Breakout (headless) starting: {}x{}, seed {:#x}, {}s",
        settings.width,
        settings.height,
        settings.seed,
        seconds
    );

    let mut state = GameState::new(&settings);
    let frames = seconds * 60;
    let mut bricks_broken = 0u32;
    let mut levels_won = 0u32;

    for frame in 0..frames {
        let input = autopilot(&state);
        tick(&mut state, &input, FRAME_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::Sound {
                    cue: breakout::sim::SoundCue::BrickBreak,
                    ..
                } => bricks_broken += 1,
                GameEvent::PhaseChanged(GamePhase::Win) => levels_won += 1,
                _ => {}
            }
            log::debug!("[frame {frame}] {event:?}");
        }

        if frame % (60 * 10) == 0 {
            log::info!(
                "t={:>4}s phase={:?} score={} lives={} bricks_left={} balls={}",
                frame / 60,
                state.phase,
                state.score,
                state.lives,
                state.bricks_left,
                state.balls.len()
            );
        }
    }

    log::info!(
        "Finished: score={} lives={} bricks_left={} phase={:?} broken={} levels_won={}",
        state.score,
        state.lives,
        state.bricks_left,
        state.phase,
        bricks_broken,
        levels_won
    );
}

/// Input that keeps the paddle under the lowest free ball
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    match state.phase {
        GamePhase::Menu | GamePhase::Win => {
            input.confirm = true;
            return input;
        }
        GamePhase::Active => {}
    }

    let lowest = state
        .balls
        .iter()
        .filter(|b| !b.stuck)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let Some(ball) = lowest else {
        // Everything is on the paddle
        input.launch = true;
        return input;
    };

    let offset = ball.center().x - state.paddle.center_x();
    input.move_left = offset < -AUTOPILOT_DEADZONE;
    input.move_right = offset > AUTOPILOT_DEADZONE;
    // Sticky catches get released right away
    input.launch = state.balls.iter().any(|b| b.stuck);
    input
}
