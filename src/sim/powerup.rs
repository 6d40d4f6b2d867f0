//! Powerup spawning, pickup and timed effects
//!
//! Powerups drop from destroyed bricks and fall toward the paddle. Catching
//! one applies its effect immediately; timed effects revert when their
//! duration runs out, unless another powerup of the same kind is still
//! active. Instantaneous kinds (speed, multi-ball) have nothing to revert.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, check_box_box};
use super::registry::BallRegistry;
use super::state::{Effects, Paddle};
use crate::tuning::Tuning;

/// Paddle tint while sticky is active
const STICKY_TINT: Vec3 = Vec3::new(1.0, 0.5, 1.0);
/// Ball tint while pass-through is active
const PASS_THROUGH_TINT: Vec3 = Vec3::new(1.0, 0.5, 0.5);

/// The powerup catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    Speed,
    Sticky,
    PassThrough,
    PadSizeIncrease,
    BallBig,
    BallMulti,
    PadSizeDecrease,
    Confuse,
    Chaos,
}

impl PowerUpKind {
    /// Every kind, in spawn-roll order
    pub const ALL: [PowerUpKind; 9] = [
        PowerUpKind::Speed,
        PowerUpKind::Sticky,
        PowerUpKind::PassThrough,
        PowerUpKind::PadSizeIncrease,
        PowerUpKind::BallBig,
        PowerUpKind::BallMulti,
        PowerUpKind::PadSizeDecrease,
        PowerUpKind::Confuse,
        PowerUpKind::Chaos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "speed",
            PowerUpKind::Sticky => "sticky",
            PowerUpKind::PassThrough => "pass-through",
            PowerUpKind::PadSizeIncrease => "pad-size-increase",
            PowerUpKind::BallBig => "ball-big",
            PowerUpKind::BallMulti => "ball-multi",
            PowerUpKind::PadSizeDecrease => "pad-size-decrease",
            PowerUpKind::Confuse => "confuse",
            PowerUpKind::Chaos => "chaos",
        }
    }

    /// Box tint
    pub fn color(&self) -> Vec3 {
        match self {
            PowerUpKind::Speed => Vec3::new(0.5, 0.5, 1.0),
            PowerUpKind::Sticky => Vec3::new(1.0, 0.5, 1.0),
            PowerUpKind::PassThrough => Vec3::new(0.5, 1.0, 0.5),
            PowerUpKind::PadSizeIncrease => Vec3::new(1.0, 0.6, 0.4),
            PowerUpKind::BallBig | PowerUpKind::BallMulti => Vec3::new(0.15, 0.55, 0.15),
            PowerUpKind::PadSizeDecrease => Vec3::new(0.8, 0.6, 0.2),
            PowerUpKind::Confuse => Vec3::new(1.0, 0.3, 0.3),
            PowerUpKind::Chaos => Vec3::new(0.9, 0.25, 0.25),
        }
    }

    /// Effect duration in seconds (0 = instantaneous)
    pub fn duration(&self) -> f32 {
        match self {
            PowerUpKind::Speed | PowerUpKind::BallMulti => 0.0,
            PowerUpKind::PassThrough | PowerUpKind::PadSizeIncrease | PowerUpKind::BallBig => 10.0,
            PowerUpKind::Confuse | PowerUpKind::Chaos => 15.0,
            PowerUpKind::Sticky | PowerUpKind::PadSizeDecrease => 20.0,
        }
    }

    /// Spawn odds as "1 in N" per destroyed brick
    pub fn spawn_chance(&self) -> u32 {
        match self {
            PowerUpKind::BallMulti => 2,
            // Negative powerups show up more often
            PowerUpKind::PadSizeDecrease | PowerUpKind::Confuse | PowerUpKind::Chaos => 15,
            _ => 75,
        }
    }

    /// Fall speed relative to the base powerup velocity
    pub fn fall_speed_scale(&self) -> f32 {
        match self {
            PowerUpKind::PadSizeDecrease | PowerUpKind::Confuse | PowerUpKind::Chaos => 1.0,
            _ => 1.5,
        }
    }

    /// True if the effect has state to revert on expiry
    pub fn is_timed(&self) -> bool {
        self.duration() > 0.0
    }
}

/// A falling or active powerup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub color: Vec3,
    /// Seconds of effect left once activated
    pub duration: f32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Effect is running
    pub activated: bool,
    /// No longer falling (caught or lost)
    pub destroyed: bool,
}

impl PowerUp {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Everything a powerup effect may touch
pub struct EffectTargets<'a> {
    pub balls: &'a mut BallRegistry,
    pub paddle: &'a mut Paddle,
    pub effects: &'a mut Effects,
    pub tuning: &'a Tuning,
}

/// Owner of every live powerup
#[derive(Debug, Clone, Default)]
pub struct PowerUpController {
    powerups: Vec<PowerUp>,
    next_id: u32,
}

impl PowerUpController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll every catalog entry independently for a brick destroyed at `at`.
    /// Several powerups may drop from one brick. Returns how many spawned.
    pub fn spawn(&mut self, at: Vec2, rng: &mut impl Rng, tuning: &Tuning) -> usize {
        let mut spawned = 0;
        for kind in PowerUpKind::ALL {
            if rng.random_range(0..kind.spawn_chance()) == 0 {
                self.add(kind, at, tuning);
                spawned += 1;
            }
        }
        spawned
    }

    /// Drop a powerup of `kind` at `at`
    pub fn add(&mut self, kind: PowerUpKind, at: Vec2, tuning: &Tuning) -> &mut PowerUp {
        self.next_id += 1;
        log::debug!("Powerup {} spawned at ({:.0}, {:.0})", kind.as_str(), at.x, at.y);
        self.powerups.push(PowerUp {
            id: self.next_id,
            kind,
            color: kind.color(),
            duration: kind.duration(),
            pos: at,
            size: tuning.powerup_size,
            vel: tuning.powerup_velocity * kind.fall_speed_scale(),
            activated: false,
            destroyed: false,
        });
        let last = self.powerups.len() - 1;
        &mut self.powerups[last]
    }

    /// Catch powerups touching the paddle and drop those past `bottom`.
    /// A powerup reaching the bottom while it still overlaps the paddle is
    /// caught. Returns the kinds activated, in list order.
    pub fn collect(&mut self, bottom: f32, targets: &mut EffectTargets<'_>) -> Vec<PowerUpKind> {
        let mut caught = Vec::new();
        for powerup in self.powerups.iter_mut().filter(|p| !p.destroyed) {
            if powerup.pos.y >= bottom {
                powerup.destroyed = true;
            }
            if check_box_box(&targets.paddle.aabb(), &powerup.aabb()) {
                activate(powerup.kind, targets);
                powerup.activated = true;
                powerup.destroyed = true;
                caught.push(powerup.kind);
            }
        }
        caught
    }

    /// Move powerups, run down active timers and drop finished entries.
    /// Returns the timed kinds whose effect was reverted this tick.
    pub fn update(&mut self, dt: f32, targets: &mut EffectTargets<'_>) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for i in 0..self.powerups.len() {
            let powerup = &mut self.powerups[i];
            powerup.pos += powerup.vel * dt;
            if !powerup.activated {
                continue;
            }
            powerup.duration -= dt;
            if powerup.duration > 0.0 {
                continue;
            }

            powerup.activated = false;
            let kind = powerup.kind;
            if !self.is_active(kind) {
                expire(kind, targets);
                if kind.is_timed() {
                    expired.push(kind);
                }
            }
        }

        self.powerups.retain(|p| !(p.destroyed && !p.activated));
        expired
    }

    /// True if any powerup of `kind` has its effect running
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.powerups.iter().any(|p| p.activated && p.kind == kind)
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.powerups.iter()
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }
}

/// Apply the pickup effect of `kind`
fn activate(kind: PowerUpKind, targets: &mut EffectTargets<'_>) {
    let tuning = targets.tuning;
    log::debug!("Powerup {} activated", kind.as_str());
    match kind {
        PowerUpKind::Speed => {
            for ball in targets.balls.iter_mut() {
                ball.vel *= tuning.speed_multiplier;
            }
        }
        PowerUpKind::Sticky => {
            for ball in targets.balls.iter_mut() {
                ball.sticky = true;
            }
            targets.paddle.color = STICKY_TINT;
        }
        PowerUpKind::PassThrough => {
            for ball in targets.balls.iter_mut() {
                ball.pass_through = true;
                ball.color = PASS_THROUGH_TINT;
            }
        }
        PowerUpKind::PadSizeIncrease => {
            targets.paddle.size.x += tuning.paddle_size_delta;
        }
        PowerUpKind::PadSizeDecrease => {
            let width = targets.paddle.size.x - tuning.paddle_size_delta;
            targets.paddle.size.x = width.max(tuning.paddle_min_width);
        }
        PowerUpKind::BallBig => {
            for ball in targets.balls.iter_mut() {
                ball.resize(tuning.ball_radius * tuning.big_ball_factor);
            }
        }
        PowerUpKind::BallMulti => {
            let Some(source) = targets.balls.first().map(|b| b.id) else {
                log::warn!("Multi-ball caught with no ball in play");
                return;
            };
            let at = targets.paddle.ball_spawn_point(tuning.ball_radius);
            targets.balls.clone_ball(source, at);
        }
        PowerUpKind::Confuse => {
            if !targets.effects.chaos {
                targets.effects.confuse = true;
            }
        }
        PowerUpKind::Chaos => {
            if !targets.effects.confuse {
                targets.effects.chaos = true;
            }
        }
    }
}

/// Revert the effect of `kind`; callers check no other of the kind is active
fn expire(kind: PowerUpKind, targets: &mut EffectTargets<'_>) {
    let tuning = targets.tuning;
    match kind {
        PowerUpKind::Speed | PowerUpKind::BallMulti => return,
        PowerUpKind::Sticky => {
            for ball in targets.balls.iter_mut() {
                ball.sticky = false;
            }
            targets.paddle.color = Vec3::ONE;
        }
        PowerUpKind::PassThrough => {
            for ball in targets.balls.iter_mut() {
                ball.pass_through = false;
                ball.color = Vec3::ONE;
            }
        }
        PowerUpKind::PadSizeIncrease | PowerUpKind::PadSizeDecrease => {
            targets.paddle.size = tuning.paddle_size;
        }
        PowerUpKind::BallBig => {
            for ball in targets.balls.iter_mut() {
                ball.resize(tuning.ball_radius);
            }
        }
        PowerUpKind::Confuse => targets.effects.confuse = false,
        PowerUpKind::Chaos => targets.effects.chaos = false,
    }
    log::debug!("Powerup {} expired", kind.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct World {
        balls: BallRegistry,
        paddle: Paddle,
        effects: Effects,
        tuning: Tuning,
    }

    impl World {
        fn new() -> Self {
            let tuning = Tuning::default();
            let paddle = Paddle::new(Vec2::new(350.0, 580.0), tuning.paddle_size);
            let mut balls = BallRegistry::new(8, 1);
            let id = balls.spawn(Vec2::new(390.0, 555.0), tuning.ball_radius, Vec2::new(100.0, -350.0));
            balls.get_mut(id).unwrap().stuck = false;
            Self {
                balls,
                paddle,
                effects: Effects::default(),
                tuning,
            }
        }

        fn targets(&mut self) -> EffectTargets<'_> {
            EffectTargets {
                balls: &mut self.balls,
                paddle: &mut self.paddle,
                effects: &mut self.effects,
                tuning: &self.tuning,
            }
        }
    }

    /// Add a powerup sitting on the paddle
    fn drop_on_paddle(ctl: &mut PowerUpController, world: &World, kind: PowerUpKind) {
        let at = world.paddle.pos + Vec2::new(10.0, -5.0);
        ctl.add(kind, at, &world.tuning);
    }

    #[test]
    fn test_catalog_is_consistent() {
        for kind in PowerUpKind::ALL {
            assert!(kind.spawn_chance() >= 1);
            assert_eq!(kind.is_timed(), !matches!(kind, PowerUpKind::Speed | PowerUpKind::BallMulti));
        }
        assert_eq!(PowerUpKind::Sticky.duration(), 20.0);
        assert_eq!(PowerUpKind::PassThrough.duration(), 10.0);
        assert_eq!(PowerUpKind::Confuse.duration(), 15.0);
    }

    #[test]
    fn test_spawn_is_independent_per_kind() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ctl = PowerUpController::new();
        let mut max_from_one_brick = 0;
        for _ in 0..2000 {
            let before = ctl.len();
            ctl.spawn(Vec2::new(10.0, 20.0), &mut rng, &tuning);
            max_from_one_brick = max_from_one_brick.max(ctl.len() - before);
        }
        assert!(max_from_one_brick >= 2, "several kinds should drop together");
        assert!(ctl.iter().all(|p| p.pos == Vec2::new(10.0, 20.0)));
        assert!(ctl.iter().any(|p| p.kind == PowerUpKind::BallMulti));
    }

    #[test]
    fn test_fall_velocity_scaled_per_kind() {
        let tuning = Tuning::default();
        let mut ctl = PowerUpController::new();
        let fast = ctl.add(PowerUpKind::Speed, Vec2::ZERO, &tuning).vel;
        let slow = ctl.add(PowerUpKind::Chaos, Vec2::ZERO, &tuning).vel;
        assert_eq!(fast, Vec2::new(0.0, 225.0));
        assert_eq!(slow, Vec2::new(0.0, 150.0));
    }

    #[test]
    fn test_powerup_past_bottom_is_discarded() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        ctl.add(PowerUpKind::Sticky, Vec2::new(0.0, 600.0), &world.tuning);

        let caught = ctl.collect(600.0, &mut world.targets());
        assert!(caught.is_empty());
        assert!(ctl.iter().all(|p| p.destroyed && !p.activated));

        ctl.update(0.01, &mut world.targets());
        assert!(ctl.is_empty());
        assert!(!world.balls.first().unwrap().sticky);
    }

    #[test]
    fn test_powerup_at_bottom_still_caught_by_paddle() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        // Top edge on the bottom of the window, touching the paddle's bottom edge
        ctl.add(PowerUpKind::Sticky, Vec2::new(360.0, 600.0), &world.tuning);

        let caught = ctl.collect(600.0, &mut world.targets());
        assert_eq!(caught, vec![PowerUpKind::Sticky]);
        assert!(world.balls.first().unwrap().sticky);
        assert!(ctl.iter().all(|p| p.destroyed && p.activated));
    }

    #[test]
    fn test_speed_multiplies_velocity() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::Speed);

        let caught = ctl.collect(600.0, &mut world.targets());
        assert_eq!(caught, vec![PowerUpKind::Speed]);
        let vel = world.balls.first().unwrap().vel;
        assert!((vel - Vec2::new(120.0, -420.0)).length() < 1e-3);

        // Instantaneous: gone after one update, nothing reported as expired
        let expired = ctl.update(0.01, &mut world.targets());
        assert!(expired.is_empty());
        assert!(ctl.is_empty());
    }

    #[test]
    fn test_sticky_activates_and_expires() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::Sticky);
        ctl.collect(600.0, &mut world.targets());

        assert!(world.balls.first().unwrap().sticky);
        assert_eq!(world.paddle.color, STICKY_TINT);
        assert!(ctl.is_active(PowerUpKind::Sticky));

        ctl.update(19.0, &mut world.targets());
        assert!(world.balls.first().unwrap().sticky);

        let expired = ctl.update(1.5, &mut world.targets());
        assert_eq!(expired, vec![PowerUpKind::Sticky]);
        assert!(!world.balls.first().unwrap().sticky);
        assert_eq!(world.paddle.color, Vec3::ONE);
        assert!(ctl.is_empty());
    }

    #[test]
    fn test_same_kind_suppresses_expiry() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::Confuse);
        ctl.collect(600.0, &mut world.targets());
        assert!(world.effects.confuse);

        ctl.update(5.0, &mut world.targets());
        drop_on_paddle(&mut ctl, &world, PowerUpKind::Confuse);
        ctl.collect(600.0, &mut world.targets());

        // First one runs out while the second is still active
        let expired = ctl.update(10.5, &mut world.targets());
        assert!(expired.is_empty());
        assert!(world.effects.confuse);
        assert_eq!(ctl.len(), 1);

        let expired = ctl.update(5.0, &mut world.targets());
        assert_eq!(expired, vec![PowerUpKind::Confuse]);
        assert!(!world.effects.confuse);
    }

    #[test]
    fn test_confuse_and_chaos_exclude_each_other() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::Chaos);
        drop_on_paddle(&mut ctl, &world, PowerUpKind::Confuse);
        ctl.collect(600.0, &mut world.targets());
        assert!(world.effects.chaos);
        assert!(!world.effects.confuse);
    }

    #[test]
    fn test_pad_size_changes() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        let default_width = world.tuning.paddle_size.x;

        drop_on_paddle(&mut ctl, &world, PowerUpKind::PadSizeIncrease);
        ctl.collect(600.0, &mut world.targets());
        assert_eq!(world.paddle.size.x, default_width + 50.0);

        ctl.update(10.5, &mut world.targets());
        assert_eq!(world.paddle.size.x, default_width);

        for _ in 0..3 {
            drop_on_paddle(&mut ctl, &world, PowerUpKind::PadSizeDecrease);
            ctl.collect(600.0, &mut world.targets());
        }
        assert_eq!(world.paddle.size.x, world.tuning.paddle_min_width);
    }

    #[test]
    fn test_ball_big_resizes_and_restores() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::BallBig);
        ctl.collect(600.0, &mut world.targets());

        let ball = world.balls.first().unwrap();
        assert_eq!(ball.radius(), 25.0);
        assert_eq!(ball.size(), Vec2::splat(50.0));

        ctl.update(11.0, &mut world.targets());
        let ball = world.balls.first().unwrap();
        assert_eq!(ball.radius(), 12.5);
        assert_eq!(ball.size(), Vec2::splat(25.0));
    }

    #[test]
    fn test_pass_through_tints_balls() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::PassThrough);
        ctl.collect(600.0, &mut world.targets());
        let ball = world.balls.first().unwrap();
        assert!(ball.pass_through);
        assert_eq!(ball.color, PASS_THROUGH_TINT);

        ctl.update(10.5, &mut world.targets());
        let ball = world.balls.first().unwrap();
        assert!(!ball.pass_through);
        assert_eq!(ball.color, Vec3::ONE);
    }

    #[test]
    fn test_multi_ball_clones_first_ball() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::BallMulti);
        ctl.collect(600.0, &mut world.targets());

        assert_eq!(world.balls.len(), 2);
        assert_eq!(world.balls.emitter_count(), 2);
        let clone = world.balls.iter().nth(1).unwrap();
        assert_eq!(clone.vel, Vec2::new(-100.0, -350.0));
        assert!(!clone.stuck);
        assert_eq!(clone.pos, world.paddle.ball_spawn_point(world.tuning.ball_radius));
    }

    #[test]
    fn test_multi_ball_without_balls_is_noop() {
        let mut world = World::new();
        world.balls.clear();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::BallMulti);
        let caught = ctl.collect(600.0, &mut world.targets());
        assert_eq!(caught, vec![PowerUpKind::BallMulti]);
        assert!(world.balls.is_empty());
    }

    #[test]
    fn test_caught_powerup_not_caught_twice() {
        let mut world = World::new();
        let mut ctl = PowerUpController::new();
        drop_on_paddle(&mut ctl, &world, PowerUpKind::PadSizeIncrease);
        ctl.collect(600.0, &mut world.targets());
        ctl.collect(600.0, &mut world.targets());
        assert_eq!(world.paddle.size.x, world.tuning.paddle_size.x + 50.0);
    }
}
