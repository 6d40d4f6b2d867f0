//! Collision detection for axis-aligned boxes and circles
//!
//! Everything in the arena is either a box (bricks, paddle, powerups) or a
//! circle (balls). Positions are top-left corners in window space, so a
//! ball's center is `position + radius`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Ball;
use crate::try_direction;

/// An axis-aligned bounding box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

/// Which side of a box a circle touched, as seen from the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Compass in tie-break order
    pub const COMPASS: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector of this direction
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Closest compass direction to `v`; ties go to the earlier entry of
    /// [`Direction::COMPASS`]. `None` for a zero-length vector.
    pub fn classify(v: Vec2) -> Option<Direction> {
        let dir = try_direction(v)?;
        let mut best = Direction::Up;
        let mut max = f32::NEG_INFINITY;
        for candidate in Self::COMPASS {
            let dot = dir.dot(candidate.unit());
            if dot > max {
                max = dot;
                best = candidate;
            }
        }
        Some(best)
    }
}

/// A circle-vs-box contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Box side the circle is on
    pub direction: Direction,
    /// Closest point on the box minus the circle center
    pub diff: Vec2,
}

impl Contact {
    /// Overlap depth along the axis of `direction`
    pub fn penetration(&self, radius: f32) -> f32 {
        let along = if self.direction.is_horizontal() {
            self.diff.x
        } else {
            self.diff.y
        };
        radius - along.abs()
    }

    /// Translation that moves the circle back out of the box
    pub fn correction(&self, radius: f32) -> Vec2 {
        self.direction.unit() * self.penetration(radius)
    }
}

/// AABB vs AABB overlap. Touching edges count as overlap.
pub fn check_box_box(a: &Aabb, b: &Aabb) -> bool {
    let a_max = a.max();
    let b_max = b.max();
    let overlap_x = a_max.x >= b.pos.x && b_max.x >= a.pos.x;
    let overlap_y = a_max.y >= b.pos.y && b_max.y >= a.pos.y;
    overlap_x && overlap_y
}

/// Circle vs AABB contact
///
/// A circle exactly touching the box is not a contact, so a ball that was
/// just pushed out by resolution does not trigger again. `approach` is the
/// circle's velocity; when its center lies inside the box the side is taken
/// from the opposite of that velocity, then `Up` if the circle is at rest.
pub fn circle_box_contact(center: Vec2, radius: f32, aabb: &Aabb, approach: Vec2) -> Option<Contact> {
    let half = aabb.half_extents();
    let box_center = aabb.center();
    let clamped = (center - box_center).clamp(-half, half);
    let closest = box_center + clamped;
    let diff = closest - center;

    if diff.length() >= radius {
        return None;
    }

    let direction = Direction::classify(-diff)
        .or_else(|| Direction::classify(-approach))
        .unwrap_or(Direction::Up);
    Some(Contact { direction, diff })
}

/// Ball vs AABB contact
pub fn check_circle_box(ball: &Ball, aabb: &Aabb) -> Option<Contact> {
    circle_box_contact(ball.center(), ball.radius(), aabb, ball.vel)
}
