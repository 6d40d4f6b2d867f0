//! Brick layouts
//!
//! A level is an ordered list of bricks built from a tile grid. Destroyed
//! bricks stay in the list (inert) until the level is reset.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// A single brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Vec3,
    /// Indestructible; does not count toward completion
    pub solid: bool,
    pub destroyed: bool,
}

impl Brick {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Tile color for a grid code, `None` for empty cells
fn tile_color(code: u8) -> Option<Vec3> {
    match code {
        0 => None,
        1 => Some(Vec3::new(0.8, 0.8, 0.7)),
        2 => Some(Vec3::new(0.2, 0.6, 1.0)),
        3 => Some(Vec3::new(0.0, 0.7, 0.0)),
        4 => Some(Vec3::new(0.8, 0.8, 0.4)),
        5 => Some(Vec3::new(1.0, 0.5, 0.0)),
        _ => Some(Vec3::ONE),
    }
}

/// An ordered brick field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub bricks: Vec<Brick>,
}

impl Level {
    /// Lay out a tile grid over a `width` x `height` area
    ///
    /// Codes: 0 empty, 1 solid, anything else a breakable brick. All rows
    /// are scaled to the width of the first row.
    pub fn from_tiles<R: AsRef<[u8]>>(rows: &[R], width: f32, height: f32) -> Self {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, |r| r.as_ref().len());
        if row_count == 0 || col_count == 0 {
            return Self::default();
        }

        let unit = Vec2::new(width / col_count as f32, height / row_count as f32);
        let mut bricks = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &code) in row.as_ref().iter().enumerate() {
                let Some(color) = tile_color(code) else {
                    continue;
                };
                bricks.push(Brick {
                    pos: Vec2::new(x as f32, y as f32) * unit,
                    size: unit,
                    color,
                    solid: code == 1,
                    destroyed: false,
                });
            }
        }
        Self { bricks }
    }

    /// Restore every brick
    pub fn reset(&mut self) {
        for brick in &mut self.bricks {
            brick.destroyed = false;
        }
    }

    /// Bricks not yet destroyed; solid ones only if `include_solid`
    pub fn count_remaining(&self, include_solid: bool) -> usize {
        self.bricks
            .iter()
            .filter(|b| !b.destroyed && (include_solid || !b.solid))
            .count()
    }

    /// True once every breakable brick is destroyed
    pub fn is_completed(&self) -> bool {
        self.count_remaining(false) == 0
    }
}

/// Tile grids of the levels shipped with the game
const BUILTIN_TILES: [&[&[u8]]; 4] = [
    &[
        &[5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5],
        &[5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5],
        &[4, 4, 4, 4, 4, 0, 0, 0, 0, 0, 4, 4, 4, 4, 4],
        &[4, 1, 4, 1, 4, 0, 0, 1, 0, 0, 4, 1, 4, 1, 4],
        &[3, 3, 3, 3, 3, 0, 0, 0, 0, 0, 3, 3, 3, 3, 3],
        &[3, 3, 1, 3, 3, 3, 3, 3, 3, 3, 3, 3, 1, 3, 3],
        &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
    ],
    &[
        &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        &[1, 0, 5, 5, 0, 5, 5, 0, 5, 5, 0, 5, 5, 0, 1],
        &[1, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 1],
        &[1, 0, 3, 3, 0, 3, 3, 0, 3, 3, 0, 3, 3, 0, 1],
        &[1, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 1],
        &[1, 0, 2, 2, 0, 2, 2, 0, 2, 2, 0, 2, 2, 0, 1],
        &[1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
        &[1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1],
    ],
    &[
        &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0],
        &[0, 0, 0, 2, 0, 0, 0, 0, 0, 2, 0, 0, 0],
        &[0, 0, 0, 5, 5, 5, 5, 5, 5, 5, 0, 0, 0],
        &[0, 0, 5, 5, 0, 5, 5, 5, 0, 5, 5, 0, 0],
        &[0, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 0],
        &[0, 3, 0, 1, 1, 1, 1, 1, 1, 1, 0, 3, 0],
        &[0, 3, 0, 3, 0, 0, 0, 0, 0, 3, 0, 3, 0],
        &[0, 0, 0, 0, 4, 4, 0, 4, 4, 0, 0, 0, 0],
    ],
    &[
        &[1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1, 2, 1],
        &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        &[2, 1, 3, 1, 4, 1, 5, 1, 4, 1, 3, 1, 2],
        &[2, 3, 3, 4, 4, 5, 5, 5, 4, 4, 3, 3, 2],
        &[2, 1, 3, 1, 4, 1, 5, 1, 4, 1, 3, 1, 2],
        &[2, 2, 3, 3, 4, 4, 5, 4, 4, 3, 3, 2, 2],
    ],
];

/// The built-in levels laid out for a window of the given size
pub fn builtin_levels(width: f32, height: f32) -> Vec<Level> {
    BUILTIN_TILES
        .iter()
        .map(|tiles| Level::from_tiles(*tiles, width, height))
        .collect()
}
