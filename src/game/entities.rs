//! Player and obstacles

use super::physics::{Rect, FIELD_HEIGHT, FIELD_WIDTH};
use super::tuning::Tuning;

/// Display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const PLAYER_COLOR: Rgb = Rgb(52, 152, 219);
pub const BULLET_COLOR: Rgb = Rgb(46, 204, 113);
pub const NORMAL_OBSTACLE_COLOR: Rgb = Rgb(255, 255, 255);
pub const IMMUNE_OBSTACLE_COLOR: Rgb = Rgb(231, 76, 60);

/// How an obstacle reacts to bullets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Destroyed by a bullet
    Normal,
    /// Bullets pass through; can only be dodged
    Immune,
}

impl ObstacleKind {
    pub fn default_color(self) -> Rgb {
        match self {
            ObstacleKind::Normal => NORMAL_OBSTACLE_COLOR,
            ObstacleKind::Immune => IMMUNE_OBSTACLE_COLOR,
        }
    }

    pub fn is_shootable(self) -> bool {
        self == ObstacleKind::Normal
    }
}

/// Falling obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
    pub color: Rgb,
}

impl Obstacle {
    /// New obstacle just above the top edge at horizontal position `x`
    pub fn spawn(x: f32, kind: ObstacleKind, tuning: &Tuning) -> Self {
        let size = tuning.obstacle_size;
        Self {
            rect: Rect::new(x, -size, size, size),
            kind,
            color: kind.default_color(),
        }
    }
}

/// Player ship
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
}

impl Player {
    /// Centred horizontally, just above the bottom edge
    pub fn new(tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        Self {
            rect: Rect::new(
                (FIELD_WIDTH / 2.0 - size / 2.0).floor(),
                FIELD_HEIGHT - size - tuning.player_bottom_margin,
                size,
                size,
            ),
        }
    }
}
