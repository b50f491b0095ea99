/// All game entity types: pure data, no logic.
use serde::{Deserialize, Serialize};

use crate::consts::{BULLET_SIZE, ENEMY_SIZE, PLAYER_SIZE};
use crate::geometry::Aabb;

// ── Player kinematics ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn player_box(&self) -> Aabb {
        Aabb::new(self.x, self.y, PLAYER_SIZE)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyKind {
    /// Descends at the base speed.
    Normal,
    /// Descends at the fast speed and is worth more.
    Fast,
    /// Rises from the bottom edge, spinning.
    Meteor {
        /// Degrees.
        rotation: f32,
        /// Degrees added per tick before scaling.
        rotation_speed: f32,
        /// Unscaled climb speed.
        speed: f32,
    },
}

impl EnemyKind {
    pub fn is_meteor(&self) -> bool {
        matches!(self, EnemyKind::Meteor { .. })
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, EnemyKind::Fast)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    /// Motion ticks since spawn.
    pub age: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, ENEMY_SIZE)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletDirection {
    /// Toward the top edge.
    Up,
    /// Toward the bottom edge.
    Down,
}

impl BulletDirection {
    pub fn sign(&self) -> f32 {
        match self {
            BulletDirection::Up => -1.0,
            BulletDirection::Down => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub direction: BulletDirection,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, BULLET_SIZE)
    }
}

// ── Ship selection (cosmetic) ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipType {
    One,
    Two,
    Three,
}

impl ShipType {
    pub const ALL: [ShipType; 3] = [ShipType::One, ShipType::Two, ShipType::Three];

    pub fn number(&self) -> u8 {
        match self {
            ShipType::One => 1,
            ShipType::Two => 2,
            ShipType::Three => 3,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }

    /// Types beyond the first require entitlement.
    pub fn is_premium(&self) -> bool {
        *self != ShipType::One
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipColor {
    Blue,
    Green,
    Orange,
    Red,
}

impl ShipColor {
    pub const ALL: [ShipColor; 4] = [
        ShipColor::Blue,
        ShipColor::Green,
        ShipColor::Orange,
        ShipColor::Red,
    ];

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
    let len = all.len() as isize;
    let idx = all.iter().position(|c| *c == current).unwrap_or(0) as isize;
    all[(idx + step).rem_euclid(len) as usize]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub kind: ShipType,
    pub color: ShipColor,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            kind: ShipType::One,
            color: ShipColor::Blue,
        }
    }
}

// ── Difficulty ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavePattern {
    /// Probability that a spawn tick produces a batch at all.
    pub spawn_chance: f64,
    /// Base batch size; one extra enemy is added half the time.
    pub enemy_count: u32,
    pub meteor_chance: f64,
    /// Applies to non-meteors only.
    pub fast_chance: f64,
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Ship selector shown; directional keys cycle the ship.
    SelectingShip,
    /// Ship confirmed, waiting for the first key to start.
    Ready,
    Playing,
    Paused,
    /// Terminal: the player collided (only under the game-over collision policy).
    GameOver,
    /// Terminal: the countdown reached zero.
    Cleared,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::GameOver | GameStatus::Cleared)
    }
}
