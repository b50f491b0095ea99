/// Axis-aligned bounding boxes.
///
/// Every entity is a square anchored at its top-left corner.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self { x, y, size }
    }

    /// Strict overlap test: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.size
            && self.x + self.size > other.x
            && self.y < other.y + other.size
            && self.y + self.size > other.y
    }
}

/// Playfield dimensions in screen units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Free-function form of [`Aabb::overlaps`].
pub fn check_collision(x1: f32, y1: f32, size1: f32, x2: f32, y2: f32, size2: f32) -> bool {
    Aabb::new(x1, y1, size1).overlaps(&Aabb::new(x2, y2, size2))
}
