/// Enemy spawning.
///
/// All randomness comes through the injected RNG so a seeded generator
/// reproduces a run exactly.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{ENEMY_SIZE, MAX_PLACEMENT_ATTEMPTS, MIN_ENEMY_SPACING};
use crate::entities::{Enemy, EnemyKind, WavePattern};
use crate::geometry::Arena;

/// Monotonic id source shared by enemies and bullets.  Ids are never reused
/// within a session, resets included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call will hand out.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

fn manhattan(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

fn is_clear(x: f32, y: f32, existing: &[Enemy], placed: &[Enemy]) -> bool {
    existing
        .iter()
        .chain(placed.iter())
        .all(|e| manhattan(x, y, e.x, e.y) >= MIN_ENEMY_SPACING)
}

/// Roll a spawn batch for one spawn tick.
///
/// Returns only the new enemies; the caller appends them.  Nothing spawns once
/// `current` holds `max_enemies`, and a batch never pushes the total past it.
/// A candidate that finds no clear slot within `MAX_PLACEMENT_ATTEMPTS` is
/// dropped.
pub fn spawn_enemies(
    current: &[Enemy],
    pattern: &WavePattern,
    arena: Arena,
    max_enemies: usize,
    ids: &mut IdAllocator,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    if current.len() >= max_enemies {
        return Vec::new();
    }
    if rng.gen::<f64>() >= pattern.spawn_chance {
        return Vec::new();
    }

    let requested = pattern.enemy_count as usize + rng.gen_range(0..=1);
    let count = requested.min(max_enemies - current.len());
    let span = (arena.width - ENEMY_SIZE).max(0.0);

    let mut placed: Vec<Enemy> = Vec::with_capacity(count);
    let mut dropped = 0usize;

    for _ in 0..count {
        let mut slot = None;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = rng.gen::<f32>() * span;
            let meteor = rng.gen::<f64>() < pattern.meteor_chance;
            let y = if meteor { arena.height } else { -ENEMY_SIZE };
            if is_clear(x, y, current, &placed) {
                slot = Some((x, y, meteor));
                break;
            }
        }

        let Some((x, y, meteor)) = slot else {
            dropped += 1;
            continue;
        };

        let kind = if meteor {
            EnemyKind::Meteor {
                rotation: rng.gen::<f32>() * 360.0,
                rotation_speed: rng.gen::<f32>() * 4.0 - 2.0,
                speed: 6.0 + rng.gen::<f32>() * 12.0,
            }
        } else if rng.gen::<f64>() < pattern.fast_chance {
            EnemyKind::Fast
        } else {
            EnemyKind::Normal
        };

        placed.push(Enemy {
            id: ids.next_id(),
            x,
            y,
            age: 0,
            kind,
        });
    }

    debug!(
        "spawned {} enemies ({} dropped, {} live)",
        placed.len(),
        dropped,
        current.len() + placed.len()
    );
    placed
}
