/// Pure game-logic functions.
///
/// Every public function takes its inputs by reference (or by value for small
/// `Copy` types) and returns fresh values.  Nothing here touches the clock,
/// the RNG or the shared state container; the scheduler decides when each
/// rule runs.
use std::collections::HashSet;

use crate::consts::*;
use crate::entities::{Bullet, BulletDirection, Enemy, EnemyKind, Position, Velocity};

// ── Scoring ──────────────────────────────────────────────────────────────────

/// Score awarded per enemy destroyed.  Meteors score as regular enemies.
pub fn score_for(kind: &EnemyKind) -> u32 {
    match kind {
        EnemyKind::Fast => FAST_ENEMY_SCORE,
        EnemyKind::Normal | EnemyKind::Meteor { .. } => ENEMY_SCORE,
    }
}

// ── Enemy motion ─────────────────────────────────────────────────────────────

/// Linear speed ramp over the first `WARP_IN_TICKS` ticks.
pub fn warp_factor(age: u32) -> f32 {
    if age < WARP_IN_TICKS {
        (age as f32 / WARP_IN_TICKS as f32).min(1.0)
    } else {
        1.0
    }
}

pub fn move_enemy(enemy: &Enemy) -> Enemy {
    let age = enemy.age + 1;
    let warp = warp_factor(age);

    match enemy.kind {
        EnemyKind::Meteor {
            rotation,
            rotation_speed,
            speed,
        } => Enemy {
            y: enemy.y - speed * ENEMY_SPEED_SCALE * warp,
            age,
            kind: EnemyKind::Meteor {
                rotation: rotation + rotation_speed * METEOR_SPIN_SCALE,
                rotation_speed,
                speed,
            },
            ..enemy.clone()
        },
        EnemyKind::Fast | EnemyKind::Normal => {
            let base = if enemy.kind.is_fast() {
                FAST_ENEMY_SPEED
            } else {
                NORMAL_ENEMY_SPEED
            };
            Enemy {
                y: enemy.y + base * ENEMY_SPEED_SCALE * warp,
                age,
                ..enemy.clone()
            }
        }
    }
}

/// Meteors leave through the top edge, everything else through the bottom.
pub fn is_enemy_off_screen(enemy: &Enemy, screen_height: f32) -> bool {
    if enemy.kind.is_meteor() {
        enemy.y <= -ENEMY_SIZE
    } else {
        enemy.y >= screen_height
    }
}

/// One enemy-motion tick: move every enemy, then drop the ones that left.
pub fn advance_enemies(enemies: &[Enemy], screen_height: f32) -> Vec<Enemy> {
    enemies
        .iter()
        .map(move_enemy)
        .filter(|e| !is_enemy_off_screen(e, screen_height))
        .collect()
}

// ── Bullet motion ────────────────────────────────────────────────────────────

pub fn move_bullet(bullet: &Bullet) -> Bullet {
    Bullet {
        y: bullet.y + BULLET_SPEED * bullet.direction.sign() * BULLET_STEP,
        ..bullet.clone()
    }
}

pub fn is_bullet_off_screen(bullet: &Bullet, screen_height: f32) -> bool {
    bullet.y < -BULLET_SIZE || bullet.y > screen_height
}

/// One bullet-motion tick.
pub fn advance_bullets(bullets: &[Bullet], screen_height: f32) -> Vec<Bullet> {
    bullets
        .iter()
        .map(move_bullet)
        .filter(|b| !is_bullet_off_screen(b, screen_height))
        .collect()
}

/// Bullet leaving the ship's leading edge: the bottom edge when flipped,
/// the top edge otherwise.
pub fn create_bullet(player: Position, flipped: bool, id: u64) -> Bullet {
    let x = player.x + PLAYER_SIZE / 2.0 - BULLET_SIZE;
    let (y, direction) = if flipped {
        (player.y + PLAYER_SIZE, BulletDirection::Down)
    } else {
        (player.y - BULLET_SIZE, BulletDirection::Up)
    };
    Bullet { id, x, y, direction }
}

// ── Player motion ────────────────────────────────────────────────────────────

/// Move one velocity component toward `target`.  A zero target means no key
/// is held on that axis, so the component decays instead.
pub fn approach(current: f32, target: f32) -> f32 {
    let next = if target != 0.0 {
        current + (target - current) * ACCELERATION
    } else {
        current * DECELERATION
    };
    if next.abs() < VELOCITY_EPSILON {
        0.0
    } else {
        next
    }
}

/// Integrate the player one tick and clamp it inside the arena.
pub fn update_player(
    position: Position,
    velocity: Velocity,
    target: Velocity,
    screen_width: f32,
    screen_height: f32,
) -> (Position, Velocity) {
    let velocity = Velocity {
        x: approach(velocity.x, target.x),
        y: approach(velocity.y, target.y),
    };
    let max_x = (screen_width - PLAYER_SIZE).max(0.0);
    let max_y = (screen_height - PLAYER_SIZE).max(0.0);
    let position = Position {
        x: (position.x + velocity.x).clamp(0.0, max_x),
        y: (position.y + velocity.y).clamp(0.0, max_y),
    };
    (position, velocity)
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Result of one bullet-vs-enemy pass.
#[derive(Clone, Debug, Default)]
pub struct HitReport {
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub score_gain: u32,
    pub enemies_destroyed: usize,
    pub bullets_spent: usize,
}

/// Test every (bullet, enemy) pair against the same pre-pass snapshot.
/// Every overlapping bullet is spent; an enemy hit by several bullets is
/// removed, and scored, once.
pub fn resolve_bullet_hits(bullets: &[Bullet], enemies: &[Enemy]) -> HitReport {
    let mut hit_enemies: HashSet<u64> = HashSet::new();
    let mut hit_bullets: HashSet<u64> = HashSet::new();

    for bullet in bullets {
        let b = bullet.bounds();
        for enemy in enemies {
            if b.overlaps(&enemy.bounds()) {
                hit_enemies.insert(enemy.id);
                hit_bullets.insert(bullet.id);
            }
        }
    }

    let score_gain = enemies
        .iter()
        .filter(|e| hit_enemies.contains(&e.id))
        .map(|e| score_for(&e.kind))
        .sum();

    HitReport {
        enemies: enemies
            .iter()
            .filter(|e| !hit_enemies.contains(&e.id))
            .cloned()
            .collect(),
        bullets: bullets
            .iter()
            .filter(|b| !hit_bullets.contains(&b.id))
            .cloned()
            .collect(),
        score_gain,
        enemies_destroyed: hit_enemies.len(),
        bullets_spent: hit_bullets.len(),
    }
}

/// True if the player's box overlaps any enemy.
pub fn player_collides(player: Position, enemies: &[Enemy]) -> bool {
    let p = player.player_box();
    enemies.iter().any(|e| p.overlaps(&e.bounds()))
}
