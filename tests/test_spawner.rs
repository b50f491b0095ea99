use rand::rngs::StdRng;
use rand::SeedableRng;

use meteor_patrol::consts::*;
use meteor_patrol::entities::*;
use meteor_patrol::geometry::Arena;
use meteor_patrol::spawner::{spawn_enemies, IdAllocator};

fn arena() -> Arena {
    Arena::new(960.0, 540.0)
}

fn pattern(spawn: f64, count: u32, meteor: f64, fast: f64) -> WavePattern {
    WavePattern {
        spawn_chance: spawn,
        enemy_count: count,
        meteor_chance: meteor,
        fast_chance: fast,
    }
}

fn parked(n: usize) -> Vec<Enemy> {
    // Mid-screen, well clear of both spawn rows.
    (0..n)
        .map(|i| Enemy {
            id: 1000 + i as u64,
            x: (i % 10) as f32 * 90.0,
            y: 200.0 + (i / 10) as f32 * 45.0,
            age: 20,
            kind: EnemyKind::Normal,
        })
        .collect()
}

#[test]
fn full_field_spawns_nothing() {
    let current = parked(MAX_ENEMIES);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids = IdAllocator::new();
        let out = spawn_enemies(
            &current,
            &pattern(1.0, 6, 0.5, 0.4),
            arena(),
            MAX_ENEMIES,
            &mut ids,
            &mut rng,
        );
        assert!(out.is_empty());
        assert_eq!(ids.peek(), 0);
    }
}

#[test]
fn batch_truncated_at_cap() {
    let current = parked(MAX_ENEMIES - 1);
    let mut rng = StdRng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    let out = spawn_enemies(
        &current,
        &pattern(1.0, 6, 0.0, 0.0),
        arena(),
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    assert_eq!(out.len(), 1);
    assert!(current.len() + out.len() <= MAX_ENEMIES);
}

#[test]
fn zero_spawn_chance_never_spawns() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    for _ in 0..200 {
        let out = spawn_enemies(
            &[],
            &pattern(0.0, 6, 0.5, 0.5),
            arena(),
            MAX_ENEMIES,
            &mut ids,
            &mut rng,
        );
        assert!(out.is_empty());
    }
}

#[test]
fn certain_spawn_yields_count_or_one_more() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids = IdAllocator::new();
        let out = spawn_enemies(
            &[],
            &pattern(1.0, 3, 0.2, 0.15),
            arena(),
            MAX_ENEMIES,
            &mut ids,
            &mut rng,
        );
        assert!((3..=4).contains(&out.len()), "seed {seed}: {}", out.len());
    }
}

#[test]
fn new_enemies_keep_their_distance() {
    let current = parked(10);
    let mut rng = StdRng::seed_from_u64(7);
    let mut ids = IdAllocator::new();
    let mut all = current.clone();
    for _ in 0..5 {
        let out = spawn_enemies(
            &all,
            &pattern(1.0, 4, 0.3, 0.25),
            arena(),
            MAX_ENEMIES,
            &mut ids,
            &mut rng,
        );
        all.extend(out);
    }
    assert!(all.len() > current.len());
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            let d = (a.x - b.x).abs() + (a.y - b.y).abs();
            assert!(d >= MIN_ENEMY_SPACING, "{a:?} too close to {b:?}");
        }
    }
}

#[test]
fn meteors_start_at_bottom_with_rolled_motion() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    let out = spawn_enemies(
        &[],
        &pattern(1.0, 5, 1.0, 0.0),
        arena(),
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    assert!(!out.is_empty());
    for e in &out {
        assert_eq!(e.y, 540.0);
        assert_eq!(e.age, 0);
        assert!(e.x >= 0.0 && e.x <= 960.0 - ENEMY_SIZE);
        match e.kind {
            EnemyKind::Meteor { rotation, rotation_speed, speed } => {
                assert!((0.0..360.0).contains(&rotation));
                assert!((-2.0..=2.0).contains(&rotation_speed));
                assert!((6.0..=18.0).contains(&speed));
            }
            other => panic!("expected a meteor, got {other:?}"),
        }
    }
}

#[test]
fn descending_enemies_start_above_the_top() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    let fast = spawn_enemies(
        &[],
        &pattern(1.0, 4, 0.0, 1.0),
        arena(),
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    assert!(fast.iter().all(|e| e.kind == EnemyKind::Fast && e.y == -ENEMY_SIZE));

    let normal = spawn_enemies(
        &[],
        &pattern(1.0, 4, 0.0, 0.0),
        arena(),
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    assert!(normal.iter().all(|e| e.kind == EnemyKind::Normal));
}

#[test]
fn crowded_candidates_are_dropped() {
    // Arena exactly one enemy wide: every candidate lands on x = 0.
    let narrow = Arena::new(ENEMY_SIZE, 540.0);
    let mut rng = StdRng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    let out = spawn_enemies(
        &[],
        &pattern(1.0, 4, 0.0, 0.0),
        narrow,
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    assert_eq!(out.len(), 1);

    let again = spawn_enemies(
        &out,
        &pattern(1.0, 4, 0.0, 0.0),
        narrow,
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    assert!(again.is_empty());
}

#[test]
fn ids_are_sequential_and_never_reused() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut ids = IdAllocator::new();
    let first = spawn_enemies(
        &[],
        &pattern(1.0, 3, 0.2, 0.2),
        arena(),
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    let second = spawn_enemies(
        &first,
        &pattern(1.0, 3, 0.2, 0.2),
        arena(),
        MAX_ENEMIES,
        &mut ids,
        &mut rng,
    );
    let all: Vec<u64> = first.iter().chain(second.iter()).map(|e| e.id).collect();
    let expected: Vec<u64> = (0..all.len() as u64).collect();
    assert_eq!(all, expected);
    assert_eq!(ids.peek(), all.len() as u64);
}

#[test]
fn same_seed_same_batch() {
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids = IdAllocator::new();
        spawn_enemies(
            &[],
            &pattern(1.0, 5, 0.4, 0.35),
            arena(),
            MAX_ENEMIES,
            &mut ids,
            &mut rng,
        )
    };
    assert_eq!(run(42), run(42));
}
