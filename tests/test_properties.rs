use std::collections::HashSet;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use meteor_patrol::compute::{is_bullet_off_screen, is_enemy_off_screen, resolve_bullet_hits};
use meteor_patrol::config::CollisionPolicy;
use meteor_patrol::consts::keys;
use meteor_patrol::entities::*;
use meteor_patrol::input::KeyEvent;
use meteor_patrol::{Session, Settings};

/// Gameplay keys only; confirm would reset a finished run.
const PLAY_KEYS: [u32; 7] = [
    keys::UP,
    keys::DOWN,
    keys::LEFT,
    keys::RIGHT,
    keys::PLAY_PAUSE,
    keys::REWIND,
    keys::FAST_FORWARD,
];

#[derive(Clone, Debug)]
enum Step {
    Press(usize),
    Release(usize),
    Wait(u64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..PLAY_KEYS.len()).prop_map(Step::Press),
        (0..PLAY_KEYS.len()).prop_map(Step::Release),
        (1u64..400).prop_map(Step::Wait),
    ]
}

fn started(seed: u64) -> Session {
    let settings = Settings {
        collision_policy: CollisionPolicy::GameOver,
        ..Settings::default()
    };
    let mut s = Session::with_rng(settings, StdRng::seed_from_u64(seed));
    s.handle_key(KeyEvent::down(keys::CENTER));
    s.handle_key(KeyEvent::down(keys::CENTER));
    s
}

fn apply(s: &mut Session, step: &Step) {
    match *step {
        Step::Press(i) => {
            s.handle_key(KeyEvent::down(PLAY_KEYS[i]));
        }
        Step::Release(i) => {
            s.handle_key(KeyEvent::up(PLAY_KEYS[i]));
        }
        Step::Wait(ms) => {
            s.advance(ms);
        }
    }
}

fn arb_bullet() -> impl Strategy<Value = (f32, f32)> {
    (0f32..300.0, 0f32..300.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn score_never_decreases(seed in any::<u64>(), steps in prop::collection::vec(step(), 1..80)) {
        let mut s = started(seed);
        let mut last = s.state().score;
        for st in &steps {
            apply(&mut s, st);
            prop_assert!(s.state().score >= last);
            last = s.state().score;
        }
    }

    #[test]
    fn nothing_lingers_off_screen(seed in any::<u64>(), steps in prop::collection::vec(step(), 1..80)) {
        let mut s = started(seed);
        for st in &steps {
            apply(&mut s, st);
            let state = s.state();
            let h = state.arena.height;
            prop_assert!(state.enemies.iter().all(|e| !is_enemy_off_screen(e, h)));
            prop_assert!(state.bullets.iter().all(|b| !is_bullet_off_screen(b, h)));
        }
    }

    #[test]
    fn ids_stay_unique(seed in any::<u64>(), steps in prop::collection::vec(step(), 1..80)) {
        let mut s = started(seed);
        for st in &steps {
            apply(&mut s, st);
            let state = s.state();
            let mut seen = HashSet::new();
            for id in state.enemies.iter().map(|e| e.id).chain(state.bullets.iter().map(|b| b.id)) {
                prop_assert!(seen.insert(id), "duplicate id {}", id);
            }
            prop_assert!(state.enemies.len() <= s.settings().max_enemies);
        }
    }

    #[test]
    fn collision_pass_is_idempotent(
        bullets in prop::collection::vec(arb_bullet(), 0..12),
        enemies in prop::collection::vec((0f32..300.0, 0f32..300.0, any::<bool>()), 0..12),
    ) {
        let bullets: Vec<Bullet> = bullets
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| Bullet { id: i as u64, x, y, direction: BulletDirection::Up })
            .collect();
        let enemies: Vec<Enemy> = enemies
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, fast))| Enemy {
                id: 100 + i as u64,
                x,
                y,
                age: 0,
                kind: if fast { EnemyKind::Fast } else { EnemyKind::Normal },
            })
            .collect();

        let first = resolve_bullet_hits(&bullets, &enemies);
        prop_assert_eq!(first.enemies.len() + first.enemies_destroyed, enemies.len());
        prop_assert_eq!(first.bullets.len() + first.bullets_spent, bullets.len());

        let second = resolve_bullet_hits(&first.bullets, &first.enemies);
        prop_assert_eq!(second.score_gain, 0);
        prop_assert_eq!(second.enemies, first.enemies);
        prop_assert_eq!(second.bullets, first.bullets);
    }
}
