use rand::rngs::StdRng;
use rand::SeedableRng;

use meteor_patrol::config::FeatureFlags;
use meteor_patrol::consts::keys;
use meteor_patrol::entities::*;
use meteor_patrol::input::KeyEvent;
use meteor_patrol::scheduler::Stream;
use meteor_patrol::services::*;
use meteor_patrol::{Session, Settings};

fn session(settings: Settings) -> Session {
    Session::with_rng(settings, StdRng::seed_from_u64(42))
}

fn voiced() -> Settings {
    Settings {
        features: FeatureFlags {
            in_app_payments: false,
            voice_commands: true,
        },
        ..Settings::default()
    }
}

fn paid() -> Settings {
    Settings {
        features: FeatureFlags {
            in_app_payments: true,
            voice_commands: true,
        },
        ..Settings::default()
    }
}

// ── Voice commands ────────────────────────────────────────────────────────────

#[test]
fn phrases_parse_loosely() {
    assert_eq!(VoiceCommand::parse("start game"), Some(VoiceCommand::StartGame));
    assert_eq!(VoiceCommand::parse("  PAUSE Game "), Some(VoiceCommand::PauseGame));
    assert_eq!(VoiceCommand::parse("Alexa, resume game"), Some(VoiceCommand::ResumeGame));
    assert_eq!(VoiceCommand::parse("alexa restart game"), Some(VoiceCommand::RestartGame));
    assert_eq!(VoiceCommand::parse("new game"), Some(VoiceCommand::NewGame));
    assert_eq!(VoiceCommand::parse("do a barrel roll"), None);
    assert_eq!(VoiceCommand::parse(""), None);
}

#[test]
fn voice_start_confirms_and_starts() {
    let mut s = session(voiced());
    assert!(s.apply_voice(VoiceCommand::StartGame));
    assert_eq!(s.state().status, GameStatus::Playing);
    assert!(s.snapshot().flags.ship_selected);
    assert!(s.scheduler().is_armed(Stream::Countdown));

    // Already running: nothing to do.
    assert!(!s.apply_voice(VoiceCommand::StartGame));
}

#[test]
fn voice_pause_and_resume() {
    let mut s = session(voiced());
    s.apply_voice(VoiceCommand::StartGame);

    assert!(s.apply_voice(VoiceCommand::PauseGame));
    assert_eq!(s.state().status, GameStatus::Paused);
    assert!(s.snapshot().flags.paused);
    assert!(!s.apply_voice(VoiceCommand::PauseGame));
    assert!(!s.scheduler().is_armed(Stream::Spawn));

    assert!(s.apply_voice(VoiceCommand::ResumeGame));
    assert_eq!(s.state().status, GameStatus::Playing);
    assert!(s.scheduler().is_armed(Stream::Spawn));
}

#[test]
fn held_fire_keeps_repeating_after_resume() {
    let mut s = session(Settings {
        max_enemies: 0,
        ..voiced()
    });
    s.apply_voice(VoiceCommand::StartGame);
    s.handle_key(KeyEvent::down(keys::PLAY_PAUSE));
    assert_eq!(s.state().ids.peek(), 1);

    s.apply_voice(VoiceCommand::PauseGame);
    assert!(!s.scheduler().is_armed(Stream::FireRepeat));
    s.advance(500);
    assert_eq!(s.state().ids.peek(), 1);

    s.apply_voice(VoiceCommand::ResumeGame);
    assert!(s.state().firing);
    assert!(s.scheduler().is_armed(Stream::FireRepeat));
    s.advance(1000);
    assert_eq!(s.state().ids.peek(), 11);

    s.handle_key(KeyEvent::up(keys::PLAY_PAUSE));
    s.advance(1000);
    assert_eq!(s.state().ids.peek(), 11);
}

#[test]
fn fire_released_during_pause_stays_released() {
    let mut s = session(Settings {
        max_enemies: 0,
        ..Settings::default()
    });
    s.handle_key(KeyEvent::down(keys::CENTER));
    s.handle_key(KeyEvent::down(keys::PLAY_PAUSE));
    assert!(s.pause());
    s.handle_key(KeyEvent::up(keys::PLAY_PAUSE));
    assert!(s.resume());
    assert!(!s.state().firing);
    s.advance(1000);
    assert_eq!(s.state().ids.peek(), 1);
}

#[test]
fn pause_and_resume_do_not_need_voice() {
    let mut s = session(Settings::default());
    assert!(!s.settings().features.voice_commands);
    assert!(!s.pause());
    s.handle_key(KeyEvent::down(keys::CENTER));
    s.handle_key(KeyEvent::down(keys::CENTER));
    assert!(s.pause());
    assert_eq!(s.state().status, GameStatus::Paused);
    assert!(!s.scheduler().is_armed(Stream::Countdown));
    assert!(!s.pause());
    assert!(s.resume());
    assert!(s.scheduler().is_armed(Stream::Countdown));
}

#[test]
fn voice_restart_returns_to_selector() {
    let mut s = session(voiced());
    s.apply_voice(VoiceCommand::StartGame);
    s.advance(3000);
    assert!(s.apply_voice(VoiceCommand::RestartGame));
    assert_eq!(s.state().status, GameStatus::SelectingShip);
    assert_eq!(s.state().time_left, 30);
    assert_eq!(s.state().wave_timer, 0);
    assert!(!s.scheduler().is_armed(Stream::Countdown));

    assert!(s.apply_voice(VoiceCommand::NewGame));
    assert_eq!(s.state().status, GameStatus::SelectingShip);
}

#[test]
fn voice_is_off_by_default() {
    let mut s = session(Settings::default());
    assert!(!s.apply_voice(VoiceCommand::StartGame));
    assert_eq!(s.state().status, GameStatus::SelectingShip);
}

#[test]
fn voice_ignored_when_disabled() {
    let mut s = session(Settings {
        features: FeatureFlags {
            in_app_payments: false,
            voice_commands: false,
        },
        ..Settings::default()
    });
    assert!(!s.apply_voice(VoiceCommand::StartGame));
    assert_eq!(s.state().status, GameStatus::SelectingShip);
}

// ── Entitlement ───────────────────────────────────────────────────────────────

#[test]
fn payments_off_unlocks_everything() {
    let mut s = session(Settings::default());
    assert!(s.state().entitled);
    s.set_entitled(false);
    assert!(s.state().entitled);

    s.handle_key(KeyEvent::down(keys::DOWN));
    assert_eq!(s.state().ship.kind, ShipType::Two);
}

#[test]
fn payments_on_starts_locked() {
    let mut s = session(paid());
    assert!(!s.state().entitled);
    assert!(!s.snapshot().entitled);
    s.handle_key(KeyEvent::down(keys::DOWN));
    assert_eq!(s.state().ship.kind, ShipType::One);

    s.set_entitled(true);
    s.handle_key(KeyEvent::down(keys::DOWN));
    assert_eq!(s.state().ship.kind, ShipType::Two);
}

#[test]
fn losing_entitlement_reverts_highlighted_premium_ship() {
    let mut s = session(paid());
    s.set_entitled(true);
    s.handle_key(KeyEvent::down(keys::UP));
    assert_eq!(s.state().ship.kind, ShipType::Three);

    s.set_entitled(false);
    assert_eq!(s.state().ship.kind, ShipType::One);
}

#[test]
fn entitlement_survives_reset() {
    let mut s = session(paid());
    s.set_entitled(true);
    s.apply_voice(VoiceCommand::StartGame);
    s.reset();
    assert!(s.state().entitled);
}

#[test]
fn entitlement_sources() {
    assert!(resolve_entitlement(&Unlocked));
    assert!(!resolve_entitlement(&Offline));
    assert!(Offline.check().is_err());
}

#[test]
fn entitlement_file_reads_payment_status() {
    let dir = tempfile::tempdir().unwrap();

    let yes = dir.path().join("paid.json");
    std::fs::write(&yes, r#"{"isPaid": true}"#).unwrap();
    assert!(EntitlementFile::new(&yes).check().unwrap());
    assert!(resolve_entitlement(&EntitlementFile::new(&yes)));

    let no = dir.path().join("unpaid.json");
    std::fs::write(&no, r#"{"isPaid": false}"#).unwrap();
    assert!(!resolve_entitlement(&EntitlementFile::new(&no)));

    let empty = dir.path().join("empty.json");
    std::fs::write(&empty, "{}").unwrap();
    assert!(!EntitlementFile::new(&empty).check().unwrap());
}

#[test]
fn broken_entitlement_file_means_not_entitled() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(EntitlementFile::new(&missing).check().is_err());
    assert!(!resolve_entitlement(&EntitlementFile::new(&missing)));

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    assert!(!resolve_entitlement(&EntitlementFile::new(&garbage)));
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[test]
fn snapshot_serializes_for_front_ends() {
    let mut s = session(voiced());
    s.apply_voice(VoiceCommand::StartGame);
    s.state_mut().enemies.push(Enemy {
        id: 77,
        x: 10.0,
        y: 20.0,
        age: 3,
        kind: EnemyKind::Fast,
    });
    let v = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(v["status"], "playing");
    assert_eq!(v["flags"]["started"], true);
    assert_eq!(v["time_left"], 30);
    assert_eq!(v["enemies"][0]["kind"]["type"], "fast");
    assert_eq!(v["ship"]["kind"], "one");
}
